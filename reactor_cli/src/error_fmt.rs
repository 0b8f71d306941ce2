//! Human-readable error descriptions and structured JSON error formatting.

use reactor_core::error::{ReactorError, RegistryError, ZoneError};
use reactor_hardware::error::HwError;

/// Stable exit codes; clap usage errors keep clap's own code (2).
pub const EXIT_GENERIC: i32 = 1;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_HARDWARE: i32 = 4;

fn find<T: std::error::Error + 'static>(err: &eyre::Report) -> Option<&T> {
    err.chain().find_map(|e| e.downcast_ref::<T>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ze) = find::<ZoneError>(err) {
        return match ze {
            ZoneError::Full { capacity } => format!(
                "What happened: Too many zones for one sensor (capacity {capacity}).\nLikely causes: The zones list in a [[sensor]] table is longer than the sensor can hold.\nHow to fix: Merge adjacent zones or split the input across sensors."
            ),
            ZoneError::InvalidRange { id, min, max } => format!(
                "What happened: Zone {id} has min {min} above max {max}.\nLikely causes: Bounds swapped in the config.\nHow to fix: Write zones as {{ id, min, max }} with min <= max."
            ),
        };
    }

    if let Some(re) = find::<RegistryError>(err) {
        return format!(
            "What happened: {re}.\nLikely causes: More sensors requested than the device was sized for.\nHow to fix: Report this as a bug; the runner sizes the device from the config."
        );
    }

    if let Some(de) = find::<ReactorError>(err) {
        if matches!(de, ReactorError::Timeout) {
            return "What happened: ADC read timed out.\nLikely causes: SPI wiring, missing power, or wrong chip select.\nHow to fix: Check the MCP3008 wiring and that SPI is enabled.".to_string();
        }
        return format!(
            "What happened: {de}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    if let Some(hw) = find::<HwError>(err) {
        return match hw {
            HwError::EmptyTrace => "What happened: The replay trace has no readings.\nLikely causes: The CSV holds only the 'raw' header.\nHow to fix: Record at least one reading or drop --trace.".to_string(),
            HwError::Timeout => "What happened: ADC read timed out.\nLikely causes: SPI wiring, missing power, or wrong chip select.\nHow to fix: Check the MCP3008 wiring and that SPI is enabled.".to_string(),
            other => format!(
                "What happened: Failed to open the ADC: {other}.\nLikely causes: SPI disabled or insufficient permissions on /dev/spidev*.\nHow to fix: Enable SPI and add the user to the spi group."
            ),
        };
    }

    if let Some(te) = find::<toml::de::Error>(err) {
        return format!(
            "What happened: The config file is not valid TOML for this tool.\nLikely causes: Typo in a key, unknown preset or stability mode, or a wrong value type.\nHow to fix: Compare with etc/reactor.toml. Parser said: {}",
            te.message()
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file. Original: {msg}"
        );
    }


    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Configuration is invalid.\nLikely causes: Out-of-range values or duplicate channels.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    if lower.contains("trace csv must have header") {
        return "Invalid header in trace CSV. Expected a single 'raw' column.".to_string();
    }

    if lower.contains("mcp3008") || lower.contains("/dev/spidev") {
        return format!(
            "What happened: Failed to open the ADC.\nLikely causes: SPI disabled or insufficient permissions on /dev/spidev*.\nHow to fix: Enable SPI and add the user to the spi group. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if find::<ZoneError>(err).is_some() || find::<toml::de::Error>(err).is_some() {
        return EXIT_CONFIG;
    }
    if find::<ReactorError>(err).is_some() || find::<HwError>(err).is_some() {
        return EXIT_HARDWARE;
    }
    let lower = format!("{err:#}").to_ascii_lowercase();
    if lower.contains("config") {
        return EXIT_CONFIG;
    }
    EXIT_GENERIC
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    let reason = if find::<ZoneError>(err).is_some() {
        "Zone"
    } else if find::<toml::de::Error>(err).is_some() {
        "Parse"
    } else if find::<RegistryError>(err).is_some() {
        "Registry"
    } else if let Some(de) = find::<ReactorError>(err) {
        match de {
            ReactorError::Timeout => "Timeout",
            ReactorError::Hardware(_) | ReactorError::HardwareFault(_) => "Hardware",
        }
    } else if let Some(hw) = find::<HwError>(err) {
        match hw {
            HwError::Timeout => "Timeout",
            _ => "Hardware",
        }
    } else {
        "Error"
    };
    json!({ "reason": reason, "exit_code": exit_code_for_error(err), "message": humanize(err) })
        .to_string()
}
