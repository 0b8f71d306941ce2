mod cli;
mod error_fmt;
mod logging;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use reactor_core::Preset;
use serde_json::json;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::RunOptions;

fn load_config(path: &Path) -> eyre::Result<reactor_config::Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = reactor_config::load_toml(&text)
        .wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

fn print_presets(json: bool) {
    for p in Preset::ALL {
        let r = p.record();
        if json {
            println!(
                "{}",
                json!({
                    "preset": p.name(),
                    "smoothing": r.smoothing,
                    "output_range": [r.out_min, r.out_max],
                    "quantize_step": r.quantize_step,
                    "hysteresis": r.hysteresis,
                    "change_delta": r.change_delta,
                })
            );
        } else {
            println!(
                "{:<20} smoothing={:<3} output=[{}, {}] step={} hysteresis={} delta={}",
                p.name(),
                r.smoothing,
                r.out_min,
                r.out_max,
                r.quantize_step,
                r.hysteresis,
                r.change_delta
            );
        }
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    match cli.cmd {
        Commands::Presets => {
            logging::init_tracing(cli.json, cli.log_level.as_deref(), &Default::default())?;
            print_presets(cli.json);
            Ok(())
        }
        Commands::Check => {
            let cfg = load_config(&cli.config)?;
            logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
            if cli.json {
                println!(
                    "{}",
                    json!({ "ok": true, "sensors": cfg.sensors.len(), "tick_hz": cfg.runner.tick_hz })
                );
            } else {
                println!(
                    "config ok: {} sensor(s) at {} Hz",
                    cfg.sensors.len(),
                    cfg.runner.tick_hz
                );
            }
            Ok(())
        }
        Commands::Run {
            ticks,
            trace,
            channel,
            stats,
        } => {
            let cfg = load_config(&cli.config)?;
            logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;

            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }

            let opts = RunOptions {
                ticks,
                trace,
                channel,
                stats,
            };
            run::run(&cfg, &opts, cli.json, shutdown)
        }
    }
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %format!("{e:#}"), "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}
