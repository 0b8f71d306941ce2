use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("spi error: {0}")]
    Spi(String),
    #[error("invalid adc channel {0}")]
    InvalidChannel(u8),
    #[error("adc conversion timeout")]
    Timeout,
    #[error("replay trace is empty")]
    EmptyTrace,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
