use thiserror::Error;

pub type SpResult<T> = Result<T, SpindleError>;

#[derive(Error, Debug)]
pub enum SpindleError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Failed to parse session file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Failed to read session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render surface unavailable for {view} view: {reason}")]
    RenderSurface { view: &'static str, reason: &'static str },
}
