use service::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Unrecognized timestamp: {value}")]
    Timestamp { value: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Invalid form: {message}")]
    InvalidForm { message: String },

    #[error("Row {index} out of range (page has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("No environment with code {code} on this page")]
    UnknownCode { code: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
