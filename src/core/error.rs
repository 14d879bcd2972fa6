use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoverError {
    #[error("No active session")]
    NoActiveSession,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("No async runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoverError>;
