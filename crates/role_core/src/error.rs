use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SelectionError {
    /// Whether the host can retry the round start after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SelectionError::Storage(_) => true,
            SelectionError::InvalidArgument(_) => false,
            SelectionError::Config(_) => false,
            SelectionError::Serialization(_) => false,
            SelectionError::Yaml(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SelectionError>;
