use role_core::SelectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Role selection failed: {0}")]
    Selection(#[from] SelectionError),
}

impl LedgerError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            LedgerError::Io(_) => true,
            LedgerError::Selection(err) => err.is_recoverable(),
            LedgerError::ChecksumMismatch { .. } => false,
            LedgerError::VersionMismatch { .. } => false,
            _ => false,
        }
    }
}
