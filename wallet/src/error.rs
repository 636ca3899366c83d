use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("connection rejected by user")]
    Rejected,

    #[error("wallet provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<qol_types::QolError> for WalletError {
    fn from(e: qol_types::QolError) -> Self {
        WalletError::InvalidAddress(e.to_string())
    }
}
