use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhitelistError {
    #[error("server address is empty")]
    MissingHost,
    #[error("server root password is empty")]
    MissingPassword,
    #[error("failed to query firewall status: {0}")]
    StatusQuery(String),
    #[error("lookup service returned an invalid address: {0:?}")]
    InvalidAddress(String),
}

impl WhitelistError {
    /// Input errors are reported and the process exits cleanly.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::MissingHost | Self::MissingPassword)
    }
}
