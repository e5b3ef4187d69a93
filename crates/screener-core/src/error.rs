use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),
}

/// The data provider could not supply anything usable for a ticker.
///
/// Recorded into that ticker's result; never raised out of a batch.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct AcquisitionFailure {
    pub reason: String,
}

impl AcquisitionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
