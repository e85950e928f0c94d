use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the analytics engine, its data sources and configuration.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, AnalyticsError::InvalidRange(_))
    }
}

pub type Result<T> = StdResult<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_and_serde_failures_keep_their_source() {
        let io: AnalyticsError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, AnalyticsError::Io(_)));
        assert_eq!(io.to_string(), "IO error: gone");

        let serde: AnalyticsError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(serde, AnalyticsError::Serde(_)));
        assert!(serde.to_string().starts_with("Serialization error: "));
    }
}
