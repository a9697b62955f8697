use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unexpected page structure: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Coarse failure classes reported at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Config,
    Io,
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Http(_) | EtlError::HttpStatus { .. } => ErrorKind::Network,
            EtlError::Parse(_) => ErrorKind::Parse,
            EtlError::Config(_) | EtlError::Toml(_) => ErrorKind::Config,
            EtlError::Io(_) | EtlError::Csv(_) | EtlError::Database(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(EtlError::Parse("no table".into()).kind(), ErrorKind::Parse);
        assert_eq!(EtlError::Config("missing INR".into()).kind(), ErrorKind::Config);
        assert_eq!(
            EtlError::HttpStatus { url: "http://x".into(), status: 404 }.kind(),
            ErrorKind::Network
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(EtlError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display_includes_detail() {
        let err = EtlError::Config("exchange rate for INR not found".into());
        assert_eq!(err.to_string(), "Configuration error: exchange rate for INR not found");
    }
}
