use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    ValidationError(String),

    #[error("Upstream error: {message}")]
    UpstreamError {
        // HTTP status reported by the upstream, if the request got that far
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to parse upstream data, error: {0}")]
    ParseError(String),

    #[error("Failed to fetch MP3 preview data: {0}")]
    PreviewError(String),

    #[error("no tracks found")]
    NotFoundError,

    #[error("no selectable track found after bounded sampling and fallback scan")]
    SelectionExhaustedError,

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    pub fn missing_parameter(name: &str) -> Self {
        Error::ValidationError(format!("missing required parameter: {name}"))
    }

    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Error::UpstreamError {
            status: Some(status),
            message: message.into(),
        }
    }

    // True for the two "nothing eligible to play" outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFoundError | Error::SelectionExhaustedError)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::UpstreamError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(err: std::net::AddrParseError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
