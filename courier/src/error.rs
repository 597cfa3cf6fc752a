#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Io(#[from] reqwest::Error),

    #[error("TLS initialization failed: {0}")]
    TlsInit(#[source] reqwest::Error),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[cfg(feature = "config-json")]
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),
}

pub type StdResult<T, E> = std::result::Result<T, E>;

pub type Result<T> = std::result::Result<T, Error>;

pub type RequestResult<T> = std::result::Result<T, RequestError>;
