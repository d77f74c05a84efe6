use super::envelope::RpcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("There is no connection available at this time")]
    ConnectionUnavailable,

    #[error("There is no namespace and/or database selected")]
    MissingNamespaceDatabase,

    #[error("HTTP {status} {reason}: {message}")]
    HttpConnection {
        status: u16,
        reason: String,
        /// Response body decoded as UTF-8 (lossy).
        message: String,
        /// Raw response body.
        body: Vec<u8>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Server(#[from] RpcError),
}
