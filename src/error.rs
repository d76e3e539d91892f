/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum KnackProxyError {
    /// Network or request execution error from `reqwest` (no HTTP status).
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body did not match the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
    /// Invalid client configuration, such as a missing application id.
    #[error("configuration error: {0}")]
    Config(String),
}

impl KnackProxyError {
    /// HTTP status of the failed response, if the proxy answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
