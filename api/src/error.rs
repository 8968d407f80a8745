use serde::Deserialize;

/// Error body shape shared by the backend services.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Service unreachable, connection dropped or the request timed out.
    #[error("request failed: {0}")]
    Transport(#[from] isahc::Error),

    #[error("request failed: {0}")]
    Io(#[from] std::io::Error),

    /// Non-success status from a backend. `message` is the parsed error
    /// body's `message` when the service sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Http(#[from] http::Error),
}

impl Error {
    /// Status code of the rejected request, if the backend responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
