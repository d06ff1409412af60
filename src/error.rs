use thiserror::Error;

/// Everything that can go wrong while looking up journeys.
///
/// Callers treat all variants alike, the split only helps diagnostics.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("journey lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("journey lookup failed: undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("journey lookup failed: response has no connections")]
    MissingConnections,

    #[error("journey lookup failed: invalid session timeout {0}")]
    InvalidSession(i64),
}

pub type Result<T> = std::result::Result<T, LookupError>;
