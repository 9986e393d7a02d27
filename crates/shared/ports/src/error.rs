use thiserror::Error;

/// Failure of the external signal collaborator.
///
/// Always locally recoverable: the service layer substitutes a fallback
/// signal and never propagates this to the end caller.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("upstream response malformed: {0}")]
    MalformedResponse(String),

    #[error("no upstream configured")]
    NotConfigured,
}
