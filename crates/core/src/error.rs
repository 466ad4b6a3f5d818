use thiserror::Error;

/// Errors raised while negotiating playback with a renderer
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The probe report cannot support a decision (no container or no streams)
    #[error("invalid probe data: {0}")]
    InvalidProbeData(String),

    /// A probe report document could not be decoded
    #[error("failed to parse probe report: {0}")]
    ProbeParse(#[from] serde_json::Error),

    /// A device profile config document is malformed
    #[error("invalid device profile config: {0}")]
    ProfileConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NegotiationError>;
