use thiserror::Error;

/// Errors raised while turning release groups into particle rows
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A coordinate token is neither a number nor a degree/minute/second string
    #[error("invalid coordinate {token:?}: {reason}")]
    Format { token: String, reason: String },

    /// The location has no sampler (external file, database lookup, unknown shape)
    #[error("unsupported location: {0}")]
    UnsupportedSpec(String),

    /// Too few vertices, zero area, or a ring the triangulator cannot decompose
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl ReleaseError {
    pub(crate) fn format(token: &str, reason: impl Into<String>) -> Self {
        ReleaseError::Format {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
