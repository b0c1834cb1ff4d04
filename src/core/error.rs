use thiserror::Error;

/// Failures of the sizing core.
///
/// Input-shape problems are normally absorbed by the loaders, so anything surfacing here
/// is either a programming error upstream or a numerically degenerate request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cell specification `{cell}`: {reason}")]
    InvalidCell { cell: String, reason: String },

    #[error("invalid load profile: {0}")]
    InvalidProfile(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// No safe fallback exists for the requested computation.
    #[error("degenerate input: {0}")]
    Degenerate(&'static str),

    #[error("cancelled by the progress sink")]
    Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}
