/// Convenience result type used across sphereshade.
pub type SphereshadeResult<T> = Result<T, SphereshadeError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every variant is fatal for the current run; callers surface it to the operator as-is.
#[derive(thiserror::Error, Debug)]
pub enum SphereshadeError {
    /// Invalid caller-provided data: image contents, dimensions, parameters or config.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external sphere renderer failed or returned an inconsistent snapshot.
    #[error("renderer error: {0}")]
    Collaborator(String),

    /// Reading or persisting an image file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing scene files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SphereshadeError {
    /// Build a [`SphereshadeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SphereshadeError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a [`SphereshadeError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`SphereshadeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
