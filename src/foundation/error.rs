/// Convenience result type used across lorereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Coarse error kind, for callers that translate failures into user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Media could not be probed.
    Probe,
    /// Timing constraints cannot be satisfied.
    Infeasible,
    /// Internal graph-construction invariant violated.
    Graph,
    /// The external rendering engine failed.
    Render,
    /// Caller-supplied input was rejected.
    Validation,
    /// Configuration was rejected.
    Config,
    /// The request was cancelled before completing.
    Cancelled,
    /// Lower-level failure (IO and similar).
    Other,
}

/// Top-level error taxonomy used by the composition pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Unreadable or corrupt media, or a failed probe subprocess.
    #[error("probe error: {0}")]
    Probe(String),

    /// Narration is too short for the number of images.
    #[error("infeasible timing: {0}")]
    Infeasible(String),

    /// Graph construction hit an invariant violation. Always a defect.
    #[error("graph error: {0}")]
    Graph(String),

    /// The rendering engine failed; carries its captured diagnostics.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid caller-supplied input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The request was cancelled and its subprocess terminated.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`ReelError::Infeasible`] value.
    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
    }

    /// Build a [`ReelError::Graph`] value.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Probe(_) => ErrorKind::Probe,
            Self::Infeasible(_) => ErrorKind::Infeasible,
            Self::Graph(_) => ErrorKind::Graph,
            Self::Render(_) => ErrorKind::Render,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
