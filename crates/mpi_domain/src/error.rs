//! Error type for actor processing.

use mpi_meta::{HttpCode, Meta, new_error};

/// Failure raised by an [`Actor`](crate::Actor).
///
/// The dispatching [`Domain`](crate::Domain) never lets it escape: it is
/// turned into an error Meta with [`ActorError::to_meta`].
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// The actor failed with an error Meta; its code is preserved.
    #[error("{}", .0.attr_or("message", "error"))]
    Meta(Meta),

    /// The actor failed with a plain message.
    #[error("{0}")]
    Failed(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ActorError {
    /// Creates a [`Failed`](Self::Failed) error.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Wraps an arbitrary error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    /// Code carried by the failure, if it was raised as an error Meta.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Meta(meta) if meta.is_error() => {
                meta.attr("code").and_then(|c| c.trim().parse().ok())
            }
            _ => None,
        }
    }

    /// Converts into an error Meta whose message is prefixed with `[context]`.
    ///
    /// The code is kept when the failure carried a well-formed error Meta,
    /// otherwise it is 400.
    #[must_use]
    pub fn to_meta(&self, context: &str) -> Meta {
        let code = self.code().unwrap_or(HttpCode::BadRequest.as_u16());
        new_error(format!("[{context}] {self}"), Some(code))
    }
}

/// An error Meta raised as a failure.
impl From<Meta> for ActorError {
    fn from(meta: Meta) -> Self {
        Self::Meta(meta)
    }
}
