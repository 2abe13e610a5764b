//! Transport error types.

use mpi_domain::ActorError;
use mpi_meta::{HttpCode, Meta, MetaError, new_error};

/// Failure to carry a call to a peer or to read its answer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The peer answered with a non-success status and a body that is not JSON.
    #[error("peer returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The peer answered with a success status and a body that is not JSON.
    #[error("undecodable response: {0}")]
    Decode(#[from] MetaError),

    /// The target uri cannot be parsed.
    #[error("invalid uri: {0}")]
    InvalidUri(String),
}

impl TransportError {
    /// Converts into an error Meta with code 502.
    #[must_use]
    pub fn to_meta(&self) -> Meta {
        new_error(self.to_string(), Some(HttpCode::BadGateway.as_u16()))
    }
}

impl From<TransportError> for ActorError {
    fn from(err: TransportError) -> Self {
        ActorError::Meta(err.to_meta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_bad_gateway() {
        let err = TransportError::Status {
            status: 503,
            body: "unavailable".into(),
        };
        let meta = err.to_meta();
        assert_eq!(meta.attr("code"), Some("502"));
        assert_eq!(meta.attr("message"), Some("peer returned status 503: unavailable"));

        let actor_err = ActorError::from(TransportError::InvalidUri("::".into()));
        assert_eq!(actor_err.code(), Some(502));
    }
}
