//! The injected [`Transport`] capability and the wire envelope.

use crate::error::TransportError;
use async_trait::async_trait;
use mpi_meta::{Meta, parse_meta};
use serde::{Deserialize, Serialize};

/// HTTP verb carrying a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `call`.
    Post,
    /// `ctrl`.
    Patch,
}

impl Verb {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

impl core::fmt::Display for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body: `{ "method", "meta", "options"? }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Method to invoke on the peer.
    pub method: String,
    /// Call target.
    #[serde(default)]
    pub meta: Meta,
    /// Call options; omitted when Nil.
    #[serde(default, alias = "ctx", skip_serializing_if = "Meta::is_nil")]
    pub options: Meta,
}

impl Envelope {
    /// Creates an envelope.
    #[must_use]
    pub fn new(method: impl Into<String>, meta: Meta, options: Meta) -> Self {
        Self {
            method: method.into(),
            meta,
            options,
        }
    }
}

/// Raw answer from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl Response {
    /// Creates a 200 response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Decodes the body into a Meta.
    ///
    /// The status is ignored when the body is JSON: peers answer errors with
    /// error Metas. JSON of the wrong shape collapses to Nil.
    ///
    /// # Errors
    ///
    /// [`TransportError::Status`] for a non-JSON body on a failure status,
    /// [`TransportError::Decode`] for a non-JSON body otherwise.
    pub fn into_meta(self) -> Result<Meta, TransportError> {
        match parse_meta(&self.body) {
            Ok((meta, true)) => Ok(meta),
            Ok((meta, false)) => {
                tracing::warn!(status = self.status, "malformed response, using nil");
                Ok(meta)
            }
            Err(_) if !(200..300).contains(&self.status) => Err(TransportError::Status {
                status: self.status,
                body: self.body,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Carries an [`Envelope`] to a uri and returns the peer's raw answer.
///
/// Implementations are injected into remote proxies; nothing in this crate
/// reaches for a process-wide client.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends `envelope` to `uri` with `verb`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered or the answer
    /// cannot be read.
    async fn send(
        &self,
        uri: &str,
        verb: Verb,
        envelope: &Envelope,
    ) -> Result<Response, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wire_shape() {
        let env = Envelope::new("find", Meta::new("User").with_gid("u1"), Meta::nil());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"method": "find", "meta": {"kind": "User", "gid": "u1"}})
        );

        let back: Envelope = serde_json::from_value(serde_json::json!({
            "method": "find",
            "meta": {"kind": "User"},
            "ctx": {"kind": "Options", "attrs": {"limit": 5}},
        }))
        .unwrap();
        assert_eq!(back.options.int_attr("limit"), Some(5));
    }

    #[test]
    fn responses_decode_permissively() {
        let meta = Response::ok(r#"{"kind":"User"}"#).into_meta().unwrap();
        assert_eq!(meta.kind(), "User");

        let wrong_shape = Response::ok("[1, 2]").into_meta().unwrap();
        assert!(wrong_shape.is_nil());

        let not_found = Response {
            status: 404,
            body: r#"{"kind":"Error","attrs":{"message":"x","code":"404"}}"#.into(),
        };
        assert!(not_found.into_meta().unwrap().is_error());
    }

    #[test]
    fn non_json_bodies_fail() {
        let err = Response::ok("<html>").into_meta().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));

        let err = Response {
            status: 503,
            body: "down".into(),
        }
        .into_meta()
        .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 503, .. }));
    }
}
