//! [`RemoteMpi`]: an [`Mpi`] whose peer lives behind a [`Transport`].

use crate::error::TransportError;
use crate::transport::{Envelope, Transport, Verb};
use async_trait::async_trait;
use mpi_domain::{CLOSE, Mpi};
use mpi_meta::Meta;
use std::sync::Arc;

/// Sends one envelope and decodes the answer.
pub(crate) async fn send(
    transport: &dyn Transport,
    uri: &str,
    verb: Verb,
    method: &str,
    meta: Meta,
    options: Meta,
) -> Result<Meta, TransportError> {
    let envelope = Envelope::new(method, meta, options);
    transport.send(uri, verb, &envelope).await?.into_meta()
}

/// Proxy forwarding `call` (POST) and `ctrl` (PATCH) to a peer.
///
/// `ctrl("close", Nil)` never reaches the peer; it answers Nil locally.
#[derive(Clone)]
pub struct RemoteMpi {
    uri: String,
    transport: Arc<dyn Transport>,
}

impl core::fmt::Debug for RemoteMpi {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteMpi").field("uri", &self.uri).finish_non_exhaustive()
    }
}

impl RemoteMpi {
    /// Creates a proxy for the peer at `uri`.
    pub fn new(uri: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            uri: uri.into(),
            transport,
        }
    }

    /// The peer's address.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Forwards a call.
    ///
    /// # Errors
    ///
    /// Returns the transport failure instead of an error Meta.
    pub async fn try_call(
        &self,
        method: &str,
        meta: Meta,
        options: Meta,
    ) -> Result<Meta, TransportError> {
        send(&*self.transport, &self.uri, Verb::Post, method, meta, options).await
    }

    /// Forwards a controller operation.
    ///
    /// # Errors
    ///
    /// Returns the transport failure instead of an error Meta.
    pub async fn try_ctrl(
        &self,
        method: &str,
        meta: Meta,
        options: Meta,
    ) -> Result<Meta, TransportError> {
        if method == CLOSE && meta.is_nil() {
            return Ok(Meta::nil());
        }
        send(&*self.transport, &self.uri, Verb::Patch, method, meta, options).await
    }
}

#[async_trait]
impl Mpi for RemoteMpi {
    async fn call(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        self.try_call(method, meta, options).await.unwrap_or_else(|err| {
            tracing::warn!(uri = %self.uri, method, error = %err, "remote call failed");
            err.to_meta()
        })
    }

    async fn ctrl(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        self.try_ctrl(method, meta, options).await.unwrap_or_else(|err| {
            tracing::warn!(uri = %self.uri, method, error = %err, "remote ctrl failed");
            err.to_meta()
        })
    }
}
