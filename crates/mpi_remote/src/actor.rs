//! [`RemoteActor`]: an actor that forwards to a peer domain.

use crate::mpi::send;
use crate::transport::{Transport, Verb};
use async_trait::async_trait;
use mpi_domain::{Actor, ActorError, CLOSE};
use mpi_meta::Meta;
use std::sync::Arc;

/// Actor whose work is done by a peer reached through a [`Transport`].
///
/// Its descriptor is indexed locally like any other actor; `process` sends
/// `{ method, meta, options }` with the descriptor's method. Answers from the
/// peer, error Metas included, are returned as they are.
pub struct RemoteActor {
    uri: String,
    verb: Verb,
    meta: Meta,
    transport: Arc<dyn Transport>,
}

impl core::fmt::Debug for RemoteActor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteActor")
            .field("uri", &self.uri)
            .field("verb", &self.verb)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl RemoteActor {
    /// Creates an actor forwarding with POST.
    pub fn new(uri: impl Into<String>, meta: Meta, transport: Arc<dyn Transport>) -> Self {
        Self {
            uri: uri.into(),
            verb: Verb::Post,
            meta,
            transport,
        }
    }

    /// Creates a controller forwarding with PATCH.
    pub fn ctrl(uri: impl Into<String>, meta: Meta, transport: Arc<dyn Transport>) -> Self {
        Self {
            verb: Verb::Patch,
            ..Self::new(uri, meta, transport)
        }
    }

    /// The peer's address.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The verb used to forward.
    #[must_use]
    pub fn verb(&self) -> Verb {
        self.verb
    }
}

#[async_trait]
impl Actor for RemoteActor {
    fn meta(&self) -> &Meta {
        &self.meta
    }

    async fn process(&self, input: Meta, options: Meta) -> Result<Meta, ActorError> {
        let method = self.meta.method().unwrap_or_default();
        if self.verb == Verb::Patch && method == CLOSE && input.is_nil() {
            return Ok(Meta::nil());
        }
        let out = send(&*self.transport, &self.uri, self.verb, method, input, options).await?;
        Ok(out)
    }
}
