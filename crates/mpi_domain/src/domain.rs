//! The [`Domain`] registry and its dispatch operations.
//!
//! A Domain owns actors, controllers and sub-domains. Calls are resolved
//! through the Domain's [`Indexer`], built lazily on first use and kept for
//! the Domain's lifetime.
//!
//! # Usage
//!
//! ```
//! use mpi_domain::{Domain, simple_finder};
//! use mpi_meta::Meta;
//!
//! # futures::executor::block_on(async {
//! let users = Domain::builder()
//!     .with_actor(simple_finder("User", |m: Meta, _| async move {
//!         Ok(m.with_attr("name", "ann"))
//!     }))
//!     .build();
//!
//! let found = users.call("find", Meta::new("User").with_gid("u1"), Meta::nil()).await;
//! assert_eq!(found.attr("name"), Some("ann"));
//!
//! let missing = users.call("find", Meta::new("Order"), Meta::nil()).await;
//! assert!(missing.is_error());
//! # });
//! ```

use crate::actor::{Actor, ActorRef};
use crate::indexer::{Indexer, kind_key, method_key};
use futures::FutureExt;
use futures::future::BoxFuture;
use mpi_meta::{Meta, bad_request, not_found};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

/// Controller method that tears a Domain down.
pub const CLOSE: &str = "close";

/// Teardown hook run by `ctrl("close", Nil)`.
pub type Closer = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Composable registry of actors, controllers and sub-domains.
///
/// Build one with [`Domain::builder`]. A Domain is `Send + Sync` and is
/// usually shared behind an [`Arc`].
pub struct Domain {
    uri: String,
    meta: Meta,
    actors: Vec<ActorRef>,
    ctrls: Vec<ActorRef>,
    subs: Vec<Domain>,
    closer: Option<Closer>,
    indexer: RwLock<Option<Arc<Indexer>>>,
}

impl core::fmt::Debug for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Domain")
            .field("uri", &self.uri)
            .field("meta", &self.meta)
            .field("actors", &self.actors.len())
            .field("ctrls", &self.ctrls.len())
            .field("subs", &self.subs)
            .field("closer", &self.closer.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Domain {
    fn default() -> Self {
        DomainBuilder::default().build()
    }
}

impl Domain {
    /// Starts building a Domain.
    #[must_use]
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    /// Transport address of this Domain when it is served remotely.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Self-descriptor. Its `ns` is the name used by [`sub`](Self::sub).
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Own actors, in declaration order.
    #[must_use]
    pub fn actors(&self) -> &[ActorRef] {
        &self.actors
    }

    /// Own controllers, in declaration order.
    #[must_use]
    pub fn ctrls(&self) -> &[ActorRef] {
        &self.ctrls
    }

    /// Sub-domains, in declaration order.
    #[must_use]
    pub fn subs(&self) -> &[Domain] {
        &self.subs
    }

    /// Direct sub-domain whose descriptor namespace is `name`.
    #[must_use]
    pub fn sub(&self, name: &str) -> Option<&Domain> {
        self.subs.iter().find(|sub| sub.meta.ns() == Some(name))
    }

    /// Returns the lookup tables, building them on first access.
    ///
    /// Concurrent first accesses may each build an Indexer; the first one
    /// stored is kept and returned to every caller.
    pub fn indexer(&self) -> Arc<Indexer> {
        if let Some(idx) = self.indexer.read().as_ref() {
            return Arc::clone(idx);
        }
        let fresh = Arc::new(Indexer::build(self));
        let mut slot = self.indexer.write();
        Arc::clone(slot.get_or_insert(fresh))
    }

    /// Dispatches `kind[cat].method` to the matching actor.
    ///
    /// Never fails: a Nil `meta` yields a 400 error Meta, an unknown key a
    /// 404, and actor failures an error Meta prefixed with the key.
    pub async fn call(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        if meta.is_nil() {
            tracing::warn!(method, "call with nil meta");
            return bad_request(format!("calling {method} with nil meta"));
        }
        let key = method_key(&kind_key(&meta), method);
        let actor = self.indexer().method_actors().get(&key).cloned();
        dispatch(key, actor, meta, options).await
    }

    /// Dispatches a controller operation.
    ///
    /// Resolves against this Domain's own controllers only: `kind[cat].method`
    /// when `meta` is not Nil, else the bare `method`. `close` with a Nil
    /// `meta` runs the closer, when there is one, and returns Nil.
    pub async fn ctrl(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        if method == CLOSE
            && meta.is_nil()
            && let Some(closer) = &self.closer
        {
            tracing::info!(uri = %self.uri, "closing domain");
            closer().await;
            return Meta::nil();
        }
        let key = if meta.is_nil() {
            method.to_string()
        } else {
            method_key(&kind_key(&meta), method)
        };
        let actor = self.indexer().ctrl_actors().get(&key).cloned();
        dispatch(key, actor, meta, options).await
    }

    /// `call("find", ..)`.
    pub async fn find(&self, meta: Meta, options: Meta) -> Meta {
        self.call("find", meta, options).await
    }

    /// `call("list", ..)`.
    pub async fn list(&self, meta: Meta, options: Meta) -> Meta {
        self.call("list", meta, options).await
    }

    /// `call("create", ..)`.
    pub async fn create(&self, meta: Meta, options: Meta) -> Meta {
        self.call("create", meta, options).await
    }

    /// `call("make", ..)`.
    pub async fn make(&self, meta: Meta, options: Meta) -> Meta {
        self.call("make", meta, options).await
    }
}

async fn dispatch(key: String, actor: Option<ActorRef>, meta: Meta, options: Meta) -> Meta {
    let Some(actor) = actor else {
        tracing::debug!(%key, "no actor");
        return not_found(format!("{key} not found"));
    };
    tracing::debug!(%key, meta = %meta, "dispatching");
    match actor.process(meta, options).await {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(%key, error = %err, "actor failed");
            err.to_meta(&key)
        }
    }
}

/// Builder for [`Domain`].
#[derive(Default)]
pub struct DomainBuilder {
    uri: String,
    meta: Meta,
    actors: Vec<ActorRef>,
    ctrls: Vec<ActorRef>,
    subs: Vec<Domain>,
    closer: Option<Closer>,
}

impl core::fmt::Debug for DomainBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomainBuilder")
            .field("uri", &self.uri)
            .field("meta", &self.meta)
            .field("actors", &self.actors.len())
            .field("ctrls", &self.ctrls.len())
            .field("subs", &self.subs.len())
            .finish_non_exhaustive()
    }
}

impl DomainBuilder {
    /// Sets the transport address.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Sets the self-descriptor.
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Adds an actor.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Actor) -> Self {
        self.actors.push(Arc::new(actor));
        self
    }

    /// Adds shared actors.
    #[must_use]
    pub fn with_actors(mut self, actors: impl IntoIterator<Item = ActorRef>) -> Self {
        self.actors.extend(actors);
        self
    }

    /// Adds a controller.
    #[must_use]
    pub fn with_ctrl(mut self, ctrl: impl Actor) -> Self {
        self.ctrls.push(Arc::new(ctrl));
        self
    }

    /// Adds shared controllers.
    #[must_use]
    pub fn with_ctrls(mut self, ctrls: impl IntoIterator<Item = ActorRef>) -> Self {
        self.ctrls.extend(ctrls);
        self
    }

    /// Adds a sub-domain.
    #[must_use]
    pub fn with_sub(mut self, sub: Domain) -> Self {
        self.subs.push(sub);
        self
    }

    /// Adds sub-domains.
    #[must_use]
    pub fn with_subs(mut self, subs: impl IntoIterator<Item = Domain>) -> Self {
        self.subs.extend(subs);
        self
    }

    /// Sets the teardown hook.
    #[must_use]
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.closer = Some(Arc::new(move || closer().boxed()));
        self
    }

    /// Finishes the Domain. The Indexer is not built until first use.
    #[must_use]
    pub fn build(self) -> Domain {
        Domain {
            uri: self.uri,
            meta: self.meta,
            actors: self.actors,
            ctrls: self.ctrls,
            subs: self.subs,
            closer: self.closer,
            indexer: RwLock::new(None),
        }
    }
}
