//! Remote domain trees built from configuration.
//!
//! A [`RemoteDomainConfig`] describes a Domain whose actors, controllers and
//! sub-domains all live on peers. Each entry may override the uri inherited
//! from its parent:
//!
//! ```json
//! {
//!   "uri": "http://users.internal/mpi",
//!   "meta": { "kind": "Domain", "ns": "crm" },
//!   "actors": [
//!     { "meta": { "kind": "Actor", "method": "find", "tags": { "target": "User" } } },
//!     { "uri": "http://orders.internal/mpi",
//!       "meta": { "kind": "Actor", "method": "list", "tags": { "target": "Order" } } }
//!   ],
//!   "ctrls": [],
//!   "subs": []
//! }
//! ```

use crate::actor::RemoteActor;
use crate::transport::Transport;
use mpi_domain::{ActorRef, Domain};
use mpi_meta::Meta;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One remote actor or controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteActorConfig {
    /// Peer address; inherits the enclosing domain's when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Actor descriptor, indexed locally.
    pub meta: Meta,
}

/// A remote Domain tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteDomainConfig {
    /// Default peer address for this domain's entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Domain descriptor.
    pub meta: Meta,
    /// Remote actors, forwarded with POST.
    pub actors: Vec<RemoteActorConfig>,
    /// Remote controllers, forwarded with PATCH.
    pub ctrls: Vec<RemoteActorConfig>,
    /// Nested remote domains.
    pub subs: Vec<RemoteDomainConfig>,
}

impl RemoteDomainConfig {
    /// Parses a JSON description.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON of the expected shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Builds a [`Domain`] whose actors, controllers and subs forward to peers.
///
/// Entries without a uri use their domain's, which defaults to `default_uri`.
pub fn remote_domain(
    config: &RemoteDomainConfig,
    default_uri: &str,
    transport: Arc<dyn Transport>,
) -> Domain {
    let uri = config.uri.as_deref().unwrap_or(default_uri);

    let actors: Vec<ActorRef> = config
        .actors
        .iter()
        .map(|entry| {
            let uri = entry.uri.as_deref().unwrap_or(uri);
            let actor = RemoteActor::new(uri, entry.meta.clone(), Arc::clone(&transport));
            Arc::new(actor) as ActorRef
        })
        .collect();
    let ctrls: Vec<ActorRef> = config
        .ctrls
        .iter()
        .map(|entry| {
            let uri = entry.uri.as_deref().unwrap_or(uri);
            let ctrl = RemoteActor::ctrl(uri, entry.meta.clone(), Arc::clone(&transport));
            Arc::new(ctrl) as ActorRef
        })
        .collect();
    let subs: Vec<Domain> = config
        .subs
        .iter()
        .map(|sub| remote_domain(sub, uri, Arc::clone(&transport)))
        .collect();

    tracing::debug!(
        uri,
        actors = actors.len(),
        ctrls = ctrls.len(),
        subs = subs.len(),
        "built remote domain"
    );

    Domain::builder()
        .with_uri(uri)
        .with_meta(config.meta.clone())
        .with_actors(actors)
        .with_ctrls(ctrls)
        .with_subs(subs)
        .build()
}

