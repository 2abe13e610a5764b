//! Remote transport for `mpi` domains.
//!
//! - [`RemoteMpi`] forwards `call`/`ctrl` to a peer.
//! - [`RemoteActor`] lets a local [`Domain`](mpi_domain::Domain) index an
//!   actor that runs elsewhere; [`remote_domain`] builds a whole tree of them
//!   from a [`RemoteDomainConfig`].
//! - [`HttpTransport`] is the `reqwest` implementation of the injected
//!   [`Transport`] capability.
//! - With the `server` feature, [`server`] serves a Domain with `axum`.
//!
//! Wire format: POST (call) or PATCH (ctrl) with a JSON body
//! `{ "method", "meta", "options"? }`; the answer is one Meta.

mod actor;
mod domain;
mod error;
mod http;
mod mpi;
#[cfg(feature = "server")]
pub mod server;
mod transport;

pub use actor::RemoteActor;
pub use domain::{RemoteActorConfig, RemoteDomainConfig, remote_domain};
pub use error::TransportError;
pub use http::HttpTransport;
pub use mpi::RemoteMpi;
pub use transport::{Envelope, Response, Transport, Verb};
