//! # mpi Internal Library
//!
//! Re-exports the core mpi crates for convenience.

/// Layer 1: the Meta data envelope.
pub use mpi_meta;

/// Layer 2: actors, domains and dispatch.
pub use mpi_domain;

/// Layer 3: remote transport and server mount.
pub use mpi_remote;

/// Service infrastructure (logging setup).
pub use mpi_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use mpi_core::{TracingConfig, TracingFormat};
    pub use mpi_domain::{
        Actor, ActorError, ActorRef, ActorTable, Domain, Mpi, NilMpi, simple_actor,
        simple_creator, simple_finder, simple_lister, simple_maker,
    };
    pub use mpi_meta::{
        Meta, bad_request, forbidden, new_error, not_found, parse_meta, server_error, to_meta,
        unauthorized,
    };
    pub use mpi_remote::{
        HttpTransport, RemoteActor, RemoteDomainConfig, RemoteMpi, Transport, remote_domain,
    };
}
