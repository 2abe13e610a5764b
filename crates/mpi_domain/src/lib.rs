//! Actors, domains and dispatch.
//!
//! A [`Domain`] is a registry of [`Actor`]s, controllers and sub-domains.
//! `domain.call(method, meta, options)` resolves the key
//! `[ns:]kind[[cat]].method` through the Domain's [`Indexer`] and invokes the
//! single actor registered for it. Own actors shadow those of sub-domains;
//! controllers are never inherited.
//!
//! Failures never escape dispatch: they come back as error Metas (see
//! [`mpi_meta::error`]).

pub mod actor;
pub mod domain;
pub mod error;
pub mod indexer;
mod mpi;

pub use actor::{
    ACTOR_KIND, Actor, ActorRef, ActorTable, FnActor, actor_meta, simple_actor, simple_creator,
    simple_finder, simple_lister, simple_maker,
};
pub use domain::{CLOSE, Closer, Domain, DomainBuilder};
pub use error::ActorError;
pub use indexer::Indexer;
pub use mpi::{Mpi, NilMpi};
