//! The [`Actor`] trait and function-backed actors.
//!
//! An actor is described by a Meta of kind [`ACTOR_KIND`]: its `method` is
//! the verb it answers, the `target` tag (or `target` rel) names the kind it
//! acts upon, and an optional `cat` tag narrows it to a category.
//!
//! Handlers are registered explicitly, either one at a time with
//! [`simple_actor`] and friends, or as a table with [`ActorTable`].

use crate::error::ActorError;
use async_trait::async_trait;
use mpi_meta::Meta;
use std::future::Future;
use std::sync::Arc;

/// Kind of actor descriptors.
pub const ACTOR_KIND: &str = "Actor";

/// Shared handle to an actor.
pub type ActorRef = Arc<dyn Actor>;

/// A unit of behavior bound to a target kind and method.
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// The actor's descriptor.
    fn meta(&self) -> &Meta;

    /// Handles `input` with `options`.
    ///
    /// # Errors
    ///
    /// Any failure; the caller converts it into an error Meta.
    async fn process(&self, input: Meta, options: Meta) -> Result<Meta, ActorError>;
}

/// Actor backed by an async function.
///
/// The function may return anything convertible into a [`Meta`]; `()` and
/// `None` become Nil.
pub struct FnActor<F> {
    meta: Meta,
    handler: F,
}

impl<F> core::fmt::Debug for FnActor<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnActor").field("meta", &self.meta).finish()
    }
}

impl<F> FnActor<F> {
    /// Creates an actor with an explicit descriptor.
    pub fn new<Fut, R>(meta: Meta, handler: F) -> Self
    where
        F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
        R: Into<Meta> + 'static,
    {
        Self { meta, handler }
    }

    /// Adds a tag to the descriptor (e.g. `cat`).
    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta = self.meta.with_tag(name, value);
        self
    }

    /// Sets the descriptor's global identifier.
    #[must_use]
    pub fn with_gid(mut self, gid: impl Into<String>) -> Self {
        self.meta = self.meta.with_gid(gid);
        self
    }

    /// Wraps the actor in an [`ActorRef`].
    #[must_use]
    pub fn into_ref<Fut, R>(self) -> ActorRef
    where
        F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
        R: Into<Meta> + 'static,
    {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut, R> Actor for FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    fn meta(&self) -> &Meta {
        &self.meta
    }

    async fn process(&self, input: Meta, options: Meta) -> Result<Meta, ActorError> {
        (self.handler)(input, options).await.map(Into::into)
    }
}

/// Builds the descriptor for an actor targeting `kind` with `method`.
#[must_use]
pub fn actor_meta(kind: &str, method: &str) -> Meta {
    Meta::new(ACTOR_KIND)
        .with_method(method)
        .with_tag("target", kind)
}

/// Creates an actor answering `kind.method`.
///
/// ```
/// use mpi_domain::{Actor, simple_actor};
/// use mpi_meta::Meta;
///
/// let actor = simple_actor("User", "find", |m: Meta, _opts: Meta| async move {
///     Ok(m.with_attr("name", "ann"))
/// });
/// assert_eq!(actor.meta().tag("target"), Some("User"));
/// ```
pub fn simple_actor<F, Fut, R>(kind: &str, method: &str, handler: F) -> FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    FnActor::new(actor_meta(kind, method), handler)
}

/// Creates a `list` actor for `kind`.
pub fn simple_lister<F, Fut, R>(kind: &str, handler: F) -> FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    simple_actor(kind, "list", handler)
}

/// Creates a `find` actor for `kind`.
pub fn simple_finder<F, Fut, R>(kind: &str, handler: F) -> FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    simple_actor(kind, "find", handler)
}

/// Creates a `create` actor for `kind`.
pub fn simple_creator<F, Fut, R>(kind: &str, handler: F) -> FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    simple_actor(kind, "create", handler)
}

/// Creates a `make` actor for `kind`.
pub fn simple_maker<F, Fut, R>(kind: &str, handler: F) -> FnActor<F>
where
    F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    R: Into<Meta> + 'static,
{
    simple_actor(kind, "make", handler)
}

/// Explicit registration table for one target kind.
///
/// Each [`on`](Self::on) entry maps a method to a handler. Tags set with
/// [`with_tag`](Self::with_tag) apply to the entries registered after them.
///
/// ```
/// use mpi_domain::{ActorTable, Domain};
/// use mpi_meta::Meta;
///
/// let actors = ActorTable::new("User")
///     .on("find", |m: Meta, _| async move { Ok(m) })
///     .on("list", |_, _| async move { Ok(Meta::new("Users")) })
///     .into_actors();
///
/// let domain = Domain::builder().with_actors(actors).build();
/// assert_eq!(domain.actors().len(), 2);
/// ```
#[derive(Default)]
pub struct ActorTable {
    kind: String,
    tags: Vec<(String, String)>,
    actors: Vec<ActorRef>,
}

impl core::fmt::Debug for ActorTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let methods: Vec<&str> = self
            .actors
            .iter()
            .filter_map(|actor| actor.meta().method())
            .collect();
        f.debug_struct("ActorTable")
            .field("kind", &self.kind)
            .field("methods", &methods)
            .finish()
    }
}

impl ActorTable {
    /// Creates an empty table for `kind`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Adds a descriptor tag to subsequently registered entries.
    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((name.into(), value.into()));
        self
    }

    /// Registers `handler` for `method`.
    #[must_use]
    pub fn on<F, Fut, R>(mut self, method: &str, handler: F) -> Self
    where
        F: Fn(Meta, Meta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
        R: Into<Meta> + 'static,
    {
        let meta = actor_meta(&self.kind, method).with_tags(self.tags.iter().cloned());
        self.actors.push(Arc::new(FnActor::new(meta, handler)));
        self
    }

    /// Returns the registered actors in declaration order.
    #[must_use]
    pub fn into_actors(self) -> Vec<ActorRef> {
        self.actors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fn_actor_converts_results() {
        let unit = simple_actor("Job", "run", |_, _| async { Ok(()) });
        assert!(unit.process(Meta::new("Job"), Meta::nil()).await.unwrap().is_nil());

        let none = simple_finder("Job", |_, _| async { Ok(None::<Meta>) });
        assert!(none.process(Meta::new("Job"), Meta::nil()).await.unwrap().is_nil());

        let echo = simple_maker("Job", |m: Meta, _| async move { Ok(m) });
        let out = echo.process(Meta::new("Job").with_gid("j1"), Meta::nil()).await.unwrap();
        assert_eq!(out.gid(), Some("j1"));
    }

    #[test]
    fn descriptors_name_target_and_method() {
        let actor = simple_lister("Item", |_, _| async { Ok(()) })
            .with_tag("cat", "a")
            .with_gid("items-a");
        let meta = actor.meta();
        assert_eq!(meta.kind(), ACTOR_KIND);
        assert_eq!(meta.method(), Some("list"));
        assert_eq!(meta.tag("target"), Some("Item"));
        assert_eq!(meta.tag("cat"), Some("a"));
        assert_eq!(meta.gid(), Some("items-a"));
    }

    #[test]
    fn table_tags_apply_to_later_entries() {
        let actors = ActorTable::new("Item")
            .on("list", |_, _| async { Ok(()) })
            .with_tag("cat", "b")
            .on("find", |_, _| async { Ok(()) })
            .into_actors();
        assert_eq!(actors.len(), 2);
        assert!(!actors[0].meta().has_tag("cat"));
        assert_eq!(actors[1].meta().tag("cat"), Some("b"));
    }
}
