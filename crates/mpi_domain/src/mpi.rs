//! The [`Mpi`] calling interface.

use crate::domain::Domain;
use async_trait::async_trait;
use mpi_meta::Meta;
use std::sync::Arc;

/// Anything that answers `call` and `ctrl`.
///
/// Implemented by [`Domain`] for in-process dispatch and by remote proxies
/// that forward over a transport. Both operations always yield a Meta;
/// failures come back as error Metas.
#[async_trait]
pub trait Mpi: Send + Sync {
    /// Invokes `method` on the kind described by `meta`.
    async fn call(&self, method: &str, meta: Meta, options: Meta) -> Meta;

    /// Invokes a controller operation.
    async fn ctrl(&self, method: &str, meta: Meta, options: Meta) -> Meta;
}

#[async_trait]
impl Mpi for Domain {
    async fn call(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        Domain::call(self, method, meta, options).await
    }

    async fn ctrl(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        Domain::ctrl(self, method, meta, options).await
    }
}

#[async_trait]
impl<T: Mpi + ?Sized> Mpi for Arc<T> {
    async fn call(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        (**self).call(method, meta, options).await
    }

    async fn ctrl(&self, method: &str, meta: Meta, options: Meta) -> Meta {
        (**self).ctrl(method, meta, options).await
    }
}

/// An [`Mpi`] that answers Nil to everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NilMpi;

#[async_trait]
impl Mpi for NilMpi {
    async fn call(&self, _method: &str, _meta: Meta, _options: Meta) -> Meta {
        Meta::nil()
    }

    async fn ctrl(&self, _method: &str, _meta: Meta, _options: Meta) -> Meta {
        Meta::nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nil_mpi_answers_nil() {
        let mpi: Arc<dyn Mpi> = Arc::new(NilMpi);
        assert!(mpi.call("find", Meta::new("User"), Meta::nil()).await.is_nil());
        assert!(mpi.ctrl("close", Meta::nil(), Meta::nil()).await.is_nil());
    }

    #[tokio::test]
    async fn empty_domain_reports_not_found() {
        let mpi: &dyn Mpi = &Domain::default();
        let out = mpi.call("find", Meta::new("User"), Meta::nil()).await;
        assert_eq!(out.attr("code"), Some("404"));
    }
}
