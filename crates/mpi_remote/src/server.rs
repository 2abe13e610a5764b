//! Serving a [`Domain`] over HTTP with `axum`.
//!
//! One route accepts JSON [`Envelope`]s: POST dispatches to
//! [`Domain::call`], PATCH to [`Domain::ctrl`]. The answer is the resulting
//! Meta; error Metas are sent with their `code` as the HTTP status.

use crate::transport::Envelope;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use mpi_domain::Domain;
use mpi_meta::Meta;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Router answering envelopes at `/`.
pub fn router(domain: Arc<Domain>) -> Router {
    Router::new()
        .route("/", post(call).patch(ctrl))
        .with_state(domain)
}

/// Router answering envelopes at `prefix` (e.g. `/mpi`).
///
/// # Panics
///
/// Panics if `prefix` is empty, `/`, or does not start with `/`.
pub fn mount(prefix: &str, domain: Arc<Domain>) -> Router {
    Router::new().nest(prefix, router(domain))
}

/// Binds `addr` and serves `domain` until the listener fails.
///
/// # Errors
///
/// Returns an error if binding or accepting fails.
pub async fn serve(addr: impl ToSocketAddrs, domain: Arc<Domain>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, domain).await
}

/// Serves `domain` on an already bound listener.
///
/// # Errors
///
/// Returns an error if accepting fails.
pub async fn serve_on(listener: TcpListener, domain: Arc<Domain>) -> std::io::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "serving domain");
    axum::serve(listener, router(domain)).await
}

async fn call(State(domain): State<Arc<Domain>>, Json(envelope): Json<Envelope>) -> Response {
    let out = domain
        .call(&envelope.method, envelope.meta, envelope.options)
        .await;
    respond(out)
}

async fn ctrl(State(domain): State<Arc<Domain>>, Json(envelope): Json<Envelope>) -> Response {
    let out = domain
        .ctrl(&envelope.method, envelope.meta, envelope.options)
        .await;
    respond(out)
}

fn respond(meta: Meta) -> Response {
    let status = if meta.is_error() {
        // Only client and server error statuses carry a body reliably.
        let (_, code) = meta.parse_error(StatusCode::BAD_REQUEST.as_u16());
        StatusCode::from_u16(code)
            .ok()
            .filter(|status| status.is_client_error() || status.is_server_error())
            .unwrap_or(StatusCode::BAD_REQUEST)
    } else {
        StatusCode::OK
    };
    (status, Json(meta)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpi_meta::{not_found, server_error};

    #[test]
    fn error_codes_become_statuses() {
        assert_eq!(respond(Meta::new("User")).status(), StatusCode::OK);
        assert_eq!(respond(Meta::nil()).status(), StatusCode::OK);
        assert_eq!(respond(not_found("x")).status(), StatusCode::NOT_FOUND);
        assert_eq!(respond(server_error("x")).status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bogus = Meta::new("Error").with_attr("code", "nope");
        assert_eq!(respond(bogus).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_error_codes_fall_back_to_bad_request() {
        for code in ["101", "204", "304", "999"] {
            let meta = Meta::new("Error").with_attr("code", code);
            assert_eq!(respond(meta).status(), StatusCode::BAD_REQUEST, "{code}");
        }
        let teapot = Meta::new("Error").with_attr("code", "418");
        assert_eq!(respond(teapot).status(), StatusCode::IM_A_TEAPOT);
    }
}
