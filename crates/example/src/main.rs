//! Serves the example user directory over HTTP.
//!
//! # Usage
//!
//! ```bash
//! MPI_BIND_ADDR=127.0.0.1:8080 MPI_LOG=debug directory
//! ```
//!
//! Then, from another shell:
//!
//! ```bash
//! curl -X POST localhost:8080/ -H 'content-type: application/json' \
//!   -d '{"method":"find","meta":{"kind":"User","gid":"u1"}}'
//! ```

use example::{Store, directory};
use mpi_core::TracingConfig;
use std::sync::Arc;

/// Environment variable holding the listen address.
const BIND_ENV: &str = "MPI_BIND_ADDR";

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    TracingConfig::from_env().init();

    let addr = std::env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let domain = Arc::new(directory(Arc::new(Store::seeded())));

    if let Err(err) = mpi_remote::server::serve(addr.as_str(), domain).await {
        tracing::error!(%addr, error = %err, "server stopped");
        std::process::exit(1);
    }
}
