//! Shared service infrastructure for `mpi`.
//!
//! Currently this is the `tracing` subscriber setup used by binaries that
//! host domains; libraries only emit events and never install a subscriber.

mod logging;

pub use logging::{LOG_ENV, LOG_FORMAT_ENV, TracingConfig, TracingFormat, UnknownFormat};
