//! Self-describing data envelopes and domain dispatch, locally or over HTTP.
//!
//! ```
//! use mpi::prelude::*;
//!
//! # block_on(async {
//! let domain = Domain::builder()
//!     .with_actor(simple_finder("User", |m: Meta, _| async move {
//!         Ok(m.with_attr("name", "ann"))
//!     }))
//!     .build();
//!
//! let user = domain.find(Meta::new("User").with_gid("u1"), Meta::nil()).await;
//! assert_eq!(user.attr("name"), Some("ann"));
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub use mpi_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use mpi_internal::prelude::*;
}
