//! Immutable, self-describing data envelope.
//!
//! A [`Meta`] carries a `kind`, optional `method`/`ns`/`gid`/`payload`, string
//! tags and attributes, named subs and rels, and an ordered list. It is the
//! single value type used for requests, results and errors throughout `mpi`.
//!
//! # Overview
//!
//! - **Immutable**: builders return new values; children are shared.
//! - **Nil instead of null**: the empty kind is the absent value, so
//!   lookups such as [`Meta::sub`] never return an `Option`.
//! - **Errors are data**: an error is a Meta of kind `"Error"` with `message`
//!   and `code` attributes (see [`error`]).
//! - **Permissive JSON**: [`to_meta_ok`] turns any JSON value into a Meta,
//!   collapsing bad shapes to Nil.
//!
//! # Example
//!
//! ```
//! use mpi_meta::{Meta, parse_meta};
//!
//! let order = Meta::new("Order")
//!     .with_gid("o-17")
//!     .with_tag("cat", "retail")
//!     .with_attr("total", 129)
//!     .with_rel("customer", Meta::new("User").with_gid("u1"));
//!
//! let (back, ok) = parse_meta(&order.json()).unwrap();
//! assert!(ok);
//! assert_eq!(back, order);
//! assert_eq!(back.int_attr("total"), Some(129));
//! ```

pub mod attr;
pub mod error;
mod json;
mod meta;
mod visit;

pub use attr::AttrValue;
pub use error::{
    HttpCode, MetaError, bad_request, forbidden, new_error, not_found, server_error, unauthorized,
};
pub use json::{parse_meta, to_meta, to_meta_list, to_meta_map, to_meta_ok};
pub use meta::{
    ERROR_KIND, Meta, MetaConfig, MetaMap, OPTIONS_KIND, StrMap, first_attr, first_is, first_meta,
    new_meta, simple_meta,
};
pub use visit::Visitor;
