//! Example user directory exposed as an `mpi` domain.
//!
//! | Call | Meta | Result |
//! |------|------|--------|
//! | `call("find")` | `User` with `gid` | the record, or a 404 |
//! | `call("list")` | `User`, options `limit` | `Users` with a list |
//! | `call("create")` | `User` with a `name` attr | the stored record |
//! | `call("delete")` | `User` with `gid` | the removed record, or a 404 |
//! | `ctrl("stats")` | Nil | `Stats` with a `users` count |
//! | `ctrl("close")` | Nil | Nil; clears the store |

pub mod store;

pub use store::Store;

use mpi_domain::{ACTOR_KIND, ActorError, ActorTable, Domain, FnActor};
use mpi_meta::{Meta, bad_request, not_found};
use std::sync::Arc;

/// Kind of the records served.
pub const USER: &str = "User";

/// Default number of records returned by `list`.
pub const DEFAULT_LIMIT: i64 = 50;

fn gid_of(meta: &Meta) -> Result<String, ActorError> {
    meta.gid()
        .map(str::to_string)
        .ok_or_else(|| bad_request("missing gid").into())
}

async fn find(store: Arc<Store>, meta: Meta) -> Result<Meta, ActorError> {
    let gid = gid_of(&meta)?;
    store
        .get(&gid)
        .ok_or_else(|| not_found(format!("no user {gid}")).into())
}

async fn list(store: Arc<Store>, options: Meta) -> Result<Meta, ActorError> {
    let limit = options.int_attr_or("limit", DEFAULT_LIMIT).max(0);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    Ok(Meta::new("Users").with_list(store.list(limit)))
}

async fn create(store: Arc<Store>, meta: Meta) -> Result<Meta, ActorError> {
    if !meta.has_attr("name") {
        return Err(bad_request("a user needs a name").into());
    }
    Ok(store.insert(meta))
}

async fn delete(store: Arc<Store>, meta: Meta) -> Result<Meta, ActorError> {
    let gid = gid_of(&meta)?;
    store
        .remove(&gid)
        .ok_or_else(|| not_found(format!("no user {gid}")).into())
}

async fn stats(store: Arc<Store>) -> Result<Meta, ActorError> {
    Ok(Meta::new("Stats").with_attr("users", store.len()))
}

/// Builds the directory domain over `store`.
pub fn directory(store: Arc<Store>) -> Domain {
    let users = {
        let (s1, s2, s3, s4) = (
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
        );
        ActorTable::new(USER)
            .on("find", move |meta, _| find(Arc::clone(&s1), meta))
            .on("list", move |_, options| list(Arc::clone(&s2), options))
            .on("create", move |meta, _| create(Arc::clone(&s3), meta))
            .on("delete", move |meta, _| delete(Arc::clone(&s4), meta))
            .into_actors()
    };

    let stats_ctrl = {
        let store = Arc::clone(&store);
        FnActor::new(Meta::new(ACTOR_KIND).with_method("stats"), move |_, _| {
            stats(Arc::clone(&store))
        })
    };

    Domain::builder()
        .with_meta(Meta::new("Domain").with_ns("directory"))
        .with_actors(users)
        .with_ctrl(stats_ctrl)
        .with_closer(move || {
            let store = Arc::clone(&store);
            async move {
                tracing::info!(users = store.len(), "dropping directory records");
                store.clear();
            }
        })
        .build()
}
