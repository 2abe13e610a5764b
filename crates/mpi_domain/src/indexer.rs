//! Lookup tables over a [`Domain`] tree.
//!
//! Keys use one canonical encoding:
//!
//! | Key | Shape | Example |
//! |-----|-------|---------|
//! | kind key | `[ns:]kind[[cat]]` | `shop:Item[a]` |
//! | method key | `kindKey.method` | `shop:Item[a].find` |
//! | ctrl key | `kindKey.method` or `method` | `close` |

use crate::actor::ActorRef;
use crate::domain::Domain;
use indexmap::IndexMap;
use indexmap::map::Entry;
use mpi_meta::Meta;

/// Tag naming an actor's target kind.
pub const TARGET: &str = "target";

/// Tag naming a category.
pub const CAT: &str = "cat";

fn with_cat(kind: String, cat: Option<&str>) -> String {
    match cat {
        Some(cat) if !cat.is_empty() => format!("{kind}[{cat}]"),
        _ => kind,
    }
}

/// Kind key of the call target described by `meta`.
///
/// ```
/// use mpi_domain::indexer::kind_key;
/// use mpi_meta::Meta;
///
/// assert_eq!(kind_key(&Meta::new("Item")), "Item");
/// assert_eq!(kind_key(&Meta::new("Item").with_tag("cat", "a")), "Item[a]");
/// assert_eq!(kind_key(&Meta::new("Item").with_ns("shop")), "shop:Item");
/// ```
#[must_use]
pub fn kind_key(meta: &Meta) -> String {
    let kind = match meta.ns() {
        Some(ns) => format!("{ns}:{}", meta.kind()),
        None => meta.kind().to_string(),
    };
    with_cat(kind, meta.tag(CAT))
}

/// Kind key an actor is indexed under, derived from its descriptor.
///
/// The `target` tag wins over the `target` rel; a rel with a namespace gives
/// `ns:kind`. The category comes from the descriptor's `cat` tag, else from
/// the rel's. Returns `None` for actors without a target.
#[must_use]
pub fn target_key(actor_meta: &Meta) -> Option<String> {
    let rel = actor_meta.rel(TARGET);
    let kind = match actor_meta.tag(TARGET).filter(|t| !t.is_empty()) {
        Some(target) => target.to_string(),
        None if !rel.is_nil() => match rel.ns() {
            Some(ns) => format!("{ns}:{}", rel.kind()),
            None => rel.kind().to_string(),
        },
        None => return None,
    };
    let cat = actor_meta.tag(CAT).or_else(|| rel.tag(CAT));
    Some(with_cat(kind, cat))
}

/// Joins a kind key and a method.
#[must_use]
pub fn method_key(kind_key: &str, method: &str) -> String {
    format!("{kind_key}.{method}")
}

/// Derived, read-only lookup tables for one [`Domain`].
///
/// Built by [`Indexer::build`]; obtained through [`Domain::indexer`], which
/// memoizes it.
#[derive(Clone, Default)]
pub struct Indexer {
    gid_actors: IndexMap<String, ActorRef>,
    kind_actor_lists: IndexMap<String, Vec<ActorRef>>,
    method_actors: IndexMap<String, ActorRef>,
    ctrl_actors: IndexMap<String, ActorRef>,
}

impl core::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Indexer")
            .field("gid_actors", &self.gid_actors.keys().collect::<Vec<_>>())
            .field(
                "kind_actor_lists",
                &self
                    .kind_actor_lists
                    .iter()
                    .map(|(k, v)| (k, v.len()))
                    .collect::<Vec<_>>(),
            )
            .field("method_actors", &self.method_actors.keys().collect::<Vec<_>>())
            .field("ctrl_actors", &self.ctrl_actors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Indexer {
    /// Builds the tables for `domain`.
    ///
    /// Own actors come first and win every first-writer contest; each
    /// sub-domain's (memoized) tables are then merged in declaration order.
    /// Controllers are indexed from the domain's own `ctrls` only.
    #[must_use]
    pub fn build(domain: &Domain) -> Self {
        let mut idx = Self::default();

        for actor in domain.actors() {
            let meta = actor.meta();
            if let Some(gid) = meta.gid() {
                idx.gid_actors
                    .entry(gid.to_string())
                    .or_insert_with(|| actor.clone());
            }

            let Some(kind) = target_key(meta) else {
                continue;
            };
            if let Some(method) = meta.method() {
                idx.method_actors
                    .entry(method_key(&kind, method))
                    .or_insert_with(|| actor.clone());
            }
            idx.kind_actor_lists
                .entry(kind)
                .or_default()
                .push(actor.clone());
        }

        for sub in domain.subs() {
            let sub_idx = sub.indexer();
            for (gid, actor) in &sub_idx.gid_actors {
                idx.gid_actors
                    .entry(gid.clone())
                    .or_insert_with(|| actor.clone());
            }
            for (kind, actors) in &sub_idx.kind_actor_lists {
                match idx.kind_actor_lists.entry(kind.clone()) {
                    Entry::Occupied(mut list) => list.get_mut().extend(actors.iter().cloned()),
                    Entry::Vacant(slot) => {
                        slot.insert(actors.clone());
                    }
                }
            }
            for (key, actor) in &sub_idx.method_actors {
                idx.method_actors
                    .entry(key.clone())
                    .or_insert_with(|| actor.clone());
            }
        }

        for actor in domain.ctrls() {
            let meta = actor.meta();
            let Some(method) = meta.method() else {
                continue;
            };
            let key = match target_key(meta) {
                Some(kind) => method_key(&kind, method),
                None => method.to_string(),
            };
            idx.ctrl_actors.entry(key).or_insert_with(|| actor.clone());
        }

        tracing::debug!(
            gids = idx.gid_actors.len(),
            kinds = idx.kind_actor_lists.len(),
            methods = idx.method_actors.len(),
            ctrls = idx.ctrl_actors.len(),
            "indexed domain"
        );
        idx
    }

    /// Actor registered under a global identifier.
    #[must_use]
    pub fn actor_with_gid(&self, gid: &str) -> Option<&ActorRef> {
        self.gid_actors.get(gid)
    }

    /// All actors targeting a kind key, own actors first. Empty if none.
    #[must_use]
    pub fn actors_with_kind(&self, kind_key: &str) -> &[ActorRef] {
        self.kind_actor_lists
            .get(kind_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Actor answering `kind_key.method`.
    #[must_use]
    pub fn actor_with_method(&self, kind_key: &str, method: &str) -> Option<&ActorRef> {
        self.method_actors.get(&method_key(kind_key, method))
    }

    /// Controller answering `kind_key.method`, or bare `method` without a kind.
    #[must_use]
    pub fn actor_with_ctrl(&self, method: &str, kind_key: Option<&str>) -> Option<&ActorRef> {
        match kind_key {
            Some(kind) => self.ctrl_actors.get(&method_key(kind, method)),
            None => self.ctrl_actors.get(method),
        }
    }

    /// The global-identifier table.
    #[must_use]
    pub fn gid_actors(&self) -> &IndexMap<String, ActorRef> {
        &self.gid_actors
    }

    /// The kind-list table.
    #[must_use]
    pub fn kind_actor_lists(&self) -> &IndexMap<String, Vec<ActorRef>> {
        &self.kind_actor_lists
    }

    /// The method table.
    #[must_use]
    pub fn method_actors(&self) -> &IndexMap<String, ActorRef> {
        &self.method_actors
    }

    /// The controller table.
    #[must_use]
    pub fn ctrl_actors(&self) -> &IndexMap<String, ActorRef> {
        &self.ctrl_actors
    }
}
