//! The [`Meta`] envelope: accessors, builders and subtype checks.

use crate::attr::{self, AttrValue};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::{Arc, LazyLock};

/// Kind of error values.
pub const ERROR_KIND: &str = "Error";

/// Kind of the empty-options sentinel.
pub const OPTIONS_KIND: &str = "Options";

/// Ordered string map used for tags and attributes.
pub type StrMap = IndexMap<String, String>;

/// Ordered map of named Metas used for subs and rels.
pub type MetaMap = IndexMap<String, Meta>;

static NIL: LazyLock<Meta> = LazyLock::new(|| Meta::new(""));
static OPTIONS: LazyLock<Meta> = LazyLock::new(|| Meta::new(OPTIONS_KIND));

/// Plain field set for building a [`Meta`] in one go.
///
/// Empty strings in the optional fields are treated as absent.
///
/// ```
/// use mpi_meta::{Meta, MetaConfig};
///
/// let m = Meta::from(MetaConfig {
///     kind: "User".into(),
///     gid: Some("u1".into()),
///     ..Default::default()
/// });
/// assert_eq!(m.gid(), Some("u1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetaConfig {
    /// Primary type tag. Empty means Nil.
    pub kind: String,
    /// Method name.
    pub method: Option<String>,
    /// Namespace.
    pub ns: Option<String>,
    /// Global identifier.
    pub gid: Option<String>,
    /// Opaque serialized data.
    pub payload: Option<String>,
    /// Classification labels.
    pub tags: StrMap,
    /// String attributes.
    pub attrs: StrMap,
    /// Named child nodes.
    pub subs: MetaMap,
    /// Named related nodes.
    pub rels: MetaMap,
    /// Ordered child nodes.
    pub list: Vec<Meta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MetaNode {
    pub(crate) kind: String,
    pub(crate) method: Option<String>,
    pub(crate) ns: Option<String>,
    pub(crate) gid: Option<String>,
    pub(crate) payload: Option<String>,
    pub(crate) tags: StrMap,
    pub(crate) attrs: StrMap,
    pub(crate) subs: MetaMap,
    pub(crate) rels: MetaMap,
    pub(crate) list: Vec<Meta>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// An immutable, self-describing data node.
///
/// A Meta has a `kind`, optional `method`/`ns`/`gid`/`payload`, string
/// `tags` and `attrs`, named `subs` and `rels`, and an ordered `list`.
/// Every `with_*`/`set_*`/`del_*` call returns a new Meta and leaves the
/// receiver untouched. Cloning is cheap: the node is shared and child
/// Metas are shared between versions.
///
/// The empty kind is [`Nil`](Meta::nil), the universal absent value.
///
/// ```
/// use mpi_meta::Meta;
///
/// let user = Meta::new("User").with_gid("u1").with_tag("role", "admin");
/// let renamed = user.with_tag("role", "owner");
///
/// assert_eq!(user.tag("role"), Some("admin"));
/// assert_eq!(renamed.tag("role"), Some("owner"));
/// ```
#[derive(Clone)]
pub struct Meta(pub(crate) Arc<MetaNode>);

impl From<MetaConfig> for Meta {
    fn from(config: MetaConfig) -> Self {
        Self(Arc::new(MetaNode {
            kind: config.kind,
            method: non_empty(config.method),
            ns: non_empty(config.ns),
            gid: non_empty(config.gid),
            payload: non_empty(config.payload),
            tags: config.tags,
            attrs: config.attrs,
            subs: config.subs,
            rels: config.rels,
            list: config.list,
        }))
    }
}

/// Handlers that produce nothing yield Nil.
impl From<()> for Meta {
    fn from((): ()) -> Self {
        Meta::nil()
    }
}

/// `None` collapses to Nil.
impl From<Option<Meta>> for Meta {
    fn from(value: Option<Meta>) -> Self {
        value.unwrap_or_else(Meta::nil)
    }
}

impl Default for Meta {
    fn default() -> Self {
        Meta::nil()
    }
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Meta {}

impl core::fmt::Debug for Meta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let node = &*self.0;
        let mut s = f.debug_struct("Meta");
        s.field("kind", &node.kind);
        if let Some(method) = &node.method {
            s.field("method", method);
        }
        if let Some(ns) = &node.ns {
            s.field("ns", ns);
        }
        if let Some(gid) = &node.gid {
            s.field("gid", gid);
        }
        if let Some(payload) = &node.payload {
            s.field("payload", payload);
        }
        if !node.tags.is_empty() {
            s.field("tags", &node.tags);
        }
        if !node.attrs.is_empty() {
            s.field("attrs", &node.attrs);
        }
        if !node.subs.is_empty() {
            s.field("subs", &node.subs);
        }
        if !node.rels.is_empty() {
            s.field("rels", &node.rels);
        }
        if !node.list.is_empty() {
            s.field("list", &node.list);
        }
        s.finish()
    }
}

impl Meta {
    /// Creates a Meta of the given kind with no other fields.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Arc::new(MetaNode {
            kind: kind.into(),
            ..MetaNode::default()
        }))
    }

    /// Returns the shared Nil value.
    #[must_use]
    pub fn nil() -> Self {
        NIL.clone()
    }

    /// Returns a `'static` reference to Nil, for accessors that hand out borrows.
    #[must_use]
    pub fn nil_ref() -> &'static Meta {
        &NIL
    }

    /// Returns the empty `"Options"` sentinel.
    #[must_use]
    pub fn options() -> Self {
        OPTIONS.clone()
    }

    fn rebuild(&self, f: impl FnOnce(&mut MetaNode)) -> Meta {
        let mut node = (*self.0).clone();
        f(&mut node);
        Meta(Arc::new(node))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fields
    // ─────────────────────────────────────────────────────────────────────

    /// Primary type tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    /// Method name, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.0.method.as_deref()
    }

    /// Namespace, if any.
    #[must_use]
    pub fn ns(&self) -> Option<&str> {
        self.0.ns.as_deref()
    }

    /// Global identifier, if any.
    #[must_use]
    pub fn gid(&self) -> Option<&str> {
        self.0.gid.as_deref()
    }

    /// Opaque payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.0.payload.as_deref()
    }

    /// All tags, in insertion order.
    #[must_use]
    pub fn tags(&self) -> &StrMap {
        &self.0.tags
    }

    /// All attributes, in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &StrMap {
        &self.0.attrs
    }

    /// All subs, in insertion order.
    #[must_use]
    pub fn subs(&self) -> &MetaMap {
        &self.0.subs
    }

    /// All rels, in insertion order.
    #[must_use]
    pub fn rels(&self) -> &MetaMap {
        &self.0.rels
    }

    /// The ordered list.
    #[must_use]
    pub fn list(&self) -> &[Meta] {
        &self.0.list
    }

    // ─────────────────────────────────────────────────────────────────────
    // Classification
    // ─────────────────────────────────────────────────────────────────────

    /// True for the empty kind.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.kind.is_empty()
    }

    /// True for kind `"Error"`.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.0.kind == ERROR_KIND
    }

    /// True when neither Nil nor an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_nil() && !self.is_error()
    }

    /// True when kind and namespace match and every given tag is present.
    ///
    /// An empty `ns` matches a Meta without a namespace.
    pub fn is<K, V>(&self, kind: &str, ns: &str, tags: impl IntoIterator<Item = (K, V)>) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.kind() == kind && self.ns().unwrap_or("") == ns && self.has_tags(tags)
    }

    /// Returns the message and numeric code of an error Meta.
    ///
    /// A missing or non-numeric `code` attribute falls back to `default_code`.
    #[must_use]
    pub fn parse_error(&self, default_code: u16) -> (String, u16) {
        let message = self.attr_or("message", "").to_string();
        let code = self
            .attr("code")
            .and_then(|code| code.trim().parse::<u16>().ok())
            .unwrap_or(default_code);
        (message, code)
    }

    /// True if `self` is a structural supertype of `other`.
    ///
    /// Kinds must be equal and every tag on `self` must be present with the
    /// same value on `other`. Fewer tags generalize more.
    #[must_use]
    pub fn generalizes(&self, other: &Meta) -> bool {
        self.kind() == other.kind()
            && self
                .tags()
                .iter()
                .all(|(k, v)| other.tag(k) == Some(v.as_str()))
    }

    /// Inverse of [`generalizes`](Self::generalizes).
    #[must_use]
    pub fn specializes(&self, other: &Meta) -> bool {
        other.generalizes(self)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tags
    // ─────────────────────────────────────────────────────────────────────

    /// Returns a tag value.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.0.tags.get(name).map(String::as_str)
    }

    /// Returns a tag value or `otherwise`.
    #[must_use]
    pub fn tag_or<'a>(&'a self, name: &str, otherwise: &'a str) -> &'a str {
        self.tag(name).unwrap_or(otherwise)
    }

    /// True if the tag exists.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.0.tags.contains_key(name)
    }

    /// True if the tag exists with exactly this value.
    #[must_use]
    pub fn has_tag_value(&self, name: &str, value: &str) -> bool {
        self.tag(name) == Some(value)
    }

    /// True if every entry is present with an equal value.
    pub fn has_tags<K, V>(&self, tags: impl IntoIterator<Item = (K, V)>) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        tags.into_iter()
            .all(|(k, v)| self.has_tag_value(k.as_ref(), v.as_ref()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.0.attrs.get(name).map(String::as_str)
    }

    /// Returns an attribute value or `otherwise`.
    #[must_use]
    pub fn attr_or<'a>(&'a self, name: &str, otherwise: &'a str) -> &'a str {
        self.attr(name).unwrap_or(otherwise)
    }

    /// True if the attribute exists.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.0.attrs.contains_key(name)
    }

    /// True if the attribute exists with exactly this value.
    #[must_use]
    pub fn has_attr_value(&self, name: &str, value: &str) -> bool {
        self.attr(name) == Some(value)
    }

    /// True if every entry is present with an equal value.
    pub fn has_attrs<K, V>(&self, attrs: impl IntoIterator<Item = (K, V)>) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        attrs
            .into_iter()
            .all(|(k, v)| self.has_attr_value(k.as_ref(), v.as_ref()))
    }

    /// Parses an attribute as a number.
    #[must_use]
    pub fn num_attr(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(attr::parse_num)
    }

    /// Parses an attribute as a number, falling back to `otherwise`.
    #[must_use]
    pub fn num_attr_or(&self, name: &str, otherwise: f64) -> f64 {
        self.num_attr(name).unwrap_or(otherwise)
    }

    /// Parses an attribute as an integral number.
    #[must_use]
    pub fn int_attr(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(attr::parse_int)
    }

    /// Parses an attribute as an integral number, falling back to `otherwise`.
    #[must_use]
    pub fn int_attr_or(&self, name: &str, otherwise: i64) -> i64 {
        self.int_attr(name).unwrap_or(otherwise)
    }

    /// Parses an attribute with the boolean vocabulary of [`attr::parse_bool`].
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        self.attr(name).and_then(attr::parse_bool)
    }

    /// Parses a boolean attribute, falling back to `otherwise`.
    #[must_use]
    pub fn bool_attr_or(&self, name: &str, otherwise: bool) -> bool {
        self.bool_attr(name).unwrap_or(otherwise)
    }

    /// Parses an attribute as a timestamp.
    #[must_use]
    pub fn date_attr(&self, name: &str) -> Option<DateTime<Utc>> {
        self.attr(name).and_then(attr::parse_date)
    }

    /// Parses a timestamp attribute, falling back to `otherwise`.
    #[must_use]
    pub fn date_attr_or(&self, name: &str, otherwise: DateTime<Utc>) -> DateTime<Utc> {
        self.date_attr(name).unwrap_or(otherwise)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subs, rels, list
    // ─────────────────────────────────────────────────────────────────────

    /// Returns a named sub, or Nil.
    #[must_use]
    pub fn sub(&self, name: &str) -> &Meta {
        self.0.subs.get(name).unwrap_or(Meta::nil_ref())
    }

    /// True if the sub exists.
    #[must_use]
    pub fn has_sub(&self, name: &str) -> bool {
        self.0.subs.contains_key(name)
    }

    /// Returns a named rel, or Nil.
    #[must_use]
    pub fn rel(&self, name: &str) -> &Meta {
        self.0.rels.get(name).unwrap_or(Meta::nil_ref())
    }

    /// True if the rel exists.
    #[must_use]
    pub fn has_rel(&self, name: &str) -> bool {
        self.0.rels.contains_key(name)
    }

    /// Returns the list item at `index`, or Nil.
    #[must_use]
    pub fn list_item(&self, index: usize) -> &Meta {
        self.0.list.get(index).unwrap_or(Meta::nil_ref())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Builders
    // ─────────────────────────────────────────────────────────────────────

    /// Returns a copy with a different kind.
    #[must_use]
    pub fn with_kind(&self, kind: impl Into<String>) -> Meta {
        let kind = kind.into();
        self.rebuild(|node| node.kind = kind)
    }

    /// Returns a copy with a different method. Empty clears it.
    #[must_use]
    pub fn with_method(&self, method: impl Into<String>) -> Meta {
        let method = non_empty(Some(method.into()));
        self.rebuild(|node| node.method = method)
    }

    /// Returns a copy with a different namespace. Empty clears it.
    #[must_use]
    pub fn with_ns(&self, ns: impl Into<String>) -> Meta {
        let ns = non_empty(Some(ns.into()));
        self.rebuild(|node| node.ns = ns)
    }

    /// Returns a copy with a different global identifier. Empty clears it.
    #[must_use]
    pub fn with_gid(&self, gid: impl Into<String>) -> Meta {
        let gid = non_empty(Some(gid.into()));
        self.rebuild(|node| node.gid = gid)
    }

    /// Returns a copy with a different payload. Empty clears it.
    #[must_use]
    pub fn with_payload(&self, payload: impl Into<String>) -> Meta {
        let payload = non_empty(Some(payload.into()));
        self.rebuild(|node| node.payload = payload)
    }

    /// Returns a copy with one tag added or replaced.
    #[must_use]
    pub fn with_tag(&self, name: impl Into<String>, value: impl Into<String>) -> Meta {
        let (name, value) = (name.into(), value.into());
        self.rebuild(|node| {
            node.tags.insert(name, value);
        })
    }

    /// Returns a copy with the given tags merged over the existing ones.
    #[must_use]
    pub fn with_tags<K, V>(&self, tags: impl IntoIterator<Item = (K, V)>) -> Meta
    where
        K: Into<String>,
        V: Into<String>,
    {
        let tags: Vec<(String, String)> = tags
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if tags.is_empty() {
            return self.clone();
        }
        self.rebuild(|node| node.tags.extend(tags))
    }

    /// Returns a copy whose tags are exactly the given ones.
    #[must_use]
    pub fn set_tags<K, V>(&self, tags: impl IntoIterator<Item = (K, V)>) -> Meta
    where
        K: Into<String>,
        V: Into<String>,
    {
        let tags = tags
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.rebuild(|node| node.tags = tags)
    }

    /// Returns a copy without the named tag.
    #[must_use]
    pub fn del_tag(&self, name: &str) -> Meta {
        self.del_tags([name])
    }

    /// Returns a copy without the named tags.
    #[must_use]
    pub fn del_tags<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Meta {
        let names: Vec<&str> = names.into_iter().collect();
        if names.is_empty() {
            return self.clone();
        }
        self.rebuild(|node| {
            for name in names {
                node.tags.shift_remove(name);
            }
        })
    }

    /// Returns a copy with one attribute added or replaced.
    ///
    /// An absent value (`None`) leaves the Meta unchanged.
    #[must_use]
    pub fn with_attr(&self, name: impl Into<String>, value: impl AttrValue) -> Meta {
        match value.into_attr() {
            Some(value) => {
                let name = name.into();
                self.rebuild(|node| {
                    node.attrs.insert(name, value);
                })
            }
            None => self.clone(),
        }
    }

    /// Returns a copy with the given attributes merged over the existing ones.
    ///
    /// Absent values are dropped.
    #[must_use]
    pub fn with_attrs<K, V>(&self, attrs: impl IntoIterator<Item = (K, V)>) -> Meta
    where
        K: Into<String>,
        V: AttrValue,
    {
        let attrs: Vec<(String, String)> = attrs
            .into_iter()
            .filter_map(|(k, v)| v.into_attr().map(|v| (k.into(), v)))
            .collect();
        if attrs.is_empty() {
            return self.clone();
        }
        self.rebuild(|node| node.attrs.extend(attrs))
    }

    /// Returns a copy whose attributes are exactly the given ones.
    #[must_use]
    pub fn set_attrs<K, V>(&self, attrs: impl IntoIterator<Item = (K, V)>) -> Meta
    where
        K: Into<String>,
        V: AttrValue,
    {
        let attrs = attrs
            .into_iter()
            .filter_map(|(k, v)| v.into_attr().map(|v| (k.into(), v)))
            .collect();
        self.rebuild(|node| node.attrs = attrs)
    }

    /// Returns a copy without the named attribute.
    #[must_use]
    pub fn del_attr(&self, name: &str) -> Meta {
        self.del_attrs([name])
    }

    /// Returns a copy without the named attributes.
    #[must_use]
    pub fn del_attrs<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Meta {
        let names: Vec<&str> = names.into_iter().collect();
        if names.is_empty() {
            return self.clone();
        }
        self.rebuild(|node| {
            for name in names {
                node.attrs.shift_remove(name);
            }
        })
    }

    /// Returns a copy with one sub added or replaced.
    #[must_use]
    pub fn with_sub(&self, name: impl Into<String>, sub: Meta) -> Meta {
        let name = name.into();
        self.rebuild(|node| {
            node.subs.insert(name, sub);
        })
    }

    /// Returns a copy with the given subs merged over the existing ones.
    #[must_use]
    pub fn with_subs<K: Into<String>>(&self, subs: impl IntoIterator<Item = (K, Meta)>) -> Meta {
        let subs = subs.into_iter().map(|(k, m)| (k.into(), m));
        self.rebuild(|node| node.subs.extend(subs))
    }

    /// Returns a copy without the named sub.
    #[must_use]
    pub fn del_sub(&self, name: &str) -> Meta {
        self.rebuild(|node| {
            node.subs.shift_remove(name);
        })
    }

    /// Returns a copy with one rel added or replaced.
    #[must_use]
    pub fn with_rel(&self, name: impl Into<String>, rel: Meta) -> Meta {
        let name = name.into();
        self.rebuild(|node| {
            node.rels.insert(name, rel);
        })
    }

    /// Returns a copy with the given rels merged over the existing ones.
    #[must_use]
    pub fn with_rels<K: Into<String>>(&self, rels: impl IntoIterator<Item = (K, Meta)>) -> Meta {
        let rels = rels.into_iter().map(|(k, m)| (k.into(), m));
        self.rebuild(|node| node.rels.extend(rels))
    }

    /// Returns a copy without the named rel.
    #[must_use]
    pub fn del_rel(&self, name: &str) -> Meta {
        self.rebuild(|node| {
            node.rels.shift_remove(name);
        })
    }

    /// Returns a copy whose list is replaced by `items`.
    #[must_use]
    pub fn with_list(&self, items: impl IntoIterator<Item = Meta>) -> Meta {
        let list = items.into_iter().collect();
        self.rebuild(|node| node.list = list)
    }

    /// Like [`with_list`](Self::with_list), dropping Nil items.
    #[must_use]
    pub fn with_list_trimmed(&self, items: impl IntoIterator<Item = Meta>) -> Meta {
        self.with_list(items.into_iter().filter(|m| !m.is_nil()))
    }
}

/// Creates a Meta from kind, optional method and tags.
///
/// ```
/// use mpi_meta::simple_meta;
///
/// let m = simple_meta("Actor", Some("find"), [("target", "User")]);
/// assert_eq!(m.method(), Some("find"));
/// assert_eq!(m.tag("target"), Some("User"));
/// ```
pub fn simple_meta<K, V>(
    kind: impl Into<String>,
    method: Option<&str>,
    tags: impl IntoIterator<Item = (K, V)>,
) -> Meta
where
    K: Into<String>,
    V: Into<String>,
{
    let meta = Meta::new(kind).with_tags(tags);
    match method {
        Some(method) => meta.with_method(method),
        None => meta,
    }
}

/// Creates a Meta from a config plus extra attributes.
pub fn new_meta<K, V>(config: MetaConfig, attrs: impl IntoIterator<Item = (K, V)>) -> Meta
where
    K: Into<String>,
    V: AttrValue,
{
    Meta::from(config).with_attrs(attrs)
}

/// First item, or Nil.
#[must_use]
pub fn first_meta(items: &[Meta]) -> &Meta {
    items.first().unwrap_or(Meta::nil_ref())
}

/// Attribute of the first item, or `otherwise`.
#[must_use]
pub fn first_attr<'a>(items: &'a [Meta], name: &str, otherwise: &'a str) -> &'a str {
    first_meta(items).attr_or(name, otherwise)
}

/// First item if it is non-Nil and matches [`Meta::is`], else Nil.
pub fn first_is<'a, K, V>(
    items: &'a [Meta],
    kind: &str,
    ns: &str,
    tags: impl IntoIterator<Item = (K, V)>,
) -> &'a Meta
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let first = first_meta(items);
    if !first.is_nil() && first.is(kind, ns, tags) {
        first
    } else {
        Meta::nil_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_leave_receiver_untouched() {
        let m = Meta::new("User").with_tag("a", "1");
        let before = m.tags().clone();
        let m2 = m.with_tag("b", "2").with_attr("x", 1).with_sub("s", Meta::new("S"));

        assert_eq!(m.tags(), &before);
        assert!(m.attrs().is_empty());
        assert!(!m.has_sub("s"));
        assert_ne!(m, m2);
        assert_eq!(m2.tag("b"), Some("2"));
    }

    #[test]
    fn nil_identity() {
        let nil = Meta::nil();
        assert!(nil.is_nil());
        assert_eq!(nil.kind(), "");
        assert!(!nil.is_valid());
        assert!(nil.with_tag("a", "b").is_nil());
        assert!(!nil.with_kind("User").is_nil());
    }

    #[test]
    fn empty_optional_fields_are_absent() {
        let m = Meta::new("User").with_gid("u1").with_gid("");
        assert_eq!(m.gid(), None);
        assert_eq!(Meta::new("User").with_method("").method(), None);
    }

    #[test]
    fn error_classification() {
        let err = Meta::new(ERROR_KIND).with_attr("message", "boom").with_attr("code", 404);
        assert!(err.is_error());
        assert!(!err.is_valid());
        assert_eq!(err.parse_error(400), ("boom".to_string(), 404));
        assert_eq!(
            Meta::new(ERROR_KIND).parse_error(500),
            (String::new(), 500)
        );
    }

    #[test]
    fn generalization_requires_same_kind() {
        let general = Meta::new("Item").with_tag("color", "red");
        let specific = general.with_tag("size", "L");

        assert!(general.generalizes(&specific));
        assert!(specific.specializes(&general));
        assert!(!specific.generalizes(&general));
        assert!(!general.generalizes(&specific.with_kind("Other")));
        assert!(!general.generalizes(&specific.with_tag("color", "blue")));
    }

    #[test]
    fn tag_checks() {
        let m = Meta::new("X").with_tags([("a", "1"), ("b", "2")]);
        assert!(m.has_tag("a"));
        assert!(!m.has_tag("c"));
        assert!(m.has_tag_value("b", "2"));
        assert!(!m.has_tag_value("b", "3"));
        assert!(m.has_tags([("a", "1"), ("b", "2")]));
        assert!(!m.has_tags([("a", "1"), ("c", "3")]));
        assert_eq!(m.tag_or("c", "none"), "none");
    }

    #[test]
    fn typed_attributes() {
        let m = Meta::new("X").with_attrs([
            ("n", "2.5"),
            ("i", "7"),
            ("b", "Yes"),
            ("bad", "x"),
            ("zero", "0"),
        ]);
        assert_eq!(m.num_attr("n"), Some(2.5));
        assert_eq!(m.int_attr("i"), Some(7));
        assert_eq!(m.int_attr("n"), None);
        assert_eq!(m.bool_attr("b"), Some(true));
        assert_eq!(m.bool_attr("bad"), None);
        assert_eq!(m.bool_attr("zero"), Some(false));
        assert_eq!(m.int_attr("zero"), Some(0));
        assert_eq!(m.int_attr_or("missing", 3), 3);
        assert!(m.bool_attr_or("missing", true));
    }

    #[test]
    fn merge_overrides_and_deletes() {
        let m = Meta::new("X")
            .with_tags([("a", "1"), ("b", "2")])
            .with_tags([("b", "3")]);
        assert_eq!(m.tag("b"), Some("3"));
        assert_eq!(m.del_tag("a").tags().len(), 1);

        let replaced = m.set_tags([("z", "9")]);
        assert_eq!(replaced.tags().len(), 1);
        assert_eq!(replaced.tag("z"), Some("9"));

        let attrs = Meta::new("X").with_attrs([("a", Some(1)), ("b", None)]);
        assert!(attrs.has_attr("a"));
        assert!(!attrs.has_attr("b"));
        assert!(!attrs.del_attr("a").has_attr("a"));
    }

    #[test]
    fn missing_children_are_nil() {
        let m = Meta::new("X").with_rel("target", Meta::new("User"));
        assert!(m.sub("nope").is_nil());
        assert_eq!(m.rel("target").kind(), "User");
        assert!(m.list_item(3).is_nil());
        assert!(!m.del_rel("target").has_rel("target"));
    }

    #[test]
    fn trimmed_list_drops_nil() {
        let m = Meta::new("Page").with_list_trimmed([Meta::new("A"), Meta::nil(), Meta::new("B")]);
        assert_eq!(m.list().len(), 2);
        assert_eq!(m.list_item(1).kind(), "B");
    }

    #[test]
    fn first_helpers() {
        let items = [Meta::new("User").with_attr("name", "ann").with_tag("role", "admin")];
        assert_eq!(first_attr(&items, "name", "-"), "ann");
        assert_eq!(first_is(&items, "User", "", [("role", "admin")]).kind(), "User");
        assert!(first_is(&items, "User", "crm", [("role", "admin")]).is_nil());
        assert!(first_meta(&[]).is_nil());
    }

    #[test]
    fn unit_and_none_convert_to_nil() {
        assert!(Meta::from(()).is_nil());
        assert!(Meta::from(None::<Meta>).is_nil());
        assert_eq!(Meta::from(Some(Meta::new("A"))).kind(), "A");
    }
}
