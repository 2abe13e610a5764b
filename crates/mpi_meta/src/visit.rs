//! Pre-order traversal of a [`Meta`].

use crate::meta::Meta;
use core::fmt;

/// Callbacks invoked by [`Meta::walk`].
///
/// The call order is fixed: `begin_meta`, every tag, every attribute, every
/// sub, every rel, every list item by index, then `end_meta`. Maps are visited
/// in insertion order. The walk does not descend on its own; a visitor that
/// wants the whole tree calls `walk` on the children it is handed.
#[expect(unused_variables, reason = "default no-op callbacks")]
pub trait Visitor {
    /// Start of a node.
    fn begin_meta(
        &mut self,
        meta: &Meta,
        kind: &str,
        method: Option<&str>,
        ns: Option<&str>,
        gid: Option<&str>,
    ) {
    }

    /// One tag.
    fn on_tag(&mut self, meta: &Meta, name: &str, value: &str) {}

    /// One attribute.
    fn on_attr(&mut self, meta: &Meta, name: &str, value: &str) {}

    /// One named sub.
    fn on_sub(&mut self, meta: &Meta, name: &str, sub: &Meta) {}

    /// One named rel.
    fn on_rel(&mut self, meta: &Meta, name: &str, rel: &Meta) {}

    /// One list item.
    fn on_list_item(&mut self, meta: &Meta, index: usize, item: &Meta) {}

    /// End of a node.
    fn end_meta(&mut self, meta: &Meta) {}
}

impl Meta {
    /// Visits this node with `visitor`. See [`Visitor`] for the call order.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.begin_meta(self, self.kind(), self.method(), self.ns(), self.gid());
        for (name, value) in self.tags() {
            visitor.on_tag(self, name, value);
        }
        for (name, value) in self.attrs() {
            visitor.on_attr(self, name, value);
        }
        for (name, sub) in self.subs() {
            visitor.on_sub(self, name, sub);
        }
        for (name, rel) in self.rels() {
            visitor.on_rel(self, name, rel);
        }
        for (index, item) in self.list().iter().enumerate() {
            visitor.on_list_item(self, index, item);
        }
        visitor.end_meta(self);
    }
}

/// Renders the compact one-line form used in log fields.
struct Compact<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    result: fmt::Result,
    tags: usize,
    attrs: usize,
}

impl Compact<'_, '_> {
    fn write(&mut self, args: fmt::Arguments<'_>) {
        if self.result.is_ok() {
            self.result = self.f.write_fmt(args);
        }
    }

    fn close_groups(&mut self) {
        if self.tags > 0 {
            self.write(format_args!("]"));
            self.tags = 0;
        }
    }
}

impl Visitor for Compact<'_, '_> {
    fn begin_meta(
        &mut self,
        _meta: &Meta,
        kind: &str,
        method: Option<&str>,
        ns: Option<&str>,
        gid: Option<&str>,
    ) {
        if kind.is_empty() {
            self.write(format_args!("Nil"));
            return;
        }
        if let Some(ns) = ns {
            self.write(format_args!("{ns}:"));
        }
        self.write(format_args!("{kind}"));
        if let Some(method) = method {
            self.write(format_args!(".{method}"));
        }
        if let Some(gid) = gid {
            self.write(format_args!("#{gid}"));
        }
    }

    fn on_tag(&mut self, _meta: &Meta, name: &str, value: &str) {
        let sep = if self.tags == 0 { "[" } else { "," };
        self.write(format_args!("{sep}{name}={value}"));
        self.tags += 1;
    }

    fn on_attr(&mut self, _meta: &Meta, name: &str, value: &str) {
        self.close_groups();
        let sep = if self.attrs == 0 { "{" } else { "," };
        self.write(format_args!("{sep}{name}={value}"));
        self.attrs += 1;
    }

    // Children are summarized as counts, not rendered.
    fn end_meta(&mut self, meta: &Meta) {
        self.close_groups();
        if self.attrs > 0 {
            self.write(format_args!("}}"));
        }
        let counts = [
            ("subs", meta.subs().len()),
            ("rels", meta.rels().len()),
            ("list", meta.list().len()),
        ];
        for (label, n) in counts {
            if n > 0 {
                self.write(format_args!(" {label}:{n}"));
            }
        }
    }
}

/// One-line summary: `ns:Kind.method#gid[tag=v]{attr=v} subs:1 rels:1 list:2`.
impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut compact = Compact {
            f,
            result: Ok(()),
            tags: 0,
            attrs: 0,
        };
        self.walk(&mut compact);
        compact.result
    }
}
