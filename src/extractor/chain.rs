//! Ordered fallback chains.
//!
//! A field is read by trying a fixed sequence of named candidate extractors
//! and keeping the first plausible value. Each link is an ordinary function,
//! so every fallback can be tested on its own.

use std::collections::HashSet;

use dom_query::{NodeId, Selection};

/// One candidate extractor: returns `Some` only for a plausible value.
pub type Extract<T> = fn(&Scope<'_>) -> Option<T>;

/// The subtree a chain reads, plus the nodes its links must not read from.
///
/// Exclusion sets are filled once per card and shared by every link.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    pub root: Selection<'a>,
    /// Nodes of nested blocks that carry their own fields.
    pub nested: HashSet<NodeId>,
    /// Byline nodes (author, reviewer info, date). Only free-text scans skip them.
    pub byline: HashSet<NodeId>,
}

impl<'a> Scope<'a> {
    /// A scope with nothing excluded.
    #[must_use]
    pub fn new(root: &Selection<'a>) -> Self {
        Self {
            root: root.clone(),
            nested: HashSet::new(),
            byline: HashSet::new(),
        }
    }
}

/// A named chain link.
pub struct Link<T: 'static> {
    pub name: &'static str,
    pub extract: Extract<T>,
}

/// A value together with the link that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub link: &'static str,
}

/// An ordered list of links for one field.
pub struct Chain<T: 'static> {
    pub field: &'static str,
    pub links: &'static [Link<T>],
}

impl<T> Chain<T> {
    /// Run links in order against `scope`; first `Some` wins.
    #[must_use]
    pub fn resolve(&self, scope: &Scope) -> Option<Resolved<T>> {
        self.links.iter().find_map(|link| {
            (link.extract)(scope).map(|value| Resolved {
                value,
                link: link.name,
            })
        })
    }

    /// Like [`Chain::resolve`] without the link name.
    #[must_use]
    pub fn value(&self, scope: &Scope) -> Option<T> {
        self.resolve(scope).map(|r| r.value)
    }
}
