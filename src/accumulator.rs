//! Bounded, deduplicated, insertion-ordered collection of reviews.
//!
//! One `Accumulator` belongs to one extraction session. Extraction passes may
//! re-read cards that were already accepted, so duplicate suppression by
//! identity is required for correctness.

use std::collections::HashSet;

use crate::result::NormalizedReview;

/// Items carrying a review identity.
pub trait Identified {
    fn identity(&self) -> &str;
}

impl Identified for NormalizedReview {
    fn identity(&self) -> &str {
        &self.identity.value
    }
}

/// Outcome of offering one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    Duplicate,
    CapReached,
}

/// Insertion-ordered items with unique identities, never more than `cap`.
#[derive(Debug, Clone)]
pub struct Accumulator<T> {
    cap: usize,
    items: Vec<T>,
    seen: HashSet<String>,
}

impl<T: Identified> Accumulator<T> {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Offer an already-built item.
    pub fn offer(&mut self, item: T) -> Offer {
        let identity = item.identity().to_string();
        self.offer_with(&identity, || item)
    }

    /// Offer by identity, building the item only if it will be accepted.
    ///
    /// A full collection rejects with `CapReached` regardless of identity.
    pub fn offer_with(&mut self, identity: &str, build: impl FnOnce() -> T) -> Offer {
        if self.is_full() {
            return Offer::CapReached;
        }
        if self.seen.contains(identity) {
            return Offer::Duplicate;
        }
        self.seen.insert(identity.to_string());
        self.items.push(build());
        Offer::Accepted
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Hand the collection off, in first-seen order.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
