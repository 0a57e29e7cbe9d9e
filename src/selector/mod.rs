//! Selector Infrastructure
//!
//! Card-boundary resolution and the descriptor tables used by the field
//! extractor. Rules are plain predicate functions over a `Selection`; the
//! resolver tries a priority-ordered list of CSS candidates first and falls
//! back to a structural heuristic built on a rule.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

pub mod cards;
pub mod fields;

/// A selector rule that tests if a selection matches certain criteria.
pub type Rule = fn(&Selection) -> bool;

/// Query for first element matching the rule, in document order.
///
/// # Example
///
/// ```rust
/// use rs_placereviews::selector;
/// use rs_placereviews::dom;
///
/// let doc = dom::parse(r#"<div><p class="content">text</p></div>"#);
/// let root = doc.select("div");
///
/// fn has_content_class(sel: &dom_query::Selection) -> bool {
///     dom::class_name(sel).is_some_and(|c| c.contains("content"))
/// }
///
/// assert!(selector::query(&root, has_content_class).is_some());
/// ```
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .find(|sel| rule(sel))
}

/// Query for all elements matching the rule, in document order.
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| rule(sel))
        .collect()
}

/// Where an adopted card descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorSource {
    /// Entry of the fixed candidate list, with its priority index.
    Candidate(usize),
    /// Synthesized from the repeated container around rating indicators.
    Structural,
}

/// A card-boundary descriptor adopted for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSelector {
    /// CSS descriptor matching one element per review card.
    pub css: String,
    /// How the descriptor was obtained.
    pub source: SelectorSource,
}

impl CardSelector {
    /// Count the cards this descriptor matches in a snapshot.
    #[must_use]
    pub fn count(&self, doc: &Document) -> usize {
        crate::dom::count(&doc.select("html"), &self.css)
    }

    /// All cards this descriptor matches in a snapshot, in document order.
    #[must_use]
    pub fn cards<'a>(&self, doc: &'a Document) -> Vec<Selection<'a>> {
        crate::dom::query_all(&doc.select("html"), &self.css)
    }
}

/// Outcome of one resolution attempt.
///
/// `selector` is `None` (and `count` is 0) when neither a candidate nor the
/// structural heuristic matched anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub selector: Option<CardSelector>,
    pub count: usize,
}

impl Resolution {
    #[must_use]
    pub fn none() -> Self {
        Self {
            selector: None,
            count: 0,
        }
    }
}

/// Pick the best card-boundary descriptor for the current snapshot.
///
/// Tries [`cards::CARD_CANDIDATES`] in priority order and returns the first
/// with at least one match. Falls back to
/// [`cards::structural_candidate`], then to [`Resolution::none`].
#[must_use]
pub fn resolve(doc: &Document) -> Resolution {
    for (priority, css) in cards::CARD_CANDIDATES.iter().enumerate() {
        let selector = CardSelector {
            css: (*css).to_string(),
            source: SelectorSource::Candidate(priority),
        };
        let count = selector.count(doc);
        if count > 0 {
            return Resolution {
                selector: Some(selector),
                count,
            };
        }
    }

    if let Some(selector) = cards::structural_candidate(doc) {
        let count = selector.count(doc);
        if count > 0 {
            return Resolution {
                selector: Some(selector),
                count,
            };
        }
    }

    Resolution::none()
}
