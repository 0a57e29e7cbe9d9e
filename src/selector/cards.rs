//! Card-boundary candidates and the structural fallback.
//!
//! Candidates are ordered most specific first. Markup shape differs between
//! the full map client, the lightweight client, search-embedded panels and
//! schema.org-annotated mirrors; the broadest catch-all comes last.

use std::collections::{HashMap, HashSet};

use dom_query::{Document, NodeId, NodeRef, Selection};

use super::{CardSelector, SelectorSource};
use crate::dom;
use crate::patterns::{CSS_IDENT, STAR_LABEL};

/// Card-boundary descriptors, highest priority first.
pub const CARD_CANDIDATES: &[&str] = &[
    "div.jftiEf[data-review-id]",
    "div[data-review-id][aria-label][jsaction]",
    "div.gws-localreviews__google-review",
    "div.WMbnJf",
    "[itemprop='review']",
    "div[data-review-id]",
];

/// Scrollable review panel descriptors, highest priority first.
pub const SCROLL_CONTAINERS: &[&str] = &[
    "div.m6QErb.DxyBCb.kA9KIf.dS8AEf",
    "div.m6QErb[tabindex='-1']",
    "div.review-dialog-list",
    "[role='feed']",
];

/// Ancestor walks stop at these tags.
const WALK_STOP_TAGS: &[&str] = &["body", "html"];

/// Rule: element carries an accessible star-rating label.
#[must_use]
pub fn is_rating_indicator(sel: &Selection) -> bool {
    sel.attr("aria-label")
        .is_some_and(|label| STAR_LABEL.is_match(&label))
}

#[derive(Default)]
struct ShapeStats<'a> {
    nodes: Vec<NodeRef<'a>>,
    ids: HashSet<NodeId>,
    covered: usize,
    hops: usize,
}

fn shape_key(node: &NodeRef) -> Option<String> {
    let sel = Selection::from(*node);
    let tag = dom::tag_name(&sel)?;
    let class = dom::primary_class(&sel)?;
    CSS_IDENT.is_match(&class).then(|| format!("{tag}.{class}"))
}

fn is_nested(stats: &ShapeStats) -> bool {
    stats.nodes.iter().any(|node| {
        let mut current = node.parent();
        while let Some(parent) = current {
            if stats.ids.contains(&parent.id) {
                return true;
            }
            current = parent.parent();
        }
        false
    })
}

/// Synthesize a card descriptor from the repeated container around rating indicators.
///
/// Every ancestor of every rating indicator is keyed by `tag.primary-class`.
/// Among keys with at least two non-nested elements, the winner covers the
/// most indicators, then has the most elements, then sits furthest from the
/// indicators (the card rather than a wrapper inside it).
#[must_use]
pub fn structural_candidate(doc: &Document) -> Option<CardSelector> {
    let root = doc.select("html");
    let indicators = super::query_all(&root, is_rating_indicator);
    if indicators.len() < 2 {
        return None;
    }

    let mut shapes: HashMap<String, ShapeStats> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for indicator in &indicators {
        let Some(start) = indicator.nodes().first().copied() else {
            continue;
        };
        let mut counted: HashSet<String> = HashSet::new();
        let mut hops = 0;
        let mut current = start.parent();

        while let Some(node) = current {
            hops += 1;
            let sel = Selection::from(node);
            if dom::tag_name(&sel).is_none_or(|t| WALK_STOP_TAGS.contains(&t.as_str())) {
                break;
            }
            if let Some(key) = shape_key(&node) {
                let stats = shapes.entry(key.clone()).or_insert_with(|| {
                    order.push(key.clone());
                    ShapeStats {
                        hops,
                        ..ShapeStats::default()
                    }
                });
                if stats.ids.insert(node.id) {
                    stats.nodes.push(node);
                }
                if counted.insert(key) {
                    stats.covered += 1;
                    stats.hops = stats.hops.min(hops);
                }
            }
            current = node.parent();
        }
    }

    let mut best: Option<(&String, (usize, usize, usize))> = None;
    for key in &order {
        let Some(stats) = shapes.get(key) else {
            continue;
        };
        if stats.nodes.len() < 2 || is_nested(stats) {
            continue;
        }
        let score = (stats.covered, stats.nodes.len(), stats.hops);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((key, score));
        }
    }

    best.map(|(key, _)| CardSelector {
        css: key.clone(),
        source: SelectorSource::Structural,
    })
}

/// Descriptor for the element to scroll so more cards load.
///
/// Prefers a known review panel; otherwise the direct parent of the cards;
/// otherwise the document element.
#[must_use]
pub fn scroll_container(doc: &Document, cards: Option<&CardSelector>) -> String {
    let root = doc.select("html");
    for css in SCROLL_CONTAINERS {
        if dom::count(&root, css) > 0 {
            return (*css).to_string();
        }
    }
    if let Some(selector) = cards {
        let parent_css = format!("*:has(> {})", selector.css);
        if dom::count(&root, &parent_css) > 0 {
            return parent_css;
        }
    }
    "html".to_string()
}
