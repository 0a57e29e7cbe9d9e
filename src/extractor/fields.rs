//! Per-field fallback chains.
//!
//! Every `Chain` below lists its links in the order they are tried. Card-level
//! links run against a [`Scope`] built by [`card_scope`]: they skip nodes that
//! belong to the owner-response block and the per-category rating rows, so a
//! card-level field never picks up text or stars from those sub-blocks.

use std::collections::{BTreeMap, HashSet};

use dom_query::{NodeId, Selection};

use super::chain::{Chain, Link, Scope};
use crate::dom;
use crate::patterns::{
    parse_count, DETAIL_ROW_TEXT, INTEGER, OUT_OF_FIVE, RELATIVE_TIME, REVIEW_COUNT, STAR_LABEL,
    TRUSTED_REVIEWER,
};
use crate::selector::fields as desc;

/// Fallback body text must be longer than this (characters).
pub const MIN_FALLBACK_BODY_CHARS: usize = 30;

/// Inclusive bounds for a hyperlink's text to pass as an author name.
pub const LINK_NAME_CHARS: (usize, usize) = (2, 60);

// === Scoping helpers ===

/// Ids of every node matched by `descriptors` under `card`, descendants included.
fn subtree_ids<'d>(
    card: &Selection,
    descriptors: impl IntoIterator<Item = &'d &'d str>,
) -> HashSet<NodeId> {
    let mut ids = HashSet::new();
    for css in descriptors {
        for block in dom::query_all(card, css) {
            for node in block.nodes() {
                ids.insert(node.id);
                for inner in node.descendants() {
                    ids.insert(inner.id);
                }
            }
        }
    }
    ids
}

/// Scope for the card-level chains of one card.
#[must_use]
pub fn card_scope<'a>(card: &Selection<'a>) -> Scope<'a> {
    Scope {
        root: card.clone(),
        nested: subtree_ids(card, desc::RESPONSE_CONTAINER.iter().chain(desc::DETAIL_ROWS)),
        byline: subtree_ids(
            card,
            desc::AUTHOR_NAME
                .iter()
                .chain(desc::REVIEWER_INFO)
                .chain(desc::PUBLISHED),
        ),
    }
}

fn is_excluded(sel: &Selection, excluded: &HashSet<NodeId>) -> bool {
    sel.nodes().first().is_some_and(|n| excluded.contains(&n.id))
}

/// First element matching any descriptor (in order) for which `read` yields a value.
fn first_value<T>(
    scope: &Scope,
    descriptors: &[&str],
    read: impl Fn(&Selection) -> Option<T>,
) -> Option<T> {
    descriptors.iter().find_map(|css| {
        dom::query_all(&scope.root, css)
            .iter()
            .filter(|el| !is_excluded(el, &scope.nested))
            .find_map(&read)
    })
}

fn non_empty_text(sel: &Selection) -> Option<String> {
    Some(dom::normalized_text(sel)).filter(|t| !t.is_empty())
}

/// Text fragments under `root` whose parent element is not skipped.
fn fragments_outside(root: &Selection, skip: impl Fn(&NodeId) -> bool) -> Vec<String> {
    let Some(root) = root.nodes().first() else {
        return Vec::new();
    };
    root.descendants()
        .into_iter()
        .filter(|node| node.is_text())
        .filter(|node| node.parent().is_none_or(|p| !skip(&p.id)))
        .filter(|node| {
            node.parent()
                .and_then(|p| p.node_name())
                .is_none_or(|tag| !matches!(tag.to_ascii_lowercase().as_str(), "script" | "style" | "noscript"))
        })
        .map(|node| dom::normalize_whitespace(&node.text()))
        .filter(|text| !text.is_empty())
        .collect()
}

fn first_relative_time(fragments: &[String]) -> Option<String> {
    fragments
        .iter()
        .find_map(|f| RELATIVE_TIME.find(f).map(|m| m.as_str().to_string()))
}

fn longest_fragment(fragments: Vec<String>) -> Option<String> {
    fragments
        .into_iter()
        .filter(|f| f.chars().count() > MIN_FALLBACK_BODY_CHARS)
        .fold(None, |best: Option<String>, f| match best {
            Some(b) if b.chars().count() >= f.chars().count() => Some(b),
            _ => Some(f),
        })
}

fn rating_in_range(value: u32) -> Option<u8> {
    u8::try_from(value).ok().filter(|r| (1..=5).contains(r))
}

fn rating_from_star_label(sel: &Selection) -> Option<u8> {
    let label = sel.attr("aria-label")?;
    let caps = STAR_LABEL.captures(&label)?;
    rating_in_range(caps[1].parse().ok()?)
}

// === Identity ===

fn identity_from_card_attribute(scope: &Scope) -> Option<String> {
    desc::IDENTITY_ATTRIBUTES
        .iter()
        .find_map(|attr| dom::non_empty_attribute(&scope.root, attr))
}

fn identity_from_descendant_attribute(scope: &Scope) -> Option<String> {
    desc::IDENTITY_ATTRIBUTES.iter().find_map(|attr| {
        dom::query_first(&scope.root, &format!("[{attr}]"))
            .and_then(|el| dom::non_empty_attribute(&el, attr))
    })
}

/// Stable identity chain. The synthetic fallback needs position and time,
/// so it lives in the card extractor rather than here.
pub static IDENTITY: Chain<String> = Chain {
    field: "identity",
    links: &[
        Link { name: "card-attribute", extract: identity_from_card_attribute },
        Link { name: "descendant-attribute", extract: identity_from_descendant_attribute },
    ],
};

// === Rating ===

fn rating_from_label(scope: &Scope) -> Option<u8> {
    first_value(scope, desc::RATING_LABEL, rating_from_star_label)
}

fn rating_from_score_text(scope: &Scope) -> Option<u8> {
    first_value(scope, desc::RATING_TEXT, |el| {
        let text = dom::normalized_text(el);
        let caps = OUT_OF_FIVE.captures(&text)?;
        rating_in_range(caps[1].parse().ok()?)
    })
}

fn rating_from_filled_stars(scope: &Scope) -> Option<u8> {
    desc::FILLED_STAR.iter().find_map(|css| {
        let filled = dom::query_all(&scope.root, css)
            .iter()
            .filter(|el| !is_excluded(el, &scope.nested))
            .count();
        rating_in_range(u32::try_from(filled).ok()?)
    })
}

/// Rating chain; a card where every link fails is invalid.
pub static RATING: Chain<u8> = Chain {
    field: "rating",
    links: &[
        Link { name: "star-label", extract: rating_from_label },
        Link { name: "score-text", extract: rating_from_score_text },
        Link { name: "filled-stars", extract: rating_from_filled_stars },
    ],
};

// === Author name ===

fn author_from_dedicated(scope: &Scope) -> Option<String> {
    first_value(scope, desc::AUTHOR_NAME, non_empty_text)
}

fn author_from_first_link(scope: &Scope) -> Option<String> {
    let link = dom::query_first(&scope.root, "a")?;
    let text = dom::normalized_text(&link);
    let len = text.chars().count();
    (LINK_NAME_CHARS.0..=LINK_NAME_CHARS.1)
        .contains(&len)
        .then_some(text)
}

pub static AUTHOR_NAME: Chain<String> = Chain {
    field: "author_name",
    links: &[
        Link { name: "dedicated", extract: author_from_dedicated },
        Link { name: "first-link", extract: author_from_first_link },
    ],
};

// === Publication time ===

fn published_from_dedicated(scope: &Scope) -> Option<String> {
    first_value(scope, desc::PUBLISHED, non_empty_text)
}

fn published_from_text_scan(scope: &Scope) -> Option<String> {
    first_relative_time(&fragments_outside(&scope.root, |id| scope.nested.contains(id)))
}

pub static PUBLISHED: Chain<String> = Chain {
    field: "published_relative_text",
    links: &[
        Link { name: "dedicated", extract: published_from_dedicated },
        Link { name: "text-scan", extract: published_from_text_scan },
    ],
};

// === Body text ===

fn body_from_dedicated(scope: &Scope) -> Option<String> {
    first_value(scope, desc::BODY_TEXT, non_empty_text)
}

fn body_from_longest_fragment(scope: &Scope) -> Option<String> {
    longest_fragment(fragments_outside(&scope.root, |id| {
        scope.nested.contains(id) || scope.byline.contains(id)
    }))
}

pub static BODY_TEXT: Chain<String> = Chain {
    field: "body_text",
    links: &[
        Link { name: "dedicated", extract: body_from_dedicated },
        Link { name: "longest-fragment", extract: body_from_longest_fragment },
    ],
};

// === Owner response (scoped to the response container) ===

fn response_text_from_dedicated(scope: &Scope) -> Option<String> {
    first_value(scope, desc::RESPONSE_TEXT, non_empty_text)
}

fn response_text_from_longest_fragment(scope: &Scope) -> Option<String> {
    let fragments = fragments_outside(&scope.root, |_| false)
        .into_iter()
        .filter(|f| !RELATIVE_TIME.is_match(f))
        .collect();
    longest_fragment(fragments)
}

pub static RESPONSE_TEXT: Chain<String> = Chain {
    field: "owner_response_text",
    links: &[
        Link { name: "dedicated", extract: response_text_from_dedicated },
        Link { name: "longest-fragment", extract: response_text_from_longest_fragment },
    ],
};

fn response_published_from_dedicated(scope: &Scope) -> Option<String> {
    first_value(scope, desc::RESPONSE_PUBLISHED, non_empty_text)
}

fn response_published_from_text_scan(scope: &Scope) -> Option<String> {
    first_relative_time(&fragments_outside(&scope.root, |_| false))
}

pub static RESPONSE_PUBLISHED: Chain<String> = Chain {
    field: "owner_response_relative_text",
    links: &[
        Link { name: "dedicated", extract: response_published_from_dedicated },
        Link { name: "text-scan", extract: response_published_from_text_scan },
    ],
};

/// The owner-response sub-container, if the card has one.
#[must_use]
pub fn response_block<'a>(card: &Selection<'a>) -> Option<Selection<'a>> {
    desc::RESPONSE_CONTAINER
        .iter()
        .find_map(|css| dom::query_first(card, css))
}

// === Likes ===

fn likes_from_counter(scope: &Scope) -> Option<u32> {
    first_value(scope, desc::LIKE_COUNT, |el| {
        INTEGER.find(&dom::normalized_text(el)).and_then(|m| parse_count(m.as_str()))
    })
}

fn likes_from_button_label(scope: &Scope) -> Option<u32> {
    first_value(scope, desc::LIKE_BUTTON, |el| {
        let label = el.attr("aria-label")?;
        INTEGER.find(&label).and_then(|m| parse_count(m.as_str()))
    })
}

/// Like counter chain; absent means zero.
pub static LIKE_COUNT: Chain<u32> = Chain {
    field: "like_count",
    links: &[
        Link { name: "counter", extract: likes_from_counter },
        Link { name: "button-label", extract: likes_from_button_label },
    ],
};

// === Detailed ratings ===

fn detail_label(row: &Selection) -> Option<String> {
    let raw = first_value(&Scope::new(row), desc::DETAIL_LABEL, non_empty_text)
        .unwrap_or_else(|| dom::normalized_text(row));
    let label = DETAIL_ROW_TEXT
        .captures(&raw)
        .map_or_else(|| raw.trim_end_matches(':').trim().to_string(), |c| c[1].to_string());
    Some(label).filter(|l| !l.is_empty())
}

fn detail_rating(row: &Selection) -> Option<u8> {
    dom::query_all(row, "[aria-label]")
        .iter()
        .find_map(rating_from_star_label)
        .or_else(|| {
            let text = dom::normalized_text(row);
            let caps = DETAIL_ROW_TEXT.captures(&text)?;
            caps[2].parse().ok()
        })
}

/// Per-category ratings from the first descriptor that has rows.
///
/// Rows missing a label or a 1..=5 rating are skipped; `None` when no row qualifies.
#[must_use]
pub fn detailed_ratings(card: &Selection) -> Option<BTreeMap<String, u8>> {
    let rows = desc::DETAIL_ROWS
        .iter()
        .map(|css| dom::query_all(card, css))
        .find(|rows| !rows.is_empty())?;

    let ratings: BTreeMap<String, u8> = rows
        .iter()
        .filter_map(|row| Some((detail_label(row)?, detail_rating(row)?)))
        .collect();

    (!ratings.is_empty()).then_some(ratings)
}

// === Reviewer info ===

/// Text fragments of the reviewer info line(s).
#[must_use]
pub fn reviewer_fragments(card: &Selection) -> Vec<String> {
    let mut fragments = Vec::new();
    for css in desc::REVIEWER_INFO {
        for el in dom::query_all(card, css) {
            fragments.extend(dom::text_fragments(&el));
        }
    }
    fragments
}

/// Reviewer's total review count, from the first fragment carrying one.
#[must_use]
pub fn author_review_count(fragments: &[String]) -> Option<u32> {
    fragments
        .iter()
        .find_map(|f| REVIEW_COUNT.captures(f).and_then(|c| parse_count(&c[1])))
}

/// Whether any fragment carries the trusted-reviewer marker.
#[must_use]
pub fn is_trusted_reviewer(fragments: &[String]) -> bool {
    fragments.iter().any(|f| TRUSTED_REVIEWER.is_match(f))
}
