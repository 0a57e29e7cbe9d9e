//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by the selector resolver and
//! the field extractor. Everything here reads; nothing mutates a snapshot.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

use crate::patterns::WHITESPACE_NORMALIZE;

// === Parsing ===

/// Parse an HTML snapshot into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get a trimmed, non-empty attribute value.
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get element class attribute.
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// First token of the class attribute, if any.
#[must_use]
pub fn primary_class(sel: &Selection) -> Option<String> {
    class_name(sel).and_then(|c| c.split_whitespace().next().map(str::to_string))
}

// === Tag/Node Information ===

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

// === Text Content ===

/// Text content with runs of whitespace collapsed and ends trimmed.
#[must_use]
pub fn normalized_text(sel: &Selection) -> String {
    normalize_whitespace(&sel.text())
}

/// Collapse whitespace runs to a single space and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// Non-empty text fragments below the selection, in document order.
///
/// Each fragment is one text node with whitespace normalized. Text inside
/// `script`, `style` and `noscript` is skipped.
#[must_use]
pub fn text_fragments(sel: &Selection) -> Vec<String> {
    let mut fragments = Vec::new();
    let Some(root) = sel.nodes().first() else {
        return fragments;
    };

    for node in root.descendants() {
        if !node.is_text() {
            continue;
        }
        if let Some(parent) = node.parent() {
            if let Some(tag) = parent.node_name() {
                if tag.eq_ignore_ascii_case("script")
                    || tag.eq_ignore_ascii_case("style")
                    || tag.eq_ignore_ascii_case("noscript")
                {
                    continue;
                }
            }
        }
        let text = normalize_whitespace(&node.text());
        if !text.is_empty() {
            fragments.push(text);
        }
    }

    fragments
}

// === Querying ===

/// First descendant matching a CSS descriptor, or `None`.
///
/// Invalid descriptors behave like descriptors that match nothing.
#[must_use]
pub fn query_first<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let matched = sel.try_select(selector)?;
    matched.iter().next()
}

/// All descendants matching a CSS descriptor, in document order.
///
/// Invalid descriptors behave like descriptors that match nothing.
#[must_use]
pub fn query_all<'a>(sel: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    sel.try_select(selector)
        .map(|m| m.iter().collect())
        .unwrap_or_default()
}

/// Number of descendants matching a CSS descriptor.
#[must_use]
pub fn count(sel: &Selection, selector: &str) -> usize {
    sel.try_select(selector).map_or(0, |m| m.length())
}

/// Number of elements in the whole document matching a CSS descriptor.
///
/// Unlike [`count`] on a selection, the root element itself can match.
#[must_use]
pub fn count_in_document(doc: &Document, selector: &str) -> usize {
    doc.try_select(selector).map_or(0, |m| m.length())
}
