//! Card-level record extraction.
//!
//! Reads one card with the per-field chains from [`super::fields`]. The result
//! depends only on the card subtree and the [`CardContext`], so re-reading the
//! same snapshot yields identical records.

use chrono::{DateTime, Utc};
use dom_query::Selection;

use super::chain::Scope;
use super::fields;
use crate::dom;
use crate::result::{ReviewIdentity, ReviewRecord, ANONYMOUS_AUTHOR};

/// Why a card produced no record. Never surfaced to the host; counted only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CardRejection {
    /// The card could not be read structurally (empty selection or an
    /// unrendered placeholder with neither text nor labelled elements).
    #[error("malformed card")]
    Malformed,

    /// No rating link yielded a value in 1..=5.
    #[error("card has no usable rating")]
    Invalid,
}

/// Inputs to the synthetic identity fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardContext {
    /// Zero-based position of the card in document order.
    pub position: usize,
    /// Instant of the extraction pass.
    pub observed_at: DateTime<Utc>,
}

fn is_placeholder(card: &Selection) -> bool {
    dom::text_fragments(card).is_empty() && dom::count(card, "[aria-label]") == 0
}

/// Extract one review record from a card.
pub fn extract_card(card: &Selection, ctx: &CardContext) -> Result<ReviewRecord, CardRejection> {
    if card.nodes().is_empty() || is_placeholder(card) {
        return Err(CardRejection::Malformed);
    }

    let scope = fields::card_scope(card);
    let rating = fields::RATING.value(&scope).ok_or(CardRejection::Invalid)?;

    let identity = fields::IDENTITY.value(&scope).map_or_else(
        || ReviewIdentity::synthetic(ctx.position, ctx.observed_at),
        ReviewIdentity::stable,
    );

    let (owner_response_text, owner_response_relative_text) = fields::response_block(card)
        .map_or((None, None), |block| {
            let block = Scope::new(&block);
            (
                fields::RESPONSE_TEXT.value(&block),
                fields::RESPONSE_PUBLISHED.value(&block),
            )
        });

    let reviewer = fields::reviewer_fragments(card);

    Ok(ReviewRecord {
        identity,
        author_name: fields::AUTHOR_NAME
            .value(&scope)
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
        rating,
        published_relative_text: fields::PUBLISHED.value(&scope).unwrap_or_default(),
        body_text: fields::BODY_TEXT.value(&scope),
        owner_response_text,
        owner_response_relative_text,
        like_count: fields::LIKE_COUNT.value(&scope).unwrap_or(0),
        detailed_ratings: fields::detailed_ratings(card),
        author_review_count: fields::author_review_count(&reviewer),
        author_is_trusted_reviewer: fields::is_trusted_reviewer(&reviewer),
    })
}
