//! Record types produced by extraction.
//!
//! `ReviewRecord` is the raw per-card output of the field extractor.
//! `NormalizedReview` is what the sink receives: the same fields with the
//! relative publication time resolved to an instant, plus the constant
//! per-session fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::StopReason;
use crate::selector::CardSelector;

/// Author name used when no name can be resolved.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Identifier of one review.
///
/// `stable` is false for synthetic identities built from extraction order
/// and wall-clock; those are only unique within one extraction pass and must
/// not be used to deduplicate across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewIdentity {
    #[serde(rename = "identity")]
    pub value: String,
    #[serde(rename = "identityStable")]
    pub stable: bool,
}

impl ReviewIdentity {
    #[must_use]
    pub fn stable(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            stable: true,
        }
    }

    /// Synthetic identity from card position and the extraction instant.
    #[must_use]
    pub fn synthetic(position: usize, observed_at: DateTime<Utc>) -> Self {
        Self {
            value: format!("synthetic-{position}-{}", observed_at.timestamp_millis()),
            stable: false,
        }
    }
}

/// Raw review fields read from one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub identity: ReviewIdentity,

    /// Reviewer display name; [`ANONYMOUS_AUTHOR`] when unresolvable.
    pub author_name: String,

    /// Star rating, always within 1..=5.
    pub rating: u8,

    /// Free-text relative time ("2 weeks ago"); empty when absent.
    pub published_relative_text: String,

    /// Review text; `None` for rating-only reviews.
    pub body_text: Option<String>,

    pub owner_response_text: Option<String>,
    pub owner_response_relative_text: Option<String>,

    pub like_count: u32,

    /// Per-category ratings; `None` (never empty) when the card has no rows.
    pub detailed_ratings: Option<BTreeMap<String, u8>>,

    pub author_review_count: Option<u32>,
    pub author_is_trusted_reviewer: bool,
}

/// A review as handed to the sink.
///
/// Field names serialize in camelCase; this set is the sink contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    #[serde(flatten)]
    pub identity: ReviewIdentity,
    pub author_name: String,
    pub rating: u8,
    /// Absolute publication instant. Falls back to the session reference
    /// instant when the relative text could not be parsed.
    pub published_at_timestamp: DateTime<Utc>,
    pub body_text: Option<String>,
    pub owner_response_text: Option<String>,
    pub owner_response_relative_text: Option<String>,
    pub like_count: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detailed_ratings: Option<BTreeMap<String, u8>>,
    pub author_review_count: Option<u32>,
    pub author_is_trusted_reviewer: bool,
    pub review_url: String,
    pub language: String,
    pub origin: String,
}

/// Per-target summary of one extraction session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub target_url: String,

    /// Why pagination ended; `None` if pagination never ran.
    pub stop_reason: Option<StopReason>,

    /// Card descriptor adopted for the page; `None` when unresolvable.
    pub selector: Option<CardSelector>,

    /// Pagination measurement cycles performed.
    pub iterations: usize,

    /// Cards visible in the final extraction snapshot.
    pub cards_seen: usize,

    pub accepted: usize,
    pub duplicates: usize,
    pub cap_rejections: usize,

    /// Cards without a usable rating.
    pub rejected_invalid: usize,

    /// Cards that could not be read structurally.
    pub rejected_malformed: usize,

    pub expansions_clicked: usize,
    pub expansion_failures: usize,
}
