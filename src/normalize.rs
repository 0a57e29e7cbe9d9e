//! Relative-time normalization and record normalization.
//!
//! `"3 weeks ago"` against a reference instant becomes an absolute instant.
//! Seconds through weeks subtract a fixed duration (a week is 7 days);
//! months and years subtract calendar months, clamping the day of month
//! (March 31 minus one month is February 28/29).
//!
//! Text that does not match the grammar, including the empty string,
//! normalizes to the reference instant itself. This fabricates a "now"
//! timestamp for the record; it is a known precision loss, preferred over
//! dropping an otherwise valid review.

use chrono::{DateTime, Months, TimeDelta, Utc};
use url::Url;

use crate::patterns::RELATIVE_TIME;
use crate::result::{NormalizedReview, ReviewRecord};

/// Unit of a relative time expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// A parsed `"<amount> <unit> ago"` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTime {
    pub amount: u32,
    pub unit: TimeUnit,
}

impl RelativeTime {
    /// Parse the first relative time expression found in `text`.
    ///
    /// `"a"`/`"an"` mean an amount of one.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = RELATIVE_TIME.captures(text)?;
        let amount = match caps[1].to_ascii_lowercase().as_str() {
            "a" | "an" => 1,
            digits => digits.parse().ok()?,
        };
        Some(Self {
            amount,
            unit: TimeUnit::from_word(&caps[2])?,
        })
    }

    /// Subtract this offset from `reference`; `None` on overflow.
    #[must_use]
    pub fn before(self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let amount = i64::from(self.amount);
        let fixed = match self.unit {
            TimeUnit::Second => TimeDelta::try_seconds(amount),
            TimeUnit::Minute => TimeDelta::try_minutes(amount),
            TimeUnit::Hour => TimeDelta::try_hours(amount),
            TimeUnit::Day => TimeDelta::try_days(amount),
            TimeUnit::Week => TimeDelta::try_weeks(amount),
            TimeUnit::Month => {
                return reference.checked_sub_months(Months::new(self.amount));
            }
            TimeUnit::Year => {
                return reference.checked_sub_months(Months::new(self.amount.checked_mul(12)?));
            }
        };
        reference.checked_sub_signed(fixed?)
    }
}

/// Resolve a relative time expression against `reference`.
///
/// Unparseable or empty text yields `reference` unchanged.
#[must_use]
pub fn normalize_relative_time(text: &str, reference: DateTime<Utc>) -> DateTime<Utc> {
    RelativeTime::parse(text)
        .and_then(|rel| rel.before(reference))
        .unwrap_or(reference)
}

/// Session-constant inputs to record normalization.
#[derive(Debug, Clone)]
pub struct NormalizeContext<'a> {
    pub reference: DateTime<Utc>,
    pub target_url: &'a str,
    pub language: &'a str,
    pub origin: &'a str,
}

/// Link to a review: the target URL with a `#review-<id>` fragment for
/// stable identities, the bare target URL otherwise.
#[must_use]
pub fn review_url(target_url: &str, identity: &crate::ReviewIdentity) -> String {
    if !identity.stable {
        return target_url.to_string();
    }
    match Url::parse(target_url) {
        Ok(mut url) => {
            url.set_fragment(Some(&format!("review-{}", identity.value)));
            url.to_string()
        }
        Err(_) => format!("{target_url}#review-{}", identity.value),
    }
}

/// Build the sink-facing review from a raw record. The record is not consumed.
#[must_use]
pub fn normalize_record(record: &ReviewRecord, ctx: &NormalizeContext) -> NormalizedReview {
    NormalizedReview {
        identity: record.identity.clone(),
        author_name: record.author_name.clone(),
        rating: record.rating,
        published_at_timestamp: normalize_relative_time(&record.published_relative_text, ctx.reference),
        body_text: record.body_text.clone(),
        owner_response_text: record.owner_response_text.clone(),
        owner_response_relative_text: record.owner_response_relative_text.clone(),
        like_count: record.like_count,
        detailed_ratings: record.detailed_ratings.clone(),
        author_review_count: record.author_review_count,
        author_is_trusted_reviewer: record.author_is_trusted_reviewer,
        review_url: review_url(ctx.target_url, &record.identity),
        language: ctx.language.to_string(),
        origin: ctx.origin.to_string(),
    }
}
