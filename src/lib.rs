//! # rs-placereviews
//!
//! Incremental review extraction from map place pages whose review list is
//! rendered lazily inside a scrollable panel.
//!
//! The engine drives a host-supplied [`PageDriver`] through scroll-and-settle
//! cycles until enough review cards are loaded, expands truncated text, reads
//! every card with per-field fallback chains, resolves relative publication
//! times to instants, and hands one deduplicated, capped batch per target to
//! a [`ReviewSink`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_placereviews::{run_all, MemorySink, Options, ScriptedPage};
//!
//! let html = r#"<div class="m6QErb" tabindex="-1">
//!   <div class="jftiEf" data-review-id="a1">
//!     <div class="d4r55">Jane D.</div>
//!     <span class="kvMYJc" aria-label="5 stars"></span>
//!     <span class="rsqaWe">2 weeks ago</span>
//!   </div>
//! </div>"#;
//!
//! let options = Options {
//!     target_urls: vec!["https://maps.example.com/place/cafe".to_string()],
//!     ..Options::default()
//! };
//! let mut page = ScriptedPage::single(html);
//! let mut sink = MemorySink::new();
//!
//! let reports = run_all(&options, &mut page, &mut sink)?;
//! assert_eq!(reports[0].accepted, 1);
//! # Ok::<(), rs_placereviews::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Pagination**: scroll-driven controller stopping on cap, stall or iteration ceiling
//! - **Selector fallback**: priority-ordered card descriptors plus a structural heuristic
//! - **Field chains**: named, independently testable fallback links per field
//! - **Normalization**: calendar-aware relative-time resolution
//! - **Accumulation**: bounded, insertion-ordered, deduplicated by review identity

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query` snapshots.
pub mod dom;

/// Card-boundary resolution and descriptor tables.
pub mod selector;

/// Per-card field extraction with fallback chains.
pub mod extractor;

/// Relative-time and record normalization.
pub mod normalize;

/// Bounded, deduplicated review collection.
pub mod accumulator;

/// Document handle abstraction and the scripted in-memory driver.
pub mod page;

/// Scroll-driven pagination state machine.
pub mod pagination;

/// Per-target orchestration.
pub mod session;

/// Batch sinks.
pub mod sink;

/// Charset detection and decoding for raw snapshots.
pub mod encoding;

// Public API - re-exports
pub use accumulator::{Accumulator, Offer};
pub use error::{Error, Result};
pub use options::{NavigationPolicy, Options};
pub use page::{ElementTarget, PageDriver, ScriptedPage};
pub use pagination::{PaginationController, PaginationOutcome, StopReason};
pub use result::{NormalizedReview, ReviewIdentity, ReviewRecord, SessionReport, ANONYMOUS_AUTHOR};
pub use selector::{CardSelector, SelectorSource};
pub use session::{run_all, ExtractionSession};
pub use sink::{JsonLinesSink, MemorySink, ReviewSink};

/// Extracts reviews from a single static HTML snapshot.
///
/// Runs card resolution, field extraction, normalization and accumulation
/// without pagination or navigation. The first entry of
/// `options.target_urls`, if any, is used for `reviewUrl`; relative times are
/// resolved against the current instant.
///
/// # Example
///
/// ```rust
/// use rs_placereviews::{extract_reviews, Options};
///
/// let html = r#"<div class="jftiEf" data-review-id="x1">
///     <a href="/contrib/1">Jane D.</a>
///     <span aria-label="4 stars"></span>
/// </div>"#;
///
/// let reviews = extract_reviews(html, &Options::default());
/// assert_eq!(reviews.len(), 1);
/// assert_eq!(reviews[0].rating, 4);
/// ```
#[must_use]
pub fn extract_reviews(html: &str, options: &Options) -> Vec<NormalizedReview> {
    let target_url = options.target_urls.first().map_or("", String::as_str);
    session::extract_snapshot(html, options, target_url, chrono::Utc::now()).0
}

/// Extracts reviews from raw HTML bytes with automatic charset detection.
///
/// A byte-order mark or `<meta>` charset declaration selects the decoder;
/// UTF-8 is assumed otherwise. Undecodable bytes become U+FFFD.
///
/// # Example
///
/// ```rust
/// use rs_placereviews::{extract_reviews_bytes, Options};
///
/// let html = b"<meta charset=\"ISO-8859-1\">
///     <div class=\"jftiEf\" data-review-id=\"x1\">
///     <div class=\"d4r55\">Ren\xE9e</div><span aria-label=\"3 stars\"></span></div>";
///
/// let reviews = extract_reviews_bytes(html, &Options::default());
/// assert_eq!(reviews[0].author_name, "Ren\u{e9}e");
/// ```
#[must_use]
pub fn extract_reviews_bytes(html: &[u8], options: &Options) -> Vec<NormalizedReview> {
    extract_reviews(&encoding::decode_snapshot(html), options)
}
