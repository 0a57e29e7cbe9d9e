//! Review card extraction.
//!
//! # Module Structure
//!
//! - `chain`: Ordered, named fallback chains and the [`Scope`] they read
//! - `fields`: One chain per review field, plus detail-row and reviewer-info scanners
//! - `card`: Assembles a [`ReviewRecord`](crate::ReviewRecord) from one card
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use rs_placereviews::dom;
//! use rs_placereviews::extractor::{extract_card, CardContext};
//!
//! let doc = dom::parse(r#"<div class="rv"><a href="/u/1">Jane D.</a>
//!     <span aria-label="5 stars"></span></div>"#);
//! let ctx = CardContext { position: 0, observed_at: Utc::now() };
//!
//! let record = extract_card(&doc.select("div.rv"), &ctx).unwrap();
//! assert_eq!(record.rating, 5);
//! assert_eq!(record.author_name, "Jane D.");
//! ```

pub mod card;
pub mod chain;
pub mod fields;

pub use card::{extract_card, CardContext, CardRejection};
pub use chain::{Chain, Link, Resolved, Scope};
