//! Field and control descriptors.
//!
//! Each list is tried in order by the field extractor; the first descriptor
//! yielding a plausible value wins. Update these tables when the host markup
//! changes, and add a fixture test alongside.

/// Card attributes carrying a per-review unique identifier.
pub const IDENTITY_ATTRIBUTES: &[&str] = &["data-review-id", "data-reviewid", "data-id"];

/// Elements whose accessible label reads "N stars".
pub const RATING_LABEL: &[&str] = &[
    "span.kvMYJc[aria-label]",
    "[role='img'][aria-label]",
    "[aria-label*='star']",
    "[aria-label*='Star']",
];

/// Elements whose text reads "N/5".
pub const RATING_TEXT: &[&str] = &["span.fzvQIb", ".review-score"];

/// Individual filled-star glyphs.
pub const FILLED_STAR: &[&str] = &[
    "span.elGi1d",
    "span.hCCjke.NhBTye",
    "[data-star='filled']",
    ".star-filled",
];

/// Reviewer display name.
pub const AUTHOR_NAME: &[&str] = &[
    "div.d4r55",
    ".TSUbDb",
    "[itemprop='author']",
    ".review-author",
];

/// Publication time ("3 weeks ago").
pub const PUBLISHED: &[&str] = &[
    "span.rsqaWe",
    "span.xRkPPb",
    ".dehysf",
    "[itemprop='datePublished']",
    ".review-date",
];

/// Review body text.
pub const BODY_TEXT: &[&str] = &[
    "span.wiI7pd",
    "div.MyEned span",
    ".review-full-text",
    "[itemprop='reviewBody']",
    ".review-text",
];

/// Owner response sub-container.
pub const RESPONSE_CONTAINER: &[&str] = &["div.CDe7pd", ".owner-response", ".review-response"];

/// Owner response text, scoped to the response container.
pub const RESPONSE_TEXT: &[&str] = &["div.wiI7pd", ".response-text"];

/// Owner response time, scoped to the response container.
pub const RESPONSE_PUBLISHED: &[&str] = &["span.DZSIDd", ".response-date"];

/// "Helpful"/like counter.
pub const LIKE_COUNT: &[&str] = &["span.pkWtMe", ".GBkF3d span", ".like-count"];

/// Buttons whose accessible label carries the like count ("12 likes").
pub const LIKE_BUTTON: &[&str] = &["button[aria-label*='like']", "button[aria-label*='Like']"];

/// Per-category rating rows ("Food 5/5").
pub const DETAIL_ROWS: &[&str] = &["div.PBK6be", ".detailed-rating"];

/// Category label inside a detail row.
pub const DETAIL_LABEL: &[&str] = &["span.RfDO5c", ".detail-label"];

/// Reviewer info line ("Local Guide · 88 reviews").
pub const REVIEWER_INFO: &[&str] = &["div.RfnDt", "a.WEBjve", ".reviewer-info", "a[href*='/contrib/']"];

/// Truncation-expansion controls inside a card ("More").
pub const EXPAND_CONTROLS: &[&str] = &[
    "button.w8nwRe",
    "button[aria-label='See more']",
    "a.review-more-link",
];

/// Consent-dialog accept buttons.
pub const CONSENT_ACCEPT: &[&str] = &[
    "button[aria-label='Accept all']",
    "form[action*='consent'] button",
    "button#L2AGLb",
];

/// Reviews tab of a place panel.
pub const REVIEWS_TAB: &[&str] = &[
    "button[role='tab'][aria-label*='Reviews']",
    "button[data-tab-index='1']",
];

/// Sort menu opener and its newest-first entry.
pub const SORT_MENU: &[&str] = &["button[aria-label='Sort reviews']", "button[data-value='Sort']"];
pub const SORT_NEWEST: &[&str] = &["div[role='menuitemradio'][data-index='1']", "li[data-sort='newest']"];
