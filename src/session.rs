//! Extraction session: one target page from navigation to sink hand-off.
//!
//! ```text
//! navigate -> consent -> reviews tab -> sort
//!          -> pagination -> expand truncated text -> extract -> normalize
//!          -> accumulate -> sink
//! ```
//!
//! Navigation steps are best-effort; a missing control or a failed click is
//! logged and skipped. Card-level failures are counted in the
//! [`SessionReport`] and never abort the session. Only driver failures during
//! navigation, snapshots or scrolling, and sink failures, are returned as
//! errors.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, info_span, warn};
use url::Url;

use crate::accumulator::{Accumulator, Offer};
use crate::dom::{self, Document};
use crate::error::Result;
use crate::extractor::{extract_card, CardContext, CardRejection};
use crate::normalize::{normalize_record, NormalizeContext};
use crate::options::Options;
use crate::page::{ElementTarget, PageDriver};
use crate::pagination::PaginationController;
use crate::result::{NormalizedReview, SessionReport};
use crate::selector::{self, fields, CardSelector};
use crate::sink::ReviewSink;

/// Set or replace the `hl` query parameter of `target_url`.
///
/// Unparseable URLs are returned unchanged.
#[must_use]
pub fn localized_url(target_url: &str, locale: &str) -> String {
    let Ok(mut url) = Url::parse(target_url) else {
        return target_url.to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "hl")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("hl", locale);
    url.to_string()
}

/// Extract, normalize and accumulate every card of one snapshot.
///
/// Counters in `report` are updated; `reference` is both the relative-time
/// reference instant and the synthetic-identity timestamp.
pub(crate) fn collect_cards(
    doc: &Document,
    selector: &CardSelector,
    options: &Options,
    target_url: &str,
    reference: DateTime<Utc>,
    report: &mut SessionReport,
) -> Vec<NormalizedReview> {
    let ctx = NormalizeContext {
        reference,
        target_url,
        language: &options.language,
        origin: &options.origin,
    };
    let mut accumulator = Accumulator::new(options.max_items_per_target);

    let cards = selector.cards(doc);
    report.cards_seen = cards.len();

    for (position, card) in cards.iter().enumerate() {
        let card_ctx = CardContext {
            position,
            observed_at: reference,
        };
        let record = match extract_card(card, &card_ctx) {
            Ok(record) => record,
            Err(rejection) => {
                debug!(position, %rejection, "card skipped");
                match rejection {
                    CardRejection::Malformed => report.rejected_malformed += 1,
                    CardRejection::Invalid => report.rejected_invalid += 1,
                }
                continue;
            }
        };

        match accumulator.offer_with(&record.identity.value, || normalize_record(&record, &ctx)) {
            Offer::Accepted => report.accepted += 1,
            Offer::Duplicate => report.duplicates += 1,
            Offer::CapReached => report.cap_rejections += 1,
        }
    }

    accumulator.into_items()
}

/// Run resolution, extraction and accumulation on one static snapshot.
///
/// No pagination, navigation or expansion takes place.
#[must_use]
pub fn extract_snapshot(
    html: &str,
    options: &Options,
    target_url: &str,
    reference: DateTime<Utc>,
) -> (Vec<NormalizedReview>, SessionReport) {
    let doc = dom::parse(html);
    let mut report = SessionReport {
        target_url: target_url.to_string(),
        ..SessionReport::default()
    };

    let resolution = selector::resolve(&doc);
    let Some(card_selector) = resolution.selector else {
        return (Vec::new(), report);
    };
    let reviews = collect_cards(&doc, &card_selector, options, target_url, reference, &mut report);
    report.selector = Some(card_selector);
    (reviews, report)
}

/// One extraction run over a driver, configured by [`Options`].
///
/// All per-page state (stall counter, adopted selector, seen identities)
/// lives in values created inside [`ExtractionSession::run`], so one session
/// value can serve many targets in turn.
#[derive(Debug, Clone)]
pub struct ExtractionSession<'a> {
    options: &'a Options,
    reference: Option<DateTime<Utc>>,
}

impl<'a> ExtractionSession<'a> {
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            reference: None,
        }
    }

    /// Pin the reference instant instead of reading the clock at extraction time.
    #[must_use]
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Process one target page and hand its batch to `sink`.
    pub fn run(
        &self,
        target_url: &str,
        driver: &mut impl PageDriver,
        sink: &mut impl ReviewSink,
    ) -> Result<SessionReport> {
        let _span = info_span!("session", target = target_url).entered();
        let mut report = SessionReport {
            target_url: target_url.to_string(),
            ..SessionReport::default()
        };

        self.prepare(target_url, driver)?;

        let outcome = PaginationController::new(self.options).run(driver)?;
        report.stop_reason = Some(outcome.reason);
        report.iterations = outcome.iterations;

        let reviews = match outcome.selector {
            Some(card_selector) => {
                self.expand_truncated(driver, &card_selector, &mut report)?;
                let html = driver.snapshot()?;
                let doc = dom::parse(&html);
                let reference = self.reference.unwrap_or_else(Utc::now);
                let reviews = collect_cards(
                    &doc,
                    &card_selector,
                    self.options,
                    target_url,
                    reference,
                    &mut report,
                );
                report.selector = Some(card_selector);
                reviews
            }
            None => {
                error!("no review card descriptor matched; extraction skipped");
                Vec::new()
            }
        };

        if reviews.is_empty() {
            warn!("session produced no reviews");
        }
        sink.accept(target_url, &reviews)?;

        info!(
            accepted = report.accepted,
            duplicates = report.duplicates,
            invalid = report.rejected_invalid,
            malformed = report.rejected_malformed,
            cap_rejections = report.cap_rejections,
            "session finished"
        );
        Ok(report)
    }

    fn prepare(&self, target_url: &str, driver: &mut impl PageDriver) -> Result<()> {
        let navigation = &self.options.navigation;
        let url = match &navigation.force_locale {
            Some(locale) => localized_url(target_url, locale),
            None => target_url.to_string(),
        };

        debug!(%url, "navigating");
        driver.navigate(&url)?;
        driver.wait(self.options.settle_interval)?;

        if navigation.dismiss_consent {
            self.click_first_present(driver, fields::CONSENT_ACCEPT, "consent")?;
        }
        if navigation.open_reviews_tab {
            self.click_first_present(driver, fields::REVIEWS_TAB, "reviews tab")?;
        }
        if navigation.sort_newest
            && self.click_first_present(driver, fields::SORT_MENU, "sort menu")?
        {
            self.click_first_present(driver, fields::SORT_NEWEST, "sort newest")?;
        }
        Ok(())
    }

    /// Click the first candidate present in a fresh snapshot, then settle.
    ///
    /// Returns whether a click went through.
    fn click_first_present(
        &self,
        driver: &mut impl PageDriver,
        candidates: &[&str],
        step: &str,
    ) -> Result<bool> {
        let html = driver.snapshot()?;
        let doc = dom::parse(&html);

        let Some(css) = candidates.iter().find(|css| dom::count_in_document(&doc, css) > 0) else {
            debug!(step, "control not present");
            return Ok(false);
        };

        match driver.click(&ElementTarget::first(*css)) {
            Ok(()) => {
                debug!(step, css, "clicked");
                driver.wait(self.options.settle_interval)?;
                Ok(true)
            }
            Err(err) => {
                warn!(step, css, %err, "navigation click failed");
                Ok(false)
            }
        }
    }

    /// Click every visible expansion control inside the loaded cards.
    ///
    /// Controls are clicked last to first so the indices of those not yet
    /// clicked stay valid when an expanded control disappears.
    fn expand_truncated(
        &self,
        driver: &mut impl PageDriver,
        card_selector: &CardSelector,
        report: &mut SessionReport,
    ) -> Result<()> {
        let html = driver.snapshot()?;
        let doc = dom::parse(&html);
        let root = doc.select("html");

        // Each control is clicked once, however many descriptors match it.
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for control in fields::EXPAND_CONTROLS {
            let css = format!("{} {control}", card_selector.css);
            let fresh: Vec<usize> = dom::query_all(&root, &css)
                .iter()
                .enumerate()
                .filter(|(_, el)| el.nodes().first().is_some_and(|n| seen.insert(n.id)))
                .map(|(index, _)| index)
                .collect();
            targets.extend(fresh.into_iter().rev().map(|index| ElementTarget::new(css.clone(), index)));
        }
        if targets.is_empty() {
            return Ok(());
        }

        for target in &targets {
            match driver.click(target) {
                Ok(()) => report.expansions_clicked += 1,
                Err(err) => {
                    report.expansion_failures += 1;
                    debug!(selector = %target.selector, index = target.index, %err, "expansion failed");
                }
            }
        }
        debug!(
            clicked = report.expansions_clicked,
            failed = report.expansion_failures,
            "expanded truncated reviews"
        );
        driver.wait(self.options.settle_interval)
    }
}

/// Validate `options` and run one session per target, in order.
pub fn run_all(
    options: &Options,
    driver: &mut impl PageDriver,
    sink: &mut impl ReviewSink,
) -> Result<Vec<SessionReport>> {
    options.validate()?;
    let session = ExtractionSession::new(options);
    let mut reports = Vec::with_capacity(options.target_urls.len());
    for target in &options.target_urls {
        reports.push(session.run(target, driver, sink)?);
    }
    Ok(reports)
}
