use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rs_placereviews::extractor::{extract_card, CardContext};
use rs_placereviews::normalize::normalize_relative_time;
use rs_placereviews::session::extract_snapshot;
use rs_placereviews::accumulator::Identified;
use rs_placereviews::{dom, Accumulator, Offer, Options};

fn reference_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2001-09-09 .. 2033-05-18
    (1_000_000_000i64..2_000_000_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// One card: `None` rating renders no indicator at all; ids may repeat.
fn card_strategy() -> impl Strategy<Value = (Option<u8>, u8, bool)> {
    (proptest::option::of(0u8..=9), 0u8..12, any::<bool>())
}

fn render(cards: &[(Option<u8>, u8, bool)]) -> String {
    let body: String = cards
        .iter()
        .map(|(rating, id, with_id)| {
            let stars = rating
                .map(|r| format!(r#"<span class="kvMYJc" aria-label="{r} stars"></span>"#))
                .unwrap_or_default();
            let id_attr = if *with_id {
                format!(r#" data-review-id="id-{id}""#)
            } else {
                String::new()
            };
            format!(
                r#"<div class="jftiEf"{id_attr}><div class="d4r55">Guest {id}</div>{stars}</div>"#
            )
        })
        .collect();
    format!(r#"<div class="m6QErb" tabindex="-1">{body}</div>"#)
}

struct Keyed(String);

impl Identified for Keyed {
    fn identity(&self) -> &str {
        &self.0
    }
}

proptest! {
    #[test]
    fn accumulated_reviews_respect_cap_rating_and_uniqueness(
        cards in prop::collection::vec(card_strategy(), 0..40),
        cap in 1usize..25,
        reference in reference_strategy(),
    ) {
        let options = Options { max_items_per_target: cap, ..Options::default() };
        let html = render(&cards);
        let (reviews, _) = extract_snapshot(&html, &options, "https://maps.example.com/p", reference);

        prop_assert!(reviews.len() <= cap);
        prop_assert!(reviews.iter().all(|r| (1..=5).contains(&r.rating)));

        let ids: HashSet<&str> = reviews.iter().map(|r| r.identity.value.as_str()).collect();
        prop_assert_eq!(ids.len(), reviews.len());
    }

    #[test]
    fn accumulator_never_exceeds_cap(
        ids in prop::collection::vec("[a-e]{1,2}", 0..60),
        cap in 0usize..20,
    ) {
        let mut acc = Accumulator::new(cap);
        let mut accepted = 0;
        for id in &ids {
            if acc.offer(Keyed(id.clone())) == Offer::Accepted {
                accepted += 1;
            }
        }
        prop_assert!(acc.len() <= cap);
        prop_assert_eq!(acc.len(), accepted);
    }

    #[test]
    fn unparseable_text_normalizes_to_reference(
        text in "[b-z ]{0,30}",
        reference in reference_strategy(),
    ) {
        prop_assume!(!text.contains("ago"));
        prop_assert_eq!(normalize_relative_time(&text, reference), reference);
    }

    #[test]
    fn months_end_before_weeks(n in 1u32..100, reference in reference_strategy()) {
        let months = normalize_relative_time(&format!("{n} months ago"), reference);
        let weeks = normalize_relative_time(&format!("{n} weeks ago"), reference);
        prop_assert!(months < weeks);
    }

    #[test]
    fn larger_amounts_are_never_later(
        a in 1u32..500,
        b in 1u32..500,
        unit in prop::sample::select(vec!["second", "minute", "hour", "day", "week", "month", "year"]),
        reference in reference_strategy(),
    ) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let earlier = normalize_relative_time(&format!("{large} {unit}s ago"), reference);
        let later = normalize_relative_time(&format!("{small} {unit}s ago"), reference);
        prop_assert!(earlier <= later);
        prop_assert!(later <= reference);
    }

    #[test]
    fn card_extraction_is_idempotent(card in card_strategy(), position in 0usize..50) {
        let html = render(&[card]);
        let doc = dom::parse(&html);
        let sel = doc.select("div.jftiEf");
        let ctx = CardContext {
            position,
            observed_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        prop_assert_eq!(extract_card(&sel, &ctx), extract_card(&sel, &ctx));
    }
}
