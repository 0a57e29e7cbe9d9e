//! Simple CLI that reads a saved place-page snapshot from stdin and writes
//! one JSON review per line to stdout.
//!
//! Usage: `extract_stdin [TARGET_URL] [MAX_ITEMS] < page.html`
//!
//! Logging goes to stderr and follows `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::io::{self, Read};

use rs_placereviews::encoding::decode_snapshot;
use rs_placereviews::{ExtractionSession, JsonLinesSink, Options, ScriptedPage};
use tracing_subscriber::EnvFilter;

const DEFAULT_TARGET: &str = "https://www.google.com/maps/place/";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| DEFAULT_TARGET.to_string());
    let mut options = Options {
        target_urls: vec![target.clone()],
        ..Options::default()
    };
    if let Some(cap) = args.next() {
        match cap.parse() {
            Ok(cap) => options.max_items_per_target = cap,
            Err(err) => {
                tracing::error!(%cap, %err, "MAX_ITEMS must be a positive integer");
                std::process::exit(2);
            }
        }
    }
    if let Err(err) = options.validate() {
        tracing::error!(%err, "invalid options");
        std::process::exit(2);
    }

    let mut raw = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut raw) {
        tracing::error!(%err, "failed to read from stdin");
        std::process::exit(1);
    }

    let mut page = ScriptedPage::single(decode_snapshot(&raw));
    let mut sink = JsonLinesSink::new(io::stdout().lock());

    match ExtractionSession::new(&options).run(&target, &mut page, &mut sink) {
        Ok(report) => tracing::info!(
            accepted = report.accepted,
            cards = report.cards_seen,
            stop_reason = ?report.stop_reason,
            "done"
        ),
        Err(err) => {
            tracing::error!(%err, "extraction failed");
            std::process::exit(1);
        }
    }
}
