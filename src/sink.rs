//! Output sinks for per-target review batches.
//!
//! A session hands exactly one batch per target to its sink, including empty
//! batches. The [`NormalizedReview`] field set is the contract; how it is
//! persisted is up to the sink.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Result;
use crate::result::NormalizedReview;

/// Receiver of accumulated reviews.
pub trait ReviewSink {
    /// Accept the batch for one target page. `batch` is in first-seen order
    /// and may be empty.
    fn accept(&mut self, target_url: &str, batch: &[NormalizedReview]) -> Result<()>;
}

/// Writes one JSON object per review, newline-delimited.
///
/// # Example
///
/// ```rust
/// use rs_placereviews::sink::{JsonLinesSink, ReviewSink};
///
/// let mut sink = JsonLinesSink::new(Vec::new());
/// sink.accept("https://maps.example.com/place/x", &[]).unwrap();
/// assert!(sink.into_inner().is_empty());
/// ```
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Reviews written so far across all batches.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReviewSink for JsonLinesSink<W> {
    fn accept(&mut self, _target_url: &str, batch: &[NormalizedReview]) -> Result<()> {
        for review in batch {
            serde_json::to_writer(&mut self.writer, review)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        self.written += batch.len();
        Ok(())
    }
}

/// Keeps every batch in memory, keyed by target URL.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    batches: BTreeMap<String, Vec<NormalizedReview>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch stored for `target_url`, if one was handed over.
    #[must_use]
    pub fn batch(&self, target_url: &str) -> Option<&[NormalizedReview]> {
        self.batches.get(target_url).map(Vec::as_slice)
    }

    /// Number of targets that handed over a batch (empty or not).
    #[must_use]
    pub fn targets(&self) -> usize {
        self.batches.len()
    }

    #[must_use]
    pub fn into_batches(self) -> BTreeMap<String, Vec<NormalizedReview>> {
        self.batches
    }
}

impl ReviewSink for MemorySink {
    fn accept(&mut self, target_url: &str, batch: &[NormalizedReview]) -> Result<()> {
        self.batches
            .entry(target_url.to_string())
            .or_default()
            .extend_from_slice(batch);
        Ok(())
    }
}
