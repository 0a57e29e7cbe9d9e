use std::time::Duration;

use rs_placereviews::{
    ElementTarget, Error, Options, PageDriver, PaginationController, Result, StopReason,
};

/// A host driver whose panel grows by `step` cards per scroll up to `total`,
/// optionally dropping the connection after a number of snapshots.
struct GrowingFeed {
    visible: usize,
    step: usize,
    total: usize,
    snapshots: usize,
    fail_after: Option<usize>,
    waited: Duration,
}

impl GrowingFeed {
    fn new(step: usize, total: usize) -> Self {
        Self {
            visible: step.min(total),
            step,
            total,
            snapshots: 0,
            fail_after: None,
            waited: Duration::ZERO,
        }
    }
}

impl PageDriver for GrowingFeed {
    fn navigate(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn snapshot(&mut self) -> Result<String> {
        self.snapshots += 1;
        if self.fail_after.is_some_and(|n| self.snapshots > n) {
            return Err(Error::Driver("target closed".to_string()));
        }
        let cards: String = (0..self.visible)
            .map(|i| format!(r#"<div data-review-id="c{i}"><span aria-label="4 stars"></span></div>"#))
            .collect();
        Ok(format!(r#"<div role="feed">{cards}</div>"#))
    }

    fn click(&mut self, _target: &ElementTarget) -> Result<()> {
        Ok(())
    }

    fn scroll_to_end(&mut self, target: &ElementTarget) -> Result<()> {
        assert_eq!(target.selector, "[role='feed']");
        self.visible = (self.visible + self.step).min(self.total);
        Ok(())
    }

    fn wait(&mut self, duration: Duration) -> Result<()> {
        self.waited += duration;
        Ok(())
    }
}

fn options(cap: usize) -> Options {
    Options {
        max_items_per_target: cap,
        settle_interval: Duration::from_millis(250),
        ..Options::default()
    }
}

#[test]
fn custom_driver_reaches_cap() {
    let mut feed = GrowingFeed::new(10, 1000);
    let outcome = PaginationController::new(&options(35)).run(&mut feed).unwrap();

    assert_eq!(outcome.reason, StopReason::CapReached);
    assert_eq!(outcome.observed_count, 40);
    assert_eq!(outcome.iterations, 4);
    assert_eq!(feed.waited, Duration::from_millis(750));
}

#[test]
fn exhausted_feed_stops_with_no_progress() {
    let mut feed = GrowingFeed::new(10, 25);
    let outcome = PaginationController::new(&options(100)).run(&mut feed).unwrap();

    assert_eq!(outcome.reason, StopReason::NoProgress);
    assert_eq!(outcome.observed_count, 25);
    assert_eq!(outcome.iterations, 6);
}

#[test]
fn slow_feed_hits_iteration_ceiling() {
    let mut feed = GrowingFeed::new(1, 1000);
    let opts = options(30);
    let outcome = PaginationController::new(&opts).run(&mut feed).unwrap();

    assert_eq!(outcome.reason, StopReason::IterationLimit);
    assert_eq!(outcome.iterations, 8);
    assert!(outcome.observed_count < opts.max_items_per_target);
}

#[test]
fn driver_failure_propagates() {
    let mut feed = GrowingFeed::new(5, 100);
    feed.fail_after = Some(2);

    let err = PaginationController::new(&options(50)).run(&mut feed).unwrap_err();
    assert!(matches!(err, Error::Driver(_)));
}
