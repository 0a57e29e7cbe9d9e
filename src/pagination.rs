//! Scroll-driven pagination controller.
//!
//! Drives `Measuring -> Scrolling -> Waiting -> Measuring ...` cycles against
//! a [`PageDriver`] until the card count reaches the cap, stops growing for
//! `stall_limit` consecutive measurements, or the iteration ceiling is hit.
//! All three stop reasons are normal termination.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dom;
use crate::error::Result;
use crate::options::Options;
use crate::page::{ElementTarget, PageDriver};
use crate::selector::{self, cards, CardSelector};

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The visible card count reached the item cap.
    CapReached,
    /// The card count stayed unchanged for `stall_limit` measurements.
    NoProgress,
    /// The cycle ceiling was reached.
    IterationLimit,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Measuring,
    Scrolling,
    Waiting,
    Stopped(StopReason),
}

/// Final result of a pagination run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    pub reason: StopReason,
    /// Card descriptor adopted during the run; `None` if nothing ever matched.
    pub selector: Option<CardSelector>,
    /// Card count at the last measurement.
    pub observed_count: usize,
    /// Measurements performed.
    pub iterations: usize,
}

/// State machine for one page; construct a fresh one per session.
#[derive(Debug, Clone)]
pub struct PaginationController {
    cap: usize,
    stall_limit: usize,
    ceiling: usize,
    settle: Duration,
    state: PaginationState,
    previous_count: usize,
    last_count: usize,
    stall_count: usize,
    iterations: usize,
    adopted: Option<CardSelector>,
    scroll_target: ElementTarget,
}

impl PaginationController {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            cap: options.max_items_per_target,
            stall_limit: options.stall_limit.max(1),
            ceiling: options.iteration_ceiling(),
            settle: options.settle_interval,
            state: PaginationState::Measuring,
            previous_count: 0,
            last_count: 0,
            stall_count: 0,
            iterations: 0,
            adopted: None,
            scroll_target: ElementTarget::first("html"),
        }
    }

    #[must_use]
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Card descriptor adopted so far.
    #[must_use]
    pub fn selector(&self) -> Option<&CardSelector> {
        self.adopted.as_ref()
    }

    /// Count cards in a fresh snapshot.
    ///
    /// Until a descriptor has matched at least one card the resolver runs on
    /// every measurement; the first successful descriptor is kept for the
    /// rest of the session.
    fn measure(&mut self, driver: &mut impl PageDriver) -> Result<usize> {
        let html = driver.snapshot()?;
        let doc = dom::parse(&html);

        let count = if let Some(adopted) = &self.adopted {
            adopted.count(&doc)
        } else {
            let resolution = selector::resolve(&doc);
            if let Some(found) = resolution.selector.filter(|_| resolution.count > 0) {
                debug!(css = %found.css, source = ?found.source, "adopted card selector");
                self.adopted = Some(found);
            }
            resolution.count
        };

        self.scroll_target =
            ElementTarget::first(cards::scroll_container(&doc, self.adopted.as_ref()));
        Ok(count)
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self, driver: &mut impl PageDriver) -> Result<PaginationState> {
        self.state = match self.state {
            PaginationState::Measuring => {
                let count = self.measure(driver)?;
                self.iterations += 1;
                debug!(
                    iteration = self.iterations,
                    count,
                    previous = self.previous_count,
                    stalls = self.stall_count,
                    "pagination measurement"
                );

                self.last_count = count;

                if count >= self.cap {
                    PaginationState::Stopped(StopReason::CapReached)
                } else {
                    if count == self.previous_count {
                        self.stall_count += 1;
                    } else {
                        self.stall_count = 0;
                        self.previous_count = count;
                    }

                    if self.stall_count >= self.stall_limit {
                        PaginationState::Stopped(StopReason::NoProgress)
                    } else if self.iterations >= self.ceiling {
                        PaginationState::Stopped(StopReason::IterationLimit)
                    } else {
                        PaginationState::Scrolling
                    }
                }
            }
            PaginationState::Scrolling => {
                driver.scroll_to_end(&self.scroll_target)?;
                PaginationState::Waiting
            }
            PaginationState::Waiting => {
                driver.wait(self.settle)?;
                PaginationState::Measuring
            }
            PaginationState::Stopped(reason) => PaginationState::Stopped(reason),
        };
        Ok(self.state)
    }

    /// Run until a stop state is reached.
    pub fn run(&mut self, driver: &mut impl PageDriver) -> Result<PaginationOutcome> {
        loop {
            if let PaginationState::Stopped(reason) = self.step(driver)? {
                info!(
                    ?reason,
                    iterations = self.iterations,
                    count = self.last_count,
                    "pagination stopped"
                );
                return Ok(PaginationOutcome {
                    reason,
                    selector: self.adopted.clone(),
                    observed_count: self.last_count,
                    iterations: self.iterations,
                });
            }
        }
    }
}
