//! Document handle abstraction.
//!
//! The extraction engine never talks to a browser directly. A host supplies a
//! [`PageDriver`] backed by whatever automation it runs; the engine only
//! navigates, snapshots the live tree as HTML, clicks, scrolls and waits.
//! [`ScriptedPage`] replays recorded snapshots and serves tests, benches and
//! offline extraction of saved pages.

use std::time::Duration;

use crate::dom;
use crate::error::{Error, Result};

/// Address of one element in the live document: the `index`-th match of `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementTarget {
    pub selector: String,
    pub index: usize,
}

impl ElementTarget {
    #[must_use]
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }

    /// The first match of `selector`.
    #[must_use]
    pub fn first(selector: impl Into<String>) -> Self {
        Self::new(selector, 0)
    }
}

/// A navigable, scrollable document owned by one session at a time.
pub trait PageDriver {
    /// Load `url` in the document.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Serialize the current live tree as HTML.
    fn snapshot(&mut self) -> Result<String>;

    /// Click an element.
    fn click(&mut self, target: &ElementTarget) -> Result<()>;

    /// Scroll an element to its maximum scroll extent.
    fn scroll_to_end(&mut self, target: &ElementTarget) -> Result<()>;

    /// Suspend so asynchronous content can render.
    fn wait(&mut self, duration: Duration) -> Result<()>;
}

/// A recorded driver call, for inspection in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Navigate(String),
    Snapshot,
    Click(ElementTarget),
    Scroll(ElementTarget),
    Wait(Duration),
}

struct ClickEffect {
    selector_fragment: String,
    frame: Option<String>,
}

/// In-memory driver replaying a fixed sequence of snapshots.
///
/// Each scroll advances to the next frame (staying on the last one when the
/// script runs out), modelling a panel that lazily renders more cards. Click
/// effects registered with [`ScriptedPage::on_click`] replace the current
/// frame; [`ScriptedPage::fail_clicks`] makes matching clicks error. Waits
/// are recorded but never sleep.
pub struct ScriptedPage {
    frames: Vec<String>,
    cursor: usize,
    effects: Vec<ClickEffect>,
    calls: Vec<DriverCall>,
}

impl ScriptedPage {
    #[must_use]
    pub fn new(frames: Vec<String>) -> Self {
        Self {
            frames,
            cursor: 0,
            effects: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// A page that never changes.
    #[must_use]
    pub fn single(html: impl Into<String>) -> Self {
        Self::new(vec![html.into()])
    }

    /// Clicking a target whose selector contains `selector_fragment` swaps in `frame`.
    #[must_use]
    pub fn on_click(mut self, selector_fragment: impl Into<String>, frame: impl Into<String>) -> Self {
        self.effects.push(ClickEffect {
            selector_fragment: selector_fragment.into(),
            frame: Some(frame.into()),
        });
        self
    }

    /// Clicking a target whose selector contains `selector_fragment` fails.
    #[must_use]
    pub fn fail_clicks(mut self, selector_fragment: impl Into<String>) -> Self {
        self.effects.push(ClickEffect {
            selector_fragment: selector_fragment.into(),
            frame: None,
        });
        self
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Index of the frame currently shown.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn current(&self) -> Result<&String> {
        self.frames
            .get(self.cursor)
            .ok_or_else(|| Error::Driver("scripted page has no frames".to_string()))
    }

    fn ensure_present(&self, target: &ElementTarget) -> Result<()> {
        let doc = dom::parse(self.current()?);
        if dom::count_in_document(&doc, &target.selector) > target.index {
            Ok(())
        } else {
            Err(Error::Driver(format!(
                "no element #{} for {:?}",
                target.index, target.selector
            )))
        }
    }
}

impl PageDriver for ScriptedPage {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.calls.push(DriverCall::Navigate(url.to_string()));
        self.cursor = 0;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<String> {
        self.calls.push(DriverCall::Snapshot);
        self.current().cloned()
    }

    fn click(&mut self, target: &ElementTarget) -> Result<()> {
        self.calls.push(DriverCall::Click(target.clone()));
        self.ensure_present(target)?;
        let effect = self
            .effects
            .iter()
            .find(|e| target.selector.contains(&e.selector_fragment));
        match effect {
            Some(ClickEffect { frame: Some(frame), .. }) => {
                let frame = frame.clone();
                if let Some(slot) = self.frames.get_mut(self.cursor) {
                    *slot = frame;
                }
                Ok(())
            }
            Some(ClickEffect { frame: None, .. }) => Err(Error::Driver(format!(
                "click on {:?} rejected",
                target.selector
            ))),
            None => Ok(()),
        }
    }

    fn scroll_to_end(&mut self, target: &ElementTarget) -> Result<()> {
        self.calls.push(DriverCall::Scroll(target.clone()));
        self.ensure_present(target)?;
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }
        Ok(())
    }

    fn wait(&mut self, duration: Duration) -> Result<()> {
        self.calls.push(DriverCall::Wait(duration));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_advances_and_saturates() {
        let mut page = ScriptedPage::new(vec!["<p>1</p>".into(), "<p>2</p>".into()]);
        let body = ElementTarget::first("body");

        assert!(page.snapshot().unwrap().contains('1'));
        page.scroll_to_end(&body).unwrap();
        assert!(page.snapshot().unwrap().contains('2'));
        page.scroll_to_end(&body).unwrap();
        assert_eq!(page.cursor(), 1);
    }

    #[test]
    fn test_click_requires_present_element() {
        let mut page = ScriptedPage::single("<button class='go'>Go</button>");
        assert!(page.click(&ElementTarget::first("button.go")).is_ok());
        assert!(page.click(&ElementTarget::new("button.go", 1)).is_err());
        assert!(page.click(&ElementTarget::first("button.stop")).is_err());
    }

    #[test]
    fn test_root_element_is_scrollable() {
        let mut page = ScriptedPage::single("<p>No reviews</p>");
        assert!(page.scroll_to_end(&ElementTarget::first("html")).is_ok());
        assert!(page.scroll_to_end(&ElementTarget::new("html", 1)).is_err());
    }

    #[test]
    fn test_click_effects() {
        let mut page = ScriptedPage::single("<button class='more'>More</button>")
            .on_click("more", "<p>expanded</p>");
        page.click(&ElementTarget::first("button.more")).unwrap();
        assert!(page.snapshot().unwrap().contains("expanded"));

        let mut page = ScriptedPage::single("<button class='more'>More</button>").fail_clicks("more");
        assert!(page.click(&ElementTarget::first("button.more")).is_err());
    }

    #[test]
    fn test_calls_recorded() {
        let mut page = ScriptedPage::single("<p>x</p>");
        page.navigate("https://example.com").unwrap();
        page.wait(Duration::from_millis(5)).unwrap();
        assert_eq!(
            page.calls(),
            &[
                DriverCall::Navigate("https://example.com".into()),
                DriverCall::Wait(Duration::from_millis(5)),
            ]
        );
    }
}
