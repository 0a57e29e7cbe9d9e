//! Configuration options for extraction sessions.
//!
//! The `Options` struct carries the session configuration (targets and item
//! cap), the pagination tuning knobs and the navigation policy flags. All
//! fields are public; use `Default::default()` for standard settings and
//! override what you need.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Navigation steps performed before pagination starts.
///
/// These are thin collaborators around the extraction engine. Every step is
/// best-effort: a missing consent dialog or reviews tab is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct NavigationPolicy {
    /// Click through the cookie/consent interstitial if one is shown.
    ///
    /// Default: `true`
    pub dismiss_consent: bool,

    /// Force the interface language through the `hl` query parameter.
    ///
    /// The field extractor's relative-time and star-label patterns are
    /// English, so forcing `"en"` keeps the fallback chains effective.
    ///
    /// Default: `Some("en")`
    pub force_locale: Option<String>,

    /// Click the "Reviews" tab of the place panel if present.
    ///
    /// Default: `true`
    pub open_reviews_tab: bool,

    /// Switch the review list ordering to newest-first if the sort menu is present.
    ///
    /// Default: `false`
    pub sort_newest: bool,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            dismiss_consent: true,
            force_locale: Some("en".to_string()),
            open_reviews_tab: true,
            sort_newest: false,
        }
    }
}

/// Configuration options for an extraction run.
///
/// # Example
///
/// ```rust
/// use rs_placereviews::Options;
///
/// let options = Options {
///     target_urls: vec!["https://maps.example.com/place/cafe".to_string()],
///     max_items_per_target: 50,
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
/// assert_eq!(options.iteration_ceiling(), 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Place pages to extract, processed one at a time in order.
    ///
    /// Default: empty (must be filled before `validate()` passes)
    pub target_urls: Vec<String>,

    /// Upper bound on accumulated reviews per target page.
    ///
    /// Default: `100`
    pub max_items_per_target: usize,

    /// Suspension after each scroll (and navigation click) so lazy content can render.
    ///
    /// Default: `1500ms`
    #[serde(with = "duration_millis")]
    pub settle_interval: Duration,

    /// Consecutive unchanged card counts that end pagination with `NoProgress`.
    ///
    /// Default: `3`
    pub stall_limit: usize,

    /// Assumed number of cards loaded per scroll batch.
    ///
    /// Default: `10`
    pub items_per_batch: usize,

    /// Extra cycles added on top of `ceil(cap / items_per_batch)`.
    ///
    /// Default: `5`
    pub extra_iterations: usize,

    /// Navigation steps before pagination.
    pub navigation: NavigationPolicy,

    /// Language tag stamped on every normalized review.
    ///
    /// Default: `"en"`
    pub language: String,

    /// Origin tag stamped on every normalized review.
    ///
    /// Default: `"google_maps"`
    pub origin: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target_urls: Vec::new(),
            max_items_per_target: 100,
            settle_interval: Duration::from_millis(1500),
            stall_limit: 3,
            items_per_batch: 10,
            extra_iterations: 5,
            navigation: NavigationPolicy::default(),
            language: "en".to_string(),
            origin: "google_maps".to_string(),
        }
    }
}

impl Options {
    /// Hard ceiling on pagination cycles: `ceil(cap / items_per_batch) + extra_iterations`.
    #[must_use]
    pub fn iteration_ceiling(&self) -> usize {
        self.max_items_per_target
            .div_ceil(self.items_per_batch.max(1))
            + self.extra_iterations
    }

    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> Result<()> {
        if self.target_urls.is_empty() {
            return Err(Error::InvalidConfig("target_urls is empty".to_string()));
        }
        if self.max_items_per_target == 0 {
            return Err(Error::InvalidConfig(
                "max_items_per_target must be positive".to_string(),
            ));
        }
        if self.items_per_batch == 0 {
            return Err(Error::InvalidConfig(
                "items_per_batch must be positive".to_string(),
            ));
        }
        for target in &self.target_urls {
            Url::parse(target)
                .map_err(|e| Error::InvalidConfig(format!("invalid target url {target:?}: {e}")))?;
        }
        Ok(())
    }

    /// Parse options from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_target() -> Options {
        Options {
            target_urls: vec!["https://maps.example.com/place/x".to_string()],
            ..Options::default()
        }
    }

    #[test]
    fn test_default_options() {
        let opts = Options::default();

        assert!(opts.target_urls.is_empty());
        assert_eq!(opts.max_items_per_target, 100);
        assert_eq!(opts.settle_interval, Duration::from_millis(1500));
        assert_eq!(opts.stall_limit, 3);
        assert_eq!(opts.items_per_batch, 10);
        assert_eq!(opts.extra_iterations, 5);
        assert_eq!(opts.language, "en");
        assert_eq!(opts.origin, "google_maps");
        assert!(opts.navigation.dismiss_consent);
        assert_eq!(opts.navigation.force_locale.as_deref(), Some("en"));
        assert!(!opts.navigation.sort_newest);
    }

    #[test]
    fn test_iteration_ceiling_rounds_up() {
        let mut opts = with_target();
        opts.max_items_per_target = 5;
        assert_eq!(opts.iteration_ceiling(), 6);

        opts.max_items_per_target = 20;
        assert_eq!(opts.iteration_ceiling(), 7);

        opts.max_items_per_target = 21;
        assert_eq!(opts.iteration_ceiling(), 8);
    }

    #[test]
    fn test_validate_rejects_empty_targets() {
        let err = Options::default().validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let opts = Options {
            max_items_per_target: 0,
            ..with_target()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let opts = Options {
            target_urls: vec!["not a url".to_string()],
            ..Options::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        assert!(with_target().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let opts = Options::from_json(
            r#"{"target_urls": ["https://maps.example.com/place/y"], "settle_interval": 250,
                "navigation": {"sort_newest": true}}"#,
        )
        .unwrap();

        assert_eq!(opts.target_urls.len(), 1);
        assert_eq!(opts.settle_interval, Duration::from_millis(250));
        assert_eq!(opts.max_items_per_target, 100);
        assert!(opts.navigation.sort_newest);
        assert!(opts.navigation.dismiss_consent);
    }
}
