//! Charset handling for saved page snapshots.
//!
//! Live snapshots from a [`PageDriver`](crate::page::PageDriver) are already
//! strings. Pages saved to disk or piped in as raw bytes are decoded here:
//! a byte-order mark wins, then a `<meta>` charset declaration in the head,
//! then UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Bytes scanned for a `<meta>` declaration.
const SNIFF_WINDOW: usize = 2048;

/// `<meta charset=...>` or `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?\bcharset\s*=\s*["']?([A-Za-z0-9_.:-]+)"#).expect("valid regex")
});

/// Charset label declared in the first bytes of a page, if any.
#[must_use]
pub fn declared_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_WINDOW)]);
    META_CHARSET
        .captures(&head)
        .map(|caps| caps[1].to_string())
}

/// Pick the encoding of a raw snapshot.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    declared_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode a raw snapshot to UTF-8, replacing undecodable sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use rs_placereviews::encoding::decode_snapshot;
///
/// let html = b"<meta charset=\"windows-1252\"><span>Caf\xE9 \x93Luna\x94</span>";
/// assert!(decode_snapshot(html).contains("Caf\u{e9} \u{201c}Luna\u{201d}"));
/// ```
#[must_use]
pub fn decode_snapshot(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "snapshot contained undecodable bytes");
    }
    decoded.into_owned()
}
