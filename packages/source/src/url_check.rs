//! Syntactic URL validation.
//!
//! Remote locations are only accepted if they look like a hostname with a
//! plausible top-level domain. The check runs before any network access so
//! obviously malformed input is rejected immediately.

use std::sync::LazyLock;

/// Optional scheme or `www.` prefix, dotted hostname, 2-24 letter TLD,
/// optional port and path. Matches the whole string.
static URL_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^(?:https?://|www\.)?[a-z0-9](?:[a-z0-9.-]*[a-z0-9])?\.[a-z]{2,24}(?::\d{1,5})?(?:/\S*)?$",
    )
    .expect("valid URL pattern")
});

/// Returns `true` if `url` passes the hostname/TLD check.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    !url.is_empty() && URL_PATTERN.is_match(url)
}
