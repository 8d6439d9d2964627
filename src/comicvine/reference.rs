//! Extraction of a ComicVine reference id from a web address.

use std::sync::OnceLock;

use regex::Regex;

/// Matches a ComicVine record URL on either of the historical domains, with or
/// without TLS, and captures the numeric identifier after the `4000-` path
/// segment. Anchored at both ends, as a substring match would false-positive
/// on URLs embedding one catalog reference inside another path.
const REFERENCE_ID_PATTERN: &str =
    r"^https?://(www\.comicvine\.com|comicvine\.gamespot\.com)/.*/4000-(\d+).*$";

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(REFERENCE_ID_PATTERN).expect("reference id pattern is valid"))
}

/// Extract the reference id embedded in a ComicVine web address, or `None`
/// when the address does not match any known catalog URL shape.
pub fn reference_id(web_address: &str) -> Option<String> {
    pattern()
        .captures(web_address)
        .and_then(|captures| captures.get(2))
        .map(|id| id.as_str().to_string())
}

/// Whether the given address is a ComicVine record URL this crate can resolve.
pub fn supported_reference(web_address: &str) -> bool {
    pattern().is_match(web_address)
}
