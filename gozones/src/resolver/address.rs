//! Address text cleanup before geocoding.

use std::sync::OnceLock;

use regex::Regex;

/// Trailing country designation with the separators in front of it.
///
/// Anchored on a separator (or the start) so a street name ending in
/// "usa" is left alone.
fn trailing_country_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[\s,]+)(?:united\s+states|usa)[\s,]*$").unwrap()
    })
}

/// Normalizes a free-text address.
///
/// Repeatedly strips trailing "United States" / "USA" tokens along with
/// their separating commas, collapses runs of whitespace and trims stray
/// trailing commas. Returns `None` if nothing is left.
pub fn normalize_address(raw: &str) -> Option<String> {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    loop {
        let stripped = trailing_country_pattern().replace(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    let text = text.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    (!text.is_empty()).then(|| text.to_string())
}
