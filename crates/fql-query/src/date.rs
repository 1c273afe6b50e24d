//! ISO-8601 date literal shape check.
//!
//! The lexer uses this to classify numeric runs as dates, and the generator
//! re-applies it to values compared against date-typed fields.

use std::sync::OnceLock;

use regex::Regex;

/// Compiled date pattern, initialized on first use.
static ISO_DATE: OnceLock<Regex> = OnceLock::new();

/// `YYYY-MM-DD`, optionally `Thh:mm[:ss]`, optionally `Z` or `±hh:mm` after the time.
fn iso_date_regex() -> &'static Regex {
    ISO_DATE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}(:[0-9]{2})?(Z|[+-][0-9]{2}:[0-9]{2})?)?$")
            .expect("date pattern is valid")
    })
}

/// Returns true if `literal` has the shape of an ISO-8601 date or datetime.
///
/// Only the shape is checked; `2023-13-45` passes.
pub fn is_iso_date(literal: &str) -> bool {
    iso_date_regex().is_match(literal)
}
