//! Snippet cleanup
//!
//! Search snippets carry `<span class="searchmatch">` highlighting and
//! HTML entities. Entities are decoded first, then anything shaped like a
//! tag is dropped. This is pattern stripping, not HTML parsing: an
//! unclosed `<` survives as literal text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]+>").expect("tag pattern compiles");
}

/// Decode entities and remove tags
pub fn strip_html(input: &str) -> String {
    let decoded = html_escape::decode_html_entities(input);
    TAG.replace_all(&decoded, "").into_owned()
}

/// [`strip_html`] with absent input treated as empty
pub fn strip_html_opt(input: Option<&str>) -> String {
    strip_html(input.unwrap_or_default())
}
