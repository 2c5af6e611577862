// src/ingest/mod.rs
pub mod error;
pub mod normalize;
pub mod parse;
pub mod providers;
pub mod types;

pub use error::FeedError;
pub use normalize::normalize;
pub use parse::parse_document;
pub use types::{FeedItem, FeedSource};

use once_cell::sync::OnceCell;
use regex::Regex;

/// Clean feed text for classification and display: decode entities, strip
/// tags, fold typographic quotes and collapse whitespace.
pub fn clean_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) “ ” « » ‘ ’ to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (including NBSP)
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Parse a raw feed and pick its newest entry.
pub fn extract_latest(raw: &str) -> Result<FeedItem, FeedError> {
    let doc = parse_document(raw)?;
    normalize(&doc)
}
