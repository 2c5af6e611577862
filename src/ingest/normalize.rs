// src/ingest/normalize.rs
//! Nested feed document → canonical [`FeedItem`] for the newest entry.

use serde_json::{Map, Value};
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use super::parse::{ATTRS_KEY, TEXT_KEY};
use super::{clean_text, FeedError, FeedItem};

/// How many wrapper levels (root element, namespace wrapper, channel) we
/// descend through looking for the item collection.
const MAX_NESTING: usize = 3;

/// `rdf:RDF` → `rdf`, `RSS` → `rss`: compare keys by lower-cased local name.
fn local_name(key: &str) -> String {
    key.rsplit(':').next().unwrap_or(key).to_ascii_lowercase()
}

/// Exact (case-insensitive) key first, then namespace-stripped local name,
/// so `link` wins over `atom:link`.
fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .or_else(|| obj.iter().find(|(k, _)| local_name(k) == name))
        .map(|(_, v)| v)
}

enum Located<'a> {
    Items(&'a Value),
    /// A channel node exists but holds no item collection.
    EmptyChannel,
}

fn locate_items(node: &Value, depth: usize) -> Option<Located<'_>> {
    match node {
        Value::Array(list) => list.first().and_then(|n| locate_items(n, depth)),
        Value::Object(obj) => {
            if let Some(items) = field(obj, "item") {
                return Some(Located::Items(items));
            }
            if depth == 0 {
                return None;
            }
            if let Some(channel) = field(obj, "channel") {
                return Some(locate_items(channel, depth - 1).unwrap_or(Located::EmptyChannel));
            }
            obj.iter()
                .filter(|(k, _)| k.as_str() != ATTRS_KEY)
                .find_map(|(_, child)| locate_items(child, depth - 1))
        }
        _ => None,
    }
}

/// Text content of a value in any of the shapes the parser emits.
fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Array(list) => list.first().map(text_of).unwrap_or_default(),
        Value::Object(obj) => obj
            .get(TEXT_KEY)
            .or_else(|| obj.get(ATTRS_KEY).and_then(|a| a.get("href")))
            .map(text_of)
            .unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn item_text(item: Option<&Map<String, Value>>, names: &[&str]) -> String {
    let Some(obj) = item else {
        return String::new();
    };
    names
        .iter()
        .filter_map(|n| field(obj, n))
        .map(text_of)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn parse_rfc2822_to_unix(ts: &str) -> Option<u64> {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
}

pub fn normalize(doc: &Value) -> Result<FeedItem, FeedError> {
    let items = match locate_items(doc, MAX_NESTING) {
        Some(Located::Items(items)) => items,
        Some(Located::EmptyChannel) => return Err(FeedError::EmptyFeed),
        None => {
            return Err(FeedError::MalformedFeed(
                "no channel/item collection in feed document".into(),
            ))
        }
    };

    let first = match items {
        Value::Array(list) => list.first().ok_or(FeedError::EmptyFeed)?,
        Value::Null => return Err(FeedError::EmptyFeed),
        Value::String(s) if s.trim().is_empty() => return Err(FeedError::EmptyFeed),
        other => other,
    };
    let obj = first.as_object();

    let link = item_text(obj, &["link"]);
    let mut id = item_text(obj, &["guid"]);
    if id.is_empty() {
        id = link.clone();
    }
    if id.is_empty() {
        return Err(FeedError::MissingIdentifier);
    }

    let published_at = Some(item_text(obj, &["pubDate", "date"]))
        .filter(|s| !s.is_empty())
        .and_then(|s| parse_rfc2822_to_unix(&s));

    Ok(FeedItem {
        id,
        title: clean_text(&item_text(obj, &["title"])),
        summary: clean_text(&item_text(obj, &["description", "summary"])),
        link,
        published_at,
    })
}
