// src/ingest/parse.rs
//! XML → nested key/value document.
//!
//! Layout mirrors what generic XML-to-object parsers produce so the normalizer
//! can stay shape-agnostic:
//! - the document is `{ <root tag>: <root element> }`
//! - child elements are collected into arrays under their tag name
//! - attributes live under `"$"`, text of an element with attributes or
//!   children under `"_"`
//! - an element with text only becomes a plain string
//! - inline markup inside text (`We have <b>a</b> pope`) contributes its text
//!   to the enclosing element's `"_"`, in document order

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::FeedError;

pub const ATTRS_KEY: &str = "$";
pub const TEXT_KEY: &str = "_";

/// Feeds are a handful of levels deep; anything past this is hostile or broken.
pub const MAX_DEPTH: usize = 64;

struct Element {
    name: String,
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    /// Character data directly inside this element.
    text: String,
    /// Own text plus the text of every descendant, in document order.
    inner: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, FeedError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| FeedError::Parse(format!("attribute in <{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            attrs.insert(key, Value::String(value));
        }
        Ok(Self {
            name,
            attrs,
            children: Map::new(),
            text: String::new(),
            inner: String::new(),
        })
    }

    fn push_child(&mut self, name: String, value: Value) {
        let slot = self
            .children
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = slot {
            list.push(value);
        }
    }

    fn push_text(&mut self, s: &str) {
        self.text.push_str(s);
        self.inner.push_str(s);
    }

    /// Returns the element's tag, its value and its full inner text.
    fn into_value(self) -> (String, Value, String) {
        let own = self.text.trim();
        if self.attrs.is_empty() && self.children.is_empty() {
            let text = own.to_string();
            return (self.name, Value::String(text), self.inner);
        }
        let mut obj = self.children;
        if !self.attrs.is_empty() {
            obj.insert(ATTRS_KEY.to_string(), Value::Object(self.attrs));
        }
        // Mixed content: keep the words around inline children together.
        if !own.is_empty() {
            obj.insert(
                TEXT_KEY.to_string(),
                Value::String(self.inner.trim().to_string()),
            );
        }
        (self.name, Value::Object(obj), self.inner)
    }
}

/// Feeds routinely carry HTML entities that XML does not define.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

fn close(
    stack: &mut Vec<Element>,
    root: &mut Option<(String, Value)>,
    el: Element,
) -> Result<(), FeedError> {
    let (name, value, inner) = el.into_value();
    match stack.last_mut() {
        Some(parent) => {
            parent.inner.push_str(&inner);
            parent.push_child(name, value);
        }
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(FeedError::Parse(format!("second root element <{name}>"))),
    }
    Ok(())
}

pub fn parse_document(xml: &str) -> Result<Value, FeedError> {
    let cleaned = scrub_html_entities_for_xml(xml);
    // Whitespace is kept here and trimmed once per element on close.
    let mut reader = Reader::from_str(&cleaned);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(ev) => ev,
            Err(e) => {
                return Err(FeedError::Parse(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        };
        if matches!(event, Event::Start(_) | Event::Empty(_)) && stack.len() >= MAX_DEPTH {
            return Err(FeedError::Parse(format!(
                "nesting too deep (more than {MAX_DEPTH} levels)"
            )));
        }
        match event {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let el = Element::open(&start)?;
                close(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| FeedError::Parse("unbalanced closing tag".into()))?;
                close(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                if let Some(el) = stack.last_mut() {
                    match t.unescape() {
                        Ok(s) => el.push_text(&s),
                        Err(_) => el.push_text(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Event::CData(c) => {
                if let Some(el) = stack.last_mut() {
                    el.push_text(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::Parse(format!(
            "document ended inside <{}>",
            open.name
        )));
    }
    let (name, value) = root.ok_or_else(|| FeedError::Parse("document has no root element".into()))?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_xml2js_like_tree() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>News</title>
    <item>
      <guid isPermaLink="false">abc-1</guid>
      <title>First</title>
      <description><![CDATA[<p>Body</p>]]></description>
    </item>
    <item><title>Second</title></item>
  </channel>
</rss>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc["rss"]["$"]["version"], json!("2.0"));
        let channel = &doc["rss"]["channel"][0];
        assert_eq!(channel["title"], json!(["News"]));
        assert_eq!(channel["item"].as_array().map(Vec::len), Some(2));
        let first = &channel["item"][0];
        assert_eq!(
            first["guid"][0],
            json!({ "$": { "isPermaLink": "false" }, "_": "abc-1" })
        );
        assert_eq!(first["description"], json!(["<p>Body</p>"]));
    }

    #[test]
    fn html_entities_do_not_break_parsing() {
        let doc = parse_document("<rss><t>a&nbsp;b &ldquo;c&rdquo; &amp; d</t></rss>").unwrap();
        assert_eq!(doc["rss"]["t"], json!(["a b \"c\" & d"]));
    }

    #[test]
    fn empty_elements_become_empty_strings() {
        let doc = parse_document("<rss><channel><item/></channel></rss>").unwrap();
        assert_eq!(doc["rss"]["channel"][0]["item"], json!([""]));
    }

    #[test]
    fn inline_markup_keeps_surrounding_words() {
        let doc = parse_document(
            "<rss><item><title>We have <b>a</b> pope</title>\
             <description>Habemus <i>Papam</i></description></item></rss>",
        )
        .unwrap();
        let item = &doc["rss"]["item"][0];
        assert_eq!(item["title"][0]["_"], json!("We have a pope"));
        assert_eq!(item["title"][0]["b"], json!(["a"]));
        assert_eq!(item["description"][0]["_"], json!("Habemus Papam"));
    }

    #[test]
    fn structural_whitespace_is_not_text() {
        let xml = "<rss>\n  <channel>\n    <title> News </title>\n  </channel>\n</rss>";
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc["rss"]["channel"][0], json!({ "title": ["News"] }));
    }

    #[test]
    fn nesting_is_capped() {
        let nested = |n: usize| format!("{}{}", "<a>".repeat(n), "</a>".repeat(n));
        assert!(parse_document(&nested(MAX_DEPTH)).is_ok());

        let err = parse_document(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(&err, FeedError::Parse(m) if m.contains("too deep")), "{err}");
        let err = parse_document(&nested(5_000)).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let err = parse_document("<rss><channel><item>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
        let err = parse_document("not xml at all").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
