// tests/feed_fixtures.rs
// Parser + normalizer against realistic feed shapes.

use conclave_watch::classify::Classifier;
use conclave_watch::ingest::{extract_latest, FeedError};
use conclave_watch::Classification;

const VATICAN: &str = include_str!("fixtures/vatican_news.xml");
const RDF: &str = include_str!("fixtures/rdf_feed.xml");
const UPPER: &str = include_str!("fixtures/uppercase_tags.xml");
const INLINE: &str = include_str!("fixtures/inline_markup.xml");

#[test]
fn rss2_newest_item_is_selected() {
    let item = extract_latest(VATICAN).expect("vatican fixture parses");
    assert_eq!(item.id, "vn-2025-05-08-conclave-day-two");
    assert_eq!(
        item.title,
        "Cardinals gather in the Sistine Chapel as voting underway"
    );
    // CDATA markup stripped, entities folded
    assert_eq!(
        item.summary,
        "The papal conclave enters its second day as crowds gather in St Peter's Square."
    );
    assert!(item.link.ends_with("conclave-day-two.html"));
    assert_eq!(item.published_at, Some(1_746_700_200));

    assert_eq!(
        Classifier::default().classify(&item.title, &item.summary),
        Classification::Generic
    );
}

#[test]
fn rdf_items_beside_channel_are_found_and_link_is_the_id() {
    let item = extract_latest(RDF).expect("rdf fixture parses");
    assert_eq!(item.id, "https://news.example.org/habemus-papam");
    assert_eq!(item.link, item.id);
    assert_eq!(
        Classifier::default().classify(&item.title, &item.summary),
        Classification::Announcement
    );
}

#[test]
fn tag_case_does_not_matter() {
    let item = extract_latest(UPPER).expect("uppercase fixture parses");
    assert_eq!(item.id, "up-1");
    assert_eq!(item.link, "https://example.org/guide");
    // explainer wins over "white smoke" + "new pope"
    assert_eq!(
        Classifier::default().classify(&item.title, &item.summary),
        Classification::Generic
    );
}

#[test]
fn structural_failures_are_distinct() {
    assert_eq!(
        extract_latest(include_str!("fixtures/empty_channel.xml")),
        Err(FeedError::EmptyFeed)
    );
    assert_eq!(
        extract_latest(include_str!("fixtures/no_identifier.xml")),
        Err(FeedError::MissingIdentifier)
    );
    assert!(matches!(
        extract_latest(include_str!("fixtures/not_a_feed.xml")),
        Err(FeedError::MalformedFeed(_))
    ));
    assert!(matches!(
        extract_latest("<rss><channel><item>"),
        Err(FeedError::Parse(_))
    ));
}

#[test]
fn inline_markup_does_not_glue_or_drop_words() {
    let item = extract_latest(INLINE).expect("inline markup fixture parses");
    assert_eq!(item.id, "wire-7781");
    assert_eq!(item.title, "We have a pope");
    assert_eq!(item.summary, "Habemus Papam: the bells of St Peter's ring out.");
    assert_eq!(
        Classifier::default().classify(&item.title, &item.summary),
        Classification::Announcement
    );
}

#[test]
fn absurdly_nested_document_is_a_parse_error() {
    let xml = format!("{}{}", "<a>".repeat(3_000), "</a>".repeat(3_000));
    assert!(matches!(extract_latest(&xml), Err(FeedError::Parse(_))));
}
