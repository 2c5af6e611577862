// src/ingest/providers/synthetic.rs
//! Fixed single-item feed used in test mode instead of the network.

use async_trait::async_trait;
use quick_xml::escape::escape;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::ingest::types::FeedSource;
use crate::ingest::FeedError;

pub const TEST_ARTICLE_GUID: &str = "test-guid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticArticle {
    pub guid: String,
    pub title: String,
    pub description: String,
    pub link: String,
}

impl Default for SyntheticArticle {
    fn default() -> Self {
        Self {
            guid: TEST_ARTICLE_GUID.to_string(),
            title: "Habemus Papam: Cardinal Doe elected Pope Innocent XIV".to_string(),
            description: "Cardinals have elected a new pope during the fifth ballot.".to_string(),
            link: "https://example.com/fake-pope-news".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticFeedSource {
    article: SyntheticArticle,
}

impl SyntheticFeedSource {
    pub fn new(article: SyntheticArticle) -> Self {
        Self { article }
    }

    /// Renders the article as a regular RSS 2.0 document so it goes through
    /// the same parse/normalize path as live data.
    pub fn render(&self) -> String {
        let a = &self.article;
        let pub_date = OffsetDateTime::now_utc()
            .format(&Rfc2822)
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Synthetic test feed</title>
    <item>
      <guid isPermaLink="false">{}</guid>
      <title>{}</title>
      <description>{}</description>
      <link>{}</link>
      <pubDate>{}</pubDate>
    </item>
  </channel>
</rss>
"#,
            escape(a.guid.as_str()),
            escape(a.title.as_str()),
            escape(a.description.as_str()),
            escape(a.link.as_str()),
            pub_date
        )
    }
}

#[async_trait]
impl FeedSource for SyntheticFeedSource {
    async fn fetch(&self) -> Result<String, FeedError> {
        Ok(self.render())
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
