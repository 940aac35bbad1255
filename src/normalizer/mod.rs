use chrono::Utc;
use feed_rs::model::{Entry, FeedType};
use feed_rs::parser::{self, Parser};
use html_escape::decode_html_entities;

use crate::app::{Result, TributaryError};
use crate::domain::{BodyFields, RawItem};

/// Parses RSS 0.9x/1.0/2.0, Atom and JSON Feed payloads into [`RawItem`]s,
/// preserving feed order.
pub struct Normalizer {
    parser: Parser,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        // An entry without a published id must stay without one, so the link
        // becomes its identifier instead of a parser-synthesized hash.
        let parser = parser::Builder::new()
            .id_generator(|_links, _title, _uri| String::new())
            .build();
        Self { parser }
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<RawItem>> {
        let feed = self
            .parser
            .parse(body)
            .map_err(|e| TributaryError::FeedParse(e.to_string()))?;

        let is_rss = matches!(
            feed.feed_type,
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2
        );

        Ok(feed
            .entries
            .into_iter()
            .map(|entry| Self::raw_item(entry, is_rss))
            .collect())
    }

    fn raw_item(entry: Entry, is_rss: bool) -> RawItem {
        let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };

        let guid = non_empty(entry.id);
        let link = entry.links.first().map(|l| l.href.clone());
        let title = entry
            .title
            .map(|t| decode_html_entities(&t.content).to_string());
        let published_at = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.with_timezone(&Utc));

        let content = entry.content.and_then(|c| c.body).and_then(non_empty);
        let summary = entry.summary.map(|s| s.content).and_then(non_empty);
        let media_description = entry
            .media
            .into_iter()
            .find_map(|m| m.description.map(|d| d.content).and_then(non_empty));

        // RSS carries the full body in content:encoded and the teaser in
        // <description>; Atom and JSON Feed use content/summary.
        let body = if is_rss {
            BodyFields {
                encoded: content,
                content: None,
                summary: None,
                description: summary.or(media_description),
            }
        } else {
            BodyFields {
                encoded: None,
                content,
                summary,
                description: media_description,
            }
        };

        RawItem {
            guid,
            link,
            title,
            published_at,
            body,
        }
    }
}
