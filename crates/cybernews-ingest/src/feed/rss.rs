//! RSS 2.0 and RSS 1.0 (RDF) items.

use cybernews_core::RawFeedItem;

use super::{collect_entries, parse_feed_date, FeedParser};
use crate::error::ParseError;

/// Reads `title`, `link`, `pubDate` (or `dc:date`), and `description` (or
/// `content:encoded`) from each `<item>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssParser;

impl FeedParser for RssParser {
    fn parse(&self, xml: &str) -> Result<Vec<RawFeedItem>, ParseError> {
        let items = collect_entries(xml, "item")?
            .into_iter()
            .map(|fields| RawFeedItem {
                title: fields.first_text(&["title"]).unwrap_or_default().to_string(),
                link: fields.first_text(&["link"]).unwrap_or_default().to_string(),
                published_at: fields
                    .first_text(&["pubDate", "date"])
                    .and_then(parse_feed_date),
                body: fields
                    .first_text(&["description", "encoded"])
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();
        Ok(items)
    }
}
