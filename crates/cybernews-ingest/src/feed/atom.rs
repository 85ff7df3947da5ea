//! Atom 1.0 entries.

use cybernews_core::RawFeedItem;

use super::{collect_entries, parse_feed_date, EntryFields, FeedParser};
use crate::error::ParseError;

/// Reads `title`, the first `<link>`'s `href` (or `src`), `published` falling
/// back to `updated`, and `summary` falling back to `content`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomParser;

fn first_link(fields: &EntryFields) -> String {
    fields
        .elements("link")
        .next()
        .and_then(|attrs| attrs.get("href").or_else(|| attrs.get("src")))
        .map(|href| href.trim().to_string())
        .unwrap_or_default()
}

impl FeedParser for AtomParser {
    fn parse(&self, xml: &str) -> Result<Vec<RawFeedItem>, ParseError> {
        let items = collect_entries(xml, "entry")?
            .into_iter()
            .map(|fields| RawFeedItem {
                title: fields.first_text(&["title"]).unwrap_or_default().to_string(),
                link: first_link(&fields),
                published_at: fields
                    .first_text(&["published", "updated"])
                    .and_then(parse_feed_date),
                body: fields
                    .first_text(&["summary", "content"])
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Schneier on Security</title>
  <link href="https://www.schneier.com/" rel="alternate"/>
  <entry>
    <title type="html">Backdoor found in &amp;quot;secure&amp;quot; router</title>
    <link rel="alternate" href="https://www.schneier.com/blog/backdoor/"/>
    <link rel="replies" href="https://www.schneier.com/blog/backdoor/#comments"/>
    <published>2024-05-03T12:00:00Z</published>
    <updated>2024-05-04T12:00:00Z</updated>
    <summary type="html">&lt;p&gt;A backdoor.&lt;/p&gt;</summary>
  </entry>
  <entry>
    <title>Only updated</title>
    <link href="https://www.schneier.com/blog/updated/"/>
    <updated>2024-05-05T09:15:00+02:00</updated>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Inline body</p></div></content>
  </entry>
</feed>"#;

    #[test]
    fn first_link_wins() {
        let items = AtomParser.parse(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link, "https://www.schneier.com/blog/backdoor/");
    }

    #[test]
    fn published_preferred_over_updated() {
        let items = AtomParser.parse(FEED).unwrap();
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap())
        );
        assert_eq!(
            items[1].published_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 5, 7, 15, 0).unwrap())
        );
    }

    #[test]
    fn summary_preferred_over_content() {
        let items = AtomParser.parse(FEED).unwrap();
        assert_eq!(items[0].body, "<p>A backdoor.</p>");
        assert_eq!(items[1].body, "Inline body");
    }

    #[test]
    fn entity_escaped_titles_stay_escaped_once() {
        let items = AtomParser.parse(FEED).unwrap();
        assert_eq!(items[0].title, "Backdoor found in &quot;secure&quot; router");
    }

    #[test]
    fn channel_link_is_not_an_entry() {
        let items = AtomParser.parse(FEED).unwrap();
        assert!(items.iter().all(|i| i.link != "https://www.schneier.com/"));
    }
}
