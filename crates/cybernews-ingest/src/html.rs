//! Link extraction from HTML listing pages.

use cybernews_core::text::clean_whitespace;
use cybernews_core::RawFeedItem;
use scraper::{Html, Selector};

use crate::error::ParseError;

/// Every element matching `selector` that carries an `href` and visible text
/// becomes one item titled by that text.
///
/// Hrefs starting with `/` are appended to `base_url` with its trailing slash
/// removed; anything else that does not start with `http` is skipped.
/// Extracted items carry no timestamp and no body.
///
/// # Errors
///
/// Returns [`ParseError::Selector`] when `selector` is not valid CSS.
pub fn extract_links(
    body: &str,
    base_url: &str,
    selector: &str,
) -> Result<Vec<RawFeedItem>, ParseError> {
    let parsed = Selector::parse(selector).map_err(|e| ParseError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(body);
    let base = base_url.trim_end_matches('/');

    let items = document
        .select(&parsed)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            let title = clean_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if href.is_empty() || title.is_empty() {
                return None;
            }

            let link = if href.starts_with('/') {
                format!("{base}{href}")
            } else if href.starts_with("http") {
                href.to_string()
            } else {
                return None;
            };

            Some(RawFeedItem {
                title,
                link,
                ..RawFeedItem::default()
            })
        })
        .collect();

    Ok(items)
}
