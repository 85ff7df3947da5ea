//! Syndication feed parsing.
//!
//! [`parse_feed`] sniffs the document root and hands the body to the matching
//! [`FeedParser`]. Both parsers share [`collect_entries`], which walks the
//! XML once and gathers the direct children of every `<item>` / `<entry>`.

mod atom;
mod dates;
mod rss;

use std::collections::HashMap;

use cybernews_core::RawFeedItem;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;

pub use atom::AtomParser;
pub use dates::parse_feed_date;
pub use rss::RssParser;

/// One feed dialect's mapping from XML to [`RawFeedItem`]s.
pub trait FeedParser {
    /// # Errors
    ///
    /// Returns [`ParseError::Xml`] for malformed XML.
    fn parse(&self, xml: &str) -> Result<Vec<RawFeedItem>, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    /// RSS 2.0 or RSS 1.0 (RDF).
    Rss,
    Atom,
}

/// Identify the feed dialect from the document's root element.
///
/// # Errors
///
/// - [`ParseError::UnrecognizedRoot`] when the root is neither `rss`, `RDF`,
///   nor `feed`.
/// - [`ParseError::Empty`] when the document has no element at all.
/// - [`ParseError::Xml`] when the prolog itself is malformed.
pub fn detect_format(xml: &str) -> Result<FeedFormat, ParseError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let name = local_name(&e);
                return match name.as_str() {
                    "rss" | "RDF" => Ok(FeedFormat::Rss),
                    "feed" => Ok(FeedFormat::Atom),
                    _ => Err(ParseError::UnrecognizedRoot(name)),
                };
            }
            Event::Eof => return Err(ParseError::Empty),
            _ => {}
        }
    }
}

/// Parse an RSS or Atom document into raw items, in document order.
///
/// # Errors
///
/// See [`detect_format`] and [`FeedParser::parse`].
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedItem>, ParseError> {
    match detect_format(xml)? {
        FeedFormat::Rss => RssParser.parse(xml),
        FeedFormat::Atom => AtomParser.parse(xml),
    }
}

/// Direct children of one `<item>` / `<entry>`.
#[derive(Debug, Default)]
pub(crate) struct EntryFields {
    /// Child local name to its text, with nested markup text joined by spaces.
    text: HashMap<String, String>,
    /// Attributes of each child element, in document order.
    attrs: Vec<(String, HashMap<String, String>)>,
}

impl EntryFields {
    /// Trimmed text of the first non-empty child among `names`.
    pub(crate) fn first_text(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|n| self.text.get(*n))
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
    }

    /// Attribute maps of every child named `name`.
    pub(crate) fn elements<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a HashMap<String, String>> + 'a {
        self.attrs
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, a)| a)
    }
}

/// Walk `xml` and collect the children of every element whose local name is
/// `entry_name`. Namespace prefixes are ignored.
pub(crate) fn collect_entries(xml: &str, entry_name: &str) -> Result<Vec<EntryFields>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut depth = 0usize;
    // Depth of the open entry element, if any.
    let mut entry_depth: Option<usize> = None;
    let mut current = EntryFields::default();
    // Direct child currently receiving text.
    let mut field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = local_name(&e);
                match entry_depth {
                    None if name == entry_name => {
                        entry_depth = Some(depth);
                        current = EntryFields::default();
                    }
                    Some(d) if depth == d + 1 => {
                        current.attrs.push((name.clone(), attributes(&e)));
                        field = Some(name);
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if entry_depth.is_some_and(|d| depth == d) {
                    current.attrs.push((local_name(&e), attributes(&e)));
                }
            }
            Event::End(_) => {
                match entry_depth {
                    Some(d) if depth == d => {
                        entries.push(std::mem::take(&mut current));
                        entry_depth = None;
                        field = None;
                    }
                    Some(d) if depth == d + 1 => field = None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some(name) = &field {
                    let text = match e.unescape() {
                        Ok(t) => t.into_owned(),
                        Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                    };
                    append(&mut current, name, &text);
                }
            }
            Event::CData(e) => {
                if let Some(name) = &field {
                    append(&mut current, name, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn append(entry: &mut EntryFields, field: &str, text: &str) {
    let slot = entry.text.entry(field.to_owned()).or_default();
    if !slot.is_empty() {
        slot.push(' ');
    }
    slot.push_str(text);
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> HashMap<String, String> {
    e.attributes()
        .filter_map(Result::ok)
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            (key, value)
        })
        .collect()
}
