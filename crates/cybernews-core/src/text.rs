//! Plain-text normalization for fetched titles and bodies.

use scraper::Html;

/// Collapse runs of whitespace into single spaces and trim.
#[must_use]
pub fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert an HTML fragment (or entity-laden text) into plain text.
///
/// Repairs the mangled numeric entities some feeds emit (`&#;x26;` becomes
/// `&#x26;`), decodes entities, drops markup, and collapses whitespace.
#[must_use]
pub fn html_to_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let repaired = raw
        .replace("&#;x", "&#x")
        .replace("&#;X", "&#X")
        .replace("&#;#", "&#");

    // Escaped markup (`&lt;p&gt;`) decodes to tags on the first pass.
    let first = fragment_text(&repaired);
    let text = if first.contains('<') && first.contains('>') {
        fragment_text(&first)
    } else {
        first
    };

    clean_whitespace(&text)
}

/// Truncate to at most `max_chars` characters, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_whitespace_collapses_runs() {
        assert_eq!(clean_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn html_to_text_strips_tags() {
        assert_eq!(
            html_to_text("<p>Patch <b>now</b></p><p>please</p>"),
            "Patch now please"
        );
    }

    #[test]
    fn html_to_text_decodes_entities() {
        assert_eq!(html_to_text("Tom &amp; Jerry&#39;s"), "Tom & Jerry's");
    }

    #[test]
    fn html_to_text_repairs_broken_numeric_entities() {
        assert_eq!(html_to_text("it&#;x27;s"), "it's");
        assert_eq!(html_to_text("it&#;#39;s"), "it's");
    }

    #[test]
    fn html_to_text_handles_escaped_markup() {
        assert_eq!(
            html_to_text("&lt;p&gt;Critical flaw&lt;/p&gt;"),
            "Critical flaw"
        );
    }

    #[test]
    fn html_to_text_empty_input() {
        assert_eq!(html_to_text("   "), "");
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
