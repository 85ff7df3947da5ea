//! Markdown rendering of the daily digest.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cybernews_core::text::{clean_whitespace, truncate_chars};
use cybernews_core::{Article, Severity};
use cybernews_enrich::classifier::DEFAULT_CATEGORY;
use cybernews_enrich::{soc_action, Digest};

pub(crate) const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Summary characters shown per article.
const SUMMARY_CHARS: usize = 600;

fn severity_label(article: &Article) -> &'static str {
    article.severity.map_or("n/a", Severity::as_str)
}

fn category_label(article: &Article) -> &str {
    article.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
}

fn soc_text(article: &Article) -> String {
    article.soc_action.clone().unwrap_or_else(|| {
        soc_action(
            category_label(article),
            article.severity.unwrap_or(Severity::Baja),
        )
    })
}

/// Render the digest as markdown.
///
/// # Errors
///
/// Propagates [`fmt::Error`] from the underlying writer.
pub(crate) fn render_markdown(
    digest: &Digest,
    since: &str,
    limit: usize,
    date: NaiveDate,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_digest(&mut out, digest, since, limit, date)?;

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push('\n');
    Ok(out)
}

fn write_digest<W: fmt::Write>(
    out: &mut W,
    digest: &Digest,
    since: &str,
    limit: usize,
    date: NaiveDate,
) -> fmt::Result {
    writeln!(out, "# Daily security digest: {date}")?;
    writeln!(out, "Window: last **{since}**")?;
    writeln!(
        out,
        "Articles in report: **{}** (limit={limit})\n",
        digest.articles.len()
    )?;

    write_top(out, &digest.top)?;
    write_trending(out, &digest.trending)?;

    writeln!(out, "## Articles")?;
    digest
        .articles
        .iter()
        .try_for_each(|article| write_article(out, article))
}

fn write_top<W: fmt::Write>(out: &mut W, top: &[Article]) -> fmt::Result {
    writeln!(out, "## Top 5")?;
    if top.is_empty() {
        writeln!(out, "(no articles)")?;
    }
    for (i, article) in top.iter().enumerate() {
        writeln!(out, "{}. **{}**", i + 1, article.title)?;
        writeln!(
            out,
            "   - Severity: **{}** | Category: **{}**",
            severity_label(article),
            category_label(article)
        )?;
        writeln!(out, "   - URL: {}", article.url)?;
    }
    writeln!(out)
}

fn write_trending<W: fmt::Write>(out: &mut W, trending: &[(String, usize)]) -> fmt::Result {
    writeln!(out, "## Trending terms")?;
    if trending.is_empty() {
        writeln!(out, "(no data)")?;
    } else {
        let terms: Vec<String> = trending
            .iter()
            .map(|(term, count)| format!("`{term}` ({count})"))
            .collect();
        writeln!(out, "{}", terms.join(", "))?;
    }
    writeln!(out)
}

fn write_article<W: fmt::Write>(out: &mut W, article: &Article) -> fmt::Result {
    let published = article
        .published_at
        .map_or_else(|| "n/a".to_string(), |p| p.to_rfc3339());

    writeln!(out, "### {}", article.title)?;
    writeln!(
        out,
        "- Source: **{}** | Domain: `{}`",
        article.source, article.domain
    )?;
    writeln!(out, "- Published: **{published}**")?;
    writeln!(
        out,
        "- Category: **{}** | Severity: **{}**",
        category_label(article),
        severity_label(article)
    )?;
    writeln!(out, "- URL: {}", article.url)?;

    let summary = clean_whitespace(
        article
            .summary
            .as_deref()
            .or(article.content.as_deref())
            .unwrap_or_default(),
    );
    writeln!(out, "\n**Summary:**")?;
    if summary.is_empty() {
        writeln!(out, "(no summary available)")?;
    } else {
        writeln!(out, "{}", truncate_chars(&summary, SUMMARY_CHARS))?;
    }

    writeln!(out, "\n**What a SOC should check:**")?;
    writeln!(out, "{}\n", soc_text(article))
}

/// Write `markdown` to `<dir>/report_<date>.md`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written.
pub(crate) fn write_report(dir: &Path, markdown: &str, date: NaiveDate) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("report_{}.md", date.format("%Y-%m-%d")));
    std::fs::write(&path, markdown)?;
    Ok(path)
}
