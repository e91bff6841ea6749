//! Search command - find text in extracted page text

use crate::search::{index_matches, MatchCursor, PageTextSource, PlainTextPages, MIN_QUERY_LEN};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(pages_path: &Path, query: &str) -> Result<()> {
    let pages = PlainTextPages::load(pages_path)
        .with_context(|| format!("Failed to read {}", pages_path.display()))?;

    if query.chars().count() < MIN_QUERY_LEN {
        println!(
            "{} Queries need at least {} characters",
            style("○").dim(),
            MIN_QUERY_LEN
        );
        return Ok(());
    }

    let mut cursor = MatchCursor::new(index_matches(&pages, query)?);
    if cursor.is_empty() {
        println!(
            "No matches for '{}' in {} pages",
            query,
            pages.page_count()
        );
        return Ok(());
    }

    println!(
        "{} {} matches for '{}' across {} pages\n",
        style("✓").green(),
        cursor.len(),
        style(query).bold(),
        pages.page_count()
    );
    for _ in 0..cursor.len() {
        let (Some(ordinal), Some(hit)) = (cursor.ordinal(), cursor.current().copied()) else {
            break;
        };
        println!(
            "  {}/{}  page {}  (match {} on page)",
            ordinal,
            cursor.len(),
            style(hit.page_index).cyan(),
            hit.match_index + 1
        );
        cursor.next();
    }
    Ok(())
}
