//! Relevance scoring for keyword search

use crate::storage::Page;

const TITLE_CONTAINS: f64 = 10.0;
const TITLE_EXACT: f64 = 20.0;
const TITLE_PREFIX: f64 = 5.0;
const TITLE_PER_OCCURRENCE: f64 = 3.0;

const URL_CONTAINS: f64 = 5.0;
/// Applied under the same condition as `URL_CONTAINS`, so every URL match
/// earns both. Kept separate so the combined +7 stays visible.
const URL_DUPLICATE_BONUS: f64 = 2.0;
const URL_PER_OCCURRENCE: f64 = 2.0;

const CONTENT_CONTAINS: f64 = 1.0;
const CONTENT_PER_OCCURRENCE: f64 = 0.5;
const CONTENT_PREFIX: f64 = 2.0;

/// Content bytes per point of length penalty
const LENGTH_PENALTY_DIVISOR: f64 = 10_000.0;

/// Scores how well a page matches a query
///
/// All comparisons are case-insensitive substring tests. Title matches weigh
/// most, then URL, then body text; longer bodies are penalised linearly. The
/// result is never negative.
///
/// # Examples
///
/// ```
/// use kumo_search::search::score;
/// use kumo_search::Page;
///
/// let page = Page::new("https://example.com/", "Rust", "");
/// assert_eq!(score(&page, "rust"), 10.0 + 20.0 + 5.0 + 3.0);
/// ```
pub fn score(page: &Page, query: &str) -> f64 {
    let query = query.to_lowercase();
    let title = page.title.to_lowercase();
    let url = page.url.to_lowercase();
    let content = page.content.to_lowercase();

    let mut score = 0.0;

    if title.contains(&query) {
        score += TITLE_CONTAINS;

        if title == query {
            score += TITLE_EXACT;
        }

        if title.starts_with(&query) {
            score += TITLE_PREFIX;
        }

        score += occurrences(&title, &query) as f64 * TITLE_PER_OCCURRENCE;
    }

    if url.contains(&query) {
        score += URL_CONTAINS;
        score += URL_DUPLICATE_BONUS;
        score += occurrences(&url, &query) as f64 * URL_PER_OCCURRENCE;
    }

    if content.contains(&query) {
        score += CONTENT_CONTAINS;
        score += occurrences(&content, &query) as f64 * CONTENT_PER_OCCURRENCE;

        if content.starts_with(&query) {
            score += CONTENT_PREFIX;
        }
    }

    score -= page.content.len() as f64 / LENGTH_PENALTY_DIVISOR;

    score.max(0.0)
}

/// Non-overlapping occurrence count
fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Scores every page and sorts by descending score
///
/// The sort is stable: pages with equal scores keep their input order.
pub fn rank_pages(pages: Vec<Page>, query: &str) -> Vec<Page> {
    let mut ranked: Vec<Page> = pages
        .into_iter()
        .map(|mut page| {
            page.score = Some(score(&page, query));
            page
        })
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.score.unwrap_or(0.0);
        let b = b.score.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    ranked
}
