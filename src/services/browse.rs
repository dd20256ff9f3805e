use std::cmp::Ordering;

use serde::Deserialize;

use crate::models::Movie;

/// Category that matches every genre
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Highest rated first
    #[default]
    Rating,
    /// Newest first; unknown years last
    Year,
    /// Alphabetical
    Title,
}

/// Filters `movies` by a free-text query and a genre category, then sorts them.
///
/// The query matches the title or overview, case-insensitively. An empty
/// query or the `"All"` category matches everything.
pub fn filter_and_sort(movies: Vec<Movie>, query: &str, category: &str, sort: SortBy) -> Vec<Movie> {
    let query = query.trim().to_lowercase();

    let mut filtered: Vec<Movie> = movies
        .into_iter()
        .filter(|movie| {
            let matches_search = query.is_empty()
                || movie.title.to_lowercase().contains(&query)
                || movie.overview.to_lowercase().contains(&query);
            let matches_category =
                category.is_empty() || category == ALL_CATEGORIES || movie.genre == category;
            matches_search && matches_category
        })
        .collect();

    filtered.sort_by(|a, b| match sort {
        SortBy::Rating => b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal),
        SortBy::Year => match (a.release_year, b.release_year) {
            (Some(ya), Some(yb)) => yb.cmp(&ya),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    });

    filtered
}
