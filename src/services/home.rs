use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Movie, MovieId, WatchHistoryEntry},
    services::catalog::{CatalogClient, MovieList},
};

const FEATURED_COUNT: usize = 5;
const TRENDING_COUNT: usize = 4;
const POPULAR_COUNT: usize = 3;
const CONTINUE_WATCHING_COUNT: usize = 4;
const RECOMMENDATION_COUNT: usize = 3;
const TOP_GENRE_COUNT: usize = 2;

/// A partly watched movie with the time left to finish it
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingItem {
    pub id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub progress: f64,
    pub duration_minutes: u32,
    pub minutes_left: u32,
}

/// Everything the home screen shows
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub featured: Vec<Movie>,
    pub trending: Vec<Movie>,
    pub popular: Vec<Movie>,
    pub continue_watching: Vec<ContinueWatchingItem>,
    pub recommendations: Vec<Movie>,
}

/// Composes screens from the catalog and the user's history
#[derive(Clone)]
pub struct HomeService {
    catalog: Arc<dyn CatalogClient>,
}

impl HomeService {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Builds the home feed. The three curated lists must load; per-movie
    /// lookups for enrichment, history and recommendations are best effort.
    pub async fn home_feed(&self, history: &[WatchHistoryEntry]) -> AppResult<HomeFeed> {
        let trending = self.catalog.list(MovieList::Trending, 1).await?;
        let featured = self.with_runtime(trending, FEATURED_COUNT).await;

        let popular_page = self.catalog.list(MovieList::Popular, 1).await?;
        let top_rated = self.catalog.list(MovieList::TopRated, 1).await?;

        let continue_watching = self.continue_watching(history).await;

        let top_genres = self.top_genres(history).await;
        let recommendations = if top_genres.is_empty() {
            top_rated.iter().take(RECOMMENDATION_COUNT).cloned().collect()
        } else {
            recommend_by_genre(&popular_page, &top_genres)
        };

        tracing::info!(
            featured = featured.len(),
            continue_watching = continue_watching.len(),
            recommendations = recommendations.len(),
            top_genres = ?top_genres,
            "Home feed composed"
        );

        Ok(HomeFeed {
            featured,
            trending: popular_page.into_iter().take(TRENDING_COUNT).collect(),
            popular: top_rated.into_iter().take(POPULAR_COUNT).collect(),
            continue_watching,
            recommendations,
        })
    }

    /// Fills in runtimes for the first `count` movies; a failed lookup keeps
    /// the list record as it is
    async fn with_runtime(&self, movies: Vec<Movie>, count: usize) -> Vec<Movie> {
        let lookups = movies.into_iter().take(count).map(|movie| async move {
            match self.catalog.movie_details(movie.id).await {
                Ok(details) => Movie {
                    runtime_minutes: details.runtime_minutes,
                    ..movie
                },
                Err(e) => {
                    tracing::warn!(error = %e, movie_id = movie.id, "Runtime lookup failed");
                    movie
                }
            }
        });
        join_all(lookups).await
    }

    async fn continue_watching(&self, history: &[WatchHistoryEntry]) -> Vec<ContinueWatchingItem> {
        let lookups = history
            .iter()
            .take(CONTINUE_WATCHING_COUNT)
            .map(|entry| async move {
                match self.catalog.movie_details(entry.movie_id).await {
                    Ok(movie) => Some(ContinueWatchingItem {
                        id: movie.id,
                        title: movie.title,
                        poster_url: movie.poster_url,
                        progress: entry.progress_percent,
                        duration_minutes: entry.duration_minutes,
                        minutes_left: entry.minutes_left(),
                    }),
                    Err(e) => {
                        tracing::warn!(error = %e, movie_id = entry.movie_id, "History lookup failed");
                        None
                    }
                }
            });
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// The most frequent genres across the whole watch history; ties keep
    /// the order in which genres were first seen
    async fn top_genres(&self, history: &[WatchHistoryEntry]) -> Vec<String> {
        let lookups = history
            .iter()
            .map(|entry| self.catalog.movie_details(entry.movie_id));

        let mut counts: Vec<(String, usize)> = Vec::new();
        for result in join_all(lookups).await {
            let movie = match result {
                Ok(movie) => movie,
                Err(e) => {
                    tracing::warn!(error = %e, "Genre lookup for recommendations failed");
                    continue;
                }
            };
            for genre in movie.genres {
                match counts.iter_mut().find(|(name, _)| *name == genre.name) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((genre.name, 1)),
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(TOP_GENRE_COUNT)
            .map(|(name, _)| name)
            .collect()
    }

    /// Resolves every bookmark to a movie, in bookmark order; failed lookups are skipped
    pub async fn bookmarked_movies(&self, bookmarks: &[MovieId]) -> Vec<Movie> {
        let lookups = bookmarks.iter().map(|id| async move {
            self.catalog
                .movie_details(*id)
                .await
                .map_err(|e| tracing::warn!(error = %e, movie_id = *id, "Bookmark lookup failed"))
                .ok()
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

/// Movies whose genre contains one of `genres`, case-insensitively
fn recommend_by_genre(movies: &[Movie], genres: &[String]) -> Vec<Movie> {
    let genres: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();
    movies
        .iter()
        .filter(|movie| {
            let genre = movie.genre.to_lowercase();
            genres.iter().any(|g| genre.contains(g.as_str()))
        })
        .take(RECOMMENDATION_COUNT)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Genre;
    use crate::services::catalog::MockCatalogClient;
    use chrono::Utc;

    fn movie(id: u64, genre: &str) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", id)),
            backdrop_url: None,
            rating: 7.0,
            genre: genre.to_string(),
            runtime_minutes: None,
            release_year: Some(2000),
            overview: String::new(),
            cast: vec![],
            trailer_url: None,
            director: None,
            genres: vec![Genre {
                id: 0,
                name: genre.to_string(),
            }],
            tagline: None,
            status: None,
            budget: None,
            revenue: None,
            release_date: None,
        }
    }

    fn entry(movie_id: u64, progress: f64, duration: u32) -> WatchHistoryEntry {
        WatchHistoryEntry {
            movie_id,
            progress_percent: progress,
            last_watched: Utc::now(),
            duration_minutes: duration,
        }
    }

    fn catalog_with_lists() -> MockCatalogClient {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_list().returning(|list, _| {
            let movies = match list {
                MovieList::Trending => (1..=8).map(|i| movie(i, "Action")).collect(),
                MovieList::Popular => vec![
                    movie(20, "Comedy"),
                    movie(21, "Drama"),
                    movie(22, "Horror"),
                    movie(23, "Drama"),
                    movie(24, "Science Fiction"),
                ],
                MovieList::TopRated => (30..=35).map(|i| movie(i, "Crime")).collect(),
                _ => vec![],
            };
            Ok(movies)
        });
        catalog
    }

    #[tokio::test]
    async fn test_feed_without_history() {
        let mut catalog = catalog_with_lists();
        catalog.expect_movie_details().returning(|id| {
            let mut details = movie(id, "Action");
            details.runtime_minutes = Some(100 + id as u32);
            Ok(details)
        });

        let feed = HomeService::new(Arc::new(catalog))
            .home_feed(&[])
            .await
            .unwrap();

        assert_eq!(feed.featured.len(), 5);
        assert_eq!(feed.featured[0].runtime_minutes, Some(101));
        assert_eq!(feed.trending.len(), 4);
        assert_eq!(feed.popular.len(), 3);
        assert!(feed.continue_watching.is_empty());
        // No history: recommendations fall back to top rated
        let ids: Vec<u64> = feed.recommendations.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![30, 31, 32]);
    }

    #[tokio::test]
    async fn test_feed_with_history() {
        let mut catalog = catalog_with_lists();
        catalog.expect_movie_details().returning(|id| match id {
            100 | 101 => Ok(movie(id, "Drama")),
            102 => Ok(movie(id, "Science Fiction")),
            103 => Err(AppError::NotFound(format!("Movie {} not found", id))),
            _ => Ok(movie(id, "Action")),
        });

        let history = vec![
            entry(100, 25.0, 120),
            entry(101, 50.0, 90),
            entry(102, 10.0, 100),
            entry(103, 80.0, 100),
        ];

        let feed = HomeService::new(Arc::new(catalog))
            .home_feed(&history)
            .await
            .unwrap();

        assert_eq!(feed.continue_watching.len(), 3);
        assert_eq!(feed.continue_watching[0].minutes_left, 90);
        assert_eq!(feed.continue_watching[1].minutes_left, 45);

        let ids: Vec<u64> = feed.recommendations.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![21, 23, 24]);
    }

    #[tokio::test]
    async fn test_feed_fails_when_a_list_fails() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_list()
            .returning(|_, _| Err(AppError::Catalog("TMDB API returned status 500".to_string())));

        let result = HomeService::new(Arc::new(catalog)).home_feed(&[]).await;
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_bookmarked_movies_skip_failures() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_movie_details().returning(|id| {
            if id == 2 {
                Err(AppError::Catalog("boom".to_string()))
            } else {
                Ok(movie(id, "Drama"))
            }
        });

        let movies = HomeService::new(Arc::new(catalog))
            .bookmarked_movies(&[3, 2, 1])
            .await;
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_recommend_by_genre_matches_substring() {
        let movies = vec![movie(1, "Science Fiction"), movie(2, "Drama"), movie(3, "Action")];
        let picked = recommend_by_genre(&movies, &["fiction".to_string()]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, 1);
    }
}
