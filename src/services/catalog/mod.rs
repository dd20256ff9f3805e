/// Movie catalog abstraction
///
/// Read-only access to movie metadata. Every implementation returns the same
/// normalized `Movie` record whether it came from a list or a detail endpoint.
use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Curated movie lists offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Trending,
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieList {
    pub fn name(&self) -> &'static str {
        match self {
            MovieList::Trending => "trending",
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::NowPlaying => "now_playing",
            MovieList::Upcoming => "upcoming",
        }
    }
}

/// Lists derived from a single movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Related {
    Recommendations,
    Similar,
}

/// Trait for movie catalog clients
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches one page of a curated list
    async fn list(&self, list: MovieList, page: u32) -> AppResult<Vec<Movie>>;

    /// Free-text title search; an empty query is invalid input
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<Movie>>;

    /// Movies of one genre, most popular first
    async fn by_genre(&self, genre_id: u32, page: u32) -> AppResult<Vec<Movie>>;

    /// All movie genres known to the catalog
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Recommendations or similar titles for a movie
    async fn related(&self, movie_id: MovieId, related: Related, page: u32)
        -> AppResult<Vec<Movie>>;

    /// Full record with runtime, cast, director and trailer
    async fn movie_details(&self, movie_id: MovieId) -> AppResult<Movie>;

    /// Client name for logging and debugging
    fn name(&self) -> &'static str;
}
