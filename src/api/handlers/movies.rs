use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::AppResult,
    models::{Genre, Movie, MovieId},
    services::{
        browse::{filter_and_sort, SortBy, ALL_CATEGORIES},
        catalog::{MovieList, Related},
        home::HomeFeed,
    },
};

fn first_page() -> u32 {
    1
}

/// `?page=`, passed to the catalog as-is
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "first_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sort: SortBy,
    #[serde(default = "first_page")]
    pub page: u32,
}

async fn movie_list(state: &AppState, list: MovieList, page: u32) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.list(list, page).await?;
    tracing::debug!(list = list.name(), page = page, count = movies.len(), "Movie list loaded");
    Ok(Json(movies))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    movie_list(&state, MovieList::Trending, params.page).await
}

pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    movie_list(&state, MovieList::Popular, params.page).await
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    movie_list(&state, MovieList::TopRated, params.page).await
}

pub async fn now_playing(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    movie_list(&state, MovieList::NowPlaying, params.page).await
}

pub async fn upcoming(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    movie_list(&state, MovieList::Upcoming, params.page).await
}

/// Title search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.search(&params.q, params.page).await?;
    Ok(Json(movies))
}

/// Popular movies filtered by text and category, then sorted
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.list(MovieList::Popular, params.page).await?;
    let category = if params.category.is_empty() {
        ALL_CATEGORIES
    } else {
        params.category.as_str()
    };
    Ok(Json(filter_and_sort(
        movies,
        &params.q,
        category,
        params.sort,
    )))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<Movie>> {
    let movie = state.catalog.movie_details(movie_id).await?;
    Ok(Json(movie))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state
        .catalog
        .related(movie_id, Related::Recommendations, params.page)
        .await?;
    Ok(Json(movies))
}

pub async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state
        .catalog
        .related(movie_id, Related::Similar, params.page)
        .await?;
    Ok(Json(movies))
}

pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.genres().await?))
}

pub async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<u32>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.by_genre(genre_id, params.page).await?;
    Ok(Json(movies))
}

/// Home screen: curated lists plus the user's continue-watching row
pub async fn home(State(state): State<AppState>) -> AppResult<Json<HomeFeed>> {
    let history = state.profile.get_watch_history();
    let feed = state.home.home_feed(&history).await?;
    Ok(Json(feed))
}
