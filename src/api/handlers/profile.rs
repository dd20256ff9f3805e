use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::AppResult,
    middleware::RequestId,
    models::{Movie, MovieId, Preferences, UserProfile, WatchHistoryEntry},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatus {
    pub movie_id: MovieId,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProgress {
    pub movie_id: MovieId,
    pub progress: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub progress: f64,
    /// Runtime in minutes
    pub duration: u32,
}

pub async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.profile.snapshot())
}

pub async fn get_bookmarks(State(state): State<AppState>) -> Json<Vec<MovieId>> {
    Json(state.profile.get_bookmarks())
}

/// Bookmarks resolved to full movie records, in bookmark order
pub async fn bookmarked_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    let bookmarks = state.profile.get_bookmarks();
    Json(state.home.bookmarked_movies(&bookmarks).await)
}

pub async fn bookmark_status(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Json<BookmarkStatus> {
    Json(BookmarkStatus {
        movie_id,
        bookmarked: state.profile.is_bookmarked(movie_id),
    })
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Json<BookmarkStatus> {
    let bookmarked = state.profile.toggle_bookmark(movie_id);
    Json(BookmarkStatus {
        movie_id,
        bookmarked,
    })
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<WatchHistoryEntry>> {
    Json(state.profile.get_watch_history())
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Json<WatchProgress> {
    Json(WatchProgress {
        movie_id,
        progress: state.profile.get_watch_progress(movie_id),
    })
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Json(request): Json<UpdateProgressRequest>,
) -> Json<WatchHistoryEntry> {
    let entry = state
        .profile
        .update_watch_progress(movie_id, request.progress, request.duration);
    Json(entry)
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<Preferences>,
) -> Json<Preferences> {
    Json(state.profile.update_preferences(preferences))
}

/// Waits for pending profile writes; a failed write since the last flush is a 500
pub async fn flush(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    state.profile.flush().await?;
    tracing::debug!(request_id = %request_id, "Profile flushed");
    Ok(StatusCode::NO_CONTENT)
}
