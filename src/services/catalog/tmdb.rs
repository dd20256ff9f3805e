/// TMDB (The Movie Database) catalog client
///
/// API Flow:
/// 1. Lists: /trending/movie/week, /movie/{popular,top_rated,now_playing,upcoming}
/// 2. Search and discovery: /search/movie, /discover/movie, /genre/movie/list
/// 3. Details: /movie/{id} + /movie/{id}/credits + /movie/{id}/videos, fetched together
///
/// Every request carries the `api_key` query parameter; a v4 access token is
/// sent as a bearer token when configured.
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{
        movie::{TmdbCredits, TmdbGenreList, TmdbMovie, TmdbPage, TmdbVideos},
        Genre, Movie, MovieId,
    },
    services::catalog::{CatalogClient, MovieList, Related},
};

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    access_token: Option<String>,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, access_token: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            access_token: access_token.filter(|t| !t.is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn list_endpoint(list: MovieList) -> &'static str {
        match list {
            MovieList::Trending => "/trending/movie/week",
            MovieList::Popular => "/movie/popular",
            MovieList::TopRated => "/movie/top_rated",
            MovieList::NowPlaying => "/movie/now_playing",
            MovieList::Upcoming => "/movie/upcoming",
        }
    }

    /// Issues a GET request and decodes the JSON body; any non-success status
    /// is a catalog error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        self.get_json_if_found(endpoint, params)
            .await?
            .ok_or_else(|| {
                AppError::Catalog(format!("TMDB API returned status 404 for {}", endpoint))
            })
    }

    /// Like `get_json`, but a 404 comes back as `None`
    async fn get_json_if_found<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.api_url, endpoint);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map(Some).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = %endpoint,
                "Failed to deserialize TMDB response"
            );
            AppError::Catalog(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn get_page(&self, endpoint: &str, params: &[(&str, String)]) -> AppResult<Vec<Movie>> {
        let page: TmdbPage = self.get_json(endpoint, params).await?;
        let movies: Vec<Movie> = page.results.into_iter().map(Movie::from).collect();

        tracing::debug!(
            endpoint = %endpoint,
            results = movies.len(),
            provider = "tmdb",
            "Movie page fetched"
        );

        Ok(movies)
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn list(&self, list: MovieList, page: u32) -> AppResult<Vec<Movie>> {
        self.get_page(Self::list_endpoint(list), &[("page", page.to_string())])
            .await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let movies = self
            .get_page(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(movies)
    }

    async fn by_genre(&self, genre_id: u32, page: u32) -> AppResult<Vec<Movie>> {
        self.get_page(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let list: TmdbGenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    async fn related(
        &self,
        movie_id: MovieId,
        related: Related,
        page: u32,
    ) -> AppResult<Vec<Movie>> {
        let endpoint = match related {
            Related::Recommendations => format!("/movie/{}/recommendations", movie_id),
            Related::Similar => format!("/movie/{}/similar", movie_id),
        };
        self.get_page(&endpoint, &[("page", page.to_string())]).await
    }

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<Movie> {
        let details_endpoint = format!("/movie/{}", movie_id);
        let credits_endpoint = format!("/movie/{}/credits", movie_id);
        let videos_endpoint = format!("/movie/{}/videos", movie_id);

        let fetched = tokio::try_join!(
            self.get_json_if_found::<TmdbMovie>(&details_endpoint, &[]),
            self.get_json_if_found::<TmdbCredits>(&credits_endpoint, &[]),
            self.get_json_if_found::<TmdbVideos>(&videos_endpoint, &[]),
        )?;

        // Only a detail lookup turns a 404 into "not found"
        let (Some(details), Some(credits), Some(videos)) = fetched else {
            return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
        };

        let movie = Movie::from(details)
            .with_credits(credits)
            .with_videos(&videos);

        tracing::info!(
            movie_id = movie_id,
            cast = movie.cast.len(),
            has_trailer = movie.trailer_url.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(movie)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> TmdbClient {
        TmdbClient::new(
            "test_key".to_string(),
            token.map(str::to_string),
            server.uri(),
        )
    }

    fn movie_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "overview": "An overview",
            "poster_path": "/p.jpg",
            "backdrop_path": "/b.jpg",
            "vote_average": 7.25,
            "release_date": "1999-03-31",
            "genre_ids": [28]
        })
    }

    #[test]
    fn test_list_endpoints() {
        assert_eq!(
            TmdbClient::list_endpoint(MovieList::Trending),
            "/trending/movie/week"
        );
        assert_eq!(
            TmdbClient::list_endpoint(MovieList::TopRated),
            "/movie/top_rated"
        );
    }

    #[tokio::test]
    async fn test_popular_sends_key_token_and_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer v4-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 2,
                "results": [movie_json(603, "The Matrix")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let movies = client(&server, Some("v4-token"))
            .list(MovieList::Popular, 2)
            .await
            .unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Matrix");
        assert_eq!(movies[0].genre, "Action");
        assert_eq!(movies[0].rating, 7.3);
        assert_eq!(movies[0].release_year, Some(1999));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let server = MockServer::start().await;
        let err = client(&server, None).search("   ", 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status_message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let err = client(&server, None).search("matrix", 1).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_movie_details_composes_three_calls() {
        let server = MockServer::start().await;
        let mut details = movie_json(603, "The Matrix");
        details["genres"] = json!([{"id": 878, "name": "Science Fiction"}]);
        details["runtime"] = json!(136);
        details["tagline"] = json!("Welcome to the Real World.");

        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .respond_with(ResponseTemplate::new(200).set_body_json(details))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/603/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "cast": [{"name": "Keanu Reeves", "profile_path": "/k.jpg"}],
                "crew": [{"name": "Lana Wachowski", "job": "Director"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/603/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "results": [{"key": "vKQi3bBA1y8", "type": "Trailer", "official": true}]
            })))
            .mount(&server)
            .await;

        let movie = client(&server, None).movie_details(603).await.unwrap();

        assert_eq!(movie.genre, "Science Fiction");
        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.director.as_deref(), Some("Lana Wachowski"));
        assert_eq!(movie.cast.len(), 1);
        assert_eq!(
            movie.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=vKQi3bBA1y8")
        );
        assert_eq!(movie.tagline.as_deref(), Some("Welcome to the Real World."));
    }

    #[tokio::test]
    async fn test_movie_details_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server, None).movie_details(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Movie 1 not found"));
    }

    #[tokio::test]
    async fn test_missing_related_list_is_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/42/recommendations"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .related(42, Related::Recommendations, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_missing_list_is_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/upcoming"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .list(MovieList::Upcoming, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));

        // Hidden behind the generic message once it reaches a client
        let response = axum::response::IntoResponse::into_response(err);
        assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_genres() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]
            })))
            .mount(&server)
            .await;

        let genres = client(&server, None).genres().await.unwrap();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[1].name, "Drama");
    }
}
