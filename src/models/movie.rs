use serde::{Deserialize, Serialize};

use super::MovieId;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";
const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const PROFILE_SIZE: &str = "w185";
const MAX_CAST: usize = 7;
const UNKNOWN: &str = "Unknown";

/// A movie as served to the UI, whichever catalog endpoint it came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    /// Average vote on a 0-10 scale, one decimal
    pub rating: f64,
    /// Primary genre name, "Unknown" when the catalog has none
    pub genre: String,
    pub runtime_minutes: Option<u32>,
    pub release_year: Option<i32>,
    pub overview: String,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// A movie record from TMDB.
///
/// List endpoints fill `genre_ids`; the details endpoint fills `genres`,
/// `runtime` and the remaining detail fields. Both shapes deserialize here.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
}

/// Paged list response
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

/// Builds a TMDB image URL; a missing or empty path yields no URL
pub fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    match path {
        Some(p) if !p.is_empty() => Some(format!("{}{}{}", IMAGE_BASE_URL, size, p)),
        _ => None,
    }
}

/// Fixed TMDB movie genre table
pub fn genre_name(genre_id: u32) -> Option<&'static str> {
    let name = match genre_id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => return None,
    };
    Some(name)
}

fn round_rating(vote_average: f64) -> f64 {
    (vote_average * 10.0).round() / 10.0
}

fn parse_year(release_date: Option<&str>) -> Option<i32> {
    release_date?.split('-').next()?.parse().ok()
}

/// Picks the trailer to link: an official trailer first, then any trailer
fn pick_trailer(videos: &TmdbVideos) -> Option<&TmdbVideo> {
    videos
        .results
        .iter()
        .find(|v| v.video_type == "Trailer" && v.official)
        .or_else(|| videos.results.iter().find(|v| v.video_type == "Trailer"))
}

impl From<TmdbMovie> for Movie {
    fn from(raw: TmdbMovie) -> Self {
        let genre = raw
            .genres
            .first()
            .map(|g| g.name.clone())
            .or_else(|| {
                raw.genre_ids
                    .first()
                    .and_then(|id| genre_name(*id))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| UNKNOWN.to_string());

        let release_date = raw.release_date.filter(|d| !d.is_empty());

        Movie {
            id: raw.id,
            title: raw.title,
            poster_url: image_url(raw.poster_path.as_deref(), POSTER_SIZE),
            backdrop_url: image_url(raw.backdrop_path.as_deref(), BACKDROP_SIZE),
            rating: round_rating(raw.vote_average),
            genre,
            runtime_minutes: raw.runtime.filter(|r| *r > 0),
            release_year: parse_year(release_date.as_deref()),
            overview: raw.overview.unwrap_or_default(),
            cast: Vec::new(),
            trailer_url: None,
            director: None,
            genres: raw.genres,
            tagline: raw.tagline.filter(|t| !t.is_empty()),
            status: raw.status,
            budget: raw.budget,
            revenue: raw.revenue,
            release_date,
        }
    }
}

impl Movie {
    /// Adds the billed cast and the director from a credits response
    pub fn with_credits(mut self, credits: TmdbCredits) -> Self {
        self.director = credits
            .crew
            .iter()
            .find(|c| c.job == "Director")
            .map(|c| c.name.clone());
        self.cast = credits
            .cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                photo_url: image_url(c.profile_path.as_deref(), PROFILE_SIZE),
                name: c.name,
            })
            .collect();
        self
    }

    /// Adds the trailer link from a videos response
    pub fn with_videos(mut self, videos: &TmdbVideos) -> Self {
        self.trailer_url =
            pick_trailer(videos).map(|v| format!("https://www.youtube.com/watch?v={}", v.key));
        self
    }
}
