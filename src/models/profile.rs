use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// Identity of the signed-in user as issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
}

/// Playback progress for one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub movie_id: MovieId,
    /// Percentage watched, always within `0..=100`
    #[serde(rename = "progress")]
    pub progress_percent: f64,
    #[serde(rename = "lastWatched")]
    pub last_watched: DateTime<Utc>,
    /// Total runtime in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

impl WatchHistoryEntry {
    /// Minutes left to watch, rounded to the nearest minute
    pub fn minutes_left(&self) -> u32 {
        let left = f64::from(self.duration_minutes) * (100.0 - self.progress_percent) / 100.0;
        left.round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default = "default_language")]
    pub preferred_language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            favorite_genres: Vec::new(),
            preferred_language: default_language(),
        }
    }
}

impl Preferences {
    /// Drops repeated genres, keeping the first occurrence
    pub fn dedup_genres(&mut self) {
        let mut seen = Vec::with_capacity(self.favorite_genres.len());
        self.favorite_genres.retain(|genre| {
            if seen.contains(genre) {
                false
            } else {
                seen.push(genre.clone());
                true
            }
        });
    }
}

/// The whole persisted profile: identity, bookmarks, watch history and preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(default)]
    pub bookmarks: Vec<MovieId>,
    #[serde(default)]
    pub watch_history: Vec<WatchHistoryEntry>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Clamps a progress value to `0..=100`; NaN counts as not started
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 100.0)
    }
}

impl UserProfile {
    /// Creates an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the movie to the bookmarks if absent, removes it otherwise.
    ///
    /// Returns whether the movie is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, movie_id: MovieId) -> bool {
        if let Some(pos) = self.bookmarks.iter().position(|id| *id == movie_id) {
            self.bookmarks.remove(pos);
            false
        } else {
            self.bookmarks.push(movie_id);
            true
        }
    }

    pub fn is_bookmarked(&self, movie_id: MovieId) -> bool {
        self.bookmarks.contains(&movie_id)
    }

    /// Records progress for a movie, replacing any earlier entry for the same movie
    pub fn record_progress(
        &mut self,
        movie_id: MovieId,
        progress: f64,
        duration_minutes: u32,
        at: DateTime<Utc>,
    ) -> &WatchHistoryEntry {
        let entry = WatchHistoryEntry {
            movie_id,
            progress_percent: clamp_progress(progress),
            last_watched: at,
            duration_minutes,
        };

        // Update if exists, otherwise add
        let index = match self
            .watch_history
            .iter()
            .position(|e| e.movie_id == movie_id)
        {
            Some(index) => {
                self.watch_history[index] = entry;
                index
            }
            None => {
                self.watch_history.push(entry);
                self.watch_history.len() - 1
            }
        };

        &self.watch_history[index]
    }

    pub fn watch_entry(&self, movie_id: MovieId) -> Option<&WatchHistoryEntry> {
        self.watch_history.iter().find(|e| e.movie_id == movie_id)
    }

    /// Progress for a movie, 0 when it was never watched
    pub fn watch_progress(&self, movie_id: MovieId) -> f64 {
        self.watch_entry(movie_id)
            .map(|e| e.progress_percent)
            .unwrap_or(0.0)
    }

    /// Restores the invariants on a record read from storage: unique bookmarks,
    /// one history entry per movie (the last one wins) and clamped progress.
    pub fn normalize(&mut self) {
        let mut bookmarks = Vec::with_capacity(self.bookmarks.len());
        for id in self.bookmarks.drain(..) {
            if !bookmarks.contains(&id) {
                bookmarks.push(id);
            }
        }
        self.bookmarks = bookmarks;

        let mut history: Vec<WatchHistoryEntry> = Vec::with_capacity(self.watch_history.len());
        for mut entry in self.watch_history.drain(..) {
            entry.progress_percent = clamp_progress(entry.progress_percent);
            match history.iter_mut().find(|e| e.movie_id == entry.movie_id) {
                Some(existing) => *existing = entry,
                None => history.push(entry),
            }
        }
        self.watch_history = history;

        self.preferences.dedup_genres();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_profile() {
        let profile = UserProfile::new();
        assert!(profile.user.is_none());
        assert!(profile.bookmarks.is_empty());
        assert!(profile.watch_history.is_empty());
        assert!(profile.preferences.favorite_genres.is_empty());
        assert_eq!(profile.preferences.preferred_language, "en");
    }

    #[test]
    fn test_toggle_bookmark_twice_restores_set() {
        let mut profile = UserProfile::new();
        profile.toggle_bookmark(27205);
        let before = profile.bookmarks.clone();

        assert!(profile.toggle_bookmark(603));
        assert!(!profile.toggle_bookmark(603));
        assert_eq!(profile.bookmarks, before);
    }

    #[test]
    fn test_toggle_bookmark_keeps_insertion_order() {
        let mut profile = UserProfile::new();
        profile.toggle_bookmark(3);
        profile.toggle_bookmark(1);
        profile.toggle_bookmark(2);
        profile.toggle_bookmark(1);
        assert_eq!(profile.bookmarks, vec![3, 2]);
        assert!(profile.is_bookmarked(2));
        assert!(!profile.is_bookmarked(1));
    }

    #[test]
    fn test_record_progress_clamps() {
        let mut profile = UserProfile::new();
        profile.record_progress(550, 150.0, 139, at(0));
        assert_eq!(profile.watch_progress(550), 100.0);

        profile.record_progress(550, -20.0, 139, at(1));
        assert_eq!(profile.watch_progress(550), 0.0);

        profile.record_progress(550, f64::NAN, 139, at(2));
        assert_eq!(profile.watch_progress(550), 0.0);
    }

    #[test]
    fn test_record_progress_upserts() {
        let mut profile = UserProfile::new();
        profile.record_progress(550, 10.0, 139, at(100));
        profile.record_progress(13, 50.0, 142, at(150));
        profile.record_progress(550, 40.0, 139, at(200));

        assert_eq!(profile.watch_history.len(), 2);
        let entry = profile.watch_entry(550).unwrap();
        assert_eq!(entry.progress_percent, 40.0);
        assert_eq!(entry.last_watched, at(200));
        // Position of the replaced entry is preserved
        assert_eq!(profile.watch_history[0].movie_id, 550);
    }

    #[test]
    fn test_watch_progress_absent_is_zero() {
        let profile = UserProfile::new();
        assert_eq!(profile.watch_progress(42), 0.0);
    }

    #[test]
    fn test_minutes_left() {
        let mut profile = UserProfile::new();
        let entry = profile.record_progress(1, 25.0, 90, at(0));
        assert_eq!(entry.minutes_left(), 68);

        let entry = profile.record_progress(2, 100.0, 90, at(0));
        assert_eq!(entry.minutes_left(), 0);
    }

    #[test]
    fn test_normalize_restores_invariants() {
        let mut profile = UserProfile {
            user: None,
            bookmarks: vec![5, 7, 5, 9, 7],
            watch_history: vec![
                WatchHistoryEntry {
                    movie_id: 5,
                    progress_percent: 20.0,
                    last_watched: at(1),
                    duration_minutes: 100,
                },
                WatchHistoryEntry {
                    movie_id: 5,
                    progress_percent: 180.0,
                    last_watched: at(2),
                    duration_minutes: 100,
                },
            ],
            preferences: Preferences {
                favorite_genres: vec!["Drama".to_string(), "Drama".to_string()],
                preferred_language: "fr".to_string(),
            },
        };

        profile.normalize();

        assert_eq!(profile.bookmarks, vec![5, 7, 9]);
        assert_eq!(profile.watch_history.len(), 1);
        assert_eq!(profile.watch_history[0].progress_percent, 100.0);
        assert_eq!(profile.watch_history[0].last_watched, at(2));
        assert_eq!(profile.preferences.favorite_genres, vec!["Drama".to_string()]);
    }

    #[test]
    fn test_persisted_layout() {
        let mut profile = UserProfile::new();
        profile.user = Some(UserIdentity {
            id: "uid-1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada".to_string(),
        });
        profile.toggle_bookmark(603);
        profile.record_progress(603, 30.0, 136, at(0));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["user"]["name"], "Ada");
        assert_eq!(json["bookmarks"][0], 603);
        assert_eq!(json["watchHistory"][0]["movieId"], 603);
        assert_eq!(json["watchHistory"][0]["progress"], 30.0);
        assert_eq!(json["watchHistory"][0]["duration"], 136);
        assert!(json["watchHistory"][0]["lastWatched"].is_string());
        assert_eq!(json["preferences"]["preferredLanguage"], "en");
    }

    #[test]
    fn test_reads_partial_record() {
        let json = r#"{
            "user": {"id": "u", "email": "e@x.io", "displayName": "E"},
            "bookmarks": [1, 2]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user.unwrap().display_name, "E");
        assert_eq!(profile.bookmarks, vec![1, 2]);
        assert!(profile.watch_history.is_empty());
        assert_eq!(profile.preferences, Preferences::default());
    }
}
