use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::db::{KeyValueStore, StorageKey, StorageResult, StorageWriter};
use crate::models::{MovieId, Preferences, UserIdentity, UserProfile, WatchHistoryEntry};

/// Single source of truth for the signed-in user's profile.
///
/// Reads are served from memory. Every mutation queues the whole profile for
/// persistence while still holding the write lock, so storage sees mutations
/// in the order they happened. Persistence failures never reach the mutating
/// caller and never roll back the in-memory state; `flush` reports them.
pub struct ProfileStore {
    profile: RwLock<UserProfile>,
    writer: StorageWriter,
}

impl ProfileStore {
    /// Creates a store holding an empty profile
    pub fn new(writer: StorageWriter) -> Self {
        Self {
            profile: RwLock::new(UserProfile::new()),
            writer,
        }
    }

    /// Creates a store and fills it from the persisted record.
    ///
    /// A missing, unreadable or malformed record leaves the profile empty.
    pub async fn load(store: &dyn KeyValueStore, writer: StorageWriter) -> Self {
        let this = Self::new(writer);

        match store.get(&StorageKey::UserData).await {
            Ok(Some(json)) => match serde_json::from_str::<UserProfile>(&json) {
                Ok(mut profile) => {
                    profile.normalize();
                    tracing::info!(
                        signed_in = profile.user.is_some(),
                        bookmarks = profile.bookmarks.len(),
                        history = profile.watch_history.len(),
                        "User profile loaded"
                    );
                    *this.write() = profile;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Stored user profile is malformed, starting empty");
                }
            },
            Ok(None) => tracing::info!("No stored user profile, starting empty"),
            Err(e) => {
                tracing::error!(error = %e, backend = store.name(), "Failed to load user profile");
            }
        }

        this
    }

    fn read(&self) -> RwLockReadGuard<'_, UserProfile> {
        self.profile.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserProfile> {
        self.profile.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` to the profile and queues the result for persistence
    fn mutate<R>(&self, f: impl FnOnce(&mut UserProfile) -> R) -> R {
        let mut profile = self.write();
        let result = f(&mut profile);
        self.writer.enqueue(&StorageKey::UserData, &*profile);
        result
    }

    /// Sets the signed-in identity; bookmarks, history and preferences are kept
    pub fn login(&self, identity: UserIdentity) {
        tracing::info!(user_id = %identity.id, "User signed in");
        self.mutate(|profile| profile.user = Some(identity));
    }

    /// Resets the whole profile, including bookmarks and watch history
    pub fn logout(&self) {
        tracing::info!("User signed out, profile reset");
        self.mutate(|profile| *profile = UserProfile::new());
    }

    /// Returns whether the movie is bookmarked after the toggle
    pub fn toggle_bookmark(&self, movie_id: MovieId) -> bool {
        let bookmarked = self.mutate(|profile| profile.toggle_bookmark(movie_id));
        tracing::debug!(movie_id = movie_id, bookmarked = bookmarked, "Bookmark toggled");
        bookmarked
    }

    /// Records watch progress now; progress is clamped to `0..=100`
    pub fn update_watch_progress(
        &self,
        movie_id: MovieId,
        progress: f64,
        duration_minutes: u32,
    ) -> WatchHistoryEntry {
        let now = Utc::now();
        self.mutate(|profile| {
            profile
                .record_progress(movie_id, progress, duration_minutes, now)
                .clone()
        })
    }

    /// Replaces the preferences
    pub fn update_preferences(&self, mut preferences: Preferences) -> Preferences {
        preferences.dedup_genres();
        self.mutate(|profile| {
            profile.preferences = preferences;
            profile.preferences.clone()
        })
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.read().user.clone()
    }

    pub fn get_bookmarks(&self) -> Vec<MovieId> {
        self.read().bookmarks.clone()
    }

    pub fn get_watch_history(&self) -> Vec<WatchHistoryEntry> {
        self.read().watch_history.clone()
    }

    pub fn is_bookmarked(&self, movie_id: MovieId) -> bool {
        self.read().is_bookmarked(movie_id)
    }

    /// Progress for a movie, 0 when it was never watched
    pub fn get_watch_progress(&self, movie_id: MovieId) -> f64 {
        self.read().watch_progress(movie_id)
    }

    pub fn preferences(&self) -> Preferences {
        self.read().preferences.clone()
    }

    /// Copy of the whole profile
    pub fn snapshot(&self) -> UserProfile {
        self.read().clone()
    }

    /// Waits until every mutation so far is persisted; reports the first
    /// write failure since the previous flush
    pub async fn flush(&self) -> StorageResult<()> {
        self.writer.flush().await
    }
}
