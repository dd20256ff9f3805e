pub mod auth;
pub mod movie;
pub mod profile;

pub use auth::{Credentials, SignInForm, SignUpForm};
pub use movie::{CastMember, Genre, Movie};
pub use profile::{Preferences, UserIdentity, UserProfile, WatchHistoryEntry};

/// TMDB movie identifier
pub type MovieId = u64;
