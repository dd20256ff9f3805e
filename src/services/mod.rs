pub mod auth;
pub mod browse;
pub mod catalog;
pub mod home;
pub mod identity;
pub mod profile_store;
pub mod validation;

pub use auth::AuthService;
pub use home::HomeService;
pub use profile_store::ProfileStore;
