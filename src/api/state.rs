use std::sync::Arc;

use crate::services::{
    catalog::CatalogClient, identity::IdentityProvider, AuthService, HomeService, ProfileStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub profile: Arc<ProfileStore>,
    pub catalog: Arc<dyn CatalogClient>,
    pub auth: AuthService,
    pub home: HomeService,
}

impl AppState {
    /// Wires the services around one profile store
    pub fn new(
        profile: Arc<ProfileStore>,
        catalog: Arc<dyn CatalogClient>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            auth: AuthService::new(identity, profile.clone()),
            home: HomeService::new(catalog.clone()),
            profile,
            catalog,
        }
    }
}
