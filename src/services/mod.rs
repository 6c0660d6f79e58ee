//! Business logic services

pub mod accounts;
pub mod catalog;
pub mod lending;
pub mod sessions;

use crate::{
    config::{AuthConfig, LendingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub sessions: sessions::SessionsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        lending_config: LendingConfig,
        sessions: sessions::SessionsService,
    ) -> Self {
        Self {
            accounts: accounts::AccountsService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            lending: lending::LendingService::new(repository, lending_config),
            sessions,
        }
    }
}
