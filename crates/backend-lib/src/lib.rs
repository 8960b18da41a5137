// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Identity and access core of the `LinkHub` profile service.

pub mod access;
pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod links;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use crate::accounts::AccountRegistry;
use crate::auth::{AuthService, DefaultAuth, TokenService};
use crate::config::Settings;
use crate::storage::{
    AccountStore, AssetStore, FlatFileAccountStore, FlatFileAssetStore, MemoryAccountStore,
    MemoryAssetStore,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Register / login / bearer authentication
    pub auth: Arc<dyn AuthService>,
    /// Account records and their invariants
    pub registry: AccountRegistry,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the services over the given stores
    pub fn new(
        settings: Settings,
        store: Arc<dyn AccountStore>,
        assets: Arc<dyn AssetStore>,
    ) -> anyhow::Result<Self> {
        settings.validate()?;

        let registry = AccountRegistry::new(store, assets);
        let tokens = TokenService::new(&settings.signing_secret(), settings.token_ttl())?;
        let auth = DefaultAuth::new(
            registry.clone(),
            settings.password_vault()?,
            tokens,
            settings.password.clone(),
        );

        Ok(Self {
            auth: Arc::new(auth),
            registry,
            settings: Arc::new(settings),
        })
    }

    /// State over in-memory stores; nothing survives the process
    pub fn in_memory(settings: Settings) -> anyhow::Result<Self> {
        Self::new(
            settings,
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryAssetStore::new()),
        )
    }

    /// State over flat files under `storage.path`
    pub fn flat_file(settings: Settings) -> anyhow::Result<Self> {
        let root = settings.storage.path.clone();
        let store = FlatFileAccountStore::new(&root)?;
        let assets = FlatFileAssetStore::new(&root)?;
        Self::new(settings, Arc::new(store), Arc::new(assets))
    }
}
