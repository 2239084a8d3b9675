//! Shared application state passed to request handlers

use mongodb::{Client, Database};

/// Cloned per handler; all members are cheap Arc-backed clones.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (shares the underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
}
