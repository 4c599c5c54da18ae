// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthError, AuthProvider, CookieDefaults, HttpAuthProvider};
use crate::blog::PostPublisher;
use crate::cms::{CmsApi, GraphError, HttpGraphClient, HygraphCms};
use crate::config::ValidatedConfig;
use crate::store::{MemoryStore, PostgresStore, RelationalStore, StoreError};

/// Shared handles passed to every handler. Built once at startup.
pub struct AppState {
    pub config: Arc<ValidatedConfig>,
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn RelationalStore>,
    pub cms: Arc<dyn CmsApi>,
}

#[derive(Debug)]
pub enum StartupError {
    Auth(AuthError),
    Cms(GraphError),
    Store(StoreError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Auth(err) => write!(f, "Auth provider client: {}", err),
            StartupError::Cms(err) => write!(f, "CMS client: {}", err),
            StartupError::Store(err) => write!(f, "Database: {}", err),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<AuthError> for StartupError {
    fn from(err: AuthError) -> Self {
        StartupError::Auth(err)
    }
}

impl From<GraphError> for StartupError {
    fn from(err: GraphError) -> Self {
        StartupError::Cms(err)
    }
}

impl From<StoreError> for StartupError {
    fn from(err: StoreError) -> Self {
        StartupError::Store(err)
    }
}

impl AppState {
    pub fn new(
        config: Arc<ValidatedConfig>,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn RelationalStore>,
        cms: Arc<dyn CmsApi>,
    ) -> Self {
        Self {
            config,
            auth,
            store,
            cms,
        }
    }

    /// Builds the HTTP clients and the store described by `config`.
    /// Without a database URL the process runs on the in-memory store.
    pub async fn connect(config: Arc<ValidatedConfig>) -> Result<Self, StartupError> {
        let auth = Arc::new(HttpAuthProvider::new(&config.auth)?);
        let graph = Arc::new(HttpGraphClient::new(&config.cms)?);
        let cms = Arc::new(HygraphCms::new(graph));

        let store: Arc<dyn RelationalStore> = match config.database.url.as_deref() {
            Some(url) => {
                let postgres = PostgresStore::connect(&config.database, url)?;
                postgres.ensure_schema().await?;
                log::info!(
                    "Using PostgreSQL store (max {} connections)",
                    config.database.max_connections
                );
                Arc::new(postgres)
            }
            None => {
                log::warn!("No database URL configured; likes, comments and reviews are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(config, auth, store, cms))
    }

    pub fn cookie_defaults(&self) -> CookieDefaults {
        CookieDefaults {
            secure: self.config.is_production(),
        }
    }

    pub fn publisher(&self) -> PostPublisher<'_> {
        PostPublisher::new(self.cms.as_ref(), self.config.cms.tag_settle_delay())
    }
}
