//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::opaque::OpaqueIdCodec;
use crate::query::QueryExecutor;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// List query executor.
    executor: QueryExecutor,

    /// Opaque public-id codec.
    opaque: OpaqueIdCodec,
}

impl AppState {
    /// Initialize state: connect the pool and wire the services.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        let executor = QueryExecutor::new(pool.clone());
        let opaque = OpaqueIdCodec::new(config.opaque_id_key);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db: pool,
                executor,
                opaque,
            }),
        })
    }

    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.inner.executor
    }

    pub fn opaque(&self) -> &OpaqueIdCodec {
        &self.inner.opaque
    }
}
