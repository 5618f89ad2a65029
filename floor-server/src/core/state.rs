use std::sync::Arc;

use crate::auth::{JwtService, UserDirectory};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::floor::{OrderLifecycleManager, ReservationCoordinator, TableStateManager};

/// Shared services handed to every handler
///
/// Cloning is cheap: the pool and the JWT service are reference counted and
/// the managers hold a pool handle and a deadline.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | SQLite pool |
/// | jwt_service | token issue/validation |
/// | users | registration and login |
/// | tables | table availability |
/// | orders | order queries and transitions |
/// | coordinator | placement, reset, cancellation |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub users: UserDirectory,
    pub tables: TableStateManager,
    pub orders: OrderLifecycleManager,
    pub coordinator: ReservationCoordinator,
}

impl ServerState {
    /// Wire services around an opened database
    pub fn new(config: Config, db: DbService) -> Self {
        let pool = db.pool.clone();
        let deadline = config.request_timeout();

        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            users: UserDirectory::new(pool.clone()),
            tables: TableStateManager::new(pool.clone(), deadline),
            orders: OrderLifecycleManager::new(pool.clone(), deadline),
            coordinator: ReservationCoordinator::new(pool, deadline),
            db,
            config,
        }
    }

    /// Open the database (running migrations) and build the state
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db))
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
