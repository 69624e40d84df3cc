//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        checkout::{CheckoutConfig, CheckoutService, PgCheckoutService},
        notifications::NotificationSender,
        orders::{OrdersService, PgOrdersService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Every storefront service behind its trait, sharing one pool.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        config: CheckoutConfig,
        sender: Arc<dyn NotificationSender>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&sender))),
            checkout: Arc::new(PgCheckoutService::new(db, config, sender)),
        })
    }
}
