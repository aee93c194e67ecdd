use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    analytics::services::Analytics,
    auth::{
        jwt::JwtKeys,
        services::{Credentials, SessionResolver},
    },
    categories::{repo_types::Category, services::CategoryLedger},
    config::AppConfig,
    expenses::services::ExpenseLedger,
    store::{postgres::PgStore, ExpenseRepo, Scoped, SpendingRepo, UserRepo},
};

/// Everything a request handler needs, built once at startup and cloned
/// per request. Nothing in here is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Credentials,
    pub sessions: SessionResolver,
    pub categories: CategoryLedger,
    pub expenses: ExpenseLedger,
    pub analytics: Analytics,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        Ok(Self::from_store(config, Arc::new(PgStore::new(db))))
    }

    /// Wires every component to one backing store.
    pub fn from_store<S>(config: AppConfig, store: Arc<S>) -> Self
    where
        S: UserRepo + ExpenseRepo + Scoped<Category> + SpendingRepo + 'static,
    {
        let keys = JwtKeys::from_config(&config.jwt);
        let users: Arc<dyn UserRepo> = store.clone();
        let expenses: Arc<dyn ExpenseRepo> = store.clone();
        let spending: Arc<dyn SpendingRepo> = store.clone();
        let categories: Arc<dyn Scoped<Category>> = store;

        Self {
            config: Arc::new(config),
            credentials: Credentials::new(users.clone(), keys.clone()),
            sessions: SessionResolver::new(users, keys),
            categories: CategoryLedger::new(categories.clone()),
            expenses: ExpenseLedger::new(expenses, categories),
            analytics: Analytics::new(spending),
        }
    }
}
