//! Data-access traits shared by every ledger.
//!
//! Reads and writes against owned records go through [`Scoped`], whose
//! methods all take an [`Owner`]. An `Owner` is only obtained from a resolved
//! [`User`], so a query without an ownership filter cannot be expressed.

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::Date;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::expenses::repo_types::Expense;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,
    #[error("referenced row does not exist")]
    MissingReference,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The user every scoped query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(Uuid);

impl Owner {
    pub fn of(user: &User) -> Self {
        Self(user.id)
    }

    /// Owner recorded on a stored row. Never build one from request input.
    pub(crate) fn from_id(user_id: Uuid) -> Self {
        Self(user_id)
    }

    pub fn id(self) -> Uuid {
        self.0
    }
}

/// A record that belongs to exactly one user.
pub trait Owned: Send + Sync + 'static {
    /// Extra conditions accepted by [`Scoped::list`].
    type Filter: Default + Send + Sync;

    fn id(&self) -> Uuid;
    fn owner(&self) -> Owner;
}

#[async_trait]
pub trait Scoped<E: Owned>: Send + Sync {
    async fn list(&self, owner: Owner, filter: &E::Filter) -> StoreResult<Vec<E>>;
    async fn get(&self, owner: Owner, id: Uuid) -> StoreResult<Option<E>>;
    /// Persists `record` under `record.owner()` and returns the stored row.
    async fn insert(&self, record: E) -> StoreResult<E>;
}

#[async_trait]
pub trait ExpenseRepo: Scoped<Expense> {
    /// Overwrites the mutable columns. `false` when no owned row matched.
    async fn update(&self, owner: Owner, record: &Expense) -> StoreResult<bool>;
    async fn delete(&self, owner: Owner, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: User) -> StoreResult<User>;
}

/// Per-owner spending totals, grouped by the store. Each report comes back
/// sorted ascending by its key.
#[async_trait]
pub trait SpendingRepo: Send + Sync {
    async fn totals_by_date(&self, owner: Owner) -> StoreResult<Vec<(Date, Decimal)>>;
    /// Keyed by month number 1-12 regardless of year.
    async fn totals_by_month(&self, owner: Owner) -> StoreResult<Vec<(u8, Decimal)>>;
    /// Keyed by category name; expenses without a live category are skipped.
    async fn totals_by_category(&self, owner: Owner) -> StoreResult<Vec<(String, Decimal)>>;
}
