//! Per-user spending aggregates.
//!
//! Grouping and summing happen in the store; this layer only shapes the
//! rows into label/value series.

use std::sync::Arc;

use tracing::debug;

use super::dto::Series;
use crate::{
    auth::repo_types::User,
    error::AppError,
    store::{Owner, SpendingRepo},
};

#[derive(Clone)]
pub struct Analytics {
    spending: Arc<dyn SpendingRepo>,
}

impl Analytics {
    pub fn new(spending: Arc<dyn SpendingRepo>) -> Self {
        Self { spending }
    }

    /// Labels are `YYYY-MM-DD`, ascending.
    pub async fn by_date(&self, user: &User) -> Result<Series<String>, AppError> {
        let rows = self.spending.totals_by_date(Owner::of(user)).await?;
        debug!(user_id = %user.id, buckets = rows.len(), "spending by date");
        Ok(rows
            .into_iter()
            .map(|(date, total)| (date.to_string(), total))
            .collect())
    }

    /// Month numbers 1-12; March 2023 and March 2024 share a bucket.
    pub async fn by_month(&self, user: &User) -> Result<Series<u8>, AppError> {
        let rows = self.spending.totals_by_month(Owner::of(user)).await?;
        debug!(user_id = %user.id, buckets = rows.len(), "spending by month");
        Ok(rows.into_iter().collect())
    }

    pub async fn by_category(&self, user: &User) -> Result<Series<String>, AppError> {
        let rows = self.spending.totals_by_category(Owner::of(user)).await?;
        debug!(user_id = %user.id, buckets = rows.len(), "spending by category");
        Ok(rows.into_iter().collect())
    }
}
