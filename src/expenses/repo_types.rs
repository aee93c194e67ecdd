use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::store::{Owned, Owner};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: Date, // serialized as YYYY-MM-DD
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Conjunctive list conditions; date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub category_id: Option<Uuid>,
}

impl Owned for Expense {
    type Filter = ExpenseFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Owner {
        Owner::from_id(self.user_id)
    }
}
