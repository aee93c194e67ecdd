use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::{Expense, ExpenseFilter};
use crate::categories::repo_types::Category;

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: Decimal,
    pub category_id: Uuid,
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query string of `GET /expenses/`.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub category_id: Option<Uuid>,
}

impl From<ExpenseQuery> for ExpenseFilter {
    fn from(q: ExpenseQuery) -> Self {
        Self {
            date_from: q.date_from,
            date_to: q.date_to,
            category_id: q.category_id,
        }
    }
}

/// Partial update. `None` means "not sent"; for `description`,
/// `Some(None)` is an explicit `null` and clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub date: Option<Date>,
}

fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

impl ExpensePatch {
    pub fn apply(self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// An expense with its category loaded alongside. `category` is `null`
/// when the referenced row is gone.
#[derive(Debug, Serialize)]
pub struct ExpenseView {
    #[serde(flatten)]
    pub expense: Expense,
    pub category: Option<Category>,
}
