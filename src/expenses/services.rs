use std::{collections::HashMap, sync::Arc};

use rust_decimal::{Decimal, RoundingStrategy};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateExpenseRequest, ExpensePatch, ExpenseView},
    repo_types::{Expense, ExpenseFilter},
};
use crate::{
    auth::repo_types::User,
    categories::repo_types::Category,
    error::AppError,
    store::{ExpenseRepo, Owner, Scoped},
};

const NOT_FOUND: AppError = AppError::NotFound("Expense");

/// 9_999_999_999.99, the largest value a `NUMERIC(12, 2)` column holds.
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rounds half away from zero to cents, then requires `0 < amount <= MAX_AMOUNT`.
fn normalize_amount(amount: Decimal) -> Result<Decimal, AppError> {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if cents > Decimal::ZERO && cents <= MAX_AMOUNT {
        Ok(cents)
    } else {
        Err(AppError::InvalidAmount)
    }
}

#[derive(Clone)]
pub struct ExpenseLedger {
    expenses: Arc<dyn ExpenseRepo>,
    categories: Arc<dyn Scoped<Category>>,
}

impl ExpenseLedger {
    pub fn new(expenses: Arc<dyn ExpenseRepo>, categories: Arc<dyn Scoped<Category>>) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// The category must exist and belong to `user`; a foreign category id
    /// is reported exactly like a missing one.
    pub async fn create(
        &self,
        user: &User,
        req: CreateExpenseRequest,
    ) -> Result<ExpenseView, AppError> {
        let amount = normalize_amount(req.amount)?;
        let owner = Owner::of(user);

        let Some(category) = self.categories.get(owner, req.category_id).await? else {
            warn!(user_id = %user.id, category_id = %req.category_id, "category not found");
            return Err(AppError::CategoryNotFound);
        };

        let now = OffsetDateTime::now_utc();
        let expense = self
            .expenses
            .insert(Expense {
                id: Uuid::new_v4(),
                user_id: user.id,
                category_id: category.id,
                amount,
                description: req.description,
                date: req.date.unwrap_or_else(|| now.date()),
                created_at: now,
            })
            .await?;

        info!(user_id = %user.id, expense_id = %expense.id, "expense created");
        Ok(ExpenseView {
            expense,
            category: Some(category),
        })
    }

    pub async fn list(
        &self,
        user: &User,
        filter: ExpenseFilter,
    ) -> Result<Vec<ExpenseView>, AppError> {
        let owner = Owner::of(user);
        let expenses = self.expenses.list(owner, &filter).await?;
        if expenses.is_empty() {
            return Ok(Vec::new());
        }

        let categories: HashMap<Uuid, Category> = self
            .categories
            .list(owner, &())
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(expenses
            .into_iter()
            .map(|expense| {
                let category = categories.get(&expense.category_id).cloned();
                ExpenseView { expense, category }
            })
            .collect())
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<ExpenseView, AppError> {
        let owner = Owner::of(user);
        let expense = self.expenses.get(owner, id).await?.ok_or(NOT_FOUND)?;
        self.with_category(owner, expense).await
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        mut patch: ExpensePatch,
    ) -> Result<ExpenseView, AppError> {
        patch.amount = patch.amount.map(normalize_amount).transpose()?;
        let owner = Owner::of(user);
        let mut expense = self.expenses.get(owner, id).await?.ok_or(NOT_FOUND)?;
        patch.apply(&mut expense);

        if !self.expenses.update(owner, &expense).await? {
            // Deleted between the read and the write.
            return Err(NOT_FOUND);
        }
        info!(user_id = %user.id, expense_id = %id, "expense updated");
        self.with_category(owner, expense).await
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        if !self.expenses.delete(Owner::of(user), id).await? {
            return Err(NOT_FOUND);
        }
        info!(user_id = %user.id, expense_id = %id, "expense deleted");
        Ok(())
    }

    async fn with_category(&self, owner: Owner, expense: Expense) -> Result<ExpenseView, AppError> {
        let category = self.categories.get(owner, expense.category_id).await?;
        Ok(ExpenseView { expense, category })
    }
}
