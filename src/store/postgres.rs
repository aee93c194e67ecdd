use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::{ExpenseRepo, Owned, Owner, Scoped, SpendingRepo, StoreError, StoreResult, UserRepo};
use crate::{
    auth::repo_types::User,
    categories::repo_types::Category,
    expenses::repo_types::{Expense, ExpenseFilter},
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::Conflict,
            Some(FOREIGN_KEY_VIOLATION) => return StoreError::MissingReference,
            _ => {}
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, full_name, disabled, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, hashed_password, full_name, disabled, created_at
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, hashed_password, full_name, disabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, hashed_password, full_name, disabled, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(user.disabled)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }
}

#[async_trait]
impl Scoped<Category> for PgStore {
    async fn list(&self, owner: Owner, _filter: &()) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Owner, id: Uuid) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner.id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, record: Category) -> StoreResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, user_id, name, color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, color
            "#,
        )
        .bind(record.id())
        .bind(record.owner().id())
        .bind(&record.name)
        .bind(&record.color)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }
}

#[async_trait]
impl Scoped<Expense> for PgStore {
    async fn list(&self, owner: Owner, filter: &ExpenseFilter) -> StoreResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, category_id, amount, description, "date", created_at
            FROM expenses
            WHERE user_id = $1
              AND ($2::date IS NULL OR "date" >= $2)
              AND ($3::date IS NULL OR "date" <= $3)
              AND ($4::uuid IS NULL OR category_id = $4)
            ORDER BY "date", created_at
            "#,
        )
        .bind(owner.id())
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Owner, id: Uuid) -> StoreResult<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, category_id, amount, description, "date", created_at
            FROM expenses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner.id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, record: Expense) -> StoreResult<Expense> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, user_id, category_id, amount, description, "date", created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, category_id, amount, description, "date", created_at
            "#,
        )
        .bind(record.id())
        .bind(record.owner().id())
        .bind(record.category_id)
        .bind(record.amount)
        .bind(&record.description)
        .bind(record.date)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }
}

#[async_trait]
impl ExpenseRepo for PgStore {
    async fn update(&self, owner: Owner, record: &Expense) -> StoreResult<bool> {
        if record.owner() != owner {
            return Ok(false);
        }
        let res = sqlx::query(
            r#"
            UPDATE expenses
               SET amount = $3, description = $4, "date" = $5
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(record.id())
        .bind(owner.id())
        .bind(record.amount)
        .bind(&record.description)
        .bind(record.date)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, owner: Owner, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner.id())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl SpendingRepo for PgStore {
    async fn totals_by_date(&self, owner: Owner) -> StoreResult<Vec<(Date, Decimal)>> {
        let rows = sqlx::query_as::<_, (Date, Decimal)>(
            r#"
            SELECT "date", SUM(amount)
            FROM expenses
            WHERE user_id = $1
            GROUP BY "date"
            ORDER BY "date"
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn totals_by_month(&self, owner: Owner) -> StoreResult<Vec<(u8, Decimal)>> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT EXTRACT(MONTH FROM "date")::INT4 AS month, SUM(amount)
            FROM expenses
            WHERE user_id = $1
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(month, total)| (month as u8, total))
            .collect())
    }

    async fn totals_by_category(&self, owner: Owner) -> StoreResult<Vec<(String, Decimal)>> {
        // Byte-order collation keeps the label order identical to `str` ordering.
        let rows = sqlx::query_as::<_, (String, Decimal)>(
            r#"
            SELECT c.name, SUM(e.amount)
            FROM expenses e
            JOIN categories c ON c.id = e.category_id AND c.user_id = e.user_id
            WHERE e.user_id = $1
            GROUP BY c.name
            ORDER BY c.name COLLATE "C"
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
