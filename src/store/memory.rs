//! In-process store used by the test suite in place of Postgres.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::Date;
use uuid::Uuid;

use super::{
    ExpenseRepo, Owned, Owner, Scoped, SpendingRepo, StoreError, StoreResult, UserRepo,
};
use crate::{
    auth::repo_types::User,
    categories::repo_types::Category,
    expenses::repo_types::{Expense, ExpenseFilter},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    categories: Mutex<Vec<Category>>,
    expenses: Mutex<Vec<Expense>>,
}

impl MemoryStore {
    /// Flips the administrative `disabled` flag, which no route can change.
    pub fn set_disabled(&self, username: &str, disabled: bool) {
        let mut users = self.users.lock().unwrap();
        for user in users.iter_mut().filter(|u| u.username == username) {
            user.disabled = disabled;
        }
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.lock().unwrap().len()
    }

    fn expenses_of(&self, owner: Owner) -> Vec<Expense> {
        let rows = self.expenses.lock().unwrap();
        let owned: Vec<Expense> = owned_by(&rows, owner).cloned().collect();
        owned
    }
}

fn owned_by<E: Owned>(rows: &[E], owner: Owner) -> impl Iterator<Item = &E> {
    rows.iter().filter(move |r| r.owner() == owner)
}

fn matches(filter: &ExpenseFilter, e: &Expense) -> bool {
    filter.date_from.map_or(true, |from| e.date >= from)
        && filter.date_to.map_or(true, |to| e.date <= to)
        && filter.category_id.map_or(true, |c| e.category_id == c)
}

fn fold<K: Ord>(rows: impl IntoIterator<Item = (K, Decimal)>) -> Vec<(K, Decimal)> {
    let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();
    for (key, amount) in rows {
        *totals.entry(key).or_default() += amount;
    }
    totals.into_iter().collect()
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().unwrap();
        let found = users.iter().find(|u| u.username == username).cloned();
        Ok(found)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let users = self.users.lock().unwrap();
        let found = users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned();
        Ok(found)
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl Scoped<Category> for MemoryStore {
    async fn list(&self, owner: Owner, _filter: &()) -> StoreResult<Vec<Category>> {
        let rows = self.categories.lock().unwrap();
        let owned: Vec<Category> = owned_by(&rows, owner).cloned().collect();
        Ok(owned)
    }

    async fn get(&self, owner: Owner, id: Uuid) -> StoreResult<Option<Category>> {
        let rows = self.categories.lock().unwrap();
        let found = owned_by(&rows, owner).find(|c| c.id() == id).cloned();
        Ok(found)
    }

    async fn insert(&self, record: Category) -> StoreResult<Category> {
        self.categories.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl Scoped<Expense> for MemoryStore {
    async fn list(&self, owner: Owner, filter: &ExpenseFilter) -> StoreResult<Vec<Expense>> {
        let mut out: Vec<Expense> = self
            .expenses_of(owner)
            .into_iter()
            .filter(|e| matches(filter, e))
            .collect();
        out.sort_by_key(|e| (e.date, e.created_at));
        Ok(out)
    }

    async fn get(&self, owner: Owner, id: Uuid) -> StoreResult<Option<Expense>> {
        let rows = self.expenses.lock().unwrap();
        let found = owned_by(&rows, owner).find(|e| e.id() == id).cloned();
        Ok(found)
    }

    async fn insert(&self, record: Expense) -> StoreResult<Expense> {
        let known_category = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.id == record.category_id);
        if !known_category {
            return Err(StoreError::MissingReference);
        }
        self.expenses.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ExpenseRepo for MemoryStore {
    async fn update(&self, owner: Owner, record: &Expense) -> StoreResult<bool> {
        let mut rows = self.expenses.lock().unwrap();
        let Some(row) = rows
            .iter_mut()
            .find(|e| e.id == record.id && e.owner() == owner && record.owner() == owner)
        else {
            return Ok(false);
        };
        row.amount = record.amount;
        row.description = record.description.clone();
        row.date = record.date;
        Ok(true)
    }

    async fn delete(&self, owner: Owner, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.expenses.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.id == id && e.owner() == owner));
        let removed = rows.len() < before;
        Ok(removed)
    }
}

#[async_trait]
impl SpendingRepo for MemoryStore {
    async fn totals_by_date(&self, owner: Owner) -> StoreResult<Vec<(Date, Decimal)>> {
        let rows = self.expenses_of(owner);
        Ok(fold(rows.iter().map(|e| (e.date, e.amount))))
    }

    async fn totals_by_month(&self, owner: Owner) -> StoreResult<Vec<(u8, Decimal)>> {
        let rows = self.expenses_of(owner);
        Ok(fold(rows.iter().map(|e| (u8::from(e.date.month()), e.amount))))
    }

    async fn totals_by_category(&self, owner: Owner) -> StoreResult<Vec<(String, Decimal)>> {
        let names: HashMap<Uuid, String> = {
            let rows = self.categories.lock().unwrap();
            let names = owned_by(&rows, owner)
                .map(|c| (c.id, c.name.clone()))
                .collect();
            names
        };
        let rows = self.expenses_of(owner);
        Ok(fold(rows.iter().filter_map(|e| {
            names
                .get(&e.category_id)
                .map(|name| (name.clone(), e.amount))
        })))
    }
}
