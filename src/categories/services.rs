use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::repo_types::Category;
use crate::{
    auth::repo_types::User,
    error::AppError,
    store::{Owner, Scoped},
};

#[derive(Clone)]
pub struct CategoryLedger {
    repo: Arc<dyn Scoped<Category>>,
}

impl CategoryLedger {
    pub fn new(repo: Arc<dyn Scoped<Category>>) -> Self {
        Self { repo }
    }

    /// The user's categories in insertion order.
    pub async fn list(&self, user: &User) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list(Owner::of(user), &()).await?)
    }

    pub async fn create(
        &self,
        user: &User,
        name: String,
        color: String,
    ) -> Result<Category, AppError> {
        let category = self
            .repo
            .insert(Category {
                id: Uuid::new_v4(),
                user_id: user.id,
                name,
                color,
            })
            .await?;
        info!(user_id = %user.id, category_id = %category.id, "category created");
        Ok(category)
    }
}
