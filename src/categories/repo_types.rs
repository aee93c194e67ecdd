use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{Owned, Owner};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
}

impl Owned for Category {
    type Filter = ();

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Owner {
        Owner::from_id(self.user_id)
    }
}
