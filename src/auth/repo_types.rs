use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hashed_password: String, // argon2 PHC string
    pub full_name: Option<String>,
    pub disabled: bool,          // set administratively, never through the API
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(username: String, email: String, hashed_password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            hashed_password,
            full_name: None,
            disabled: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
