use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{RegisterRequest, RegisteredUser},
    jwt::JwtKeys,
    password::{hash_password, password_matches},
    repo_types::User,
};
use crate::{error::AppError, store::UserRepo};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration and password login.
#[derive(Clone)]
pub struct Credentials {
    users: Arc<dyn UserRepo>,
    keys: JwtKeys,
}

impl Credentials {
    pub fn new(users: Arc<dyn UserRepo>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<RegisteredUser, AppError> {
        if req.username.trim().is_empty() {
            return Err(AppError::InvalidInput("Username is required".into()));
        }
        if !is_valid_email(&req.email) {
            warn!(username = %req.username, "registration with malformed email");
            return Err(AppError::InvalidInput("Invalid email".into()));
        }
        if req.password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }

        if self
            .users
            .find_by_username_or_email(&req.username, &req.email)
            .await?
            .is_some()
        {
            warn!(username = %req.username, "username or email already registered");
            return Err(AppError::DuplicateCredential);
        }

        let hash = hash_password(&req.password)?;
        // A concurrent registration can still win the race; the unique
        // index turns that into `StoreError::Conflict`.
        let user = self
            .users
            .insert_user(User::new(req.username, req.email, hash))
            .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(RegisteredUser {
            id: user.id,
            username: user.username,
        })
    }

    /// Unknown username and wrong password fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(%username, "login unknown username");
            return Err(AppError::InvalidCredential);
        };
        if !password_matches(password, &user.hashed_password) {
            warn!(%username, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredential);
        }

        let token = self.keys.issue(&user.username)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}

/// Turns a bearer token into the live, enabled user it names.
#[derive(Clone)]
pub struct SessionResolver {
    users: Arc<dyn UserRepo>,
    keys: JwtKeys,
}

impl SessionResolver {
    pub fn new(users: Arc<dyn UserRepo>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.validate(token)?;
        if claims.sub.is_empty() {
            warn!("token without subject");
            return Err(AppError::InvalidToken);
        }

        match self.users.find_by_username(&claims.sub).await? {
            Some(user) if !user.disabled => Ok(user),
            Some(user) => {
                warn!(user_id = %user.id, "disabled user presented a token");
                Err(AppError::InvalidToken)
            }
            None => {
                warn!(sub = %claims.sub, "token subject does not exist");
                Err(AppError::InvalidToken)
            }
        }
    }
}
