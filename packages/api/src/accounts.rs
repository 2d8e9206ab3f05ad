//! # Credential store: signup and login
//!
//! [`CredentialStore`] owns the account workflow on top of a
//! [`UserRepository`]:
//!
//! - [`create`](CredentialStore::create) validates a [`Signup`], rejects a taken
//!   email, hashes the password and inserts the user.
//! - [`find_by_email`](CredentialStore::find_by_email) normalizes the address
//!   the same way signup does before looking it up.
//! - [`verify`](CredentialStore::verify) checks a raw password against the
//!   stored hash.
//! - [`authenticate`](CredentialStore::authenticate) combines the two and maps
//!   every failure to the same [`AppError::Authentication`].
//!
//! Establishing the session is left to the caller.

use std::sync::Arc;

use serde::Deserialize;
use store::{validate, NewUser, PasswordHash, User, UserRepository, ValidationError};

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;

/// Signup form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signup {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub branch: String,
    pub role: Option<String>,
}

/// Login form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new user.
    pub async fn create(&self, signup: Signup) -> Result<User, AppError> {
        let full_name = validate::required("Full name", &signup.full_name)?;
        let email = validate::email(&signup.email)?;
        validate::password(&signup.password)?;
        let branch = validate::required("Branch", &signup.branch)?;
        let role = validate::role(signup.role.as_deref())?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(ValidationError::DuplicateEmail.into());
        }

        let password_hash = hash(signup.password).await?;
        let user = self
            .users
            .insert_user(NewUser {
                full_name,
                email,
                password_hash,
                branch,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Registered {}", user.email);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.users.find_user_by_email(&email).await?)
    }

    /// Whether `raw_password` matches the user's stored hash.
    pub async fn verify(&self, user: &User, raw_password: &str) -> Result<bool, AppError> {
        let hash = user.password_hash.clone();
        let raw = raw_password.to_string();
        tokio::task::spawn_blocking(move || verify_password(&raw, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("stored password hash unreadable: {e}")))
    }

    /// Look up the user by email and check the password.
    pub async fn authenticate(&self, login: &Login) -> Result<User, AppError> {
        let Some(user) = self.find_by_email(&login.email).await? else {
            tracing::info!("Login failed: unknown email");
            return Err(AppError::Authentication);
        };

        if !self.verify(&user, &login.password).await? {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::Authentication);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}

async fn hash(raw: String) -> Result<PasswordHash, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&raw))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}
