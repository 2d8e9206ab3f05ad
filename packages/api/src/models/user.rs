//! # Session snapshot of a user
//!
//! [`UserInfo`] is the subset of a [`store::User`] that is written into the session
//! at signup/login. It omits the password hash and timestamps. The snapshot is
//! never refreshed from the database, so a role change only shows up after the
//! user logs in again.

use serde::{Deserialize, Serialize};
use store::{Role, User};
use uuid::Uuid;

/// User information stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub branch: String,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            branch: user.branch.clone(),
            role: user.role,
        }
    }
}
