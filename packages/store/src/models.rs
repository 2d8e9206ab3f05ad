//! # Domain models for users and shared notes
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account. The password is only ever held as a [`PasswordHash`]. |
//! | [`NewUser`] | A validated signup, ready to be inserted by a [`crate::UserRepository`]. |
//! | [`Note`] | Metadata for one uploaded file and the id of the user who uploaded it. |
//! | [`NewNote`] | A validated note, ready to be inserted by a [`crate::NoteRepository`]. |
//! | [`NoteWithOwner`] | A note joined with its owner's display name, for the public listing. |
//!
//! [`Role`] is stored as lowercase text (`"student"` / `"teacher"`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::ValidationError;

/// Account role. Defaults to [`Role::Student`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// A PHC-format password hash. There is no way to build one from a raw password
/// inside this crate; hashing happens in the `api` crate.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash string.
    pub fn from_phc(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Full user record.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub branch: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User fields supplied at signup, after validation and hashing.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub branch: String,
    pub role: Role,
}

impl NewUser {
    /// Assign an id and timestamps.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            branch: self.branch,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Metadata for an uploaded file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub branch: String,
    pub subject: String,
    pub description: String,
    /// Path reference returned by the upload handler, e.g. `uploads/1718000000000.pdf`
    pub file: String,
    pub upload_date: DateTime<Utc>,
    pub uploaded_by: Uuid,
}

/// Note fields after validation.
#[derive(Clone, Debug)]
pub struct NewNote {
    pub branch: String,
    pub subject: String,
    pub description: String,
    pub file: String,
    pub uploaded_by: Uuid,
}

impl NewNote {
    pub fn into_note(self, now: DateTime<Utc>) -> Note {
        Note {
            id: Uuid::new_v4(),
            branch: self.branch,
            subject: self.subject,
            description: self.description,
            file: self.file,
            upload_date: now,
            uploaded_by: self.uploaded_by,
        }
    }
}

/// A note with its owner's name resolved. `owner_name` is `None` when the owner
/// record no longer resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteWithOwner {
    pub note: Note,
    pub owner_name: Option<String>,
}
