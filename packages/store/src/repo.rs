//! # Repository traits: persistence seams for users and notes
//!
//! The web layer only ever talks to `dyn UserRepository` / `dyn NoteRepository`, so
//! the same handlers run against Postgres in production (`api::db::PgStore`) and
//! against [`crate::MemoryStore`] in tests.
//!
//! ## [`UserRepository`]
//!
//! | Method | Description |
//! |--------|-------------|
//! | `insert_user` | Stores a new user. Fails with [`StoreError::DuplicateEmail`] if the email is taken. |
//! | `find_user_by_email` | Exact match on the normalized email. |
//!
//! ## [`NoteRepository`]
//!
//! | Method | Description |
//! |--------|-------------|
//! | `insert_note` | Stores a new note. |
//! | `list_notes_by_owner` | Notes whose `uploaded_by` equals the given id, in storage order. |
//! | `list_notes_with_owner` | Every note, joined with the owner's full name. |
//! | `find_note` | Lookup by primary key. |
//! | `list_note_files` | Every stored file reference (used to find orphaned uploads). |

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewNote, NewUser, Note, NoteWithOwner, User};

/// Errors raised by a repository backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError>;
    async fn list_notes_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, StoreError>;
    async fn list_notes_with_owner(&self) -> Result<Vec<NoteWithOwner>, StoreError>;
    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;
    async fn list_note_files(&self) -> Result<Vec<String>, StoreError>;
}
