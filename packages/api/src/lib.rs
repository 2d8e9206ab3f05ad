//! # API crate: account, session and note services for notes-share
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`accounts`] | Credential store: signup validation, password hashing, login |
//! | [`auth`] | Argon2 password hashing and session state transitions |
//! | [`db`] | PostgreSQL pool, migrations and the `PgStore` repository |
//! | [`error`] | [`AppError`], the error kinds surfaced to the web layer |
//! | [`models`] | [`UserInfo`], the user snapshot kept in the session |
//! | [`notes`] | Note store, the two-step upload workflow and orphan sweeping |
//! | [`settings`] | Layered configuration (defaults, `notes-share.toml`, `NOTES__*` env) |

pub mod accounts;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod notes;
pub mod settings;

pub use accounts::CredentialStore;
pub use error::AppError;
pub use models::UserInfo;
pub use notes::NoteStore;
pub use settings::{DownloadPolicy, Settings};
