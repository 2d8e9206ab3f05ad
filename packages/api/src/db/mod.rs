//! # Database module: PostgreSQL persistence
//!
//! - [`connect`]: opens a [`sqlx::PgPool`] with up to 5 connections.
//! - [`migrate`]: applies the embedded migrations in `packages/api/migrations`
//!   (`users` with a unique email constraint, `notes` with an owner foreign key).
//! - [`PgStore`]: implements [`store::UserRepository`] and
//!   [`store::NoteRepository`] on top of the pool. A violation of the
//!   `users_email_key` constraint surfaces as [`store::StoreError::DuplicateEmail`],
//!   which closes the race between the signup pre-check and the insert.

mod pg_store;
mod pool;

pub use pg_store::PgStore;
pub use pool::{connect, migrate};
