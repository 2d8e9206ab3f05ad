pub mod models;
pub mod repo;
pub mod uploads;
pub mod validate;

mod memory;
pub use memory::MemoryStore;

pub use models::{NewNote, NewUser, Note, NoteWithOwner, PasswordHash, Role, User};
pub use repo::{NoteRepository, StoreError, UserRepository};
pub use uploads::{StoredFile, UploadDir, UploadError};
pub use validate::ValidationError;
