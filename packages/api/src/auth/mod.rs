//! Authentication: password hashing and session state.

mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::SESSION_USER_KEY;
