//! # Password hashing and verification: Argon2id
//!
//! - [`hash_password`]: generates a random salt via [`OsRng`], hashes the plaintext
//!   password with the default Argon2id parameters and wraps the PHC-format result
//!   (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`) in a [`PasswordHash`]. This is the
//!   only way the account service obtains a value for the `password_hash` column.
//!
//! - [`verify_password`]: parses the stored PHC string and checks whether the
//!   provided plaintext matches. `Ok(false)` on mismatch, `Err` if the stored hash
//!   is malformed. The comparison itself is constant-time inside `argon2`.
//!
//! Both are CPU-bound; async callers run them through `spawn_blocking`.

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use store::PasswordHash;

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<PasswordHash, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(PasswordHash::from_phc(hash.to_string()))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &PasswordHash) -> Result<bool, password_hash::Error> {
    let parsed = password_hash::PasswordHash::new(hash.as_str())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
