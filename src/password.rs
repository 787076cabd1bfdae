//! Admin credential hashing.
//!
//! List admin passwords are hashed with Argon2id before they reach the
//! engine, which only ever stores the PHC string.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;

use crate::{ListGateError, Result};

/// Create the Argon2 hasher.
///
/// Parameters:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
fn create_argon2() -> Result<Argon2<'static>> {
    let params = Params::new(19456, 2, 1, None)
        .map_err(|e| ListGateError::Credential(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash an admin password.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
pub fn hash_admin_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ListGateError::Credential(e.to_string()))?;
    Ok(hash.to_string())
}
