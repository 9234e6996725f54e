//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are stored in PHC string format, so the algorithm, its parameters
//! and the salt travel with the hash and verification needs no extra state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::Password;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher with configurable cost parameters.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit cost parameters; tests use this to stay fast.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &Password, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        // Parameters embedded in the stored hash win over `self.params`.
        match self
            .argon2()
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        let params = Params::new(512, 1, 1, None).expect("valid test params");
        Argon2PasswordHasher::with_params(params)
    }

    #[rstest]
    fn hash_is_phc_encoded_argon2id(hasher: Argon2PasswordHasher) {
        let hash = hasher
            .hash(&Password::unchecked("correct horse"))
            .expect("hash");
        assert!(hash.starts_with("$argon2id$"), "unexpected hash {hash}");
    }

    #[rstest]
    fn hashing_twice_uses_fresh_salts(hasher: Argon2PasswordHasher) {
        let password = Password::unchecked("correct horse");
        let first = hasher.hash(&password).expect("first hash");
        let second = hasher.hash(&password).expect("second hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("correct horse", true)]
    #[case("correct horsE", false)]
    #[case("", false)]
    fn verify_matches_only_the_original(
        hasher: Argon2PasswordHasher,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher
            .hash(&Password::unchecked("correct horse"))
            .expect("hash");
        let verified = hasher
            .verify(&Password::unchecked(attempt), &hash)
            .expect("verify");
        assert_eq!(verified, expected);
    }

    #[rstest]
    fn verify_rejects_malformed_hashes(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&Password::unchecked("anything"), "plaintext")
            .expect_err("malformed hash");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
