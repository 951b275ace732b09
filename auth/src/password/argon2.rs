use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use serde::Deserialize;

use super::errors::PasswordError;

/// Fixed salt for the uniform-timing computation; its output is discarded.
const DUMMY_SALT: &[u8] = b"identity-dummy-salt";

/// Argon2 variant used for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashingAlgorithm {
    #[default]
    Argon2id,
    Argon2i,
    Argon2d,
}

impl From<HashingAlgorithm> for Algorithm {
    fn from(algorithm: HashingAlgorithm) -> Self {
        match algorithm {
            HashingAlgorithm::Argon2id => Algorithm::Argon2id,
            HashingAlgorithm::Argon2i => Algorithm::Argon2i,
            HashingAlgorithm::Argon2d => Algorithm::Argon2d,
        }
    }
}

/// Work factor for password hashing.
///
/// Defaults follow the argon2 crate's recommended baseline
/// (19 MiB memory, 2 iterations, 1 lane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashingParams {
    pub algorithm: HashingAlgorithm,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            algorithm: HashingAlgorithm::default(),
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Produces PHC strings with a fresh random salt per call. Verification reads
/// the algorithm and cost embedded in the stored hash, so hashes created under
/// an older work factor keep verifying after the configuration changes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    algorithm: Algorithm,
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with default Argon2id parameters.
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::Argon2id,
            params: Params::default(),
        }
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// # Errors
    /// * `InvalidParameters` - Argon2 rejected the memory/iteration/lane combination
    pub fn with_params(params: HashingParams) -> Result<Self, PasswordError> {
        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            algorithm: params.algorithm.into(),
            params: argon2_params,
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(self.algorithm, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password securely.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant-time. A stored hash that cannot be
    /// parsed never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spend the same Argon2 work as `verify` without a stored hash.
    ///
    /// Always returns false.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let mut output = [0u8; Params::DEFAULT_OUTPUT_LEN];
        let _ = self
            .argon2()
            .hash_password_into(password.as_bytes(), DUMMY_SALT, &mut output);
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::Instant;

    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_params(HashingParams {
            algorithm: HashingAlgorithm::Argon2id,
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();

        let first = hasher.hash("Passw0rd!").expect("Failed to hash password");
        let second = hasher.hash("Passw0rd!").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("Passw0rd!", &first));
        assert!(hasher.verify("Passw0rd!", &second));
    }

    #[test]
    fn test_hash_embeds_configured_parameters() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("password").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_argon2i_variant() {
        let hasher = PasswordHasher::with_params(HashingParams {
            algorithm: HashingAlgorithm::Argon2i,
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher");

        let hash = hasher.hash("password").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2i$"));
        assert!(hasher.verify("password", &hash));
    }

    #[test]
    fn test_verify_survives_parameter_change() {
        let hash = cheap_hasher().hash("password").expect("Failed to hash password");

        let stronger = PasswordHasher::with_params(HashingParams {
            memory_kib: 2048,
            iterations: 2,
            ..HashingParams::default()
        })
        .expect("Failed to build hasher");

        assert!(stronger.verify("password", &hash));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = cheap_hasher();

        assert!(!hasher.verify("password", "invalid_hash"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$"));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = PasswordHasher::with_params(HashingParams {
            memory_kib: 1,
            ..HashingParams::default()
        });

        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }

    #[test]
    fn test_verify_dummy_never_matches() {
        let hasher = cheap_hasher();
        assert!(!hasher.verify_dummy("anything"));
        assert!(!hasher.verify_dummy(""));
    }

    #[test]
    fn test_verify_dummy_costs_comparable_work() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct horse").expect("Failed to hash password");

        let fastest = |f: &dyn Fn()| {
            (0..3)
                .map(|_| {
                    let start = Instant::now();
                    f();
                    start.elapsed()
                })
                .min()
                .unwrap_or(Duration::ZERO)
        };

        let real = fastest(&|| {
            hasher.verify("battery staple", &hash);
        });
        let dummy = fastest(&|| {
            hasher.verify_dummy("battery staple");
        });

        // Same Argon2 cost on both paths; only scheduling noise separates them.
        assert!(dummy * 4 >= real, "dummy {:?} vs real {:?}", dummy, real);
    }
}
