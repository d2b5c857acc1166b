use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::{debug, warn};

use crate::{Store, StoreError};

const DECOY_SECRET: &str = "decoy-secret-for-unknown-identifiers";

/// Argon2id hashing for account secrets and the admin password.
#[derive(Clone, Default)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    /// Custom cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, StoreError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| StoreError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, secret: &str) -> Result<String, StoreError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| StoreError::Hashing(e.to_string()))
    }

    /// False for a mismatch and for a malformed stored hash alike.
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl Store {
    /// Sign up. Re-registering an identifier replaces its secret.
    pub fn register(&self, identifier: &str, secret: &str) -> Result<(), StoreError> {
        if identifier.trim().is_empty() {
            return Err(StoreError::missing("identifier"));
        }
        if secret.trim().is_empty() {
            return Err(StoreError::missing("secret"));
        }

        // Hash before taking the lock
        let hash = self.hasher.hash(secret)?;

        let replaced = self.with_state_mut(|s| s.accounts.insert(identifier.to_string(), hash));
        debug!(identifier, replaced = replaced.is_some(), "Account registered");
        Ok(())
    }

    /// Unknown identifiers still cost one Argon2 verification, so timing does
    /// not reveal which accounts exist.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Result<(), StoreError> {
        let Some(stored) = self.with_state(|s| s.accounts.get(identifier).cloned()) else {
            let decoy = self.decoy_hash();
            let _ = self.hasher.verify(secret, decoy);
            return Err(StoreError::Auth);
        };

        if self.hasher.verify(secret, &stored) {
            Ok(())
        } else {
            Err(StoreError::Auth)
        }
    }

    fn decoy_hash(&self) -> &str {
        self.decoy_hash.get_or_init(|| {
            self.hasher.hash(DECOY_SECRET).unwrap_or_else(|e| {
                warn!(error = %e, "Could not hash decoy secret");
                String::new()
            })
        })
    }

    pub fn account_count(&self) -> usize {
        self.with_state(|s| s.accounts.len())
    }
}
