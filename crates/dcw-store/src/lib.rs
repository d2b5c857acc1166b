pub mod accounts;
pub mod complaints;
pub mod error;
pub mod notifications;

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use dcw_types::models::Complaint;
use tracing::info;

pub use accounts::SecretHasher;
pub use complaints::{NewAttachment, NewComplaint, ResolutionNotice, StatusChange, parse_choice};
pub use error::StoreError;

/// Process-wide, in-memory state: accounts, complaints, notification queues.
/// Constructed once at startup and dropped at shutdown; nothing is persisted.
pub struct Store {
    state: Mutex<StoreState>,
    hasher: SecretHasher,
    /// Hash checked against when an identifier is unknown.
    decoy_hash: OnceLock<String>,
}

#[derive(Default)]
struct StoreState {
    /// identifier -> Argon2id PHC string
    accounts: HashMap<String, String>,
    /// Submission order; ids are strictly increasing along the vector.
    complaints: Vec<Complaint>,
    notifications: HashMap<String, Vec<String>>,
    last_id: u64,
}

impl Store {
    pub fn new(hasher: SecretHasher) -> Self {
        info!("In-memory store initialised");
        Self {
            state: Mutex::new(StoreState::default()),
            hasher,
            decoy_hash: OnceLock::new(),
        }
    }

    pub fn hasher(&self) -> &SecretHasher {
        &self.hasher
    }

    fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&StoreState) -> T,
    {
        // Every mutation completes before the guard drops, so a poisoned lock
        // still holds consistent data.
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn with_state_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut StoreState) -> T,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn store() -> Store {
        Store::new(SecretHasher::with_params(8, 1, 1).unwrap())
    }
}
