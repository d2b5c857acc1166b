use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use dcw_mail::Mailer;
use dcw_store::{SecretHasher, Store, StoreError};

pub type AppState = Arc<AppStateInner>;

/// Process-wide settings the HTTP layer needs. Read from the environment by
/// the server binary.
#[derive(Clone)]
pub struct Settings {
    pub jwt_secret: String,
    pub admin_password: String,
    /// Account created at startup so the system is usable immediately.
    pub seed_account: Option<(String, String)>,
    pub token_ttl: chrono::Duration,
    /// Upper bound on a single resolution email send.
    pub mail_timeout: Duration,
}

pub struct AppStateInner {
    pub store: Store,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_secret: String,
    pub admin_secret_hash: String,
    pub token_ttl: chrono::Duration,
    pub mail_timeout: Duration,
}

impl AppStateInner {
    /// Build the store, seed it, and hash the admin password.
    pub fn build(
        settings: Settings,
        hasher: SecretHasher,
        mailer: Arc<dyn Mailer>,
    ) -> Result<AppState, StoreError> {
        let store = Store::new(hasher);

        if let Some((identifier, secret)) = &settings.seed_account {
            store.register(identifier, secret)?;
            info!(identifier = %identifier, "Seed account created");
        }

        let admin_secret_hash = store.hasher().hash(&settings.admin_password)?;

        Ok(Arc::new(Self {
            store,
            mailer,
            jwt_secret: settings.jwt_secret,
            admin_secret_hash,
            token_ttl: settings.token_ttl,
            mail_timeout: settings.mail_timeout,
        }))
    }
}
