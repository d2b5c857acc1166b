use std::time::Duration;

use anyhow::{Context, Result, bail};

use dcw_api::Settings;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// One year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_password: String,
    pub seed_identifier: String,
    pub seed_secret: String,
    pub mail: Option<MailRelay>,
    pub mail_from: String,
    pub mail_timeout: Duration,
    pub token_ttl_hours: i64,
}

pub struct MailRelay {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = get("DCW_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("DCW_JWT_SECRET is unset or still a placeholder");
        }

        let port: u16 = var("DCW_PORT", "3000")
            .parse()
            .context("DCW_PORT must be a port number")?;
        let mail_timeout_secs: u64 = var("DCW_MAIL_TIMEOUT_SECS", "10")
            .parse()
            .context("DCW_MAIL_TIMEOUT_SECS must be a whole number of seconds")?;
        let token_ttl_hours: i64 = var("DCW_TOKEN_TTL_HOURS", "24")
            .parse()
            .context("DCW_TOKEN_TTL_HOURS must be a whole number of hours")?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            bail!("DCW_TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS}");
        }

        let mail = get("DCW_MAIL_ENDPOINT")
            .filter(|e| !e.is_empty())
            .map(|endpoint| MailRelay {
                endpoint,
                api_key: get("DCW_MAIL_API_KEY").filter(|k| !k.is_empty()),
            });

        Ok(Self {
            host: var("DCW_HOST", "0.0.0.0"),
            port,
            jwt_secret,
            admin_password: var("DCW_ADMIN_PASSWORD", "admin123"),
            seed_identifier: var("DCW_SEED_IDENTIFIER", "123"),
            seed_secret: var("DCW_SEED_SECRET", "123"),
            mail,
            mail_from: var("DCW_MAIL_FROM", "no-reply@digitalcomplaintwall.local"),
            mail_timeout: Duration::from_secs(mail_timeout_secs),
            token_ttl_hours,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            jwt_secret: self.jwt_secret.clone(),
            admin_password: self.admin_password.clone(),
            seed_account: Some((self.seed_identifier.clone(), self.seed_secret.clone())),
            token_ttl: chrono::Duration::hours(self.token_ttl_hours),
            mail_timeout: self.mail_timeout,
        }
    }
}
