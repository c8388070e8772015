// src/config/secrets.rs
//! API keys and tokens, read from the environment once at startup.
//!
//! Nothing is validated here: a missing key is reported by the component that
//! first needs it (see `require`).

use std::fmt;

pub const ENV_ALPHA_VANTAGE: &str = "ALPHA_VANTAGE_API_KEY";
pub const ENV_PRODUCT_HUNT: &str = "PRODUCT_HUNT_TOKEN";
pub const ENV_OPENAI: &str = "OPENAI_API_KEY";
pub const ENV_RESEND: &str = "RESEND_API_KEY";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";

#[derive(Clone, Default)]
pub struct Secrets {
    pub alpha_vantage_key: Option<String>,
    pub product_hunt_token: Option<String>,
    pub openai_key: Option<String>,
    pub resend_key: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            alpha_vantage_key: read(ENV_ALPHA_VANTAGE),
            product_hunt_token: read(ENV_PRODUCT_HUNT),
            openai_key: read(ENV_OPENAI),
            resend_key: read(ENV_RESEND),
            smtp_host: read(ENV_SMTP_HOST),
            smtp_user: read(ENV_SMTP_USER),
            smtp_pass: read(ENV_SMTP_PASS),
        }
    }
}

fn read(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Borrow a secret or build the caller's "missing key" error.
pub fn require<'a, E>(
    value: &'a Option<String>,
    name: &'static str,
    missing: impl FnOnce(&'static str) -> E,
) -> Result<&'a str, E> {
    value.as_deref().ok_or_else(|| missing(name))
}

// Never print key material; only which keys are present.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("alpha_vantage_key", &self.alpha_vantage_key.is_some())
            .field("product_hunt_token", &self.product_hunt_token.is_some())
            .field("openai_key", &self.openai_key.is_some())
            .field("resend_key", &self.resend_key.is_some())
            .field("smtp_host", &self.smtp_host)
            .field("smtp_user", &self.smtp_user.is_some())
            .field("smtp_pass", &self.smtp_pass.is_some())
            .finish()
    }
}
