use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::gateways::StoreOptions;
use crate::listings::FEATURED_LIMIT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub properties_table: String,
    pub request_timeout: Duration,
    pub featured_limit: usize,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            supabase_url: lookup("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            supabase_anon_key: lookup("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY must be set")?,
            properties_table: lookup("PROPERTIES_TABLE")
                .unwrap_or_else(|| "properties".to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            featured_limit: lookup("FEATURED_LIMIT")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("FEATURED_LIMIT must be a number")?
                .unwrap_or(FEATURED_LIMIT),
            admin_email: lookup("ADMIN_EMAIL"),
            admin_password: lookup("ADMIN_PASSWORD"),
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            table: self.properties_table.clone(),
            timeout: self.request_timeout,
            ..StoreOptions::new(&self.supabase_url, &self.supabase_anon_key)
        }
    }

    /// Operator credentials, when both halves are configured
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        Some((self.admin_email.as_deref()?, self.admin_password.as_deref()?))
    }
}
