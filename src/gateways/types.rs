use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection parameters for a hosted store/auth project
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    pub api_key: String,
    /// Table holding the listings
    pub table: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl StoreOptions {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            table: "properties".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Signed-in operator session with an explicit expiry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Result of checking a session against the auth service
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    /// Token present and confirmed by the service
    Authenticated(Session),
    /// No local session
    Anonymous,
    /// Local session past its expiry
    Expired,
    /// Service refused the token
    Rejected,
    /// Token present but the service could not be reached to confirm it
    Unreachable { session: Session, reason: String },
}
