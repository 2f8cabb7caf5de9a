use crate::error::{AuthError, StoreError};
use crate::gateways::traits::{AuthGateway, PropertyStore};
use crate::gateways::types::{AuthStatus, Role, Session, User};
use crate::models::{Property, PropertyDraft, PropertyPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Process-local listing store, kept in insertion order
#[derive(Default)]
pub struct InMemoryStore {
    rows: tokio::sync::RwLock<Vec<Property>>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows
    pub fn with_rows(rows: Vec<Property>) -> Self {
        Self {
            rows: tokio::sync::RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Delay every call, to exercise caller timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// While set, every call fails as if the network were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn round_trip(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyStore for InMemoryStore {
    async fn select_all(&self) -> Result<Vec<Property>, StoreError> {
        self.round_trip().await?;
        Ok(self.rows.read().await.clone())
    }

    async fn select_by_id(&self, id: &str) -> Result<Option<Property>, StoreError> {
        self.round_trip().await?;
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, draft: &PropertyDraft) -> Result<Property, StoreError> {
        self.round_trip().await?;
        let property = draft.clone().into_property(Uuid::new_v4().to_string());
        debug!(id = %property.id, "Inserted listing");
        self.rows.write().await.push(property.clone());
        Ok(property)
    }

    async fn update(
        &self,
        id: &str,
        patch: &PropertyPatch,
    ) -> Result<Option<Property>, StoreError> {
        self.round_trip().await?;
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|p| p.id == id).map(|property| {
            patch.apply(property);
            property.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.round_trip().await?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Process-local auth service with a fixed set of accounts
pub struct InMemoryAuth {
    accounts: HashMap<String, String>,
    session: RwLock<Option<Session>>,
    issued: Mutex<HashSet<String>>,
    reachable: AtomicBool,
    session_ttl: chrono::Duration,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            session: RwLock::new(None),
            issued: Mutex::new(HashSet::new()),
            reachable: AtomicBool::new(true),
            session_ttl: chrono::Duration::hours(1),
        }
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.insert(email.to_string(), password.to_string());
        self
    }

    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Invalidate every issued token server-side, leaving local sessions in place
    pub fn revoke_all(&self) {
        if let Ok(mut issued) = self.issued.lock() {
            issued.clear();
        }
    }

    fn local_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }
}

impl Default for InMemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("in-memory auth offline".to_string()));
        }
        match self.accounts.get(email) {
            Some(expected) if expected == password => {}
            _ => return Err(AuthError::InvalidCredentials),
        }

        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            user: User {
                id: Uuid::new_v4().to_string(),
                email: email.to_string(),
                role: Role::Admin,
            },
            expires_at: Utc::now() + self.session_ttl,
        };

        if let Ok(mut issued) = self.issued.lock() {
            issued.insert(session.access_token.clone());
        }
        if let Ok(mut slot) = self.session.write() {
            *slot = Some(session.clone());
        }
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.session.write().ok().and_then(|mut s| s.take());
        if let (Some(session), Ok(mut issued)) = (session, self.issued.lock()) {
            issued.remove(&session.access_token);
        }
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.local_session()
            .filter(|session| !session.is_expired(Utc::now()))
    }

    async fn verify(&self) -> AuthStatus {
        let Some(session) = self.local_session() else {
            return AuthStatus::Anonymous;
        };
        if session.is_expired(Utc::now()) {
            return AuthStatus::Expired;
        }
        if !self.reachable.load(Ordering::SeqCst) {
            return AuthStatus::Unreachable {
                session,
                reason: "in-memory auth offline".to_string(),
            };
        }
        let known = self
            .issued
            .lock()
            .map(|issued| issued.contains(&session.access_token))
            .unwrap_or(false);
        if known {
            AuthStatus::Authenticated(session)
        } else {
            if let Ok(mut slot) = self.session.write() {
                *slot = None;
            }
            AuthStatus::Rejected
        }
    }

    fn is_authenticated(&self) -> bool {
        self.local_session()
            .map(|session| !session.is_expired(Utc::now()))
            .unwrap_or(false)
    }
}
