use crate::error::AuthError;
use crate::gateways::traits::AuthGateway;
use crate::gateways::types::{AuthStatus, Role, Session, StoreOptions, User};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{info, warn};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Operator sign-in against the Supabase auth (GoTrue) endpoints
pub struct SupabaseAuth {
    client: Client,
    options: StoreOptions,
    session: RwLock<Option<Session>>,
}

impl SupabaseAuth {
    pub fn new(options: StoreOptions) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            options,
            session: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.options.url, path)
    }

    fn local_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn store_session(&self, session: Option<Session>) {
        if let Ok(mut slot) = self.session.write() {
            *slot = session;
        }
    }
}

#[async_trait]
impl AuthGateway for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.options.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            warn!(email, "Sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: User {
                id: token.user.id,
                email: token.user.email.unwrap_or_else(|| email.to_string()),
                // Every account on this project is an operator
                role: Role::Admin,
            },
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        };

        info!(user = %session.user.email, expires_at = %session.expires_at, "Signed in");
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.local_session() else {
            return Ok(());
        };
        // The local session is dropped even if the service call fails
        self.store_session(None);

        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.options.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Logout not acknowledged");
        }
        info!(user = %session.user.email, "Signed out");
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

        let result = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.options.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => AuthStatus::Authenticated(session),
            Ok(response)
                if matches!(
                    response.status(),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                ) =>
            {
                warn!(user = %session.user.email, "Session token rejected, dropping local session");
                self.store_session(None);
                AuthStatus::Rejected
            }
            Ok(response) => AuthStatus::Unreachable {
                session,
                reason: format!("auth service returned {}", response.status()),
            },
            Err(e) => AuthStatus::Unreachable {
                session,
                reason: e.to_string(),
            },
        }
    }

    fn is_authenticated(&self) -> bool {
        self.local_session()
            .map(|session| !session.is_expired(Utc::now()))
            .unwrap_or(false)
    }
}
