use crate::error::AuthError;
use crate::gateways::{AuthGateway, AuthStatus, Session};
use crate::routes::Route;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Route may render; admin routes carry the operator's session
    Granted(Option<Session>),
    /// Send the visitor to sign in, then back to `from`
    RedirectToLogin { from: String },
}

/// Gate in front of the admin pages
#[derive(Clone)]
pub struct AccessGuard {
    auth: Arc<dyn AuthGateway>,
}

impl AccessGuard {
    pub fn new(auth: Arc<dyn AuthGateway>) -> Self {
        Self { auth }
    }

    pub async fn check(&self, route: &Route) -> Access {
        if !route.requires_auth() {
            return Access::Granted(None);
        }

        match self.auth.verify().await {
            AuthStatus::Authenticated(session) => Access::Granted(Some(session)),
            AuthStatus::Unreachable { session, reason } => {
                // Writes will still be checked by the store itself
                warn!(user = %session.user.email, %reason, "Auth service unreachable, using local session");
                Access::Granted(Some(session))
            }
            status => {
                info!(?status, route = %route.path(), "Redirecting to login");
                Access::RedirectToLogin { from: route.path() }
            }
        }
    }

    /// Sign in and return the page to continue to
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        from: Option<&str>,
    ) -> Result<(Session, Route), AuthError> {
        let session = self.auth.sign_in(email, password).await?;
        let destination = from
            .and_then(Route::parse)
            .filter(|route| *route != Route::Login)
            .unwrap_or(Route::AdminListings);
        Ok((session, destination))
    }

    pub async fn logout(&self) -> Result<Route, AuthError> {
        self.auth.sign_out().await?;
        Ok(Route::Login)
    }
}
