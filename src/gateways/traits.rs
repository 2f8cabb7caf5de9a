use crate::error::{AuthError, StoreError};
use crate::gateways::types::{AuthStatus, Session};
use crate::models::{Property, PropertyDraft, PropertyPatch};
use async_trait::async_trait;

/// CRUD access to the `properties` collection
/// Any hosted or local store can back the listing core by implementing this
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Every row in the collection
    async fn select_all(&self) -> Result<Vec<Property>, StoreError>;

    /// Single row, `None` when no row has this id
    async fn select_by_id(&self, id: &str) -> Result<Option<Property>, StoreError>;

    /// Insert a row; the store assigns the id
    async fn insert(&self, draft: &PropertyDraft) -> Result<Property, StoreError>;

    /// Overwrite the supplied fields, `None` when no row has this id
    async fn update(&self, id: &str, patch: &PropertyPatch)
        -> Result<Option<Property>, StoreError>;

    /// Delete a row, returning whether one was removed
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Name of the backing store, for logs
    fn store_name(&self) -> &'static str;
}

/// Credential check and session lifecycle for operators
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Locally held session, if one has not expired
    async fn current_session(&self) -> Option<Session>;

    /// Confirm the local session with the service
    async fn verify(&self) -> AuthStatus;

    /// Local check only: a non-expired session is held
    fn is_authenticated(&self) -> bool;
}
