use crate::error::ListingError;
use crate::listings::ListingRepository;
use crate::models::{Property, PropertyDraft, PropertyPatch};
use crate::routes::Route;
use tracing::{debug, info, warn};

/// Route parameter that opens the editor on a blank listing
pub const NEW_LISTING_PARAM: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(String),
}

impl EditTarget {
    pub fn from_route_param(param: &str) -> Self {
        if param == NEW_LISTING_PARAM {
            EditTarget::New
        } else {
            EditTarget::Existing(param.to_string())
        }
    }

    pub fn route_param(&self) -> &str {
        match self {
            EditTarget::New => NEW_LISTING_PARAM,
            EditTarget::Existing(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Loading,
    Idle,
    Submitting,
    Done(Property),
}

/// One pass through the listing editor
///
/// `Loading -> Idle -> Submitting -> Idle | Done`. A failed submit always
/// lands back in `Idle` with the draft intact and an error to show.
pub struct EditSession {
    repo: ListingRepository,
    target: EditTarget,
    state: EditState,
    draft: PropertyDraft,
    loaded: bool,
    last_error: Option<String>,
}

impl EditSession {
    /// Session in `Loading` for an existing listing, `Idle` for a new one
    pub fn new(repo: ListingRepository, target: EditTarget) -> Self {
        let (state, loaded) = match target {
            EditTarget::New => (EditState::Idle, true),
            EditTarget::Existing(_) => (EditState::Loading, false),
        };
        Self {
            repo,
            target,
            state,
            draft: PropertyDraft::default(),
            loaded,
            last_error: None,
        }
    }

    /// Create the session and load the listing being edited
    pub async fn open(repo: ListingRepository, target: EditTarget) -> Self {
        let mut session = Self::new(repo, target);
        if let Err(e) = session.load().await {
            debug!(error = %e, "Editor opened without a loaded listing");
        }
        session
    }

    /// Fill the draft from the store
    ///
    /// A listing that no longer exists leaves the defaults in place and the
    /// session continues as a new listing.
    pub async fn load(&mut self) -> Result<(), ListingError> {
        let EditTarget::Existing(id) = &self.target else {
            self.state = EditState::Idle;
            return Ok(());
        };

        self.state = EditState::Loading;
        let result = self.repo.fetch_by_id(id).await;
        self.state = EditState::Idle;

        match result {
            Ok(Some(property)) => {
                debug!(id = %property.id, "Loaded listing into editor");
                self.draft = PropertyDraft::from(&property);
                self.loaded = true;
                self.last_error = None;
                Ok(())
            }
            Ok(None) => {
                warn!(id = %id, "Listing to edit not found, continuing as new");
                self.target = EditTarget::New;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to load listing into editor");
                self.last_error = Some(e.operator_message());
                Err(e)
            }
        }
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.target, EditTarget::Existing(_))
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    /// The draft, while the session accepts edits
    ///
    /// An existing listing that has not loaded yet takes no edits.
    pub fn draft_mut(&mut self) -> Option<&mut PropertyDraft> {
        match self.state {
            EditState::Idle if self.loaded => Some(&mut self.draft),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Where the operator goes once the session is done
    pub fn return_route(&self) -> Route {
        Route::AdminListings
    }

    /// Validate and save the draft
    pub async fn submit(&mut self) -> Result<Property, ListingError> {
        if let EditState::Done(property) = &self.state {
            return Ok(property.clone());
        }
        if !self.loaded {
            // The operator has not seen the stored record yet, so nothing is saved
            self.load().await?;
            let err = ListingError::Reloaded(self.target.route_param().to_string());
            self.last_error = Some(err.operator_message());
            return Err(err);
        }

        if let Err(e) = self.draft.validate() {
            self.last_error = Some(e.operator_message());
            return Err(e);
        }

        self.state = EditState::Submitting;
        let result = match &self.target {
            EditTarget::New => self.repo.create(&self.draft).await,
            EditTarget::Existing(id) => {
                let patch = PropertyPatch::from(self.draft.clone());
                self.repo.update(id, &patch).await
            }
        };

        match result {
            Ok(property) => {
                info!(id = %property.id, "Listing saved");
                self.last_error = None;
                self.state = EditState::Done(property.clone());
                Ok(property)
            }
            Err(e) => {
                warn!(error = %e, "Listing save failed");
                self.last_error = Some(e.operator_message());
                self.state = EditState::Idle;
                Err(e)
            }
        }
    }
}

/// A delete the operator has asked for but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    id: String,
}

/// A delete the operator has confirmed; only obtainable from [`PendingDelete::confirm`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: String,
}

impl PendingDelete {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &'static str {
        "Are you sure you want to permanently delete this listing?"
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

impl ConfirmedDelete {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub removed: bool,
    /// The collection as re-fetched after the delete
    pub listings: Vec<Property>,
}

/// Delete a confirmed listing and re-fetch the collection
pub async fn delete_listing(repo: &ListingRepository, confirmed: ConfirmedDelete) -> DeleteOutcome {
    let removed = repo.remove(confirmed.id()).await;
    let listings = repo.fetch_all_or_empty().await;
    DeleteOutcome { removed, listings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::{InMemoryStore, PropertyStore};
    use crate::models::Category;
    use std::sync::Arc;
    use std::time::Duration;

    fn filled_draft() -> PropertyDraft {
        PropertyDraft {
            title: "Harbor View Condo".to_string(),
            price: 640_000.0,
            description: "Two bedrooms over the water".to_string(),
            address: "88 Pier St".to_string(),
            city: "Seattle".to_string(),
            beds: 2.0,
            baths: 2.0,
            sqft: 1100.0,
            latitude: 47.6,
            longitude: -122.3,
            ..PropertyDraft::default()
        }
    }

    fn repo_with(store: Arc<InMemoryStore>) -> ListingRepository {
        ListingRepository::new(store)
    }

    #[test]
    fn test_route_param() {
        assert_eq!(EditTarget::from_route_param("new"), EditTarget::New);
        assert_eq!(
            EditTarget::from_route_param("42"),
            EditTarget::Existing("42".to_string())
        );
        assert_eq!(EditTarget::Existing("42".to_string()).route_param(), "42");
    }

    #[tokio::test]
    async fn test_create_flow() {
        let store = Arc::new(InMemoryStore::new());
        let mut session = EditSession::open(repo_with(store.clone()), EditTarget::New).await;
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(session.draft(), &PropertyDraft::default());

        *session.draft_mut().unwrap() = filled_draft();
        let saved = session.submit().await.unwrap();

        assert!(matches!(session.state(), EditState::Done(p) if p.id == saved.id));
        assert!(session.draft_mut().is_none());
        assert_eq!(session.return_route(), Route::AdminListings);
        assert_eq!(store.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_flow_loads_and_updates() {
        let store = Arc::new(InMemoryStore::new());
        let repo = repo_with(store.clone());
        let existing = repo.create(&filled_draft()).await.unwrap();

        let mut session = EditSession::new(repo.clone(), EditTarget::Existing(existing.id.clone()));
        assert_eq!(session.state(), &EditState::Loading);
        assert!(session.draft_mut().is_none());

        session.load().await.unwrap();
        assert_eq!(session.draft().title, "Harbor View Condo");

        let draft = session.draft_mut().unwrap();
        draft.category = Category::Rent;
        draft.price = 3200.0;
        session.submit().await.unwrap();

        let stored = repo.fetch_by_id(&existing.id).await.unwrap().unwrap();
        assert_eq!(stored.category, Category::Rent);
        assert_eq!(stored.price, 3200.0);
        assert_eq!(stored.city, "Seattle");
    }

    #[tokio::test]
    async fn test_missing_listing_continues_as_new() {
        let store = Arc::new(InMemoryStore::new());
        let mut session =
            EditSession::open(repo_with(store.clone()), EditTarget::Existing("gone".to_string()))
                .await;

        assert_eq!(session.target(), &EditTarget::New);
        assert_eq!(session.draft(), &PropertyDraft::default());
        assert!(session.last_error().is_none());

        *session.draft_mut().unwrap() = filled_draft();
        session.submit().await.unwrap();
        assert_eq!(store.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_session_editable() {
        let store = Arc::new(InMemoryStore::new());
        let mut session = EditSession::open(repo_with(store.clone()), EditTarget::New).await;

        let result = session.submit().await;
        assert!(matches!(result, Err(ListingError::Validation { field: "title", .. })));
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(session.last_error(), Some("title is required"));
        assert_eq!(store.select_all().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_returns_to_idle() {
        let store = Arc::new(InMemoryStore::new());
        let mut session = EditSession::open(repo_with(store.clone()), EditTarget::New).await;
        *session.draft_mut().unwrap() = filled_draft();

        store.set_unavailable(true);
        assert!(matches!(session.submit().await, Err(ListingError::Write(_))));
        assert_eq!(session.state(), &EditState::Idle);
        assert!(session.last_error().is_some());
        assert_eq!(session.draft(), &filled_draft());

        store.set_unavailable(false);
        session.submit().await.unwrap();
        assert!(session.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_submit_returns_to_idle() {
        let store = Arc::new(InMemoryStore::new().with_latency(Duration::from_secs(120)));
        let repo = ListingRepository::new(store).with_timeout(Duration::from_secs(5));
        let mut session = EditSession::open(repo, EditTarget::New).await;
        *session.draft_mut().unwrap() = filled_draft();

        assert!(matches!(
            session.submit().await,
            Err(ListingError::Timeout { operation: "create", .. })
        ));
        assert_eq!(session.state(), &EditState::Idle);
    }

    #[tokio::test]
    async fn test_load_failure_blocks_overwrite() {
        let store = Arc::new(InMemoryStore::new());
        let repo = repo_with(store.clone());
        let existing = repo.create(&filled_draft()).await.unwrap();

        store.set_unavailable(true);
        let mut session = EditSession::open(repo.clone(), EditTarget::Existing(existing.id.clone())).await;
        assert!(session.last_error().is_some());
        assert!(session.is_editing());

        assert!(matches!(session.submit().await, Err(ListingError::Read(_))));

        store.set_unavailable(false);
        let stored = repo.fetch_by_id(&existing.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Harbor View Condo");
    }

    #[tokio::test]
    async fn test_edits_after_failed_load_are_refused_until_reloaded() {
        let store = Arc::new(InMemoryStore::new());
        let repo = repo_with(store.clone());
        let existing = repo.create(&filled_draft()).await.unwrap();

        store.set_unavailable(true);
        let mut session = EditSession::open(repo.clone(), EditTarget::Existing(existing.id.clone())).await;
        assert_eq!(session.state(), &EditState::Idle);
        assert!(session.draft_mut().is_none());

        store.set_unavailable(false);
        assert!(matches!(session.submit().await, Err(ListingError::Reloaded(_))));
        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(
            session.last_error(),
            Some("The listing was reloaded. Review the form and save again.")
        );
        assert_eq!(session.draft(), &filled_draft());

        let draft = session.draft_mut().unwrap();
        draft.title = "Operator edit".to_string();
        draft.price = 999.0;
        let saved = session.submit().await.unwrap();
        assert_eq!(saved.title, "Operator edit");
        assert!(session.last_error().is_none());

        let stored = repo.fetch_by_id(&existing.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Operator edit");
        assert_eq!(stored.price, 999.0);
        assert_eq!(stored.city, "Seattle");
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let store = Arc::new(InMemoryStore::new());
        let repo = repo_with(store);
        let keep = repo.create(&filled_draft()).await.unwrap();
        let doomed = repo.create(&filled_draft()).await.unwrap();

        let pending = PendingDelete::new(doomed.id.clone());
        assert_eq!(pending.id(), doomed.id);
        let outcome = delete_listing(&repo, pending.confirm()).await;

        assert!(outcome.removed);
        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.listings[0].id, keep.id);

        let again = delete_listing(&repo, PendingDelete::new(doomed.id).confirm()).await;
        assert!(!again.removed);
        assert_eq!(again.listings.len(), 1);
    }
}
