//! Listing data core for the Grandview real-estate site.
//!
//! Listings live in a hosted store behind [`gateways::PropertyStore`]; the
//! [`listings`] module fetches them, narrows them for the browse and home
//! pages, projects them onto the map and drives the admin editor.

pub mod access;
pub mod config;
pub mod error;
pub mod gateways;
pub mod listings;
pub mod models;
pub mod routes;

pub use error::{AuthError, ListingError, StoreError};
pub use models::{Category, Property, PropertyDraft, PropertyPatch};
