pub mod admin;
pub mod map;
pub mod repository;
pub mod views;

pub use admin::{delete_listing, DeleteOutcome, EditSession, EditState, EditTarget, PendingDelete};
pub use map::{compute_bounds, compute_markers, BoundingBox, LatLng, MapFraming, MapView, MapViewport, Marker};
pub use repository::ListingRepository;
pub use views::{filter_by_category, select_featured, CategoryFilter, FEATURED_LIMIT};
