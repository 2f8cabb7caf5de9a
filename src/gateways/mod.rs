pub mod auth;
pub mod memory;
pub mod supabase;
pub mod traits;
pub mod types;

pub use auth::SupabaseAuth;
pub use memory::{InMemoryAuth, InMemoryStore};
pub use supabase::SupabaseStore;
pub use traits::{AuthGateway, PropertyStore};
pub use types::{AuthStatus, Role, Session, StoreOptions, User};
