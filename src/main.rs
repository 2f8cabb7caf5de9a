use anyhow::{Context, Result};
use grandview_listings::access::{Access, AccessGuard};
use grandview_listings::config::Config;
use grandview_listings::gateways::{SupabaseAuth, SupabaseStore};
use grandview_listings::listings::{
    filter_by_category, select_featured, CategoryFilter, ListingRepository, MapFraming, MapViewport,
};
use grandview_listings::routes::Route;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Grandview Listings");
    info!("=====================");

    let config = Config::from_env()?;
    let category: CategoryFilter = std::env::args()
        .nth(1)
        .unwrap_or_default()
        .parse::<CategoryFilter>()
        .context("category must be one of all, sales, rent, land, commercial")?;

    let store = SupabaseStore::new(config.store_options()).context("Failed to create store client")?;
    let repo = ListingRepository::new(Arc::new(store.clone())).with_timeout(config.request_timeout);

    // Fetch once; every view below derives from this snapshot
    let listings = repo.fetch_all().await.context("Failed to fetch listings")?;
    info!("✅ Fetched {} listings", listings.len());

    let featured = select_featured(&listings, config.featured_limit);
    println!("\nFeatured");
    for property in &featured {
        println!("  ★ {} ({})", property.title, property.price_label());
    }

    let browse = filter_by_category(&listings, category);
    println!("\nBrowsing {}: {} properties found", category, browse.len());
    for (i, property) in browse.iter().enumerate() {
        println!("{}. {} ({})", i + 1, property.title, property.price_label());
        println!("   {} · {}, {}", property.category.label(), property.address, property.city);
        if property.shows_beds() {
            println!("   {} beds, {} baths, {}", property.beds, property.baths, property.size_label());
        } else {
            println!("   {}", property.size_label());
        }
        println!("   Details: {}", property.detail_path());
        println!("   Listing: {}", property.listing_url());
    }

    let mut viewport = MapViewport::default();
    match viewport.show(&browse) {
        MapFraming::Fitted(bounds) => println!(
            "\nMap: {} markers, fit to S{:.4} W{:.4} N{:.4} E{:.4}",
            viewport.markers().len(),
            bounds.south,
            bounds.west,
            bounds.north,
            bounds.east
        ),
        MapFraming::Centered(view) => println!(
            "\nMap: no markers, centered on {:.4}, {:.4} at zoom {}",
            view.center.lat, view.center.lng, view.zoom
        ),
    }

    if let Some((email, password)) = config.admin_credentials() {
        let auth = Arc::new(SupabaseAuth::new(config.store_options()).context("Failed to create auth client")?);
        let guard = AccessGuard::new(auth);
        match guard.login(email, password, None).await {
            Ok((session, _)) => match guard.check(&Route::AdminListings).await {
                Access::Granted(_) => {
                    info!("🔑 Signed in as {} until {}", session.user.email, session.expires_at);
                    let admin_repo = ListingRepository::new(Arc::new(store.authorized(&session)))
                        .with_timeout(config.request_timeout);
                    let managed = admin_repo.fetch_all_or_empty().await;
                    info!("Admin view: {} listings under management", managed.len());
                    guard.logout().await?;
                }
                Access::RedirectToLogin { .. } => warn!("Session was not accepted by the auth service"),
            },
            Err(e) => warn!("Admin sign-in failed: {}", e),
        }
    }

    Ok(())
}
