use crate::listings::{CategoryFilter, EditTarget};

/// Pages the site exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Properties { category: CategoryFilter },
    PropertyDetail { id: String },
    Login,
    AdminListings,
    AdminEdit(EditTarget),
}

impl Route {
    /// Parse a path such as `/properties?category=rent`
    ///
    /// An unrecognised category falls back to showing everything.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path
            .trim_start_matches('#')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["properties"] => {
                let category = query
                    .split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(key, _)| *key == "category")
                    .and_then(|(_, value)| value.parse().ok())
                    .unwrap_or_default();
                Some(Route::Properties { category })
            }
            ["properties", id] => Some(Route::PropertyDetail { id: id.to_string() }),
            ["login"] => Some(Route::Login),
            ["admin"] | ["admin", "listings"] => Some(Route::AdminListings),
            ["admin", "edit", param] => Some(Route::AdminEdit(EditTarget::from_route_param(param))),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Properties {
                category: CategoryFilter::All,
            } => "/properties".to_string(),
            Route::Properties { category } => format!("/properties?category={}", category),
            Route::PropertyDetail { id } => format!("/properties/{}", id),
            Route::Login => "/login".to_string(),
            Route::AdminListings => "/admin/listings".to_string(),
            Route::AdminEdit(target) => format!("/admin/edit/{}", target.route_param()),
        }
    }

    /// Admin pages sit behind sign-in
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::AdminListings | Route::AdminEdit(_))
    }
}
