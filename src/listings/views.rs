use crate::models::{Category, Property, UnknownCategory};
use std::fmt;
use std::str::FromStr;

/// Number of listings promoted on the home page
pub const FEATURED_LIMIT: usize = 3;

/// Category selection on the browse page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => property.category == *category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

/// Listings in `filter`, in their original order
pub fn filter_by_category(listings: &[Property], filter: CategoryFilter) -> Vec<Property> {
    match filter {
        CategoryFilter::All => listings.to_vec(),
        CategoryFilter::Only(_) => listings
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect(),
    }
}

/// The first `limit` featured listings, in their original order
pub fn select_featured(listings: &[Property], limit: usize) -> Vec<Property> {
    listings
        .iter()
        .filter(|p| p.featured)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyDraft;

    fn listing(id: &str, category: Category, featured: bool) -> Property {
        PropertyDraft {
            title: format!("Listing {}", id),
            category,
            featured,
            ..PropertyDraft::default()
        }
        .into_property(id.to_string())
    }

    fn ids(listings: &[Property]) -> Vec<&str> {
        listings.iter().map(|p| p.id.as_str()).collect()
    }

    fn scenario() -> Vec<Property> {
        vec![
            listing("1", Category::Sales, true),
            listing("2", Category::Rent, false),
            listing("3", Category::Sales, true),
        ]
    }

    #[test]
    fn test_all_is_identity() {
        let listings = scenario();
        assert_eq!(filter_by_category(&listings, CategoryFilter::All), listings);
        assert!(filter_by_category(&[], CategoryFilter::All).is_empty());
    }

    #[test]
    fn test_filter_keeps_order() {
        let listings = scenario();
        let sales = filter_by_category(&listings, Category::Sales.into());
        assert_eq!(ids(&sales), vec!["1", "3"]);
        assert!(sales.iter().all(|p| p.category == Category::Sales));

        let land = filter_by_category(&listings, Category::Land.into());
        assert!(land.is_empty());
    }

    #[test]
    fn test_featured_selection() {
        let listings = scenario();
        assert_eq!(ids(&select_featured(&listings, FEATURED_LIMIT)), vec!["1", "3"]);
        assert_eq!(ids(&select_featured(&listings, 1)), vec!["1"]);
        assert!(select_featured(&listings, 0).is_empty());
        assert!(select_featured(&[], FEATURED_LIMIT).is_empty());
    }

    #[test]
    fn test_featured_truncates() {
        let listings: Vec<Property> = (0..6)
            .map(|i| listing(&i.to_string(), Category::Rent, i % 2 == 0 || i == 5))
            .collect();
        let featured = select_featured(&listings, FEATURED_LIMIT);
        assert_eq!(ids(&featured), vec!["0", "2", "4"]);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Rent".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Rent)
        );
        assert!("castles".parse::<CategoryFilter>().is_err());
        assert_eq!(CategoryFilter::Only(Category::Land).to_string(), "land");
    }
}
