use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ListingError;

/// Image used by the editor when a new listing has none yet
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/800/600";

const LISTING_SEARCH_BASE: &str = "https://www.zillow.com/homes/";

/// Top-level listing classification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Sales,
    Rent,
    Land,
    Commercial,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sales,
        Category::Rent,
        Category::Land,
        Category::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sales => "sales",
            Category::Rent => "rent",
            Category::Land => "land",
            Category::Commercial => "commercial",
        }
    }

    /// Badge text shown on cards and detail pages
    pub fn label(&self) -> &'static str {
        match self {
            Category::Sales => "For Sale",
            Category::Rent => "For Rent",
            Category::Land => "Land / Lots",
            Category::Commercial => "Commercial",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(Category::Sales),
            "rent" => Ok(Category::Rent),
            "land" => Ok(Category::Land),
            "commercial" => Ok(Category::Commercial),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A single real-estate listing as stored in the `properties` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub beds: f64,
    #[serde(default)]
    pub baths: f64,
    /// Lot size when the category is land
    #[serde(default)]
    pub sqft: f64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_listing_url: Option<String>,
}

impl Property {
    /// Map position, if both coordinates are present, finite and in range
    pub fn position(&self) -> Option<crate::listings::LatLng> {
        crate::listings::LatLng::new(self.latitude?, self.longitude?)
    }

    /// Bedrooms mean nothing for land or commercial listings
    pub fn shows_beds(&self) -> bool {
        !matches!(self.category, Category::Land | Category::Commercial)
    }

    pub fn shows_baths(&self) -> bool {
        self.category != Category::Land
    }

    /// "$1,250,000", or "$2,400/mo" for rentals
    pub fn price_label(&self) -> String {
        let amount = format!("${}", group_thousands(self.price));
        if self.category == Category::Rent {
            format!("{}/mo", amount)
        } else {
            amount
        }
    }

    pub fn size_label(&self) -> String {
        let sqft = group_thousands(self.sqft);
        if self.category == Category::Land {
            format!("{} sqft Lot", sqft)
        } else {
            format!("{} sqft", sqft)
        }
    }

    pub fn detail_path(&self) -> String {
        format!("/properties/{}", self.id)
    }

    /// External listing page, falling back to a search on address and city
    pub fn listing_url(&self) -> String {
        match self.external_listing_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                let query = format!("{}, {}", self.address.trim(), self.city.trim());
                format!("{}{}_rb/", LISTING_SEARCH_BASE, urlencoding::encode(&query))
            }
        }
    }
}

/// Listing contents without an id, as filled in by the editor
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub address: String,
    pub city: String,
    pub beds: f64,
    pub baths: f64,
    pub sqft: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: String,
    pub category: Category,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_listing_url: Option<String>,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            price: 0.0,
            description: String::new(),
            address: String::new(),
            city: String::new(),
            beds: 1.0,
            baths: 1.0,
            sqft: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            category: Category::Sales,
            featured: false,
            external_listing_url: None,
        }
    }
}

impl PropertyDraft {
    /// Presence and range checks run before a draft is submitted
    pub fn validate(&self) -> Result<(), ListingError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("address", &self.address),
            ("city", &self.city),
            ("imageUrl", &self.image_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ListingError::Validation {
                    field,
                    reason: "is required",
                });
            }
        }

        let amounts = [
            ("price", self.price),
            ("beds", self.beds),
            ("baths", self.baths),
            ("sqft", self.sqft),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ListingError::Validation {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }

        for (field, value) in [("latitude", self.latitude), ("longitude", self.longitude)] {
            if !value.is_finite() {
                return Err(ListingError::Validation {
                    field,
                    reason: "must be a finite coordinate",
                });
            }
        }

        Ok(())
    }

    pub fn into_property(self, id: String) -> Property {
        Property {
            id,
            title: self.title,
            price: self.price,
            description: self.description,
            address: self.address,
            city: self.city,
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
            image_url: self.image_url,
            category: self.category,
            featured: self.featured,
            external_listing_url: self.external_listing_url,
        }
    }
}

impl From<&Property> for PropertyDraft {
    fn from(property: &Property) -> Self {
        Self {
            title: property.title.clone(),
            price: property.price,
            description: property.description.clone(),
            address: property.address.clone(),
            city: property.city.clone(),
            beds: property.beds,
            baths: property.baths,
            sqft: property.sqft,
            latitude: property.latitude.unwrap_or_default(),
            longitude: property.longitude.unwrap_or_default(),
            image_url: property.image_url.clone(),
            category: property.category,
            featured: property.featured,
            external_listing_url: property.external_listing_url.clone(),
        }
    }
}

/// Fields to overwrite on an existing listing; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// `Some(None)` clears the column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_listing_url: Option<Option<String>>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }

    /// Merge the supplied fields into `property`
    pub fn apply(&self, property: &mut Property) {
        if let Some(title) = &self.title {
            property.title = title.clone();
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(description) = &self.description {
            property.description = description.clone();
        }
        if let Some(address) = &self.address {
            property.address = address.clone();
        }
        if let Some(city) = &self.city {
            property.city = city.clone();
        }
        if let Some(beds) = self.beds {
            property.beds = beds;
        }
        if let Some(baths) = self.baths {
            property.baths = baths;
        }
        if let Some(sqft) = self.sqft {
            property.sqft = sqft;
        }
        if let Some(latitude) = self.latitude {
            property.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            property.longitude = Some(longitude);
        }
        if let Some(image_url) = &self.image_url {
            property.image_url = image_url.clone();
        }
        if let Some(category) = self.category {
            property.category = category;
        }
        if let Some(featured) = self.featured {
            property.featured = featured;
        }
        if let Some(external) = &self.external_listing_url {
            property.external_listing_url = external.clone();
        }
    }
}

impl From<PropertyDraft> for PropertyPatch {
    fn from(draft: PropertyDraft) -> Self {
        Self {
            title: Some(draft.title),
            price: Some(draft.price),
            description: Some(draft.description),
            address: Some(draft.address),
            city: Some(draft.city),
            beds: Some(draft.beds),
            baths: Some(draft.baths),
            sqft: Some(draft.sqft),
            latitude: Some(draft.latitude),
            longitude: Some(draft.longitude),
            image_url: Some(draft.image_url),
            category: Some(draft.category),
            featured: Some(draft.featured),
            external_listing_url: Some(draft.external_listing_url),
        }
    }
}

/// Ids come back as strings or integers depending on the table definition
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) => value.parse::<Category>().unwrap_or_else(|_| {
            warn!(category = %value, "Unknown listing category, treating as sales");
            Category::Sales
        }),
        None => Category::Sales,
    })
}

fn group_thousands(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
