use crate::models::Property;
use serde::Serialize;

/// Continental US centroid, used until there is anything to frame
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 39.8283,
    lng: -98.5795,
};
pub const DEFAULT_ZOOM: u8 = 4;

/// Share of the covered span added on every side of a fitted box
const PADDING_RATIO: f64 = 0.1;
/// Smallest margin in degrees, so a single listing still gets a visible box
const MIN_PADDING_DEG: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// `None` unless both values are finite and within WGS84 ranges
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// Pin shown for one listing, with the data its popup needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub position: LatLng,
    pub title: String,
    pub price: f64,
    pub price_label: String,
    pub image_url: String,
    pub detail_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box covering `points`
    pub fn covering(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox {
                    south: p.lat,
                    west: p.lng,
                    north: p.lat,
                    east: p.lng,
                },
                Some(b) => BoundingBox {
                    south: b.south.min(p.lat),
                    west: b.west.min(p.lng),
                    north: b.north.max(p.lat),
                    east: b.east.max(p.lng),
                },
            })
        })
    }

    /// Grow the box for visual margin, staying on the map
    pub fn padded(&self) -> Self {
        let lat_pad = ((self.north - self.south) * PADDING_RATIO).max(MIN_PADDING_DEG);
        let lng_pad = ((self.east - self.west) * PADDING_RATIO).max(MIN_PADDING_DEG);
        BoundingBox {
            south: (self.south - lat_pad).max(-90.0),
            west: (self.west - lng_pad).max(-180.0),
            north: (self.north + lat_pad).min(90.0),
            east: (self.east + lng_pad).min(180.0),
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }
}

/// One marker per listing with a usable position
pub fn compute_markers(listings: &[Property]) -> Vec<Marker> {
    listings
        .iter()
        .filter_map(|p| {
            let position = p.position()?;
            Some(Marker {
                id: p.id.clone(),
                position,
                title: p.title.clone(),
                price: p.price,
                price_label: p.price_label(),
                image_url: p.image_url.clone(),
                detail_path: p.detail_path(),
            })
        })
        .collect()
}

/// Padded box around every positioned listing, `None` when there are none
pub fn compute_bounds(listings: &[Property]) -> Option<BoundingBox> {
    BoundingBox::covering(listings.iter().filter_map(Property::position)).map(|b| b.padded())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// How the map is currently framed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MapFraming {
    Centered(MapView),
    Fitted(BoundingBox),
}

/// Map state derived from whichever listing subset is on screen
///
/// Markers always mirror the latest subset. Framing follows the subset's
/// bounds and keeps the previous framing when the subset has none.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    framing: MapFraming,
    markers: Vec<Marker>,
}

impl MapViewport {
    pub fn new(initial: MapView) -> Self {
        Self {
            framing: MapFraming::Centered(initial),
            markers: Vec::new(),
        }
    }

    pub fn framing(&self) -> MapFraming {
        self.framing
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Recompute from a new subset, e.g. after the category filter changes
    pub fn show(&mut self, listings: &[Property]) -> MapFraming {
        self.markers = compute_markers(listings);
        if let Some(bounds) = compute_bounds(listings) {
            self.framing = MapFraming::Fitted(bounds);
        }
        self.framing
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(MapView::default())
    }
}
