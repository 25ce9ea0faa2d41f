use std::collections::HashMap;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Istanbul city center, used for neighborhoods we have no coordinates for
pub const DEFAULT_COORDINATES: (f64, f64) = (41.0082, 28.9784);

/// Built-in neighborhood coordinates, keyed by normalized name
const KNOWN_NEIGHBORHOODS: &[(&str, f64, f64)] = &[
    // Kadıköy
    ("caddebostan", 40.9717, 29.0572),
    ("bostanci", 40.9667, 29.0917),
    ("moda", 40.9833, 29.0250),
    ("fenerbahce", 40.9653, 29.0456),
    ("goztepe", 40.9789, 29.0614),
    // Üsküdar
    ("cengelkoy", 41.0508, 29.0958),
    ("kuzguncuk", 41.0278, 29.0406),
    ("beylerbeyi", 41.0419, 29.0431),
    ("kandilli", 41.0686, 29.0583),
];

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Fold a neighborhood name into its lookup key
///
/// Lowercases, maps Turkish letters to their ASCII base and drops spaces and
/// dashes, so "Çengelköy" and "cengel-koy" share a key.
pub fn normalize_neighborhood(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            'ı' => Some('i'),
            'ğ' => Some('g'),
            'ü' => Some('u'),
            'ş' => Some('s'),
            'ö' => Some('o'),
            'ç' => Some('c'),
            // Combining dot left behind by lowercasing 'İ'
            '\u{307}' | ' ' | '-' | '_' => None,
            other => Some(other),
        })
        .collect()
}

/// Neighborhood → coordinates lookup used for map views
#[derive(Debug, Clone)]
pub struct NeighborhoodGeocoder {
    coordinates: HashMap<String, (f64, f64)>,
    fallback: (f64, f64),
}

impl NeighborhoodGeocoder {
    /// Geocoder with the built-in table only
    pub fn new() -> Self {
        let coordinates = KNOWN_NEIGHBORHOODS
            .iter()
            .map(|&(name, lat, lon)| (name.to_string(), (lat, lon)))
            .collect();

        Self {
            coordinates,
            fallback: DEFAULT_COORDINATES,
        }
    }

    /// Add or override entries; names are normalized on the way in
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (S, (f64, f64))>,
        S: AsRef<str>,
    {
        for (name, coords) in extra {
            self.coordinates.insert(normalize_neighborhood(name.as_ref()), coords);
        }
        self
    }

    /// Exact lookup without the fallback
    pub fn lookup(&self, neighborhood: &str) -> Option<(f64, f64)> {
        self.coordinates
            .get(&normalize_neighborhood(neighborhood))
            .copied()
    }

    /// `(latitude, longitude)` of a neighborhood, or the city center if unknown
    pub fn coordinates_for(&self, neighborhood: &str) -> (f64, f64) {
        self.lookup(neighborhood).unwrap_or(self.fallback)
    }

    /// Distance in kilometers between two neighborhoods
    pub fn distance_between(&self, from: &str, to: &str) -> f64 {
        let (lat1, lon1) = self.coordinates_for(from);
        let (lat2, lon2) = self.coordinates_for(to);
        haversine_distance(lat1, lon1, lat2, lon2)
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

impl Default for NeighborhoodGeocoder {
    fn default() -> Self {
        Self::new()
    }
}
