//! Offline gazetteer resolver.
//!
//! Matches queries against a fixed list of places by case-insensitive,
//! whitespace-normalized name or alias. Used for demos and local
//! development where the public Nominatim instance is unreachable.

use async_trait::async_trait;
use serde::Deserialize;
use tourist_safety_geofence_models::LatLon;

use crate::{GeocodeError, PlaceResolver, ResolvedPlace};

/// A place known to the gazetteer.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerPlace {
    /// Canonical name, also returned as the display label.
    pub name: String,
    /// Alternative spellings.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub lat: f64,
    pub lon: f64,
}

/// [`PlaceResolver`] over an in-memory list of places.
pub struct GazetteerResolver {
    places: Vec<GazetteerPlace>,
}

impl GazetteerResolver {
    #[must_use]
    pub const fn new(places: Vec<GazetteerPlace>) -> Self {
        Self { places }
    }

    fn lookup(&self, query: &str) -> Option<&GazetteerPlace> {
        let wanted = normalize(query);
        self.places.iter().find(|place| {
            normalize(&place.name) == wanted || place.aliases.iter().any(|a| normalize(a) == wanted)
        })
    }
}

#[async_trait]
impl PlaceResolver for GazetteerResolver {
    async fn resolve(&self, query: &str) -> Result<Option<ResolvedPlace>, GeocodeError> {
        Ok(self.lookup(query).map(|place| ResolvedPlace {
            location: LatLon::new(place.lat, place.lon),
            display_name: place.name.clone(),
        }))
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
