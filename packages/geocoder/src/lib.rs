#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place-name resolution for geofence creation.
//!
//! Operators locate a new zone by typing a free-text place name ("Thamel",
//! "India Gate, New Delhi"). This crate turns that text into a single
//! best-match coordinate through the [`PlaceResolver`] trait. Providers are
//! configured via TOML files in `services/`:
//!
//! 1. **Nominatim / OpenStreetMap** (priority 1): free-form search against
//!    the public instance (or any self-hosted one).
//! 2. **Offline gazetteer** (priority 2, disabled by default): a small
//!    embedded list of landmarks for development without network access.
//!
//! A resolver distinguishes three outcomes: a match (`Ok(Some(_))`), no
//! match (`Ok(None)`) and a failed lookup (`Err(_)`). Callers surface the
//! last two differently: "not found" asks the operator to rephrase, an
//! error asks them to retry.

pub mod gazetteer;
pub mod nominatim;
pub mod service_registry;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tourist_safety_geofence_models::LatLon;

/// The single best match for a place-name query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    /// Coordinate of the match (WGS84).
    pub location: LatLon,
    /// Human-readable label returned by the provider.
    pub display_name: String,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Geocoder returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// No usable provider configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Resolves a free-text place name to at most one coordinate.
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Looks up `query`.
    ///
    /// Returns `Ok(None)` when the provider has no candidate for the query.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup itself fails (transport,
    /// status or payload problems).
    async fn resolve(&self, query: &str) -> Result<Option<ResolvedPlace>, GeocodeError>;
}

/// Builds the resolver for the first enabled service, applying environment
/// overrides.
///
/// `GEOCODER_PROVIDER` selects a service by id regardless of its `enabled`
/// flag (e.g. `GEOCODER_PROVIDER=gazetteer` for offline use).
/// `GEOCODER_BASE_URL` and `GEOCODER_USER_AGENT` override the Nominatim
/// endpoint and client identification.
///
/// # Errors
///
/// See [`resolver_for_service`].
pub fn resolver_from_env() -> Result<Arc<dyn PlaceResolver>, GeocodeError> {
    let requested = std::env::var("GEOCODER_PROVIDER").ok();
    resolver_for_service(requested.as_deref())
}

/// Builds the resolver for the service with id `service_id`, or for the
/// highest priority enabled service when `None`.
///
/// Nominatim settings still honor `GEOCODER_BASE_URL` and
/// `GEOCODER_USER_AGENT`.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if the requested service does not
/// exist or no service is enabled, and [`GeocodeError::Http`] if the HTTP
/// client cannot be built.
pub fn resolver_for_service(
    service_id: Option<&str>,
) -> Result<Arc<dyn PlaceResolver>, GeocodeError> {
    let service = match service_id {
        Some(id) => service_registry::all_services()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| GeocodeError::Config {
                message: format!("Unknown geocoding service '{id}'"),
            })?,
        None => service_registry::enabled_services()
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::Config {
                message: "No geocoding service is enabled".to_string(),
            })?,
    };

    log::info!("Using geocoding service '{}' ({})", service.id, service.name);

    match service.provider {
        service_registry::ProviderConfig::Nominatim {
            base_url,
            user_agent,
            timeout_ms,
        } => {
            let base_url = std::env::var("GEOCODER_BASE_URL").unwrap_or(base_url);
            let user_agent = std::env::var("GEOCODER_USER_AGENT").unwrap_or(user_agent);
            let resolver = nominatim::NominatimResolver::new(base_url, &user_agent, timeout_ms)?;
            Ok(Arc::new(resolver))
        }
        service_registry::ProviderConfig::Gazetteer { places } => {
            Ok(Arc::new(gazetteer::GazetteerResolver::new(places)))
        }
    }
}
