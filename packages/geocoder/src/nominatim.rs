//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance allows at most **1 request per second** and
//! requires an identifying `User-Agent`. Searches are operator-triggered
//! (one per button press), so no client-side throttling is applied.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use async_trait::async_trait;
use tourist_safety_geofence_models::LatLon;

use crate::{GeocodeError, PlaceResolver, ResolvedPlace};

/// [`PlaceResolver`] backed by a Nominatim `search` endpoint.
pub struct NominatimResolver {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimResolver {
    /// Creates a resolver for the endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout_ms: u64,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Creates a resolver reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PlaceResolver for NominatimResolver {
    async fn resolve(&self, query: &str) -> Result<Option<ResolvedPlace>, GeocodeError> {
        geocode_freeform(&self.client, &self.base_url, query).await
    }
}

/// Geocodes a free-form query using Nominatim, keeping only the best match.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request fails, the server answers
/// with a non-success status, or the response cannot be parsed.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Option<ResolvedPlace>, GeocodeError> {
    log::debug!("Nominatim search: {query:?}");

    let resp = client
        .get(base_url)
        .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
        .send()
        .await?;

    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }
    if !status.is_success() {
        return Err(GeocodeError::Status {
            status: status.as_u16(),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body, query)
}

/// Parses a Nominatim JSON response.
///
/// Nominatim encodes coordinates as strings; `display_name` falls back to
/// the original query when absent.
fn parse_response(
    body: &serde_json::Value,
    query: &str,
) -> Result<Option<ResolvedPlace>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = parse_coordinate(&first["lat"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lat in Nominatim response".to_string(),
    })?;

    let lon = parse_coordinate(&first["lon"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lon in Nominatim response".to_string(),
    })?;

    let location = LatLon::new(lat, lon);
    if !location.is_valid() {
        return Err(GeocodeError::Parse {
            message: format!("Coordinate out of range in Nominatim response: {location}"),
        });
    }

    let display_name = first["display_name"]
        .as_str()
        .map_or_else(|| query.to_string(), String::from);

    Ok(Some(ResolvedPlace {
        location,
        display_name,
    }))
}

fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "27.7154",
            "lon": "85.3123",
            "display_name": "Thamel, Kathmandu, Bagmati Province, Nepal"
        }]);
        let result = parse_response(&body, "Thamel").unwrap().unwrap();
        assert!((result.location.lat - 27.7154).abs() < 1e-4);
        assert!((result.location.lon - 85.3123).abs() < 1e-4);
        assert_eq!(
            result.display_name,
            "Thamel, Kathmandu, Bagmati Province, Nepal"
        );
    }

    #[test]
    fn uses_first_candidate_only() {
        let body = serde_json::json!([
            { "lat": "28.6129", "lon": "77.2295", "display_name": "India Gate" },
            { "lat": "18.9220", "lon": "72.8347", "display_name": "Gateway of India" }
        ]);
        let result = parse_response(&body, "gate").unwrap().unwrap();
        assert_eq!(result.display_name, "India Gate");
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body, "Atlantis").unwrap().is_none());
    }

    #[test]
    fn missing_display_name_falls_back_to_query() {
        let body = serde_json::json!([{ "lat": "27.7", "lon": "85.3" }]);
        let result = parse_response(&body, "somewhere").unwrap().unwrap();
        assert_eq!(result.display_name, "somewhere");
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Bad request" });
        assert!(matches!(
            parse_response(&body, "x"),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_missing_coordinates() {
        let body = serde_json::json!([{ "lat": "27.7", "display_name": "Half" }]);
        assert!(matches!(
            parse_response(&body, "x"),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let body = serde_json::json!([{ "lat": "127.7", "lon": "85.3" }]);
        assert!(matches!(
            parse_response(&body, "x"),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
