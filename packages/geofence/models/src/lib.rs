#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geofence, alert and activity log types for the tourist safety dashboard.
//!
//! This crate defines the shared domain vocabulary used by every other
//! package in the workspace: geographic points, risk levels, geofence
//! zones (and the restricted shapes used to create or edit them), safety
//! alerts and activity log entries.

mod activity;
mod alert;

pub use activity::{ActivityIcon, ActivityId, ActivityLogEntry};
pub use alert::{Alert, AlertId, AlertStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Risk classification of a geofence zone.
///
/// Drives map styling and, conceptually, alerting priority.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskLevel {
    /// Zones tourists must not enter.
    High,
    /// Zones requiring caution.
    Medium,
    /// Informational zones.
    #[default]
    Low,
}

impl RiskLevel {
    /// Relative alerting priority, higher is more urgent.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

/// Session-unique geofence identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GeofenceId(pub u64);

impl std::fmt::Display for GeofenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A named polygonal risk zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    /// Identifier assigned by the dashboard store.
    pub id: GeofenceId,
    /// Operator supplied display name.
    pub name: String,
    /// Risk classification.
    pub risk: RiskLevel,
    /// Closed ring of boundary points (first point repeated last).
    pub coords: Vec<LatLon>,
}

impl Geofence {
    /// Applies a name/risk edit. Boundary and id are left untouched.
    pub fn apply(&mut self, update: GeofenceUpdate) {
        self.name = update.name;
        self.risk = update.risk;
    }

    /// Tooltip label used when rendering the zone, e.g. `"Old Town - High Risk"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {} Risk", self.name, self.risk)
    }
}

/// Everything needed to create a geofence except its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceDraft {
    pub name: String,
    pub risk: RiskLevel,
    pub coords: Vec<LatLon>,
}

/// The only fields of a geofence that may change after creation.
///
/// Location and size are fixed once a zone exists, so they are not
/// representable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceUpdate {
    pub name: String,
    pub risk: RiskLevel,
}

/// Formats the elapsed time between `then` and `now` the way the dashboard
/// feed displays it ("Just now", "5 minutes ago", "1 hour ago").
///
/// Timestamps in the future are treated as "Just now".
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }

    let (value, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if elapsed.num_hours() < 24 {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };

    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn risk_level_round_trips_through_strings() {
        for risk in RiskLevel::all() {
            let parsed: RiskLevel = risk.to_string().parse().unwrap();
            assert_eq!(parsed, *risk);
        }
        assert!("Extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn risk_priority_orders_high_first() {
        assert!(RiskLevel::High.priority() > RiskLevel::Medium.priority());
        assert!(RiskLevel::Medium.priority() > RiskLevel::Low.priority());
    }

    #[test]
    fn apply_update_keeps_boundary() {
        let coords = vec![LatLon::new(1.0, 2.0), LatLon::new(1.5, 2.5), LatLon::new(1.0, 2.0)];
        let mut fence = Geofence {
            id: GeofenceId(7),
            name: "Old".to_string(),
            risk: RiskLevel::Low,
            coords: coords.clone(),
        };

        fence.apply(GeofenceUpdate {
            name: "New".to_string(),
            risk: RiskLevel::High,
        });

        assert_eq!(fence.id, GeofenceId(7));
        assert_eq!(fence.name, "New");
        assert_eq!(fence.risk, RiskLevel::High);
        assert_eq!(fence.coords, coords);
        assert_eq!(fence.label(), "New - High Risk");
    }

    #[test]
    fn lat_lon_validity() {
        assert!(LatLon::new(27.7, 85.3).is_valid());
        assert!(!LatLon::new(91.0, 0.0).is_valid());
        assert!(!LatLon::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn relative_time_labels() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "Just now");
        assert_eq!(relative_time(now + Duration::minutes(3), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(15), now), "15 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(61), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::hours(49), now), "2 days ago");
    }

    #[test]
    fn geofence_serializes_camel_case() {
        let fence = Geofence {
            id: GeofenceId(1),
            name: "Zone".to_string(),
            risk: RiskLevel::Medium,
            coords: vec![LatLon::new(1.0, 2.0)],
        };
        let json = serde_json::to_value(&fence).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["risk"], "Medium");
        assert_eq!(json["coords"][0]["lat"], 1.0);
    }
}
