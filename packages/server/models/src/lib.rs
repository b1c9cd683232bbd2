#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the tourist safety server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types so the API contract can evolve independently,
//! and they carry display-ready extras (relative time labels, zone
//! labels) the front end would otherwise have to compute.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourist_safety_geofence_models::{
    ActivityIcon, ActivityLogEntry, Alert, AlertStatus, Geofence, GeofenceId, LatLon, RiskLevel,
    relative_time,
};

/// Response body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable category, e.g. `"notFound"` or `"apiError"`.
    pub kind: String,
}

/// Headline figures of the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub active_tourists: u64,
    pub active_alerts: usize,
    pub monitored_zones: usize,
}

/// A safety alert as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlert {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub status: AlertStatus,
    /// When the alert was raised (ISO 8601).
    pub raised_at: DateTime<Utc>,
    /// Relative label, e.g. `"2 minutes ago"`.
    pub time: String,
}

impl ApiAlert {
    #[must_use]
    pub fn new(alert: &Alert, now: DateTime<Utc>) -> Self {
        Self {
            id: alert.id.0,
            kind: alert.kind.clone(),
            message: alert.message.clone(),
            status: alert.status,
            raised_at: alert.raised_at,
            time: relative_time(alert.raised_at, now),
        }
    }
}

/// An activity feed entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActivity {
    pub id: u64,
    pub action: String,
    pub description: String,
    pub icon: ActivityIcon,
    pub recorded_at: DateTime<Utc>,
    /// Relative label, e.g. `"Just now"`.
    pub time: String,
}

impl ApiActivity {
    #[must_use]
    pub fn new(entry: &ActivityLogEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: entry.id.0,
            action: entry.action.clone(),
            description: entry.description.clone(),
            icon: entry.icon,
            recorded_at: entry.recorded_at,
            time: relative_time(entry.recorded_at, now),
        }
    }
}

/// A geofence zone as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGeofence {
    pub id: GeofenceId,
    pub name: String,
    pub risk: RiskLevel,
    /// Tooltip label, e.g. `"Restricted Area 7 - High Risk"`.
    pub label: String,
    /// Closed ring of boundary points.
    pub coords: Vec<LatLon>,
}

impl From<&Geofence> for ApiGeofence {
    fn from(fence: &Geofence) -> Self {
        Self {
            id: fence.id,
            name: fence.name.clone(),
            risk: fence.risk,
            label: fence.label(),
            coords: fence.coords.clone(),
        }
    }
}

/// Response body of `GET /api/dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    pub summary: ApiSummary,
    pub alerts: Vec<ApiAlert>,
    /// Newest first.
    pub recent_activity: Vec<ApiActivity>,
    pub geofences: Vec<ApiGeofence>,
}

/// Response body of `POST /api/alerts/{id}/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlertResolution {
    pub alert: ApiAlert,
    /// `true` if the alert was already resolved and nothing changed.
    pub already_resolved: bool,
}

/// Query parameters for `GET /api/geofences/containing`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContainingQueryParams {
    pub lat: f64,
    pub lon: f64,
}

/// A zone containing the queried point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiZoneHit {
    pub id: GeofenceId,
    pub name: String,
    pub risk: RiskLevel,
}

/// Request body of `POST /api/dialogs`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum OpenDialogRequest {
    Add,
    Edit {
        #[serde(rename = "geofenceId")]
        geofence_id: GeofenceId,
    },
}

/// Request body of `PATCH /api/dialogs/{id}`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDialogRequest {
    pub name: Option<String>,
    pub risk: Option<RiskLevel>,
    pub diameter_meters: Option<f64>,
}

/// Place cached by a dialog's last successful search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResolvedPlace {
    pub location: LatLon,
    pub display_name: String,
}

/// Phase of an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiDialogPhase {
    AddOpen,
    AddReady,
    EditOpen,
}

/// An open add/edit dialog as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDialog {
    pub id: String,
    pub phase: ApiDialogPhase,
    /// Zone being edited. `None` for add dialogs.
    pub geofence_id: Option<GeofenceId>,
    pub name: String,
    pub risk: RiskLevel,
    /// Diameter of the zone being added. Omitted for edit dialogs, whose
    /// boundary is fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_meters: Option<f64>,
    pub searching: bool,
    pub found: Option<ApiResolvedPlace>,
    pub can_search: bool,
    pub can_save: bool,
}
