//! Fixed data every new dashboard session starts with.

use chrono::{DateTime, Duration, Utc};
use tourist_safety_geofence_models::{
    ActivityIcon, ActivityId, ActivityLogEntry, Alert, AlertId, AlertStatus, Geofence, GeofenceId,
    LatLon, RiskLevel,
};

pub const ACTIVE_TOURISTS: u64 = 2847;

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: AlertId(1),
            kind: "High Risk".to_string(),
            message: "Tourist entered Restricted Area 7".to_string(),
            raised_at: now - Duration::minutes(2),
            status: AlertStatus::Active,
        },
        Alert {
            id: AlertId(2),
            kind: "Location Drop".to_string(),
            message: "Signal lost from tourist ID #TID-2847".to_string(),
            raised_at: now - Duration::minutes(15),
            status: AlertStatus::Investigating,
        },
    ]
}

pub fn geofences() -> Vec<Geofence> {
    vec![Geofence {
        id: GeofenceId(1),
        name: "Restricted Area 7".to_string(),
        risk: RiskLevel::High,
        coords: vec![
            LatLon::new(27.7, 85.3),
            LatLon::new(27.7, 85.35),
            LatLon::new(27.75, 85.35),
            LatLon::new(27.75, 85.3),
            LatLon::new(27.7, 85.3),
        ],
    }]
}

/// Newest first.
pub fn activity(now: DateTime<Utc>) -> Vec<ActivityLogEntry> {
    vec![
        ActivityLogEntry {
            id: ActivityId(1),
            action: "Emergency Response".to_string(),
            description: "Medical team dispatched to coordinates 27.7172°N, 85.3240°E".to_string(),
            icon: ActivityIcon::AlertTriangle,
            recorded_at: now - Duration::minutes(5),
        },
        ActivityLogEntry {
            id: ActivityId(2),
            action: "ID Verification".to_string(),
            description: "New tourist ID generated at Tribhuvan Airport".to_string(),
            icon: ActivityIcon::Shield,
            recorded_at: now - Duration::minutes(12),
        },
    ]
}
