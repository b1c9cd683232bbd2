use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Session-unique activity log entry identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

/// Icon/category tag attached to an activity entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ActivityIcon {
    /// Emergencies and incidents.
    AlertTriangle,
    /// Identity and alert handling.
    Shield,
    /// Geofence changes.
    MapPin,
}

/// One line of the dashboard's recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: ActivityId,
    /// Short label, e.g. "Zone Created".
    pub action: String,
    pub description: String,
    pub icon: ActivityIcon,
    pub recorded_at: DateTime<Utc>,
}
