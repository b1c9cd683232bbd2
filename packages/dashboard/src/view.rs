//! Derived, read-only views of the store for the dashboard screen.

use tourist_safety_geofence_models::{ActivityLogEntry, Alert, Geofence};

use crate::DashboardStore;

/// Headline figures. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub active_tourists: u64,
    /// Alerts whose status is not resolved.
    pub active_alerts: usize,
    pub monitored_zones: usize,
}

/// Owned copy of everything the dashboard screen shows, taken at one
/// instant.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub alerts: Vec<Alert>,
    /// Newest first.
    pub recent_activity: Vec<ActivityLogEntry>,
    pub geofences: Vec<Geofence>,
}

impl DashboardStore {
    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            active_tourists: self.active_tourists(),
            active_alerts: self
                .alerts()
                .iter()
                .filter(|a| !a.status.is_resolved())
                .count(),
            monitored_zones: self.geofences().len(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            summary: self.summary(),
            alerts: self.alerts().to_vec(),
            recent_activity: self.recent_activity().cloned().collect(),
            geofences: self.geofences().to_vec(),
        }
    }
}
