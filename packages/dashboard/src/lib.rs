#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory session store for the tourist safety dashboard.
//!
//! [`DashboardStore`] is the single authority over the dashboard's
//! collections (geofences, alerts, recent activity) for one operator
//! session. Every successful mutation appends exactly one entry to the
//! bounded activity log in the same call, so the log can never drift from
//! the collections it describes.
//!
//! Nothing is persisted: a store is built from seed data when the session
//! starts and dropped with it. [`SharedDashboard`] is the cloneable handle
//! that gets injected into the geofence manager and the HTTP server.

mod activity;
mod seed;
mod store;
mod view;

pub use activity::{ACTIVITY_LOG_CAPACITY, ActivityLog};
pub use store::{AlertResolution, DashboardStore};
pub use view::{DashboardSnapshot, DashboardSummary};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tourist_safety_geofence_models::{AlertId, GeofenceId};

/// Errors from dashboard store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// No geofence has the given id.
    #[error("Geofence {0} not found")]
    GeofenceNotFound(GeofenceId),

    /// No alert has the given id.
    #[error("Alert {0} not found")]
    AlertNotFound(AlertId),

    /// The supplied boundary does not describe an area.
    #[error("Invalid geofence boundary: {0}")]
    InvalidPolygon(#[from] tourist_safety_spatial::SpatialError),
}

/// Cloneable handle to the session's [`DashboardStore`].
///
/// Each store operation runs under a single lock acquisition, so a
/// mutation and its activity entry are observed together or not at all.
#[derive(Clone)]
pub struct SharedDashboard {
    inner: Arc<Mutex<DashboardStore>>,
}

impl SharedDashboard {
    #[must_use]
    pub fn new(store: DashboardStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with shared access to the store.
    pub fn read<T>(&self, f: impl FnOnce(&DashboardStore) -> T) -> T {
        f(&self.lock())
    }

    /// Runs `f` with exclusive access to the store.
    pub fn write<T>(&self, f: impl FnOnce(&mut DashboardStore) -> T) -> T {
        f(&mut self.lock())
    }

    /// Store operations never leave a half-applied mutation behind, so a
    /// poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, DashboardStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedDashboard {
    fn default() -> Self {
        Self::new(DashboardStore::seeded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourist_safety_geofence_models::{GeofenceDraft, LatLon, RiskLevel};

    #[test]
    fn clones_share_one_store() {
        let dashboard = SharedDashboard::default();
        let other = dashboard.clone();

        let before = dashboard.read(|s| s.geofences().len());
        other
            .write(|s| {
                s.add_geofence(GeofenceDraft {
                    name: "Shared".to_string(),
                    risk: RiskLevel::Low,
                    coords: vec![LatLon::new(1.0, 1.0), LatLon::new(1.0, 2.0), LatLon::new(2.0, 2.0)],
                })
            })
            .unwrap();

        assert_eq!(dashboard.read(|s| s.geofences().len()), before + 1);
        assert_eq!(
            dashboard.read(|s| s.recent_activity().next().map(|e| e.action.clone())),
            Some("Zone Created".to_string())
        );
    }
}
