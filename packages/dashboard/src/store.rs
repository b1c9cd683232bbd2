use chrono::Utc;
use tourist_safety_geofence_models::{
    ActivityIcon, ActivityId, ActivityLogEntry, Alert, AlertId, Geofence, GeofenceDraft,
    GeofenceId, GeofenceUpdate,
};

use crate::{ActivityLog, DashboardError, seed};

/// Outcome of [`DashboardStore::resolve_alert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertResolution {
    /// The alert moved to resolved and an activity entry was recorded.
    Resolved(Alert),
    /// The alert was already resolved; nothing changed.
    AlreadyResolved(Alert),
}

impl AlertResolution {
    #[must_use]
    pub const fn alert(&self) -> &Alert {
        match self {
            Self::Resolved(alert) | Self::AlreadyResolved(alert) => alert,
        }
    }
}

/// Monotonic id source. Ids are never reused within a session.
#[derive(Debug, Clone)]
struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    fn after(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            next: ids.into_iter().max().unwrap_or(0) + 1,
        }
    }

    const fn take(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Owner of every dashboard collection for one session.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    active_tourists: u64,
    alerts: Vec<Alert>,
    geofences: Vec<Geofence>,
    activity: ActivityLog,
    geofence_ids: IdGenerator,
    activity_ids: IdGenerator,
}

impl DashboardStore {
    /// Creates a store holding the given collections.
    ///
    /// `activity` is ordered newest first and truncated to the log capacity.
    #[must_use]
    pub fn new(
        active_tourists: u64,
        alerts: Vec<Alert>,
        geofences: Vec<Geofence>,
        activity: Vec<ActivityLogEntry>,
    ) -> Self {
        let geofence_ids = IdGenerator::after(geofences.iter().map(|f| f.id.0));
        let activity_ids = IdGenerator::after(activity.iter().map(|e| e.id.0));

        Self {
            active_tourists,
            alerts,
            geofences,
            activity: ActivityLog::from_newest_first(activity),
            geofence_ids,
            activity_ids,
        }
    }

    /// Creates a store with no data at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(0, Vec::new(), Vec::new(), Vec::new())
    }

    /// Creates a store populated with the standard session seed data.
    #[must_use]
    pub fn seeded() -> Self {
        let now = Utc::now();
        Self::new(
            seed::ACTIVE_TOURISTS,
            seed::alerts(now),
            seed::geofences(),
            seed::activity(now),
        )
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[must_use]
    pub const fn active_tourists(&self) -> u64 {
        self.active_tourists
    }

    #[must_use]
    pub fn geofences(&self) -> &[Geofence] {
        &self.geofences
    }

    #[must_use]
    pub fn geofence(&self, id: GeofenceId) -> Option<&Geofence> {
        self.geofences.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    #[must_use]
    pub fn alert(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Recent activity, newest first.
    pub fn recent_activity(&self) -> impl ExactSizeIterator<Item = &ActivityLogEntry> {
        self.activity.iter()
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Adds a new geofence under a freshly assigned id.
    ///
    /// An open boundary is closed by repeating its first point.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidPolygon`] if the boundary has fewer
    /// than 2 distinct points. Nothing is recorded in that case.
    pub fn add_geofence(&mut self, draft: GeofenceDraft) -> Result<Geofence, DashboardError> {
        let coords = tourist_safety_spatial::close_ring(draft.coords)?;

        let fence = Geofence {
            id: GeofenceId(self.geofence_ids.take()),
            name: draft.name,
            risk: draft.risk,
            coords,
        };

        log::info!(
            "Created geofence {} {:?} ({} risk, {} points)",
            fence.id,
            fence.name,
            fence.risk,
            fence.coords.len()
        );

        self.log_activity(
            "Zone Created",
            format!(
                "New '{}' risk geofence \"{}\" was created.",
                fence.risk, fence.name
            ),
            ActivityIcon::MapPin,
        );
        self.geofences.push(fence.clone());

        Ok(fence)
    }

    /// Renames and/or re-classifies an existing geofence.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::GeofenceNotFound`] if no geofence has
    /// `id`. Nothing is recorded in that case.
    pub fn update_geofence(
        &mut self,
        id: GeofenceId,
        update: GeofenceUpdate,
    ) -> Result<Geofence, DashboardError> {
        let fence = self
            .geofences
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(DashboardError::GeofenceNotFound(id))?;

        fence.apply(update);
        let fence = fence.clone();

        log::info!("Updated geofence {} {:?} ({} risk)", fence.id, fence.name, fence.risk);

        self.log_activity(
            "Zone Updated",
            format!(
                "Geofence \"{}\" updated to '{}' risk.",
                fence.name, fence.risk
            ),
            ActivityIcon::MapPin,
        );

        Ok(fence)
    }

    /// Removes a geofence, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::GeofenceNotFound`] if no geofence has
    /// `id` (including one that was already deleted). Nothing is recorded
    /// in that case.
    pub fn delete_geofence(&mut self, id: GeofenceId) -> Result<Geofence, DashboardError> {
        let index = self
            .geofences
            .iter()
            .position(|f| f.id == id)
            .ok_or(DashboardError::GeofenceNotFound(id))?;

        let fence = self.geofences.remove(index);

        log::info!("Deleted geofence {} {:?}", fence.id, fence.name);

        self.log_activity(
            "Zone Deleted",
            format!("Geofence \"{}\" was removed.", fence.name),
            ActivityIcon::MapPin,
        );

        Ok(fence)
    }

    /// Marks an alert as resolved.
    ///
    /// Resolving an already resolved alert changes nothing and records
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::AlertNotFound`] if no alert has `id`.
    pub fn resolve_alert(&mut self, id: AlertId) -> Result<AlertResolution, DashboardError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(DashboardError::AlertNotFound(id))?;

        if !alert.resolve() {
            log::debug!("Alert {id} is already resolved");
            return Ok(AlertResolution::AlreadyResolved(alert.clone()));
        }

        let alert = alert.clone();
        log::info!("Resolved alert {} ({})", alert.id, alert.kind);

        self.log_activity(
            "Alert Resolved",
            format!("'{}' alert resolved: \"{}\"", alert.kind, alert.message),
            ActivityIcon::Shield,
        );

        Ok(AlertResolution::Resolved(alert))
    }

    fn log_activity(&mut self, action: &str, description: String, icon: ActivityIcon) {
        self.activity.push(ActivityLogEntry {
            id: ActivityId(self.activity_ids.take()),
            action: action.to_string(),
            description,
            icon,
            recorded_at: Utc::now(),
        });
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ACTIVITY_LOG_CAPACITY;
    use std::collections::BTreeSet;
    use tourist_safety_geofence_models::{AlertStatus, LatLon, RiskLevel};
    use tourist_safety_spatial::circle_polygon;

    fn draft(name: &str, risk: RiskLevel) -> GeofenceDraft {
        GeofenceDraft {
            name: name.to_string(),
            risk,
            coords: circle_polygon(LatLon::new(27.7, 85.3), 500.0),
        }
    }

    fn newest_action(store: &DashboardStore) -> Option<String> {
        store.recent_activity().next().map(|e| e.action.clone())
    }

    #[test]
    fn seeded_store_matches_session_defaults() {
        let store = DashboardStore::seeded();
        assert_eq!(store.active_tourists(), 2847);
        assert_eq!(store.alerts().len(), 2);
        assert_eq!(store.geofences().len(), 1);
        assert_eq!(store.geofences()[0].name, "Restricted Area 7");
        assert_eq!(store.recent_activity().len(), 2);
        assert_eq!(newest_action(&store).as_deref(), Some("Emergency Response"));
    }

    #[test]
    fn add_assigns_fresh_ids() {
        let mut store = DashboardStore::seeded();
        let mut seen: BTreeSet<GeofenceId> = store.geofences().iter().map(|f| f.id).collect();

        for i in 0..10 {
            let before = store.geofences().len();
            let fence = store.add_geofence(draft(&format!("Zone {i}"), RiskLevel::Low)).unwrap();
            assert_eq!(store.geofences().len(), before + 1);
            assert!(seen.insert(fence.id), "id {} reused", fence.id);
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = DashboardStore::empty();
        let first = store.add_geofence(draft("A", RiskLevel::Low)).unwrap();
        store.delete_geofence(first.id).unwrap();
        let second = store.add_geofence(draft("B", RiskLevel::Low)).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn add_logs_zone_created() {
        let mut store = DashboardStore::seeded();
        store.add_geofence(draft("Test Zone", RiskLevel::Medium)).unwrap();

        let entry = store.recent_activity().next().unwrap();
        assert_eq!(entry.action, "Zone Created");
        assert_eq!(
            entry.description,
            "New 'Medium' risk geofence \"Test Zone\" was created."
        );
        assert_eq!(entry.icon, ActivityIcon::MapPin);
    }

    #[test]
    fn add_closes_open_rings() {
        let mut store = DashboardStore::empty();
        let fence = store
            .add_geofence(GeofenceDraft {
                name: "Triangle".to_string(),
                risk: RiskLevel::Low,
                coords: vec![LatLon::new(1.0, 1.0), LatLon::new(1.0, 2.0), LatLon::new(2.0, 2.0)],
            })
            .unwrap();
        assert_eq!(fence.coords.len(), 4);
        assert_eq!(fence.coords.first(), fence.coords.last());
    }

    #[test]
    fn add_rejects_degenerate_boundary_without_logging() {
        let mut store = DashboardStore::seeded();
        let activity_before = store.recent_activity().len();

        let err = store
            .add_geofence(GeofenceDraft {
                name: "Dot".to_string(),
                risk: RiskLevel::Low,
                coords: vec![LatLon::new(1.0, 1.0)],
            })
            .unwrap_err();

        assert!(matches!(err, DashboardError::InvalidPolygon(_)));
        assert_eq!(store.geofences().len(), 1);
        assert_eq!(store.recent_activity().len(), activity_before);
    }

    #[test]
    fn update_changes_name_and_risk_only() {
        let mut store = DashboardStore::seeded();
        let original = store.geofences()[0].clone();

        let updated = store
            .update_geofence(
                original.id,
                GeofenceUpdate {
                    name: "Closed Trail".to_string(),
                    risk: RiskLevel::Medium,
                },
            )
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.coords, original.coords);
        assert_eq!(store.geofence(original.id), Some(&updated));

        let entry = store.recent_activity().next().unwrap();
        assert_eq!(entry.action, "Zone Updated");
        assert_eq!(
            entry.description,
            "Geofence \"Closed Trail\" updated to 'Medium' risk."
        );
    }

    #[test]
    fn update_missing_geofence_records_nothing() {
        let mut store = DashboardStore::seeded();
        let activity_before = store.recent_activity().len();

        let err = store
            .update_geofence(
                GeofenceId(999),
                GeofenceUpdate {
                    name: "Ghost".to_string(),
                    risk: RiskLevel::High,
                },
            )
            .unwrap_err();

        assert_eq!(err, DashboardError::GeofenceNotFound(GeofenceId(999)));
        assert_eq!(store.recent_activity().len(), activity_before);
        assert_eq!(newest_action(&store).as_deref(), Some("Emergency Response"));
    }

    #[test]
    fn delete_is_idempotent_on_the_collection() {
        let mut store = DashboardStore::seeded();
        let id = store.geofences()[0].id;

        let removed = store.delete_geofence(id).unwrap();
        assert_eq!(removed.name, "Restricted Area 7");
        assert!(store.geofence(id).is_none());
        assert_eq!(newest_action(&store).as_deref(), Some("Zone Deleted"));
        assert_eq!(
            store.recent_activity().next().unwrap().description,
            "Geofence \"Restricted Area 7\" was removed."
        );

        let activity_before = store.recent_activity().len();
        assert_eq!(
            store.delete_geofence(id),
            Err(DashboardError::GeofenceNotFound(id))
        );
        assert!(store.geofences().is_empty());
        assert_eq!(store.recent_activity().len(), activity_before);
    }

    #[test]
    fn resolve_alert_logs_type_and_message() {
        let mut store = DashboardStore::seeded();

        let resolution = store.resolve_alert(AlertId(2)).unwrap();
        assert!(matches!(resolution, AlertResolution::Resolved(_)));
        assert_eq!(resolution.alert().status, AlertStatus::Resolved);

        let entry = store.recent_activity().next().unwrap();
        assert_eq!(entry.action, "Alert Resolved");
        assert_eq!(
            entry.description,
            "'Location Drop' alert resolved: \"Signal lost from tourist ID #TID-2847\""
        );
        assert_eq!(entry.icon, ActivityIcon::Shield);
    }

    #[test]
    fn resolve_alert_is_idempotent() {
        let mut store = DashboardStore::seeded();
        store.resolve_alert(AlertId(1)).unwrap();
        let activity_before: Vec<ActivityId> = store.recent_activity().map(|e| e.id).collect();

        let again = store.resolve_alert(AlertId(1)).unwrap();
        assert!(matches!(again, AlertResolution::AlreadyResolved(_)));
        assert_eq!(store.alert(AlertId(1)).unwrap().status, AlertStatus::Resolved);

        let activity_after: Vec<ActivityId> = store.recent_activity().map(|e| e.id).collect();
        assert_eq!(activity_before, activity_after);
    }

    #[test]
    fn resolve_missing_alert_records_nothing() {
        let mut store = DashboardStore::seeded();
        let activity_before = store.recent_activity().len();
        assert_eq!(
            store.resolve_alert(AlertId(42)),
            Err(DashboardError::AlertNotFound(AlertId(42)))
        );
        assert_eq!(store.recent_activity().len(), activity_before);
    }

    #[test]
    fn activity_log_keeps_five_newest_after_six_mutations() {
        let mut store = DashboardStore::seeded();

        let a = store.add_geofence(draft("A", RiskLevel::Low)).unwrap();
        let b = store.add_geofence(draft("B", RiskLevel::High)).unwrap();
        store
            .update_geofence(
                a.id,
                GeofenceUpdate {
                    name: "A2".to_string(),
                    risk: RiskLevel::Medium,
                },
            )
            .unwrap();
        store.resolve_alert(AlertId(1)).unwrap();
        store.delete_geofence(b.id).unwrap();
        store.add_geofence(draft("C", RiskLevel::Low)).unwrap();

        assert_eq!(store.recent_activity().len(), ACTIVITY_LOG_CAPACITY);
        let actions: Vec<&str> = store.recent_activity().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Zone Created",
                "Zone Deleted",
                "Alert Resolved",
                "Zone Updated",
                "Zone Created",
            ]
        );

        let ids: Vec<u64> = store.recent_activity().map(|e| e.id.0).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]), "not newest first: {ids:?}");
    }
}
