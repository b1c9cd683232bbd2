#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geofence manager workflow.
//!
//! [`GeofenceManager`] drives the add/edit dialogs an operator uses to
//! maintain geofence zones: it runs place searches through a
//! [`PlaceResolver`], turns a resolved place plus a diameter into a
//! circular boundary, and commits the result to the shared
//! [`SharedDashboard`]. It also produces the [`MapLayers`] shown next to
//! the zone list.
//!
//! Several dialogs may be open at once, each addressed by a [`DialogId`].
//! At most [`MAX_OPEN_DIALOGS`] are kept; opening another evicts the one
//! used least recently. Searches run without holding any lock, so a dialog
//! can be cancelled while its search is still in flight; the late answer is
//! then dropped.

pub mod dialog;
pub mod map;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tourist_safety_dashboard::{DashboardError, SharedDashboard};
use tourist_safety_geocoder::{GeocodeError, PlaceResolver, ResolvedPlace};
use tourist_safety_geofence_models::{Geofence, GeofenceId, RiskLevel};
use uuid::Uuid;

pub use dialog::{DialogMode, DialogPhase, GeofenceDialog, SaveAction, SearchTicket};
pub use map::{MapLayers, ZoneLayer, ZoneStyle, map_layers};

/// Errors from geofence manager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// A form value was rejected.
    #[error("{0}")]
    Validation(String),

    /// The place search found nothing.
    #[error("Could not find location: \"{query}\". Please try a different name.")]
    ResolutionEmpty {
        /// The query as sent to the resolver.
        query: String,
    },

    /// The place search itself failed.
    #[error("Failed to search for location: {0}")]
    ResolutionFailure(#[from] GeocodeError),

    /// The dialog already has a search running.
    #[error("A search is already in progress")]
    SearchInFlight,

    /// Save is disabled in the dialog's current state.
    #[error("Search for a location before saving")]
    SaveBlocked,

    /// No open dialog has the given id.
    #[error("Dialog {0} not found")]
    DialogNotFound(DialogId),

    /// A search answer arrived for a dialog that closed or started another
    /// search in the meantime.
    #[error("Search result is no longer wanted")]
    StaleSearch,

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

/// Identifier of an open add/edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialogId(Uuid);

impl DialogId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DialogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Open dialogs kept before the least recently used one is evicted.
pub const MAX_OPEN_DIALOGS: usize = 64;

/// Partial form edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub risk: Option<RiskLevel>,
    pub diameter_meters: Option<f64>,
}

struct DialogSlot {
    dialog: GeofenceDialog,
    last_used: u64,
}

/// Open dialogs with a use counter for least-recently-used eviction.
#[derive(Default)]
struct DialogTable {
    slots: BTreeMap<DialogId, DialogSlot>,
    clock: u64,
}

impl DialogTable {
    const fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn insert(&mut self, id: DialogId, dialog: GeofenceDialog) {
        let last_used = self.tick();
        self.slots.insert(id, DialogSlot { dialog, last_used });

        while self.slots.len() > MAX_OPEN_DIALOGS {
            let Some(oldest) = self
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            self.slots.remove(&oldest);
            log::debug!("Evicted idle dialog {oldest}");
        }
    }

    fn get(&self, id: &DialogId) -> Option<&GeofenceDialog> {
        self.slots.get(id).map(|slot| &slot.dialog)
    }

    fn get_mut(&mut self, id: &DialogId) -> Option<&mut GeofenceDialog> {
        let now = self.tick();
        self.slots.get_mut(id).map(|slot| {
            slot.last_used = now;
            &mut slot.dialog
        })
    }

    fn remove(&mut self, id: &DialogId) -> Option<GeofenceDialog> {
        self.slots.remove(id).map(|slot| slot.dialog)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Resets the dialog's in-flight flag if the search future is dropped
/// before the resolver answers.
struct PendingSearch<'a> {
    manager: &'a GeofenceManager,
    id: DialogId,
    ticket: &'a SearchTicket,
    armed: bool,
}

impl PendingSearch<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut dialogs = self.manager.dialogs();
        if let Some(dialog) = dialogs.get_mut(&self.id)
            && dialog.abort_search(self.ticket)
        {
            log::debug!("Dialog {}: search abandoned before it finished", self.id);
        }
    }
}

/// Owns the open dialogs and mediates between them, the place resolver
/// and the dashboard store.
pub struct GeofenceManager {
    dashboard: SharedDashboard,
    resolver: Arc<dyn PlaceResolver>,
    dialogs: Mutex<DialogTable>,
}

impl GeofenceManager {
    #[must_use]
    pub fn new(dashboard: SharedDashboard, resolver: Arc<dyn PlaceResolver>) -> Self {
        Self {
            dashboard,
            resolver,
            dialogs: Mutex::new(DialogTable::default()),
        }
    }

    #[must_use]
    pub const fn dashboard(&self) -> &SharedDashboard {
        &self.dashboard
    }

    fn dialogs(&self) -> MutexGuard<'_, DialogTable> {
        self.dialogs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of dialogs currently open.
    #[must_use]
    pub fn open_dialogs(&self) -> usize {
        self.dialogs().len()
    }

    fn with_dialog<T>(
        &self,
        id: DialogId,
        f: impl FnOnce(&mut GeofenceDialog) -> Result<T, ManagerError>,
    ) -> Result<T, ManagerError> {
        let mut dialogs = self.dialogs();
        let dialog = dialogs
            .get_mut(&id)
            .ok_or(ManagerError::DialogNotFound(id))?;
        f(dialog)
    }

    /// Opens an empty add dialog.
    pub fn open_add(&self) -> (DialogId, GeofenceDialog) {
        let id = DialogId::new();
        let dialog = GeofenceDialog::open_add();
        self.dialogs().insert(id, dialog.clone());
        log::debug!("Opened add dialog {id}");
        (id, dialog)
    }

    /// Opens an edit dialog for the zone `geofence_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::GeofenceNotFound`] if no such zone exists.
    pub fn open_edit(
        &self,
        geofence_id: GeofenceId,
    ) -> Result<(DialogId, GeofenceDialog), ManagerError> {
        let dialog = self
            .dashboard
            .read(|store| store.geofence(geofence_id).map(GeofenceDialog::open_edit))
            .ok_or(DashboardError::GeofenceNotFound(geofence_id))?;

        let id = DialogId::new();
        self.dialogs().insert(id, dialog.clone());
        log::debug!("Opened edit dialog {id} for geofence {geofence_id}");
        Ok((id, dialog))
    }

    /// Current state of an open dialog.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::DialogNotFound`] if the dialog is not open.
    pub fn dialog(&self, id: DialogId) -> Result<GeofenceDialog, ManagerError> {
        self.with_dialog(id, |dialog| Ok(dialog.clone()))
    }

    /// Applies form edits. Either every field is applied or none is.
    ///
    /// # Errors
    ///
    /// * [`ManagerError::DialogNotFound`] if the dialog is not open.
    /// * [`ManagerError::Validation`] if a value is rejected.
    pub fn update_form(
        &self,
        id: DialogId,
        update: FormUpdate,
    ) -> Result<GeofenceDialog, ManagerError> {
        self.with_dialog(id, |dialog| {
            let mut next = dialog.clone();
            if let Some(diameter) = update.diameter_meters {
                next.set_diameter(diameter)?;
            }
            if let Some(name) = update.name {
                next.set_name(name);
            }
            if let Some(risk) = update.risk {
                next.set_risk(risk);
            }
            *dialog = next.clone();
            Ok(next)
        })
    }

    /// Resolves the dialog's current name to a location.
    ///
    /// The dialog lock is released while the resolver runs. If the dialog
    /// was closed in the meantime the answer is discarded. Dropping the
    /// returned future before it completes ends the search, so the dialog
    /// can search again.
    ///
    /// # Errors
    ///
    /// * [`ManagerError::DialogNotFound`] if the dialog is not open.
    /// * [`ManagerError::Validation`] or [`ManagerError::SearchInFlight`]
    ///   if a search cannot start.
    /// * [`ManagerError::ResolutionEmpty`] or
    ///   [`ManagerError::ResolutionFailure`] if nothing usable came back.
    /// * [`ManagerError::StaleSearch`] if the dialog closed during the
    ///   search.
    pub async fn search(&self, id: DialogId) -> Result<ResolvedPlace, ManagerError> {
        let ticket = self.with_dialog(id, GeofenceDialog::begin_search)?;
        log::debug!("Dialog {id}: searching for \"{}\"", ticket.query);

        let pending = PendingSearch {
            manager: self,
            id,
            ticket: &ticket,
            armed: true,
        };
        let outcome = self.resolver.resolve(&ticket.query).await;
        pending.disarm();
        if let Err(e) = &outcome {
            log::warn!("Dialog {id}: place search failed: {e}");
        }

        let mut dialogs = self.dialogs();
        let Some(dialog) = dialogs.get_mut(&id) else {
            log::debug!("Dialog {id} closed before its search finished");
            return Err(ManagerError::StaleSearch);
        };
        dialog.finish_search(&ticket, outcome)
    }

    /// Commits the dialog to the store and closes it.
    ///
    /// On error the dialog stays open with its values intact.
    ///
    /// # Errors
    ///
    /// * [`ManagerError::DialogNotFound`] if the dialog is not open.
    /// * [`ManagerError::SaveBlocked`] or [`ManagerError::Validation`] if
    ///   the dialog cannot be saved yet.
    /// * [`ManagerError::Dashboard`] if the store rejects the change.
    pub fn save(&self, id: DialogId) -> Result<Geofence, ManagerError> {
        let mut dialogs = self.dialogs();
        let action = dialogs
            .get(&id)
            .ok_or(ManagerError::DialogNotFound(id))?
            .plan_save()?;

        let saved = self.dashboard.write(|store| match action {
            SaveAction::Create(draft) => store.add_geofence(draft),
            SaveAction::Update(geofence_id, update) => store.update_geofence(geofence_id, update),
        })?;

        dialogs.remove(&id);
        log::info!("Saved geofence {} \"{}\" ({} risk)", saved.id, saved.name, saved.risk);
        Ok(saved)
    }

    /// Closes the dialog without touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::DialogNotFound`] if the dialog is not open.
    pub fn cancel(&self, id: DialogId) -> Result<(), ManagerError> {
        self.dialogs()
            .remove(&id)
            .map(|_| log::debug!("Cancelled dialog {id}"))
            .ok_or(ManagerError::DialogNotFound(id))
    }

    /// Deletes a zone directly from the zone list.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::GeofenceNotFound`] if no such zone exists.
    pub fn delete_geofence(&self, id: GeofenceId) -> Result<Geofence, ManagerError> {
        let removed = self.dashboard.write(|store| store.delete_geofence(id))?;
        log::info!("Deleted geofence {id} \"{}\"", removed.name);
        Ok(removed)
    }

    /// Map layers for every stored zone, plus the pending marker of
    /// `dialog` if it has an unsaved search result.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::DialogNotFound`] if `dialog` is given but
    /// not open.
    pub fn map_layers(&self, dialog: Option<DialogId>) -> Result<MapLayers, ManagerError> {
        let marker = match dialog {
            Some(id) => self.with_dialog(id, |d| Ok(d.pending_marker()))?,
            None => None,
        };
        Ok(self
            .dashboard
            .read(|store| map_layers(store.geofences(), marker)))
    }
}
