//! Add/edit dialog state machine.
//!
//! A dialog exists only while it is open; closing (save or cancel) drops
//! it. While open it is in one of three phases:
//!
//! ```text
//!             search ok
//!   AddOpen ─────────────▶ AddReady ──save──▶ (closed, zone created)
//!      ▲  ◀───────────────── │
//!      └─ search empty/error ┘
//!
//!   EditOpen ──save──▶ (closed, zone updated)
//! ```
//!
//! Cancel closes from any phase without touching the store.

use tourist_safety_geocoder::{GeocodeError, ResolvedPlace};
use tourist_safety_geofence_models::{
    Geofence, GeofenceDraft, GeofenceId, GeofenceUpdate, LatLon, RiskLevel,
};
use tourist_safety_spatial::circle_polygon;

use crate::ManagerError;

/// Diameter a new zone starts with.
pub const DEFAULT_DIAMETER_METERS: f64 = 1000.0;

/// Whether the dialog creates a new zone or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit(GeofenceId),
}

/// Phase of an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Adding; no usable search result yet.
    AddOpen,
    /// Adding; a search result is cached and can be saved.
    AddReady,
    /// Editing name and risk of an existing zone.
    EditOpen,
}

/// Store mutation produced by a successful save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Create(GeofenceDraft),
    Update(GeofenceId, GeofenceUpdate),
}

/// Handed out when a search starts and presented again when it finishes,
/// so a late answer can be matched against the search that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

/// Form values and search state of one open dialog.
#[derive(Debug, Clone)]
pub struct GeofenceDialog {
    mode: DialogMode,
    name: String,
    diameter_meters: f64,
    risk: RiskLevel,
    found: Option<ResolvedPlace>,
    searching: bool,
    generation: u64,
}

impl GeofenceDialog {
    /// Opens an empty add dialog with default diameter and risk.
    #[must_use]
    pub const fn open_add() -> Self {
        Self {
            mode: DialogMode::Add,
            name: String::new(),
            diameter_meters: DEFAULT_DIAMETER_METERS,
            risk: RiskLevel::Low,
            found: None,
            searching: false,
            generation: 0,
        }
    }

    /// Opens an edit dialog pre-filled from `fence`.
    ///
    /// Location and diameter cannot be edited, so no search state is kept.
    #[must_use]
    pub fn open_edit(fence: &Geofence) -> Self {
        Self {
            mode: DialogMode::Edit(fence.id),
            name: fence.name.clone(),
            diameter_meters: DEFAULT_DIAMETER_METERS,
            risk: fence.risk,
            found: None,
            searching: false,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> DialogMode {
        self.mode
    }

    #[must_use]
    pub const fn phase(&self) -> DialogPhase {
        match (self.mode, &self.found) {
            (DialogMode::Edit(_), _) => DialogPhase::EditOpen,
            (DialogMode::Add, Some(_)) => DialogPhase::AddReady,
            (DialogMode::Add, None) => DialogPhase::AddOpen,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diameter in meters of the zone being added. `None` in edit mode,
    /// where the stored ring is kept as is.
    #[must_use]
    pub const fn diameter_meters(&self) -> Option<f64> {
        match self.mode {
            DialogMode::Add => Some(self.diameter_meters),
            DialogMode::Edit(_) => None,
        }
    }

    #[must_use]
    pub const fn risk(&self) -> RiskLevel {
        self.risk
    }

    /// Cached result of the last successful search.
    #[must_use]
    pub const fn found(&self) -> Option<&ResolvedPlace> {
        self.found.as_ref()
    }

    /// Location to mark on the map while the zone is not yet saved.
    #[must_use]
    pub fn pending_marker(&self) -> Option<LatLon> {
        self.found.as_ref().map(|p| p.location)
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Whether the search action is enabled.
    #[must_use]
    pub const fn can_search(&self) -> bool {
        matches!(self.mode, DialogMode::Add) && !self.searching
    }

    /// Whether the save action is enabled.
    #[must_use]
    pub const fn can_save(&self) -> bool {
        match self.mode {
            DialogMode::Edit(_) => true,
            DialogMode::Add => !self.searching && self.found.is_some(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub const fn set_risk(&mut self, risk: RiskLevel) {
        self.risk = risk;
    }

    /// # Errors
    ///
    /// Returns [`ManagerError::Validation`] in edit mode, or if the value is
    /// not a finite positive number.
    pub fn set_diameter(&mut self, diameter_meters: f64) -> Result<(), ManagerError> {
        if matches!(self.mode, DialogMode::Edit(_)) {
            return Err(ManagerError::Validation(
                "Diameter cannot be changed after a zone is created.".to_string(),
            ));
        }
        if !diameter_meters.is_finite() || diameter_meters <= 0.0 {
            return Err(ManagerError::Validation(
                "Diameter must be a positive number of meters.".to_string(),
            ));
        }
        self.diameter_meters = diameter_meters;
        Ok(())
    }

    /// Marks a search for the current name as in flight.
    ///
    /// # Errors
    ///
    /// * [`ManagerError::Validation`] in edit mode or when the name is blank.
    /// * [`ManagerError::SearchInFlight`] if a search is already running.
    pub fn begin_search(&mut self) -> Result<SearchTicket, ManagerError> {
        if matches!(self.mode, DialogMode::Edit(_)) {
            return Err(ManagerError::Validation(
                "Location cannot be changed after a zone is created.".to_string(),
            ));
        }
        if self.searching {
            return Err(ManagerError::SearchInFlight);
        }

        let query = self.name.trim();
        if query.is_empty() {
            return Err(ManagerError::Validation(
                "Please enter a place name to search.".to_string(),
            ));
        }

        self.searching = true;
        self.generation += 1;

        Ok(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Applies the resolver's answer for `ticket`.
    ///
    /// A match is cached (moving to [`DialogPhase::AddReady`]); no match or
    /// a failure clears the cache (back to [`DialogPhase::AddOpen`]).
    ///
    /// # Errors
    ///
    /// * [`ManagerError::StaleSearch`] if `ticket` is not the search in
    ///   flight. The dialog is left untouched.
    /// * [`ManagerError::ResolutionEmpty`] if nothing matched.
    /// * [`ManagerError::ResolutionFailure`] if the lookup failed.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Option<ResolvedPlace>, GeocodeError>,
    ) -> Result<ResolvedPlace, ManagerError> {
        if !self.searching || ticket.generation != self.generation {
            return Err(ManagerError::StaleSearch);
        }
        self.searching = false;

        match outcome {
            Ok(Some(place)) => {
                self.found = Some(place.clone());
                Ok(place)
            }
            Ok(None) => {
                self.found = None;
                Err(ManagerError::ResolutionEmpty {
                    query: ticket.query.clone(),
                })
            }
            Err(e) => {
                self.found = None;
                Err(ManagerError::ResolutionFailure(e))
            }
        }
    }

    /// Drops the in-flight search for `ticket` without an answer, leaving
    /// any cached result in place. Returns `false` if `ticket` is no longer
    /// the search in flight.
    pub fn abort_search(&mut self, ticket: &SearchTicket) -> bool {
        if !self.searching || ticket.generation != self.generation {
            return false;
        }
        self.searching = false;
        true
    }

    /// Computes the store mutation for the current form values.
    ///
    /// # Errors
    ///
    /// * [`ManagerError::SaveBlocked`] when adding without a cached search
    ///   result, or while a search is in flight.
    /// * [`ManagerError::Validation`] when the name is blank.
    pub fn plan_save(&self) -> Result<SaveAction, ManagerError> {
        if !self.can_save() {
            return Err(ManagerError::SaveBlocked);
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ManagerError::Validation(
                "Please enter a name for the zone.".to_string(),
            ));
        }

        match (self.mode, &self.found) {
            (DialogMode::Edit(id), _) => Ok(SaveAction::Update(
                id,
                GeofenceUpdate {
                    name: name.to_string(),
                    risk: self.risk,
                },
            )),
            (DialogMode::Add, Some(place)) => Ok(SaveAction::Create(GeofenceDraft {
                name: name.to_string(),
                risk: self.risk,
                coords: circle_polygon(place.location, self.diameter_meters / 2.0),
            })),
            (DialogMode::Add, None) => Err(ManagerError::SaveBlocked),
        }
    }
}
