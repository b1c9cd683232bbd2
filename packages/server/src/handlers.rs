//! HTTP handler functions for the tourist safety API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tourist_safety_dashboard::{AlertResolution, DashboardStore};
use tourist_safety_geofence_models::{AlertId, GeofenceId, LatLon};
use tourist_safety_manager::{DialogId, DialogMode, DialogPhase, FormUpdate, GeofenceDialog};
use tourist_safety_server_models::{
    ApiActivity, ApiAlert, ApiAlertResolution, ApiDashboard, ApiDialog, ApiDialogPhase,
    ApiGeofence, ApiHealth, ApiResolvedPlace, ApiSummary, ApiZoneHit, ContainingQueryParams,
    OpenDialogRequest, UpdateDialogRequest,
};
use tourist_safety_spatial::ZoneIndex;

use crate::{AppState, ServerError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dashboard`
///
/// Summary figures, alerts, the activity feed and the zone list, all
/// read under one lock.
pub async fn dashboard(state: web::Data<AppState>) -> HttpResponse {
    let now = Utc::now();
    let body = state
        .manager
        .dashboard()
        .read(|store| dashboard_body(store, now));
    HttpResponse::Ok().json(body)
}

fn dashboard_body(store: &DashboardStore, now: chrono::DateTime<Utc>) -> ApiDashboard {
    let summary = store.summary();
    ApiDashboard {
        summary: ApiSummary {
            active_tourists: summary.active_tourists,
            active_alerts: summary.active_alerts,
            monitored_zones: summary.monitored_zones,
        },
        alerts: store.alerts().iter().map(|a| ApiAlert::new(a, now)).collect(),
        recent_activity: store
            .recent_activity()
            .map(|e| ApiActivity::new(e, now))
            .collect(),
        geofences: store.geofences().iter().map(ApiGeofence::from).collect(),
    }
}

/// `GET /api/geofences`
pub async fn geofences(state: web::Data<AppState>) -> HttpResponse {
    let zones: Vec<ApiGeofence> = state
        .manager
        .dashboard()
        .read(|store| store.geofences().iter().map(ApiGeofence::from).collect());
    HttpResponse::Ok().json(zones)
}

/// `GET /api/geofences/map`
///
/// Every stored zone as a GeoJSON `FeatureCollection`.
pub async fn geofences_map(state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let layers = state.manager.map_layers(None)?;
    Ok(HttpResponse::Ok().json(layers.to_geojson()))
}

/// `GET /api/geofences/containing?lat=..&lon=..`
///
/// Zones whose boundary contains the point, highest risk first.
pub async fn geofences_containing(
    state: web::Data<AppState>,
    params: web::Query<ContainingQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let point = LatLon::new(params.lat, params.lon);
    if !point.is_valid() {
        return Err(ServerError::BadRequest(format!(
            "Invalid coordinate: {point}"
        )));
    }

    let hits: Vec<ApiZoneHit> = state.manager.dashboard().read(|store| {
        ZoneIndex::build(store.geofences())
            .containing(point)
            .into_iter()
            .filter_map(|hit| store.geofence(hit.id))
            .map(|fence| ApiZoneHit {
                id: fence.id,
                name: fence.name.clone(),
                risk: fence.risk,
            })
            .collect()
    });
    Ok(HttpResponse::Ok().json(hits))
}

/// `DELETE /api/geofences/{id}`
pub async fn delete_geofence(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServerError> {
    let removed = state.manager.delete_geofence(GeofenceId(path.into_inner()))?;
    Ok(HttpResponse::Ok().json(ApiGeofence::from(&removed)))
}

/// `POST /api/alerts/{id}/resolve`
pub async fn resolve_alert(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ServerError> {
    let id = AlertId(path.into_inner());
    let resolution = state
        .manager
        .dashboard()
        .write(|store| store.resolve_alert(id))?;

    let now = Utc::now();
    let body = match resolution {
        AlertResolution::Resolved(alert) => {
            log::info!("Resolved alert {id}");
            ApiAlertResolution {
                alert: ApiAlert::new(&alert, now),
                already_resolved: false,
            }
        }
        AlertResolution::AlreadyResolved(alert) => ApiAlertResolution {
            alert: ApiAlert::new(&alert, now),
            already_resolved: true,
        },
    };
    Ok(HttpResponse::Ok().json(body))
}

/// `POST /api/dialogs`
pub async fn open_dialog(
    state: web::Data<AppState>,
    body: web::Json<OpenDialogRequest>,
) -> Result<HttpResponse, ServerError> {
    let (id, dialog) = match body.into_inner() {
        OpenDialogRequest::Add => state.manager.open_add(),
        OpenDialogRequest::Edit { geofence_id } => state.manager.open_edit(geofence_id)?,
    };
    Ok(HttpResponse::Created().json(api_dialog(id, &dialog)))
}

/// `GET /api/dialogs/{id}`
pub async fn get_dialog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    let dialog = state.manager.dialog(id)?;
    Ok(HttpResponse::Ok().json(api_dialog(id, &dialog)))
}

/// `PATCH /api/dialogs/{id}`
pub async fn update_dialog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateDialogRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    let UpdateDialogRequest {
        name,
        risk,
        diameter_meters,
    } = body.into_inner();

    let dialog = state.manager.update_form(
        id,
        FormUpdate {
            name,
            risk,
            diameter_meters,
        },
    )?;
    Ok(HttpResponse::Ok().json(api_dialog(id, &dialog)))
}

/// `POST /api/dialogs/{id}/search`
///
/// Resolves the dialog's current name. On success the response is the
/// updated dialog with `found` set.
pub async fn search_dialog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    state.manager.search(id).await?;
    let dialog = state.manager.dialog(id)?;
    Ok(HttpResponse::Ok().json(api_dialog(id, &dialog)))
}

/// `POST /api/dialogs/{id}/save`
pub async fn save_dialog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    let saved = state.manager.save(id)?;
    Ok(HttpResponse::Ok().json(ApiGeofence::from(&saved)))
}

/// `DELETE /api/dialogs/{id}`
pub async fn cancel_dialog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    state.manager.cancel(id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// `GET /api/dialogs/{id}/map`
///
/// Like `/api/geofences/map`, plus the dialog's unsaved search result as a
/// marker.
pub async fn dialog_map(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_dialog_id(&path)?;
    let layers = state.manager.map_layers(Some(id))?;
    Ok(HttpResponse::Ok().json(layers.to_geojson()))
}

fn parse_dialog_id(raw: &str) -> Result<DialogId, ServerError> {
    raw.parse()
        .map_err(|e| ServerError::BadRequest(format!("Invalid dialog id '{raw}': {e}")))
}

fn api_dialog(id: DialogId, dialog: &GeofenceDialog) -> ApiDialog {
    ApiDialog {
        id: id.to_string(),
        phase: match dialog.phase() {
            DialogPhase::AddOpen => ApiDialogPhase::AddOpen,
            DialogPhase::AddReady => ApiDialogPhase::AddReady,
            DialogPhase::EditOpen => ApiDialogPhase::EditOpen,
        },
        geofence_id: match dialog.mode() {
            DialogMode::Add => None,
            DialogMode::Edit(geofence_id) => Some(geofence_id),
        },
        name: dialog.name().to_string(),
        risk: dialog.risk(),
        diameter_meters: dialog.diameter_meters(),
        searching: dialog.is_searching(),
        found: dialog.found().map(|place| ApiResolvedPlace {
            location: place.location,
            display_name: place.display_name.clone(),
        }),
        can_search: dialog.can_search(),
        can_save: dialog.can_save(),
    }
}
