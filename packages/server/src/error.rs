//! Mapping of domain errors onto HTTP responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use tourist_safety_dashboard::DashboardError;
use tourist_safety_manager::ManagerError;
use tourist_safety_server_models::ApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// Malformed path or query input.
    #[error("{0}")]
    BadRequest(String),
}

impl ServerError {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Manager(e) => match e {
                ManagerError::Validation(_) => "validation",
                ManagerError::ResolutionEmpty { .. } => "notFound",
                ManagerError::ResolutionFailure(_) => "apiError",
                ManagerError::SearchInFlight | ManagerError::SaveBlocked => "conflict",
                ManagerError::StaleSearch => "stale",
                ManagerError::DialogNotFound(_) => "dialogNotFound",
                ManagerError::Dashboard(e) => dashboard_kind(e),
            },
            Self::Dashboard(e) => dashboard_kind(e),
            Self::BadRequest(_) => "badRequest",
        }
    }
}

const fn dashboard_kind(e: &DashboardError) -> &'static str {
    match e {
        DashboardError::GeofenceNotFound(_) | DashboardError::AlertNotFound(_) => "notFound",
        DashboardError::InvalidPolygon(_) => "validation",
    }
}

const fn dashboard_status(e: &DashboardError) -> StatusCode {
    match e {
        DashboardError::GeofenceNotFound(_) | DashboardError::AlertNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        DashboardError::InvalidPolygon(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Manager(e) => match e {
                ManagerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ManagerError::ResolutionEmpty { .. } | ManagerError::DialogNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ManagerError::ResolutionFailure(_) => StatusCode::BAD_GATEWAY,
                ManagerError::SearchInFlight
                | ManagerError::SaveBlocked
                | ManagerError::StaleSearch => StatusCode::CONFLICT,
                ManagerError::Dashboard(e) => dashboard_status(e),
            },
            Self::Dashboard(e) => dashboard_status(e),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("Request rejected ({status}): {self}");
        }

        HttpResponse::build(status).json(ApiError {
            error: self.to_string(),
            kind: self.kind().to_string(),
        })
    }
}
