use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::BarcodeNotFound | DomainError::BillNotFound => {
                AppError::NotFound(e.to_string())
            }
            DomainError::PermissionDenied(msg) => AppError::PermissionDenied(msg),
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
            conflict => AppError::Conflict(conflict.to_string()),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::PermissionDenied(_) => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(msg) => {
                // Do not leak internals to the caller; keep them for the operator.
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn validation_returns_400() {
        let resp = AppError::Validation("amount is required".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn permission_denied_returns_403() {
        let resp =
            AppError::PermissionDenied("admin role required".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Bill not found".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_returns_409() {
        let resp = AppError::Conflict("Barcode is not active".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn barcode_lookup_miss_maps_to_not_found() {
        let app_err: AppError = DomainError::BarcodeNotFound.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn bill_lookup_miss_maps_to_not_found() {
        let app_err: AppError = DomainError::BillNotFound.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn state_machine_violations_map_to_conflict() {
        for e in [
            DomainError::BarcodeNotOwned,
            DomainError::BarcodeNotAvailable,
            DomainError::BarcodeNotActive,
            DomainError::InvalidStatus,
            DomainError::AlreadyCompleted,
            DomainError::InvalidState,
            DomainError::NoNewCodes,
        ] {
            let app_err: AppError = e.into();
            assert!(matches!(app_err, AppError::Conflict(_)));
        }
    }

    #[test]
    fn permission_denied_maps_through() {
        let app_err: AppError =
            DomainError::PermissionDenied("no barcode issuance rights".to_string()).into();
        assert!(matches!(app_err, AppError::PermissionDenied(_)));
    }

    #[test]
    fn conflict_message_is_preserved() {
        let app_err: AppError = DomainError::AlreadyCompleted.into();
        assert_eq!(app_err.to_string(), "Bill has already been completed");
    }
}
