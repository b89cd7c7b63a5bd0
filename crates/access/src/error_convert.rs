use reqwest::StatusCode;
use shared_types::AppError;

/// Convert a reqwest::Error into an AppError.
pub fn reqwest_to_app_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        return AppError::timeout(err.to_string());
    }
    if err.is_decode() {
        return AppError::parse(err.to_string());
    }
    match err.status() {
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
            AppError::unauthorized(err.to_string())
        }
        Some(StatusCode::NOT_FOUND) => AppError::not_found(err.to_string()),
        Some(status) if status.is_server_error() => AppError::unavailable(err.to_string()),
        _ => AppError::network(err.to_string()),
    }
}

/// Extension trait providing `.into_app_error()` on reqwest::Error.
pub trait ReqwestErrorExt {
    fn into_app_error(self) -> AppError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_app_error(self) -> AppError {
        reqwest_to_app_error(self)
    }
}
