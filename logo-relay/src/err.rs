use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type WebResult<T> = Result<T, RelayError>;

/// An error together with the status code it is reported with.
pub struct RelayError(Error, StatusCode);

impl<E: Into<Error>> From<E> for RelayError {
    fn from(value: E) -> Self {
        Self(value.into(), StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if self.1.is_server_error() {
            tracing::error!(why = %self.0, "request failed");
        }
        (self.1, format!("{:#}", self.0)).into_response()
    }
}

/// Attach a status code to any error, for use with `?` in handlers.
///
/// Errors converted without it are reported as internal server errors.
pub trait ResultExt<T> {
    fn err_status(self, code: StatusCode) -> WebResult<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn err_status(self, code: StatusCode) -> WebResult<T> {
        self.map_err(|e| RelayError(e.into(), code))
    }
}
