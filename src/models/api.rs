use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;
use strum::EnumProperty;

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: Option<i64>) -> Self {
        ApiError {
            message: message.into(),
            code,
        }
    }
}

impl Error {
    /// HTTP status for this error.
    ///
    /// An explicit `status_code` prop wins; coded errors without one are
    /// reported with 200 and their code; everything else is internal.
    pub fn status(&self) -> StatusCode {
        match (self.get_int("status_code"), self.get_int("code")) {
            (Some(status_code), _) => {
                StatusCode::from_u16(status_code as u16).unwrap_or_else(|_| {
                    error!(
                        "This may be a bug: an error type defined an invalid status code: {status_code}"
                    );
                    StatusCode::INTERNAL_SERVER_ERROR
                })
            }
            (None, Some(_)) => StatusCode::OK,
            (None, None) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        let body = ApiError::new(self.to_string(), self.get_int("code"));

        (status, Json(body)).into_response()
    }
}
