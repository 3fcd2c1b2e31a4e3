use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Endpoints advertised by the 404 fallback.
pub const AVAILABLE_ENDPOINTS: [&str; 3] = ["GET /", "POST /generate-excel", "GET /health"];

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid request. {0}")]
    InvalidPayload(String),

    #[error("No sheets provided. At least one sheet is required.")]
    EmptyPayload,

    #[error("Sheet \"{sheet}\" {problem}")]
    InvalidSheetData { sheet: String, problem: String },

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    #[error("Failed to generate Excel file: {0}")]
    EncodingFailure(String),

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error("Internal server error: {0}")]
    UnhandledFault(String),
}

impl ServiceError {
    /// `sheets` missing or not a JSON object.
    pub fn missing_sheets() -> Self {
        ServiceError::InvalidPayload("Expected \"sheets\" object.".to_string())
    }

    /// A sheet whose value is not a list of rows.
    pub fn sheet_not_array(sheet: impl Into<String>) -> Self {
        ServiceError::InvalidSheetData {
            sheet: sheet.into(),
            problem: "must be an array of arrays".to_string(),
        }
    }

    /// HTTP status for each error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidPayload(_)
            | ServiceError::EmptyPayload
            | ServiceError::InvalidSheetData { .. }
            | ServiceError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ServiceError::RouteNotFound => StatusCode::NOT_FOUND,
            ServiceError::EncodingFailure(_) | ServiceError::UnhandledFault(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> ErrorBody {
        match self {
            ServiceError::InvalidPayload(_)
            | ServiceError::EmptyPayload
            | ServiceError::InvalidSheetData { .. } => ErrorBody::new(self.to_string()),
            ServiceError::MalformedBody(details) => {
                ErrorBody::new("Malformed JSON body").with_details(details)
            }
            ServiceError::EncodingFailure(details) => {
                ErrorBody::new("Failed to generate Excel file").with_details(details)
            }
            ServiceError::RouteNotFound => ErrorBody {
                error: self.to_string(),
                details: None,
                available_endpoints: Some(AVAILABLE_ENDPOINTS.to_vec()),
            },
            ServiceError::UnhandledFault(details) => {
                ErrorBody::new("Internal server error").with_details(details)
            }
        }
    }
}

/// JSON error payload
#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(
        rename = "availableEndpoints",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_endpoints: Option<Vec<&'static str>>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            available_endpoints: None,
        }
    }

    fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
