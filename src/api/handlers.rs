//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::excel::{WorkbookExporter, XLSX_CONTENT_TYPE};
use crate::parser::parse_body;

use super::server::AppState;

/// Header carrying the per-request id on generate responses
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointDescriptions,
}

#[derive(Serialize)]
pub struct EndpointDescriptions {
    #[serde(rename = "POST /generate-excel")]
    pub generate_excel: String,
    #[serde(rename = "GET /health")]
    pub health: String,
}

/// GET / - Service descriptor
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RootResponse {
        message: "Excel Generator Service is running!".to_string(),
        version: state.version.clone(),
        endpoints: EndpointDescriptions {
            generate_excel: "Generate multi-sheet Excel file".to_string(),
            health: "Health check".to_string(),
        },
    })
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// A generated workbook ready to be sent as a download
#[derive(Debug)]
pub struct GeneratedFile {
    pub filename: String,
    pub sheet_count: usize,
    pub bytes: Vec<u8>,
}

impl IntoResponse for GeneratedFile {
    fn into_response(self) -> Response {
        let disposition = match HeaderValue::from_str(&content_disposition(&self.filename)) {
            Ok(value) => value,
            Err(e) => return ServiceError::UnhandledFault(e.to_string()).into_response(),
        };

        (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(XLSX_CONTENT_TYPE),
                ),
                (header::CONTENT_DISPOSITION, disposition),
                (header::CONTENT_LENGTH, HeaderValue::from(self.bytes.len())),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Parse, build and encode a workbook from a raw request body.
pub fn generate_workbook(body: &[u8]) -> ServiceResult<GeneratedFile> {
    let request = parse_body(body)?;
    let bytes = WorkbookExporter::new(&request).to_buffer()?;

    Ok(GeneratedFile {
        filename: request.resolved_filename().to_string(),
        sheet_count: request.sheets().len(),
        bytes,
    })
}

/// POST /generate-excel - Build an .xlsx download from JSON sheets
pub async fn generate_excel(body: Result<Bytes, BytesRejection>) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("generate_excel", %request_id);

    let result = span.in_scope(|| {
        let result = body
            .map_err(|e| ServiceError::UnhandledFault(e.body_text()))
            .and_then(|body| generate_workbook(&body));

        match &result {
            Ok(file) => info!(
                sheets = file.sheet_count,
                bytes = file.bytes.len(),
                filename = %file.filename,
                "Generated workbook"
            ),
            Err(e) if e.status_code().is_server_error() => {
                error!("Error generating Excel file: {}", e)
            }
            Err(e) => warn!("Rejected request: {}", e),
        }
        result
    });

    let mut response = match result {
        Ok(file) => file.into_response(),
        Err(e) => e.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Fallback for unknown paths and methods
pub async fn not_found() -> ServiceError {
    ServiceError::RouteNotFound
}

/// Converts a handler panic into a JSON 500
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Handler panicked: {}", details);
    ServiceError::UnhandledFault(details).into_response()
}

/// Build a `Content-Disposition: attachment` value.
///
/// The quoted `filename` is always printable ASCII; when the real name needs
/// more than that it is also sent as an RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            percent_encode(filename)
        )
    }
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        // attr-char from RFC 5987
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}
