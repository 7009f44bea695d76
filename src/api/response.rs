use axum::body::Body;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;

use crate::pipeline::{Export, XLSX_MIME, safe_file_name};

use super::error::ApiError;

/// True when the client asked for the spreadsheet rather than JSON.
pub fn wants_xlsx(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.contains(XLSX_MIME))
}

/// Serve an in-memory workbook as a file download.
pub fn xlsx_response(export: Export) -> Result<Response, ApiError> {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        safe_file_name(&export.file_name)
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_MIME)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(export.bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
