use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::core::MergeError;
use crate::pipeline::{InputMode, combined_export};
use crate::service::CombineService;
use crate::session::Action;

use super::error::ApiError;
use super::response::{wants_xlsx, xlsx_response};
use super::types::{
    CombineResponse, HealthResponse, QueryRequest, SessionResponse, TableJson, diagnostics_json,
};
use super::upload::read_files;

/// GET /health
pub async fn health_handler(State(service): State<Arc<CombineService>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        sessions: service.session_count().await,
    })
}

/// POST /v1/combine
///
/// Combine CSV files that carry a header row. Returns a JSON preview, or
/// `combined_data.xlsx` when the Accept header names the spreadsheet type.
pub async fn combine_handler(
    State(service): State<Arc<CombineService>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let files = read_files(multipart).await?;
    let combined = service.combine(files, InputMode::WithHeader);
    let table = match combined.table {
        Ok(table) => table,
        Err(MergeError::NoValidInput) => {
            return Err(ApiError::NoValidInput(combined.diagnostics));
        }
        Err(e) => return Err(e.into()),
    };

    if wants_xlsx(&headers) {
        return xlsx_response(combined_export(&table)?);
    }

    let preview = table.head(service.config().combine.preview_rows);
    Ok(Json(CombineResponse {
        total_rows: table.num_rows(),
        preview: TableJson::from(&preview),
        diagnostics: diagnostics_json(&combined.diagnostics),
    })
    .into_response())
}

/// POST /v1/sessions
///
/// Upload headerless MPAN files and start a query session.
pub async fn create_session_handler(
    State(service): State<Arc<CombineService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let files = read_files(multipart).await?;
    let combined = service.combine(files, InputMode::Headerless);
    let table = match combined.table {
        Ok(table) => table,
        Err(MergeError::NoValidInput) => {
            return Err(ApiError::NoValidInput(combined.diagnostics));
        }
        Err(e) => return Err(e.into()),
    };

    let id = service.open_session(table).await;
    let session = service.session(id).await?;
    let mut response = SessionResponse::render(id, &session)?;
    response.diagnostics = diagnostics_json(&combined.diagnostics);
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/sessions/{id}
pub async fn get_session_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let session = service.session(id).await?;
    Ok(Json(SessionResponse::render(id, &session)?))
}

/// POST /v1/sessions/{id}/query
pub async fn query_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    apply(&service, &id, Action::Submit(request.mpan)).await
}

/// POST /v1/sessions/{id}/continue
pub async fn continue_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    apply(&service, &id, Action::Continue).await
}

/// POST /v1/sessions/{id}/stop
pub async fn stop_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    apply(&service, &id, Action::Stop).await
}

/// GET /v1/sessions/{id}/download
pub async fn download_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_session_id(&id)?;
    xlsx_response(service.export(id).await?)
}

/// DELETE /v1/sessions/{id}
pub async fn delete_session_handler(
    State(service): State<Arc<CombineService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    service.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply(
    service: &CombineService,
    id: &str,
    action: Action,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_session_id(id)?;
    let session = service.apply(id, action).await?;
    Ok(Json(SessionResponse::render(id, &session)?))
}

fn parse_session_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::SessionNotFound(id.to_string()))
}
