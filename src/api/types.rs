use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::MergeError;
use crate::pipeline::{Diagnostic, Severity};
use crate::session::{Phase, Session};
use crate::table::Table;

/// Request body for the query endpoint.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub mpan: String,
}

/// Column-oriented JSON rendering of a table.
#[derive(Debug, Serialize)]
pub struct TableJson {
    pub num_rows: usize,
    pub columns: Vec<ColumnData>,
}

/// Column data in the JSON response.
#[derive(Debug, Serialize)]
pub struct ColumnData {
    pub name: String,
    pub values: Vec<String>,
}

impl From<&Table> for TableJson {
    fn from(table: &Table) -> Self {
        let columns = table
            .column_names()
            .into_iter()
            .enumerate()
            .map(|(idx, name)| ColumnData {
                name,
                values: table.column(idx).iter().flatten().map(String::from).collect(),
            })
            .collect();
        TableJson {
            num_rows: table.num_rows(),
            columns,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosticJson {
    pub level: &'static str,
    pub file: String,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticJson {
    fn from(diagnostic: &Diagnostic) -> Self {
        DiagnosticJson {
            level: match diagnostic.severity() {
                Severity::Warning => "warning",
                Severity::Error => "error",
            },
            file: diagnostic.file().to_string(),
            message: diagnostic.to_string(),
        }
    }
}

pub fn diagnostics_json(diagnostics: &[Diagnostic]) -> Vec<DiagnosticJson> {
    diagnostics.iter().map(DiagnosticJson::from).collect()
}

/// Response of the combine endpoint.
#[derive(Debug, Serialize)]
pub struct CombineResponse {
    pub total_rows: usize,
    pub preview: TableJson,
    pub diagnostics: Vec<DiagnosticJson>,
}

/// Rendering of one session after an interaction.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub query_key: Option<String>,
    pub total_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TableJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticJson>,
}

impl SessionResponse {
    pub fn render(id: Uuid, session: &Session) -> Result<Self, MergeError> {
        let filtered = session.filtered().transpose()?;
        let (message, result) = match (filtered, session.query_key()) {
            (Some(filtered), Some(key)) => {
                let message = if filtered.is_empty() {
                    MergeError::NoMatch(key.to_string()).to_string()
                } else {
                    format!("Found {} rows for MPAN: {}", filtered.num_rows(), key)
                };
                (Some(message), Some(TableJson::from(&filtered)))
            }
            _ if session.phase() == Phase::Done => (Some("Session finished.".to_string()), None),
            _ => (None, None),
        };

        Ok(SessionResponse {
            session_id: id,
            phase: session.phase(),
            query_key: session.query_key().map(String::from),
            total_rows: session.combined().num_rows(),
            message,
            result,
            diagnostics: Vec::new(),
        })
    }
}

/// Error response format.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticJson>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}
