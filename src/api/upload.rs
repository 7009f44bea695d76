use axum::extract::Multipart;
use log::debug;

use crate::pipeline::RawFile;

use super::error::ApiError;

/// Collects every file field of the upload, in upload order.
///
/// Plain form fields (no `filename`) are ignored.
pub async fn read_files(mut multipart: Multipart) -> Result<Vec<RawFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("invalid upload: {e}")))?
    {
        let Some(name) = field.file_name().map(String::from) else {
            debug!("ignoring form field {:?}", field.name());
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("reading '{name}': {e}")))?;
        files.push(RawFile { name, bytes });
    }

    if files.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Upload CSV files to get started".to_string(),
        ));
    }
    Ok(files)
}
