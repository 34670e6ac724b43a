// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Multipart upload staging.
//!
//! The `file` part is streamed chunk by chunk into a temporary file inside the
//! upload directory. Text parts become [`UploadForm`] fields.

use axum::extract::multipart::{Field, Multipart};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::error::WorkflowError;
use crate::application::upload_ingest::{StagedAttachment, UploadForm};
use crate::presentation::error::ApiError;

const FILE_FIELD: &str = "file";
const DEFAULT_FILENAME: &str = "upload.pdf";

/// Read every part of a multipart upload into an [`UploadForm`].
pub async fn read_upload_form(
    upload_dir: &Path,
    mut multipart: Multipart,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            FILE_FIELD => {
                if form.attachment.is_some() {
                    return Err(ApiError::bad_request("Only one file may be uploaded"));
                }
                form.attachment = stage_file(upload_dir, field).await?;
            }
            "title" => form.title = Some(field.text().await?),
            "role1Email" => form.role1_email = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "note" => form.note = Some(field.text().await?),
            other => debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    Ok(form)
}

fn staging_failure(upload_dir: &Path, err: std::io::Error) -> ApiError {
    WorkflowError::Processing(format!(
        "Failed to stage upload in {}: {}",
        upload_dir.display(),
        err
    ))
    .into()
}

/// Stream a file part to disk. A part with no filename and no content is the
/// form's empty file input and counts as no attachment.
async fn stage_file(
    upload_dir: &Path,
    mut field: Field<'_>,
) -> Result<Option<StagedAttachment>, ApiError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_owned);

    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(upload_dir)
        .map_err(|e| staging_failure(upload_dir, e))?;
    let handle = staged
        .as_file()
        .try_clone()
        .map_err(|e| staging_failure(upload_dir, e))?;
    let mut writer = tokio::fs::File::from_std(handle);

    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len();
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| staging_failure(upload_dir, e))?;
    }
    writer
        .flush()
        .await
        .map_err(|e| staging_failure(upload_dir, e))?;

    if size == 0 && filename.is_empty() {
        return Ok(None);
    }

    debug!(
        filename = %filename,
        content_type = ?content_type,
        size,
        path = %staged.path().display(),
        "Staged upload"
    );

    let filename = if filename.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        filename
    };
    Ok(Some(StagedAttachment::new(filename, content_type, staged)))
}
