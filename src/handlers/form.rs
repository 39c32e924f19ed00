//! Multipart form reading and file download responses

use std::{collections::HashMap, path::Path};

use axum::{
    body::Body,
    extract::Multipart,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, AppResult},
    storage::{content_type, UploadedFile},
};

/// Text fields and the optional `file` part of a multipart request
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain a multipart stream; the part named `file` is kept as bytes
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?;

                form.file = Some(UploadedFile {
                    file_name,
                    bytes: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Serve a stored file; `download` selects an attachment disposition
pub async fn file_response(path: &Path, file_name: &str, download: bool) -> AppResult<Response> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = if download {
        format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
    } else {
        "inline".to_string()
    };
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type(file_name))),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}
