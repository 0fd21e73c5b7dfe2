//! Multipart form handling for the image-bearing endpoints.
//!
//! Register, profile update and recipe creation arrive as multipart/form-data
//! with text fields plus at most one image file. The file is buffered in
//! memory and relayed to blob storage by the handler before any row that
//! references its URL is written.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::AppError;

/// Per-file cap. The router's body limit sits above this.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image file extracted from a multipart form, held in memory.
#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Text fields and the optional image of one submitted form.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl FormData {
    /// Drains the multipart stream. Any part carrying a filename is treated
    /// as the image; everything else is collected as a text field.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();

                if !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(
                        "Only image files are allowed".to_string(),
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();

                if data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(
                        "File is too large. Maximum size is 5MB.".to_string(),
                    ));
                }

                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A required text field; missing or blank yields a 400.
    pub fn require(&self, name: &str) -> Result<String, AppError> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("Field '{}' is required", name)))
    }

    /// An optional text field; blank values collapse to `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn require_returns_trimmed_value() {
        let form = form_with(&[("title", "  Tacos  ")]);
        assert_eq!(form.require("title").unwrap(), "Tacos");
    }

    #[test]
    fn require_rejects_missing_and_blank() {
        let form = form_with(&[("title", "   ")]);
        assert!(form.require("title").is_err());
        assert!(form.require("absent").is_err());
    }

    #[test]
    fn get_collapses_blank_to_none() {
        let form = form_with(&[("description", ""), ("notes", "x")]);
        assert_eq!(form.get("description"), None);
        assert_eq!(form.get("notes").as_deref(), Some("x"));
    }
}
