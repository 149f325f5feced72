// Request and response bodies of the HTTP API

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

// File part of a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

// Decoded `POST /generate` multipart form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateForm {
    pub fields: HashMap<String, String>,
    pub image: Option<UploadedFile>,
}

impl GenerateForm {
    /// Value of a text field, treating an empty value as absent
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Keep the first value when a field is repeated
    pub fn insert_field(&mut self, name: String, value: String) {
        self.fields.entry(name).or_insert(value);
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.insert_field(name.to_string(), value.to_string());
        self
    }

    pub fn with_image(mut self, filename: &str, data: impl Into<Bytes>) -> Self {
        self.image = Some(UploadedFile {
            filename: filename.to_string(),
            data: data.into(),
        });
        self
    }
}
