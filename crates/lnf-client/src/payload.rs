//! Request bodies, request options and response payloads of the pipeline.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use lnf_core::LocationSelection;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::error::RequestFailure;

/// Successful outcome of [`crate::ApiClient::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// 204 or a zero-length body.
    NoContent,
    /// `text/plain` body.
    Text(String),
    Json(serde_json::Value),
}

impl ApiPayload {
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// Collapses the payload into a JSON value: no content becomes `null` and
    /// text becomes a JSON string.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Self::NoContent => serde_json::Value::Null,
            Self::Text(text) => serde_json::Value::String(text),
            Self::Json(value) => value,
        }
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Multipart form. Never sent with a preset `Content-Type`.
    Form(FormPayload),
}

/// Method, body and extra headers for one call through the pipeline.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: RequestBody,
    /// Applied after the default `Content-Type`, so they override it.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn json(method: Method, body: serde_json::Value) -> Self {
        Self {
            method,
            body: RequestBody::Json(body),
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn form(method: Method, form: FormPayload) -> Self {
        Self {
            method,
            body: RequestBody::Form(form),
            headers: HeaderMap::new(),
        }
    }
}

/// Which field names a location is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFields {
    /// `country` / `state` / `city` on lost and found item reports.
    Item,
    /// `found_country` / `found_state` / `found_city` on a found-report.
    FoundReport,
}

impl LocationFields {
    fn names(self) -> [&'static str; 3] {
        match self {
            Self::Item => ["country", "state", "city"],
            Self::FoundReport => ["found_country", "found_state", "found_city"],
        }
    }
}

/// A file part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads an image from disk. The MIME type is taken from the extension;
    /// only the types the server stores (JPEG, PNG, WebP, GIF) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] for an unsupported extension or
    /// an unreadable file.
    pub async fn image_from_path(field: &str, path: &Path) -> Result<Self, RequestFailure> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let mime = IMAGE_TYPES
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, m)| *m)
            .ok_or_else(|| {
                RequestFailure::validation(format!(
                    "Unsupported image type for {}: use jpg, png, webp or gif.",
                    path.display()
                ))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RequestFailure::validation(format!("Could not read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self::new(field, file_name, mime, bytes))
    }
}

/// Multipart form builder with `FormData`-like lookups.
///
/// Text fields keep insertion order; `set` replaces every earlier value of
/// the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl FormPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Appends a text field only when `value` is present and non-empty.
    #[must_use]
    pub fn text_opt(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.text(key, v),
            None => self,
        }
    }

    /// Appends a timestamp in the `toISOString` format the server parses.
    #[must_use]
    pub fn timestamp(self, key: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.text(key, value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.retain(|(k, _)| k != key);
        self.fields.push((key.to_string(), value.into()));
    }

    /// Writes the non-empty levels of `selection` under the given field names.
    #[must_use]
    pub fn location(mut self, selection: &LocationSelection, fields: LocationFields) -> Self {
        let [country, state, city] = fields.names();
        for (key, value) in [
            (country, selection.country()),
            (state, selection.state()),
            (city, selection.city()),
        ] {
            self.fields.retain(|(k, _)| k != key);
            if !value.is_empty() {
                self.fields.push((key.to_string(), value.to_string()));
            }
        }
        self
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key) || self.files.iter().any(|f| f.field == key)
    }

    /// First text value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Converts into a `reqwest` multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] if a file part carries an
    /// unparseable MIME type.
    pub fn into_multipart(self) -> Result<reqwest::multipart::Form, RequestFailure> {
        let mut form = reqwest::multipart::Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
                .map_err(|e| {
                    RequestFailure::validation(format!(
                        "Invalid content type \"{}\" for {}: {e}",
                        file.mime, file.file_name
                    ))
                })?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}
