//! Immutable request parameter access for plugin code.

use std::collections::HashMap;

use bytes::Bytes;

/// A file received through a multipart form field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field name.
    pub field: String,
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub content: Bytes,
}

/// GET/POST/file parameters of the current request.
///
/// Built once by the server from the incoming request and handed to
/// plugin callbacks through the page context. The core never reads these
/// itself.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    method: String,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl RequestParams {
    /// Assemble parameters from pre-parsed parts.
    pub fn new(
        method: impl Into<String>,
        query: HashMap<String, String>,
        form: HashMap<String, String>,
        files: Vec<UploadedFile>,
    ) -> Self {
        Self {
            method: method.into(),
            query,
            form,
            files,
        }
    }

    /// The HTTP method, uppercase.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Whether this request was submitted with POST.
    pub fn posted(&self) -> bool {
        self.method == "POST"
    }

    /// A query-string parameter, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.query.get(key).map(String::as_str).unwrap_or("")
    }

    /// A form-body parameter, or `""` when absent.
    pub fn post(&self, key: &str) -> &str {
        self.form.get(key).map(String::as_str).unwrap_or("")
    }

    /// A form-body parameter with a fallback default.
    pub fn input<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.form.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    /// A parameter from either source; the form body wins over the query
    /// string when both carry the key.
    pub fn all(&self, key: &str) -> &str {
        match self.form.get(key) {
            Some(value) => value,
            None => self.get(key),
        }
    }

    /// The uploaded file for a form field, if any.
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }

    /// All uploaded files.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// The full form-body map.
    pub fn form(&self) -> &HashMap<String, String> {
        &self.form
    }

    /// The full query-string map.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }
}
