//! Builds [`RequestParams`] from an incoming Axum request.

use std::collections::HashMap;

use axum::extract::{Form, FromRequest, Multipart, Query, Request};
use axum::http::header::CONTENT_TYPE;

use pagehook_core::error::AppError;
use pagehook_core::types::{RequestParams, UploadedFile};
use pagehook_core::AppResult;

/// Parses the query string, and the body when it carries a form.
///
/// Bodies that are neither urlencoded nor multipart are ignored rather
/// than rejected; plugins only ever see form-shaped input.
pub async fn extract_params(req: Request) -> AppResult<RequestParams> {
    let method = req.method().as_str().to_string();

    let query: HashMap<String, String> = Query::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut form = HashMap::new();
    let mut files = Vec::new();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Malformed multipart field: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let declared_type = field.content_type().map(str::to_string);
                    let content = field.bytes().await.map_err(|e| {
                        AppError::validation(format!("Upload '{name}' truncated: {e}"))
                    })?;
                    files.push(UploadedFile {
                        field: name,
                        file_name,
                        content_type: declared_type,
                        content,
                    });
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::validation(format!("Form field '{name}' unreadable: {e}"))
                    })?;
                    form.insert(name, text);
                }
            }
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(parsed) = Form::<HashMap<String, String>>::from_request(req, &())
            .await
            .map_err(|e| AppError::validation(format!("Malformed form body: {e}")))?;
        form = parsed;
    }

    Ok(RequestParams::new(method, query, form, files))
}
