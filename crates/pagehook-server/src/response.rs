//! Maps domain errors and server messages to HTML responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use pagehook_core::error::{AppError, ErrorKind};
use pagehook_plugin::context::escape_html;

/// A minimal standalone message page.
pub fn message_page(status: StatusCode, title: &str, body: &str) -> Response {
    let html = format!(
        "<!DOCTYPE html>\n<html><head><title>{}</title></head>\
         <body><h1>{}</h1><p>{}</p></body></html>",
        escape_html(title),
        escape_html(title),
        escape_html(body),
    );
    (status, Html(html)).into_response()
}

/// Renders an [`AppError`] as a user-facing HTML page.
///
/// Debug mode exposes the error message; otherwise server-side failures
/// show a generic line only.
pub fn error_page(err: &AppError, debug: bool) -> Response {
    let (status, title) = match err.kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "Invalid request"),
        ErrorKind::Session => (StatusCode::UNAUTHORIZED, "Session required"),
        _ => {
            error!(kind = %err.kind, message = %err.message, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
    };

    let body = if debug {
        err.message.clone()
    } else {
        "The request could not be completed.".to_string()
    };
    message_page(status, title, &body)
}
