//! HTTP handler for book content delivery.
//! Streams object bodies straight from the object store to the client and
//! delegates storage concerns to the injected `BookStore`.

use crate::{errors::AppError, services::book_store::BookStore};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use futures::TryStreamExt;
use serde::Deserialize;
use std::sync::Arc;

const MAX_FILE_NAME_LEN: usize = 1024;

/// Query params accepted by `GET /get-book-content`.
#[derive(Debug, Deserialize)]
pub struct BookContentQuery {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

/// Download a book `/get-book-content?fileName=<key>` as a streaming response.
///
/// Validation failures return 400 before any upstream call. Store failures
/// all surface as an opaque 500; the distinguishing detail is logged
/// server-side only. Once headers are sent the status is committed, so a
/// stream error mid-transfer is logged and the connection terminates.
pub async fn get_book_content(
    State(store): State<Arc<dyn BookStore>>,
    Query(query): Query<BookContentQuery>,
) -> Result<Response, AppError> {
    let file_name = query.file_name.as_deref().unwrap_or_default();
    ensure_file_name_safe(file_name)?;

    let book = match store.fetch(file_name).await {
        Ok(book) => book,
        Err(err) => {
            tracing::error!(file_name, error = ?err, "failed to fetch book from object store");
            return Err(AppError::internal("failed to retrieve book content"));
        }
    };

    let logged_name = file_name.to_string();
    let stream = book.body.inspect_err(move |err| {
        tracing::error!(
            file_name = %logged_name,
            error = %err,
            "stream interrupted while forwarding book content"
        );
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    set_download_headers(response.headers_mut(), file_name, book.content_length);
    Ok(response)
}

/// Basic file-name validation to avoid trivial path traversal and header
/// injection vectors.
///
/// Rejects empty names, names that begin with `/` or contain `..`, and names
/// containing bytes that cannot appear in a quoted Content-Disposition value.
fn ensure_file_name_safe(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::bad_request(
            "query parameter `fileName` is required",
        ));
    }
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(AppError::bad_request("`fileName` is too long"));
    }
    if name.starts_with('/') || name.contains("..") {
        return Err(AppError::bad_request(
            "`fileName` must be a plain object key",
        ));
    }
    if name
        .bytes()
        .any(|b| b.is_ascii_control() || b == b'\\' || b == b'"')
    {
        return Err(AppError::bad_request(
            "`fileName` contains characters that are not allowed",
        ));
    }
    Ok(())
}

fn set_download_headers(headers: &mut HeaderMap, file_name: &str, content_length: Option<u64>) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );

    // Quoted and pre-validated, so the interpolation cannot break out of the
    // header value.
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    if let Some(length) = content_length {
        if let Ok(value) = HeaderValue::from_str(&length.to_string()) {
            headers.insert(header::CONTENT_LENGTH, value);
        }
    }
}
