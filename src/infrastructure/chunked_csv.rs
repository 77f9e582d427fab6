// Chunked CSV streaming for uncompressed downloads
use crate::domain::export::{header_line, record_line, FlatRow};
use crate::infrastructure::http_response::{attachment_disposition, CSV_CONTENT_TYPE};
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::stream::Stream;

/// Header chunk first, then one chunk per record. Same bytes as `to_csv`.
pub fn csv_chunks(rows: Vec<FlatRow>) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    async_stream::stream! {
        yield Ok(Bytes::from(header_line()));
        for row in rows {
            yield Ok(Bytes::from(record_line(&row)));
        }
    }
}

pub fn chunked_csv_response(rows: Vec<FlatRow>, filename: &str) -> Response<Body> {
    let body = Body::from_stream(csv_chunks(rows));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CSV_CONTENT_TYPE)
        .header(header::CONTENT_DISPOSITION, attachment_disposition(filename))
        .body(body)
        .unwrap_or_else(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
