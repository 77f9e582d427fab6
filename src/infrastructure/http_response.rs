// HTTP response utilities for JSON views and CSV downloads, with optional Brotli
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// True when Accept-Encoding lists `br` (or `*`) with a non-zero quality.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(parse_coding)
        .any(|(coding, quality)| (coding == "br" || coding == "*") && quality > 0.0)
}

/// `br;q=0.5` -> ("br", 0.5). Missing q means 1.0; an item with an unparsable q is skipped.
fn parse_coding(item: &str) -> Option<(String, f32)> {
    let mut parts = item.split(';');
    let coding = parts.next()?.trim().to_ascii_lowercase();
    if coding.is_empty() {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("q") {
                quality = value.trim().parse::<f32>().ok()?;
            }
        }
    }
    Some((coding, quality))
}

pub async fn brotli_compress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = BrotliEncoder::new(std::io::Cursor::new(bytes));
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

/// Serialize `data` as JSON with the given status, Brotli-compressed if requested.
pub async fn json_response<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response<Body> {
    let json = match serde_json::to_vec(data) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("JSON serialization error: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    encoded_response(status, "application/json", None, json, compress).await
}

/// Deliver CSV text as a file download named `filename`.
pub async fn csv_download_response(csv: String, filename: &str, compress: bool) -> Response<Body> {
    let disposition = attachment_disposition(filename);
    encoded_response(
        StatusCode::OK,
        CSV_CONTENT_TYPE,
        Some(&disposition),
        csv.into_bytes(),
        compress,
    )
    .await
}

async fn encoded_response(
    status: StatusCode,
    content_type: &str,
    disposition: Option<&str>,
    body: Vec<u8>,
    compress: bool,
) -> Response<Body> {
    let (body_bytes, content_encoding) = if compress {
        match brotli_compress(&body).await {
            Ok(compressed) => {
                tracing::debug!("Compressed {} -> {} bytes", body.len(), compressed.len());
                (compressed, Some("br"))
            }
            Err(e) => {
                tracing::warn!("Brotli compression failed, sending uncompressed: {}", e);
                (body, None)
            }
        }
    } else {
        (body, None)
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        builder = builder.header(header::CONTENT_ENCODING, encoding);
    }
    if let Some(disposition) = disposition {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    builder.body(Body::from(body_bytes)).unwrap_or_else(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;

    async fn decompress(bytes: &[u8]) -> Vec<u8> {
        let mut decoder = BrotliDecoder::new(std::io::Cursor::new(bytes));
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).await.unwrap();
        out
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));

        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        assert!(accepts_brotli(&headers));
    }

    #[test]
    fn test_brotli_quality_zero_is_refused() {
        let accepts = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(value));
            accepts_brotli(&headers)
        };

        assert!(!accepts("gzip, br;q=0"));
        assert!(!accepts("br; q=0.000, gzip"));
        assert!(!accepts("gzip, brotli-ish"));
        assert!(!accepts("identity"));
        assert!(accepts("gzip;q=1.0, br;q=0.5"));
        assert!(accepts("BR"));
        assert!(accepts("*"));
        assert!(!accepts("*;q=0"));
    }

    #[tokio::test]
    async fn test_csv_download_headers() {
        let response = csv_download_response("a,b\n".to_string(), "export.csv", false).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], CSV_CONTENT_TYPE);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"export.csv\""
        );
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"a,b\n");
    }

    #[tokio::test]
    async fn test_compressed_json_round_trips() {
        let data = serde_json::json!({ "totalSubmissions": 3 });
        let response = json_response(StatusCode::FORBIDDEN, &data, true).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&decompress(&body).await).unwrap();
        assert_eq!(decoded, data);
    }
}
