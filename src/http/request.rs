//! Request extraction.
//!
//! # Responsibilities
//! - Decode JSON bodies when the content type says so
//! - Reject malformed JSON before any handler runs
//! - Snapshot method and headers into a read-only `RequestView`
//!
//! # Design Decisions
//! - Missing or non-JSON bodies become an empty object, never an error
//! - The body size limit only applies when a JSON body is actually read
//! - Compressed bodies are inflated by the decompression layer before this runs
//! - Header values that are not UTF-8 are echoed lossily

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRef, FromRequest, Request},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

/// Everything the echo handler gets to see about one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    /// Uppercase method token.
    pub method: String,
    /// Header pairs in the order the runtime delivered them.
    pub headers: Vec<(String, String)>,
    /// Decoded body, `{}` when none was sent.
    pub body: Value,
}

impl RequestView {
    pub fn new(method: &Method, headers: &HeaderMap, body: Value) -> Self {
        let headers = headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Self {
            method: method.as_str().to_ascii_uppercase(),
            headers,
            body,
        }
    }
}

/// Body decoding options shared through router state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyOptions {
    /// Only objects and arrays are accepted at the top level.
    pub strict: bool,
}

/// Rejection produced when a JSON body cannot be accepted.
#[derive(Debug, thiserror::Error)]
pub enum BodyRejection {
    #[error("Failed to parse the request body as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body must be a JSON object or array")]
    NotObjectOrArray,

    #[error("Unsupported charset \"{0}\"")]
    UnsupportedCharset(String),

    #[error(transparent)]
    Buffer(#[from] BytesRejection),
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Rejected request body");
        match self {
            // Keeps the runtime's own status (413 for oversized bodies).
            BodyRejection::Buffer(rejection) => rejection.into_response(),
            charset @ BodyRejection::UnsupportedCharset(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, charset.to_string()).into_response()
            }
            other => (StatusCode::BAD_REQUEST, other.to_string()).into_response(),
        }
    }
}

/// JSON body extractor.
///
/// Bodies are only read when `content-type` is `application/json`;
/// everything else yields an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl Default for JsonBody {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl<S> FromRequest<S> for JsonBody
where
    BodyOptions: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Ok(Self::default());
        }
        if let Some(charset) = content_type_charset(req.headers()) {
            if !charset.eq_ignore_ascii_case("utf-8") {
                return Err(BodyRejection::UnsupportedCharset(charset));
            }
        }

        // Bounded by `DefaultBodyLimit`; an oversized body is a 413 rejection.
        let options = BodyOptions::from_ref(state);
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        if options.strict && !(value.is_object() || value.is_array()) {
            return Err(BodyRejection::NotObjectOrArray);
        }

        Ok(Self(value))
    }
}

/// True when the media type is `application/json`, ignoring parameters and case.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// The `charset` parameter of `content-type`, unquoted, if any.
pub fn content_type_charset(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    value.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(req: Request, strict: bool) -> Result<JsonBody, BodyRejection> {
        JsonBody::from_request(req, &BodyOptions { strict }).await
    }

    #[test]
    fn json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(is_json_content_type(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "Application/JSON; charset=utf-8".parse().unwrap(),
        );
        assert!(is_json_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert!(!is_json_content_type(&headers));
    }

    #[test]
    fn charset_parameter() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_type_charset(&headers), None);

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(content_type_charset(&headers), None);

        headers.insert(
            header::CONTENT_TYPE,
            "application/json; Charset=\"UTF-8\"".parse().unwrap(),
        );
        assert_eq!(content_type_charset(&headers).as_deref(), Some("UTF-8"));
    }

    #[tokio::test]
    async fn utf8_charset_is_accepted() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json; charset=utf-8")
            .body(Body::from(r#"{"a":1}"#))
            .unwrap();
        let JsonBody(value) = extract(req, false).await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn other_charsets_are_unsupported_media_type() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json; charset=latin1")
            .body(Body::from(r#"{"a":1}"#))
            .unwrap();
        let rejection = extract(req, false).await.unwrap_err();
        assert!(matches!(rejection, BodyRejection::UnsupportedCharset(ref c) if c == "latin1"));
        assert_eq!(
            rejection.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn view_preserves_header_order() {
        let mut headers = HeaderMap::new();
        headers.insert("x-second", "2".parse().unwrap());
        headers.insert("x-first", "1".parse().unwrap());
        headers.insert("host", "localhost:3000".parse().unwrap());

        let view = RequestView::new(&Method::GET, &headers, json!({}));
        let names: Vec<_> = view.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["x-second", "x-first", "host"]);
        assert_eq!(view.method, "GET");
    }

    #[test]
    fn duplicate_headers_are_kept_as_delivered() {
        let mut headers = HeaderMap::new();
        headers.append("x-tag", "a".parse().unwrap());
        headers.insert("accept", "*/*".parse().unwrap());
        headers.append("x-tag", "b".parse().unwrap());

        let view = RequestView::new(&Method::GET, &headers, json!({}));
        assert_eq!(
            view.headers,
            vec![
                ("x-tag".to_string(), "a".to_string()),
                ("x-tag".to_string(), "b".to_string()),
                ("accept".to_string(), "*/*".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn parses_json_object() {
        let JsonBody(value) = extract(json_request(r#"{"a":1}"#), false).await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn empty_json_body_is_empty_object() {
        let JsonBody(value) = extract(json_request(""), false).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn non_json_body_is_ignored() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "text/plain")
            .body(Body::from("{a:1}"))
            .unwrap();
        let JsonBody(value) = extract(req, false).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let rejection = extract(json_request("{a:1}"), false).await.unwrap_err();
        assert!(matches!(rejection, BodyRejection::InvalidJson(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scalars_depend_on_strict_mode() {
        let JsonBody(value) = extract(json_request("42"), false).await.unwrap();
        assert_eq!(value, json!(42));

        let rejection = extract(json_request("42"), true).await.unwrap_err();
        assert!(matches!(rejection, BodyRejection::NotObjectOrArray));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);

        let JsonBody(value) = extract(json_request("[1,2]"), true).await.unwrap();
        assert_eq!(value, json!([1, 2]));
    }
}
