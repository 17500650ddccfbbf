//! Echo response formatting.
//!
//! The rendered text is a pure function of the `RequestView`: identical
//! input always yields byte-identical output.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::RequestView;

/// First line of every echo response.
pub const INTRO: &str = "Welcome to our demo API, here are the details of your request:";

/// Render the plain-text description of a request.
///
/// ```text
/// <intro>
///
/// Headers:
/// name: value
///
/// Method:
/// GET
///
/// Body:
/// {}
/// ```
pub fn render(view: &RequestView) -> String {
    let headers: String = view
        .headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\n"))
        .collect();

    // `{:#}` pretty-prints a JSON value with two-space indentation.
    format!(
        "{INTRO}\n\nHeaders:\n{headers}\nMethod:\n{method}\n\nBody:\n{body:#}\n",
        method = view.method,
        body = view.body,
    )
}

/// A 200 plain-text echo of the request.
#[derive(Debug, Clone)]
pub struct EchoResponse(pub String);

impl From<&RequestView> for EchoResponse {
    fn from(view: &RequestView) -> Self {
        Self(render(view))
    }
}

impl IntoResponse for EchoResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0,
        )
            .into_response()
    }
}
