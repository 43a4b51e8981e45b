//! Pure functions for shaping HTTP responses returned by a function handler.

use serde::Serialize;

/// Response shape understood by API gateways in front of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ResponseBody<'a, I: ?Sized, R: ?Sized> {
    resp: String,
    input: &'a I,
    result: &'a R,
}

/// Human-readable description of a status code.
///
/// Known codes render as `HTTP Resp: <code> - <name>`, anything else as
/// `HTTP Resp: <code>`.
pub fn status_description(status_code: u16) -> String {
    let name = match status_code {
        200 => Some("OK"),
        201 => Some("Created"),
        400 => Some("Bad Request"),
        500 => Some("Internal Server Error"),
        _ => None,
    };

    match name {
        Some(name) => format!("HTTP Resp: {} - {}", status_code, name),
        None => format!("HTTP Resp: {}", status_code),
    }
}

/// Builds `{ statusCode, body }` where `body` is `{"resp","input","result"}` as JSON text.
///
/// # Examples
///
/// ```
/// use cloudkit_core::http::format_http_response;
/// use serde_json::json;
///
/// let response = format_http_response(200, &json!({"a": 1}), &json!({"b": 2})).unwrap();
/// assert_eq!(response.status_code, 200);
/// assert_eq!(
///     response.body,
///     r#"{"resp":"HTTP Resp: 200 - OK","input":{"a":1},"result":{"b":2}}"#
/// );
/// ```
pub fn format_http_response<I, R>(
    status_code: u16,
    input: &I,
    result: &R,
) -> Result<HttpResponse, serde_json::Error>
where
    I: Serialize + ?Sized,
    R: Serialize + ?Sized,
{
    let body = serde_json::to_string(&ResponseBody {
        resp: status_description(status_code),
        input,
        result,
    })?;

    Ok(HttpResponse { status_code, body })
}
