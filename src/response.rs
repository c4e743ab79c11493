//! JSON responses
//!
//! A thin output interface for handing statement results (or anything else
//! serializable) to an HTTP layer. Nothing here writes to a socket; callers
//! take the content type and body and send them however they like.

use serde::Serialize;

use crate::errors::SqlHausError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=\"utf-8\"";
pub const COMPAT_CONTENT_TYPE: &str = "text/html; charset=\"utf-8\"";

/// A rendered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub content_type: &'static str,
    pub body: String,
}

pub trait Responder {
    fn respond<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Response, SqlHausError>;
}

/// Serializes payloads as JSON.
///
/// In compatibility mode (the default) the content type is reported as
/// `text/html` for clients that cannot handle `application/json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonResponder {
    pub compat: bool,
}

impl JsonResponder {
    pub fn new(compat: bool) -> Self {
        Self { compat }
    }

    pub fn content_type(&self) -> &'static str {
        if self.compat {
            COMPAT_CONTENT_TYPE
        } else {
            JSON_CONTENT_TYPE
        }
    }
}

impl Default for JsonResponder {
    fn default() -> Self {
        Self { compat: true }
    }
}

impl Responder for JsonResponder {
    fn respond<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Response, SqlHausError> {
        let body = serde_json::to_string(payload)?;
        trace_log!("Responding with {} bytes of JSON", body.len());

        Ok(Response {
            content_type: self.content_type(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_compat() {
        let response = JsonResponder::default()
            .respond(&json!({"sql": "SELECT 1"}))
            .unwrap();

        assert_eq!(response.content_type, "text/html; charset=\"utf-8\"");
        assert_eq!(response.body, r#"{"sql":"SELECT 1"}"#);
    }

    #[test]
    fn test_json_content_type() {
        let response = JsonResponder::new(false).respond("ok").unwrap();

        assert_eq!(response.content_type, "application/json; charset=\"utf-8\"");
        assert_eq!(response.body, "\"ok\"");
    }
}
