//! Success envelope shared by API handlers.
//!
//! Successful responses carry `{"code": 0}` plus an optional `msg` and an
//! optional `data` payload. Error bodies use the same `code` field with a
//! non-zero value (see [`crate::error::code`]).

use serde::Serialize;

/// Standard `{ "code": 0, "msg"?, "data"? }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(Resp::data(NamePayload { name })))
/// ```
#[derive(Debug, Serialize)]
pub struct Resp<T: Serialize = serde_json::Value> {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Resp {
    /// Bare success: `{"code": 0}`.
    pub fn ok() -> Self {
        Self {
            code: 0,
            msg: None,
            data: None,
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: Some(msg.into()),
            data: None,
        }
    }
}

impl<T: Serialize> Resp<T> {
    pub fn data(data: T) -> Self {
        Self {
            code: 0,
            msg: None,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_omits_empty_fields() {
        assert_eq!(serde_json::to_value(Resp::ok()).unwrap(), json!({"code": 0}));
        assert_eq!(
            serde_json::to_value(Resp::message("hi")).unwrap(),
            json!({"code": 0, "msg": "hi"})
        );
        assert_eq!(
            serde_json::to_value(Resp::data(json!({"name": "bob"}))).unwrap(),
            json!({"code": 0, "data": {"name": "bob"}})
        );
    }
}
