//! Standardized API response envelopes.

use ideaverse_core::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dto::common::PageWindow;

fn default_code() -> u16 {
    200
}

/// Status block carried by every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub success: bool,
    pub message: String,
    #[serde(default = "default_code")]
    pub code: u16,
}

impl ResponseStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: 200,
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code,
        }
    }
}

/// Number of pages needed for `total` items, `limit` per page.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub status: ResponseStatus,
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            status: ResponseStatus::ok("Success"),
            data,
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }

    /// Build from a normalized `(limit, skip)` window.
    pub fn from_window(data: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self::new(data, window.page(), u64::from(window.limit), total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            status: self.status,
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Single-item envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
}

impl<T> StandardResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: ResponseStatus::ok("Success"),
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::ok(message),
            data,
        }
    }
}

/// Failure envelope. `error` holds free-form diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub error: Option<Map<String, Value>>,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::failure(code, message),
            error: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.error
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// 422 with one `{field, reason}` entry per rejected field.
    pub fn validation(err: &ValidationError) -> Self {
        let fields = serde_json::to_value(err.fields()).unwrap_or(Value::Array(Vec::new()));
        Self::new(422, "Validation Failed").with_detail("fields", fields)
    }
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        Self::validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 100), 1);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn paginated_envelope_shape() {
        let page = PaginatedResponse::new(vec!["a", "b"], 3, 10, 25);
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "status": {"success": true, "message": "Success", "code": 200},
                "data": ["a", "b"],
                "page": 3,
                "limit": 10,
                "total": 25,
                "total_pages": 3,
            })
        );
    }

    #[test]
    fn from_window_derives_page() {
        let window = PageWindow { limit: 10, skip: 20 };
        let page = PaginatedResponse::from_window(vec![1, 2, 3], window, 23);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.map(|n| n * 2).data, vec![2, 4, 6]);
    }

    #[test]
    fn status_code_defaults_to_200() {
        let status: ResponseStatus =
            serde_json::from_value(json!({"success": true, "message": "ok"})).unwrap();
        assert_eq!(status.code, 200);
    }

    #[test]
    fn validation_error_envelope() {
        let err = ValidationError::single("password", "Password must contain at least one number");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["status"]["success"], json!(false));
        assert_eq!(body["status"]["code"], json!(422));
        assert_eq!(
            body["error"]["fields"],
            json!([{"field": "password", "reason": "Password must contain at least one number"}])
        );
    }

    #[test]
    fn error_without_detail_serializes_null() {
        let body = serde_json::to_value(ErrorResponse::new(500, "Internal Server Error")).unwrap();
        assert_eq!(body["error"], Value::Null);
    }
}
