//! 统一响应信封

use serde::Serialize;

/// 所有接口共用的响应信封
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// 无数据的成功响应
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(ErrorDetail {
                detail: detail.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = ApiResponse::ok("done", json!({"id": "1"}));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "done",
                "data": {"id": "1"},
                "errors": null,
            })
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = ApiResponse::failure("post not found", "post not found");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "post not found",
                "data": null,
                "errors": {"detail": "post not found"},
            })
        );
    }
}
