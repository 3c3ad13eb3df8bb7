//! Web 层错误
//!
//! 绑定失败发生在处理器调用之前，属于分发层级错误，统一转换为
//! [`ErrorResponse`] JSON 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use named_binding_core::BindingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Web 层错误类型
#[derive(Error, Debug)]
pub enum WebError {
    /// 处理器参数无法解析 - 500 Internal Server Error
    #[error(transparent)]
    UnresolvedParameter(#[from] BindingError),
}

impl WebError {
    /// 获取错误对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::UnresolvedParameter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 获取错误详情（用于 JSON 响应）
    pub fn details(&self) -> Option<Value> {
        match self {
            WebError::UnresolvedParameter(e) => Some(serde_json::json!({
                "parameter": e.parameter(),
                "available": e.available(),
            })),
        }
    }

    /// 转换为带请求路径的错误响应
    pub fn to_error_response(&self, path: &str) -> ErrorResponse {
        let status = self.status_code();
        let mut response = ErrorResponse::new(
            status,
            status.canonical_reason().unwrap_or("Unknown Error").to_string(),
            self.to_string(),
            path.to_string(),
        );
        response.details = self.details();
        response
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        self.to_error_response("unknown").into_response()
    }
}

/// 统一的错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: String, message: String, path: String) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error,
            message,
            path,
            details: None,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
