//! Единый конверт ответа API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Конверт, в который завёрнут каждый ответ `/server/*`.
/// Пустые поля не сериализуются.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub time_stamp: DateTime<Utc>,
    pub status_code: u16,
    /// "OK", "CREATED", "NOT_FOUND", ...
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            time_stamp: Utc::now(),
            status_code: status.as_u16(),
            status: status_label(status),
            reason: None,
            message: message.into(),
            developer_message: None,
            data: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    /// Ответ об ошибке: `reason` содержит стандартную фразу HTTP-статуса.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let mut response = Self::new(status, message);
        response.reason = status.canonical_reason().map(str::to_string);
        response
    }

    /// Добавить значение в `data` под ключом `key`.
    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn with_developer_message(mut self, message: impl Into<String>) -> Self {
        self.developer_message = Some(message.into());
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// 404 Not Found -> "NOT_FOUND".
fn status_label(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|r| r.to_uppercase().replace([' ', '-'], "_"))
        .unwrap_or_else(|| status.as_u16().to_string())
}
