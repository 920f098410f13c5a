//! Типы ошибок реестра серверов.

use crate::api::envelope::ApiResponse;
use crate::probe::ProbeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Ошибка валидации: {0}")]
    Validation(String),

    #[error("Не найдено: {0}")]
    NotFound(String),

    #[error("Конфликт: {0}")]
    Conflict(String),

    #[error("Проверка доступности не выполнена: {0}")]
    Probe(#[from] ProbeError),

    #[error("Слишком много запросов")]
    TooManyRequests,

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Probe(_) => StatusCode::BAD_GATEWAY,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        let mut body = ApiResponse::error(status, self.to_string());
        if let AppError::Probe(e) = &self {
            body = body.with_developer_message(format!("{e:?}"));
        }
        body.into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(m)) => AppError::Conflict(m),
            _ => AppError::Internal(e.to_string()),
        }
    }
}
