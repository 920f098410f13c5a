//! Маршруты серверов: список, ping, создание, обновление, получение, удаление, картинки.

use crate::api::envelope::ApiResponse;
use crate::api::AppState;
use crate::error::AppError;
use crate::services::directory_service::{NewServer, DEFAULT_PAGE_SIZE};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use inventory_entities::servers::{Model, Status};
use serde::Deserialize;
use serde_json::json;

// ── Типы запросов ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u64>,
}

/// Тело POST /server/save. `imageUrl` и `id` назначаются сервером.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveServerRequest {
    #[serde(default)]
    pub ip_address: String,
    pub name: Option<String>,
    pub memory: Option<String>,
    #[serde(rename = "type")]
    pub server_type: Option<String>,
    pub status: Option<Status>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/server/list", get(list_servers))
        .route("/server/ping/{ip_address}", get(ping_server))
        .route("/server/save", post(save_server))
        .route("/server/update", put(update_server))
        .route("/server/get/{id}", get(get_server))
        .route("/server/delete/{id}", delete(delete_server))
        .route("/server/image/{file_name}", get(get_server_image))
}

// ── Обработчики ──────────────────────────────────────────────────────────────

/// GET /server/list?limit=N
async fn list_servers(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<ApiResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let servers = state
        .directory
        .list(params.limit.unwrap_or(DEFAULT_PAGE_SIZE))
        .await?;

    Ok(ApiResponse::ok("Servers retrieved").with_data("servers", json!(servers)))
}

/// GET /server/ping/{ip_address}: сообщение зависит от полученного статуса.
async fn ping_server(
    State(state): State<AppState>,
    ip_address: Result<Path<String>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let Path(ip_address) = ip_address.map_err(path_error)?;
    let server = state.directory.ping(&ip_address).await?;

    let message = match server.status {
        Status::Up => "Ping success",
        Status::Down => "Ping failed",
    };
    Ok(ApiResponse::ok(message).with_data("server", json!(server)))
}

/// POST /server/save
async fn save_server(
    State(state): State<AppState>,
    payload: Result<Json<SaveServerRequest>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let server = state
        .directory
        .create(NewServer {
            ip_address: req.ip_address,
            name: req.name,
            memory: req.memory,
            server_type: req.server_type,
            status: req.status,
        })
        .await?;
    tracing::info!("Сервер создан: {} ({})", server.id, server.ip_address);

    Ok(ApiResponse::new(StatusCode::CREATED, "Server created").with_data("server", json!(server)))
}

/// PUT /server/update: полная запись, включая id.
async fn update_server(
    State(state): State<AppState>,
    payload: Result<Json<Model>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(server) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let server = state.directory.update(server).await?;
    Ok(ApiResponse::ok("Server updated").with_data("server", json!(server)))
}

/// GET /server/get/{id}
async fn get_server(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let Path(id) = id.map_err(path_error)?;
    let server = state.directory.get(id).await?;
    Ok(ApiResponse::ok("Server retrieved").with_data("server", json!(server)))
}

/// DELETE /server/delete/{id}: повторное удаление тоже успешно.
async fn delete_server(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let Path(id) = id.map_err(path_error)?;
    let deleted = state.directory.delete(id).await?;
    Ok(ApiResponse::ok("Server deleted").with_data("deleted", json!(deleted)))
}

/// GET /server/image/{file_name}: PNG из директории картинок.
async fn get_server_image(
    State(state): State<AppState>,
    file_name: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(file_name) = file_name.map_err(path_error)?;
    let bytes = state.directory.images().read(&file_name).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// Нераспознанный сегмент пути отдаётся как ошибка валидации в общем конверте.
fn path_error(e: PathRejection) -> AppError {
    AppError::Validation(e.body_text())
}
