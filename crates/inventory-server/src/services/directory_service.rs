//! Сервис реестра серверов: создание, чтение, обновление, удаление, ping.

use crate::error::AppError;
use crate::probe::Prober;
use crate::services::image_catalog::{ImageCatalog, IMAGE_NAMES};
use crate::services::server_repo::{self, NewRecord};
use inventory_entities::servers::{Model, Status};
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Бюджет времени на проверку доступности по умолчанию.
pub const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Размер страницы списка по умолчанию.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Верхняя граница размера страницы.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Данные для создания сервера. `imageUrl` назначает сервис.
pub struct NewServer {
    pub ip_address: String,
    pub name: Option<String>,
    pub memory: Option<String>,
    pub server_type: Option<String>,
    pub status: Option<Status>,
}

/// Реестр серверов поверх хранилища и проверки доступности.
#[derive(Clone)]
pub struct ServerDirectory {
    db: DatabaseConnection,
    prober: Arc<dyn Prober>,
    images: ImageCatalog,
    ping_timeout: Duration,
}

impl ServerDirectory {
    pub fn new(db: DatabaseConnection, prober: Arc<dyn Prober>, images: ImageCatalog) -> Self {
        Self {
            db,
            prober,
            images,
            ping_timeout: PING_TIMEOUT,
        }
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn images(&self) -> &ImageCatalog {
        &self.images
    }

    /// Создать сервер. IP обязателен и уникален.
    pub async fn create(&self, data: NewServer) -> Result<Model, AppError> {
        let ip_address = require_ip(&data.ip_address)?;
        info!("Создание сервера {ip_address} ({:?})", data.name);

        if server_repo::find_by_ip_address(&self.db, &ip_address)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Сервер с IP {ip_address} уже существует"
            )));
        }

        let server = server_repo::insert(
            &self.db,
            NewRecord {
                ip_address,
                name: data.name,
                memory: data.memory,
                server_type: data.server_type,
                image_url: self.images.random_url()?,
                status: data.status.unwrap_or_default(),
            },
        )
        .await?;

        Ok(server)
    }

    /// Получить сервер по id.
    pub async fn get(&self, id: i32) -> Result<Model, AppError> {
        info!("Получение сервера по id: {id}");
        server_repo::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Сервер не найден: {id}")))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Model>, AppError> {
        Ok(server_repo::find_by_name(&self.db, name).await?)
    }

    /// Первая страница серверов, не больше `limit` записей.
    pub async fn list(&self, limit: u64) -> Result<Vec<Model>, AppError> {
        if limit == 0 {
            return Err(AppError::Validation(
                "limit должен быть положительным".into(),
            ));
        }
        let limit = limit.min(MAX_PAGE_SIZE);
        info!("Получение списка серверов (limit {limit})");

        Ok(server_repo::first_page(&self.db, limit).await?)
    }

    /// Полная замена полей существующего сервера.
    /// `imageUrl` берётся из запроса как есть.
    pub async fn update(&self, mut server: Model) -> Result<Model, AppError> {
        server.ip_address = require_ip(&server.ip_address)?;
        info!("Обновление сервера {} ({})", server.id, server.ip_address);

        if server_repo::find_by_id(&self.db, server.id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Сервер не найден: {}",
                server.id
            )));
        }

        if let Some(other) = server_repo::find_by_ip_address(&self.db, &server.ip_address).await? {
            if other.id != server.id {
                return Err(AppError::Conflict(format!(
                    "IP {} уже занят сервером {}",
                    server.ip_address, other.id
                )));
            }
        }

        self.persist(server).await
    }

    /// Удалить сервер. Отсутствующий id не считается ошибкой.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let removed = server_repo::delete_by_id(&self.db, id).await?;
        info!("Удаление сервера {id} (удалено строк: {removed})");
        Ok(true)
    }

    /// Проверить доступность сервера и сохранить статус.
    ///
    /// Ошибка проверки возвращается вызывающему, сохранённый статус
    /// при этом не меняется.
    pub async fn ping(&self, ip_address: &str) -> Result<Model, AppError> {
        let ip_address = ip_address.trim();
        info!("Ping сервера {ip_address}");

        let mut server = server_repo::find_by_ip_address(&self.db, ip_address)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Сервер с IP {ip_address} не найден")))?;

        let reachable = self
            .prober
            .probe(ip_address, self.ping_timeout)
            .await
            .inspect_err(|e| warn!("Ping {ip_address} не выполнен: {e}"))?;

        server.status = Status::from_reachable(reachable);
        self.persist(server).await
    }

    /// Добавить демо-серверы, которых ещё нет (по IP или имени).
    /// Возвращает число добавленных записей.
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        let mut inserted = 0;

        for (index, (ip, name, memory, server_type)) in DEMO_SERVERS.iter().enumerate() {
            if server_repo::find_by_ip_address(&self.db, ip).await?.is_some()
                || self.find_by_name(name).await?.is_some()
            {
                continue;
            }

            let image_name = IMAGE_NAMES[index % IMAGE_NAMES.len()];
            server_repo::insert(
                &self.db,
                NewRecord {
                    ip_address: ip.to_string(),
                    name: Some(name.to_string()),
                    memory: Some(memory.to_string()),
                    server_type: Some(server_type.to_string()),
                    image_url: self.images.url_for(image_name)?,
                    status: Status::Up,
                },
            )
            .await?;
            inserted += 1;
        }

        info!("Демо-данные: добавлено {inserted} серверов");
        Ok(inserted)
    }

    async fn persist(&self, server: Model) -> Result<Model, AppError> {
        let id = server.id;
        server_repo::update(&self.db, server)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::NotFound(format!("Сервер не найден: {id}")),
                other => other.into(),
            })
    }
}

/// (IP, имя, память, тип)
const DEMO_SERVERS: [(&str, &str, &str, &str); 4] = [
    ("192.168.1.160", "Ubuntu Linux", "16 GB", "Personal PC"),
    ("192.168.1.58", "Dell Tower", "16 GB", "Personal PC"),
    ("192.168.1.21", "Web Server", "32 GB", "Personal PC"),
    ("192.168.1.14", "Mail Server", "64 GB", "Personal PC"),
];

fn require_ip(ip_address: &str) -> Result<String, AppError> {
    let ip_address = ip_address.trim();
    if ip_address.is_empty() {
        return Err(AppError::Validation(
            "IP-адрес не может быть пустым".into(),
        ));
    }
    Ok(ip_address.to_string())
}
