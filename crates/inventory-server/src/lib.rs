//! Реестр серверов: CRUD по записям серверов и проверка доступности (ping).

pub mod api;
pub mod config;
pub mod error;
pub mod probe;
pub mod services;
pub mod tls;


use api::rate_limit::RateLimiter;
use api::AppState;
use config::ServerConfig;
use inventory_migration::{Migrator, MigratorTrait};
use probe::TcpProber;
use sea_orm::{Database, DatabaseConnection};
use services::directory_service::ServerDirectory;
use services::image_catalog::ImageCatalog;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Запустить сервер реестра.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    // 1. Подключение к БД
    info!("Подключение к базе данных: {}", config.db_url);
    let db: DatabaseConnection = Database::connect(&config.db_url).await?;

    // 2. Автоматические миграции
    info!("Выполнение миграций...");
    Migrator::up(&db, None).await?;

    // 3. Реестр с TCP-проверкой доступности
    let images = ImageCatalog::new(&config.public_base_url, &config.images_dir)?;
    let prober = Arc::new(TcpProber::new(config.probe_ports.clone()));
    let directory =
        ServerDirectory::new(db, prober, images).with_ping_timeout(config.ping_timeout);

    if config.seed {
        directory.seed_defaults().await?;
    }

    // 4. Маршрутизатор
    let state = AppState {
        directory,
        rate_limiter: RateLimiter::per_minute(config.rate_limit_per_minute),
    };
    if let Some(n) = std::num::NonZeroU32::new(config.rate_limit_per_minute) {
        info!("Ограничение частоты: {n} запросов в минуту на IP");
    }
    let app = api::build_router(state);

    // 5. Graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Получен сигнал завершения, останавливаю сервер...");
        let _ = shutdown_tx.send(true);
    });

    // 6. Запуск сервера
    info!(
        "Реестр серверов запущен (TLS: {}, порты ping: {:?}, таймаут ping: {} мс)",
        config.tls_mode,
        config.probe_ports,
        config.ping_timeout.as_millis()
    );
    tls::serve(&config, app, shutdown_rx).await?;

    info!("Реестр серверов остановлен");
    Ok(())
}
