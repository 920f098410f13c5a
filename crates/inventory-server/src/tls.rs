//! Запуск HTTP(S): без TLS, самоподписанный сертификат или PEM-файлы.

use crate::config::{ServerConfig, TlsMode};
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Интервал перечитывания PEM-файлов в режиме cert.
const CERT_RELOAD_INTERVAL: Duration = Duration::from_secs(12 * 3600);

/// Сколько ждать завершения активных соединений при остановке.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(10);

/// Запустить сервер в нужном TLS-режиме.
pub async fn serve(
    config: &ServerConfig,
    app: Router,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config.listen.parse()?;
    match &config.tls_mode {
        TlsMode::None => serve_plain(addr, app, shutdown_rx).await,
        TlsMode::SelfSigned => serve_self_signed(addr, &config.domain, app, shutdown_rx).await,
        TlsMode::Cert => serve_cert(addr, &config.tls_cert, &config.tls_key, app, shutdown_rx).await,
    }
}

async fn serve_plain(
    addr: SocketAddr,
    app: Router,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    info!("Запуск HTTP сервера на {addr} (без TLS)");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    // ConnectInfo нужен rate limiter'у для адреса клиента, если он включён
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { wait_shutdown(&mut shutdown_rx).await })
    .await?;
    Ok(())
}

async fn serve_self_signed(
    addr: SocketAddr,
    domain: &str,
    app: Router,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    info!("Запуск HTTPS сервера на {addr} (самоподписанный сертификат для {domain})");

    let subject_alt_names = vec![domain.to_string(), "localhost".to_string()];
    let certified_key = rcgen::generate_simple_self_signed(subject_alt_names)
        .map_err(|e| anyhow::anyhow!("Ошибка генерации сертификата: {e}"))?;

    let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem(
        certified_key.cert.pem().into_bytes(),
        certified_key.signing_key.serialize_pem().into_bytes(),
    )
    .await?;

    axum_server::bind_rustls(addr, rustls_config)
        .handle(shutdown_handle(shutdown_rx))
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}

async fn serve_cert(
    addr: SocketAddr,
    cert_path: &str,
    key_path: &str,
    app: Router,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    info!("Запуск HTTPS сервера на {addr} (сертификат: {cert_path}, ключ: {key_path})");

    let rustls_config =
        axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;

    let reload_config = rustls_config.clone();
    let reload_cert = cert_path.to_string();
    let reload_key = key_path.to_string();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CERT_RELOAD_INTERVAL);
        interval.tick().await; // первый тик срабатывает сразу
        loop {
            interval.tick().await;
            match reload_config
                .reload_from_pem_file(&reload_cert, &reload_key)
                .await
            {
                Ok(()) => tracing::info!("TLS сертификаты перезагружены"),
                Err(e) => tracing::error!("Ошибка перезагрузки TLS сертификатов: {e}"),
            }
        }
    });

    axum_server::bind_rustls(addr, rustls_config)
        .handle(shutdown_handle(shutdown_rx))
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}

/// Handle axum-server, который плавно останавливается по сигналу из `watch`.
fn shutdown_handle(mut shutdown_rx: watch::Receiver<bool>) -> axum_server::Handle {
    let handle = axum_server::Handle::new();
    let handle_shutdown = handle.clone();
    tokio::spawn(async move {
        wait_shutdown(&mut shutdown_rx).await;
        handle_shutdown.graceful_shutdown(Some(GRACEFUL_TIMEOUT));
    });
    handle
}

async fn wait_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    while !*shutdown_rx.borrow_and_update() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
}
