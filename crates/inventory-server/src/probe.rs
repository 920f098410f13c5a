//! Проверка сетевой доступности хоста (ping).
//!
//! Без raw-сокетов ICMP недоступен, поэтому `TcpProber` пытается открыть
//! TCP-соединение на заданные порты. Любой ответ хоста (в том числе RST на
//! закрытый порт) означает, что хост доступен.

use async_trait::async_trait;
use std::future::Future;
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{lookup_host, TcpStream};
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("не удалось разрешить адрес {addr}: {reason}")]
    Resolve { addr: String, reason: String },

    #[error("ошибка транспорта для {addr}: {reason}")]
    Transport { addr: String, reason: String },
}

/// Проверка доступности по адресу.
///
/// `Ok(false)` означает, что хост не ответил за `timeout`.
/// Ошибка возвращается только если проверку невозможно выполнить.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, ip_address: &str, timeout: Duration) -> Result<bool, ProbeError>;
}

/// Одна попытка соединения с `SocketAddr`.
pub type ConnectFuture = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

/// Способ открыть соединение. В рабочем режиме это `TcpStream::connect`.
pub type Connector = Arc<dyn Fn(SocketAddr) -> ConnectFuture + Send + Sync>;

/// Проверка через TCP connect на список портов.
///
/// Все попытки (адрес × порт) запускаются одновременно: зависший порт
/// не отнимает время у остальных.
#[derive(Clone)]
pub struct TcpProber {
    ports: Vec<u16>,
    connector: Connector,
}

impl TcpProber {
    pub fn new(ports: Vec<u16>) -> Self {
        Self::with_connector(
            ports,
            Arc::new(|target: SocketAddr| -> ConnectFuture {
                Box::pin(async move { TcpStream::connect(target).await.map(drop) })
            }),
        )
    }

    pub fn with_connector(ports: Vec<u16>, connector: Connector) -> Self {
        Self { ports, connector }
    }

    async fn probe_ports(&self, host: &str) -> Result<bool, ProbeError> {
        let addrs: Vec<SocketAddr> = lookup_host((host, 0))
            .await
            .map_err(|e| ProbeError::Resolve {
                addr: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(ProbeError::Resolve {
                addr: host.to_string(),
                reason: "адрес не найден".to_string(),
            });
        }

        // JoinSet отменяет незавершённые попытки при drop, в том числе по таймауту
        let mut attempts = JoinSet::new();
        for addr in &addrs {
            for &port in &self.ports {
                let target = SocketAddr::new(addr.ip(), port);
                let connect = (self.connector)(target);
                attempts.spawn(async move { (target, connect.await) });
            }
        }

        let mut failure = None;
        while let Some(joined) = attempts.join_next().await {
            let Ok((target, result)) = joined else {
                continue;
            };
            match result {
                Ok(()) => return Ok(true),
                Err(e) => match e.kind() {
                    ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset => return Ok(true),
                    ErrorKind::HostUnreachable
                    | ErrorKind::NetworkUnreachable
                    | ErrorKind::TimedOut => {
                        debug!("{target} не отвечает: {e}");
                    }
                    _ => {
                        failure.get_or_insert(ProbeError::Transport {
                            addr: target.to_string(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        // Ответ хотя бы одного порта важнее ошибки транспорта на другом
        match failure {
            Some(e) => Err(e),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, ip_address: &str, timeout: Duration) -> Result<bool, ProbeError> {
        let host = ip_address.trim();
        if host.is_empty() {
            return Err(ProbeError::Resolve {
                addr: ip_address.to_string(),
                reason: "пустой адрес".to_string(),
            });
        }

        // Таймаут покрывает и разрешение имени, и все попытки соединения
        match tokio::time::timeout(timeout, self.probe_ports(host)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("{host}: нет ответа за {} мс", timeout.as_millis());
                Ok(false)
            }
        }
    }
}
