//! Конфигурация сервера реестра.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Адрес для прослушивания (например "0.0.0.0:8080")
    pub listen: String,

    /// URL подключения к БД (sqlite или postgres)
    pub db_url: String,

    /// Режим TLS
    pub tls_mode: TlsMode,

    /// Домен для SAN самоподписанного сертификата
    pub domain: String,

    /// Путь к PEM-сертификату (режим cert)
    pub tls_cert: String,

    /// Путь к PEM-ключу (режим cert)
    pub tls_key: String,

    /// Внешний базовый URL, от которого строятся ссылки на картинки
    pub public_base_url: String,

    /// Директория с картинками серверов
    pub images_dir: String,

    /// TCP-порты, которые пробует ping
    pub probe_ports: Vec<u16>,

    /// Бюджет времени на один ping
    pub ping_timeout: Duration,

    /// Лимит запросов в минуту на IP клиента, 0 отключает ограничение
    pub rate_limit_per_minute: u32,

    /// Заполнить пустую базу демо-серверами
    pub seed: bool,
}

#[derive(Debug, Clone)]
pub enum TlsMode {
    None,
    SelfSigned,
    Cert,
}

impl std::str::FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TlsMode::None),
            "self-signed" | "selfsigned" => Ok(TlsMode::SelfSigned),
            "cert" | "pem" => Ok(TlsMode::Cert),
            other => Err(format!(
                "Неизвестный режим TLS: {other}. Допустимые: none, self-signed, cert"
            )),
        }
    }
}

impl std::fmt::Display for TlsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TlsMode::None => write!(f, "none"),
            TlsMode::SelfSigned => write!(f, "self-signed"),
            TlsMode::Cert => write!(f, "cert"),
        }
    }
}

/// Разобрать список портов вида "7,22,80".
pub fn parse_ports(s: &str) -> Result<Vec<u16>, String> {
    let ports = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<u16>()
                .map_err(|_| format!("Некорректный порт: {p}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ports.is_empty() {
        return Err("Список портов пуст".to_string());
    }
    Ok(ports)
}
