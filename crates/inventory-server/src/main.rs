//! Точка входа реестра серверов.

use clap::Parser;
use inventory_server::config::{parse_ports, ServerConfig, TlsMode};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "inventory-server",
    about = "Реестр серверов с проверкой доступности по сети"
)]
struct Cli {
    /// Адрес для прослушивания (host:port)
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// URL базы данных
    #[arg(
        long,
        default_value = "sqlite:./inventory.db?mode=rwc",
        env = "DATABASE_URL"
    )]
    db_url: String,

    /// Режим TLS: none, self-signed, cert
    #[arg(long, default_value = "none")]
    tls_mode: String,

    /// Домен для SAN самоподписанного сертификата
    #[arg(long, default_value = "localhost")]
    domain: String,

    /// PEM-сертификат для режима cert
    #[arg(long, default_value = "/etc/inventory/tls/cert.pem")]
    tls_cert: String,

    /// PEM-ключ для режима cert
    #[arg(long, default_value = "/etc/inventory/tls/key.pem")]
    tls_key: String,

    /// Внешний URL сервиса для ссылок на картинки
    #[arg(long, default_value = "http://localhost:8080", env = "PUBLIC_BASE_URL")]
    public_base_url: String,

    /// Директория с картинками серверов
    #[arg(long, default_value = "./images", env = "IMAGES_DIR")]
    images_dir: String,

    /// TCP-порты для ping через запятую
    #[arg(long, default_value = "7")]
    probe_ports: String,

    /// Таймаут ping в миллисекундах
    #[arg(long, default_value_t = 10_000)]
    ping_timeout_ms: u64,

    /// Лимит запросов в минуту на IP (0 = без ограничения)
    #[arg(long, env = "RATE_LIMIT", default_value_t = 0)]
    rate_limit: u32,

    /// Добавить демо-серверы при запуске
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логгера
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let tls_mode: TlsMode = cli
        .tls_mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let probe_ports = parse_ports(&cli.probe_ports).map_err(|e| anyhow::anyhow!(e))?;

    if cli.ping_timeout_ms == 0 {
        anyhow::bail!("--ping-timeout-ms должен быть больше нуля");
    }

    let config = ServerConfig {
        listen: cli.listen,
        db_url: cli.db_url,
        tls_mode,
        domain: cli.domain,
        tls_cert: cli.tls_cert,
        tls_key: cli.tls_key,
        public_base_url: cli.public_base_url,
        images_dir: cli.images_dir,
        probe_ports,
        ping_timeout: Duration::from_millis(cli.ping_timeout_ms),
        rate_limit_per_minute: cli.rate_limit,
        seed: cli.seed,
    };

    inventory_server::run(config).await
}
