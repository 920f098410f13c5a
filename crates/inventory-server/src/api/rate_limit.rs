//! Необязательное ограничение частоты запросов: token bucket на IP соединения.
//!
//! Включается флагом `--rate-limit N`. Заголовки вроде X-Forwarded-For не
//! учитываются: ключ берётся только из `ConnectInfo`.

use crate::error::AppError;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Размер таблицы, после которого вычищаются полные корзины.
const SWEEP_THRESHOLD: usize = 1000;

struct Bucket {
    tokens: f64,
    refilled: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<IpAddr, Bucket>>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiter {
    /// До `burst` запросов подряд, затем `burst` за каждый `period`.
    pub fn new(burst: u32, period: Duration) -> Self {
        let capacity = f64::from(burst.max(1));
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            capacity,
            refill_per_sec: capacity / period.as_secs_f64().max(f64::EPSILON),
        }
    }

    /// Лимит в минуту. `None` при нуле: ограничение выключено.
    pub fn per_minute(max_requests: u32) -> Option<Self> {
        (max_requests > 0).then(|| Self::new(max_requests, Duration::from_secs(60)))
    }

    /// Списать один запрос с корзины `client`. `false` если корзина пуста.
    pub async fn check(&self, client: IpAddr) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        if buckets.len() > SWEEP_THRESHOLD {
            // Полная корзина ничем не отличается от новой
            buckets.retain(|_, b| self.refill(b, now) < self.capacity);
        }

        let bucket = buckets.entry(client).or_insert(Bucket {
            tokens: self.capacity,
            refilled: now,
        });
        bucket.tokens = self.refill(bucket, now);
        bucket.refilled = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&self, bucket: &Bucket, now: Instant) -> f64 {
        let elapsed = now.duration_since(bucket.refilled).as_secs_f64();
        (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity)
    }
}

/// Запросы без `ConnectInfo` (вызовы внутри процесса) не ограничиваются.
pub async fn rate_limit_middleware(
    rate_limiter: RateLimiter,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(client) = peer_ip(&req) {
        if !rate_limiter.check(client).await {
            tracing::warn!("Превышен лимит запросов для {client}");
            return Err(AppError::TooManyRequests);
        }
    }

    Ok(next.run(req).await)
}

fn peer_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
}
