//! Per-IP rate limiting middleware
//!
//! Redis-backed fixed-window counters keyed by client IP. Two instances
//! are mounted: a generous API-wide limit and a stricter one on the auth
//! scope. If Redis is unreachable the limiter fails open - availability
//! over strictness - and logs the degradation.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use redis::AsyncCommands;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sgms_core::errors::DomainError;

use crate::error::ApiError;

/// Rate limiter middleware factory
pub struct RateLimiter {
    redis_client: Arc<redis::Client>,
    /// Key prefix separating the scopes ("api", "auth")
    scope: &'static str,
    /// Maximum requests per window
    limit: u32,
    /// Window length in seconds
    window_seconds: u64,
}

impl RateLimiter {
    /// Create a rate limiter over an existing Redis client
    pub fn new(
        redis_client: Arc<redis::Client>,
        scope: &'static str,
        limit: u32,
        window_seconds: u64,
    ) -> Self {
        Self {
            redis_client,
            scope,
            limit,
            window_seconds,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            redis_client: Arc::clone(&self.redis_client),
            scope: self.scope,
            limit: self.limit,
            window_seconds: self.window_seconds,
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    redis_client: Arc<redis::Client>,
    scope: &'static str,
    limit: u32,
    window_seconds: u64,
}

/// Outcome of a window check
enum WindowCheck {
    Allowed,
    Exceeded { retry_after_seconds: u64 },
}

async fn check_window(
    client: &redis::Client,
    key: &str,
    limit: u32,
    window_seconds: u64,
) -> Result<WindowCheck, redis::RedisError> {
    let mut conn = client.get_multiplexed_async_connection().await?;

    let count: Option<u32> = conn.get(key).await?;
    match count {
        Some(current) if current >= limit => {
            let ttl: i64 = conn.ttl(key).await?;
            Ok(WindowCheck::Exceeded {
                retry_after_seconds: ttl.max(0) as u64,
            })
        }
        Some(_) => {
            let _: u32 = conn.incr(key, 1u32).await?;
            Ok(WindowCheck::Allowed)
        }
        None => {
            // First request opens the window
            let _: () = conn.set_ex(key, 1u32, window_seconds).await?;
            Ok(WindowCheck::Allowed)
        }
    }
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let client = Arc::clone(&self.redis_client);
        let scope = self.scope;
        let limit = self.limit;
        let window_seconds = self.window_seconds;

        Box::pin(async move {
            let ip = client_ip(&req);
            let key = format!("rate_limit:{}:{}", scope, ip);

            match check_window(&client, &key, limit, window_seconds).await {
                Ok(WindowCheck::Allowed) => {}
                Ok(WindowCheck::Exceeded {
                    retry_after_seconds,
                }) => {
                    tracing::warn!(ip, scope, "rate limit exceeded");
                    return Err(ApiError(DomainError::RateLimitExceeded {
                        retry_after_seconds,
                    })
                    .into());
                }
                Err(e) => {
                    tracing::warn!(error = %e, scope, "rate limiter degraded, allowing request");
                }
            }

            service.call(req).await
        })
    }
}

/// Best available client IP (reverse-proxy aware)
fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
