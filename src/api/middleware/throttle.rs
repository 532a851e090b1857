use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::AppState;
use crate::error::AppError;

/// Number of tracked callers above which idle entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

/// Rolling-window request limiter keyed by caller identity.
///
/// Each key keeps the timestamps of its accepted requests inside the window;
/// a request is refused once `limit` of them are still live.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    history: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            history: DashMap::new(),
        }
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(3600))
    }

    /// Record a request for `key`. On refusal returns how long until a slot frees up.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        if self.history.len() > SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let mut hits = self.history.entry(key.to_string()).or_default();
        while let Some(&oldest) = hits.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() >= self.limit as usize {
            let oldest = hits.front().copied().unwrap_or(now);
            let wait = self.window.saturating_sub(now.saturating_duration_since(oldest));
            return Err(wait);
        }

        hits.push_back(now);
        Ok(())
    }

    /// Drop callers whose whole history has aged out.
    pub fn sweep(&self, now: Instant) {
        let window = self.window;
        self.history.retain(|_, hits| {
            hits.back()
                .is_some_and(|&last| now.saturating_duration_since(last) < window)
        });
    }

    pub fn tracked_callers(&self) -> usize {
        self.history.len()
    }
}

/// Caller identity: the `X-Forwarded-For` value with whitespace removed when
/// present, otherwise the peer IP.
pub fn client_ident(parts: &Parts) -> String {
    if let Some(xff) = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        let ident: String = xff.chars().filter(|c| !c.is_whitespace()).collect();
        if !ident.is_empty() {
            return ident;
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum extractor that applies the lead-creation rate limit.
/// Place it after `ApiKey` and before the body extractor.
pub struct LeadCreateThrottle;

impl FromRequestParts<Arc<AppState>> for LeadCreateThrottle {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let ident = client_ident(parts);
        match state.lead_throttle.check(&ident) {
            Ok(()) => Ok(LeadCreateThrottle),
            Err(wait) => {
                state.metrics.inc_throttled();
                tracing::warn!(client = %ident, "Lead creation throttled");
                let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                Err(AppError::TooManyRequests {
                    retry_after_secs: retry_after_secs.max(1),
                })
            }
        }
    }
}
