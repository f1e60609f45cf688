// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sliding-window rate limiting with escalating block, guarding
//! mutation-like actions per identifier. The limiter is a plain value owned
//! by the composition root; the CLI persists it in the store between
//! invocations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const AUTH_ACTION: &str = "auth";
pub const API_ACTION: &str = "api";
pub const MUTATION_ACTION: &str = "mutation";
pub const UPLOAD_ACTION: &str = "upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_ms: i64,
    pub block_duration_ms: i64,
}

impl RateLimitConfig {
    pub const AUTH: Self = Self {
        max_requests: 5,
        window_ms: 15 * 60 * 1000,
        block_duration_ms: 30 * 60 * 1000,
    };

    pub const API: Self = Self {
        max_requests: 100,
        window_ms: 60 * 1000,
        block_duration_ms: 5 * 60 * 1000,
    };

    pub const MUTATION: Self = Self {
        max_requests: 30,
        window_ms: 60 * 1000,
        block_duration_ms: 10 * 60 * 1000,
    };

    pub const UPLOAD: Self = Self {
        max_requests: 10,
        window_ms: 60 * 60 * 1000,
        block_duration_ms: 60 * 60 * 1000,
    };
}

/// Outcome of a limit check. Rejection is a result, not an error: the caller
/// surfaces the wait-time message and skips the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: usize,
    /// Epoch milliseconds at which the window (or block) resets.
    pub reset_at: i64,
    /// Seconds until a retry may succeed; only set on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<i64>,
}

impl RateLimitDecision {
    pub fn retry_message(&self) -> Option<String> {
        self.retry_after
            .map(|secs| format!("Too many requests. Please try again in {}.", format_wait(secs)))
    }
}

/// Human wait time: seconds under a minute, minutes under an hour, hours
/// beyond (always rounded up).
pub fn format_wait(seconds: i64) -> String {
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", (seconds + 59) / 60)
    } else {
        format!("{} hours", (seconds + 3599) / 3600)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Bucket {
    requests: Vec<i64>,
    blocked_until: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiter {
    presets: HashMap<String, RateLimitConfig>,
    buckets: HashMap<String, Bucket>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        let mut presets = HashMap::new();
        presets.insert(AUTH_ACTION.to_string(), RateLimitConfig::AUTH);
        presets.insert(API_ACTION.to_string(), RateLimitConfig::API);
        presets.insert(MUTATION_ACTION.to_string(), RateLimitConfig::MUTATION);
        presets.insert(UPLOAD_ACTION.to_string(), RateLimitConfig::UPLOAD);
        Self {
            presets,
            buckets: HashMap::new(),
        }
    }

    /// Override or add the config for a named action.
    pub fn set_preset(&mut self, action: &str, config: RateLimitConfig) {
        self.presets.insert(action.to_string(), config);
    }

    pub fn preset(&self, action: &str) -> RateLimitConfig {
        self.presets
            .get(action)
            .copied()
            .unwrap_or(RateLimitConfig::API)
    }

    fn key(identifier: &str, action: &str) -> String {
        format!("{}:{}", action, identifier)
    }

    /// Check against the wall clock.
    pub fn check(&mut self, identifier: &str, action: &str) -> RateLimitDecision {
        self.check_at(identifier, action, Utc::now().timestamp_millis())
    }

    /// Deterministic core: `now_ms` is injected so tests never sleep.
    pub fn check_at(&mut self, identifier: &str, action: &str, now_ms: i64) -> RateLimitDecision {
        let config = self.preset(action);
        let bucket = self
            .buckets
            .entry(Self::key(identifier, action))
            .or_default();

        if bucket.blocked_until > now_ms {
            let retry_after = (bucket.blocked_until - now_ms + 999) / 1000;
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: bucket.blocked_until,
                retry_after: Some(retry_after),
            };
        }

        bucket
            .requests
            .retain(|&ts| now_ms - ts < config.window_ms);

        if bucket.requests.len() >= config.max_requests {
            bucket.blocked_until = now_ms + config.block_duration_ms;
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: bucket.blocked_until,
                retry_after: Some((config.block_duration_ms + 999) / 1000),
            };
        }

        bucket.requests.push(now_ms);
        let oldest = bucket.requests.first().copied().unwrap_or(now_ms);
        RateLimitDecision {
            allowed: true,
            remaining: config.max_requests - bucket.requests.len(),
            reset_at: oldest + config.window_ms,
            retry_after: None,
        }
    }

    /// Forget one identifier+action bucket.
    pub fn reset(&mut self, identifier: &str, action: &str) {
        self.buckets.remove(&Self::key(identifier, action));
    }

    pub fn reset_all(&mut self) {
        self.buckets.clear();
    }

    /// Evict buckets with no recent requests and no active block. Resource
    /// hygiene only; correctness does not depend on it.
    pub fn sweep(&mut self, now_ms: i64) {
        let presets = self.presets.clone();
        self.buckets.retain(|key, bucket| {
            let action = key.split(':').next().unwrap_or(API_ACTION);
            let window = presets
                .get(action)
                .copied()
                .unwrap_or(RateLimitConfig::API)
                .window_ms;
            bucket.requests.retain(|&ts| now_ms - ts < window);
            !bucket.requests.is_empty() || bucket.blocked_until > now_ms
        });
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
