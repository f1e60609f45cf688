// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::{Store, keys};
use crate::models::{CurrentUser, Settings};
use crate::ratelimit::RateLimiter;

pub mod bills;
pub mod budgets;
pub mod calc;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod importer;
pub mod investments;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod users;

/// The active session, or a "log in first" error.
pub fn require_user(store: &Store) -> Result<CurrentUser> {
    store
        .get::<CurrentUser>(keys::CURRENT_USER)?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run 'nestegg user login' first."))
}

/// Consult the persisted rate limiter for one action. On rejection the
/// wait-time message is surfaced and `false` comes back; the caller skips
/// the action without treating it as an error.
pub fn check_limit(store: &mut Store, identifier: &str, action: &str) -> Result<bool> {
    let mut limiter: RateLimiter = store.get(keys::RATE_LIMIT)?.unwrap_or_default();
    let decision = limiter.check(identifier, action);
    store.set(keys::RATE_LIMIT, &limiter)?;
    if !decision.allowed {
        tracing::warn!(identifier, action, "rate limit exceeded");
        if let Some(msg) = decision.retry_message() {
            eprintln!("{}", msg);
        }
    }
    Ok(decision.allowed)
}

/// The owner's settings record, or defaults when none has been saved yet.
pub fn settings_for(store: &Store, user_id: &str) -> Settings {
    store
        .get_or_default::<Vec<Settings>>(keys::SETTINGS)
        .into_iter()
        .find(|s| s.user_id == user_id)
        .unwrap_or_else(|| Settings::for_user(user_id))
}
