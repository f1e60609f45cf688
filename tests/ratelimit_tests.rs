// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::ratelimit::{AUTH_ACTION, RateLimitConfig, RateLimiter, format_wait};

fn small_limiter() -> RateLimiter {
    let mut limiter = RateLimiter::new();
    limiter.set_preset(
        "test",
        RateLimitConfig {
            max_requests: 5,
            window_ms: 1000,
            block_duration_ms: 2000,
        },
    );
    limiter
}

#[test]
fn sixth_call_in_window_is_rejected() {
    let mut limiter = small_limiter();
    for i in 0..5 {
        let d = limiter.check_at("u1", "test", i);
        assert!(d.allowed, "call {} should pass", i + 1);
    }
    let d = limiter.check_at("u1", "test", 5);
    assert!(!d.allowed);
    assert_eq!(d.retry_after, Some(2));
    assert_eq!(d.remaining, 0);
}

#[test]
fn block_lifts_after_block_duration() {
    let mut limiter = small_limiter();
    for i in 0..6 {
        limiter.check_at("u1", "test", i);
    }
    // Still inside the block
    let d = limiter.check_at("u1", "test", 1500);
    assert!(!d.allowed);
    // 2005 - 1500 = 505ms -> ceil to 1 second
    assert_eq!(d.retry_after, Some(1));
    // Block set at t=5 expires at t=2005
    let d = limiter.check_at("u1", "test", 2005);
    assert!(d.allowed);
}

#[test]
fn window_slides_with_now() {
    let mut limiter = small_limiter();
    for i in 0..5 {
        assert!(limiter.check_at("u1", "test", i).allowed);
    }
    // One second later the t=0 stamp has aged out
    let d = limiter.check_at("u1", "test", 1001);
    assert!(d.allowed);
}

#[test]
fn remaining_and_reset_at_reported_on_success() {
    let mut limiter = small_limiter();
    let d = limiter.check_at("u1", "test", 100);
    assert!(d.allowed);
    assert_eq!(d.remaining, 4);
    assert_eq!(d.reset_at, 1100);
    let d = limiter.check_at("u1", "test", 200);
    assert_eq!(d.remaining, 3);
    // reset_at still anchored to the oldest stamp
    assert_eq!(d.reset_at, 1100);
}

#[test]
fn identifiers_and_actions_are_independent() {
    let mut limiter = small_limiter();
    for i in 0..5 {
        limiter.check_at("u1", "test", i);
    }
    assert!(!limiter.check_at("u1", "test", 10).allowed);
    assert!(limiter.check_at("u2", "test", 10).allowed);
    assert!(limiter.check_at("u1", AUTH_ACTION, 10).allowed);
}

#[test]
fn auth_preset_blocks_for_thirty_minutes() {
    let mut limiter = RateLimiter::new();
    for i in 0..5 {
        assert!(limiter.check_at("u1", AUTH_ACTION, i).allowed);
    }
    let d = limiter.check_at("u1", AUTH_ACTION, 5);
    assert!(!d.allowed);
    assert_eq!(d.retry_after, Some(30 * 60));
}

#[test]
fn reset_clears_one_bucket() {
    let mut limiter = small_limiter();
    for i in 0..6 {
        limiter.check_at("u1", "test", i);
    }
    limiter.reset("u1", "test");
    assert!(limiter.check_at("u1", "test", 10).allowed);
}

#[test]
fn sweep_evicts_idle_buckets_but_keeps_active_blocks() {
    let mut limiter = small_limiter();
    limiter.check_at("idle", "test", 0);
    for i in 0..6 {
        limiter.check_at("blocked", "test", i);
    }
    assert_eq!(limiter.bucket_count(), 2);
    // Past the idle window, inside the block
    limiter.sweep(1500);
    assert_eq!(limiter.bucket_count(), 1);
    // Past the block too
    limiter.sweep(5000);
    assert_eq!(limiter.bucket_count(), 0);
}

#[test]
fn decision_survives_persistence() {
    let mut limiter = small_limiter();
    for i in 0..6 {
        limiter.check_at("u1", "test", i);
    }
    let encoded = serde_json::to_string(&limiter).unwrap();
    let mut restored: RateLimiter = serde_json::from_str(&encoded).unwrap();
    assert!(!restored.check_at("u1", "test", 100).allowed);
}

#[test]
fn wait_formatting() {
    assert_eq!(format_wait(45), "45 seconds");
    assert_eq!(format_wait(90), "2 minutes");
    assert_eq!(format_wait(600), "10 minutes");
    assert_eq!(format_wait(7200), "2 hours");
}
