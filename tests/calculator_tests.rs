// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::calculators::{compound_interest, emi, lumpsum, sip};

#[test]
fn emi_zero_rate_is_straight_division() {
    let s = emi(100_000.0, 0.0, 12);
    assert!((s.emi - 100_000.0 / 12.0).abs() < 1e-9);
    assert_eq!(s.total_payment, 100_000.0);
    assert_eq!(s.total_interest, 0.0);
}

#[test]
fn emi_reference_values() {
    let s = emi(100_000.0, 10.0, 12);
    assert!((s.emi - 8791.59).abs() <= 0.01, "emi was {}", s.emi);
    assert!(
        (s.total_interest - 5499.08).abs() <= 0.01,
        "interest was {}",
        s.total_interest
    );
    assert!((s.total_payment - 105_499.08).abs() <= 0.01);
}

#[test]
fn emi_guards_nonpositive_inputs() {
    let zero = emi(0.0, 10.0, 12);
    assert_eq!(zero.emi, 0.0);
    assert_eq!(zero.total_payment, 0.0);
    let zero = emi(-5.0, 10.0, 12);
    assert_eq!(zero.emi, 0.0);
    let zero = emi(100.0, 10.0, 0);
    assert_eq!(zero.total_interest, 0.0);
}

#[test]
fn sip_zero_rate_returns_invested_amount() {
    let p = sip(5000.0, 0.0, 1.0);
    assert_eq!(p.future_value, 60_000.0);
    assert_eq!(p.invested, 60_000.0);
    assert_eq!(p.returns, 0.0);
}

#[test]
fn sip_positive_rate_grows_beyond_invested() {
    let p = sip(5000.0, 12.0, 1.0);
    assert_eq!(p.invested, 60_000.0);
    assert!(p.future_value > p.invested);
    assert!((p.returns - (p.future_value - p.invested)).abs() <= 1.0);
}

#[test]
fn sip_guards_nonpositive_inputs() {
    let p = sip(0.0, 12.0, 1.0);
    assert_eq!(p.future_value, 0.0);
    let p = sip(5000.0, 12.0, 0.0);
    assert_eq!(p.invested, 0.0);
}

#[test]
fn compound_interest_yearly() {
    let g = compound_interest(10_000.0, 8.0, 2.0, 1);
    assert!((g.amount - 11_664.0).abs() < 0.01);
    assert!((g.interest - 1664.0).abs() < 0.01);
}

#[test]
fn compound_interest_monthly() {
    let g = compound_interest(10_000.0, 12.0, 1.0, 12);
    assert!((g.amount - 11_268.25).abs() <= 0.01, "amount {}", g.amount);
    assert!((g.interest - 1268.25).abs() <= 0.01);
}

#[test]
fn compound_interest_zero_rate_keeps_principal() {
    let g = compound_interest(10_000.0, 0.0, 5.0, 12);
    assert_eq!(g.amount, 10_000.0);
    assert_eq!(g.interest, 0.0);
}

#[test]
fn compound_interest_guards_nonpositive_inputs() {
    assert_eq!(compound_interest(0.0, 8.0, 2.0, 12).amount, 0.0);
    assert_eq!(compound_interest(100.0, 8.0, 0.0, 12).amount, 0.0);
}

#[test]
fn lumpsum_projection() {
    let p = lumpsum(10_000.0, 10.0, 2.0);
    assert_eq!(p.future_value, 12_100.0);
    assert_eq!(p.returns, 2100.0);
}

#[test]
fn lumpsum_guards_nonpositive_inputs() {
    assert_eq!(lumpsum(0.0, 10.0, 2.0).future_value, 0.0);
    assert_eq!(lumpsum(100.0, 10.0, 0.0).returns, 0.0);
}
