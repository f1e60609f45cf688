// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::models::TxKind;
use nestegg::validate::{
    sanitize_text, validate_amount, validate_category, validate_date, validate_description,
    validate_email, validate_investment, validate_password, validate_transaction,
    validate_username,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

#[test]
fn amount_rounds_half_away_from_zero_at_the_cent() {
    assert_eq!(
        validate_amount("12.345").unwrap(),
        Decimal::from_str("12.35").unwrap()
    );
    assert_eq!(
        validate_amount("12.344").unwrap(),
        Decimal::from_str("12.34").unwrap()
    );
}

#[test]
fn amount_accepted_value_is_always_in_range_with_two_decimals() {
    for raw in ["0.01", "1", "42.5", "999999999.99", "123.456"] {
        let v = validate_amount(raw).unwrap();
        assert!(v >= Decimal::from_str("0.01").unwrap(), "{} too small", raw);
        assert!(
            v <= Decimal::from_str("999999999.99").unwrap(),
            "{} too large",
            raw
        );
        assert!(v.scale() <= 2, "{} has more than 2 decimals", raw);
    }
}

#[test]
fn amount_rejects_zero_negative_and_garbage() {
    assert!(validate_amount("0").is_err());
    assert!(validate_amount("-3").is_err());
    assert!(validate_amount("abc").is_err());
    assert!(validate_amount("").is_err());
    // rounds to 0.00, below the floor
    assert!(validate_amount("0.004").is_err());
    // above the ceiling
    assert!(validate_amount("1000000000").is_err());
}

#[test]
fn email_is_lowercased_and_trimmed() {
    assert_eq!(
        validate_email("  User@Example.COM ").unwrap(),
        "user@example.com"
    );
}

#[test]
fn email_shape_is_enforced() {
    assert!(validate_email("").is_err());
    assert!(validate_email("no-at-sign").is_err());
    assert!(validate_email("a@b").is_err());
    assert!(validate_email("a@b.c").is_err()); // single-letter tld
    assert!(validate_email("ab@cd.ef").is_ok());
}

#[test]
fn password_complexity_rules() {
    assert!(validate_password("Short1").is_err());
    assert!(validate_password("alllowercase1").is_err());
    assert!(validate_password("ALLUPPERCASE1").is_err());
    assert!(validate_password("NoDigitsHere").is_err());
    assert!(validate_password("Server4You").is_ok());
}

#[test]
fn username_charset_and_bounds() {
    assert!(validate_username("ab").is_err());
    assert!(validate_username("has space").is_err());
    assert_eq!(validate_username(" mira_7 ").unwrap(), "mira_7");
}

#[test]
fn sanitize_encodes_markup_and_strips_nulls() {
    assert_eq!(sanitize_text("a<b>&c"), "a&lt;b&gt;&amp;c");
    assert_eq!(sanitize_text("  pad  "), "pad");
    assert_eq!(sanitize_text("nu\0ll"), "null");
    assert_eq!(sanitize_text("say \"hi\""), "say &quot;hi&quot;");
}

#[test]
fn category_allows_its_alphabet_only() {
    assert_eq!(
        validate_category("Food & Drink").unwrap(),
        "Food & Drink"
    );
    assert!(validate_category("<script>").is_err());
    assert!(validate_category("").is_err());
    assert!(validate_category("semi;colon").is_err());
}

#[test]
fn description_rejects_script_payloads() {
    assert!(validate_description("<script>alert(1)</script>").is_err());
    assert!(validate_description("javascript:void(0)").is_err());
    assert!(validate_description("onclick=steal()").is_err());
    assert_eq!(validate_description("weekly groceries").unwrap(), "weekly groceries");
}

#[test]
fn description_is_capped_at_500_chars() {
    let long = "x".repeat(600);
    assert_eq!(validate_description(&long).unwrap().len(), 500);
}

#[test]
fn date_normalizes_to_calendar_date() {
    let d = validate_date("2025-03-09").unwrap();
    assert_eq!(d.to_string(), "2025-03-09");
    let d = validate_date("2025-03-09T10:30:00+05:30").unwrap();
    assert_eq!(d.to_string(), "2025-03-09");
    assert!(validate_date("2025-02-30").is_err());
    assert!(validate_date("not a date").is_err());
}

#[test]
fn transaction_with_nonpositive_amount_is_rejected_with_amount_error() {
    let payload = json!({
        "amount": "-10",
        "type": "expense",
        "category": "Food",
        "date": "2025-01-15",
    });
    let errors = validate_transaction(&payload).unwrap_err();
    assert!(errors.contains_key("amount"));
}

#[test]
fn transaction_unknown_fields_are_dropped_not_rejected() {
    let payload = json!({
        "amount": "25.00",
        "type": "expense",
        "category": "Food",
        "date": "2025-01-15",
        "isAdmin": true,
        "injected": "nope",
    });
    let data = validate_transaction(&payload).unwrap();
    assert_eq!(data.kind, TxKind::Expense);
    assert_eq!(data.amount, Decimal::from_str("25.00").unwrap());
}

#[test]
fn transaction_type_must_be_exact() {
    let payload = json!({
        "amount": "25.00",
        "type": "Expense",
        "category": "Food",
        "date": "2025-01-15",
    });
    let errors = validate_transaction(&payload).unwrap_err();
    assert_eq!(errors.get("type").unwrap(), "Invalid transaction type");
}

#[test]
fn transaction_collects_every_field_error() {
    let payload = json!({
        "amount": "nope",
        "type": "transfer",
        "category": "<bad>",
        "date": "13/13/2025",
    });
    let errors = validate_transaction(&payload).unwrap_err();
    for field in ["amount", "type", "category", "date"] {
        assert!(errors.contains_key(field), "missing error for {}", field);
    }
}

#[test]
fn investment_symbol_is_uppercased_and_shape_checked() {
    let data = validate_investment(Some("aapl"), "10", "185.50").unwrap();
    assert_eq!(data.symbol.as_deref(), Some("AAPL"));
    assert!(validate_investment(Some("TOOLONGTICKER"), "10", "185.50").is_err());
    assert!(validate_investment(Some("BRK.A"), "10", "185.50").is_err());
}

#[test]
fn investment_quantity_bounds() {
    assert!(validate_investment(None, "0", "10").is_err());
    assert!(validate_investment(None, "-1", "10").is_err());
    assert!(validate_investment(None, "1000001", "10").is_err());
    let data = validate_investment(None, "1000000", "10").unwrap();
    assert_eq!(data.quantity, Decimal::from(1_000_000));
    assert!(data.symbol.is_none());
}
