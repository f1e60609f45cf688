// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input validation and sanitization. Every user-supplied value passes
//! through here before it reaches the store. Validators return structured
//! results; they never panic on bad input.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

use crate::models::TxKind;

/// Field name -> message map for record-level validation. Ordered so error
/// output is stable.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const EMAIL_MIN_LEN: usize = 5;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const CATEGORY_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;

static AMOUNT_MIN: Lazy<Decimal> = Lazy::new(|| Decimal::new(1, 2)); // 0.01
static AMOUNT_MAX: Lazy<Decimal> = Lazy::new(|| Decimal::new(99_999_999_999, 2)); // 999,999,999.99
static QUANTITY_MAX: Lazy<Decimal> = Lazy::new(|| Decimal::from(1_000_000));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9 &-]+$").unwrap());
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,10}$").unwrap());
static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<script|javascript:|on\w+\s*=").unwrap());

/// Free-text hygiene: null bytes are dropped, the characters that carry
/// meaning in markup are entity-encoded, surrounding whitespace is trimmed.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\0' => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Strip nulls and trim without entity-encoding. Used for fields whose
/// allowed alphabet is already pattern-restricted.
fn strip_and_trim(input: &str) -> String {
    input.replace('\0', "").trim().to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

pub fn validate_email(raw: &str) -> Result<String, String> {
    let email = truncate(raw.trim(), EMAIL_MAX_LEN).to_lowercase();
    if email.is_empty() {
        return Err("Email is required".into());
    }
    if email.len() < EMAIL_MIN_LEN {
        return Err("Email is too short".into());
    }
    if !EMAIL_RE.is_match(&email) {
        return Err("Invalid email format".into());
    }
    Ok(email)
}

pub fn validate_password(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("Password is required".into());
    }
    if raw.len() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
    if raw.len() > PASSWORD_MAX_LEN {
        return Err("Password is too long".into());
    }
    if !raw.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter".into());
    }
    if !raw.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter".into());
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a number".into());
    }
    Ok(())
}

pub fn validate_username(raw: &str) -> Result<String, String> {
    let name = truncate(&strip_and_trim(raw), USERNAME_MAX_LEN);
    if name.len() < USERNAME_MIN_LEN {
        return Err(format!(
            "Username must be at least {} characters",
            USERNAME_MIN_LEN
        ));
    }
    if !USERNAME_RE.is_match(&name) {
        return Err("Username can only contain letters, numbers, underscores, and hyphens".into());
    }
    Ok(name)
}

/// Parse and normalize a money amount: finite, strictly positive, two
/// decimal places (half away from zero), within [0.01, 999,999,999.99].
pub fn validate_amount(raw: &str) -> Result<Decimal, String> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| "Invalid amount".to_string())?;
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than 0".into());
    }
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount < *AMOUNT_MIN {
        return Err("Amount must be greater than 0".into());
    }
    if amount > *AMOUNT_MAX {
        return Err("Amount exceeds maximum limit".into());
    }
    Ok(amount)
}

pub fn validate_category(raw: &str) -> Result<String, String> {
    let category = truncate(&strip_and_trim(raw), CATEGORY_MAX_LEN);
    if category.is_empty() {
        return Err("Category is required".into());
    }
    if !CATEGORY_RE.is_match(&category) {
        return Err("Invalid category format".into());
    }
    Ok(category)
}

pub fn validate_description(raw: &str) -> Result<String, String> {
    if MARKUP_RE.is_match(raw) {
        return Err("Description contains invalid content".into());
    }
    Ok(truncate(&sanitize_text(raw), DESCRIPTION_MAX_LEN))
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp; normalize to the
/// calendar date.
pub fn validate_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    let s = raw.trim();
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err("Invalid date".into())
}

/// Validate `YYYY-MM` by round-tripping through the first of the month.
pub fn validate_month(raw: &str) -> Result<String, String> {
    let s = raw.trim();
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

/// A transaction payload that survived the whitelist. The only path to a
/// trusted transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    pub kind: TxKind,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: chrono::NaiveDate,
}

const TRANSACTION_FIELDS: [&str; 5] = ["amount", "type", "category", "description", "date"];

fn value_as_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whitelist-validate a raw transaction payload. Unknown fields are dropped
/// and logged, not rejected.
pub fn validate_transaction(data: &Value) -> Result<TransactionData, FieldErrors> {
    let mut errors = FieldErrors::new();
    let obj = match data.as_object() {
        Some(o) => o,
        None => {
            errors.insert("payload", "Expected an object".into());
            return Err(errors);
        }
    };

    for key in obj.keys() {
        if !TRANSACTION_FIELDS.contains(&key.as_str()) {
            warn!(field = %key, "unexpected transaction field dropped");
        }
    }

    let amount = match obj.get("amount") {
        Some(v) => match validate_amount(&value_as_str(v)) {
            Ok(a) => Some(a),
            Err(e) => {
                errors.insert("amount", e);
                None
            }
        },
        None => {
            errors.insert("amount", "Amount is required".into());
            None
        }
    };

    let kind = match obj.get("type").and_then(Value::as_str) {
        Some(s) => match TxKind::from_str(s) {
            Ok(k) => Some(k),
            Err(_) => {
                errors.insert("type", "Invalid transaction type".into());
                None
            }
        },
        None => {
            errors.insert("type", "Invalid transaction type".into());
            None
        }
    };

    let category = match obj.get("category").and_then(Value::as_str) {
        Some(s) => match validate_category(s) {
            Ok(c) => Some(c),
            Err(e) => {
                errors.insert("category", e);
                None
            }
        },
        None => {
            errors.insert("category", "Category is required".into());
            None
        }
    };

    let description = match obj.get("description").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => match validate_description(s) {
            Ok(d) => Some(d),
            Err(e) => {
                errors.insert("description", e);
                None
            }
        },
        _ => None,
    };

    let date = match obj.get("date").and_then(Value::as_str) {
        Some(s) => match validate_date(s) {
            Ok(d) => Some(d),
            Err(e) => {
                errors.insert("date", e);
                None
            }
        },
        None => {
            errors.insert("date", "Date is required".into());
            None
        }
    };

    match (kind, amount, category, date) {
        (Some(kind), Some(amount), Some(category), Some(date)) if errors.is_empty() => {
            Ok(TransactionData {
                kind,
                amount,
                category,
                description,
                date,
            })
        }
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentData {
    pub symbol: Option<String>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
}

/// Validate the fields of an investment entry that gate admission: ticker
/// symbol (when given), share quantity, purchase price.
pub fn validate_investment(
    symbol: Option<&str>,
    quantity: &str,
    purchase_price: &str,
) -> Result<InvestmentData, FieldErrors> {
    let mut errors = FieldErrors::new();

    let symbol = match symbol {
        Some(raw) => {
            let upper = raw.trim().to_uppercase();
            if SYMBOL_RE.is_match(&upper) {
                Some(Some(upper))
            } else {
                errors.insert("symbol", "Invalid stock symbol format".into());
                None
            }
        }
        None => Some(None),
    };

    let quantity = match Decimal::from_str(quantity.trim()) {
        Ok(q) if q > Decimal::ZERO && q <= *QUANTITY_MAX => Some(q),
        _ => {
            errors.insert("quantity", "Invalid quantity".into());
            None
        }
    };

    let purchase_price = match validate_amount(purchase_price) {
        Ok(p) => Some(p),
        Err(e) => {
            errors.insert("purchasePrice", e);
            None
        }
    };

    match (symbol, quantity, purchase_price) {
        (Some(symbol), Some(quantity), Some(purchase_price)) if errors.is_empty() => {
            Ok(InvestmentData {
                symbol,
                quantity,
                purchase_price,
            })
        }
        _ => Err(errors),
    }
}

/// Render a field-error map the way commands surface it.
pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join("; ")
}
