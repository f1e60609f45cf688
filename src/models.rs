// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction direction. Fixed at creation; the two arms are aggregated
/// separately everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Income => write!(f, "income"),
            TxKind::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(format!("Invalid transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" | "high" => Ok(Priority::High),
            "Medium" | "medium" => Ok(Priority::Medium),
            "Low" | "low" => Ok(Priority::Low),
            other => Err(format!("Invalid priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    Monthly,
    Quarterly,
    Yearly,
    #[serde(rename = "One-time")]
    OneTime,
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Monthly => write!(f, "Monthly"),
            Recurrence::Quarterly => write!(f, "Quarterly"),
            Recurrence::Yearly => write!(f, "Yearly"),
            Recurrence::OneTime => write!(f, "One-time"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monthly" | "monthly" => Ok(Recurrence::Monthly),
            "Quarterly" | "quarterly" => Ok(Recurrence::Quarterly),
            "Yearly" | "yearly" => Ok(Recurrence::Yearly),
            "One-time" | "one-time" | "once" => Ok(Recurrence::OneTime),
            other => Err(format!("Invalid recurrence '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

/// The active session, stored under the `currentUser` key. The password
/// digest never leaves the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The `YYYY-MM` grouping key.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// `spent` is deliberately absent: it is derived from the matching
/// category+month transactions on every read (see `metrics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: Decimal,
    pub month: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub purchase_price: Decimal,
    pub current_value: Decimal,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
    pub user_id: String,
}

impl Investment {
    pub fn invested(&self) -> Decimal {
        self.purchase_price * self.quantity
    }

    pub fn current_total(&self) -> Decimal {
        self.current_value * self.quantity
    }

    pub fn profit_loss(&self) -> Decimal {
        self.current_total() - self.invested()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub category: String,
    pub recurring: Recurrence,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Expense and income categories live in separate lists, mirroring the
/// stored `categories` document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySet {
    pub expense: Vec<Category>,
    pub income: Vec<Category>,
}

impl CategorySet {
    pub fn list(&self, kind: TxKind) -> &[Category] {
        match kind {
            TxKind::Expense => &self.expense,
            TxKind::Income => &self.income,
        }
    }

    pub fn list_mut(&mut self, kind: TxKind) -> &mut Vec<Category> {
        match kind {
            TxKind::Expense => &mut self.expense,
            TxKind::Income => &mut self.income,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    pub budget_alerts: bool,
    pub bill_reminders: bool,
    pub goal_milestones: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            budget_alerts: true,
            bill_reminders: true,
            goal_milestones: true,
        }
    }
}

/// Per-owner display preferences, one record per user in the `settings`
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub user_id: String,
    pub currency: String,
    pub date_format: String,
    #[serde(default)]
    pub notifications: NotificationPrefs,
}

impl Settings {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            currency: "₹".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            notifications: NotificationPrefs::default(),
        }
    }
}
