// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::require_user;
use crate::db::{Store, keys};
use crate::models::{Bill, Budget, CategorySet, Goal, Investment, Settings, Transaction, User};

/// The backup file: one JSON object, one key per collection. Every field is
/// optional so a partial file can be imported; export always writes all of
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budgets: Option<Vec<Budget>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investments: Option<Vec<Investment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bills: Option<Vec<Bill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategorySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<Settings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

/// Snapshot every collection.
pub fn export_all(store: &Store) -> Backup {
    Backup {
        users: Some(store.get_or_default(keys::USERS)),
        transactions: Some(store.get_or_default(keys::TRANSACTIONS)),
        budgets: Some(store.get_or_default(keys::BUDGETS)),
        goals: Some(store.get_or_default(keys::GOALS)),
        investments: Some(store.get_or_default(keys::INVESTMENTS)),
        bills: Some(store.get_or_default(keys::BILLS)),
        categories: Some(store.get_or_default(keys::CATEGORIES)),
        settings: Some(store.get_or_default(keys::SETTINGS)),
        exported_at: Some(Utc::now()),
    }
}

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        Some(("backup", sub)) => export_backup(store, sub),
        _ => Ok(()),
    }
}

fn export_backup(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let backup = export_all(store);
    std::fs::write(out, serde_json::to_string_pretty(&backup)?)?;
    println!("Backup written to {}", out);
    Ok(())
}

/// Fixed CSV column whitelist for transaction exports.
pub const CSV_COLUMNS: [&str; 7] = [
    "date",
    "type",
    "name",
    "category",
    "amount",
    "paymentMethod",
    "description",
];

fn export_transactions(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").unwrap();
    let user = require_user(store)?;

    let mut txs: Vec<Transaction> = store
        .get_or_default::<Vec<Transaction>>(keys::TRANSACTIONS)
        .into_iter()
        .filter(|t| t.user_id == user.id)
        .collect();
    txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(CSV_COLUMNS)?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.name.clone(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.payment_method.clone().unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)?;
        }
        _ => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
