// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::commands::check_limit;
use crate::commands::exporter::Backup;
use crate::db::{Store, keys};
use crate::models::CurrentUser;
use crate::ratelimit::UPLOAD_ACTION;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => import_backup(store, sub),
        _ => Ok(()),
    }
}

/// Merge a backup into the store, key by key: only the collections present
/// in the file overwrite their counterparts.
pub fn import_all(store: &mut Store, backup: Backup) -> Result<()> {
    if let Some(users) = backup.users {
        store.set(keys::USERS, &users)?;
    }
    if let Some(transactions) = backup.transactions {
        store.set(keys::TRANSACTIONS, &transactions)?;
    }
    if let Some(budgets) = backup.budgets {
        store.set(keys::BUDGETS, &budgets)?;
    }
    if let Some(goals) = backup.goals {
        store.set(keys::GOALS, &goals)?;
    }
    if let Some(investments) = backup.investments {
        store.set(keys::INVESTMENTS, &investments)?;
    }
    if let Some(bills) = backup.bills {
        store.set(keys::BILLS, &bills)?;
    }
    if let Some(categories) = backup.categories {
        store.set(keys::CATEGORIES, &categories)?;
    }
    if let Some(settings) = backup.settings {
        store.set(keys::SETTINGS, &settings)?;
    }
    Ok(())
}

fn import_backup(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap();

    let identifier = store
        .get::<CurrentUser>(keys::CURRENT_USER)?
        .map(|u| u.id)
        .unwrap_or_else(|| "anonymous".to_string());
    if !check_limit(store, &identifier, UPLOAD_ACTION)? {
        return Ok(());
    }

    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Open backup file {}", path))?;
    let backup: Backup =
        serde_json::from_str(&raw).with_context(|| format!("Parse backup file {}", path))?;
    import_all(store, backup)?;
    println!("Backup imported from {}", path);
    Ok(())
}
