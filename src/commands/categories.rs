// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::str::FromStr;

use crate::commands::{check_limit, require_user};
use crate::db::{Store, keys};
use crate::models::{Category, CategorySet, TxKind};
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{new_id, pretty_table};
use crate::validate::validate_category;

/// Predefined categories ship with these id prefixes and cannot be removed.
const PROTECTED_PREFIXES: [&str; 2] = ["cat_", "inc_"];

pub fn default_set() -> CategorySet {
    let expense = [
        ("cat_1", "Food", "#ef4444"),
        ("cat_2", "Transport", "#f59e0b"),
        ("cat_3", "Entertainment", "#8b5cf6"),
        ("cat_4", "Shopping", "#ec4899"),
        ("cat_5", "Bills", "#6366f1"),
        ("cat_6", "Healthcare", "#10b981"),
        ("cat_7", "Education", "#3b82f6"),
        ("cat_8", "Other", "#6b7280"),
    ];
    let income = [
        ("inc_1", "Salary", "#10b981"),
        ("inc_2", "Freelance", "#3b82f6"),
        ("inc_3", "Business", "#8b5cf6"),
        ("inc_4", "Investment Returns", "#f59e0b"),
        ("inc_5", "Gift", "#ec4899"),
        ("inc_6", "Other", "#6b7280"),
    ];
    let build = |rows: &[(&str, &str, &str)]| -> Vec<Category> {
        rows.iter()
            .map(|(id, name, color)| Category {
                id: id.to_string(),
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect()
    };
    CategorySet {
        expense: build(&expense),
        income: build(&income),
    }
}

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(sub: &clap::ArgMatches) -> Result<TxKind, String> {
    TxKind::from_str(sub.get_one::<String>("type").unwrap())
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let kind = match parse_kind(sub) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Invalid category: type: {}", e);
            return Ok(());
        }
    };
    let name = match validate_category(sub.get_one::<String>("name").unwrap()) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Invalid category: name: {}", e);
            return Ok(());
        }
    };
    let color = sub
        .get_one::<String>("color")
        .cloned()
        .unwrap_or_else(|| "#6b7280".to_string());

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let display = name.clone();
    let added = store.transact(keys::CATEGORIES, |set: &mut CategorySet| {
        let entries = set.list_mut(kind);
        if entries.iter().any(|c| c.name == name) {
            return false;
        }
        entries.push(Category {
            id: new_id(),
            name,
            color,
        });
        true
    })?;
    if added {
        println!("Added {} category '{}'", kind, display);
    } else {
        eprintln!("Category '{}' already exists", display);
    }
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let set: CategorySet = match store.get(keys::CATEGORIES)? {
        Some(s) => s,
        None => default_set(),
    };
    let kind_filter = sub
        .get_one::<String>("type")
        .map(|s| TxKind::from_str(s))
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut data = Vec::new();
    for (kind, entries) in [(TxKind::Expense, &set.expense), (TxKind::Income, &set.income)] {
        if kind_filter.is_some_and(|k| k != kind) {
            continue;
        }
        for c in entries {
            data.push(vec![
                c.id.clone(),
                kind.to_string(),
                c.name.clone(),
                c.color.clone(),
            ]);
        }
    }
    println!("{}", pretty_table(&["ID", "Type", "Name", "Color"], data));
    Ok(())
}

fn rm(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let kind = match parse_kind(sub) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Invalid category: type: {}", e);
            return Ok(());
        }
    };
    let id = sub.get_one::<String>("id").unwrap().clone();

    if PROTECTED_PREFIXES.iter().any(|p| id.starts_with(p)) {
        eprintln!("Category '{}' is predefined and cannot be removed", id);
        return Ok(());
    }
    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let removed = store.transact(keys::CATEGORIES, |set: &mut CategorySet| {
        let entries = set.list_mut(kind);
        let before = entries.len();
        entries.retain(|c| c.id != id);
        before != entries.len()
    })?;
    if removed {
        println!("Removed category {}", id);
    } else {
        eprintln!("Category '{}' not found", id);
    }
    Ok(())
}
