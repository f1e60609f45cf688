// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::models::{Transaction, TxKind};
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{maybe_print_json, new_id, pretty_table, today};
use crate::validate::{
    format_field_errors, sanitize_text, validate_amount, validate_category, validate_date,
    validate_description, validate_transaction,
};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;

    // The whitelist validator is the only path to a trusted record.
    let payload = json!({
        "type": sub.get_one::<String>("type").unwrap(),
        "amount": sub.get_one::<String>("amount").unwrap(),
        "category": sub.get_one::<String>("category").unwrap(),
        "description": sub.get_one::<String>("description").map(String::as_str).unwrap_or(""),
        "date": sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| today().to_string()),
    });
    let data = match validate_transaction(&payload) {
        Ok(d) => d,
        Err(errors) => {
            eprintln!("Invalid transaction: {}", format_field_errors(&errors));
            return Ok(());
        }
    };
    let name = sanitize_text(sub.get_one::<String>("name").unwrap());
    if name.is_empty() {
        eprintln!("Invalid transaction: name: Name is required");
        return Ok(());
    }
    let payment_method = sub
        .get_one::<String>("payment-method")
        .map(|s| sanitize_text(s))
        .filter(|s| !s.is_empty());

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let tx = Transaction {
        id: new_id(),
        kind: data.kind,
        name,
        amount: data.amount,
        category: data.category,
        date: data.date,
        description: data.description,
        payment_method,
        recurring: sub.get_flag("recurring").then_some(true),
        user_id: user.id.clone(),
        created_at: Utc::now(),
    };
    let label = match tx.kind {
        TxKind::Income => "Income",
        TxKind::Expense => "Expense",
    };
    let (amount, date, name) = (tx.amount, tx.date, tx.name.clone());
    store.transact(keys::TRANSACTIONS, |txs: &mut Vec<Transaction>| {
        txs.push(tx);
    })?;
    println!("{} of {} recorded on {} ('{}')", label, amount, date, name);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub category: String,
    pub amount: String,
    pub payment_method: String,
    pub description: String,
}

pub fn query_rows(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = require_user(store)?;
    let txs: Vec<Transaction> = store.get_or_default(keys::TRANSACTIONS);

    let month = sub.get_one::<String>("month");
    let kind = sub.get_one::<String>("type");
    let category = sub.get_one::<String>("category");

    let mut rows: Vec<&Transaction> = txs
        .iter()
        .filter(|t| t.user_id == user.id)
        .filter(|t| month.is_none_or(|m| &t.month() == m))
        .filter(|t| kind.is_none_or(|k| &t.kind.to_string() == k))
        .filter(|t| category.is_none_or(|c| &t.category == c))
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }

    Ok(rows
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            name: t.name.clone(),
            category: t.category.clone(),
            amount: t.amount.to_string(),
            payment_method: t.payment_method.clone().unwrap_or_default(),
            description: t.description.clone().unwrap_or_default(),
        })
        .collect())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let symbol = settings_for(store, &user.id).currency;
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.name.clone(),
                    r.category.clone(),
                    format!("{}{}", symbol, r.amount),
                    r.payment_method.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Type",
                    "Name",
                    "Category",
                    "Amount",
                    "Payment",
                    "Description"
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();

    // Validate before touching the store; type stays fixed at creation.
    let amount = match sub.get_one::<String>("amount") {
        Some(raw) => match validate_amount(raw) {
            Ok(a) => Some(a),
            Err(e) => {
                eprintln!("Invalid transaction: amount: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let category = match sub.get_one::<String>("category") {
        Some(raw) => match validate_category(raw) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("Invalid transaction: category: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(raw) => match validate_date(raw) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Invalid transaction: date: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let description = match sub.get_one::<String>("description") {
        Some(raw) => match validate_description(raw) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Invalid transaction: description: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let name = sub
        .get_one::<String>("name")
        .map(|s| sanitize_text(s))
        .filter(|s| !s.is_empty());
    let payment_method = sub
        .get_one::<String>("payment-method")
        .map(|s| sanitize_text(s));

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let owner = user.id.clone();
    let found = store.transact(keys::TRANSACTIONS, |txs: &mut Vec<Transaction>| {
        let Some(tx) = txs.iter_mut().find(|t| t.id == id && t.user_id == owner) else {
            return false;
        };
        if let Some(a) = amount {
            tx.amount = a;
        }
        if let Some(c) = category {
            tx.category = c;
        }
        if let Some(d) = date {
            tx.date = d;
        }
        if let Some(d) = description {
            tx.description = Some(d);
        }
        if let Some(n) = name {
            tx.name = n;
        }
        if let Some(p) = payment_method {
            tx.payment_method = if p.is_empty() { None } else { Some(p) };
        }
        true
    })?;
    if found {
        println!("Transaction {} updated", id);
    } else {
        eprintln!("Transaction '{}' not found", id);
    }
    Ok(())
}

fn rm(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();
    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }
    let owner = user.id.clone();
    let removed = store.transact(keys::TRANSACTIONS, |txs: &mut Vec<Transaction>| {
        let before = txs.len();
        txs.retain(|t| !(t.id == id && t.user_id == owner));
        before != txs.len()
    })?;
    if removed {
        println!("Transaction {} deleted", id);
    } else {
        eprintln!("Transaction '{}' not found", id);
    }
    Ok(())
}
