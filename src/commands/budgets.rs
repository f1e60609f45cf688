// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::metrics::{budget_label, budget_spent, dec_f64, percentage};
use crate::models::{Budget, Transaction};
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{current_month, fmt_money, maybe_print_json, new_id, pretty_table};
use crate::validate::{validate_amount, validate_category, validate_month};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("report", sub)) => report(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let category = match validate_category(sub.get_one::<String>("category").unwrap()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid budget: category: {}", e);
            return Ok(());
        }
    };
    let limit = match validate_amount(sub.get_one::<String>("limit").unwrap()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Invalid budget: limit: {}", e);
            return Ok(());
        }
    };
    let month = match sub.get_one::<String>("month") {
        Some(raw) => match validate_month(raw) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Invalid budget: month: {}", e);
                return Ok(());
            }
        },
        None => current_month(),
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    // One budget per (owner, category, month): set is an upsert.
    let owner = user.id.clone();
    let (cat, mon, lim) = (category.clone(), month.clone(), limit);
    store.transact(keys::BUDGETS, |budgets: &mut Vec<Budget>| {
        if let Some(b) = budgets
            .iter_mut()
            .find(|b| b.user_id == owner && b.category == cat && b.month == mon)
        {
            b.limit = lim;
        } else {
            budgets.push(Budget {
                id: new_id(),
                category: cat,
                limit: lim,
                month: mon,
                user_id: owner,
            });
        }
    })?;
    println!("Budget set for {} / {} = {}", month, category, limit);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let budgets: Vec<Budget> = store.get_or_default(keys::BUDGETS);
    let month = sub.get_one::<String>("month");

    let mut rows: Vec<&Budget> = budgets
        .iter()
        .filter(|b| b.user_id == user.id)
        .filter(|b| month.is_none_or(|m| &b.month == m))
        .collect();
    rows.sort_by(|a, b| b.month.cmp(&a.month).then(a.category.cmp(&b.category)));

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|b| {
                vec![
                    b.id.clone(),
                    b.month.clone(),
                    b.category.clone(),
                    b.limit.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Month", "Category", "Limit"], data));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetReportRow {
    category: String,
    limit: String,
    spent: String,
    utilization_pct: f64,
    status: &'static str,
}

fn report(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let symbol = settings_for(store, &user.id).currency;
    let month = match sub.get_one::<String>("month") {
        Some(m) => m.clone(),
        None => current_month(),
    };

    let budgets: Vec<Budget> = store.get_or_default(keys::BUDGETS);
    let txs: Vec<Transaction> = store.get_or_default(keys::TRANSACTIONS);
    let owned_txs: Vec<Transaction> = txs.into_iter().filter(|t| t.user_id == user.id).collect();

    let mut rows = Vec::new();
    let mut selected: Vec<&Budget> = budgets
        .iter()
        .filter(|b| b.user_id == user.id && b.month == month)
        .collect();
    selected.sort_by(|a, b| a.category.cmp(&b.category));
    for b in selected {
        // spent is never stored; it is recomputed from the matching
        // category+month expenses on every report
        let spent = budget_spent(b, &owned_txs);
        let pct = percentage(dec_f64(spent), dec_f64(b.limit));
        let over = spent > b.limit;
        let shown_pct = if over {
            // utilization beyond 100 is reported raw, not clamped
            dec_f64(spent) / dec_f64(b.limit) * 100.0
        } else {
            pct
        };
        rows.push(BudgetReportRow {
            category: b.category.clone(),
            limit: fmt_money(&b.limit, &symbol),
            spent: fmt_money(&spent, &symbol),
            utilization_pct: (shown_pct * 10.0).round() / 10.0,
            status: budget_label(shown_pct),
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    format!("{:.1}%", r.utilization_pct),
                    r.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Utilization", "Status"], data)
        );
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
    let removed = store.transact(keys::BUDGETS, |budgets: &mut Vec<Budget>| {
        let before = budgets.len();
        budgets.retain(|b| !(b.id == id && b.user_id == owner));
        before != budgets.len()
    })?;
    if removed {
        println!("Budget {} deleted", id);
    } else {
        eprintln!("Budget '{}' not found", id);
    }
    Ok(())
}
