// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::commands::{require_user, settings_for};
use crate::db::{Store, keys};
use crate::metrics::{
    HealthInputs, group_by_category, group_by_month, health_inputs, health_score, total_balance,
    total_savings,
};
use crate::models::{Budget, Goal, Transaction, TxKind};
use crate::utils::{current_month, fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(store, sub)?,
        Some(("health", sub)) => health(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn owned_transactions(store: &Store, user_id: &str) -> Vec<Transaction> {
    store
        .get_or_default::<Vec<Transaction>>(keys::TRANSACTIONS)
        .into_iter()
        .filter(|t| t.user_id == user_id)
        .collect()
}

fn cashflow(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let user = require_user(store)?;
    let txs = owned_transactions(store, &user.id);

    let grouped = group_by_month(&txs);
    let mut data = Vec::new();
    for (month, g) in grouped.iter().rev().take(months) {
        data.push(vec![
            month.clone(),
            format!("{:.2}", g.income),
            format!("{:.2}", g.expense),
            format!("{:.2}", g.income - g.expense),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], data)
        );
    }
    Ok(())
}

fn spend_by_category(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => m.clone(),
        None => current_month(),
    };
    let txs: Vec<Transaction> = owned_transactions(store, &user.id)
        .into_iter()
        .filter(|t| t.kind == TxKind::Expense && t.month() == month)
        .collect();

    let grouped = group_by_category(&txs);
    let mut items: Vec<_> = grouped.into_iter().collect();
    items.sort_by(|a, b| b.1.total.cmp(&a.1.total));

    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, g)| vec![cat, format!("{:.2}", g.total), g.count.to_string()])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent", "Count"], data));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    score: u8,
    inputs: HealthInputs,
    total_balance: String,
    total_savings: String,
}

fn health(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let symbol = settings_for(store, &user.id).currency;

    let txs = owned_transactions(store, &user.id);
    let budgets: Vec<Budget> = store
        .get_or_default::<Vec<Budget>>(keys::BUDGETS)
        .into_iter()
        .filter(|b| b.user_id == user.id)
        .collect();
    let goals: Vec<Goal> = store
        .get_or_default::<Vec<Goal>>(keys::GOALS)
        .into_iter()
        .filter(|g| g.user_id == user.id)
        .collect();

    let inputs = health_inputs(&txs, &budgets, &goals);
    let score = health_score(&inputs);
    let report = HealthReport {
        score,
        inputs,
        total_balance: fmt_money(&total_balance(&txs), &symbol),
        total_savings: fmt_money(&total_savings(&goals), &symbol),
    };

    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let grade = match score {
            80..=100 => "Excellent",
            60..=79 => "Good",
            40..=59 => "Fair",
            _ => "Needs attention",
        };
        println!("Financial health score: {}/100 ({})", score, grade);
        println!(
            "Savings rate: {:.1}%",
            if inputs.income > 0.0 {
                inputs.savings / inputs.income * 100.0
            } else {
                0.0
            }
        );
        match inputs.budget_utilization {
            Some(pct) => println!("Budget utilization: {:.1}%", pct),
            None => println!("Budget utilization: no budgets set"),
        }
        println!("Goal progress: {:.1}%", inputs.goals_progress);
        println!(
            "Balance {} | Savings {}",
            report.total_balance, report.total_savings
        );
    }
    Ok(())
}
