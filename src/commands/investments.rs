// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::metrics::portfolio_totals;
use crate::models::Investment;
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{fmt_money, maybe_print_json, new_id, pretty_table, today};
use crate::validate::{
    format_field_errors, sanitize_text, validate_amount, validate_date, validate_investment,
};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let name = sanitize_text(sub.get_one::<String>("name").unwrap());
    if name.is_empty() {
        eprintln!("Invalid investment: name: Name is required");
        return Ok(());
    }
    let kind = sanitize_text(sub.get_one::<String>("type").unwrap());

    // Without a ticker the position is tracked by name alone.
    let data = match validate_investment(
        sub.get_one::<String>("symbol").map(String::as_str),
        sub.get_one::<String>("quantity").unwrap(),
        sub.get_one::<String>("purchase-price").unwrap(),
    ) {
        Ok(d) => d,
        Err(errors) => {
            eprintln!("Invalid investment: {}", format_field_errors(&errors));
            return Ok(());
        }
    };
    let current_value = match validate_amount(sub.get_one::<String>("current-value").unwrap()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid investment: currentValue: {}", e);
            return Ok(());
        }
    };
    let purchase_date = match sub.get_one::<String>("date") {
        Some(raw) => match validate_date(raw) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Invalid investment: date: {}", e);
                return Ok(());
            }
        },
        None => today(),
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let investment = Investment {
        id: new_id(),
        name: name.clone(),
        kind,
        symbol: data.symbol.clone(),
        purchase_price: data.purchase_price,
        current_value,
        quantity: data.quantity,
        purchase_date,
        user_id: user.id.clone(),
    };
    let invested = investment.invested();
    store.transact(keys::INVESTMENTS, |items: &mut Vec<Investment>| {
        items.push(investment);
    })?;
    println!("Investment '{}' added (invested {})", name, invested);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentRow {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    symbol: String,
    quantity: String,
    invested: String,
    current: String,
    profit_loss: String,
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let symbol = settings_for(store, &user.id).currency;
    let investments: Vec<Investment> = store.get_or_default(keys::INVESTMENTS);

    let mut owned: Vec<&Investment> = investments
        .iter()
        .filter(|i| i.user_id == user.id)
        .collect();
    owned.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date));

    let rows: Vec<InvestmentRow> = owned
        .iter()
        .map(|i| InvestmentRow {
            id: i.id.clone(),
            name: i.name.clone(),
            kind: i.kind.clone(),
            symbol: i.symbol.clone().unwrap_or_default(),
            quantity: i.quantity.to_string(),
            invested: i.invested().round_dp(2).to_string(),
            current: i.current_total().round_dp(2).to_string(),
            profit_loss: i.profit_loss().round_dp(2).to_string(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.name.clone(),
                    r.kind.clone(),
                    r.symbol.clone(),
                    r.quantity.clone(),
                    format!("{}{}", symbol, r.invested),
                    format!("{}{}", symbol, r.current),
                    format!("{}{}", symbol, r.profit_loss),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "Symbol", "Qty", "Invested", "Current", "P/L"],
                data
            )
        );
        let owned_values: Vec<Investment> = owned.iter().map(|i| (*i).clone()).collect();
        let totals = portfolio_totals(&owned_values);
        println!(
            "Total invested {}, current {}, P/L {}",
            fmt_money(&totals.invested, &symbol),
            fmt_money(&totals.current, &symbol),
            fmt_money(&totals.profit_loss, &symbol)
        );
    }
    Ok(())
}

fn update(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();
    let current_value = match validate_amount(sub.get_one::<String>("current-value").unwrap()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid investment: currentValue: {}", e);
            return Ok(());
        }
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let owner = user.id.clone();
    let found = store.transact(keys::INVESTMENTS, |items: &mut Vec<Investment>| {
        let Some(i) = items.iter_mut().find(|i| i.id == id && i.user_id == owner) else {
            return false;
        };
        i.current_value = current_value;
        true
    })?;
    if found {
        println!("Investment {} updated", id);
    } else {
        eprintln!("Investment '{}' not found", id);
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
    let removed = store.transact(keys::INVESTMENTS, |items: &mut Vec<Investment>| {
        let before = items.len();
        items.retain(|i| !(i.id == id && i.user_id == owner));
        before != items.len()
    })?;
    if removed {
        println!("Investment {} deleted", id);
    } else {
        eprintln!("Investment '{}' not found", id);
    }
    Ok(())
}
