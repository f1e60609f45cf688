// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::str::FromStr;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::metrics::days_until;
use crate::models::{Bill, Recurrence};
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, new_id, pretty_table, today};
use crate::validate::{sanitize_text, validate_amount, validate_category, validate_date};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("pay", sub)) => pay(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let name = sanitize_text(sub.get_one::<String>("name").unwrap());
    if name.is_empty() {
        eprintln!("Invalid bill: name: Name is required");
        return Ok(());
    }
    let amount = match validate_amount(sub.get_one::<String>("amount").unwrap()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Invalid bill: amount: {}", e);
            return Ok(());
        }
    };
    let due_date = match validate_date(sub.get_one::<String>("due").unwrap()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Invalid bill: due: {}", e);
            return Ok(());
        }
    };
    let category = match validate_category(sub.get_one::<String>("category").unwrap()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid bill: category: {}", e);
            return Ok(());
        }
    };
    let recurring = match sub.get_one::<String>("recurring") {
        Some(raw) => match Recurrence::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid bill: recurring: {}", e);
                return Ok(());
            }
        },
        None => Recurrence::Monthly,
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let bill = Bill {
        id: new_id(),
        name: name.clone(),
        amount,
        due_date,
        category,
        recurring,
        is_paid: false,
        paid_date: None,
        user_id: user.id.clone(),
    };
    store.transact(keys::BILLS, |bills: &mut Vec<Bill>| {
        bills.push(bill);
    })?;
    println!("Bill reminder '{}' added (due {})", name, due_date);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let pending_only = sub.get_flag("pending");
    let user = require_user(store)?;
    let settings = settings_for(store, &user.id);
    let symbol = settings.currency.clone();
    let bills: Vec<Bill> = store.get_or_default(keys::BILLS);

    let mut owned: Vec<&Bill> = bills
        .iter()
        .filter(|b| b.user_id == user.id)
        .filter(|b| !pending_only || !b.is_paid)
        .collect();
    owned.sort_by(|a, b| a.due_date.cmp(&b.due_date));

    if !maybe_print_json(json_flag, jsonl_flag, &owned)? {
        let now = today();
        let data = owned
            .iter()
            .map(|b| {
                let due_in = days_until(b.due_date, now);
                let status = if b.is_paid {
                    match b.paid_date {
                        Some(d) => format!("Paid {}", fmt_date(d, &settings.date_format)),
                        None => "Paid".to_string(),
                    }
                } else if due_in < 0 {
                    format!("Overdue by {} days", -due_in)
                } else {
                    format!("Due in {} days", due_in)
                };
                vec![
                    b.id.clone(),
                    b.name.clone(),
                    fmt_money(&b.amount, &symbol),
                    fmt_date(b.due_date, &settings.date_format),
                    b.category.clone(),
                    b.recurring.to_string(),
                    status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Due", "Category", "Recurring", "Status"],
                data
            )
        );
    }
    Ok(())
}

fn pay(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();
    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }
    let owner = user.id.clone();
    let paid_on = today();
    // Unpaid -> Paid is one-way; paying twice keeps the original paid date.
    let outcome = store.transact(keys::BILLS, |bills: &mut Vec<Bill>| {
        let bill = bills.iter_mut().find(|b| b.id == id && b.user_id == owner)?;
        if bill.is_paid {
            return Some((bill.name.clone(), bill.paid_date, true));
        }
        bill.is_paid = true;
        bill.paid_date = Some(paid_on);
        Some((bill.name.clone(), bill.paid_date, false))
    })?;
    match outcome {
        Some((name, _, true)) => println!("Bill '{}' was already paid", name),
        Some((name, Some(date), false)) => println!("Bill '{}' marked paid on {}", name, date),
        Some((name, None, false)) => println!("Bill '{}' marked paid", name),
        None => eprintln!("Bill '{}' not found", id),
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
    let removed = store.transact(keys::BILLS, |bills: &mut Vec<Bill>| {
        let before = bills.len();
        bills.retain(|b| !(b.id == id && b.user_id == owner));
        before != bills.len()
    })?;
    if removed {
        println!("Bill {} deleted", id);
    } else {
        eprintln!("Bill '{}' not found", id);
    }
    Ok(())
}
