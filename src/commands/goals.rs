// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::metrics::{dec_f64, percentage};
use crate::models::{Goal, Priority};
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::{fmt_money, maybe_print_json, new_id, pretty_table};
use crate::validate::{sanitize_text, validate_amount, validate_date};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("fund", sub)) => fund(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_priority(sub: &clap::ArgMatches) -> Result<Option<Priority>, String> {
    match sub.get_one::<String>("priority") {
        Some(raw) => Priority::from_str(raw).map(Some),
        None => Ok(None),
    }
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let name = sanitize_text(sub.get_one::<String>("name").unwrap());
    if name.is_empty() {
        eprintln!("Invalid goal: name: Name is required");
        return Ok(());
    }
    let target = match validate_amount(sub.get_one::<String>("target").unwrap()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid goal: target: {}", e);
            return Ok(());
        }
    };
    let deadline = match validate_date(sub.get_one::<String>("deadline").unwrap()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Invalid goal: deadline: {}", e);
            return Ok(());
        }
    };
    let priority = match parse_priority(sub) {
        Ok(p) => p.unwrap_or(Priority::Medium),
        Err(e) => {
            eprintln!("Invalid goal: priority: {}", e);
            return Ok(());
        }
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let goal = Goal {
        id: new_id(),
        name: name.clone(),
        target_amount: target,
        current_amount: Decimal::ZERO,
        deadline,
        priority,
        user_id: user.id.clone(),
        created_at: Utc::now(),
    };
    store.transact(keys::GOALS, |goals: &mut Vec<Goal>| {
        goals.push(goal);
    })?;
    println!("Goal '{}' created (target {})", name, target);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(store)?;
    let symbol = settings_for(store, &user.id).currency;
    let goals: Vec<Goal> = store.get_or_default(keys::GOALS);

    let mut owned: Vec<&Goal> = goals.iter().filter(|g| g.user_id == user.id).collect();
    owned.sort_by(|a, b| a.deadline.cmp(&b.deadline));

    if !maybe_print_json(json_flag, jsonl_flag, &owned)? {
        let data = owned
            .iter()
            .map(|g| {
                let pct = percentage(dec_f64(g.current_amount), dec_f64(g.target_amount));
                vec![
                    g.id.clone(),
                    g.name.clone(),
                    fmt_money(&g.current_amount, &symbol),
                    fmt_money(&g.target_amount, &symbol),
                    format!("{:.0}%", pct),
                    g.deadline.to_string(),
                    g.priority.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Saved", "Target", "Progress", "Deadline", "Priority"],
                data
            )
        );
    }
    Ok(())
}

fn fund(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();
    let amount = match validate_amount(sub.get_one::<String>("amount").unwrap()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Invalid deposit: amount: {}", e);
            return Ok(());
        }
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let owner = user.id.clone();
    // Deposits clamp at the target; overshoot is not stored.
    let outcome = store.transact(keys::GOALS, |goals: &mut Vec<Goal>| {
        let goal = goals.iter_mut().find(|g| g.id == id && g.user_id == owner)?;
        goal.current_amount = (goal.current_amount + amount).min(goal.target_amount);
        Some((
            goal.name.clone(),
            goal.current_amount,
            goal.current_amount >= goal.target_amount,
        ))
    })?;
    match outcome {
        Some((name, current, completed)) => {
            println!("Added {} to '{}' (now {})", amount, name, current);
            if completed {
                println!("Congratulations! Goal '{}' completed!", name);
            }
        }
        None => eprintln!("Goal '{}' not found", id),
    }
    Ok(())
}

fn edit(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let id = sub.get_one::<String>("id").unwrap().clone();
    let name = sub
        .get_one::<String>("name")
        .map(|s| sanitize_text(s))
        .filter(|s| !s.is_empty());
    let target = match sub.get_one::<String>("target") {
        Some(raw) => match validate_amount(raw) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("Invalid goal: target: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let deadline = match sub.get_one::<String>("deadline") {
        Some(raw) => match validate_date(raw) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Invalid goal: deadline: {}", e);
                return Ok(());
            }
        },
        None => None,
    };
    let priority = match parse_priority(sub) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid goal: priority: {}", e);
            return Ok(());
        }
    };

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let owner = user.id.clone();
    let found = store.transact(keys::GOALS, |goals: &mut Vec<Goal>| {
        let Some(goal) = goals.iter_mut().find(|g| g.id == id && g.user_id == owner) else {
            return false;
        };
        if let Some(n) = name {
            goal.name = n;
        }
        if let Some(t) = target {
            goal.target_amount = t;
            goal.current_amount = goal.current_amount.min(t);
        }
        if let Some(d) = deadline {
            goal.deadline = d;
        }
        if let Some(p) = priority {
            goal.priority = p;
        }
        true
    })?;
    if found {
        println!("Goal {} updated", id);
    } else {
        eprintln!("Goal '{}' not found", id);
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
    let removed = store.transact(keys::GOALS, |goals: &mut Vec<Goal>| {
        let before = goals.len();
        goals.retain(|g| !(g.id == id && g.user_id == owner));
        before != goals.len()
    })?;
    if removed {
        println!("Goal {} deleted", id);
    } else {
        eprintln!("Goal '{}' not found", id);
    }
    Ok(())
}
