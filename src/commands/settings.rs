// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::commands::{check_limit, require_user, settings_for};
use crate::db::{Store, keys};
use crate::models::Settings;
use crate::ratelimit::MUTATION_ACTION;
use crate::utils::maybe_print_json;
use crate::validate::sanitize_text;

const DATE_FORMATS: [&str; 3] = ["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"];

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;

    let currency = sub
        .get_one::<String>("currency")
        .map(|s| sanitize_text(s))
        .filter(|s| !s.is_empty());
    let date_format = match sub.get_one::<String>("date-format") {
        Some(f) if !DATE_FORMATS.contains(&f.as_str()) => {
            eprintln!(
                "Invalid date format '{}' (use one of {})",
                f,
                DATE_FORMATS.join(", ")
            );
            return Ok(());
        }
        other => other.cloned(),
    };
    let budget_alerts = sub.get_one::<bool>("budget-alerts").copied();
    let bill_reminders = sub.get_one::<bool>("bill-reminders").copied();
    let goal_milestones = sub.get_one::<bool>("goal-milestones").copied();

    if !check_limit(store, &user.id, MUTATION_ACTION)? {
        return Ok(());
    }

    let owner = user.id.clone();
    store.transact(keys::SETTINGS, |all: &mut Vec<Settings>| {
        let idx = match all.iter().position(|s| s.user_id == owner) {
            Some(i) => i,
            None => {
                all.push(Settings::for_user(&owner));
                all.len() - 1
            }
        };
        let entry = &mut all[idx];
        if let Some(c) = currency {
            entry.currency = c;
        }
        if let Some(f) = date_format {
            entry.date_format = f;
        }
        if let Some(v) = budget_alerts {
            entry.notifications.budget_alerts = v;
        }
        if let Some(v) = bill_reminders {
            entry.notifications.bill_reminders = v;
        }
        if let Some(v) = goal_milestones {
            entry.notifications.goal_milestones = v;
        }
    })?;
    println!("Settings saved");
    Ok(())
}

fn show(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(store)?;
    let settings = settings_for(store, &user.id);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
        println!("Currency: {}", settings.currency);
        println!("Date format: {}", settings.date_format);
        println!(
            "Notifications: budget alerts {}, bill reminders {}, goal milestones {}",
            settings.notifications.budget_alerts,
            settings.notifications.bill_reminders,
            settings.notifications.goal_milestones
        );
    }
    Ok(())
}
