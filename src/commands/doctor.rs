// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::collections::HashSet;

use crate::db::{Store, keys};
use crate::models::{Bill, Budget, Goal, Transaction, User};
use crate::utils::{pretty_table, today};

/// Integrity sweep over the stored collections. Reports, never mutates.
pub fn handle(store: &Store) -> Result<()> {
    let mut rows = Vec::new();

    let users: Vec<User> = store.get_or_default(keys::USERS);
    let known: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();

    // 1) Records owned by nobody
    let txs: Vec<Transaction> = store.get_or_default(keys::TRANSACTIONS);
    for t in &txs {
        if !known.contains(t.user_id.as_str()) {
            rows.push(vec!["orphaned_transaction".into(), t.id.clone()]);
        }
    }

    // 2) Duplicate budgets for the same owner+category+month
    let budgets: Vec<Budget> = store.get_or_default(keys::BUDGETS);
    let mut seen = HashSet::new();
    for b in &budgets {
        if !known.contains(b.user_id.as_str()) {
            rows.push(vec!["orphaned_budget".into(), b.id.clone()]);
        }
        let key = (b.user_id.as_str(), b.category.as_str(), b.month.as_str());
        if !seen.insert(key) {
            rows.push(vec![
                "duplicate_budget".into(),
                format!("{} {} {}", b.month, b.category, b.id),
            ]);
        }
    }

    // 3) Goals whose saved amount exceeds the target
    let goals: Vec<Goal> = store.get_or_default(keys::GOALS);
    for g in &goals {
        if g.current_amount > g.target_amount {
            rows.push(vec![
                "goal_overshoot".into(),
                format!("{} ({} > {})", g.id, g.current_amount, g.target_amount),
            ]);
        }
    }

    // 4) Unpaid bills long past due
    let bills: Vec<Bill> = store.get_or_default(keys::BILLS);
    let now = today();
    for b in &bills {
        if !b.is_paid && (now - b.due_date).num_days() > 90 {
            rows.push(vec![
                "stale_unpaid_bill".into(),
                format!("{} (due {})", b.name, b.due_date),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
