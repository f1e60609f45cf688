// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use nestegg::db::{Store, keys};
use nestegg::models::{
    Bill, Category, CategorySet, CurrentUser, Goal, Priority, Recurrence, Transaction, User,
};
use nestegg::{cli, commands};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn logged_in_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store
        .set(
            keys::USERS,
            &vec![User {
                id: "u1".to_string(),
                name: "mira".to_string(),
                email: "mira@example.com".to_string(),
                password_digest: "feedface".to_string(),
                created_at: Utc::now(),
            }],
        )
        .unwrap();
    store
        .set(
            keys::CURRENT_USER,
            &CurrentUser {
                id: "u1".to_string(),
                name: "mira".to_string(),
                email: "mira@example.com".to_string(),
            },
        )
        .unwrap();
    store
}

/// Walk `noun verb` argv into the verb-level matches the handlers expect.
fn noun_matches(args: &[&str]) -> (String, clap::ArgMatches) {
    let matches = cli::build_cli().get_matches_from(args);
    let (noun, m) = matches.subcommand().expect("noun subcommand");
    (noun.to_string(), m.clone())
}

#[test]
fn tx_add_rejects_nonpositive_amount() {
    let mut store = logged_in_store();
    let (_, m) = noun_matches(&[
        "nestegg", "tx", "add", "--type", "expense", "--name", "Bad", "--amount", "-5",
        "--category", "Food",
    ]);
    commands::transactions::handle(&mut store, &m).unwrap();
    let txs: Vec<Transaction> = store.get_or_default(keys::TRANSACTIONS);
    assert!(txs.is_empty(), "invalid transaction must not be stored");
}

#[test]
fn tx_add_stores_validated_record() {
    let mut store = logged_in_store();
    let (_, m) = noun_matches(&[
        "nestegg", "tx", "add", "--type", "expense", "--name", "Lunch", "--amount", "12.345",
        "--category", "Food", "--date", "2025-07-01",
    ]);
    commands::transactions::handle(&mut store, &m).unwrap();
    let txs: Vec<Transaction> = store.get_or_default(keys::TRANSACTIONS);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, dec("12.35")); // rounded at the cent
    assert_eq!(txs[0].user_id, "u1");
    assert_eq!(txs[0].date, date("2025-07-01"));
}

#[test]
fn budget_set_upserts_per_category_month() {
    let mut store = logged_in_store();
    for limit in ["400", "550"] {
        let (_, m) = noun_matches(&[
            "nestegg", "budget", "set", "--category", "Food", "--limit", limit, "--month",
            "2025-07",
        ]);
        commands::budgets::handle(&mut store, &m).unwrap();
    }
    let budgets: Vec<nestegg::models::Budget> = store.get_or_default(keys::BUDGETS);
    assert_eq!(budgets.len(), 1, "same category+month must not duplicate");
    assert_eq!(budgets[0].limit, dec("550"));
}

#[test]
fn goal_fund_clamps_at_target() {
    let mut store = logged_in_store();
    store
        .set(
            keys::GOALS,
            &vec![Goal {
                id: "g1".to_string(),
                name: "Trip".to_string(),
                target_amount: dec("1000"),
                current_amount: dec("900"),
                deadline: date("2026-01-01"),
                priority: Priority::Low,
                user_id: "u1".to_string(),
                created_at: Utc::now(),
            }],
        )
        .unwrap();
    let (_, m) = noun_matches(&["nestegg", "goal", "fund", "--id", "g1", "--amount", "500"]);
    commands::goals::handle(&mut store, &m).unwrap();
    let goals: Vec<Goal> = store.get_or_default(keys::GOALS);
    assert_eq!(goals[0].current_amount, dec("1000"));
}

#[test]
fn bill_pay_is_one_way_and_idempotent() {
    let mut store = logged_in_store();
    store
        .set(
            keys::BILLS,
            &vec![Bill {
                id: "bill1".to_string(),
                name: "Electricity".to_string(),
                amount: dec("78.40"),
                due_date: date("2025-08-20"),
                category: "Bills".to_string(),
                recurring: Recurrence::Monthly,
                is_paid: false,
                paid_date: None,
                user_id: "u1".to_string(),
            }],
        )
        .unwrap();

    let (_, m) = noun_matches(&["nestegg", "bill", "pay", "--id", "bill1"]);
    commands::bills::handle(&mut store, &m).unwrap();
    let bills: Vec<Bill> = store.get_or_default(keys::BILLS);
    assert!(bills[0].is_paid);
    let first_paid_date = bills[0].paid_date;
    assert!(first_paid_date.is_some());

    // Pretend the stored date is older, then pay again: it must survive.
    let mut bills = bills;
    bills[0].paid_date = Some(date("2025-01-01"));
    store.set(keys::BILLS, &bills).unwrap();

    let (_, m) = noun_matches(&["nestegg", "bill", "pay", "--id", "bill1"]);
    commands::bills::handle(&mut store, &m).unwrap();
    let bills: Vec<Bill> = store.get_or_default(keys::BILLS);
    assert!(bills[0].is_paid);
    assert_eq!(bills[0].paid_date, Some(date("2025-01-01")));
}

#[test]
fn predefined_categories_cannot_be_removed() {
    let mut store = logged_in_store();
    store
        .set(
            keys::CATEGORIES,
            &CategorySet {
                expense: vec![Category {
                    id: "cat_1".to_string(),
                    name: "Food".to_string(),
                    color: "#ef4444".to_string(),
                }],
                income: vec![],
            },
        )
        .unwrap();
    let (_, m) = noun_matches(&[
        "nestegg", "category", "rm", "--type", "expense", "--id", "cat_1",
    ]);
    commands::categories::handle(&mut store, &m).unwrap();
    let set: CategorySet = store.get_or_default(keys::CATEGORIES);
    assert_eq!(set.expense.len(), 1, "predefined category must survive rm");
}

#[test]
fn user_added_categories_can_be_removed() {
    let mut store = logged_in_store();
    store
        .set(
            keys::CATEGORIES,
            &CategorySet {
                expense: vec![Category {
                    id: "custom-1".to_string(),
                    name: "Hobby".to_string(),
                    color: "#123456".to_string(),
                }],
                income: vec![],
            },
        )
        .unwrap();
    let (_, m) = noun_matches(&[
        "nestegg", "category", "rm", "--type", "expense", "--id", "custom-1",
    ]);
    commands::categories::handle(&mut store, &m).unwrap();
    let set: CategorySet = store.get_or_default(keys::CATEGORIES);
    assert!(set.expense.is_empty());
}

#[test]
fn mutations_only_touch_the_owners_records() {
    let mut store = logged_in_store();
    let foreign = Goal {
        id: "g-other".to_string(),
        name: "Not mine".to_string(),
        target_amount: dec("100"),
        current_amount: dec("0"),
        deadline: date("2026-01-01"),
        priority: Priority::Low,
        user_id: "u2".to_string(),
        created_at: Utc::now(),
    };
    store.set(keys::GOALS, &vec![foreign]).unwrap();
    let (_, m) = noun_matches(&["nestegg", "goal", "rm", "--id", "g-other"]);
    commands::goals::handle(&mut store, &m).unwrap();
    let goals: Vec<Goal> = store.get_or_default(keys::GOALS);
    assert_eq!(goals.len(), 1, "cross-owner delete must be refused");
}

#[test]
fn register_rejects_weak_password_without_storing() {
    let mut store = Store::open_in_memory().unwrap();
    let (_, m) = noun_matches(&[
        "nestegg", "user", "register", "--name", "mira", "--email", "mira@example.com",
        "--password", "weak",
    ]);
    commands::users::handle(&mut store, &m).unwrap();
    let users: Vec<User> = store.get_or_default(keys::USERS);
    assert!(users.is_empty());
}

#[test]
fn register_then_login_round_trip() {
    let mut store = Store::open_in_memory().unwrap();
    let (_, m) = noun_matches(&[
        "nestegg", "user", "register", "--name", "mira", "--email", "Mira@Example.com",
        "--password", "Sensible9pass",
    ]);
    commands::users::handle(&mut store, &m).unwrap();
    let users: Vec<User> = store.get_or_default(keys::USERS);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "mira@example.com");
    assert_ne!(users[0].password_digest, "Sensible9pass");

    // New session: log out, then back in with the same credentials
    store.remove(keys::CURRENT_USER).unwrap();
    let (_, m) = noun_matches(&[
        "nestegg", "user", "login", "--email", "mira@example.com", "--password",
        "Sensible9pass",
    ]);
    commands::users::handle(&mut store, &m).unwrap();
    let session: Option<CurrentUser> = store.get(keys::CURRENT_USER).unwrap();
    assert_eq!(session.unwrap().email, "mira@example.com");
}

#[test]
fn sixth_auth_attempt_is_rate_limited() {
    let mut store = Store::open_in_memory().unwrap();
    for _ in 0..5 {
        let (_, m) = noun_matches(&[
            "nestegg", "user", "login", "--email", "mira@example.com", "--password",
            "Wrongpass1",
        ]);
        commands::users::handle(&mut store, &m).unwrap();
    }
    // The 6th attempt is refused before credentials are even checked; with
    // the store untouched a successful login would otherwise be possible.
    let (_, m) = noun_matches(&[
        "nestegg", "user", "register", "--name", "mira", "--email", "mira@example.com",
        "--password", "Sensible9pass",
    ]);
    commands::users::handle(&mut store, &m).unwrap();
    let users: Vec<User> = store.get_or_default(keys::USERS);
    assert!(users.is_empty(), "blocked identifier must not register");
}
