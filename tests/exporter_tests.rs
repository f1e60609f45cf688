// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use nestegg::db::{Store, keys};
use nestegg::models::{CurrentUser, Transaction, TxKind};
use nestegg::{cli, commands::exporter};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::tempdir;

fn logged_in_store() -> Store {
    let store = Store::open_in_memory().unwrap();
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

fn tx(name: &str, payment: Option<&str>, description: Option<&str>) -> Transaction {
    Transaction {
        id: format!("t-{}", name.len()),
        kind: TxKind::Expense,
        name: name.to_string(),
        amount: Decimal::from_str("12.34").unwrap(),
        category: "Food".to_string(),
        date: NaiveDate::parse_from_str("2025-01-02", "%Y-%m-%d").unwrap(),
        description: description.map(String::from),
        payment_method: payment.map(String::from),
        recurring: None,
        user_id: "u1".to_string(),
        created_at: Utc::now(),
    }
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("export", m)) => m.clone(),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn csv_header_is_the_fixed_column_whitelist() {
    let mut store = logged_in_store();
    store.set(keys::TRANSACTIONS, &vec![tx("Lunch", None, None)]).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();
    let m = export_matches(&[
        "nestegg",
        "export",
        "transactions",
        "--format",
        "csv",
        "--out",
        &out_str,
    ]);
    exporter::handle(&mut store, &m).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let header = contents.lines().next().unwrap();
    assert_eq!(header, "date,type,name,category,amount,paymentMethod,description");
}

#[test]
fn csv_values_with_commas_and_quotes_are_escaped() {
    let mut store = logged_in_store();
    store
        .set(
            keys::TRANSACTIONS,
            &vec![tx("Cafe \"Le Monde\", Paris", Some("card"), Some("a,b"))],
        )
        .unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();
    let m = export_matches(&[
        "nestegg",
        "export",
        "transactions",
        "--format",
        "csv",
        "--out",
        &out_str,
    ]);
    exporter::handle(&mut store, &m).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(
        contents.contains("\"Cafe \"\"Le Monde\"\", Paris\""),
        "quoting missing in: {}",
        contents
    );
    assert!(contents.contains("\"a,b\""));
}

#[test]
fn csv_export_is_owner_scoped() {
    let mut store = logged_in_store();
    let mut other = tx("Not mine", None, None);
    other.user_id = "u2".to_string();
    store
        .set(keys::TRANSACTIONS, &vec![tx("Mine", None, None), other])
        .unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();
    let m = export_matches(&[
        "nestegg", "export", "transactions", "--out", &out_str,
    ]);
    exporter::handle(&mut store, &m).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.contains("Mine"));
    assert!(!contents.contains("Not mine"));
}

#[test]
fn json_export_parses_back() {
    let mut store = logged_in_store();
    store.set(keys::TRANSACTIONS, &vec![tx("Lunch", None, None)]).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    let out_str = out.to_string_lossy().to_string();
    let m = export_matches(&[
        "nestegg",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    exporter::handle(&mut store, &m).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let parsed: Vec<Transaction> = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].name, "Lunch");
}

#[test]
fn unknown_format_is_rejected() {
    let mut store = logged_in_store();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.xml");
    let out_str = out.to_string_lossy().to_string();
    let m = export_matches(&[
        "nestegg",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    assert!(exporter::handle(&mut store, &m).is_err());
    assert!(!out.exists());
}
