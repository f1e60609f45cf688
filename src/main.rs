// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use nestegg::db::{Store, keys};
use nestegg::ratelimit::RateLimiter;
use nestegg::{cli, commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut store = Store::open_or_init()?;
    sweep_rate_limiter(&mut store)?;

    match matches.subcommand() {
        Some(("init", _)) => init(&mut store)?,
        Some(("user", sub)) => commands::users::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut store, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut store, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&mut store, sub)?,
        Some(("bill", sub)) => commands::bills::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut store, sub)?,
        Some(("calc", sub)) => commands::calc::handle(sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn init(store: &mut Store) -> Result<()> {
    if store
        .get::<nestegg::models::CategorySet>(keys::CATEGORIES)?
        .is_none()
    {
        store.set(keys::CATEGORIES, &commands::categories::default_set())?;
    }
    println!("Store initialized at {}", nestegg::db::db_path()?.display());
    Ok(())
}

/// Evict idle rate-limit buckets once per invocation; the CLI analog of the
/// periodic cleanup timer.
fn sweep_rate_limiter(store: &mut Store) -> Result<()> {
    let mut limiter: RateLimiter = store.get(keys::RATE_LIMIT)?.unwrap_or_default();
    limiter.sweep(Utc::now().timestamp_millis());
    store.set(keys::RATE_LIMIT, &limiter)?;
    Ok(())
}
