// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::calculators::{compound_interest, emi, lumpsum, sip};
use crate::utils::maybe_print_json;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("emi", sub)) => run_emi(sub)?,
        Some(("sip", sub)) => run_sip(sub)?,
        Some(("ci", sub)) => run_ci(sub)?,
        Some(("lumpsum", sub)) => run_lumpsum(sub)?,
        _ => {}
    }
    Ok(())
}

fn run_emi(sub: &clap::ArgMatches) -> Result<()> {
    let principal = *sub.get_one::<f64>("principal").unwrap();
    let rate = *sub.get_one::<f64>("rate").unwrap();
    let tenure = *sub.get_one::<u32>("tenure-months").unwrap();
    let schedule = emi(principal, rate, tenure);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &schedule)? {
        println!("EMI: {:.2}", schedule.emi);
        println!("Total payment: {:.2}", schedule.total_payment);
        println!("Total interest: {:.2}", schedule.total_interest);
    }
    Ok(())
}

fn run_sip(sub: &clap::ArgMatches) -> Result<()> {
    let monthly = *sub.get_one::<f64>("monthly").unwrap();
    let rate = *sub.get_one::<f64>("rate").unwrap();
    let years = *sub.get_one::<f64>("years").unwrap();
    let projection = sip(monthly, rate, years);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &projection)? {
        println!("Invested: {:.0}", projection.invested);
        println!("Future value: {:.0}", projection.future_value);
        println!("Returns: {:.0}", projection.returns);
    }
    Ok(())
}

fn run_ci(sub: &clap::ArgMatches) -> Result<()> {
    let principal = *sub.get_one::<f64>("principal").unwrap();
    let rate = *sub.get_one::<f64>("rate").unwrap();
    let years = *sub.get_one::<f64>("years").unwrap();
    let frequency = *sub.get_one::<u32>("frequency").unwrap_or(&12);
    let growth = compound_interest(principal, rate, years, frequency);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &growth)? {
        println!("Amount: {:.2}", growth.amount);
        println!("Interest: {:.2}", growth.interest);
    }
    Ok(())
}

fn run_lumpsum(sub: &clap::ArgMatches) -> Result<()> {
    let amount = *sub.get_one::<f64>("amount").unwrap();
    let rate = *sub.get_one::<f64>("rate").unwrap();
    let years = *sub.get_one::<f64>("years").unwrap();
    let projection = lumpsum(amount, rate, years);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &projection)? {
        println!("Future value: {:.0}", projection.future_value);
        println!("Returns: {:.0}", projection.returns);
    }
    Ok(())
}
