// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

// Negative numbers must reach the validators as values, not be mistaken
// for flags.
fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name).allow_negative_numbers(true)
}

fn req(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .allow_negative_numbers(true)
}

pub fn build_cli() -> Command {
    Command::new("nestegg")
        .about("Personal income/expense tracking, category budgets, savings goals, and bill reminders")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the store and seed default categories"))
        .subcommand(
            Command::new("user")
                .about("Register, log in, and manage the local profile")
                .subcommand(
                    Command::new("register")
                        .arg(req("name"))
                        .arg(req("email"))
                        .arg(req("password")),
                )
                .subcommand(
                    Command::new("login")
                        .arg(req("email"))
                        .arg(req("password")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami"))
                .subcommand(
                    Command::new("passwd")
                        .arg(req("current"))
                        .arg(req("new")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse income/expense transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("type").help("income or expense"))
                        .arg(req("name"))
                        .arg(req("amount"))
                        .arg(req("category"))
                        .arg(opt("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(opt("description"))
                        .arg(opt("payment-method"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("month"))
                        .arg(opt("type"))
                        .arg(opt("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(opt("name"))
                        .arg(opt("amount"))
                        .arg(opt("category"))
                        .arg(opt("date"))
                        .arg(opt("description"))
                        .arg(opt("payment-method")),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Category budgets per month")
                .subcommand(
                    Command::new("set")
                        .arg(req("category"))
                        .arg(req("limit"))
                        .arg(opt("month").help("YYYY-MM, defaults to the current month")),
                )
                .subcommand(json_flags(Command::new("list").arg(opt("month"))))
                .subcommand(json_flags(Command::new("report").arg(opt("month"))))
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("target"))
                        .arg(req("deadline").help("YYYY-MM-DD"))
                        .arg(opt("priority").help("High, Medium, or Low")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("fund").arg(req("id")).arg(req("amount")))
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(opt("name"))
                        .arg(opt("target"))
                        .arg(opt("deadline"))
                        .arg(opt("priority")),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("invest")
                .about("Investment positions and P/L")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("type"))
                        .arg(opt("symbol").help("Ticker, 1-10 uppercase letters"))
                        .arg(req("purchase-price"))
                        .arg(req("current-value"))
                        .arg(req("quantity"))
                        .arg(opt("date").help("Purchase date, defaults to today")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("update")
                        .arg(req("id"))
                        .arg(req("current-value")),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("bill")
                .about("Bill reminders")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("amount"))
                        .arg(req("due").help("YYYY-MM-DD"))
                        .arg(req("category"))
                        .arg(opt("recurring").help("Monthly, Quarterly, Yearly, or One-time")),
                )
                .subcommand(json_flags(Command::new("list").arg(
                    Arg::new("pending")
                        .long("pending")
                        .action(ArgAction::SetTrue)
                        .help("Only unpaid bills"),
                )))
                .subcommand(Command::new("pay").arg(req("id")))
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("category")
                .about("Expense and income categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("type").help("income or expense"))
                        .arg(req("name"))
                        .arg(opt("color").help("Hex color, e.g. #6b7280")),
                )
                .subcommand(Command::new("list").arg(opt("type")))
                .subcommand(Command::new("rm").arg(req("type")).arg(req("id"))),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregate views over the owner's records")
                .subcommand(json_flags(Command::new("cashflow").arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize)),
                )))
                .subcommand(json_flags(Command::new("spend-by-category").arg(opt("month"))))
                .subcommand(json_flags(Command::new("health"))),
        )
        .subcommand(
            Command::new("calc")
                .about("Loan and investment projections")
                .subcommand(json_flags(
                    Command::new("emi")
                        .arg(req("principal").value_parser(value_parser!(f64)))
                        .arg(req("rate").value_parser(value_parser!(f64)))
                        .arg(
                            Arg::new("tenure-months")
                                .long("tenure-months")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("sip")
                        .arg(req("monthly").value_parser(value_parser!(f64)))
                        .arg(req("rate").value_parser(value_parser!(f64)))
                        .arg(req("years").value_parser(value_parser!(f64))),
                ))
                .subcommand(json_flags(
                    Command::new("ci")
                        .arg(req("principal").value_parser(value_parser!(f64)))
                        .arg(req("rate").value_parser(value_parser!(f64)))
                        .arg(req("years").value_parser(value_parser!(f64)))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .value_parser(value_parser!(u32)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("lumpsum")
                        .arg(req("amount").value_parser(value_parser!(f64)))
                        .arg(req("rate").value_parser(value_parser!(f64)))
                        .arg(req("years").value_parser(value_parser!(f64))),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions or a full backup to a file")
                .subcommand(
                    Command::new("transactions")
                        .arg(opt("format").help("csv or json (default csv)"))
                        .arg(req("out")),
                )
                .subcommand(Command::new("backup").arg(req("out"))),
        )
        .subcommand(
            Command::new("import")
                .about("Merge a backup file into the store")
                .subcommand(Command::new("backup").arg(Arg::new("path").required(true))),
        )
        .subcommand(
            Command::new("settings")
                .about("Per-owner display preferences")
                .subcommand(
                    Command::new("set")
                        .arg(opt("currency"))
                        .arg(opt("date-format").help("DD/MM/YYYY, MM/DD/YYYY, or YYYY-MM-DD"))
                        .arg(
                            Arg::new("budget-alerts")
                                .long("budget-alerts")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("bill-reminders")
                                .long("bill-reminders")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("goal-milestones")
                                .long("goal-milestones")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(Command::new("doctor").about("Integrity checks over the stored collections"))
}
