// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn registry_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Add a name to the registry")
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(Command::new("list").about("List registered names"))
        .subcommand(
            Command::new("rm")
                .about("Remove a name from the registry")
                .arg(Arg::new("name").long("name").required(true)),
        )
}

fn rule_cmd() -> Command {
    Command::new("rule")
        .about("Manage recurrence rules")
        .subcommand(
            Command::new("add")
                .about("Create a recurrence rule")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .help("income | bill | expense | saving"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("method").long("method").help("Payment method"))
                .arg(
                    Arg::new("freq")
                        .long("freq")
                        .required(true)
                        .help("weekly | bimonthly | monthly | quarterly | annual"),
                )
                .arg(
                    Arg::new("day")
                        .long("day")
                        .help("Day-of-month anchor 1-31 (monthly/quarterly/annual)"),
                )
                .arg(
                    Arg::new("weekday")
                        .long("weekday")
                        .help("Weekday anchor 0-6, Sunday=0 (weekly)"),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .help("Month anchor 1-12 (annual)"),
                )
                .arg(
                    Arg::new("inactive")
                        .long("inactive")
                        .action(ArgAction::SetTrue)
                        .help("Create the rule disabled"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List recurrence rules"),
        ))
        .subcommand(
            Command::new("edit")
                .about("Edit a recurrence rule (unspecified fields are kept)")
                .arg(Arg::new("id").long("id").required(true))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("kind").long("kind"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("account").long("account"))
                .arg(Arg::new("method").long("method"))
                .arg(Arg::new("freq").long("freq"))
                .arg(Arg::new("day").long("day"))
                .arg(Arg::new("weekday").long("weekday"))
                .arg(Arg::new("month").long("month")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a recurrence rule")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("enable")
                .about("Activate a rule")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("disable")
                .about("Deactivate a rule (never evaluated while disabled)")
                .arg(Arg::new("id").long("id").required(true)),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Ledger transactions, manual and materialized")
        .subcommand(
            Command::new("add")
                .about("Record a manual transaction")
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .help("income | bill | expense | saving"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("from").long("from").help("Source account"))
                .arg(Arg::new("to").long("to").help("Destination account"))
                .arg(Arg::new("memo").long("memo")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("Filter YYYY-MM"))
                .arg(
                    Arg::new("rule")
                        .long("rule")
                        .help("Only rows materialized from this rule id"),
                )
                .arg(Arg::new("limit").long("limit")),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction (does not reset the source rule)")
                .arg(Arg::new("id").long("id").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("paycycle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Paycycle: recurring transaction scheduling for personal budgets")
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(registry_cmd("category", "Manage the category registry"))
        .subcommand(registry_cmd("account", "Manage the account registry"))
        .subcommand(registry_cmd("method", "Manage the payment-method registry"))
        .subcommand(rule_cmd())
        .subcommand(tx_cmd())
        .subcommand(
            Command::new("run")
                .about("Evaluate all rules and materialize due transactions")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Evaluate as of this date (YYYY-MM-DD, default: today)"),
                ),
        )
        .subcommand(
            Command::new("doctor").about("Report malformed rules and orphaned provenance tags"),
        )
}
