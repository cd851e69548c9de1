// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, TxFilter};
use crate::models::{RuleKind, Transaction};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id = raw.trim().parse::<i64>()?;
            ledger::delete(conn, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let kind = RuleKind::parse(kind_s)
        .ok_or_else(|| anyhow!("Unknown kind '{}', expected income|bill|expense|saving", kind_s))?;
    let tx = Transaction {
        id: 0,
        date,
        amount,
        kind,
        category: sub.get_one::<String>("category").unwrap().to_string(),
        account_from: sub.get_one::<String>("from").map(|s| s.to_string()),
        account_to: sub.get_one::<String>("to").map(|s| s.to_string()),
        memo: sub.get_one::<String>("memo").map(|s| s.to_string()),
        source_rule_id: None,
    };
    let id = ledger::append(conn, &tx)?;
    println!("Recorded transaction #{}: {} on {}", id, amount, date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = TxFilter {
        month: sub
            .get_one::<String>("month")
            .map(|s| parse_month(s))
            .transpose()?,
        source_rule: sub
            .get_one::<String>("rule")
            .map(|s| s.trim().parse::<i64>())
            .transpose()?,
        limit: sub
            .get_one::<String>("limit")
            .map(|s| s.trim().parse::<usize>())
            .transpose()?,
    };
    let data = ledger::list(conn, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.amount.to_string(),
                    t.kind.as_str().to_string(),
                    t.category.clone(),
                    t.account_from.clone().unwrap_or_default(),
                    t.account_to.clone().unwrap_or_default(),
                    t.memo.clone().unwrap_or_default(),
                    t.source_rule_id.map(|i| i.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Amount", "Kind", "Category", "From", "To", "Memo", "Rule"],
                rows,
            )
        );
    }
    Ok(())
}
