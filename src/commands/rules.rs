// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Frequency, RuleKind};
use crate::store::{self, RuleDraft, RulePatch};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(sub)?;
            store::delete(conn, id)?;
            println!("Removed rule {}", id);
        }
        Some(("enable", sub)) => {
            let id = parse_id(sub)?;
            store::set_active(conn, id, true)?;
            println!("Enabled rule {}", id);
        }
        Some(("disable", sub)) => {
            let id = parse_id(sub)?;
            store::set_active(conn, id, false)?;
            println!("Disabled rule {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = sub.get_one::<String>("id").unwrap();
    Ok(raw.trim().parse::<i64>()?)
}

fn parse_kind(s: &str) -> Result<RuleKind> {
    RuleKind::parse(s)
        .ok_or_else(|| anyhow!("Unknown kind '{}', expected income|bill|expense|saving", s))
}

fn parse_freq(s: &str) -> Result<Frequency> {
    Frequency::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown frequency '{}', expected weekly|bimonthly|monthly|quarterly|annual",
            s
        )
    })
}

fn parse_u32(sub: &clap::ArgMatches, key: &str) -> Result<Option<u32>> {
    match sub.get_one::<String>(key) {
        Some(raw) => Ok(Some(raw.trim().parse::<u32>().map_err(|_| {
            anyhow!("Invalid --{} value '{}', expected a number", key, raw)
        })?)),
        None => Ok(None),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = RuleDraft {
        name: sub.get_one::<String>("name").unwrap().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        kind: parse_kind(sub.get_one::<String>("kind").unwrap())?,
        category: sub.get_one::<String>("category").unwrap().to_string(),
        account: sub.get_one::<String>("account").unwrap().to_string(),
        payment_method: sub.get_one::<String>("method").map(|s| s.to_string()),
        frequency: parse_freq(sub.get_one::<String>("freq").unwrap())?,
        anchor_day: parse_u32(sub, "day")?,
        anchor_weekday: parse_u32(sub, "weekday")?,
        anchor_month: parse_u32(sub, "month")?,
        active: !sub.get_flag("inactive"),
    };
    let rule = store::create(conn, &draft)?;
    println!(
        "Added rule #{} '{}' ({} {}, {})",
        rule.id,
        rule.name,
        rule.frequency.as_str(),
        rule.anchor_label(),
        rule.amount
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let patch = RulePatch {
        name: sub.get_one::<String>("name").map(|s| s.to_string()),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        kind: sub
            .get_one::<String>("kind")
            .map(|s| parse_kind(s))
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        account: sub.get_one::<String>("account").map(|s| s.to_string()),
        payment_method: sub.get_one::<String>("method").map(|s| s.to_string()),
        frequency: sub
            .get_one::<String>("freq")
            .map(|s| parse_freq(s))
            .transpose()?,
        anchor_day: parse_u32(sub, "day")?,
        anchor_weekday: parse_u32(sub, "weekday")?,
        anchor_month: parse_u32(sub, "month")?,
        active: None,
    };
    let rule = store::update(conn, id, &patch)?;
    println!(
        "Updated rule #{} '{}' ({} {})",
        rule.id,
        rule.name,
        rule.frequency.as_str(),
        rule.anchor_label()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rules = store::list(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rules)? {
        let rows: Vec<Vec<String>> = rules
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.amount.to_string(),
                    r.kind.as_str().to_string(),
                    r.category.clone(),
                    r.account.clone(),
                    r.frequency.as_str().to_string(),
                    r.anchor_label(),
                    if r.active { "yes".into() } else { "no".into() },
                    r.last_fired.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Name", "Amount", "Kind", "Category", "Account", "Freq", "Anchor",
                    "Active", "Last fired",
                ],
                rows,
            )
        );
    }
    Ok(())
}
