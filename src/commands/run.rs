// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::utils::{parse_date, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let created = engine::process_due(conn, today)?;
    if created.is_empty() {
        println!("No recurrences due on {}", today);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = created
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.amount.to_string(),
                t.category.clone(),
                t.memo.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Date", "Amount", "Category", "Memo"], rows));
    println!("Materialized {} transaction(s) on {}", created.len(), today);
    Ok(())
}
