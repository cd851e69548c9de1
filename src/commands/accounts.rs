// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, registry_add, registry_list, registry_remove};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            registry_add(conn, "accounts", name)?;
            println!("Added account '{}'", name.trim());
        }
        Some(("list", _)) => {
            let data = registry_list(conn, "accounts")?
                .into_iter()
                .map(|n| vec![n])
                .collect();
            println!("{}", pretty_table(&["Account"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            registry_remove(conn, "accounts", name)?;
            println!("Removed account '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}
