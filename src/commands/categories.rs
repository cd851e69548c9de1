// Copyright (c) AlphaVelocity.
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
            registry_add(conn, "categories", name)?;
            println!("Added category '{}'", name.trim());
        }
        Some(("list", _)) => {
            let data = registry_list(conn, "categories")?
                .into_iter()
                .map(|n| vec![n])
                .collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            registry_remove(conn, "categories", name)?;
            println!("Removed category '{}'", name.trim());
        }
        _ => {}
    }
    Ok(())
}
