// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::integrity_issue;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Rules the engine will skip on every pass
    for rule in store::list(conn)? {
        if let Some(issue) = integrity_issue(&rule) {
            rows.push(vec![
                "malformed_rule".into(),
                format!("#{} '{}': {}", rule.id, rule.name, issue),
            ]);
        }
    }

    // 2) Materialized rows whose source rule was deleted. Informational only;
    //    they remain ordinary ledger entries.
    let mut stmt = conn.prepare(
        "SELECT id, source_rule_id FROM transactions WHERE source_rule_id IS NOT NULL \
         AND source_rule_id NOT IN (SELECT id FROM recurrences)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let tx_id: i64 = r.get(0)?;
        let rule_id: i64 = r.get(1)?;
        rows.push(vec![
            "orphaned_provenance".into(),
            format!("tx {} references deleted rule {}", tx_id, rule_id),
        ]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
