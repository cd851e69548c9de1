// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

use crate::models::Transaction;

/// Next dense ledger id: max(existing ids) + 1. Deliberate design choice over
/// AUTOINCREMENT so materialized ids stay dense and sortable alongside manual
/// entries.
pub fn next_id(conn: &Connection) -> Result<i64> {
    let max: Option<i64> = conn.query_row("SELECT MAX(id) FROM transactions", [], |r| r.get(0))?;
    Ok(max.unwrap_or(0) + 1)
}

/// Appends one transaction and returns its assigned id. The ledger is
/// append-only from the engine's point of view; existing rows are never
/// touched here.
pub fn append(conn: &Connection, tx: &Transaction) -> Result<i64> {
    let id = next_id(conn)?;
    conn.execute(
        "INSERT INTO transactions(id, date, amount, kind, category, account_from, account_to, \
         memo, source_rule_id) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            id,
            tx.date,
            tx.amount.to_string(),
            tx.kind,
            tx.category,
            tx.account_from,
            tx.account_to,
            tx.memo,
            tx.source_rule_id,
        ],
    )?;
    Ok(id)
}

#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub month: Option<String>,
    pub source_rule: Option<i64>,
    pub limit: Option<usize>,
}

pub fn list(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, date, amount, kind, category, account_from, account_to, memo, source_rule_id \
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(ref month) = filter.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(rule_id) = filter.source_rule {
        sql.push_str(" AND source_rule_id=?");
        params_vec.push(rule_id.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(tx_from_row(r)?);
    }
    Ok(data)
}

/// Removing a materialized row does not reset the originating rule's
/// `last_fired`; a deleted firing is not retried within the same period.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

fn tx_from_row(r: &Row) -> Result<Transaction> {
    let amount_s: String = r.get(2)?;
    let amount = amount_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in transactions", amount_s))?;
    let date: NaiveDate = r.get(1)?;
    Ok(Transaction {
        id: r.get(0)?,
        date,
        amount,
        kind: r.get(3)?,
        category: r.get(4)?,
        account_from: r.get(5)?,
        account_to: r.get(6)?,
        memo: r.get(7)?,
        source_rule_id: r.get(8)?,
    })
}
