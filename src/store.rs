// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Frequency, RecurrenceRule, RuleKind};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("recurrence rule {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

/// Fields supplied by the caller at creation time; id, created_at and
/// last_fired are assigned by the store/engine.
#[derive(Debug, Clone)]
pub struct RuleDraft {
    pub name: String,
    pub amount: Decimal,
    pub kind: RuleKind,
    pub category: String,
    pub account: String,
    pub payment_method: Option<String>,
    pub frequency: Frequency,
    pub anchor_day: Option<u32>,
    pub anchor_weekday: Option<u32>,
    pub anchor_month: Option<u32>,
    pub active: bool,
}

/// Partial edit; None leaves the stored field untouched. `last_fired` is
/// deliberately absent so UI edits can never reset the idempotence guard.
#[derive(Debug, Clone, Default)]
pub struct RulePatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<RuleKind>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub payment_method: Option<String>,
    pub frequency: Option<Frequency>,
    pub anchor_day: Option<u32>,
    pub anchor_weekday: Option<u32>,
    pub anchor_month: Option<u32>,
    pub active: Option<bool>,
}

fn validate(
    name: &str,
    amount: Decimal,
    frequency: Frequency,
    anchor_day: Option<u32>,
    anchor_weekday: Option<u32>,
    anchor_month: Option<u32>,
) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    if amount <= Decimal::ZERO {
        return Err(StoreError::Validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    match frequency {
        Frequency::Weekly => match anchor_weekday {
            Some(0..=6) => {}
            Some(w) => {
                return Err(StoreError::Validation(format!(
                    "weekday anchor {} out of range 0-6 (Sunday=0)",
                    w
                )));
            }
            None => {
                return Err(StoreError::Validation(
                    "weekly rules require a weekday anchor (0-6, Sunday=0)".into(),
                ));
            }
        },
        Frequency::BiMonthly => {}
        Frequency::Monthly | Frequency::Quarterly | Frequency::Annual => match anchor_day {
            Some(1..=31) => {}
            Some(d) => {
                return Err(StoreError::Validation(format!(
                    "day anchor {} out of range 1-31",
                    d
                )));
            }
            None => {
                return Err(StoreError::Validation(format!(
                    "{} rules require a day-of-month anchor (1-31)",
                    frequency.as_str()
                )));
            }
        },
    }
    if let Some(m) = anchor_month {
        if !(1..=12).contains(&m) {
            return Err(StoreError::Validation(format!(
                "month anchor {} out of range 1-12",
                m
            )));
        }
    }
    Ok(())
}

fn rule_from_row(r: &Row) -> rusqlite::Result<RecurrenceRule> {
    let amount_s: String = r.get(2)?;
    let amount = amount_s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(RecurrenceRule {
        id: r.get(0)?,
        name: r.get(1)?,
        amount,
        kind: r.get(3)?,
        category: r.get(4)?,
        account: r.get(5)?,
        payment_method: r.get(6)?,
        frequency: r.get(7)?,
        anchor_day: r.get(8)?,
        anchor_weekday: r.get(9)?,
        anchor_month: r.get(10)?,
        active: r.get(11)?,
        last_fired: r.get(12)?,
        created_at: r.get(13)?,
    })
}

const RULE_COLS: &str = "id, name, amount, kind, category, account, payment_method, frequency, \
     anchor_day, anchor_weekday, anchor_month, active, last_fired, created_at";

pub fn list(conn: &Connection) -> Result<Vec<RecurrenceRule>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM recurrences ORDER BY id", RULE_COLS))?;
    let rows = stmt.query_map([], rule_from_row)?;
    let mut rules = Vec::new();
    for row in rows {
        rules.push(row?);
    }
    Ok(rules)
}

pub fn get(conn: &Connection, id: i64) -> Result<RecurrenceRule, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM recurrences WHERE id=?1", RULE_COLS))?;
    stmt.query_row(params![id], rule_from_row)
        .optional()?
        .ok_or(StoreError::NotFound(id))
}

pub fn create(conn: &Connection, draft: &RuleDraft) -> Result<RecurrenceRule, StoreError> {
    validate(
        &draft.name,
        draft.amount,
        draft.frequency,
        draft.anchor_day,
        draft.anchor_weekday,
        draft.anchor_month,
    )?;
    conn.execute(
        "INSERT INTO recurrences(name, amount, kind, category, account, payment_method, \
         frequency, anchor_day, anchor_weekday, anchor_month, active) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            draft.name.trim(),
            draft.amount.to_string(),
            draft.kind,
            draft.category,
            draft.account,
            draft.payment_method,
            draft.frequency,
            draft.anchor_day,
            draft.anchor_weekday,
            draft.anchor_month,
            draft.active,
        ],
    )?;
    get(conn, conn.last_insert_rowid())
}

pub fn update(conn: &Connection, id: i64, patch: &RulePatch) -> Result<RecurrenceRule, StoreError> {
    let existing = get(conn, id)?;
    let name = patch.name.clone().unwrap_or(existing.name);
    let amount = patch.amount.unwrap_or(existing.amount);
    let kind = patch.kind.unwrap_or(existing.kind);
    let category = patch.category.clone().unwrap_or(existing.category);
    let account = patch.account.clone().unwrap_or(existing.account);
    let payment_method = patch.payment_method.clone().or(existing.payment_method);
    let frequency = patch.frequency.unwrap_or(existing.frequency);
    let anchor_day = patch.anchor_day.or(existing.anchor_day);
    let anchor_weekday = patch.anchor_weekday.or(existing.anchor_weekday);
    let anchor_month = patch.anchor_month.or(existing.anchor_month);
    let active = patch.active.unwrap_or(existing.active);

    validate(&name, amount, frequency, anchor_day, anchor_weekday, anchor_month)?;
    conn.execute(
        "UPDATE recurrences SET name=?1, amount=?2, kind=?3, category=?4, account=?5, \
         payment_method=?6, frequency=?7, anchor_day=?8, anchor_weekday=?9, anchor_month=?10, \
         active=?11 WHERE id=?12",
        params![
            name.trim(),
            amount.to_string(),
            kind,
            category,
            account,
            payment_method,
            frequency,
            anchor_day,
            anchor_weekday,
            anchor_month,
            active,
            id,
        ],
    )?;
    get(conn, id)
}

/// Idempotent: deleting an already-absent id is a no-op, so a UI delete can
/// race a background evaluation without surfacing an error.
pub fn delete(conn: &Connection, id: i64) -> Result<(), StoreError> {
    conn.execute("DELETE FROM recurrences WHERE id=?1", params![id])?;
    Ok(())
}

pub fn set_active(conn: &Connection, id: i64, active: bool) -> Result<(), StoreError> {
    let n = conn.execute(
        "UPDATE recurrences SET active=?1 WHERE id=?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

/// Engine-only write path for the idempotence marker; not reachable from
/// `RulePatch`.
pub(crate) fn mark_fired(conn: &Connection, id: i64, date: NaiveDate) -> Result<(), StoreError> {
    let n = conn.execute(
        "UPDATE recurrences SET last_fired=?1 WHERE id=?2",
        params![date, id],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}
