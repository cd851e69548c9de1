// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use crate::models::{Frequency, RecurrenceRule, RuleKind, Transaction};
use crate::utils::days_in_month;
use crate::{ledger, store};

/// Evaluates every active rule against `today`, materializes one ledger
/// transaction per due rule, and advances its `last_fired` marker before
/// moving to the next rule. Safe to call any number of times per day: a rule
/// that already fired in the current period is a no-op. A malformed stored
/// rule is skipped with a warning, never allowed to abort the batch.
pub fn process_due(conn: &Connection, today: NaiveDate) -> Result<Vec<Transaction>> {
    let rules = store::list(conn)?;
    let mut created = Vec::new();
    for rule in rules {
        if !rule.active {
            continue;
        }
        if let Some(issue) = integrity_issue(&rule) {
            eprintln!("warning: skipping rule {} '{}': {}", rule.id, rule.name, issue);
            continue;
        }
        if !is_due(&rule, today) {
            continue;
        }
        let tx = materialize(conn, &rule, today)?;
        store::mark_fired(conn, rule.id, today)?;
        created.push(tx);
    }
    Ok(created)
}

/// Why a stored rule cannot be evaluated, if anything. Stored data can drift
/// from the create/update validation (hand-edited db, older schema), so the
/// engine re-checks before every pass and `doctor` reports the same findings.
pub fn integrity_issue(rule: &RecurrenceRule) -> Option<String> {
    match rule.frequency {
        Frequency::Weekly => match rule.anchor_weekday {
            Some(0..=6) => None,
            Some(w) => Some(format!("weekday anchor {} out of range 0-6", w)),
            None => Some("weekly rule has no weekday anchor".into()),
        },
        Frequency::BiMonthly => None,
        Frequency::Monthly | Frequency::Quarterly | Frequency::Annual => match rule.anchor_day {
            Some(1..=31) => None,
            Some(d) => Some(format!("day anchor {} out of range 1-31", d)),
            None => Some(format!(
                "{} rule has no day-of-month anchor",
                rule.frequency.as_str()
            )),
        },
    }
}

/// Pure due-ness check over (rule, today). Nothing is cached across calls;
/// `last_fired` is the only persisted state consulted.
pub fn is_due(rule: &RecurrenceRule, today: NaiveDate) -> bool {
    // Same-day guard: one evaluation burst must not double-fire.
    if rule.last_fired == Some(today) {
        return false;
    }
    match rule.frequency {
        Frequency::Weekly => {
            let Some(anchor) = rule.anchor_weekday else {
                return false;
            };
            if today.weekday().num_days_from_sunday() != anchor {
                return false;
            }
            // 7-day floor, not a calendar-week boundary: prevents a re-fire
            // when evaluation skips a day and catches up mid-week.
            rule.last_fired.is_none_or(|lf| (today - lf).num_days() >= 7)
        }
        Frequency::BiMonthly => {
            let day = today.day();
            if day != 1 && day != 15 {
                return false;
            }
            // The 1st and the 15th are independent slots within one month.
            rule.last_fired.is_none_or(|lf| {
                !(lf.year() == today.year() && lf.month() == today.month() && lf.day() == day)
            })
        }
        Frequency::Monthly => {
            let Some(anchor) = rule.anchor_day else {
                return false;
            };
            if !hits_clamped_day(today, anchor) {
                return false;
            }
            rule.last_fired
                .is_none_or(|lf| !(lf.year() == today.year() && lf.month() == today.month()))
        }
        Frequency::Quarterly => {
            let Some(anchor) = rule.anchor_day else {
                return false;
            };
            // Fixed quarter grid (Jan/Apr/Jul/Oct), not relative to rule
            // creation.
            if (today.month() - 1) % 3 != 0 {
                return false;
            }
            if !hits_clamped_day(today, anchor) {
                return false;
            }
            rule.last_fired.is_none_or(|lf| months_between(lf, today) >= 3)
        }
        Frequency::Annual => {
            let Some(anchor) = rule.anchor_day else {
                return false;
            };
            if let Some(month) = rule.anchor_month {
                if today.month() != month {
                    return false;
                }
            }
            if !hits_clamped_day(today, anchor) {
                return false;
            }
            rule.last_fired.is_none_or(|lf| lf.year() != today.year())
        }
    }
}

/// True when `today` lands on the anchor day, clamped to the last day of the
/// month for anchors the month cannot reach (day 31 in a 30-day month, day
/// 29-31 in February).
fn hits_clamped_day(today: NaiveDate, anchor: u32) -> bool {
    let last = days_in_month(today.year(), today.month());
    today.day() == anchor || (anchor > last && today.day() == last)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

fn materialize(conn: &Connection, rule: &RecurrenceRule, today: NaiveDate) -> Result<Transaction> {
    let (account_from, account_to) = match rule.kind {
        RuleKind::Income => (None, Some(rule.account.clone())),
        _ => (Some(rule.account.clone()), None),
    };
    let mut tx = Transaction {
        id: 0,
        date: today,
        amount: rule.kind.signed(rule.amount),
        kind: rule.kind,
        category: rule.category.clone(),
        account_from,
        account_to,
        memo: Some(format!("{} [recurring]", rule.name)),
        source_rule_id: Some(rule.id),
    };
    tx.id = ledger::append(conn, &tx)?;
    Ok(tx)
}
