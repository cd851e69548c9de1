// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Determines the ledger sign and account flow of a materialized transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Income,
    Bill,
    Expense,
    Saving,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Income => "income",
            RuleKind::Bill => "bill",
            RuleKind::Expense => "expense",
            RuleKind::Saving => "saving",
        }
    }

    pub fn parse(s: &str) -> Option<RuleKind> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(RuleKind::Income),
            "bill" => Some(RuleKind::Bill),
            "expense" => Some(RuleKind::Expense),
            "saving" => Some(RuleKind::Saving),
            _ => None,
        }
    }

    /// Income credits the ledger; everything else debits it.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            RuleKind::Income => amount,
            _ => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    BiMonthly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::BiMonthly => "bimonthly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Frequency> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Some(Frequency::Weekly),
            "bimonthly" => Some(Frequency::BiMonthly),
            "monthly" => Some(Frequency::Monthly),
            "quarterly" => Some(Frequency::Quarterly),
            "annual" => Some(Frequency::Annual),
            _ => None,
        }
    }
}

impl ToSql for RuleKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RuleKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|s| {
            RuleKind::parse(s)
                .ok_or_else(|| FromSqlError::Other(format!("unknown kind '{}'", s).into()))
        })
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|s| {
            Frequency::parse(s)
                .ok_or_else(|| FromSqlError::Other(format!("unknown frequency '{}'", s).into()))
        })
    }
}

/// A user-declared recurring obligation or income. Exactly one anchor
/// dimension is meaningful per frequency: `anchor_weekday` for weekly rules,
/// `anchor_day` for monthly/quarterly/annual, neither for bimonthly (fixed
/// 1st/15th slots). `last_fired` is the sole idempotence guard and is written
/// only by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: i64,
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
    pub last_fired: Option<NaiveDate>,
    pub created_at: String,
}

impl RecurrenceRule {
    /// Human-readable anchor for list output.
    pub fn anchor_label(&self) -> String {
        match self.frequency {
            Frequency::Weekly => self
                .anchor_weekday
                .and_then(|w| WEEKDAYS.get(w as usize))
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".into()),
            Frequency::BiMonthly => "1st & 15th".into(),
            Frequency::Monthly | Frequency::Quarterly => self
                .anchor_day
                .map(|d| format!("day {}", d))
                .unwrap_or_else(|| "?".into()),
            Frequency::Annual => match (self.anchor_month, self.anchor_day) {
                (Some(m), Some(d)) if (1..=12).contains(&m) => {
                    format!("{} {}", MONTHS[(m - 1) as usize], d)
                }
                (None, Some(d)) => format!("day {}", d),
                _ => "?".into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: RuleKind,
    pub category: String,
    pub account_from: Option<String>,
    pub account_to: Option<String>,
    pub memo: Option<String>,
    pub source_rule_id: Option<i64>,
}
