// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paycycle::models::{Frequency, RuleKind};
use paycycle::store::{self, RuleDraft};
use paycycle::{db, engine, ledger};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn draft(name: &str, kind: RuleKind, frequency: Frequency) -> RuleDraft {
    RuleDraft {
        name: name.into(),
        amount: dec("100"),
        kind,
        category: "Misc".into(),
        account: "Checking".into(),
        payment_method: None,
        frequency,
        anchor_day: None,
        anchor_weekday: None,
        anchor_month: None,
        active: true,
    }
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn monthly_clamps_to_leap_february_end() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.amount = dec("1200");
    rent.anchor_day = Some(31);
    let rule = store::create(&conn, &rent).unwrap();

    let created = engine::process_due(&conn, d("2024-02-29")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].date, d("2024-02-29"));
    assert_eq!(created[0].amount, dec("-1200"));
    assert_eq!(created[0].source_rule_id, Some(rule.id));
    assert!(created[0].memo.as_deref().unwrap().contains("[recurring]"));
    assert_eq!(
        store::get(&conn, rule.id).unwrap().last_fired,
        Some(d("2024-02-29"))
    );
}

#[test]
fn rerun_same_day_is_noop() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(31);
    let rule = store::create(&conn, &rent).unwrap();

    let first = engine::process_due(&conn, d("2024-02-29")).unwrap();
    assert_eq!(first.len(), 1);
    let second = engine::process_due(&conn, d("2024-02-29")).unwrap();
    assert!(second.is_empty());
    assert_eq!(tx_count(&conn), 1);
    assert_eq!(
        store::get(&conn, rule.id).unwrap().last_fired,
        Some(d("2024-02-29"))
    );
}

#[test]
fn monthly_clamps_in_non_leap_february() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(31);
    store::create(&conn, &rent).unwrap();

    assert!(engine::process_due(&conn, d("2023-02-27")).unwrap().is_empty());
    let created = engine::process_due(&conn, d("2023-02-28")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].date, d("2023-02-28"));
}

#[test]
fn monthly_fires_on_exact_anchor_in_long_month() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(31);
    store::create(&conn, &rent).unwrap();

    assert!(engine::process_due(&conn, d("2024-01-30")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2024-01-31")).unwrap().len(), 1);
}

#[test]
fn monthly_does_not_refire_within_month() {
    let conn = setup();
    let mut sub = draft("Streaming", RuleKind::Expense, Frequency::Monthly);
    sub.anchor_day = Some(15);
    let rule = store::create(&conn, &sub).unwrap();
    conn.execute(
        "UPDATE recurrences SET last_fired='2024-03-01' WHERE id=?1",
        params![rule.id],
    )
    .unwrap();

    assert!(engine::process_due(&conn, d("2024-03-15")).unwrap().is_empty());
    // Next month is a fresh period
    assert_eq!(engine::process_due(&conn, d("2024-04-15")).unwrap().len(), 1);
}

#[test]
fn weekly_fires_on_consecutive_mondays_once_each() {
    let conn = setup();
    let mut gym = draft("Gym", RuleKind::Expense, Frequency::Weekly);
    gym.anchor_weekday = Some(1); // Monday, Sunday=0

    store::create(&conn, &gym).unwrap();

    // 2024-03-04 and 2024-03-11 are Mondays
    assert_eq!(engine::process_due(&conn, d("2024-03-04")).unwrap().len(), 1);
    assert!(engine::process_due(&conn, d("2024-03-04")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2024-03-11")).unwrap().len(), 1);
    assert_eq!(tx_count(&conn), 2);
}

#[test]
fn weekly_skips_non_anchor_weekday() {
    let conn = setup();
    let mut gym = draft("Gym", RuleKind::Expense, Frequency::Weekly);
    gym.anchor_weekday = Some(1);
    store::create(&conn, &gym).unwrap();

    // Tuesday
    assert!(engine::process_due(&conn, d("2024-03-05")).unwrap().is_empty());
}

#[test]
fn bimonthly_slots_are_independent() {
    let conn = setup();
    let mut allowance = draft("Allowance", RuleKind::Expense, Frequency::BiMonthly);
    allowance.amount = dec("50");
    let rule = store::create(&conn, &allowance).unwrap();
    conn.execute(
        "UPDATE recurrences SET last_fired='2024-03-01' WHERE id=?1",
        params![rule.id],
    )
    .unwrap();

    let created = engine::process_due(&conn, d("2024-03-15")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(
        store::get(&conn, rule.id).unwrap().last_fired,
        Some(d("2024-03-15"))
    );
    // Off-slot days never fire
    assert!(engine::process_due(&conn, d("2024-03-20")).unwrap().is_empty());
}

#[test]
fn quarterly_follows_fixed_grid() {
    let conn = setup();
    let mut tax = draft("Estimated tax", RuleKind::Bill, Frequency::Quarterly);
    tax.anchor_day = Some(10);
    store::create(&conn, &tax).unwrap();

    assert_eq!(engine::process_due(&conn, d("2024-01-10")).unwrap().len(), 1);
    assert!(engine::process_due(&conn, d("2024-01-10")).unwrap().is_empty());
    // February is not a quarter-boundary month
    assert!(engine::process_due(&conn, d("2024-02-10")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2024-04-10")).unwrap().len(), 1);
    assert_eq!(engine::process_due(&conn, d("2024-07-10")).unwrap().len(), 1);
    assert_eq!(engine::process_due(&conn, d("2024-10-10")).unwrap().len(), 1);
    assert_eq!(tx_count(&conn), 4);
}

#[test]
fn annual_anchor_month_is_respected() {
    let conn = setup();
    let mut insurance = draft("Insurance", RuleKind::Bill, Frequency::Annual);
    insurance.anchor_day = Some(15);
    insurance.anchor_month = Some(3);
    store::create(&conn, &insurance).unwrap();

    assert!(engine::process_due(&conn, d("2024-01-15")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2024-03-15")).unwrap().len(), 1);
    assert!(engine::process_due(&conn, d("2024-03-15")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2025-03-15")).unwrap().len(), 1);
}

#[test]
fn annual_without_month_anchor_fires_once_per_year() {
    let conn = setup();
    let mut dues = draft("Dues", RuleKind::Bill, Frequency::Annual);
    dues.anchor_day = Some(15);
    store::create(&conn, &dues).unwrap();

    assert_eq!(engine::process_due(&conn, d("2024-01-15")).unwrap().len(), 1);
    // Year-gated: day 15 of a later month stays quiet
    assert!(engine::process_due(&conn, d("2024-02-15")).unwrap().is_empty());
    assert_eq!(engine::process_due(&conn, d("2025-01-15")).unwrap().len(), 1);
}

#[test]
fn inactive_rule_never_fires() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(31);
    rent.active = false;
    store::create(&conn, &rent).unwrap();

    assert!(engine::process_due(&conn, d("2024-01-31")).unwrap().is_empty());
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn malformed_rule_is_skipped_without_blocking_others() {
    let conn = setup();
    // Monthly rule with no day anchor, inserted behind the store's validation
    conn.execute(
        "INSERT INTO recurrences(name, amount, kind, category, account, frequency, anchor_day) \
         VALUES('Broken','10','bill','Misc','Checking','monthly',NULL)",
        [],
    )
    .unwrap();
    let mut good = draft("Streaming", RuleKind::Expense, Frequency::Monthly);
    good.anchor_day = Some(15);
    let rule = store::create(&conn, &good).unwrap();

    let created = engine::process_due(&conn, d("2024-01-15")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].source_rule_id, Some(rule.id));
}

#[test]
fn materialized_ids_extend_the_ledger_densely() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(id, date, amount, kind, category) \
         VALUES(41, '2024-01-01', '-5', 'expense', 'Misc')",
        [],
    )
    .unwrap();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(1);
    store::create(&conn, &rent).unwrap();
    let mut salary = draft("Salary", RuleKind::Income, Frequency::Monthly);
    salary.anchor_day = Some(1);
    store::create(&conn, &salary).unwrap();

    let created = engine::process_due(&conn, d("2024-02-01")).unwrap();
    let mut ids: Vec<i64> = created.iter().map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![42, 43]);
}

#[test]
fn income_sign_and_account_flow() {
    let conn = setup();
    let mut salary = draft("Salary", RuleKind::Income, Frequency::Monthly);
    salary.amount = dec("3000");
    salary.anchor_day = Some(1);
    store::create(&conn, &salary).unwrap();

    let created = engine::process_due(&conn, d("2024-05-01")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].amount, dec("3000"));
    assert_eq!(created[0].account_to.as_deref(), Some("Checking"));
    assert_eq!(created[0].account_from, None);
}

#[test]
fn deleting_materialized_tx_does_not_replay() {
    let conn = setup();
    let mut rent = draft("Rent", RuleKind::Bill, Frequency::Monthly);
    rent.anchor_day = Some(5);
    let rule = store::create(&conn, &rent).unwrap();

    let created = engine::process_due(&conn, d("2024-06-05")).unwrap();
    assert_eq!(created.len(), 1);
    ledger::delete(&conn, created[0].id).unwrap();

    // The firing is not retried within the same period
    assert!(engine::process_due(&conn, d("2024-06-05")).unwrap().is_empty());
    assert_eq!(
        store::get(&conn, rule.id).unwrap().last_fired,
        Some(d("2024-06-05"))
    );
}
