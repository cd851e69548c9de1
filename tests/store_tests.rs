// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paycycle::db;
use paycycle::models::{Frequency, RuleKind};
use paycycle::store::{self, RuleDraft, RulePatch, StoreError};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn rent_draft() -> RuleDraft {
    RuleDraft {
        name: "Rent".into(),
        amount: dec("1200"),
        kind: RuleKind::Bill,
        category: "Housing".into(),
        account: "Checking".into(),
        payment_method: Some("Bank transfer".into()),
        frequency: Frequency::Monthly,
        anchor_day: Some(5),
        anchor_weekday: None,
        anchor_month: None,
        active: true,
    }
}

#[test]
fn create_assigns_id_and_defaults() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    assert!(rule.id > 0);
    assert!(rule.active);
    assert_eq!(rule.last_fired, None);
    assert!(!rule.created_at.is_empty());
    assert_eq!(store::list(&conn).unwrap().len(), 1);
}

#[test]
fn create_rejects_nonpositive_amount() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.amount = dec("0");
    match store::create(&conn, &draft) {
        Err(StoreError::Validation(msg)) => assert!(msg.contains("positive")),
        other => panic!("expected validation error, got {:?}", other.map(|r| r.id)),
    }
}

#[test]
fn create_rejects_empty_name() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.name = "   ".into();
    assert!(matches!(
        store::create(&conn, &draft),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn create_requires_day_anchor_for_monthly() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.anchor_day = None;
    assert!(matches!(
        store::create(&conn, &draft),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn create_requires_weekday_anchor_for_weekly() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.frequency = Frequency::Weekly;
    draft.anchor_day = None;
    assert!(matches!(
        store::create(&conn, &draft),
        Err(StoreError::Validation(_))
    ));

    draft.anchor_weekday = Some(7);
    assert!(matches!(
        store::create(&conn, &draft),
        Err(StoreError::Validation(_))
    ));

    draft.anchor_weekday = Some(5);
    assert!(store::create(&conn, &draft).is_ok());
}

#[test]
fn create_rejects_out_of_range_month_anchor() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.frequency = Frequency::Annual;
    draft.anchor_month = Some(13);
    assert!(matches!(
        store::create(&conn, &draft),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn bimonthly_needs_no_anchor() {
    let conn = setup();
    let mut draft = rent_draft();
    draft.frequency = Frequency::BiMonthly;
    draft.anchor_day = None;
    assert!(store::create(&conn, &draft).is_ok());
}

#[test]
fn update_merges_patch_fields() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    let patch = RulePatch {
        amount: Some(dec("1350")),
        ..Default::default()
    };
    let updated = store::update(&conn, rule.id, &patch).unwrap();
    assert_eq!(updated.amount, dec("1350"));
    assert_eq!(updated.name, "Rent");
    assert_eq!(updated.anchor_day, Some(5));
}

#[test]
fn update_unknown_id_is_not_found() {
    let conn = setup();
    let patch = RulePatch {
        name: Some("Ghost".into()),
        ..Default::default()
    };
    assert!(matches!(
        store::update(&conn, 99, &patch),
        Err(StoreError::NotFound(99))
    ));
}

#[test]
fn update_revalidates_merged_record() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    // Switching to weekly without supplying a weekday must fail
    let patch = RulePatch {
        frequency: Some(Frequency::Weekly),
        ..Default::default()
    };
    assert!(matches!(
        store::update(&conn, rule.id, &patch),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn update_cannot_reset_last_fired() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    conn.execute(
        "UPDATE recurrences SET last_fired='2024-06-05' WHERE id=?1",
        params![rule.id],
    )
    .unwrap();

    let patch = RulePatch {
        name: Some("Rent (new lease)".into()),
        ..Default::default()
    };
    let updated = store::update(&conn, rule.id, &patch).unwrap();
    assert_eq!(updated.name, "Rent (new lease)");
    assert_eq!(
        updated.last_fired,
        Some(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
    );
}

#[test]
fn delete_is_idempotent() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    store::delete(&conn, rule.id).unwrap();
    // Deleting an already-absent id is a no-op, not an error
    store::delete(&conn, rule.id).unwrap();
    assert!(store::list(&conn).unwrap().is_empty());
}

#[test]
fn set_active_toggles_and_reports_missing() {
    let conn = setup();
    let rule = store::create(&conn, &rent_draft()).unwrap();
    store::set_active(&conn, rule.id, false).unwrap();
    assert!(!store::get(&conn, rule.id).unwrap().active);
    store::set_active(&conn, rule.id, true).unwrap();
    assert!(store::get(&conn, rule.id).unwrap().active);
    assert!(matches!(
        store::set_active(&conn, 42, false),
        Err(StoreError::NotFound(42))
    ));
}

#[test]
fn list_on_empty_store_is_ok() {
    let conn = setup();
    assert!(store::list(&conn).unwrap().is_empty());
}
