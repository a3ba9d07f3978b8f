use chrono::NaiveDate;
use terminal_tickets::daypass::{DayPassLedger, DayPassStore, MemoryDayPassStore};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
}

#[test]
fn pass_is_found_case_insensitively_on_the_same_day() {
    let mut ledger = DayPassLedger::new(MemoryDayPassStore::default());
    let paid_at = day(2).and_hms_opt(8, 15, 0).expect("valid time");
    ledger
        .mark_paid("abc 123", "TF-2026-0042", paid_at)
        .expect("mark paid");

    let pass = ledger.paid_today(" ABC 123 ", day(2)).expect("pass today");
    assert_eq!(pass.receipt, "TF-2026-0042");
    assert_eq!(pass.time_label(), "08:15 AM");
}

#[test]
fn passes_reset_when_the_date_changes() {
    let mut ledger = DayPassLedger::new(MemoryDayPassStore::default());
    let paid_at = day(2).and_hms_opt(17, 0, 0).expect("valid time");
    ledger.mark_paid("XYZ789", "R-1", paid_at).expect("mark paid");

    assert!(ledger.paid_today("XYZ789", day(3)).is_none());
    assert!(ledger.store().is_empty());
    assert_eq!(ledger.store().date_key(), Some(day(3)));
}

#[test]
fn roll_over_only_resets_once_per_day() {
    let mut ledger = DayPassLedger::new(MemoryDayPassStore::default());
    assert!(ledger.roll_over(day(5)), "first use stores the date key");
    assert!(!ledger.roll_over(day(5)));
    assert!(ledger.roll_over(day(6)));
}

#[test]
fn marking_requires_plate_and_receipt() {
    let mut ledger = DayPassLedger::new(MemoryDayPassStore::default());
    let at = day(2).and_hms_opt(9, 0, 0).expect("valid time");
    let err = ledger.mark_paid("  ", "R-1", at).expect_err("blank plate");
    assert!(err.to_string().contains("plate"), "unexpected error: {err}");
    let err = ledger.mark_paid("ABC", " ", at).expect_err("blank receipt");
    assert!(err.to_string().contains("receipt"), "unexpected error: {err}");
    assert_eq!(ledger.store().len(), 0);
}

#[test]
fn backdated_payment_is_rejected_and_keeps_todays_passes() {
    let mut ledger = DayPassLedger::new(MemoryDayPassStore::default());
    let today = day(3).and_hms_opt(9, 0, 0).expect("valid time");
    ledger.mark_paid("ABC123", "R-3", today).expect("mark paid");

    let yesterday = day(2).and_hms_opt(16, 0, 0).expect("valid time");
    let err = ledger
        .mark_paid("XYZ789", "R-2", yesterday)
        .expect_err("backdated pass must fail");
    assert!(err.to_string().contains("predates"), "unexpected error: {err}");

    assert_eq!(ledger.store().date_key(), Some(day(3)));
    assert_eq!(ledger.store().len(), 1);
    let pass = ledger.paid_today("ABC123", day(3)).expect("pass kept");
    assert_eq!(pass.receipt, "R-3");
}
