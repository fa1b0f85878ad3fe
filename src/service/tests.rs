#![allow(clippy::unwrap_used)]

use super::*;
use crate::store::ExpenseStore;
use std::path::Path;

struct FixedClock(Period);

impl Clock for FixedClock {
    fn current_period(&self) -> Period {
        self.0
    }
}

fn march() -> Period {
    Period::new(Month::March, 2024)
}

fn service(dir: &Path) -> ExpenseService {
    ExpenseService::new(ExpenseStore::new(dir), ServiceConfig::default())
}

fn service_with(dir: &Path, config: ServiceConfig) -> ExpenseService {
    ExpenseService::new(ExpenseStore::new(dir), config)
}

// ── Id assignment ─────────────────────────────────────────────

#[test]
fn test_ids_start_at_one() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    assert_eq!(svc.add_expense(&march(), "Coffee", 3.5, None).unwrap(), 1);
    assert_eq!(svc.add_expense(&march(), "Lunch", 12.0, None).unwrap(), 2);
}

#[test]
fn test_ids_monotonic_across_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    for i in 0..4 {
        svc.add_expense(&march(), &format!("Item {i}"), 1.0, None)
            .unwrap();
    }
    svc.delete_expense(&march(), 4, None).unwrap();
    svc.delete_expense(&march(), 2, None).unwrap();

    // Highest surviving id is 3, so the next must be 4; id 2 is never reused.
    assert_eq!(svc.add_expense(&march(), "After", 1.0, None).unwrap(), 4);

    let (records, _) = svc.list_expenses(&march()).unwrap();
    let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_preserves_relative_order() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    for name in ["a", "b", "c", "d"] {
        svc.add_expense(&march(), name, 1.0, None).unwrap();
    }
    let removed = svc.delete_expense(&march(), 2, None).unwrap();
    assert_eq!(removed.description, "b");

    let (records, _) = svc.list_expenses(&march()).unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
}

#[test]
fn test_delete_unknown_id_is_not_found_and_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    for name in ["a", "b", "c"] {
        svc.add_expense(&march(), name, 1.0, None).unwrap();
    }
    let err = svc.delete_expense(&march(), 999, None).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 999, .. }));

    let (records, _) = svc.list_expenses(&march()).unwrap();
    assert_eq!(records.len(), 3);
}

// ── Capacity ──────────────────────────────────────────────────

#[test]
fn test_full_store_rejects_add_without_persisting() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_with(
        dir.path(),
        ServiceConfig {
            max_records: 2,
            match_mode: MatchMode::Exact,
        },
    );
    svc.add_expense(&march(), "a", 1.0, None).unwrap();
    svc.add_expense(&march(), "b", 1.0, None).unwrap();

    let err = svc.add_expense(&march(), "c", 1.0, None).unwrap_err();
    assert!(matches!(err, StoreError::Full { limit: 2, .. }));

    let (records, _) = svc.list_expenses(&march()).unwrap();
    assert_eq!(records.len(), 2);
}

// ── Listing ───────────────────────────────────────────────────

#[test]
fn test_list_without_file_is_empty_with_zero_total() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let (records, total) = svc.list_expenses(&march()).unwrap();
    assert!(records.is_empty());
    assert_eq!(total, 0.0);
}

#[test]
fn test_empty_totals_format_as_positive_zero() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    let (_, total) = svc.list_expenses(&march()).unwrap();
    assert_eq!(format!("{total:.2}"), "0.00");

    let cat = svc.total_for_category(&march(), "rent").unwrap();
    assert_eq!(format!("{cat:.2}"), "0.00");

    let mut ledger = svc.reset_budget(march(), 100.0).unwrap();
    svc.reconcile(&mut ledger).unwrap();
    assert_eq!(format!("{:.2}", ledger.spent), "0.00");
}

#[test]
fn test_list_total_sums_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.add_expense(&march(), "Groceries", 500.0, None).unwrap();
    svc.add_expense(&march(), "Refund", -100.0, None).unwrap();
    let (_, total) = svc.list_expenses(&march()).unwrap();
    assert_eq!(total, 400.0);
}

// ── Budget ledger ─────────────────────────────────────────────

#[test]
fn test_over_budget_scenario() {
    // Budget 600 in March 2024, then 500 + 200 of spending.
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let mut ledger = svc.reset_budget(march(), 600.0).unwrap();

    svc.add_expense(&march(), "Groceries", 500.0, Some(&mut ledger))
        .unwrap();
    assert!(!ledger.is_over_budget());

    svc.add_expense(&march(), "Movie", 200.0, Some(&mut ledger))
        .unwrap();
    assert_eq!(ledger.remaining(), -100.0);
    assert!(ledger.is_over_budget());

    // The overspent ledger was persisted too.
    let reloaded = svc.load_ledger().unwrap().unwrap();
    assert_eq!(reloaded.spent, 700.0);
}

#[test]
fn test_delete_refunds_active_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let mut ledger = svc.reset_budget(march(), 600.0).unwrap();
    let id = svc
        .add_expense(&march(), "Groceries", 500.0, Some(&mut ledger))
        .unwrap();
    svc.delete_expense(&march(), id, Some(&mut ledger)).unwrap();
    assert_eq!(ledger.spent, 0.0);
}

#[test]
fn test_other_period_does_not_touch_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let mut ledger = svc.reset_budget(march(), 600.0).unwrap();
    let april = Period::new(Month::April, 2024);
    svc.add_expense(&april, "Rent", 400.0, Some(&mut ledger))
        .unwrap();
    assert_eq!(ledger.spent, 0.0);
}

#[test]
fn test_reconcile_recomputes_spent_from_records() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.add_expense(&march(), "Groceries", 500.0, None).unwrap();
    svc.add_expense(&march(), "Movie", 200.0, None).unwrap();

    // Ledger file claims a spent figure that drifted from the record set.
    let mut lying = BudgetLedger::new(march(), 1000.0);
    lying.spent = 5.0;
    let store = ExpenseStore::new(dir.path());
    store.save_ledger(&lying).unwrap();

    let mut ledger = svc.load_ledger().unwrap().unwrap();
    svc.reconcile(&mut ledger).unwrap();
    assert_eq!(ledger.spent, 700.0);

    let (records, total) = svc.list_expenses(&march()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(ledger.spent, total);
}

#[test]
fn test_stale_ledger_detected() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let ledger = svc.reset_budget(march(), 600.0).unwrap();

    let clock = FixedClock(Period::new(Month::April, 2024));
    let err = svc.check_current(&ledger, &clock).unwrap_err();
    assert!(matches!(err, StoreError::StaleBudget { .. }));

    let same = FixedClock(march());
    assert!(svc.check_current(&ledger, &same).is_ok());
}

// ── Category totals ───────────────────────────────────────────

#[test]
fn test_category_total_exact_and_contains() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.add_expense(&march(), "Grocery", 50.0, None).unwrap();
    svc.add_expense(&march(), "Grocery Shopping", 30.0, None)
        .unwrap();
    svc.add_expense(&march(), "Movie", 20.0, None).unwrap();

    // Default mode: case-insensitive equality.
    assert_eq!(svc.total_for_category(&march(), "grocery").unwrap(), 50.0);

    // Substring mode also picks up "Grocery Shopping".
    assert_eq!(
        svc.total_for_category_with(&march(), "grocery", MatchMode::Contains)
            .unwrap(),
        80.0
    );
}

#[test]
fn test_category_total_no_match_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.add_expense(&march(), "Grocery", 50.0, None).unwrap();
    assert_eq!(svc.total_for_category(&march(), "rent").unwrap(), 0.0);
}

// ── Report ────────────────────────────────────────────────────

#[test]
fn test_report_contents() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let mut ledger = svc.reset_budget(march(), 600.0).unwrap();
    svc.add_expense(&march(), "Groceries", 500.0, Some(&mut ledger))
        .unwrap();
    svc.add_expense(&march(), "Movie", 200.0, Some(&mut ledger))
        .unwrap();

    let doc = svc.generate_report(&march(), Some(&ledger)).unwrap();
    assert!(doc.contains("Expense Report for March 2024"));
    assert!(doc.contains("Groceries"));
    assert!(doc.contains("Total: 700.00"));
    assert!(doc.contains("Budget: 600.00"));
    assert!(doc.contains("Remaining: -100.00 (over budget)"));
}

#[test]
fn test_report_for_empty_period() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let doc = svc.generate_report(&march(), None).unwrap();
    assert!(doc.contains("No expenses recorded."));
    assert!(doc.contains("Total: 0.00"));
    assert!(!doc.contains("Budget:"));
}

// ── Input classification ──────────────────────────────────────

#[test]
fn test_parse_period() {
    assert_eq!(
        ExpenseService::parse_period("March", "2024").unwrap(),
        march()
    );
    assert_eq!(ExpenseService::parse_period("3", "2024").unwrap(), march());
    assert!(matches!(
        ExpenseService::parse_period("Marchh", "2024"),
        Err(StoreError::InvalidInput(_))
    ));
    assert!(matches!(
        ExpenseService::parse_period("March", "twenty24"),
        Err(StoreError::InvalidInput(_))
    ));
}

#[test]
fn test_parse_amount_permissive_about_sign() {
    assert_eq!(ExpenseService::parse_amount("12.5").unwrap(), 12.5);
    assert_eq!(ExpenseService::parse_amount("-3").unwrap(), -3.0);
    assert!(matches!(
        ExpenseService::parse_amount("twelve"),
        Err(StoreError::InvalidInput(_))
    ));
}

#[test]
fn test_long_description_truncated_on_add() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let long = "d".repeat(80);
    svc.add_expense(&march(), &long, 1.0, None).unwrap();
    let (records, _) = svc.list_expenses(&march()).unwrap();
    assert_eq!(records[0].description.len(), 49);
}
