//! The orchestrating expense API. Every operation is load → mutate/query →
//! persist against the period file store, with the budget ledger kept
//! consistent along the way. The ledger is an explicit value handed in by
//! the caller, never ambient state.

use std::fmt::Write as _;

use chrono::Datelike;

use crate::categorize::{CategoryMatcher, MatchMode};
use crate::codec;
use crate::models::{BudgetLedger, Expense, Month, Period};
use crate::store::{ExpenseStore, StoreError};

/// Capacity carried over from the original record arrays, now an explicit
/// configuration value checked before append.
pub(crate) const DEFAULT_MAX_RECORDS: usize = 10_000;

/// Supplies the "current period" used for ledger staleness checks.
pub(crate) trait Clock {
    fn current_period(&self) -> Period;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn current_period(&self) -> Period {
        let now = chrono::Local::now();
        // chrono months are always in 1..=12.
        let month = Month::from_index(now.month()).unwrap_or(Month::January);
        Period::new(month, now.year())
    }
}

pub(crate) struct ServiceConfig {
    pub max_records: usize,
    pub match_mode: MatchMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            match_mode: MatchMode::default(),
        }
    }
}

pub(crate) struct ExpenseService {
    store: ExpenseStore,
    config: ServiceConfig,
}

impl ExpenseService {
    pub(crate) fn new(store: ExpenseStore, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Append a new expense and return its assigned id. Ids are
    /// `max(existing) + 1`, so they stay unique and monotonic within a
    /// period even across deletes. When the given ledger covers the period,
    /// the spend is recorded against it and the ledger persisted; whether
    /// that pushed it over budget is the caller's to inspect.
    pub(crate) fn add_expense(
        &self,
        period: &Period,
        description: &str,
        amount: f32,
        mut ledger: Option<&mut BudgetLedger>,
    ) -> Result<u32, StoreError> {
        let mut records = self.store.load(period)?;
        if records.len() >= self.config.max_records {
            return Err(StoreError::Full {
                period: *period,
                limit: self.config.max_records,
            });
        }

        let id = next_id(&records);
        // Truncate up front so the in-memory record matches what persists.
        let description = codec::truncate_description(description).to_string();
        records.push(Expense::new(id, description, amount));
        self.store.save_all(period, &records)?;

        if let Some(ledger) = ledger.as_deref_mut() {
            if ledger.covers(period) {
                ledger.record_spend(amount);
                self.store.save_ledger(ledger)?;
            }
        }
        Ok(id)
    }

    /// Remove an expense by id, preserving the relative order of the rest.
    pub(crate) fn delete_expense(
        &self,
        period: &Period,
        id: u32,
        mut ledger: Option<&mut BudgetLedger>,
    ) -> Result<Expense, StoreError> {
        let mut records = self.store.load(period)?;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound {
                period: *period,
                id,
            })?;
        let removed = records.remove(index);
        self.store.save_all(period, &records)?;

        if let Some(ledger) = ledger.as_deref_mut() {
            if ledger.covers(period) {
                ledger.record_refund(removed.amount);
                self.store.save_ledger(ledger)?;
            }
        }
        Ok(removed)
    }

    /// All records for a period, in insertion order, plus their total.
    /// A period with no file yet is an empty set with total 0.
    pub(crate) fn list_expenses(&self, period: &Period) -> Result<(Vec<Expense>, f32), StoreError> {
        let records = self.store.load(period)?;
        let total = sum_amounts(records.iter());
        Ok((records, total))
    }

    /// Sum of amounts whose description matches `category` under the
    /// configured match mode.
    pub(crate) fn total_for_category(
        &self,
        period: &Period,
        category: &str,
    ) -> Result<f32, StoreError> {
        self.total_for_category_with(period, category, self.config.match_mode)
    }

    pub(crate) fn total_for_category_with(
        &self,
        period: &Period,
        category: &str,
        mode: MatchMode,
    ) -> Result<f32, StoreError> {
        let matcher = CategoryMatcher::new(mode, category)?;
        let records = self.store.load(period)?;
        Ok(sum_amounts(
            records.iter().filter(|r| matcher.matches(&r.description)),
        ))
    }

    /// Plain-text summary of a period's records. Writing it anywhere is the
    /// caller's concern.
    pub(crate) fn generate_report(
        &self,
        period: &Period,
        ledger: Option<&BudgetLedger>,
    ) -> Result<String, StoreError> {
        let (records, total) = self.list_expenses(period)?;

        let mut doc = String::new();
        let _ = writeln!(doc, "===== Expense Report for {period} =====");
        let _ = writeln!(doc);
        if records.is_empty() {
            let _ = writeln!(doc, "No expenses recorded.");
        } else {
            let _ = writeln!(doc, "{:>5}  {:<49} {:>12}", "ID", "Description", "Amount");
            for record in &records {
                let _ = writeln!(
                    doc,
                    "{:>5}  {:<49} {:>12.2}",
                    record.id, record.description, record.amount
                );
            }
        }
        let _ = writeln!(doc);
        let _ = writeln!(doc, "Total: {total:.2}");
        if let Some(ledger) = ledger.filter(|l| l.covers(period)) {
            let _ = writeln!(doc, "Budget: {:.2}", ledger.budget);
            if ledger.is_over_budget() {
                let _ = writeln!(doc, "Remaining: {:.2} (over budget)", ledger.remaining());
            } else {
                let _ = writeln!(doc, "Remaining: {:.2}", ledger.remaining());
            }
        }
        Ok(doc)
    }

    // ── Budget ledger ─────────────────────────────────────────

    pub(crate) fn load_ledger(&self) -> Result<Option<BudgetLedger>, StoreError> {
        self.store.load_ledger()
    }

    /// Start a fresh budgeting cycle: new period, new ceiling, zero spent,
    /// persisted immediately.
    pub(crate) fn reset_budget(
        &self,
        period: Period,
        budget: f32,
    ) -> Result<BudgetLedger, StoreError> {
        let ledger = BudgetLedger::new(period, budget);
        self.store.save_ledger(&ledger)?;
        Ok(ledger)
    }

    /// Recompute `spent` from the authoritative record set and persist.
    /// The value stored in the ledger file is never trusted across loads;
    /// this guards against drift when files were edited out of band.
    pub(crate) fn reconcile(&self, ledger: &mut BudgetLedger) -> Result<(), StoreError> {
        let records = self.store.load(&ledger.period)?;
        ledger.spent = sum_amounts(records.iter());
        self.store.save_ledger(ledger)
    }

    /// A ledger for a period other than the clock's is stale; the caller
    /// must reset before any spend-affecting operation.
    pub(crate) fn check_current(
        &self,
        ledger: &BudgetLedger,
        clock: &dyn Clock,
    ) -> Result<(), StoreError> {
        let current = clock.current_period();
        if ledger.period != current {
            return Err(StoreError::StaleBudget {
                stored: ledger.period,
                current,
            });
        }
        Ok(())
    }

    // ── Input classification ──────────────────────────────────

    pub(crate) fn parse_period(month: &str, year: &str) -> Result<Period, StoreError> {
        let month = Month::parse(month)
            .ok_or_else(|| StoreError::InvalidInput(format!("not a month: {month:?}")))?;
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| StoreError::InvalidInput(format!("not a year: {year:?}")))?;
        Ok(Period::new(month, year))
    }

    pub(crate) fn parse_amount(s: &str) -> Result<f32, StoreError> {
        s.trim()
            .parse::<f32>()
            .map_err(|_| StoreError::InvalidInput(format!("not an amount: {s:?}")))
    }
}

fn next_id(records: &[Expense]) -> u32 {
    records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}

/// Folds from positive zero: `Sum` for floats starts at `-0.0`, which would
/// surface as `-0.00` when an empty total is formatted.
fn sum_amounts<'a>(records: impl Iterator<Item = &'a Expense>) -> f32 {
    records.fold(0.0, |acc, r| acc + r.amount)
}

#[cfg(test)]
mod tests;
