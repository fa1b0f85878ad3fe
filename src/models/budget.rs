use crate::models::Period;

/// Budget state for one active period.
///
/// There is no "uninitialized" ledger value; a missing ledger file loads as
/// `None` and the caller must reset before any spend-affecting operation.
/// `spent` is a derived figure: the service recomputes it from the period's
/// record set on reconcile and never trusts the persisted value across loads.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetLedger {
    pub period: Period,
    pub budget: f32,
    pub spent: f32,
}

impl BudgetLedger {
    pub(crate) fn new(period: Period, budget: f32) -> Self {
        Self {
            period,
            budget,
            spent: 0.0,
        }
    }

    /// Whether this ledger tracks the given period.
    pub(crate) fn covers(&self, period: &Period) -> bool {
        self.period == *period
    }

    /// No clamping: exceeding the budget is a warning for the caller,
    /// not a rejected operation.
    pub(crate) fn record_spend(&mut self, amount: f32) {
        self.spent += amount;
    }

    pub(crate) fn record_refund(&mut self, amount: f32) {
        self.spent -= amount;
    }

    /// May be negative.
    pub(crate) fn remaining(&self) -> f32 {
        self.budget - self.spent
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}
