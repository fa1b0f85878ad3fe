mod budget;
mod expense;
mod period;

pub(crate) use budget::BudgetLedger;
pub(crate) use expense::Expense;
pub(crate) use period::{Month, Period};
