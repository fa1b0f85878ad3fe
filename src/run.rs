mod cli;
mod menu;

pub(crate) use cli::as_cli;
pub(crate) use menu::as_menu;

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::models::{BudgetLedger, Expense, Period};

// ── Shared console output ────────────────────────────────────

/// Description column width, matching the longest description the codec
/// can persist so rows always line up.
const DESC_COL: usize = crate::codec::DESC_MAX;
/// id (5) + gap (2) + description + gap (1) + amount (12).
const TABLE_WIDTH: usize = 5 + 2 + DESC_COL + 1 + 12;

fn expense_row(record: &Expense) -> String {
    let amount = format!("{:>12.2}", record.amount);
    let amount = if record.is_refund() {
        amount.green().to_string()
    } else {
        amount
    };
    format!(
        "{:>5}  {:<width$} {amount}",
        record.id,
        record.description,
        width = DESC_COL
    )
}

pub(crate) fn print_expense_table(period: &Period, records: &[Expense], total: f32) {
    if records.is_empty() {
        println!("No expenses recorded for {period}.");
        return;
    }
    println!("Expenses for {period}");
    println!(
        "{:>5}  {:<width$} {:>12}",
        "ID",
        "Description",
        "Amount",
        width = DESC_COL
    );
    println!("{}", "─".repeat(TABLE_WIDTH));
    for record in records {
        println!("{}", expense_row(record));
    }
    println!("{}", "─".repeat(TABLE_WIDTH));
    println!(
        "{:>5}  {:<width$} {total:>12.2}",
        "",
        "Total",
        width = DESC_COL
    );
}

/// One status line for the active ledger: red warning when over budget,
/// green remaining balance otherwise.
pub(crate) fn print_budget_status(ledger: &BudgetLedger) {
    if ledger.is_over_budget() {
        println!(
            "{}",
            format!(
                "WARNING: you have exceeded your budget for {} by {:.2}!",
                ledger.period,
                -ledger.remaining()
            )
            .red()
        );
    } else {
        println!(
            "{}",
            format!(
                "You can still spend {:.2} in {}.",
                ledger.remaining(),
                ledger.period
            )
            .green()
        );
    }
}

// ── Report writer ────────────────────────────────────────────

pub(crate) fn default_report_path(period: &Period) -> String {
    format!("report_{}_{}.txt", period.month, period.year)
}

/// Writing the report document to disk is the presentation layer's job;
/// an existing file at the path is overwritten.
pub(crate) fn write_report(path: &str, doc: &str) -> Result<()> {
    std::fs::write(path, doc).with_context(|| format!("Failed to write report: {path}"))
}
