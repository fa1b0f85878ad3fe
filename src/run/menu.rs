use std::io::{self, Write};

use anyhow::Result;
use crossterm::style::Stylize;

use crate::models::BudgetLedger;
use crate::service::{Clock, ExpenseService, SystemClock};
use crate::store::StoreError;

/// Interactive menu mode: one budgeting cycle at a time, driven by the
/// active ledger. Mirrors the classic month-by-month tracker flow.
pub(crate) fn as_menu(service: &ExpenseService) -> Result<()> {
    let clock = SystemClock;
    let mut ledger = startup_ledger(service, &clock)?;
    print_budget_loaded(&ledger);

    loop {
        print_menu();
        let choice = prompt("Enter your choice: ")?;
        let result = match choice.as_str() {
            "1" => add(service, &mut ledger),
            "2" => view_current(service, &ledger),
            "3" => view_earlier(service),
            "4" => delete(service, &mut ledger),
            "5" => reset(service).map(|fresh| ledger = fresh),
            "6" => category_total(service, &ledger),
            "7" => report(service, &ledger),
            "8" | "q" => {
                println!("{}", "Goodbye! See you next month.".green());
                return Ok(());
            }
            other => {
                println!("{}", format!("Invalid choice: {other}").red());
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("{}", format!("{e:#}").red());
        }
    }
}

/// Load the persisted ledger, demand a reset when none exists or when the
/// stored period is no longer the current one, and reconcile `spent`
/// against the record set before anything else runs.
fn startup_ledger(service: &ExpenseService, clock: &dyn Clock) -> Result<BudgetLedger> {
    let mut ledger = match service.load_ledger()? {
        Some(ledger) => ledger,
        None => {
            println!(
                "{}",
                "No previous budget found. Please set up a new budget.".yellow()
            );
            return reset(service);
        }
    };

    match service.check_current(&ledger, clock) {
        Ok(()) => {}
        Err(StoreError::StaleBudget { stored, current }) => {
            println!(
                "{}",
                format!("Budget is for {stored}, but it is now {current}. Please reset.").yellow()
            );
            return reset(service);
        }
        Err(e) => return Err(e.into()),
    }

    service.reconcile(&mut ledger)?;
    Ok(ledger)
}

fn print_budget_loaded(ledger: &BudgetLedger) {
    println!(
        "{}",
        format!(
            "Loaded budget for {}. Remaining: {:.2}",
            ledger.period,
            ledger.remaining()
        )
        .green()
    );
}

fn print_menu() {
    println!();
    println!("===== spendlog =====");
    println!("1. Add expense");
    println!("2. View current month");
    println!("3. View an earlier month");
    println!("4. Delete expense");
    println!("5. Reset month and budget");
    println!("6. Total for a category");
    println!("7. Write report file");
    println!("8. Quit");
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        anyhow::bail!("input closed");
    }
    Ok(line.trim().to_string())
}

// ── Menu actions ─────────────────────────────────────────────

fn add(service: &ExpenseService, ledger: &mut BudgetLedger) -> Result<()> {
    let description = prompt("Description: ")?;
    let amount = ExpenseService::parse_amount(&prompt("Amount: ")?)?;

    let period = ledger.period;
    let id = service.add_expense(&period, &description, amount, Some(&mut *ledger))?;
    println!("{}", format!("Expense #{id} added.").green());
    super::print_budget_status(ledger);
    Ok(())
}

fn view_current(service: &ExpenseService, ledger: &BudgetLedger) -> Result<()> {
    let (records, total) = service.list_expenses(&ledger.period)?;
    super::print_expense_table(&ledger.period, &records, total);
    Ok(())
}

fn view_earlier(service: &ExpenseService) -> Result<()> {
    let month = prompt("Month: ")?;
    let year = prompt("Year: ")?;
    let period = ExpenseService::parse_period(&month, &year)?;
    let (records, total) = service.list_expenses(&period)?;
    super::print_expense_table(&period, &records, total);
    Ok(())
}

fn delete(service: &ExpenseService, ledger: &mut BudgetLedger) -> Result<()> {
    let period = ledger.period;
    let (records, total) = service.list_expenses(&period)?;
    if records.is_empty() {
        println!("No expenses recorded for {period}.");
        return Ok(());
    }
    super::print_expense_table(&period, &records, total);

    let input = prompt("Id to delete: ")?;
    let id = input
        .parse::<u32>()
        .map_err(|_| StoreError::InvalidInput(format!("not an id: {input:?}")))?;
    let removed = service.delete_expense(&period, id, Some(&mut *ledger))?;
    println!(
        "{}",
        format!("Deleted #{id} ({}, {:.2}).", removed.description, removed.amount).green()
    );
    Ok(())
}

fn reset(service: &ExpenseService) -> Result<BudgetLedger> {
    let month = prompt("Month: ")?;
    let year = prompt("Year: ")?;
    let period = ExpenseService::parse_period(&month, &year)?;
    let budget = ExpenseService::parse_amount(&prompt(&format!("Budget for {period}: "))?)?;

    let mut ledger = service.reset_budget(period, budget)?;
    // Records may already exist for the chosen period.
    service.reconcile(&mut ledger)?;
    println!("{}", format!("Budget set for {period}.").green());
    Ok(ledger)
}

fn category_total(service: &ExpenseService, ledger: &BudgetLedger) -> Result<()> {
    let category = prompt("Category description: ")?;
    let total = service.total_for_category(&ledger.period, &category)?;
    println!("Total for {category:?} in {}: {total:.2}", ledger.period);
    Ok(())
}

fn report(service: &ExpenseService, ledger: &BudgetLedger) -> Result<()> {
    let doc = service.generate_report(&ledger.period, Some(ledger))?;
    let path = super::default_report_path(&ledger.period);
    super::write_report(&path, &doc)?;
    println!("{}", format!("Report written to {path}").green());
    Ok(())
}
