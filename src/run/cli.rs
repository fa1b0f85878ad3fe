use anyhow::Result;
use crossterm::style::Stylize;

use crate::categorize::MatchMode;
use crate::models::{BudgetLedger, Period};
use crate::service::{Clock, ExpenseService, SystemClock};
use crate::store::StoreError;

pub(crate) fn as_cli(args: &[String], service: &ExpenseService) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], service),
        "list" | "ls" => cli_list(&args[2..], service),
        "delete" | "rm" => cli_delete(&args[2..], service),
        "total" => cli_total(&args[2..], service),
        "report" => cli_report(&args[2..], service),
        "budget" => cli_budget(&args[2..], service),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("spendlog — local-only monthly expense tracker");
    println!();
    println!("Usage: spendlog [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive menu");
    println!("  add <description> <amount>    Record an expense");
    println!("  list                          List a period's expenses and total");
    println!("  delete <id>                   Delete an expense by id");
    println!("  total <category>              Sum expenses matching a category");
    println!("    --match <exact|contains|regex>");
    println!("  report                        Write a period report to a text file");
    println!("    --out <path>                Report destination (default: report_<Month>_<year>.txt)");
    println!("  budget                        Show the active budget");
    println!("  budget set <amount>           Reset the budget for a period");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Period flags (default: the active budget period, else the current month):");
    println!("  --month <name|1-12>  --year <yyyy>");
}

// ── Flag and period handling ─────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Positional arguments left over once known flags and their values are
/// stripped.
fn positionals(args: &[String]) -> Vec<&String> {
    const FLAGS: [&str; 4] = ["--month", "--year", "--match", "--out"];
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if FLAGS.contains(&args[i].as_str()) {
            i += 2;
        } else {
            out.push(&args[i]);
            i += 1;
        }
    }
    out
}

/// `--month`/`--year` when given; otherwise the active ledger's period,
/// falling back to the clock for a first run.
fn resolve_period(args: &[String], service: &ExpenseService) -> Result<Period> {
    let current = SystemClock.current_period();
    let month = flag_value(args, "--month");
    let year = flag_value(args, "--year");

    if month.is_none() && year.is_none() {
        if let Some(ledger) = service.load_ledger()? {
            return Ok(ledger.period);
        }
        return Ok(current);
    }

    let month = month.map(str::to_string);
    let year = year.map(str::to_string);
    let period = ExpenseService::parse_period(
        &month.unwrap_or_else(|| current.month.name().to_string()),
        &year.unwrap_or_else(|| current.year.to_string()),
    )?;
    Ok(period)
}

/// The persisted ledger, but only when it covers the period being touched.
/// `spent` is reconciled against the record set before use; the stored
/// running total is never carried across loads.
pub(super) fn active_ledger(
    service: &ExpenseService,
    period: &Period,
) -> Result<Option<BudgetLedger>> {
    let Some(mut ledger) = service.load_ledger()?.filter(|l| l.covers(period)) else {
        return Ok(None);
    };
    service.reconcile(&mut ledger)?;
    Ok(Some(ledger))
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], service: &ExpenseService) -> Result<()> {
    let pos = positionals(args);
    if pos.len() != 2 {
        anyhow::bail!("Usage: spendlog add <description> <amount> [--month <m> --year <y>]");
    }
    let description = pos[0];
    let amount = ExpenseService::parse_amount(pos[1])?;
    let period = resolve_period(args, service)?;

    let mut ledger = active_ledger(service, &period)?;
    let id = service.add_expense(&period, description, amount, ledger.as_mut())?;
    println!("Added expense #{id} to {period}");
    if let Some(ledger) = &ledger {
        super::print_budget_status(ledger);
    }
    Ok(())
}

fn cli_list(args: &[String], service: &ExpenseService) -> Result<()> {
    let period = resolve_period(args, service)?;
    let (records, total) = service.list_expenses(&period)?;
    super::print_expense_table(&period, &records, total);
    Ok(())
}

fn cli_delete(args: &[String], service: &ExpenseService) -> Result<()> {
    let pos = positionals(args);
    if pos.len() != 1 {
        anyhow::bail!("Usage: spendlog delete <id> [--month <m> --year <y>]");
    }
    let id = pos[0]
        .parse::<u32>()
        .map_err(|_| StoreError::InvalidInput(format!("not an id: {:?}", pos[0])))?;
    let period = resolve_period(args, service)?;

    let mut ledger = active_ledger(service, &period)?;
    let removed = service.delete_expense(&period, id, ledger.as_mut())?;
    println!(
        "Deleted #{id} ({}, {:.2}) from {period}",
        removed.description, removed.amount
    );
    Ok(())
}

fn cli_total(args: &[String], service: &ExpenseService) -> Result<()> {
    let pos = positionals(args);
    if pos.len() != 1 {
        anyhow::bail!("Usage: spendlog total <category> [--match <mode>] [--month <m> --year <y>]");
    }
    let category = pos[0];
    let period = resolve_period(args, service)?;

    let total = match flag_value(args, "--match") {
        Some(mode_text) => {
            let mode = MatchMode::parse(mode_text).ok_or_else(|| {
                StoreError::InvalidInput(format!("not a match mode: {mode_text:?}"))
            })?;
            service.total_for_category_with(&period, category, mode)?
        }
        None => service.total_for_category(&period, category)?,
    };
    println!("Total for {category:?} in {period}: {total:.2}");
    Ok(())
}

fn cli_report(args: &[String], service: &ExpenseService) -> Result<()> {
    let period = resolve_period(args, service)?;
    let ledger = active_ledger(service, &period)?;
    let doc = service.generate_report(&period, ledger.as_ref())?;

    let path = flag_value(args, "--out")
        .map(str::to_string)
        .unwrap_or_else(|| super::default_report_path(&period));
    super::write_report(&path, &doc)?;
    println!("Report written to {path}");
    Ok(())
}

fn cli_budget(args: &[String], service: &ExpenseService) -> Result<()> {
    let pos = positionals(args);
    match pos.first().map(|s| s.as_str()) {
        Some("set") => {
            if pos.len() != 2 {
                anyhow::bail!("Usage: spendlog budget set <amount> [--month <m> --year <y>]");
            }
            let amount = ExpenseService::parse_amount(pos[1])?;
            let period = match (flag_value(args, "--month"), flag_value(args, "--year")) {
                (None, None) => SystemClock.current_period(),
                _ => resolve_period(args, service)?,
            };
            let mut ledger = service.reset_budget(period, amount)?;
            // Pick up records already on disk for that period.
            service.reconcile(&mut ledger)?;
            println!("Budget set for {period}: {amount:.2}");
            super::print_budget_status(&ledger);
            Ok(())
        }
        Some(other) => anyhow::bail!("Unknown budget subcommand: {other}"),
        None => {
            let Some(mut ledger) = service.load_ledger()? else {
                println!("{}", "No budget configured. Use: spendlog budget set <amount>".yellow());
                return Ok(());
            };
            service.reconcile(&mut ledger)?;
            println!("Active period: {}", ledger.period);
            println!("  Budget:    {:>12.2}", ledger.budget);
            println!("  Spent:     {:>12.2}", ledger.spent);
            println!("  Remaining: {:>12.2}", ledger.remaining());
            super::print_budget_status(&ledger);
            Ok(())
        }
    }
}
