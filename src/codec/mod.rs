//! Fixed-layout record serialization.
//!
//! Period files are a back-to-back concatenation of 58-byte expense records;
//! the ledger file holds a single 32-byte budget record. No delimiters, no
//! length prefixes, no schema version: the layout is the schema. All integers
//! and floats are little-endian.

use thiserror::Error;

use crate::models::{BudgetLedger, Expense, Month, Period};

/// Width of the description buffer. One byte is reserved as padding so the
/// payload mirrors the classic `char[50]` + terminator shape.
pub(crate) const DESC_BUF: usize = 50;
/// Longest description payload stored; longer text is truncated on encode.
pub(crate) const DESC_MAX: usize = DESC_BUF - 1;
/// Width of the month-name buffer in the budget record.
const MONTH_BUF: usize = 20;

/// id (4) + description (50) + amount (4).
pub(crate) const EXPENSE_RECORD_LEN: usize = 4 + DESC_BUF + 4;
/// month (20) + year (4) + budget (4) + spent (4).
pub(crate) const BUDGET_RECORD_LEN: usize = MONTH_BUF + 4 + 4 + 4;

#[derive(Debug, Error)]
pub(crate) enum DecodeError {
    #[error("record is {0} bytes, expected {1}")]
    BadLength(usize, usize),
    #[error("text field is not valid UTF-8")]
    BadText,
    #[error("unrecognized month name {0:?}")]
    BadMonth(String),
}

/// Truncate a description to the encodable payload, never splitting a
/// UTF-8 character. Deterministic: the same input always truncates the
/// same way, so encode/decode round-trips the truncated form.
pub(crate) fn truncate_description(s: &str) -> &str {
    if s.len() <= DESC_MAX {
        return s;
    }
    let mut end = DESC_MAX;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn put_text(buf: &mut [u8], text: &str) {
    // Caller guarantees text fits; remaining bytes stay NUL.
    buf[..text.len()].copy_from_slice(text.as_bytes());
}

fn take_text(buf: &[u8]) -> Result<&str, DecodeError> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).map_err(|_| DecodeError::BadText)
}

pub(crate) fn encode_expense(expense: &Expense) -> [u8; EXPENSE_RECORD_LEN] {
    let mut buf = [0u8; EXPENSE_RECORD_LEN];
    buf[..4].copy_from_slice(&expense.id.to_le_bytes());
    put_text(
        &mut buf[4..4 + DESC_BUF],
        truncate_description(&expense.description),
    );
    buf[4 + DESC_BUF..].copy_from_slice(&expense.amount.to_le_bytes());
    buf
}

pub(crate) fn decode_expense(buf: &[u8]) -> Result<Expense, DecodeError> {
    if buf.len() != EXPENSE_RECORD_LEN {
        return Err(DecodeError::BadLength(buf.len(), EXPENSE_RECORD_LEN));
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[..4]);
    let id = u32::from_le_bytes(word);
    let description = take_text(&buf[4..4 + DESC_BUF])?.to_string();
    word.copy_from_slice(&buf[4 + DESC_BUF..]);
    let amount = f32::from_le_bytes(word);
    Ok(Expense {
        id,
        description,
        amount,
    })
}

pub(crate) fn encode_budget(ledger: &BudgetLedger) -> [u8; BUDGET_RECORD_LEN] {
    let mut buf = [0u8; BUDGET_RECORD_LEN];
    // Month names are ASCII and at most 9 bytes, well inside the buffer.
    put_text(&mut buf[..MONTH_BUF], ledger.period.month.name());
    buf[MONTH_BUF..MONTH_BUF + 4].copy_from_slice(&ledger.period.year.to_le_bytes());
    buf[MONTH_BUF + 4..MONTH_BUF + 8].copy_from_slice(&ledger.budget.to_le_bytes());
    buf[MONTH_BUF + 8..].copy_from_slice(&ledger.spent.to_le_bytes());
    buf
}

pub(crate) fn decode_budget(buf: &[u8]) -> Result<BudgetLedger, DecodeError> {
    if buf.len() != BUDGET_RECORD_LEN {
        return Err(DecodeError::BadLength(buf.len(), BUDGET_RECORD_LEN));
    }
    let name = take_text(&buf[..MONTH_BUF])?;
    let month = Month::parse(name).ok_or_else(|| DecodeError::BadMonth(name.to_string()))?;
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[MONTH_BUF..MONTH_BUF + 4]);
    let year = i32::from_le_bytes(word);
    word.copy_from_slice(&buf[MONTH_BUF + 4..MONTH_BUF + 8]);
    let budget = f32::from_le_bytes(word);
    word.copy_from_slice(&buf[MONTH_BUF + 8..]);
    let spent = f32::from_le_bytes(word);
    Ok(BudgetLedger {
        period: Period::new(month, year),
        budget,
        spent,
    })
}
