//! Period file store: one flat binary file per (month, year) plus a single
//! ledger file, all under one data directory.
//!
//! The store is stateless between calls; every operation is a whole-file
//! read or a whole-file rewrite. The new byte sequence is always assembled
//! in memory before anything touches disk, so a file is never left
//! half-written. No locking is performed: the store assumes a single
//! process running one operation at a time, and concurrent rewrites of the
//! same period file are last-write-wins. Embedders that need concurrency
//! must add their own mutual exclusion keyed by the period's filename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::{self, DecodeError, BUDGET_RECORD_LEN, EXPENSE_RECORD_LEN};
use crate::models::{BudgetLedger, Expense, Period};

/// The ledger lives under a constant name; period files are derived.
const LEDGER_FILE: &str = "budget.dat";

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("no expense with id {id} for {period}")]
    NotFound { period: Period, id: u32 },

    #[error("record set for {period} is full ({limit} records)")]
    Full { period: Period, limit: usize },

    #[error("budget is set for {stored}, but the current period is {current}; reset it first")]
    StaleBudget { stored: Period, current: Period },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: malformed record at byte {offset}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        offset: u64,
        source: DecodeError,
    },
}

pub(crate) struct ExpenseStore {
    dir: PathBuf,
}

impl ExpenseStore {
    pub(crate) fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Filename for a period's record file. Total and injective: distinct
    /// periods never collide because the canonical month name and the year
    /// both appear in the name.
    pub(crate) fn file_name(period: &Period) -> String {
        format!("expenses_{}_{}.dat", period.month, period.year)
    }

    pub(crate) fn period_path(&self, period: &Period) -> PathBuf {
        self.dir.join(Self::file_name(period))
    }

    fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    /// Load a period's full record set in file order. A missing file is an
    /// empty record set, not an error; anything undecodable fails the whole
    /// load (no partial-record recovery).
    pub(crate) fn load(&self, period: &Period) -> Result<Vec<Expense>, StoreError> {
        let path = self.period_path(period);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        decode_records(&bytes, &path)
    }

    /// Rewrite a period's file with the given records, in the given order.
    /// The caller keeps the sequence insertion-ordered; no sort is applied.
    pub(crate) fn save_all(&self, period: &Period, records: &[Expense]) -> Result<(), StoreError> {
        let path = self.period_path(period);
        let mut buf = Vec::with_capacity(records.len() * EXPENSE_RECORD_LEN);
        for record in records {
            buf.extend_from_slice(&codec::encode_expense(record));
        }
        fs::write(&path, buf).map_err(|e| StoreError::Io { path, source: e })
    }

    /// `None` means no budget has been configured yet.
    pub(crate) fn load_ledger(&self) -> Result<Option<BudgetLedger>, StoreError> {
        let path = self.ledger_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        if bytes.len() != BUDGET_RECORD_LEN {
            return Err(StoreError::Corrupt {
                path,
                offset: 0,
                source: DecodeError::BadLength(bytes.len(), BUDGET_RECORD_LEN),
            });
        }
        codec::decode_budget(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path,
                offset: 0,
                source: e,
            })
    }

    pub(crate) fn save_ledger(&self, ledger: &BudgetLedger) -> Result<(), StoreError> {
        let path = self.ledger_path();
        fs::write(&path, codec::encode_budget(ledger))
            .map_err(|e| StoreError::Io { path, source: e })
    }
}

fn decode_records(bytes: &[u8], path: &Path) -> Result<Vec<Expense>, StoreError> {
    if bytes.len() % EXPENSE_RECORD_LEN != 0 {
        let tail_start = bytes.len() - bytes.len() % EXPENSE_RECORD_LEN;
        return Err(StoreError::Corrupt {
            path: path.to_path_buf(),
            offset: tail_start as u64,
            source: DecodeError::BadLength(bytes.len() - tail_start, EXPENSE_RECORD_LEN),
        });
    }
    bytes
        .chunks(EXPENSE_RECORD_LEN)
        .enumerate()
        .map(|(i, chunk)| {
            codec::decode_expense(chunk).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                offset: (i * EXPENSE_RECORD_LEN) as u64,
                source: e,
            })
        })
        .collect()
}
