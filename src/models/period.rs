use std::fmt;

/// Calendar month, the canonical half of a period key.
///
/// Parses from either key scheme in use: a full English month name
/// (case-insensitive) or a 1–12 index. Both resolve to the same variant,
/// so "March", "march" and "3" all address the same period file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const ALL_MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    pub(crate) fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return Month::from_index(n);
        }
        let lower = s.to_lowercase();
        ALL_MONTHS
            .iter()
            .find(|m| m.name().to_lowercase() == lower)
            .copied()
    }

    /// 1-based calendar index, matching `chrono::Datelike::month`.
    pub(crate) fn from_index(n: u32) -> Option<Month> {
        ALL_MONTHS.get(n.checked_sub(1)? as usize).copied()
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A (month, year) key identifying one budgeting cycle and its expense file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Period {
    pub month: Month,
    pub year: i32,
}

impl Period {
    pub(crate) fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
