use regex::Regex;

use crate::store::StoreError;

/// How `total_for_category` decides whether a record belongs to a category.
///
/// `Exact` compares the whole description case-insensitively; `Contains`
/// looks for the text anywhere in the description; `Regex` matches the raw
/// description against a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MatchMode {
    #[default]
    Exact,
    Contains,
    Regex,
}

impl MatchMode {
    pub(crate) fn parse(s: &str) -> Option<MatchMode> {
        match s.to_lowercase().as_str() {
            "exact" => Some(MatchMode::Exact),
            "contains" | "substring" => Some(MatchMode::Contains),
            "regex" => Some(MatchMode::Regex),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct CategoryMatcher {
    mode: MatchMode,
    pattern: String,
    regex: Option<Regex>,
}

impl CategoryMatcher {
    pub(crate) fn new(mode: MatchMode, pattern: &str) -> Result<Self, StoreError> {
        let regex = match mode {
            MatchMode::Regex => Some(Regex::new(pattern).map_err(|e| {
                StoreError::InvalidInput(format!("bad category pattern {pattern:?}: {e}"))
            })?),
            _ => None,
        };
        Ok(Self {
            mode,
            pattern: pattern.to_lowercase(),
            regex,
        })
    }

    pub(crate) fn matches(&self, description: &str) -> bool {
        match self.mode {
            MatchMode::Exact => description.to_lowercase() == self.pattern,
            MatchMode::Contains => description.to_lowercase().contains(&self.pattern),
            MatchMode::Regex => self
                .regex
                .as_ref()
                .is_some_and(|re| re.is_match(description)),
        }
    }
}
