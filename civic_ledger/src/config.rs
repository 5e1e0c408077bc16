// ********* Input data structures ***********

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use crate::fields::{parse_amount, parse_date, parse_votes, FieldParser};

/// One data line of a delimited export.
///
/// Values are kept as they appear in the file. Only the header names are trimmed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRow {
    /// Line number in the source text, the header being line 1.
    pub line: u64,
    pub fields: HashMap<String, String>,
    /// Values found past the last header column.
    pub extra: Vec<String>,
}

impl RawRow {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }
}

/// A structural problem found while reading rows.
///
/// These never stop the reading of a file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParseWarning {
    TooFewFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    UnreadableRow {
        line: u64,
        message: String,
    },
}

impl Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::TooFewFields {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: too few fields, expected {} but found {}",
                line, expected, found
            ),
            ParseWarning::TooManyFields {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: too many fields, expected {} but found {}",
                line, expected, found
            ),
            ParseWarning::UnreadableRow { line, message } => {
                write!(f, "line {}: unreadable row: {}", line, message)
            }
        }
    }
}

// ******** Output data structures *********

/// A date as found in a ledger.
///
/// Dates that could not be understood are carried as their raw text.
#[derive(Eq, PartialEq, Debug, Clone, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerDate {
    Parsed(NaiveDate),
    Raw(String),
}

impl Display for LedgerDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerDate::Parsed(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            LedgerDate::Raw(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: LedgerDate,
    pub latest: LedgerDate,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<u32>,
}

/// The contributions of one contributor inside one file.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub name: String,
    pub total_amount: f64,
    /// Includes the rows whose amount could not be read.
    pub contribution_count: u64,
    pub date: DateRange,
    pub addresses: Vec<Address>,
    pub occupations: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub votes: u64,
    pub party: String,
    pub district: u32,
}

/// The outcome of one race in one district.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResult {
    pub district: u32,
    /// Ranked by votes, the winner first.
    pub candidates: Vec<Candidate>,
    pub total_votes: u64,
    pub winner: Candidate,
}

/// Errors that make a whole input unusable.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LedgerError {
    MalformedHeader(String),
}

impl Error for LedgerError {}

impl Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::MalformedHeader(msg) => write!(f, "Cannot read the header row: {}", msg),
        }
    }
}

// ********* Configuration **********

/// The race code of the state senate races.
pub const DEFAULT_RACE_CODE: &str = "STS";

/// How to pick the winner of a district when the top vote counts are equal.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// The candidate whose full name sorts first wins.
    Alphabetical,
    /// The candidate seen first in the file wins.
    CandidateOrder,
}

#[derive(Clone, Copy)]
pub struct ContributionRules {
    pub amount_parser: FieldParser<f64>,
    pub date_parser: FieldParser<NaiveDate>,
}

impl ContributionRules {
    pub const DEFAULT_RULES: ContributionRules = ContributionRules {
        amount_parser: parse_amount,
        date_parser: parse_date,
    };
}

impl std::fmt::Debug for ContributionRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContributionRules").finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ElectionRules {
    /// Only the rows of this race are tabulated.
    pub race_code: String,
    pub tie_break_mode: TieBreakMode,
    pub votes_parser: FieldParser<u64>,
}

impl ElectionRules {
    pub fn new(race_code: &str, tie_break_mode: TieBreakMode) -> ElectionRules {
        ElectionRules {
            race_code: race_code.to_string(),
            tie_break_mode,
            votes_parser: parse_votes,
        }
    }
}

impl Default for ElectionRules {
    fn default() -> Self {
        ElectionRules::new(DEFAULT_RACE_CODE, TieBreakMode::Alphabetical)
    }
}

impl std::fmt::Debug for ElectionRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElectionRules")
            .field("race_code", &self.race_code)
            .field("tie_break_mode", &self.tie_break_mode)
            .finish_non_exhaustive()
    }
}
