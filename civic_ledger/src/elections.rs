//! Per-district summaries of an election-results ledger.

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

use crate::config::*;
use crate::fields::parse_district;

pub const PARTY_CODE: &str = "PartyCode";
pub const RACE_CODE: &str = "RaceCode";
pub const JURISDICTION: &str = "Juris1num";
pub const CAN_NAME_LAST: &str = "CanNameLast";
pub const CAN_NAME_FIRST: &str = "CanNameFirst";
pub const CAN_NAME_MIDDLE: &str = "CanNameMiddle";
pub const CAN_VOTES: &str = "CanVotes";

/// Tabulates the races selected by the rules, one result per district.
///
/// The results are sorted by district number.
pub fn summarize_elections(rows: &[RawRow], rules: &ElectionRules) -> Vec<ElectionResult> {
    let mut districts: BTreeMap<u32, Vec<&RawRow>> = BTreeMap::new();
    let mut selected: usize = 0;
    for row in rows
        .iter()
        .filter(|row| row.get(RACE_CODE) == Some(rules.race_code.as_str()))
    {
        selected += 1;
        let raw = row.get(JURISDICTION).unwrap_or("");
        match parse_district(raw) {
            Ok(district) => districts.entry(district).or_default().push(row),
            Err(e) => warn!(
                "line {}: {} for the jurisdiction, skipping the row",
                row.line, e
            ),
        }
    }
    info!(
        "Processing {} election rows: {} rows for race {:?} in {} districts",
        rows.len(),
        selected,
        rules.race_code,
        districts.len()
    );

    districts
        .iter()
        .filter_map(|(district, items)| tabulate_district(*district, items, rules))
        .collect()
}

fn tabulate_district(
    district: u32,
    items: &[&RawRow],
    rules: &ElectionRules,
) -> Option<ElectionResult> {
    let mut candidates = merge_candidates(district, items, rules);
    rank_candidates(&mut candidates, rules.tie_break_mode);
    let total_votes = candidates
        .iter()
        .try_fold(0u64, |acc, c| acc.checked_add(c.votes))
        .unwrap_or_else(|| {
            warn!(
                "District {}: the total votes overflow, capping at {}",
                district,
                u64::MAX
            );
            u64::MAX
        });
    let winner = candidates.first()?.clone();
    if let [first, second, ..] = candidates.as_slice() {
        if first.votes == second.votes {
            info!(
                "District {}: tie at {} votes between {:?} and {:?}, resolved with {:?}",
                district, first.votes, first.name, second.name, rules.tie_break_mode
            );
        }
    }
    debug!(
        "District {}: {} candidates, {} votes, winner {:?}",
        district,
        candidates.len(),
        total_votes,
        winner.name
    );
    Some(ElectionResult {
        district,
        candidates,
        total_votes,
        winner,
    })
}

/// Merges the rows of one district into candidates, keyed by full name.
///
/// The votes of rows sharing a name are added up. The first row of a candidate
/// provides the other fields.
fn merge_candidates(district: u32, items: &[&RawRow], rules: &ElectionRules) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in items.iter() {
        let name = candidate_name(row);
        let votes = match (rules.votes_parser)(row.get(CAN_VOTES).unwrap_or("")) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "line {}: {} for the votes of candidate {:?}, counting them as 0",
                    row.line, e, name
                );
                0
            }
        };
        match index.get(&name) {
            Some(idx) => {
                debug!(
                    "merge_candidates: district {}: adding {} votes to {:?}",
                    district, votes, name
                );
                let candidate = &mut merged[*idx];
                candidate.votes = candidate.votes.checked_add(votes).unwrap_or_else(|| {
                    warn!(
                        "line {}: the votes of {:?} overflow, capping at {}",
                        row.line,
                        name,
                        u64::MAX
                    );
                    u64::MAX
                });
            }
            None => {
                index.insert(name.clone(), merged.len());
                merged.push(Candidate {
                    name,
                    votes,
                    party: row.get(PARTY_CODE).unwrap_or("").trim().to_string(),
                    district,
                });
            }
        }
    }
    merged
}

/// First, middle (when present) and last name, separated by single spaces.
pub fn candidate_name(row: &RawRow) -> String {
    [CAN_NAME_FIRST, CAN_NAME_MIDDLE, CAN_NAME_LAST]
        .iter()
        .filter_map(|col| row.get(col))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Sorts the candidates by decreasing votes, ties broken by the given mode.
pub fn rank_candidates(candidates: &mut [Candidate], mode: TieBreakMode) {
    match mode {
        TieBreakMode::Alphabetical => {
            candidates.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)))
        }
        // The sort is stable: equal candidates stay in the order of the file.
        TieBreakMode::CandidateOrder => candidates.sort_by(|a, b| b.votes.cmp(&a.votes)),
    }
}
