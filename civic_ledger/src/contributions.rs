//! Per-contributor summaries of a campaign-finance contribution ledger.

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::config::*;

pub const DATE: &str = "Date";
pub const AMOUNT: &str = "Amount";
pub const CONTRIBUTOR_NAME: &str = "Contributor Name";
pub const ADDRESS: &str = "Address";
pub const CITY_STATE_ZIP: &str = "City State Zip";
pub const OCCUPATION: &str = "Occupation";

/// Marks an address withheld by the source system.
pub const REDACTION_SENTINEL: char = '*';

/// Groups the rows by contributor name and summarizes each group.
///
/// Rows without a contributor name are ignored. The summaries are sorted by
/// contributor name.
pub fn summarize_contributions(
    rows: &[RawRow],
    rules: &ContributionRules,
) -> Vec<ContributionSummary> {
    let mut groups: BTreeMap<&str, Vec<&RawRow>> = BTreeMap::new();
    let mut anonymous: usize = 0;
    for row in rows.iter() {
        match row.get(CONTRIBUTOR_NAME) {
            Some(name) if !name.is_empty() => groups.entry(name).or_default().push(row),
            _ => anonymous += 1,
        }
    }
    info!(
        "Processing {} contribution rows: {} contributors, {} rows without a contributor",
        rows.len(),
        groups.len(),
        anonymous
    );

    groups
        .iter()
        .map(|(name, items)| summarize_contributor(name, items, rules))
        .collect()
}

fn summarize_contributor(
    name: &str,
    items: &[&RawRow],
    rules: &ContributionRules,
) -> ContributionSummary {
    let total_amount: f64 = items
        .iter()
        .map(|row| contribution_amount(name, row, rules))
        .sum();

    let addresses: Vec<Address> = items
        .iter()
        .filter_map(|row| {
            parse_address(
                row.get(ADDRESS).unwrap_or(""),
                row.get(CITY_STATE_ZIP).unwrap_or(""),
            )
        })
        .collect();

    let occupations: Vec<String> = items
        .iter()
        .filter_map(|row| row.get(OCCUPATION))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    let summary = ContributionSummary {
        name: name.to_string(),
        total_amount,
        contribution_count: items.len() as u64,
        date: date_range(name, items, rules),
        addresses,
        occupations,
    };
    debug!("summarize_contributor: {:?}", summary);
    summary
}

fn contribution_amount(name: &str, row: &RawRow, rules: &ContributionRules) -> f64 {
    let raw = row.get(AMOUNT).unwrap_or("");
    match (rules.amount_parser)(raw) {
        Ok(x) => x,
        Err(e) => {
            warn!(
                "line {}: {} for the amount of contributor {:?}, counting it as 0",
                row.line, e, name
            );
            0.0
        }
    }
}

// Unreadable dates do not take part in the range. When no date of the group
// can be read, the first raw value stands for both ends.
fn date_range(name: &str, items: &[&RawRow], rules: &ContributionRules) -> DateRange {
    let mut parsed: Vec<NaiveDate> = Vec::new();
    for row in items.iter() {
        let raw = row.get(DATE).unwrap_or("");
        match (rules.date_parser)(raw) {
            Ok(d) => parsed.push(d),
            Err(e) => warn!(
                "line {}: {} for the date of contributor {:?}",
                row.line, e, name
            ),
        }
    }
    match (parsed.iter().min(), parsed.iter().max()) {
        (Some(earliest), Some(latest)) => DateRange {
            earliest: LedgerDate::Parsed(*earliest),
            latest: LedgerDate::Parsed(*latest),
        },
        _ => {
            let raw = items
                .first()
                .and_then(|row| row.get(DATE))
                .unwrap_or("")
                .to_string();
            DateRange {
                earliest: LedgerDate::Raw(raw.clone()),
                latest: LedgerDate::Raw(raw),
            }
        }
    }
}

/// Reads an address out of the street field and the `City, ST ZIP` field.
///
/// Returns `None` for redacted or blank addresses.
pub fn parse_address(street: &str, city_state_zip: &str) -> Option<Address> {
    if street.contains(REDACTION_SENTINEL) || city_state_zip.contains(REDACTION_SENTINEL) {
        return None;
    }
    if street.trim().is_empty() && city_state_zip.trim().is_empty() {
        return None;
    }
    let (city, rest) = city_state_zip
        .split_once(',')
        .unwrap_or((city_state_zip, ""));
    let mut tokens = rest.split_whitespace();
    let state = tokens.next().unwrap_or("").to_string();
    // ZIP+4 codes keep only their first part.
    let zip_code = tokens
        .next()
        .and_then(|z| z.split('-').next())
        .and_then(|z| z.parse::<u32>().ok());
    Some(Address {
        street: street.trim().to_string(),
        city: city.trim().to_string(),
        state,
        zip_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::read_rows;

    const HEADER: &str = "Candidate/Committee\tDate\tAmount\tTyp\tContributor Name\tAddress\tCity State Zip\tOccupation\tInkind Desc";

    fn ledger(lines: &[&str]) -> Vec<RawRow> {
        let mut text = HEADER.to_string();
        for l in lines {
            text.push('\n');
            text.push_str(l);
        }
        read_rows(&text).unwrap().0
    }

    fn summarize(lines: &[&str]) -> Vec<ContributionSummary> {
        let _ = env_logger::builder().is_test(true).try_init();
        summarize_contributions(&ledger(lines), &ContributionRules::DEFAULT_RULES)
    }

    #[test]
    fn totals_and_counts() {
        let res = summarize(&[
            "Doe (REP)\t01/02/2024\t$100.00\tCHE\tAlice Smith\t1 MAIN ST\tTAMPA, FL 33601\tNURSE\t",
            "Doe (REP)\t01/03/2024\t50\tCHE\tAlice Smith\t1 MAIN ST\tTAMPA, FL 33601\tNURSE\t",
            "Doe (REP)\t01/04/2024\tnot-a-number\tCHE\tBob Lee\t2 OAK AVE\tMIAMI, FL 33101\t\t",
        ]);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].name, "Alice Smith");
        assert_eq!(res[0].total_amount, 150.0);
        assert_eq!(res[0].contribution_count, 2);
        assert_eq!(res[1].name, "Bob Lee");
        assert_eq!(res[1].total_amount, 0.0);
        assert_eq!(res[1].contribution_count, 1);
    }

    #[test]
    fn rows_without_contributor_are_ignored() {
        let res = summarize(&[
            "Doe (REP)\t01/02/2024\t$10.00\tCHE\t\t1 MAIN ST\tTAMPA, FL 33601\t\t",
            "Doe (REP)\t01/02/2024\t$20.00",
            "Doe (REP)\t01/02/2024\t$30.00\tCHE\tCarl\t\t\t\t",
        ]);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].name, "Carl");
        assert_eq!(res[0].total_amount, 30.0);
    }

    #[test]
    fn grouping_is_case_sensitive_and_sorted() {
        let res = summarize(&[
            "X\t01/02/2024\t1\tCHE\tzed\t\t\t\t",
            "X\t01/02/2024\t2\tCHE\tAnn\t\t\t\t",
            "X\t01/02/2024\t4\tCHE\tANN\t\t\t\t",
        ]);
        let names: Vec<&str> = res.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ANN", "Ann", "zed"]);
    }

    #[test]
    fn missing_amount_still_counts() {
        let res = summarize(&["X\t01/02/2024\t\tCHE\tAnn\t\t\t\t", "X\t01/02/2024\t$1,000.25\tCHE\tAnn\t\t\t\t"]);
        assert_eq!(res[0].contribution_count, 2);
        assert_eq!(res[0].total_amount, 1000.25);
    }

    #[test]
    fn date_range_uses_calendar_order() {
        let res = summarize(&[
            "X\t12/01/2023\t1\tCHE\tAnn\t\t\t\t",
            "X\t02/15/2024\t1\tCHE\tAnn\t\t\t\t",
            "X\t9/30/2023\t1\tCHE\tAnn\t\t\t\t",
            "X\tsoon\t1\tCHE\tAnn\t\t\t\t",
        ]);
        let date = &res[0].date;
        assert_eq!(
            date.earliest,
            LedgerDate::Parsed(NaiveDate::from_ymd_opt(2023, 9, 30).unwrap())
        );
        assert_eq!(
            date.latest,
            LedgerDate::Parsed(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
        );
        assert!(date.earliest <= date.latest);
    }

    #[test]
    fn unreadable_dates_keep_the_raw_text() {
        let res = summarize(&["X\tsometime\t1\tCHE\tAnn\t\t\t\t", "X\tlater\t1\tCHE\tAnn\t\t\t\t"]);
        assert_eq!(res[0].date.earliest, LedgerDate::Raw("sometime".to_string()));
        assert_eq!(res[0].date.latest, LedgerDate::Raw("sometime".to_string()));
    }

    #[test]
    fn redacted_addresses_are_dropped() {
        let res = summarize(&[
            "X\t01/02/2024\t1\tCHE\tAnn\t1 MAIN ST\tTAMPA, FL 33601\t\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t**********\tTAMPA, FL 33601\t\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t5 ELM ST\t*****, FL\t\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t9 PINE RD\tORLANDO, FL\t\t",
        ]);
        assert_eq!(res[0].contribution_count, 4);
        assert_eq!(
            res[0].addresses,
            vec![
                Address {
                    street: "1 MAIN ST".to_string(),
                    city: "TAMPA".to_string(),
                    state: "FL".to_string(),
                    zip_code: Some(33601),
                },
                Address {
                    street: "9 PINE RD".to_string(),
                    city: "ORLANDO".to_string(),
                    state: "FL".to_string(),
                    zip_code: None,
                },
            ]
        );
    }

    #[test]
    fn occupations_keep_duplicates_in_row_order() {
        let res = summarize(&[
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\tTEACHER\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\t\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\tRETIRED\t",
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\tTEACHER\t",
        ]);
        assert_eq!(res[0].occupations, vec!["TEACHER", "RETIRED", "TEACHER"]);
    }

    #[test]
    fn occupations_are_trimmed() {
        let res = summarize(&[
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\t  NURSE \t",
            "X\t01/02/2024\t1\tCHE\tAnn\t\t\t   \t",
        ]);
        assert_eq!(res[0].occupations, vec!["NURSE"]);
    }

    #[test]
    fn total_matches_the_sum_of_rows() {
        let lines = [
            "X\t01/02/2024\t$12.34\tCHE\tAnn\t\t\t\t",
            "X\t01/02/2024\t$0.66\tCHE\tBea\t\t\t\t",
            "X\t01/02/2024\toops\tCHE\tAnn\t\t\t\t",
            "X\t01/02/2024\t$7\tCHE\t\t\t\t\t",
            "X\t01/02/2024\t$100\tCHE\tCid\t\t\t\t",
        ];
        let rows = ledger(&lines);
        let expected: f64 = rows
            .iter()
            .filter(|r| !r.get(CONTRIBUTOR_NAME).unwrap_or("").is_empty())
            .map(|r| crate::fields::parse_amount(r.get(AMOUNT).unwrap_or("")).unwrap_or(0.0))
            .sum();
        let res = summarize_contributions(&rows, &ContributionRules::DEFAULT_RULES);
        let total: f64 = res.iter().map(|s| s.total_amount).sum();
        assert!((total - expected).abs() < 1e-9);
        let count: u64 = res.iter().map(|s| s.contribution_count).sum();
        assert_eq!(count, 4);
    }

    #[test]
    fn address_splitting() {
        assert_eq!(
            parse_address(" 10 BAY ST ", "ST. PETERSBURG, FL 33701-1234"),
            Some(Address {
                street: "10 BAY ST".to_string(),
                city: "ST. PETERSBURG".to_string(),
                state: "FL".to_string(),
                zip_code: Some(33701),
            })
        );
        assert_eq!(
            parse_address("PO BOX 1", "NOWHERE"),
            Some(Address {
                street: "PO BOX 1".to_string(),
                city: "NOWHERE".to_string(),
                state: "".to_string(),
                zip_code: None,
            })
        );
        assert_eq!(parse_address("", " "), None);
        assert_eq!(parse_address("1 A ST", "*"), None);
    }
}
