// Primitives for writing the summaries as flat CSV files.
//
// The lists of a summary are encoded in one cell, see `civic_ledger::flat`.

use serde::Serialize;

use civic_ledger::flat::{addresses_cell, candidates_cell, join_values};

use crate::ledger::*;

/// A summary that can be written as one CSV row.
pub trait FlatRow {
    type Row: Serialize;
    /// The column names of `Row`, in field order.
    const HEADERS: &'static [&'static str];
    fn flat_row(&self) -> Self::Row;
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRow {
    pub name: String,
    pub total_amount: f64,
    pub contribution_count: u64,
    pub date_earliest: String,
    pub date_latest: String,
    pub addresses: String,
    pub occupations: String,
}

impl FlatRow for ContributionSummary {
    type Row = ContributionRow;
    const HEADERS: &'static [&'static str] = &[
        "name",
        "totalAmount",
        "contributionCount",
        "dateEarliest",
        "dateLatest",
        "addresses",
        "occupations",
    ];

    fn flat_row(&self) -> ContributionRow {
        ContributionRow {
            name: self.name.clone(),
            total_amount: self.total_amount,
            contribution_count: self.contribution_count,
            date_earliest: self.date.earliest.to_string(),
            date_latest: self.date.latest.to_string(),
            addresses: addresses_cell(&self.addresses),
            occupations: join_values(&self.occupations),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionRow {
    pub district: u32,
    pub total_votes: u64,
    pub winner_name: String,
    pub winner_votes: u64,
    pub winner_party: String,
    pub candidates: String,
}

impl FlatRow for ElectionResult {
    type Row = ElectionRow;
    const HEADERS: &'static [&'static str] = &[
        "district",
        "totalVotes",
        "winnerName",
        "winnerVotes",
        "winnerParty",
        "candidates",
    ];

    fn flat_row(&self) -> ElectionRow {
        ElectionRow {
            district: self.district,
            total_votes: self.total_votes,
            winner_name: self.winner.name.clone(),
            winner_votes: self.winner.votes,
            winner_party: self.winner.party.clone(),
            candidates: candidates_cell(&self.candidates),
        }
    }
}

pub fn write_csv<T: FlatRow>(summaries: &[T], path: &Path) -> PipelineResult<()> {
    let p = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path: p.clone() })?;
    if summaries.is_empty() {
        // Headers are otherwise written with the first row.
        wtr.write_record(T::HEADERS)
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    for s in summaries.iter() {
        wtr.serialize(s.flat_row())
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush().context(WritingFileSnafu { path: p })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_ledger::flat::{addresses_from_cell, candidates_from_cell, split_values};

    fn jane(votes: u64) -> Candidate {
        Candidate {
            name: "Jane Q Doe".to_string(),
            votes,
            party: "DEM".to_string(),
            district: 5,
        }
    }

    #[test]
    fn contributions_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Doe.csv");
        let addresses = vec![Address {
            street: "1 MAIN ST, APT 2".to_string(),
            city: "TAMPA".to_string(),
            state: "FL".to_string(),
            zip_code: Some(33601),
        }];
        let summary = ContributionSummary {
            name: "Alice Smith".to_string(),
            total_amount: 150.0,
            contribution_count: 2,
            date: DateRange {
                earliest: LedgerDate::Raw("soon".to_string()),
                latest: LedgerDate::Raw("soon".to_string()),
            },
            addresses: addresses.clone(),
            occupations: vec!["NURSE".to_string(), "NURSE".to_string()],
        };
        write_csv(&[summary], &out).unwrap();

        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "name",
                "totalAmount",
                "contributionCount",
                "dateEarliest",
                "dateLatest",
                "addresses",
                "occupations"
            ]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Alice Smith");
        assert_eq!(&rows[0][1], "150.0");
        assert_eq!(&rows[0][3], "soon");
        assert_eq!(addresses_from_cell(&rows[0][5]), addresses);
        assert_eq!(split_values(&rows[0][6]), vec!["NURSE", "NURSE"]);
    }

    #[test]
    fn empty_summaries_still_have_headers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.csv");
        write_csv::<ElectionResult>(&[], &out).unwrap();

        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ElectionResult::HEADERS);
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn headers_match_the_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let result = ElectionResult {
            district: 5,
            candidates: vec![jane(30)],
            total_votes: 30,
            winner: jane(30),
        };
        write_csv(&[result], &out).unwrap();
        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ElectionResult::HEADERS);
    }

    #[test]
    fn elections_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let result = ElectionResult {
            district: 5,
            candidates: vec![jane(30)],
            total_votes: 30,
            winner: jane(30),
        };
        write_csv(&[result.clone()], &out).unwrap();

        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "5");
        assert_eq!(&rows[0][1], "30");
        assert_eq!(&rows[0][2], "Jane Q Doe");
        assert_eq!(candidates_from_cell(&rows[0][5], 5), result.candidates);
    }
}
