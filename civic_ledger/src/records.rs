// Primitives for reading delimited exports with a header row.

use log::{debug, warn};
use std::collections::HashMap;

use crate::config::{LedgerError, ParseWarning, RawRow};

pub const TAB: u8 = b'\t';

/// The rows of a delimited text, read lazily.
///
/// The first line is the header. Rows whose width does not match the header are
/// still returned, aligned on the leading columns, and a warning is recorded.
pub struct Records<'a> {
    headers: Vec<String>,
    inner: csv::StringRecordsIntoIter<&'a [u8]>,
    warnings: Vec<ParseWarning>,
}

impl<'a> Records<'a> {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The warnings collected so far.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    fn warn(&mut self, w: ParseWarning) {
        warn!("Parsing warning: {}", w);
        self.warnings.push(w);
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        loop {
            let record = match self.inner.next()? {
                Ok(r) => r,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    self.warn(ParseWarning::UnreadableRow {
                        line,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.iter().all(|f| f.trim().is_empty()) {
                debug!("records: skipping blank line {}", line);
                continue;
            }

            let expected = self.headers.len();
            let found = record.len();
            if found < expected {
                self.warn(ParseWarning::TooFewFields {
                    line,
                    expected,
                    found,
                });
            } else if found > expected {
                self.warn(ParseWarning::TooManyFields {
                    line,
                    expected,
                    found,
                });
            }

            let fields: HashMap<String, String> = self
                .headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            let extra: Vec<String> = record.iter().skip(expected).map(String::from).collect();
            return Some(RawRow {
                line,
                fields,
                extra,
            });
        }
    }
}

/// Starts reading a delimited text. Only the header row is read eagerly.
pub fn parse_records(text: &str, delimiter: u8) -> Result<Records<'_>, LedgerError> {
    // Quotes carry no meaning in these exports: names such as `John "Jack" Doe` are common.
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LedgerError::MalformedHeader(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("parse_records: headers: {:?}", headers);
    Ok(Records {
        headers,
        inner: rdr.into_records(),
        warnings: Vec::new(),
    })
}

/// Reads all the rows of a tab-delimited text.
pub fn read_rows(text: &str) -> Result<(Vec<RawRow>, Vec<ParseWarning>), LedgerError> {
    let mut records = parse_records(text, TAB)?;
    let rows: Vec<RawRow> = records.by_ref().collect();
    Ok((rows, records.warnings))
}
