//! Encoding of nested lists into a single CSV cell, and back.
//!
//! A cell holds a list of items separated by `;`. The fields of an item are
//! separated by `|`. Inside a value, `\`, `;` and `|` are preceded by `\`.
//! An empty cell is an empty list.
//!
//! | list          | fields of an item                        |
//! |---------------|------------------------------------------|
//! | `addresses`   | `street`, `city`, `state`, `zipCode`     |
//! | `occupations` | the occupation                           |
//! | `candidates`  | `name`, `votes`, `party`                 |
//!
//! A missing `zipCode` is an empty field.

use crate::config::{Address, Candidate};

pub const ITEM_SEPARATOR: char = ';';
pub const FIELD_SEPARATOR: char = '|';
pub const ESCAPE: char = '\\';

fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        if c == ESCAPE || c == ITEM_SEPARATOR || c == FIELD_SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

/// Joins items made of several fields into one cell.
pub fn join_items(items: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (i, fields) in items.iter().enumerate() {
        if i > 0 {
            out.push(ITEM_SEPARATOR);
        }
        for (j, f) in fields.iter().enumerate() {
            if j > 0 {
                out.push(FIELD_SEPARATOR);
            }
            escape_into(f, &mut out);
        }
    }
    out
}

/// The inverse of `join_items`.
pub fn split_items(cell: &str) -> Vec<Vec<String>> {
    if cell.is_empty() {
        return Vec::new();
    }
    let mut items: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            FIELD_SEPARATOR => fields.push(std::mem::take(&mut current)),
            ITEM_SEPARATOR => {
                fields.push(std::mem::take(&mut current));
                items.push(std::mem::take(&mut fields));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    items.push(fields);
    items
}

/// Joins single values into one cell.
pub fn join_values(values: &[String]) -> String {
    let items: Vec<Vec<String>> = values.iter().map(|v| vec![v.clone()]).collect();
    join_items(&items)
}

/// The inverse of `join_values`.
pub fn split_values(cell: &str) -> Vec<String> {
    let sep = FIELD_SEPARATOR.to_string();
    split_items(cell)
        .into_iter()
        .map(|fields| fields.join(sep.as_str()))
        .collect()
}

pub fn addresses_cell(addresses: &[Address]) -> String {
    let items: Vec<Vec<String>> = addresses
        .iter()
        .map(|a| {
            vec![
                a.street.clone(),
                a.city.clone(),
                a.state.clone(),
                a.zip_code.map(|z| z.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    join_items(&items)
}

/// Reads back a cell written by `addresses_cell`. Malformed items are skipped.
pub fn addresses_from_cell(cell: &str) -> Vec<Address> {
    split_items(cell)
        .into_iter()
        .filter_map(|fields| match fields.as_slice() {
            [street, city, state, zip] => Some(Address {
                street: street.clone(),
                city: city.clone(),
                state: state.clone(),
                zip_code: zip.parse::<u32>().ok(),
            }),
            _ => None,
        })
        .collect()
}

pub fn candidates_cell(candidates: &[Candidate]) -> String {
    let items: Vec<Vec<String>> = candidates
        .iter()
        .map(|c| vec![c.name.clone(), c.votes.to_string(), c.party.clone()])
        .collect();
    join_items(&items)
}

/// Reads back a cell written by `candidates_cell`. The district is not part of
/// the cell and must be given.
pub fn candidates_from_cell(cell: &str, district: u32) -> Vec<Candidate> {
    split_items(cell)
        .into_iter()
        .filter_map(|fields| match fields.as_slice() {
            [name, votes, party] => Some(Candidate {
                name: name.clone(),
                votes: votes.parse::<u64>().ok()?,
                party: party.clone(),
                district,
            }),
            _ => None,
        })
        .collect()
}
