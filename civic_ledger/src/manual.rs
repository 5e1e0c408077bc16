/*!

This is the long-form manual for `civic_ledger` and `ledgersum`.

## Input formats

Both datasets are tab-delimited text files (`.txt`) with a header row, as
exported by the state division of elections. Header names are trimmed. Values
are taken verbatim: quotes have no special meaning.

### `contributions`

Campaign-finance contribution ledgers. The columns used are:

* `Contributor Name`: the grouping key. Rows with an empty name are ignored.
* `Amount`: a currency amount such as `$1,250.00`. An amount that cannot be
  read counts as 0, but the row still counts as a contribution.
* `Date`: `MM/DD/YYYY` or `YYYY-MM-DD`.
* `Address` and `City State Zip` (`TAMPA, FL 33601`). An address with a `*` in
  either field has been withheld and is left out.
* `Occupation`: trimmed of surrounding whitespace. Blank occupations are left
  out.

The other columns (`Candidate/Committee`, `Typ`, `Inkind Desc`) are read but
not summarized.

### `elections`

Election-results ledgers. Only the rows whose `RaceCode` is the selected race
(`STS`, state senate, by default) are used. They are grouped by `Juris1num`.
Within a district, the rows with the same `CanNameFirst`, `CanNameMiddle`,
`CanNameLast` are one candidate, and their `CanVotes` are added up.
`PartyCode` is taken from the first row of a candidate.

The candidates are ranked by votes. When the top counts are equal, the winner
is chosen by the tie-break mode:

* `alphabetical` (default): the full name that sorts first.
* `candidate-order`: the candidate that appears first in the file.

## Output formats

For each `name.txt`, `name.json` and/or `name.csv` are written.

### JSON

A pretty-printed array of summaries:

```json
[
  {
    "name": "Alice Smith",
    "totalAmount": 150.0,
    "contributionCount": 2,
    "date": { "earliest": "2024-01-02", "latest": "2024-01-03" },
    "addresses": [
      { "street": "1 MAIN ST", "city": "TAMPA", "state": "FL", "zipCode": 33601 }
    ],
    "occupations": ["NURSE", "NURSE"]
  }
]
```

```json
[
  {
    "district": 5,
    "candidates": [{ "name": "Jane Q Doe", "votes": 30, "party": "DEM", "district": 5 }],
    "totalVotes": 30,
    "winner": { "name": "Jane Q Doe", "votes": 30, "party": "DEM", "district": 5 }
  }
]
```

A date that could not be read is written as it was found.

### CSV

One row per summary. The lists are written in a single cell, see the
[`flat`](crate::flat) module for the exact format. The winner of a district is
written in the `winnerName`, `winnerVotes` and `winnerParty` columns.

*/
