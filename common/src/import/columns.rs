//! Builds the field → column index map from a header row.

use super::tokenizer::{split_space_runs, split_tabs};
use crate::model::record::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Tab,
    /// Two or more consecutive spaces.
    SpaceRuns,
}

enum Match {
    Contains(&'static [&'static str]),
    Exact(&'static str),
}

struct ColumnRule {
    field: Field,
    matcher: Match,
}

impl ColumnRule {
    fn matches(&self, upper: &str) -> bool {
        match &self.matcher {
            Match::Contains(keywords) => keywords.iter().any(|k| upper.contains(k)),
            Match::Exact(keyword) => upper == *keyword,
        }
    }
}

/// Evaluated top to bottom; the first matching rule classifies the cell.
const COLUMN_RULES: [ColumnRule; 7] = [
    ColumnRule {
        field: Field::Series,
        matcher: Match::Contains(&["SÉRIE", "SERIE"]),
    },
    ColumnRule {
        field: Field::NumericId,
        matcher: Match::Exact("RG"),
    },
    ColumnRule {
        field: Field::Location,
        matcher: Match::Contains(&["LOCAL", "PIQUETE"]),
    },
    ColumnRule {
        field: Field::Counterpart,
        matcher: Match::Contains(&["TOURO", "ACASALAMENTO", "REPRODUTOR"]),
    },
    ColumnRule {
        field: Field::EventDate,
        matcher: Match::Contains(&["DATA I.A", "DATA IA"]),
    },
    ColumnRule {
        field: Field::FollowupDate,
        matcher: Match::Contains(&["DATA DG", "DIAG", "PREVISAO", "PREVISÃO"]),
    },
    ColumnRule {
        field: Field::Result,
        matcher: Match::Contains(&["RESULT"]),
    },
];

/// Classify one header cell, or `None` when no rule recognises it.
pub fn classify_header_cell(cell: &str) -> Option<Field> {
    let upper = cell.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }
    COLUMN_RULES
        .iter()
        .find(|rule| rule.matches(&upper))
        .map(|rule| rule.field)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub delimiter: Delimiter,
    columns: BTreeMap<Field, usize>,
}

impl ColumnMap {
    /// Build the map from a header line.
    ///
    /// Returns `None` when the header has fewer than two non-blank cells.
    /// If two cells classify into the same field the leftmost one keeps it.
    pub fn from_header(line: &str) -> Option<ColumnMap> {
        let mut cells = split_tabs(line);
        let mut delimiter = Delimiter::Tab;
        if cells.len() <= 1 {
            cells = split_space_runs(line);
            delimiter = Delimiter::SpaceRuns;
        }

        if cells.iter().filter(|c| !c.is_empty()).count() < 2 {
            return None;
        }

        let mut columns = BTreeMap::new();
        for (index, cell) in cells.iter().enumerate() {
            if let Some(field) = classify_header_cell(cell) {
                columns.entry(field).or_insert(index);
            }
        }

        Some(ColumnMap { delimiter, columns })
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.columns.iter().map(|(f, i)| (*f, *i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header_cells() {
        assert_eq!(classify_header_cell("Série"), Some(Field::Series));
        assert_eq!(classify_header_cell("rg"), Some(Field::NumericId));
        assert_eq!(classify_header_cell("RGN"), None);
        assert_eq!(classify_header_cell("Local / Piquete"), Some(Field::Location));
        assert_eq!(classify_header_cell("ACASALAMENTOS"), Some(Field::Counterpart));
        assert_eq!(classify_header_cell("Data I.A."), Some(Field::EventDate));
        assert_eq!(classify_header_cell("Data DG"), Some(Field::FollowupDate));
        assert_eq!(classify_header_cell("Previsão parto"), Some(Field::FollowupDate));
        assert_eq!(classify_header_cell("Resultado"), Some(Field::Result));
        assert_eq!(classify_header_cell("Obs"), None);
        assert_eq!(classify_header_cell("  "), None);
    }

    #[test]
    fn test_first_rule_wins_within_a_cell() {
        // Both the series and the location rule match; series is checked first.
        assert_eq!(classify_header_cell("SERIE LOCAL"), Some(Field::Series));
    }

    #[test]
    fn test_tab_header() {
        let map = ColumnMap::from_header("SÉRIE\tRG\tLOCAL\tACASALAMENTOS\tDATA IA").unwrap();
        assert_eq!(map.delimiter, Delimiter::Tab);
        assert_eq!(map.index_of(Field::Series), Some(0));
        assert_eq!(map.index_of(Field::NumericId), Some(1));
        assert_eq!(map.index_of(Field::Location), Some(2));
        assert_eq!(map.index_of(Field::Counterpart), Some(3));
        assert_eq!(map.index_of(Field::EventDate), Some(4));
        assert_eq!(map.index_of(Field::Result), None);
    }

    #[test]
    fn test_space_header_and_unknown_columns() {
        let map = ColumnMap::from_header("SÉRIE    RG    OBS    TOURO").unwrap();
        assert_eq!(map.delimiter, Delimiter::SpaceRuns);
        assert_eq!(map.index_of(Field::Counterpart), Some(3));
        assert_eq!(map.fields().count(), 3);
    }

    #[test]
    fn test_blank_header_cells_keep_positions() {
        let map = ColumnMap::from_header("SÉRIE\t\tRG").unwrap();
        assert_eq!(map.index_of(Field::NumericId), Some(2));
    }

    #[test]
    fn test_leftmost_duplicate_keeps_the_field() {
        let map = ColumnMap::from_header("SÉRIE\tLOCAL\tPIQUETE").unwrap();
        assert_eq!(map.index_of(Field::Location), Some(1));
    }

    #[test]
    fn test_single_cell_header_has_no_map() {
        assert_eq!(ColumnMap::from_header("SÉRIE"), None);
        assert_eq!(ColumnMap::from_header("SÉRIE\t\t"), None);
    }
}
