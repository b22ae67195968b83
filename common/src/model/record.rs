use serde::{Deserialize, Serialize};

/// Logical fields recognised in a pasted reproduction sheet.
///
/// Declaration order is the positional layout used when the paste has no
/// recognisable header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Series,
    NumericId,
    Location,
    Counterpart,
    EventDate,
    FollowupDate,
    Result,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Series,
        Field::NumericId,
        Field::Location,
        Field::Counterpart,
        Field::EventDate,
        Field::FollowupDate,
        Field::Result,
    ];
}

/// One resolved data line of an import.
///
/// Every field is a plain string; an empty string means the resolver could
/// not find a value for it. Validation against the herd database happens in
/// the backend, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// 1-based line number in the submitted text.
    pub line: usize,
    pub series: String,
    /// Registry number (RG).
    pub numeric_id: String,
    pub location: String,
    /// Sire / bull identifier.
    pub counterpart: String,
    /// Insemination date, `DD/MM/YYYY` shaped when present.
    pub event_date: String,
    /// Diagnosis (DG) date.
    pub followup_date: String,
    pub result: String,
}

impl ImportRecord {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Series => &self.series,
            Field::NumericId => &self.numeric_id,
            Field::Location => &self.location,
            Field::Counterpart => &self.counterpart,
            Field::EventDate => &self.event_date,
            Field::FollowupDate => &self.followup_date,
            Field::Result => &self.result,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Series => self.series = value,
            Field::NumericId => self.numeric_id = value,
            Field::Location => self.location = value,
            Field::Counterpart => self.counterpart = value,
            Field::EventDate => self.event_date = value,
            Field::FollowupDate => self.followup_date = value,
            Field::Result => self.result = value,
        }
    }

    /// True when `value` is already held by any field of the record.
    pub fn holds(&self, value: &str) -> bool {
        !value.is_empty() && Field::ALL.iter().any(|f| self.get(*f) == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_cover_every_field() {
        let mut record = ImportRecord::new(3);
        for (i, field) in Field::ALL.iter().enumerate() {
            record.set(*field, format!("v{}", i));
        }
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(record.get(*field), format!("v{}", i));
        }
        assert_eq!(record.line, 3);
    }

    #[test]
    fn test_holds_ignores_empty_values() {
        let mut record = ImportRecord::new(1);
        record.series = "CJCJ".to_string();
        assert!(record.holds("CJCJ"));
        assert!(!record.holds(""));
        assert!(!record.holds("IDEAL"));
    }

    #[test]
    fn test_field_serializes_snake_case() {
        let json = serde_json::to_string(&Field::FollowupDate).unwrap();
        assert_eq!(json, "\"followup_date\"");
    }
}
