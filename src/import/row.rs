//! Raw tabular rows as read from a dataset, before any normalization.

use std::collections::HashMap;
use std::fmt;

/// Column labels of the source datasets. Case and punctuation sensitive.
pub mod columns {
    pub const AISHE_CODE: &str = "Aishe Code";
    pub const NAME: &str = "Name";
    pub const STATE: &str = "State";
    pub const DISTRICT: &str = "District";
    pub const WEBSITE: &str = "Website";
    pub const YEAR_OF_ESTABLISHMENT: &str = "Year Of Establishment";
    pub const LOCATION: &str = "Location";
    pub const COLLEGE_TYPE: &str = "College Type";
    pub const MANAGEMENT: &str = "Management";
    pub const UNIVERSITY_AISHE_CODE: &str = "University Aishe Code";
    pub const UNIVERSITY_NAME: &str = "University Name";
    pub const UNIVERSITY_TYPE: &str = "University Type";
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    /// Writes the cell's textual form. Whole floats drop their fraction, so a
    /// numeric code cell `12345.0` reads back as `12345`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One data row keyed by column label.
///
/// Blank cells are not stored, so a blank and a missing column look the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell. Empty values are dropped.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let value = value.into();
        if !value.is_empty() {
            self.cells.insert(column.into(), value);
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Returns the cell's text, trimmed, or `None` when missing or blank.
    pub fn text(&self, column: &str) -> Option<String> {
        let raw = self.get(column)?.to_string();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed() {
        let row: RawRow = [(columns::NAME, "  Hindu College \t")].into_iter().collect();
        assert_eq!(row.text(columns::NAME), Some("Hindu College".to_string()));
    }

    #[test]
    fn test_whitespace_only_is_absent() {
        let row: RawRow = [(columns::WEBSITE, "   ")].into_iter().collect();
        assert_eq!(row.text(columns::WEBSITE), None);
    }

    #[test]
    fn test_empty_cells_are_not_stored() {
        let mut row = RawRow::new();
        row.insert(columns::NAME, "");
        row.insert(columns::STATE, CellValue::Empty);

        assert!(row.is_empty());
        assert_eq!(row.len(), 0);
    }

    #[test]
    fn test_numeric_cells_as_text() {
        let mut row = RawRow::new();
        row.insert(columns::AISHE_CODE, 41_207_i64);
        row.insert(columns::YEAR_OF_ESTABLISHMENT, 1995.0);
        row.insert(columns::LOCATION, 12.5);

        assert_eq!(row.text(columns::AISHE_CODE), Some("41207".to_string()));
        assert_eq!(
            row.text(columns::YEAR_OF_ESTABLISHMENT),
            Some("1995".to_string())
        );
        assert_eq!(row.text(columns::LOCATION), Some("12.5".to_string()));
    }

    #[test]
    fn test_missing_column() {
        let row = RawRow::new();
        assert!(row.get(columns::NAME).is_none());
        assert_eq!(row.text(columns::NAME), None);
    }
}
