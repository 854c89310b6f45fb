//! Row normalization: raw cells to typed candidate records.
//!
//! Normalization is pure. A row either becomes a candidate or is rejected with
//! the first required field found missing; rejected rows are counted, never
//! surfaced as errors.

use thiserror::Error;

use super::row::{CellValue, RawRow, columns};
use crate::domain::entities::{
    InstitutionRecord, NewCollege, NewUniversity, YEAR_OF_ESTABLISHMENT_RANGE,
};

/// Required columns, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    AisheCode,
    Name,
    State,
    District,
}

impl RequiredField {
    pub fn column(self) -> &'static str {
        match self {
            Self::AisheCode => columns::AISHE_CODE,
            Self::Name => columns::NAME,
            Self::State => columns::STATE,
            Self::District => columns::DISTRICT,
        }
    }
}

/// Why a row did not become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("missing required field `{}`", .0.column())]
    MissingField(RequiredField),
}

/// A parsed college row, not yet resolved against universities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCollege {
    pub aishe_code: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub location: Option<String>,
    pub college_type: Option<String>,
    pub management: Option<String>,
    pub university_aishe_code: Option<String>,
    pub university_name: Option<String>,
    pub university_type: Option<String>,
}

impl CandidateCollege {
    /// Attaches the resolved parent and turns the candidate into an insert payload.
    pub fn into_new_college(self, university_id: Option<String>) -> NewCollege {
        NewCollege {
            aishe_code: self.aishe_code,
            name: self.name,
            state: self.state,
            district: self.district,
            website: self.website,
            year_of_establishment: self.year_of_establishment,
            location: self.location,
            college_type: self.college_type,
            management: self.management,
            university_aishe_code: self.university_aishe_code,
            university_name: self.university_name,
            university_type: self.university_type,
            university_id,
        }
    }
}

impl InstitutionRecord for CandidateCollege {
    fn aishe_code(&self) -> &str {
        &self.aishe_code
    }
}

/// Fields shared by every institution row.
struct CommonFields {
    aishe_code: String,
    name: String,
    state: String,
    district: String,
    website: Option<String>,
    year_of_establishment: Option<i32>,
    location: Option<String>,
}

fn common_fields(row: &RawRow) -> Result<CommonFields, RowRejection> {
    Ok(CommonFields {
        aishe_code: required(row, RequiredField::AisheCode)?,
        name: required(row, RequiredField::Name)?,
        state: required(row, RequiredField::State)?,
        district: required(row, RequiredField::District)?,
        website: row.text(columns::WEBSITE),
        year_of_establishment: row
            .get(columns::YEAR_OF_ESTABLISHMENT)
            .and_then(parse_year),
        location: row.text(columns::LOCATION),
    })
}

/// Normalizes one row of the affiliated-college dataset.
pub fn normalize_college(row: &RawRow) -> Result<CandidateCollege, RowRejection> {
    let common = common_fields(row)?;

    Ok(CandidateCollege {
        aishe_code: common.aishe_code,
        name: common.name,
        state: common.state,
        district: common.district,
        website: common.website,
        year_of_establishment: common.year_of_establishment,
        location: common.location,
        college_type: row.text(columns::COLLEGE_TYPE),
        management: row.text(columns::MANAGEMENT),
        university_aishe_code: row.text(columns::UNIVERSITY_AISHE_CODE),
        university_name: row.text(columns::UNIVERSITY_NAME),
        university_type: row.text(columns::UNIVERSITY_TYPE),
    })
}

/// Normalizes one row of the university dataset.
pub fn normalize_university(row: &RawRow) -> Result<NewUniversity, RowRejection> {
    let common = common_fields(row)?;

    Ok(NewUniversity {
        aishe_code: common.aishe_code,
        name: common.name,
        state: common.state,
        district: common.district,
        website: common.website,
        year_of_establishment: common.year_of_establishment,
        location: common.location,
    })
}

fn required(row: &RawRow, field: RequiredField) -> Result<String, RowRejection> {
    row.text(field.column())
        .ok_or(RowRejection::MissingField(field))
}

/// Reads a year cell. Numeric cells are truncated; text takes its leading
/// integer (`"1995 (approx)"` is 1995). Years outside
/// [`YEAR_OF_ESTABLISHMENT_RANGE`] and anything else are absent.
fn parse_year(cell: &CellValue) -> Option<i32> {
    let year = match cell {
        CellValue::Int(i) => i32::try_from(*i).ok(),
        CellValue::Float(x) if x.is_finite() => {
            let truncated = x.trunc();
            if truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
                Some(truncated as i32)
            } else {
                None
            }
        }
        CellValue::Text(s) => leading_integer(s),
        _ => None,
    };

    year.filter(|y| YEAR_OF_ESTABLISHMENT_RANGE.contains(y))
}

fn leading_integer(s: &str) -> Option<i32> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    format!("{}{}", sign, &digits[..end]).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college_row() -> RawRow {
        [
            (columns::AISHE_CODE, " C-10001 "),
            (columns::NAME, "Hindu College"),
            (columns::STATE, "Delhi"),
            (columns::DISTRICT, "North Delhi"),
            (columns::WEBSITE, " www.hinducollege.ac.in "),
            (columns::LOCATION, "Urban"),
            (columns::COLLEGE_TYPE, "Affiliated College"),
            (columns::MANAGEMENT, "Private Aided"),
            (columns::UNIVERSITY_AISHE_CODE, "U-0001"),
            (columns::UNIVERSITY_NAME, "University of Delhi"),
            (columns::UNIVERSITY_TYPE, "Central University"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_normalize_college_full_row() {
        let mut row = college_row();
        row.insert(columns::YEAR_OF_ESTABLISHMENT, 1899_i64);

        let candidate = normalize_college(&row).unwrap();

        assert_eq!(candidate.aishe_code, "C-10001");
        assert_eq!(candidate.name, "Hindu College");
        assert_eq!(candidate.website, Some("www.hinducollege.ac.in".to_string()));
        assert_eq!(candidate.year_of_establishment, Some(1899));
        assert_eq!(candidate.university_aishe_code, Some("U-0001".to_string()));
        assert_eq!(
            candidate.university_type,
            Some("Central University".to_string())
        );
    }

    #[test]
    fn test_missing_required_fields_reject() {
        for field in [
            RequiredField::AisheCode,
            RequiredField::Name,
            RequiredField::State,
            RequiredField::District,
        ] {
            let mut row = college_row();
            row.insert(field.column(), "   ");
            // whitespace-only values survive insert; they are rejected after trim
            assert_eq!(
                normalize_college(&row),
                Err(RowRejection::MissingField(field)),
                "{:?}",
                field
            );
        }
    }

    #[test]
    fn test_absent_required_column_rejects() {
        let row: RawRow = [(columns::NAME, "Bad")].into_iter().collect();

        assert_eq!(
            normalize_college(&row),
            Err(RowRejection::MissingField(RequiredField::AisheCode))
        );
    }

    #[test]
    fn test_optional_fields_absent_not_empty() {
        let row: RawRow = [
            (columns::AISHE_CODE, "C-2"),
            (columns::NAME, "Acme College"),
            (columns::STATE, "X"),
            (columns::DISTRICT, "Y"),
            (columns::WEBSITE, "  "),
            (columns::MANAGEMENT, ""),
        ]
        .into_iter()
        .collect();

        let candidate = normalize_college(&row).unwrap();

        assert_eq!(candidate.website, None);
        assert_eq!(candidate.management, None);
        assert_eq!(candidate.location, None);
        assert_eq!(candidate.university_name, None);
        assert_eq!(candidate.year_of_establishment, None);
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_year(&CellValue::Int(1995)), Some(1995));
        assert_eq!(parse_year(&CellValue::Float(1995.0)), Some(1995));
        assert_eq!(parse_year(&CellValue::Float(1995.7)), Some(1995));
        assert_eq!(parse_year(&"1995".into()), Some(1995));
        assert_eq!(parse_year(&" 1995.0 ".into()), Some(1995));
        assert_eq!(parse_year(&"1995 (approx)".into()), Some(1995));
        assert_eq!(parse_year(&"N/A".into()), None);
        assert_eq!(parse_year(&"".into()), None);
        assert_eq!(parse_year(&CellValue::Float(f64::NAN)), None);
        assert_eq!(parse_year(&CellValue::Bool(true)), None);
        assert_eq!(parse_year(&CellValue::Int(i64::MAX)), None);
    }

    #[test]
    fn test_year_outside_stored_range_is_absent() {
        assert_eq!(parse_year(&CellValue::Int(0)), None);
        assert_eq!(parse_year(&CellValue::Float(0.0)), None);
        assert_eq!(parse_year(&"95".into()), None);
        assert_eq!(parse_year(&CellValue::Int(20000)), None);
        assert_eq!(parse_year(&"-1995".into()), None);
        assert_eq!(parse_year(&CellValue::Int(1000)), Some(1000));
        assert_eq!(parse_year(&CellValue::Int(9999)), Some(9999));
    }

    #[test]
    fn test_out_of_range_year_keeps_row() {
        for year in [CellValue::Int(0), CellValue::from("95")] {
            let mut row = college_row();
            row.insert(columns::YEAR_OF_ESTABLISHMENT, year);

            let candidate = normalize_college(&row).unwrap();
            assert_eq!(candidate.aishe_code, "C-10001");
            assert_eq!(candidate.year_of_establishment, None);
        }
    }

    #[test]
    fn test_non_numeric_year_keeps_row() {
        let mut row = college_row();
        row.insert(columns::YEAR_OF_ESTABLISHMENT, "unknown");

        let candidate = normalize_college(&row).unwrap();
        assert_eq!(candidate.year_of_establishment, None);
    }

    #[test]
    fn test_numeric_code_cell() {
        let mut row = college_row();
        row.insert(columns::AISHE_CODE, 41207.0);

        let candidate = normalize_college(&row).unwrap();
        assert_eq!(candidate.aishe_code, "41207");
    }

    #[test]
    fn test_normalize_university() {
        let row: RawRow = [
            (columns::AISHE_CODE, "U-0001"),
            (columns::NAME, " University of Delhi "),
            (columns::STATE, "Delhi"),
            (columns::DISTRICT, "North Delhi"),
            (columns::YEAR_OF_ESTABLISHMENT, "1922"),
            (columns::COLLEGE_TYPE, "ignored for universities"),
        ]
        .into_iter()
        .collect();

        let university = normalize_university(&row).unwrap();

        assert_eq!(university.name, "University of Delhi");
        assert_eq!(university.year_of_establishment, Some(1922));
        assert_eq!(university.website, None);
    }

    #[test]
    fn test_into_new_college_keeps_denormalized_fields() {
        let candidate = normalize_college(&college_row()).unwrap();
        let college = candidate.into_new_college(None);

        assert_eq!(college.university_id, None);
        assert_eq!(college.university_name, Some("University of Delhi".to_string()));
        assert_eq!(college.university_aishe_code, Some("U-0001".to_string()));
    }
}
