//! Patient record schema
//!
//! The six measurements collected per submission, their bounds, and the
//! single-row table handed to the predictor.

use crate::error::{ChdError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Column names in the order the record is tabulated.
pub const COLUMNS: [&str; 6] = ["sbp", "ldl", "adiposity", "obesity", "age", "famhist"];

/// Accepted family history values as presented to the user.
pub const FAMHIST_OPTIONS: [&str; 2] = ["Present", "Absent"];

// ============================================================================
// Field table
// ============================================================================

/// Value domain of an input field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDomain {
    Real {
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    },
    Integer {
        min: i64,
        max: i64,
        default: i64,
    },
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
}

impl FieldDomain {
    /// Numeric bounds, `None` for categorical fields
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            FieldDomain::Real { min, max, .. } => Some((min, max)),
            FieldDomain::Integer { min, max, .. } => Some((min as f64, max as f64)),
            FieldDomain::Choice { .. } => None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        match self.bounds() {
            Some((min, max)) => value.is_finite() && value >= min && value <= max,
            None => false,
        }
    }
}

/// Static description of one form control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub help: &'static str,
    pub domain: FieldDomain,
}

impl FieldSpec {
    /// Format a value with the field's unit, e.g. "140 mmHg"
    pub fn with_unit(&self, value: impl fmt::Display) -> String {
        match self.unit {
            Some(unit) => format!("{} {}", value, unit),
            None => value.to_string(),
        }
    }
}

pub const FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        name: "sbp",
        label: "Systolic blood pressure",
        unit: Some("mmHg"),
        help: "Systolic arterial blood pressure",
        domain: FieldDomain::Real {
            min: 80.0,
            max: 250.0,
            default: 140.0,
            step: 1.0,
        },
    },
    FieldSpec {
        name: "ldl",
        label: "LDL cholesterol",
        unit: Some("mmol/L"),
        help: "Low-density lipoprotein cholesterol (bad cholesterol)",
        domain: FieldDomain::Real {
            min: 0.0,
            max: 10.0,
            default: 4.0,
            step: 0.01,
        },
    },
    FieldSpec {
        name: "adiposity",
        label: "Adiposity",
        unit: None,
        help: "Body fat percentage",
        domain: FieldDomain::Real {
            min: 0.0,
            max: 60.0,
            default: 25.0,
            step: 0.01,
        },
    },
    FieldSpec {
        name: "obesity",
        label: "Obesity (BMI)",
        unit: None,
        help: "Body mass index",
        domain: FieldDomain::Real {
            min: 0.0,
            max: 60.0,
            default: 30.0,
            step: 0.01,
        },
    },
    FieldSpec {
        name: "age",
        label: "Age",
        unit: Some("years"),
        help: "Age of the patient in years",
        domain: FieldDomain::Integer {
            min: 10,
            max: 100,
            default: 50,
        },
    },
    FieldSpec {
        name: "famhist",
        label: "Family history",
        unit: None,
        help: "Presence of heart disease in the family",
        domain: FieldDomain::Choice {
            options: &FAMHIST_OPTIONS,
            default: "Present",
        },
    },
];

/// Look up a field by column name
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

fn spec(name: &'static str) -> &'static FieldSpec {
    // COLUMNS and FIELDS are declared together; every column has a spec
    match field_spec(name) {
        Some(spec) => spec,
        None => unreachable!("no field spec for column {name}"),
    }
}

// ============================================================================
// Patient record
// ============================================================================

/// One submission: the six measurements in their natural types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub sbp: f64,
    pub ldl: f64,
    pub adiposity: f64,
    pub obesity: f64,
    pub age: u32,
    /// Passed through as entered; the pipeline normalizes case and whitespace
    pub famhist: String,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            sbp: 140.0,
            ldl: 4.0,
            adiposity: 25.0,
            obesity: 30.0,
            age: 50,
            famhist: "Present".to_string(),
        }
    }
}

impl PatientRecord {
    /// Check every numeric field against its declared domain.
    ///
    /// Family history is not checked here: the pipeline normalizes it and
    /// rejects unknown categories against the artifact's own category list.
    pub fn validate(&self) -> Result<()> {
        check_range("sbp", self.sbp)?;
        check_range("ldl", self.ldl)?;
        check_range("adiposity", self.adiposity)?;
        check_range("obesity", self.obesity)?;
        check_range("age", self.age as f64)?;
        Ok(())
    }

    pub fn to_row(&self) -> FeatureRow {
        FeatureRow::from(self)
    }
}

fn check_range(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ChdError::NonFinite {
            field: name.to_string(),
        });
    }
    if let Some((min, max)) = spec(name).domain.bounds() {
        if value < min || value > max {
            return Err(ChdError::OutOfRange {
                field: name,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Parse a typed real-valued field (form or terminal input)
pub fn parse_real(column: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ChdError::TypeMismatch {
            column: column.to_string(),
            expected: "a number",
        })
}

/// Parse a typed age; negative values are reported as out of range
pub fn parse_age(text: &str) -> Result<u32> {
    let age = text
        .trim()
        .parse::<i64>()
        .map_err(|_| ChdError::TypeMismatch {
            column: "age".to_string(),
            expected: "a whole number of years",
        })?;
    u32::try_from(age).map_err(|_| {
        let (min, max) = spec("age")
            .domain
            .bounds()
            .unwrap_or((0.0, f64::from(u32::MAX)));
        ChdError::OutOfRange {
            field: "age",
            value: age as f64,
            min,
            max,
        }
    })
}

// ============================================================================
// Feature row
// ============================================================================

/// A single cell of the feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Single-record table: ordered `(column, value)` pairs.
///
/// Duplicates are kept as sent so the predictor can reject them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.columns.push((name.into(), value));
    }

    /// Drop a column (all occurrences)
    pub fn remove(&mut self, name: &str) {
        self.columns.retain(|(n, _)| n != name);
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Check each known column against its field domain, in row order.
    ///
    /// Columns without a field spec are left to the pipeline's shape check.
    pub fn check_domains(&self) -> Result<()> {
        for (name, value) in self.iter() {
            let Some(spec) = field_spec(name) else {
                continue;
            };
            match spec.domain {
                FieldDomain::Real { .. } => {
                    let v = value.as_f64().ok_or_else(|| ChdError::TypeMismatch {
                        column: name.to_string(),
                        expected: "a number",
                    })?;
                    check_range(spec.name, v)?;
                }
                FieldDomain::Integer { .. } => {
                    let v = match value {
                        FeatureValue::Integer(v) => *v as f64,
                        FeatureValue::Number(v) if v.is_finite() && v.fract() == 0.0 => *v,
                        _ => {
                            return Err(ChdError::TypeMismatch {
                                column: name.to_string(),
                                expected: "a whole number of years",
                            })
                        }
                    };
                    check_range(spec.name, v)?;
                }
                FieldDomain::Choice { .. } => {
                    if value.as_text().is_none() {
                        return Err(ChdError::TypeMismatch {
                            column: name.to_string(),
                            expected: "text",
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<&PatientRecord> for FeatureRow {
    fn from(record: &PatientRecord) -> Self {
        FeatureRow::new()
            .with("sbp", FeatureValue::Number(record.sbp))
            .with("ldl", FeatureValue::Number(record.ldl))
            .with("adiposity", FeatureValue::Number(record.adiposity))
            .with("obesity", FeatureValue::Number(record.obesity))
            .with("age", FeatureValue::Integer(i64::from(record.age)))
            .with("famhist", FeatureValue::Text(record.famhist.clone()))
    }
}

impl From<PatientRecord> for FeatureRow {
    fn from(record: PatientRecord) -> Self {
        FeatureRow::from(&record)
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = FeatureRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping column names to values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<FeatureRow, A::Error> {
                let mut row = FeatureRow::new();
                while let Some((name, value)) = map.next_entry::<String, FeatureValue>()? {
                    row.push(name, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_cover_columns_in_order() {
        let names: Vec<&str> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, COLUMNS.to_vec());
    }

    #[test]
    fn test_defaults_are_in_domain() {
        let record = PatientRecord::default();
        assert!(record.validate().is_ok());

        for field in FIELDS.iter() {
            match field.domain {
                FieldDomain::Real { default, .. } => assert!(field.domain.contains(default)),
                FieldDomain::Integer { default, .. } => {
                    assert!(field.domain.contains(default as f64))
                }
                FieldDomain::Choice { options, default } => assert!(options.contains(&default)),
            }
        }
    }

    #[test]
    fn test_boundaries_accepted() {
        let mut record = PatientRecord::default();
        for (sbp, ldl, age) in [(80.0, 0.0, 10), (250.0, 10.0, 100)] {
            record.sbp = sbp;
            record.ldl = ldl;
            record.age = age;
            assert!(record.validate().is_ok(), "{:?}", record);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let record = PatientRecord {
            sbp: 79.9,
            ..PatientRecord::default()
        };
        match record.validate() {
            Err(ChdError::OutOfRange { field, .. }) => assert_eq!(field, "sbp"),
            other => panic!("expected OutOfRange, got {:?}", other),
        }

        let record = PatientRecord {
            age: 101,
            ..PatientRecord::default()
        };
        assert!(matches!(
            record.validate(),
            Err(ChdError::OutOfRange { field: "age", .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let record = PatientRecord {
            obesity: f64::NAN,
            ..PatientRecord::default()
        };
        assert!(matches!(record.validate(), Err(ChdError::NonFinite { .. })));
    }

    #[test]
    fn test_row_from_record() {
        let row = PatientRecord::default().to_row();
        assert_eq!(row.names().collect::<Vec<_>>(), COLUMNS.to_vec());
        assert_eq!(row.get("age"), Some(&FeatureValue::Integer(50)));
        assert_eq!(row.get("famhist").and_then(|v| v.as_text()), Some("Present"));
    }

    #[test]
    fn test_row_json_keeps_order_and_duplicates() {
        let row: FeatureRow =
            serde_json::from_str(r#"{"age": 50, "sbp": 140.5, "famhist": "Absent", "age": 51}"#)
                .unwrap();
        let names: Vec<&str> = row.names().collect();
        assert_eq!(names, vec!["age", "sbp", "famhist", "age"]);
        assert_eq!(row.get("sbp"), Some(&FeatureValue::Number(140.5)));
    }

    #[test]
    fn test_with_unit() {
        assert_eq!(spec("sbp").with_unit(140.0), "140 mmHg");
        assert_eq!(spec("obesity").with_unit(30.0), "30");
    }

    #[test]
    fn test_parse_text_fields() {
        assert_eq!(parse_real("ldl", " 4.25 ").unwrap(), 4.25);
        assert!(matches!(
            parse_real("sbp", "high"),
            Err(ChdError::TypeMismatch { .. })
        ));
        assert!(parse_real("sbp", "").is_err());
        assert_eq!(parse_age("50").unwrap(), 50);
        assert!(matches!(
            parse_age("-4"),
            Err(ChdError::OutOfRange { field: "age", .. })
        ));
        assert!(matches!(
            parse_age("50.5"),
            Err(ChdError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_row_domains_checked() {
        assert!(PatientRecord::default().to_row().check_domains().is_ok());

        let mut row = PatientRecord::default().to_row();
        row.remove("age");
        row.push("age", FeatureValue::Number(50.0));
        assert!(row.check_domains().is_ok());

        row.remove("age");
        row.push("age", FeatureValue::Number(50.7));
        assert!(matches!(
            row.check_domains(),
            Err(ChdError::TypeMismatch { column, .. }) if column == "age"
        ));

        let mut row = PatientRecord::default().to_row();
        row.remove("sbp");
        row.push("sbp", FeatureValue::Integer(1000));
        assert!(matches!(
            row.check_domains(),
            Err(ChdError::OutOfRange { field: "sbp", .. })
        ));

        let mut row = PatientRecord::default().to_row();
        row.remove("famhist");
        row.push("famhist", FeatureValue::Integer(1));
        assert!(matches!(
            row.check_domains(),
            Err(ChdError::TypeMismatch { column, .. }) if column == "famhist"
        ));
    }

    #[test]
    fn test_row_domains_ignore_unknown_columns() {
        let row = PatientRecord::default()
            .to_row()
            .with("tobacco", FeatureValue::Number(-3.0));
        assert!(row.check_domains().is_ok());
    }

    #[test]
    fn test_validate_leaves_famhist_to_pipeline() {
        let record = PatientRecord {
            famhist: "Maybe".to_string(),
            ..PatientRecord::default()
        };
        assert!(record.validate().is_ok());
    }
}
