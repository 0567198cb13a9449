//! Column preprocessing: text cleaning, standard scaling, one-hot encoding

use super::{ensure, ensure_finite};
use crate::error::{ChdError, Result};
use crate::record::{FeatureRow, FeatureValue};
use serde::{Deserialize, Serialize};

/// Fitted column transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric: NumericBlock,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
    #[serde(default)]
    pub normalize_text: TextNormalization,
}

/// Standard-scaled numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericBlock {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One-hot encoded categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    /// Fitted categories, already in normalized form
    pub categories: Vec<String>,
}

/// Cleaning applied to every text cell before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNormalization {
    #[serde(default = "default_true")]
    pub strip: bool,
    #[serde(default = "default_true")]
    pub lowercase: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TextNormalization {
    fn default() -> Self {
        Self {
            strip: true,
            lowercase: true,
        }
    }
}

impl TextNormalization {
    pub fn apply(&self, raw: &str) -> String {
        let value = if self.strip { raw.trim() } else { raw };
        if self.lowercase {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }
}

impl Preprocessor {
    /// Input columns this transformer consumes, numeric block first
    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric
            .columns
            .iter()
            .map(String::as_str)
            .chain(self.categorical.iter().map(|c| c.column.as_str()))
    }

    /// Width of the encoded feature vector
    pub fn encoded_width(&self) -> usize {
        self.numeric.columns.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    pub(super) fn check(&self) -> Result<()> {
        let n = self.numeric.columns.len();
        ensure(
            self.numeric.mean.len() == n,
            format!("numeric mean has {} entries for {} columns", self.numeric.mean.len(), n),
        )?;
        ensure(
            self.numeric.scale.len() == n,
            format!("numeric scale has {} entries for {} columns", self.numeric.scale.len(), n),
        )?;
        ensure_finite("numeric mean", &self.numeric.mean)?;
        ensure_finite("numeric scale", &self.numeric.scale)?;

        for cat in &self.categorical {
            ensure(
                !cat.categories.is_empty(),
                format!("column '{}' has no categories", cat.column),
            )?;
            for (i, category) in cat.categories.iter().enumerate() {
                ensure(
                    !cat.categories[..i].contains(category),
                    format!("column '{}' repeats category '{}'", cat.column, category),
                )?;
            }
        }
        Ok(())
    }

    /// Encode a schema-checked row into the dense feature vector
    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut encoded = Vec::with_capacity(self.encoded_width());

        for (i, column) in self.numeric.columns.iter().enumerate() {
            let value = cell(row, column)?
                .as_f64()
                .ok_or_else(|| ChdError::TypeMismatch {
                    column: column.clone(),
                    expected: "a number",
                })?;
            if !value.is_finite() {
                return Err(ChdError::NonFinite {
                    field: column.clone(),
                });
            }
            encoded.push(standardize(value, self.numeric.mean[i], self.numeric.scale[i]));
        }

        for cat in &self.categorical {
            let raw = cell(row, &cat.column)?
                .as_text()
                .ok_or_else(|| ChdError::TypeMismatch {
                    column: cat.column.clone(),
                    expected: "a text category",
                })?;
            let value = self.normalize_text.apply(raw);
            let hot = cat
                .categories
                .iter()
                .position(|c| *c == value)
                .ok_or_else(|| ChdError::UnknownCategory {
                    column: cat.column.clone(),
                    value: raw.to_string(),
                    known: cat.categories.join(", "),
                })?;
            encoded.extend((0..cat.categories.len()).map(|j| if j == hot { 1.0 } else { 0.0 }));
        }

        Ok(encoded)
    }
}

fn cell<'a>(row: &'a FeatureRow, column: &str) -> Result<&'a FeatureValue> {
    row.get(column)
        .ok_or_else(|| ChdError::MissingColumn(column.to_string()))
}

/// `(x - mean) / scale`; a degenerate scale leaves the centered value as is
fn standardize(value: f64, mean: f64, scale: f64) -> f64 {
    let centered = value - mean;
    if scale.abs() > 1e-10 {
        centered / scale
    } else {
        centered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> Preprocessor {
        Preprocessor {
            numeric: NumericBlock {
                columns: vec!["age".to_string()],
                mean: vec![40.0],
                scale: vec![10.0],
            },
            categorical: vec![CategoricalColumn {
                column: "famhist".to_string(),
                categories: vec!["absent".to_string(), "present".to_string()],
            }],
            normalize_text: TextNormalization::default(),
        }
    }

    #[test]
    fn test_text_normalization() {
        let norm = TextNormalization::default();
        assert_eq!(norm.apply("  PRESENT \t"), "present");

        let keep = TextNormalization {
            strip: false,
            lowercase: false,
        };
        assert_eq!(keep.apply(" Present"), " Present");
    }

    #[test]
    fn test_encode_scales_and_one_hots() {
        let row = FeatureRow::new()
            .with("age", FeatureValue::Integer(60))
            .with("famhist", FeatureValue::Text(" Present".to_string()));
        let encoded = preprocessor().encode(&row).unwrap();
        assert_eq!(encoded, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_scale_only_centers() {
        assert_eq!(standardize(5.0, 3.0, 0.0), 2.0);
    }

    #[test]
    fn test_unknown_category() {
        let row = FeatureRow::new()
            .with("age", FeatureValue::Number(60.0))
            .with("famhist", FeatureValue::Text("maybe".to_string()));
        match preprocessor().encode(&row) {
            Err(ChdError::UnknownCategory { value, known, .. }) => {
                assert_eq!(value, "maybe");
                assert_eq!(known, "absent, present");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let row = FeatureRow::new()
            .with("age", FeatureValue::Text("sixty".to_string()))
            .with("famhist", FeatureValue::Text("absent".to_string()));
        assert!(matches!(
            preprocessor().encode(&row),
            Err(ChdError::TypeMismatch { expected: "a number", .. })
        ));

        let row = FeatureRow::new()
            .with("age", FeatureValue::Integer(60))
            .with("famhist", FeatureValue::Integer(1));
        assert!(matches!(
            preprocessor().encode(&row),
            Err(ChdError::TypeMismatch { expected: "a text category", .. })
        ));
    }

    #[test]
    fn test_check_rejects_repeated_category() {
        let mut pre = preprocessor();
        pre.categorical[0].categories.push("absent".to_string());
        assert!(matches!(pre.check(), Err(ChdError::IncompatibleModel(_))));
    }
}
