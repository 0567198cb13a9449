//! Pipeline artifact
//!
//! A fitted `preprocess -> PCA -> logistic regression` pipeline stored as a
//! JSON document. The artifact is checked once at load; every prediction after
//! that only reads it.

pub mod logistic;
pub mod pca;
pub mod preprocess;

pub use logistic::LogisticRegression;
pub use pca::Pca;
pub use preprocess::{CategoricalColumn, NumericBlock, Preprocessor, TextNormalization};

use crate::error::{ChdError, Result};
use crate::record::{FeatureRow, COLUMNS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Format tag every artifact must carry
pub const FORMAT_TAG: &str = "chd-pipeline";

/// Artifact layout version understood by this build
pub const FORMAT_VERSION: u32 = 1;

/// Probability above which the positive class is predicted
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Descriptive fields shown in the model information panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub algorithm: String,
    pub dataset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub format: String,
    pub format_version: u32,
    pub metadata: ModelMetadata,
    /// Input columns in table order
    pub columns: Vec<String>,
    pub preprocessor: Preprocessor,
    pub pca: Pca,
    pub classifier: LogisticRegression,
}

/// Shape of a loaded pipeline, for health and info output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub name: String,
    pub algorithm: String,
    pub dataset: String,
    pub columns: Vec<String>,
    pub encoded_width: usize,
    pub n_components: usize,
    pub explained_variance_ratio: Vec<f64>,
    pub whiten: bool,
}

impl Pipeline {
    /// Read and check an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ChdError::ModelNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ChdError::ModelIo {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let pipeline = Self::from_json(&content)?;
        info!(
            "Loaded pipeline '{}' from {} ({} components)",
            pipeline.metadata.name,
            path.display(),
            pipeline.pca.n_components()
        );
        Ok(pipeline)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let pipeline: Pipeline = serde_json::from_str(content)?;
        pipeline.check()?;
        Ok(pipeline)
    }

    /// Structural compatibility checks
    pub fn check(&self) -> Result<()> {
        ensure(
            self.format == FORMAT_TAG,
            format!("format '{}' is not '{}'", self.format, FORMAT_TAG),
        )?;
        ensure(
            self.format_version == FORMAT_VERSION,
            format!(
                "format version {} is not supported (expected {})",
                self.format_version, FORMAT_VERSION
            ),
        )?;

        for (i, column) in self.columns.iter().enumerate() {
            ensure(
                !self.columns[..i].contains(column),
                format!("column '{}' listed twice", column),
            )?;
        }
        ensure(
            self.columns.len() == COLUMNS.len()
                && COLUMNS.iter().all(|c| self.columns.iter().any(|s| s == c)),
            format!(
                "columns {:?} do not match the patient record {:?}",
                self.columns, COLUMNS
            ),
        )?;

        let consumed: Vec<&str> = self.preprocessor.input_columns().collect();
        ensure(
            consumed.len() == self.columns.len()
                && self.columns.iter().all(|c| consumed.contains(&c.as_str())),
            format!(
                "preprocessor consumes {:?} but the artifact declares {:?}",
                consumed, self.columns
            ),
        )?;

        self.preprocessor.check()?;
        self.pca.check(self.preprocessor.encoded_width())?;
        self.classifier.check(self.pca.n_components())?;
        Ok(())
    }

    /// Reject rows that are not exactly the declared columns
    pub fn check_row(&self, row: &FeatureRow) -> Result<()> {
        let names: Vec<&str> = row.names().collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ChdError::DuplicateColumn(name.to_string()));
            }
        }
        if let Some(missing) = self
            .columns
            .iter()
            .find(|c| !names.contains(&c.as_str()))
        {
            return Err(ChdError::MissingColumn(missing.clone()));
        }
        if let Some(extra) = names
            .iter()
            .find(|n| !self.columns.iter().any(|c| c == *n))
        {
            return Err(ChdError::UnexpectedColumn(extra.to_string()));
        }
        Ok(())
    }

    /// Row -> PCA space
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let encoded = self.preprocessor.encode(row)?;
        let projected = self.pca.transform(&encoded);
        debug!(?encoded, ?projected, "row transformed");
        Ok(projected)
    }

    pub fn predict_proba(&self, row: &FeatureRow) -> Result<f64> {
        let z = self.transform(row)?;
        Ok(self.classifier.predict_proba(&z))
    }

    pub fn predict(&self, row: &FeatureRow) -> Result<u8> {
        let probability = self.predict_proba(row)?;
        Ok(self.classifier.label_for(probability))
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            name: self.metadata.name.clone(),
            algorithm: self.metadata.algorithm.clone(),
            dataset: self.metadata.dataset.clone(),
            columns: self.columns.clone(),
            encoded_width: self.preprocessor.encoded_width(),
            n_components: self.pca.n_components(),
            explained_variance_ratio: self.pca.explained_variance_ratio(),
            whiten: self.pca.whiten,
        }
    }
}

pub(crate) fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ChdError::IncompatibleModel(message.into()))
    }
}

pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<()> {
    ensure(
        values.iter().all(|v| v.is_finite()),
        format!("{} contains non-finite values", what),
    )
}
