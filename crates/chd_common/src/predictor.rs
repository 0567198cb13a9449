//! Risk predictor - the loaded pipeline behind a narrow interface
//!
//! Constructed once per process, then shared read-only (cheap `Clone`).
//! There is no way to obtain a predictor without a successfully loaded
//! artifact, so a failed load can never turn into a default answer.

use crate::assessment::Assessment;
use crate::error::Result;
use crate::pipeline::{ModelMetadata, Pipeline, PipelineSummary};
use crate::record::{FeatureRow, PatientRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RiskPredictor {
    pipeline: Arc<Pipeline>,
    source: Option<PathBuf>,
}

impl RiskPredictor {
    /// Load the artifact at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pipeline = Pipeline::load(path)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            source: Some(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory pipeline (checked first)
    pub fn from_pipeline(pipeline: Pipeline) -> Result<Self> {
        pipeline.check()?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            source: None,
        })
    }

    /// Probability of the positive (CHD risk) class, in [0, 1]
    pub fn predict_proba(&self, row: &FeatureRow) -> Result<f64> {
        self.check(row)?;
        self.pipeline.predict_proba(row)
    }

    /// Thresholded class label, 0 or 1
    pub fn predict(&self, row: &FeatureRow) -> Result<u8> {
        self.check(row)?;
        self.pipeline.predict(row)
    }

    // Shape errors take precedence over value errors
    fn check(&self, row: &FeatureRow) -> Result<()> {
        self.pipeline.check_row(row)?;
        row.check_domains()
    }

    /// Validate a record, run both calls and package the result
    pub fn assess(&self, record: &PatientRecord) -> Result<Assessment> {
        record.validate()?;
        let row = record.to_row();
        let probability = self.predict_proba(&row)?;
        let label = self.predict(&row)?;
        debug!(probability, label, "assessment computed");
        Ok(Assessment::new(record.clone(), probability, label))
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.pipeline.metadata
    }

    pub fn summary(&self) -> PipelineSummary {
        self.pipeline.summary()
    }

    /// Where the artifact was read from, if it came from disk
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChdError;
    use crate::pipeline::testing::fixture;

    #[test]
    fn test_assess_validates_first() {
        let predictor = RiskPredictor::from_pipeline(fixture()).unwrap();
        let record = PatientRecord {
            ldl: 12.0,
            ..PatientRecord::default()
        };
        assert!(matches!(
            predictor.assess(&record),
            Err(ChdError::OutOfRange { field: "ldl", .. })
        ));
    }

    #[test]
    fn test_assess_rejects_unknown_famhist() {
        let predictor = RiskPredictor::from_pipeline(fixture()).unwrap();
        let record = PatientRecord {
            famhist: "Maybe".to_string(),
            ..PatientRecord::default()
        };
        assert!(record.validate().is_ok());
        assert!(matches!(
            predictor.assess(&record),
            Err(ChdError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_row_domain_checked_before_scoring() {
        let predictor = RiskPredictor::from_pipeline(fixture()).unwrap();
        let row = PatientRecord {
            sbp: 1000.0,
            ..PatientRecord::default()
        }
        .to_row();
        assert!(matches!(
            predictor.predict_proba(&row),
            Err(ChdError::OutOfRange { field: "sbp", .. })
        ));
        assert!(predictor.predict(&row).is_err());
    }

    #[test]
    fn test_from_pipeline_checks() {
        let mut broken = fixture();
        broken.pca.mean.pop();
        assert!(RiskPredictor::from_pipeline(broken).is_err());
    }

    #[test]
    fn test_clones_share_pipeline() {
        let predictor = RiskPredictor::from_pipeline(fixture()).unwrap();
        let clone = predictor.clone();
        assert!(Arc::ptr_eq(&predictor.pipeline, &clone.pipeline));
        assert!(predictor.source().is_none());
    }
}
