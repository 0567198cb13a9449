//! CHD Common - Shared types for CHD risk assessment
//!
//! Patient record schema, the pipeline artifact and its predictor, the
//! assessment view model, configuration and terminal display helpers.

pub mod assessment;
pub mod config;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod predictor;
pub mod record;
pub mod ui_colors;

pub use assessment::{Assessment, AssessmentSummary, Diagnosis, Metric, RECOMMENDATION};
pub use config::Config;
pub use error::{ChdError, Result};
pub use pipeline::{ModelMetadata, Pipeline, PipelineSummary};
pub use predictor::RiskPredictor;
pub use record::{FeatureRow, FeatureValue, FieldDomain, FieldSpec, PatientRecord, FIELDS};
