//! Assessment - what gets rendered after a submission
//!
//! Pure view model: every front end (web page, TUI, terminal, JSON) reads the
//! same diagnosis, tone, percentage and echoed metrics from here.

use crate::record::{field_spec, PatientRecord};
use crate::ui_colors::{format_probability, RiskTone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed banner shown under every result
pub const RECOMMENDATION: &str =
    "Consult a healthcare professional for a complete evaluation and personalised follow-up.";

/// Two-state diagnosis badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    ElevatedRisk,
    LowRisk,
}

impl Diagnosis {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Diagnosis::ElevatedRisk
        } else {
            Diagnosis::LowRisk
        }
    }

    pub fn badge_text(&self) -> &'static str {
        match self {
            Diagnosis::ElevatedRisk => "elevated risk",
            Diagnosis::LowRisk => "low risk",
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Diagnosis::ElevatedRisk => "The model detects a significant risk of heart disease.",
            Diagnosis::LowRisk => "The model indicates a reduced risk of heart disease.",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Diagnosis::ElevatedRisk)
    }
}

/// One echoed input value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub record: PatientRecord,
    pub probability: f64,
    pub label: u8,
    pub assessed_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(record: PatientRecord, probability: f64, label: u8) -> Self {
        Self {
            record,
            probability,
            label,
            assessed_at: Utc::now(),
        }
    }

    pub fn diagnosis(&self) -> Diagnosis {
        Diagnosis::from_label(self.label)
    }

    pub fn tone(&self) -> RiskTone {
        RiskTone::from_probability(self.probability)
    }

    pub fn percentage(&self) -> String {
        format_probability(self.probability)
    }

    /// Six echoed metrics laid out as two columns of three
    pub fn metric_columns(&self) -> [[Metric; 3]; 2] {
        let r = &self.record;
        [
            [
                metric("Age", "age", r.age),
                metric("Systolic pressure", "sbp", r.sbp),
                metric("LDL", "ldl", r.ldl),
            ],
            [
                metric("Adiposity", "adiposity", r.adiposity),
                metric("Obesity (BMI)", "obesity", r.obesity),
                Metric {
                    label: "Family history",
                    value: r.famhist.clone(),
                },
            ],
        ]
    }

    pub fn summary(&self) -> AssessmentSummary {
        let diagnosis = self.diagnosis();
        AssessmentSummary {
            probability: self.probability,
            label: self.label,
            diagnosis,
            badge: diagnosis.badge_text().to_string(),
            percentage: self.percentage(),
            color: self.tone().hex(),
            assessed_at: self.assessed_at,
        }
    }
}

fn metric(label: &'static str, column: &str, value: impl std::fmt::Display) -> Metric {
    let value = match field_spec(column) {
        Some(spec) => spec.with_unit(value),
        None => value.to_string(),
    };
    Metric { label, value }
}

/// Serializable result for the JSON API and `--json` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub probability: f64,
    pub label: u8,
    pub diagnosis: Diagnosis,
    pub badge: String,
    pub percentage: String,
    pub color: String,
    pub assessed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_follows_label() {
        let elevated = Assessment::new(PatientRecord::default(), 0.3, 1);
        assert_eq!(elevated.diagnosis().badge_text(), "elevated risk");

        let low = Assessment::new(PatientRecord::default(), 0.7, 0);
        assert_eq!(low.diagnosis().badge_text(), "low risk");
    }

    #[test]
    fn test_tone_follows_probability() {
        assert_eq!(Assessment::new(PatientRecord::default(), 0.51, 1).tone(), RiskTone::Red);
        assert_eq!(Assessment::new(PatientRecord::default(), 0.5, 0).tone(), RiskTone::Green);
    }

    #[test]
    fn test_metric_columns() {
        let a = Assessment::new(PatientRecord::default(), 0.45, 0);
        let cols = a.metric_columns();
        assert_eq!(cols[0][0].value, "50 years");
        assert_eq!(cols[0][1].value, "140 mmHg");
        assert_eq!(cols[0][2].value, "4 mmol/L");
        assert_eq!(cols[1][1].label, "Obesity (BMI)");
        assert_eq!(cols[1][1].value, "30");
        assert_eq!(cols[1][2].value, "Present");
    }

    #[test]
    fn test_summary_json() {
        let a = Assessment::new(PatientRecord::default(), 0.8, 1);
        let json = serde_json::to_value(a.summary()).unwrap();
        assert_eq!(json["diagnosis"], "elevated_risk");
        assert_eq!(json["badge"], "elevated risk");
        assert_eq!(json["percentage"], "80.0%");
        assert_eq!(json["color"], "#d32f2f");
    }
}
