//! Binary logistic regression head

use super::{ensure, ensure_finite, DECISION_THRESHOLD};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<u8>,
}

fn default_classes() -> Vec<u8> {
    vec![0, 1]
}

impl LogisticRegression {
    pub(super) fn check(&self, n_features: usize) -> Result<()> {
        ensure(
            self.coef.len() == n_features,
            format!(
                "classifier has {} coefficients for {} PCA components",
                self.coef.len(),
                n_features
            ),
        )?;
        ensure_finite("classifier coefficients", &self.coef)?;
        ensure(self.intercept.is_finite(), "classifier intercept is not finite")?;
        ensure(
            self.classes == [0, 1],
            format!("expected classes [0, 1], found {:?}", self.classes),
        )?;
        Ok(())
    }

    pub fn decision_function(&self, z: &[f64]) -> f64 {
        self.intercept + self.coef.iter().zip(z).map(|(w, x)| w * x).sum::<f64>()
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, z: &[f64]) -> f64 {
        sigmoid(self.decision_function(z))
    }

    /// Label for an already computed probability
    pub fn label_for(&self, probability: f64) -> u8 {
        if probability > DECISION_THRESHOLD {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

/// Logistic function, split on sign so `exp` never overflows
pub fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}
