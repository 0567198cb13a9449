//! Fitted principal component projection

use super::{ensure, ensure_finite};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pca {
    /// Per-feature mean of the encoded training data
    pub mean: Vec<f64>,
    /// One row per component, each of encoded width
    pub components: Vec<Vec<f64>>,
    #[serde(default)]
    pub explained_variance: Vec<f64>,
    #[serde(default)]
    pub whiten: bool,
}

impl Pca {
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Share of the retained variance carried by each component
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        let total: f64 = self.explained_variance.iter().sum();
        if total <= 0.0 {
            return Vec::new();
        }
        self.explained_variance.iter().map(|v| v / total).collect()
    }

    pub(super) fn check(&self, encoded_width: usize) -> Result<()> {
        ensure(
            self.mean.len() == encoded_width,
            format!(
                "PCA mean has width {} but the preprocessor emits {}",
                self.mean.len(),
                encoded_width
            ),
        )?;
        ensure(!self.components.is_empty(), "PCA has no components")?;
        for (k, component) in self.components.iter().enumerate() {
            ensure(
                component.len() == encoded_width,
                format!(
                    "PCA component {} has width {}, expected {}",
                    k,
                    component.len(),
                    encoded_width
                ),
            )?;
            ensure_finite("PCA component", component)?;
        }
        ensure_finite("PCA mean", &self.mean)?;
        ensure_finite("PCA explained variance", &self.explained_variance)?;

        if self.whiten {
            ensure(
                self.explained_variance.len() == self.components.len(),
                "whitening needs one explained variance per component",
            )?;
            ensure(
                self.explained_variance.iter().all(|v| *v > 0.0),
                "whitening needs positive explained variance",
            )?;
        }
        Ok(())
    }

    /// Project an encoded vector onto the components
    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        self.components
            .iter()
            .enumerate()
            .map(|(k, component)| {
                let z: f64 = x
                    .iter()
                    .zip(&self.mean)
                    .zip(component)
                    .map(|((xj, mj), cj)| (xj - mj) * cj)
                    .sum();
                if self.whiten {
                    z / self.explained_variance[k].sqrt()
                } else {
                    z
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pca() -> Pca {
        Pca {
            mean: vec![1.0, 1.0],
            components: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            explained_variance: vec![4.0, 1.0],
            whiten: false,
        }
    }

    #[test]
    fn test_transform_centers_and_projects() {
        let z = pca().transform(&[3.0, -1.0]);
        assert_eq!(z, vec![2.0, -2.0]);
    }

    #[test]
    fn test_whiten_divides_by_std() {
        let mut p = pca();
        p.whiten = true;
        let z = p.transform(&[3.0, -1.0]);
        assert_relative_eq!(z[0], 1.0);
        assert_relative_eq!(z[1], -2.0);
    }

    #[test]
    fn test_explained_variance_ratio() {
        let ratio = pca().explained_variance_ratio();
        assert_relative_eq!(ratio[0], 0.8);
        assert_relative_eq!(ratio[1], 0.2);
    }

    #[test]
    fn test_check_width() {
        assert!(pca().check(2).is_ok());
        assert!(pca().check(3).is_err());

        let mut p = pca();
        p.components[1].pop();
        assert!(p.check(2).is_err());
    }

    #[test]
    fn test_check_whiten_requires_variance() {
        let mut p = pca();
        p.whiten = true;
        p.explained_variance = vec![4.0];
        assert!(p.check(2).is_err());
    }
}
