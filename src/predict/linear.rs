//! Linear models loaded from JSON.
//!
//! Each model holds one head per accepted feature width; a vector whose
//! width has no head is rejected, which lets the caller fall back to the
//! reduced vector. Stored as:
//! ```json
//! {
//!   "class_mean": { "heads": [ { "weights": [..7], "intercept": 1.5 } ] },
//!   "class_sd":   { "heads": [ { "weights": [..2], "intercept": 4.0 } ] },
//!   "grade":      { "heads": [ { "classes": [ { "weights": [..3] }, ... ] } ] }
//! }
//! ```
//! Classifier heads score every class and return the argmax index.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::ModelError;
use crate::predict::models::{CLASS_MEAN_MODEL, CLASS_SD_MODEL, GRADE_MODEL, Predictor};

#[derive(Debug, Clone, Deserialize)]
pub struct LinearHead {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearHead {
    fn width(&self) -> usize {
        self.weights.len()
    }

    fn eval(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegressor {
    pub heads: Vec<LinearHead>,
}

impl LinearRegressor {
    fn predict(&self, model: &'static str, features: &[f64]) -> Result<f64, ModelError> {
        self.heads
            .iter()
            .find(|h| h.width() == features.len())
            .map(|h| h.eval(features))
            .ok_or_else(|| ModelError::Rejected {
                model,
                expected: self.heads.iter().map(LinearHead::width).collect(),
                got: features.len(),
            })
    }
}

/// One score head per class, all of the same width.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierHead {
    pub classes: Vec<LinearHead>,
}

impl ClassifierHead {
    fn width(&self) -> Option<usize> {
        self.classes.first().map(LinearHead::width)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    pub heads: Vec<ClassifierHead>,
}

impl LinearClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let head = self
            .heads
            .iter()
            .find(|h| h.width() == Some(features.len()))
            .ok_or_else(|| ModelError::Rejected {
                model: GRADE_MODEL,
                expected: self.heads.iter().filter_map(ClassifierHead::width).collect(),
                got: features.len(),
            })?;

        head.classes
            .iter()
            .map(|c| c.eval(features))
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .and_then(|(idx, _)| i64::try_from(idx).ok())
            .ok_or_else(|| ModelError::Failed {
                model: GRADE_MODEL,
                reason: "classifier head has no classes".to_string(),
            })
    }
}

/// The three models of the prediction pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModels {
    pub class_mean: LinearRegressor,
    pub class_sd: LinearRegressor,
    pub grade: LinearClassifier,
}

impl LinearModels {
    /// Loads the models from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model file '{}'", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid model file '{}'", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Predictor for LinearModels {
    fn predict_class_mean(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.class_mean.predict(CLASS_MEAN_MODEL, features)
    }

    fn predict_class_sd(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.class_sd.predict(CLASS_SD_MODEL, features)
    }

    fn predict_grade_class(&self, features: &[f64]) -> Result<i64, ModelError> {
        self.grade.predict(features)
    }
}
