//! Contract for the three trained models and the feature-vector fallback.
//!
//! Each model accepts a richer vector (with class strength) or a reduced one
//! (without). [`with_fallback`] tries the richer vector first and retries
//! once with the reduced vector; only a second failure reaches the caller.

use tracing::{debug, warn};

use crate::error::{EngineError, ModelError};
use crate::grade::Grade;
use crate::predict::marks::Components;

pub const CLASS_MEAN_MODEL: &str = "class mean";
pub const CLASS_SD_MODEL: &str = "class sd";
pub const GRADE_MODEL: &str = "grade";

/// The trained models, loaded once and shared read-only.
pub trait Predictor {
    /// Features: `[da1, da2, da3, cat1, cat2, fat, class_strength?]`.
    fn predict_class_mean(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Features: `[overall, class_mean, class_strength?]`.
    fn predict_class_sd(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Features: `[overall, class_mean, class_sd, class_strength?]`.
    /// Returns a class id in `0..=6` (F..S).
    fn predict_grade_class(&self, features: &[f64]) -> Result<i64, ModelError>;
}

/// Stand-in used when no model file is configured. Every call fails, so only
/// the fully manual path can produce a grade.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModels;

impl NoModels {
    fn fail<T>(model: &'static str) -> Result<T, ModelError> {
        Err(ModelError::Failed {
            model,
            reason: "no model file configured".to_string(),
        })
    }
}

impl Predictor for NoModels {
    fn predict_class_mean(&self, _: &[f64]) -> Result<f64, ModelError> {
        Self::fail(CLASS_MEAN_MODEL)
    }

    fn predict_class_sd(&self, _: &[f64]) -> Result<f64, ModelError> {
        Self::fail(CLASS_SD_MODEL)
    }

    fn predict_grade_class(&self, _: &[f64]) -> Result<i64, ModelError> {
        Self::fail(GRADE_MODEL)
    }
}

/// Calls `call` with `rich`, then with `reduced` if the first call fails.
pub fn with_fallback<T>(
    model: &'static str,
    rich: &[f64],
    reduced: &[f64],
    call: impl Fn(&[f64]) -> Result<T, ModelError>,
) -> Result<T, EngineError> {
    match call(rich) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!(model, error = %first, "Retrying with reduced feature vector");
            call(reduced).map_err(|second| {
                warn!(model, error = %second, "Model failed on both feature vectors");
                EngineError::ModelUnavailable {
                    model,
                    reason: second.to_string(),
                }
            })
        }
    }
}

fn finite(model: &'static str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::ModelUnavailable {
            model,
            reason: format!("non-finite prediction {value}"),
        })
    }
}

/// Predicts the class mean from a student's raw marks.
pub fn predict_class_mean<P: Predictor + ?Sized>(
    models: &P,
    marks: &Components,
    class_strength: u32,
) -> Result<f64, EngineError> {
    let reduced = [marks.da1, marks.da2, marks.da3, marks.cat1, marks.cat2, marks.fat];
    let mut rich = reduced.to_vec();
    rich.push(f64::from(class_strength));

    let mean = with_fallback(CLASS_MEAN_MODEL, &rich, &reduced, |f| {
        models.predict_class_mean(f)
    })?;
    finite(CLASS_MEAN_MODEL, mean)
}

/// Predicts the class SD. Negative predictions are floored at 0.
pub fn predict_class_sd<P: Predictor + ?Sized>(
    models: &P,
    overall: f64,
    class_mean: f64,
    class_strength: u32,
) -> Result<f64, EngineError> {
    let rich = [overall, class_mean, f64::from(class_strength)];
    let sd = with_fallback(CLASS_SD_MODEL, &rich, &rich[..2], |f| {
        models.predict_class_sd(f)
    })?;
    Ok(finite(CLASS_SD_MODEL, sd)?.max(0.0))
}

/// Predicts the letter grade through the classifier.
pub fn predict_grade<P: Predictor + ?Sized>(
    models: &P,
    overall: f64,
    class_mean: f64,
    class_sd: f64,
    class_strength: u32,
) -> Result<Grade, EngineError> {
    let rich = [overall, class_mean, class_sd, f64::from(class_strength)];
    let id = with_fallback(GRADE_MODEL, &rich, &rich[..3], |f| {
        models.predict_grade_class(f)
    })?;
    Grade::from_class_id(id).ok_or(EngineError::UnknownGradeClass(id))
}
