//! Runs a prediction end to end: overall score, class statistics,
//! provisional grade, hard rules.

use tracing::info;

use crate::error::EngineError;
use crate::predict::classify::{lab_grade, zscore_grade};
use crate::predict::marks::{LabMarks, MarkSet};
use crate::predict::models::{Predictor, predict_grade};
use crate::predict::resolver::{Classifier, resolve_class_stats};
use crate::predict::rules::apply_hard_rules;
use crate::predict::types::{MeanOrigin, PredictionResult, PredictionSource};

/// Predicts the grade of a theory course.
///
/// # Errors
///
/// [`EngineError::ModelUnavailable`] or [`EngineError::UnknownGradeClass`]
/// when a model is needed and fails; no grade is produced in that case.
pub fn predict_theory<P: Predictor + ?Sized>(
    mark_set: &MarkSet,
    models: &P,
) -> Result<PredictionResult, EngineError> {
    let overall = mark_set.overall();
    let stats = resolve_class_stats(mark_set, overall, models)?;

    let provisional = match stats.classifier {
        Classifier::ZScore => zscore_grade(overall, stats.mean, stats.sd),
        Classifier::Model => predict_grade(
            models,
            overall,
            stats.mean,
            stats.sd,
            mark_set.class_strength,
        )?,
    };
    let letter_grade = apply_hard_rules(overall, mark_set.marks.fat, provisional);

    info!(
        overall,
        class_mean = stats.mean,
        class_sd = stats.sd,
        %provisional,
        %letter_grade,
        source = %stats.source,
        "Theory grade predicted"
    );

    Ok(PredictionResult {
        overall_score: overall,
        class_mean: stats.mean,
        class_sd: stats.sd,
        provisional_grade: provisional,
        letter_grade,
        source: stats.source,
        mean_origin: stats.mean_origin,
    })
}

/// Grades a lab course on the fixed scale. The class mean is reported as the
/// student's own total with no spread.
pub fn predict_lab(marks: &LabMarks) -> PredictionResult {
    let total = marks.total();
    let grade = lab_grade(total);
    info!(total, %grade, "Lab grade computed");

    PredictionResult {
        overall_score: total,
        class_mean: total,
        class_sd: 0.0,
        provisional_grade: grade,
        letter_grade: grade,
        source: PredictionSource::LabRule,
        mean_origin: MeanOrigin::OwnScore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::grade::Grade;
    use crate::predict::marks::{Components, ManualOverrides};
    use std::cell::RefCell;

    struct Constant(i64);

    impl Predictor for Constant {
        fn predict_class_mean(&self, _: &[f64]) -> Result<f64, ModelError> {
            Ok(60.0)
        }

        fn predict_class_sd(&self, _: &[f64]) -> Result<f64, ModelError> {
            Ok(10.0)
        }

        fn predict_grade_class(&self, _: &[f64]) -> Result<i64, ModelError> {
            Ok(self.0)
        }
    }

    /// Predicts a negative SD and records what the grade model is given.
    struct NegativeSd {
        grade_inputs: RefCell<Vec<Vec<f64>>>,
    }

    impl Predictor for NegativeSd {
        fn predict_class_mean(&self, _: &[f64]) -> Result<f64, ModelError> {
            Ok(60.0)
        }

        fn predict_class_sd(&self, _: &[f64]) -> Result<f64, ModelError> {
            Ok(-4.0)
        }

        fn predict_grade_class(&self, features: &[f64]) -> Result<i64, ModelError> {
            self.grade_inputs.borrow_mut().push(features.to_vec());
            Ok(3)
        }
    }

    fn marks(cat: f64, da: f64, fat: f64) -> Components {
        Components {
            cat1: cat,
            cat2: cat,
            da1: da,
            da2: da,
            da3: da,
            fat,
        }
    }

    #[test]
    fn test_manual_z_path() {
        let set = MarkSet::new(
            marks(45.0, 9.0, 85.0),
            Components::default(),
            ManualOverrides {
                class_average: 70.0,
                class_sd: 10.0,
            },
            60,
        )
        .unwrap();
        let result = predict_theory(&set, &Constant(0)).unwrap();
        // overall = 27 + 27 + 34 = 88 -> z = 1.8 -> S
        assert!((result.overall_score - 88.0).abs() < 1e-9);
        assert_eq!(result.letter_grade, Grade::S);
        assert_eq!(result.source, PredictionSource::ManualZ);
    }

    #[test]
    fn test_model_path_with_demotion() {
        let set = MarkSet::new(
            marks(35.0, 8.0, 70.0),
            Components::default(),
            ManualOverrides::default(),
            60,
        )
        .unwrap();
        // overall = 21 + 24 + 28 = 73; model says S, rule 3 demotes
        let result = predict_theory(&set, &Constant(6)).unwrap();
        assert_eq!(result.provisional_grade, Grade::S);
        assert_eq!(result.letter_grade, Grade::A);
        assert_eq!(result.source, PredictionSource::Ml);
    }

    #[test]
    fn test_fat_rule_fails_strong_overall() {
        let set = MarkSet::new(
            marks(50.0, 10.0, 39.0),
            Components::default(),
            ManualOverrides::default(),
            60,
        )
        .unwrap();
        let result = predict_theory(&set, &Constant(5)).unwrap();
        assert_eq!(result.letter_grade, Grade::F);
    }

    #[test]
    fn test_unknown_class_halts() {
        let set = MarkSet::new(
            marks(35.0, 8.0, 70.0),
            Components::default(),
            ManualOverrides::default(),
            60,
        )
        .unwrap();
        assert_eq!(
            predict_theory(&set, &Constant(12)),
            Err(EngineError::UnknownGradeClass(12))
        );
    }

    #[test]
    fn test_negative_sd_reaches_classifier_as_zero() {
        let set = MarkSet::new(
            marks(35.0, 8.0, 70.0),
            Components::default(),
            ManualOverrides::default(),
            60,
        )
        .unwrap();
        let models = NegativeSd {
            grade_inputs: RefCell::new(Vec::new()),
        };
        let result = predict_theory(&set, &models).unwrap();

        assert_eq!(result.class_sd, 0.0);
        assert_eq!(result.letter_grade, Grade::C);
        let inputs = models.grade_inputs.borrow();
        assert_eq!(inputs.len(), 1);
        let features = &inputs[0];
        assert!((features[0] - 73.0).abs() < 1e-9);
        assert_eq!(features[1..], [60.0, 0.0, 60.0]);
    }

    #[test]
    fn test_lab_path() {
        let result = predict_lab(&LabMarks::new(55.0, 34.5).unwrap());
        assert_eq!(result.letter_grade, Grade::S);
        assert_eq!(result.source, PredictionSource::LabRule);
        assert_eq!(result.class_sd, 0.0);
        assert_eq!(result.overall_score, 89.5);
    }
}
