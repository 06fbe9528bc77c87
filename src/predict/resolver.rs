//! Decides where the class mean and SD come from.
//!
//! The manual overrides are folded into a [`StatsSource`] once, in precedence
//! order, and the resolver matches on that tag. Exactly one branch runs.

use tracing::{debug, info};

use crate::error::EngineError;
use crate::predict::marks::{Components, ManualOverrides, MarkSet, weighted_score};
use crate::predict::models::{Predictor, predict_class_mean, predict_class_sd};
use crate::predict::types::{MeanOrigin, PredictionSource};
use crate::predict::utility::positive_mean;

/// Source of the class statistics, chosen from the manual overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsSource {
    /// Both average and SD entered; no models involved.
    Manual { mean: f64, sd: f64 },
    /// Only the average entered.
    ManualAvgOnly { mean: f64 },
    /// Only the SD entered.
    ManualSdOnly { sd: f64 },
    /// Nothing entered.
    Auto,
}

impl StatsSource {
    pub fn from_overrides(manual: &ManualOverrides) -> Self {
        let (avg, sd) = (manual.class_average, manual.class_sd);
        if avg > 0.0 && sd > 0.0 {
            StatsSource::Manual { mean: avg, sd }
        } else if avg > 0.0 {
            StatsSource::ManualAvgOnly { mean: avg }
        } else if sd > 0.0 {
            StatsSource::ManualSdOnly { sd }
        } else {
            StatsSource::Auto
        }
    }
}

/// How the provisional grade is to be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    ZScore,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStats {
    pub mean: f64,
    pub sd: f64,
    pub source: PredictionSource,
    pub mean_origin: MeanOrigin,
    pub classifier: Classifier,
}

/// Class mean from the supplied component averages.
///
/// DA and CAT averages are each averaged over the supplied (non-zero) values,
/// falling back to the student's own marks when none of that kind was
/// supplied. The FAT average falls back to the student's FAT.
pub fn analytic_class_mean(marks: &Components, averages: &Components) -> f64 {
    let da = positive_mean(&averages.das())
        .or_else(|| positive_mean(&marks.das()))
        .unwrap_or(0.0);
    let cat = positive_mean(&averages.cats())
        .or_else(|| positive_mean(&marks.cats()))
        .unwrap_or(0.0);
    let fat = if averages.fat > 0.0 {
        averages.fat
    } else {
        marks.fat
    };

    weighted_score(cat, cat, da, da, da, fat)
}

/// Resolves the class mean and SD for `mark_set`, whose overall score is
/// `overall`.
pub fn resolve_class_stats<P: Predictor + ?Sized>(
    mark_set: &MarkSet,
    overall: f64,
    models: &P,
) -> Result<ClassStats, EngineError> {
    let strength = mark_set.class_strength;
    let source = StatsSource::from_overrides(&mark_set.manual);
    debug!(?source, "Resolving class statistics");

    let stats = match source {
        StatsSource::Manual { mean, sd } => {
            info!("Manual override active, component averages ignored and models skipped");
            ClassStats {
                mean,
                sd,
                source: PredictionSource::ManualZ,
                mean_origin: MeanOrigin::Manual,
                classifier: Classifier::ZScore,
            }
        }
        StatsSource::ManualAvgOnly { mean } => ClassStats {
            mean,
            sd: predict_class_sd(models, overall, mean, strength)?,
            source: PredictionSource::ManualAvgPlusMl,
            mean_origin: MeanOrigin::Manual,
            classifier: Classifier::Model,
        },
        StatsSource::ManualSdOnly { sd } => ClassStats {
            mean: predict_class_mean(models, &mark_set.marks, strength)?,
            sd,
            source: PredictionSource::ManualSdPlusMl,
            mean_origin: MeanOrigin::Model,
            classifier: Classifier::Model,
        },
        StatsSource::Auto => {
            let (mean, mean_origin) = if mark_set.averages.any_supplied() {
                (
                    analytic_class_mean(&mark_set.marks, &mark_set.averages),
                    MeanOrigin::ComponentAverages,
                )
            } else {
                (
                    predict_class_mean(models, &mark_set.marks, strength)?,
                    MeanOrigin::Model,
                )
            };
            ClassStats {
                mean,
                sd: predict_class_sd(models, overall, mean, strength)?,
                source: PredictionSource::Ml,
                mean_origin,
                classifier: Classifier::Model,
            }
        }
    };

    debug!(
        class_mean = stats.mean,
        class_sd = stats.sd,
        source = %stats.source,
        "Class statistics resolved"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::cell::Cell;

    /// Fixed predictions; counts every call.
    #[derive(Default)]
    struct Fixed {
        calls: Cell<usize>,
    }

    impl Predictor for Fixed {
        fn predict_class_mean(&self, _: &[f64]) -> Result<f64, ModelError> {
            self.calls.set(self.calls.get() + 1);
            Ok(62.0)
        }

        fn predict_class_sd(&self, _: &[f64]) -> Result<f64, ModelError> {
            self.calls.set(self.calls.get() + 1);
            Ok(11.0)
        }

        fn predict_grade_class(&self, _: &[f64]) -> Result<i64, ModelError> {
            self.calls.set(self.calls.get() + 1);
            Ok(3)
        }
    }

    fn mark_set(manual: ManualOverrides, averages: Components) -> MarkSet {
        let marks = Components {
            cat1: 40.0,
            cat2: 30.0,
            da1: 8.0,
            da2: 6.0,
            da3: 10.0,
            fat: 70.0,
        };
        MarkSet::new(marks, averages, manual, 60).unwrap()
    }

    fn manual(class_average: f64, class_sd: f64) -> ManualOverrides {
        ManualOverrides {
            class_average,
            class_sd,
        }
    }

    #[test]
    fn test_dispatch_order() {
        assert_eq!(
            StatsSource::from_overrides(&manual(70.0, 8.0)),
            StatsSource::Manual { mean: 70.0, sd: 8.0 }
        );
        assert_eq!(
            StatsSource::from_overrides(&manual(75.0, 0.0)),
            StatsSource::ManualAvgOnly { mean: 75.0 }
        );
        assert_eq!(
            StatsSource::from_overrides(&manual(0.0, 9.0)),
            StatsSource::ManualSdOnly { sd: 9.0 }
        );
        assert_eq!(StatsSource::from_overrides(&manual(0.0, 0.0)), StatsSource::Auto);
    }

    #[test]
    fn test_manual_skips_models() {
        let models = Fixed::default();
        let averages = Components {
            fat: 50.0,
            ..Default::default()
        };
        let set = mark_set(manual(70.0, 8.0), averages);
        let stats = resolve_class_stats(&set, set.overall(), &models).unwrap();
        assert_eq!(stats.source, PredictionSource::ManualZ);
        assert_eq!(stats.classifier, Classifier::ZScore);
        assert_eq!((stats.mean, stats.sd), (70.0, 8.0));
        assert_eq!(models.calls.get(), 0);
    }

    #[test]
    fn test_manual_avg_only() {
        let models = Fixed::default();
        let set = mark_set(manual(75.0, 0.0), Components::default());
        let stats = resolve_class_stats(&set, set.overall(), &models).unwrap();
        assert_eq!(stats.source, PredictionSource::ManualAvgPlusMl);
        assert_eq!((stats.mean, stats.sd), (75.0, 11.0));
        assert_eq!(models.calls.get(), 1);
    }

    #[test]
    fn test_manual_sd_only() {
        let models = Fixed::default();
        let set = mark_set(manual(0.0, 9.0), Components::default());
        let stats = resolve_class_stats(&set, set.overall(), &models).unwrap();
        assert_eq!(stats.source, PredictionSource::ManualSdPlusMl);
        assert_eq!((stats.mean, stats.sd), (62.0, 9.0));
        assert_eq!(stats.mean_origin, MeanOrigin::Model);
    }

    #[test]
    fn test_auto_with_component_averages() {
        let models = Fixed::default();
        let averages = Components {
            da1: 7.0,
            da3: 9.0,
            fat: 60.0,
            ..Default::default()
        };
        let set = mark_set(manual(0.0, 0.0), averages);
        let stats = resolve_class_stats(&set, set.overall(), &models).unwrap();

        // da = 8, cat falls back to own marks (35), fat = 60
        let expected = weighted_score(35.0, 35.0, 8.0, 8.0, 8.0, 60.0);
        assert_eq!(stats.source, PredictionSource::Ml);
        assert_eq!(stats.mean_origin, MeanOrigin::ComponentAverages);
        assert!((stats.mean - expected).abs() < 1e-9);
        assert_eq!(stats.sd, 11.0);
        // only the SD model ran
        assert_eq!(models.calls.get(), 1);
    }

    #[test]
    fn test_auto_without_averages_uses_models() {
        let models = Fixed::default();
        let set = mark_set(manual(0.0, 0.0), Components::default());
        let stats = resolve_class_stats(&set, set.overall(), &models).unwrap();
        assert_eq!(stats.mean_origin, MeanOrigin::Model);
        assert_eq!((stats.mean, stats.sd), (62.0, 11.0));
        assert_eq!(models.calls.get(), 2);
    }

    #[test]
    fn test_analytic_mean_all_own_marks() {
        let marks = Components {
            cat1: 40.0,
            cat2: 0.0,
            da1: 0.0,
            da2: 0.0,
            da3: 0.0,
            fat: 50.0,
        };
        let averages = Components {
            fat: 55.0,
            ..Default::default()
        };
        // cat falls back to the positive own CAT only; no DA at all
        let expected = weighted_score(40.0, 40.0, 0.0, 0.0, 0.0, 55.0);
        assert!((analytic_class_mean(&marks, &averages) - expected).abs() < 1e-9);
    }
}
