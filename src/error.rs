//! Error taxonomy shared by the GPA, CGPA and prediction flows.
//!
//! Every variant is user-correctable. Range checks happen where input is
//! accepted (the `new` constructors); the aggregation and classification
//! functions assume validated input and only handle empty/zero cases.

/// Errors surfaced by the engine to its caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    InvalidRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("total credits ({total:.1}) exceed the limit of {limit:.1}")]
    CreditLimitExceeded { total: f64, limit: f64 },

    #[error("enter at least one semester's GPA and credits first")]
    NoGradedHistory,

    #[error("credits for the target semesters must be positive")]
    NoCreditsToAdd,

    #[error("no remaining semesters or credits to set a goal")]
    NoRemainingCapacity,

    #[error("{model} model unavailable: {reason}")]
    ModelUnavailable { model: &'static str, reason: String },

    #[error("grade model returned unknown class id {0}")]
    UnknownGradeClass(i64),

    #[error("unknown grade '{0}'")]
    UnknownGrade(String),

    #[error("course '{0}' not found in catalog")]
    UnknownCourse(String),

    #[error("course '{0}' is selected more than once")]
    DuplicateCourse(String),
}

/// Failure of a single prediction call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The model does not accept a feature vector of this width.
    #[error("{model} model rejected {got} features (accepts {expected:?})")]
    Rejected {
        model: &'static str,
        expected: Vec<usize>,
        got: usize,
    },

    #[error("{model} model failed: {reason}")]
    Failed { model: &'static str, reason: String },
}

/// Checks that `value` lies in `[min, max]`.
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, EngineError> {
    if value.is_nan() || value < min || value > max {
        return Err(EngineError::InvalidRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_inclusive() {
        assert_eq!(check_range("gpa", 0.0, 0.0, 10.0), Ok(0.0));
        assert_eq!(check_range("gpa", 10.0, 0.0, 10.0), Ok(10.0));
    }

    #[test]
    fn test_check_range_rejects_outside_and_nan() {
        assert!(matches!(
            check_range("gpa", 10.01, 0.0, 10.0),
            Err(EngineError::InvalidRange { field: "gpa", .. })
        ));
        assert!(check_range("gpa", -0.5, 0.0, 10.0).is_err());
        assert!(check_range("gpa", f64::NAN, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::CreditLimitExceeded {
            total: 152.0,
            limit: 151.0,
        };
        assert_eq!(err.to_string(), "total credits (152.0) exceed the limit of 151.0");
    }
}
