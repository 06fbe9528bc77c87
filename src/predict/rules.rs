use tracing::debug;

use crate::grade::Grade;

pub const PASS_OVERALL: f64 = 50.0;
pub const PASS_FAT: f64 = 40.0;
pub const S_GRADE_MIN_OVERALL: f64 = 80.0;

/// Applies the mandatory overrides to a theory-course prediction, in order:
///
/// 1. `overall < 50` gives F.
/// 2. `fat < 40` gives F.
/// 3. S with `overall < 80` is demoted to A.
pub fn apply_hard_rules(overall: f64, fat: f64, predicted: Grade) -> Grade {
    let final_grade = if overall < PASS_OVERALL {
        Grade::F
    } else if fat < PASS_FAT {
        Grade::F
    } else if predicted == Grade::S && overall < S_GRADE_MIN_OVERALL {
        Grade::A
    } else {
        predicted
    };

    if final_grade != predicted {
        debug!(overall, fat, %predicted, %final_grade, "Hard rule overrode prediction");
    }
    final_grade
}
