use crate::grade::Grade;

/// Span of z beyond the S threshold that maps to full progress.
const S_PROGRESS_SPAN: f64 = 2.0;

/// Lower z bound of each letter.
fn lower_z_bound(grade: Grade) -> f64 {
    match grade {
        Grade::S => 2.25,
        Grade::A => 1.25,
        Grade::B => 0.25,
        Grade::C => -0.75,
        Grade::D => -1.75,
        Grade::E => -2.75,
        Grade::F => -999.0,
    }
}

/// Progress in `[0, 1]` from the current letter's lower z bound toward the
/// next letter's. For S it measures how far past the S bound the score is.
/// Always 1.0 when the class has no spread.
pub fn progress_to_next(grade: Grade, overall: f64, class_mean: f64, class_sd: f64) -> f64 {
    if class_sd == 0.0 {
        return 1.0;
    }

    let z = (overall - class_mean) / class_sd;
    let lower = lower_z_bound(grade);

    match grade.next_higher() {
        None => ((z - lower) / S_PROGRESS_SPAN).clamp(0.0, 1.0),
        Some(next) => {
            let span = lower_z_bound(next) - lower;
            if span == 0.0 {
                return 0.0;
            }
            ((z - lower) / span).clamp(0.0, 1.0)
        }
    }
}

/// [`progress_to_next`] for a free-form letter; unknown letters give 0.0
/// unless the class has no spread.
pub fn progress_for_label(label: &str, overall: f64, class_mean: f64, class_sd: f64) -> f64 {
    if class_sd == 0.0 {
        return 1.0;
    }

    match label.parse::<Grade>() {
        Ok(grade) => progress_to_next(grade, overall, class_mean, class_sd),
        Err(_) => 0.0,
    }
}
