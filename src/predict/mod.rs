//! Grade prediction from raw assessment marks.
//!
//! Theory courses go through the weighted overall score, class statistics
//! (manual, component averages or models), a provisional grade (z-score
//! bands or the grade model) and the hard-rule override. Lab courses use a
//! fixed scale.

pub mod classify;
pub mod engine;
pub mod linear;
pub mod marks;
pub mod models;
pub mod progress;
pub mod resolver;
pub mod rules;
pub mod types;
pub mod utility;

pub use engine::{predict_lab, predict_theory};
pub use types::{CourseKind, PredictionResult, PredictionSource};
