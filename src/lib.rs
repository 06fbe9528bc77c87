pub mod catalog;
pub mod cgpa;
pub mod config;
pub mod error;
pub mod gpa;
pub mod grade;
pub mod output;
pub mod predict;

pub use error::{EngineError, ModelError};
pub use grade::Grade;
