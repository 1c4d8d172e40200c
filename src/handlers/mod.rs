pub mod analyze;
pub mod classifier;
pub mod nutrients;

pub use analyze::{AnalysisError, AnalysisHandler};
