pub mod optimize;
pub mod validate;

pub use optimize::{optimize, OptimizeOutcome, OptimizerParams};
pub use validate::{repair_question, repair_side};
