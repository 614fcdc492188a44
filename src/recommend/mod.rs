//! Recommendation synthesis: merges PO validation and business rule results
//! into one final decision.

mod engine;
mod reasoning;
mod types;

pub use engine::*;
pub use reasoning::ReasoningGenerator;
pub use types::*;
