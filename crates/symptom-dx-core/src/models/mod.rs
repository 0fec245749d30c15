//! Domain models for the symptom-dx system.

mod diagnosis;
mod symptoms;

pub use diagnosis::*;
pub use symptoms::*;
