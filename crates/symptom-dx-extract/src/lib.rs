//! Free-text symptom extraction.
//!
//! Maps a patient's description ("my head hurts and I have a high fever")
//! onto the symptom vocabulary the classifier understands. Provides prompt
//! builders and output parsing for an LLM-backed extractor, plus an offline
//! keyword extractor.

pub mod extraction;
pub mod prompts;
pub mod vocabulary;

pub use extraction::*;
pub use prompts::*;
pub use vocabulary::*;
