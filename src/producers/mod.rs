//! # Producer Implementations
//!
//! Droplet sources: fixed and random sequences, constants and variables, and
//! the output junctions that fan several upstream flows into one producer.

pub mod junctions;
mod random;
mod sequence;
mod variable;

pub use random::RandomFlowSequence;
pub use sequence::FlowSequence;
pub use variable::{FlowConstant, FlowVariable, LazyFlowVariable};
