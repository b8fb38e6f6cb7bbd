//! # Consumer Implementations
//!
//! Terminal sinks and the input junctions that fan one incoming flow out to
//! several member consumers.

pub mod junctions;

mod black_hole;

pub use black_hole::FlowBlackHole;
