//! # Input Junctions
//!
//! Fan-out consumers: one incoming flow distributed to several member
//! consumers, with a topology-specific routing rule and definition of
//! "full". Members are [`SharedConsumer`] handles, so callers keep their own
//! handle to each member and can inspect it after the junction has run.
//!
//! Delivery to members is sequential and order-dependent: each member is
//! awaited before the next is offered anything.

mod broadcast;
mod sequential;
mod splitting;

pub use broadcast::FlowInputJunction;
pub use sequential::SequentialFlowInputJunction;
pub use splitting::SplittingFlowInputJunction;
