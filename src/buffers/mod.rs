//! # Buffer Family
//!
//! Passive queueing components that are both [`crate::Consumer`] and
//! [`crate::Producer`]: droplets go in through `consume_droplet` and come
//! back out through `drip`, with the eviction policy varying per type.
//!
//! - [`FlowBuffer`]: bounded FIFO that signals fullness and refuses overflow.
//! - [`CyclicFlowBuffer`]: bounded FIFO that always accepts, evicting the
//!   oldest droplet to make room.
//! - [`MinDropletBuffer`] / [`MaxDropletBuffer`]: hold only the extremum
//!   seen so far.
//! - [`FlowSensor`]: latches a value when its window matches a pattern.

mod cyclic;
mod extremum;
mod flow_buffer;
mod sensor;

pub use cyclic::CyclicFlowBuffer;
pub use extremum::{MaxDropletBuffer, MinDropletBuffer};
pub use flow_buffer::FlowBuffer;
pub use sensor::FlowSensor;
