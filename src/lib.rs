//! # dripflow
//!
//! A pull-based dataflow composition toolkit: wire arbitrary graphs of
//! bounded producers, consumers, and windowed transforms with an explicit
//! backpressure protocol and no central scheduler.
//!
//! ## Concepts
//!
//! - A **droplet** is one unit of payload moving through a pipeline.
//! - A [`Producer`] hands out droplets one `drip` at a time, or as a lazy
//!   [`Flow`]. Producers can be staunched (paused) and restarted without
//!   losing state, and signal faults through an interrupt protocol instead
//!   of fabricating values.
//! - A [`Consumer`] accepts droplets and answers with a capacity signal:
//!   `false` means "accepted, but now full", which is how backpressure
//!   travels upstream.
//! - A [`Machine`] is both: a windowed transform between an input and an
//!   output buffer, scheduled by `pipe_flow` so n-in, m-out stages ride on
//!   ordinary streams.
//! - **Junctions** fan flows out to several consumers or fan several
//!   producers in, each topology with its own routing and exhaustion rules.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dripflow::{FlowOptions, Machine, PipeExt};
//! use dripflow::machines::FlowTransformer;
//! use dripflow::producers::FlowSequence;
//!
//! let mut source = FlowSequence::new(vec![1, 2, 3, 4, 5]);
//! let mut sums = FlowTransformer::new(3, |window: &[i32]| vec![window.iter().sum::<i32>()]);
//! let flow = sums.pipe_flow(
//!   source.flow(FlowOptions::default().with_max_droplets(6)),
//!   FlowOptions::default(),
//! );
//! ```

#![deny(missing_docs)]

pub mod buffers;
pub mod consumer;
pub mod consumers;
pub mod error;
pub mod flow;
pub mod machine;
pub mod machines;
pub mod piping;
pub mod producer;
pub mod producers;

pub use consumer::{Consumer, SharedConsumer};
pub use error::{FlowError, FlowResult};
pub use flow::{BoxFlow, Flow, FlowOptions};
pub use machine::Machine;
pub use piping::PipeExt;
pub use producer::{FlowState, Producer};
