//! # Output Junctions
//!
//! Fan-in producers: each junction owns N member flows and merges them into
//! one logical producer, with a topology-specific pull order and definition
//! of exhaustion.
//!
//! Members are stored as flow *factories* ([`FlowStarter`]), not flows: when
//! a member's live flow runs dry it is marked done and transparently
//! recreated from its factory on the next access. A factory over a stateful
//! shared producer (see [`shared_flow`]) therefore resumes from wherever the
//! producer currently stands, which is what lets a junction member drain a
//! buffer that other parts of the graph keep refilling.

mod merging;
mod reducing;
mod sequential;
mod splitting;

pub use merging::MergingFlowOutputJunction;
pub use reducing::ReducingFlowOutputJunction;
pub use sequential::SequentialFlowOutputJunction;
pub use splitting::SplittingFlowOutputJunction;

use crate::error::FlowResult;
use crate::flow::{BoxFlow, FlowOptions};
use crate::machine::Machine;
use crate::producer::Producer;
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A factory producing a fresh member flow on each call.
pub type FlowStarter<T> = Box<dyn Fn() -> BoxFlow<T> + Send + Sync>;

struct OpenFlow<T> {
  flow: BoxFlow<T>,
  done: bool,
}

/// The member table shared by every output junction: one factory and one
/// live flow per member.
pub struct JunctionFlows<T> {
  starters: Vec<FlowStarter<T>>,
  open: Vec<OpenFlow<T>>,
}

impl<T> JunctionFlows<T> {
  /// Builds the table, starting one live flow per factory.
  pub fn new(starters: Vec<FlowStarter<T>>) -> Self {
    let open = starters
      .iter()
      .map(|starter| OpenFlow {
        flow: starter(),
        done: false,
      })
      .collect();
    Self { starters, open }
  }

  /// Number of members.
  pub fn len(&self) -> usize {
    self.starters.len()
  }

  /// Whether the junction has no members at all.
  pub fn is_empty(&self) -> bool {
    self.starters.is_empty()
  }

  /// Pulls the next item from member `index`.
  ///
  /// A member marked done is recreated from its factory first. Returns
  /// `None` when the member is dry right now (and marks it done, so the next
  /// access tries a fresh flow).
  pub async fn next_from(&mut self, index: usize) -> Option<FlowResult<T>> {
    let member = &mut self.open[index];
    if member.done {
      tracing::trace!(member = index, "recreating exhausted member flow");
      member.flow = (self.starters[index])();
      member.done = false;
    }
    match member.flow.next().await {
      Some(item) => Some(item),
      None => {
        member.done = true;
        None
      }
    }
  }
}

/// Wraps a shared producer into a member factory.
///
/// The produced flows lock the producer once per drip, so sibling branches
/// holding the same producer interleave instead of starving each other. A
/// fatal drip fault is yielded; a non-fatal one ends the flow silently.
pub fn shared_flow<P>(producer: Arc<Mutex<P>>) -> FlowStarter<P::Output>
where
  P: Producer + 'static,
{
  Box::new(move || {
    let producer = producer.clone();
    Box::pin(stream! {
      loop {
        let mut guard = producer.lock().await;
        if !guard.is_flow_started() {
          break;
        }
        match guard.drip().await {
          Ok(droplet) => {
            drop(guard);
            yield Ok(droplet);
          }
          Err(error) => {
            drop(guard);
            if error.is_fatal() {
              yield Err(error);
            }
            break;
          }
        }
      }
    })
  })
}

/// Wraps a shared machine plus an upstream factory into a member factory.
///
/// Each produced flow runs the machine's `pipe_flow` over a fresh upstream
/// flow. The machine stays locked for the lifetime of that flow, so exactly
/// one junction member drives a given machine at a time.
pub fn shared_pipe<M>(machine: Arc<Mutex<M>>, upstream: FlowStarter<M::Input>) -> FlowStarter<M::Output>
where
  M: Machine + 'static,
{
  let upstream = Arc::new(upstream);
  Box::new(move || {
    let machine = machine.clone();
    let upstream = upstream.clone();
    Box::pin(stream! {
      let mut guard = machine.lock().await;
      let mut piped = guard.pipe_flow((upstream.as_ref())(), FlowOptions::default());
      while let Some(item) = piped.next().await {
        yield item;
      }
    })
  })
}
