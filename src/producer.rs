//! # Producer Contract
//!
//! This module defines the [`Producer`] trait for components that source
//! droplets in a dripflow pipeline, together with [`FlowState`], the open/
//! closed flag every producer embeds.
//!
//! ## Overview
//!
//! A producer is always constructed open. It exposes:
//!
//! - **`drip`**: pull exactly one droplet, suspending as needed. This is the
//!   only place a pipeline blocks, which makes the whole graph pull-driven.
//! - **`flow`**: pull repeatedly into a lazy stream, terminated by a stop
//!   predicate, a droplet cap, or the producer closing.
//! - **`start_flow` / `staunch_flow`**: idempotent open/close of the flag.
//!   Closing is transient: a staunched producer keeps its state and resumes
//!   where it left off once restarted.
//! - **`interrupt_flow`**: the fault entry point. Fatal reasons re-raise
//!   unconditionally; non-fatal reasons are recorded as `last_error` and
//!   suppressed, optionally followed by an automatic restart.
//!
//! ## Implementing
//!
//! Implementations provide `drip` plus the two `flow_state` accessors (the
//! same required-accessor pattern the configuration plumbing of most stream
//! frameworks uses); everything else is provided. A producer must never
//! return a default value silently on exhaustion; it signals through the
//! interrupt protocol instead:
//!
//! ```rust,ignore
//! async fn drip(&mut self) -> FlowResult<u8> {
//!   match self.source.next() {
//!     Some(droplet) => Ok(droplet),
//!     None => Err(self.interrupt(FlowError::exhausted::<Self>("source ran dry"))),
//!   }
//! }
//! ```

use crate::error::{FlowError, FlowResult};
use crate::flow::{Flow, FlowOptions};
use async_stream::stream;
use async_trait::async_trait;

/// The open/closed flag and last recorded fault of a producer.
///
/// Every producer owns exactly one `FlowState` and hands it out through the
/// [`Producer::flow_state`] accessors. The state starts open.
#[derive(Debug)]
pub struct FlowState {
  open: bool,
  last_error: Option<FlowError>,
}

impl Default for FlowState {
  fn default() -> Self {
    Self::new()
  }
}

impl FlowState {
  /// Creates a fresh, open state with no recorded fault.
  pub fn new() -> Self {
    Self {
      open: true,
      last_error: None,
    }
  }

  /// Returns `true` while the flow is open.
  pub fn is_open(&self) -> bool {
    self.open
  }

  /// Opens the flow.
  pub fn open(&mut self) {
    self.open = true;
  }

  /// Closes the flow without discarding producer state.
  pub fn close(&mut self) {
    self.open = false;
  }

  /// Records an interruption as the most recent fault.
  pub fn record(&mut self, error: FlowError) {
    self.last_error = Some(error);
  }

  /// Returns the most recently recorded fault, if any.
  pub fn last_error(&self) -> Option<&FlowError> {
    self.last_error.as_ref()
  }
}

/// Trait for components that produce droplets on demand.
///
/// Producers are the sources of a pipeline graph: sequences, variables,
/// buffers draining their queue, machines draining their output window, and
/// output junctions fanning in their members all implement this trait.
#[async_trait]
pub trait Producer: Send
where
  Self::Output: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  /// The droplet type this producer emits.
  type Output;

  /// Pulls a single droplet from the flow.
  ///
  /// May suspend until a droplet is available. On exhaustion or failure the
  /// implementation must go through [`Producer::interrupt`] (or
  /// [`Producer::interrupt_flow`]) rather than fabricating a value.
  async fn drip(&mut self) -> FlowResult<Self::Output>;

  /// Returns the producer's embedded [`FlowState`].
  fn flow_state(&self) -> &FlowState;

  /// Returns the producer's embedded [`FlowState`], mutably.
  fn flow_state_mut(&mut self) -> &mut FlowState;

  /// Checks whether this producer can currently produce flow.
  ///
  /// The default reads the open flag; components with extra structural
  /// requirements (a buffer with contents, a junction with members) tighten
  /// it.
  fn is_flow_started(&self) -> bool {
    self.flow_state().is_open()
  }

  /// Opens the flow. Idempotent.
  ///
  /// Returns `true` if the flow could be opened or was already open.
  fn start_flow(&mut self) -> bool {
    self.flow_state_mut().open();
    true
  }

  /// Closes the flow without destroying producer state. Idempotent.
  ///
  /// Returns `true` if the flow could be closed or was already closed.
  fn staunch_flow(&mut self) -> bool {
    self.flow_state_mut().close();
    true
  }

  /// Returns the most recently recorded interruption, if any.
  fn last_error(&self) -> Option<&FlowError> {
    self.flow_state().last_error()
  }

  /// Staunches the flow, records `reason`, and hands the fault back.
  ///
  /// This is the one-expression form `drip` implementations use:
  /// `Err(self.interrupt(reason))`.
  fn interrupt(&mut self, reason: FlowError) -> FlowError {
    tracing::debug!(error = %reason, fatal = reason.is_fatal(), "flow interrupted");
    self.staunch_flow();
    self.flow_state_mut().record(reason.clone());
    reason
  }

  /// Breaks off the current flow.
  ///
  /// Staunches the producer and records `reason`. A fatal reason is always
  /// re-raised to the caller; a non-fatal reason is suppressed, and when
  /// `restart` is `true` the flow is immediately re-opened so the pipeline
  /// can self-heal. Returns whether the flow is open again.
  fn interrupt_flow(&mut self, reason: FlowError, restart: bool) -> FlowResult<bool> {
    let reason = self.interrupt(reason);
    if reason.is_fatal() {
      return Err(reason);
    }
    if restart {
      return Ok(self.start_flow());
    }
    Ok(false)
  }

  /// Continuously pulls droplets until a stop condition is met.
  ///
  /// Yields each dripped droplet while the producer is open; terminates when
  /// the droplet cap is reached, the stop predicate matches (that droplet is
  /// still yielded), or the producer becomes closed. A fatal drip fault is
  /// yielded as the final `Err` item; a non-fatal interruption ends the flow
  /// silently, leaving the fault in `last_error`.
  fn flow(&mut self, options: FlowOptions<Self::Output>) -> Flow<'_, Self::Output>
  where
    Self: Sized,
  {
    Box::pin(stream! {
      let FlowOptions { mut stop, max_droplets } = options;
      let mut remaining = max_droplets;
      while self.is_flow_started() {
        let droplet = match self.drip().await {
          Ok(droplet) => droplet,
          Err(error) => {
            if error.is_fatal() {
              yield Err(error);
            }
            break;
          }
        };
        // The drip may have staunched the flow mid-pull; don't yield then.
        if !self.flow_state().is_open() {
          break;
        }
        let stop_hit = stop.as_mut().is_some_and(|stop| stop(&droplet));
        yield Ok(droplet);
        if stop_hit {
          break;
        }
        if remaining > 0 {
          remaining -= 1;
          if remaining == 0 {
            break;
          }
        }
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flow::collect;

  /// Counts upward forever; used to probe the provided flow machinery.
  struct Counter {
    state: FlowState,
    next: i64,
  }

  impl Counter {
    fn new() -> Self {
      Self {
        state: FlowState::new(),
        next: 0,
      }
    }
  }

  #[async_trait]
  impl Producer for Counter {
    type Output = i64;

    async fn drip(&mut self) -> FlowResult<i64> {
      let droplet = self.next;
      self.next += 1;
      Ok(droplet)
    }

    fn flow_state(&self) -> &FlowState {
      &self.state
    }

    fn flow_state_mut(&mut self) -> &mut FlowState {
      &mut self.state
    }
  }

  #[tokio::test]
  async fn flow_respects_the_droplet_cap() {
    let mut counter = Counter::new();
    let collected = collect(counter.flow(FlowOptions::default().with_max_droplets(4)), 0)
      .await
      .unwrap();
    assert_eq!(collected, vec![0, 1, 2, 3]);
  }

  #[tokio::test]
  async fn flow_yields_the_stopping_droplet_then_ends() {
    let mut counter = Counter::new();
    let collected = collect(
      counter.flow(FlowOptions::default().with_stop(|droplet| *droplet == 2)),
      0,
    )
    .await
    .unwrap();
    assert_eq!(collected, vec![0, 1, 2]);
  }

  #[tokio::test]
  async fn flows_resume_from_current_state() {
    let mut counter = Counter::new();
    let first = collect(counter.flow(FlowOptions::default().with_max_droplets(2)), 0)
      .await
      .unwrap();
    let second = collect(counter.flow(FlowOptions::default().with_max_droplets(2)), 0)
      .await
      .unwrap();
    assert_eq!(first, vec![0, 1]);
    assert_eq!(second, vec![2, 3]);
  }

  #[tokio::test]
  async fn staunched_producers_yield_nothing_until_restarted() {
    let mut counter = Counter::new();
    counter.staunch_flow();
    assert!(
      collect(counter.flow(FlowOptions::default()), 0)
        .await
        .unwrap()
        .is_empty()
    );
    counter.start_flow();
    let collected = collect(counter.flow(FlowOptions::default().with_max_droplets(1)), 0)
      .await
      .unwrap();
    assert_eq!(collected, vec![0]);
  }

  #[tokio::test]
  async fn fatal_interruptions_unwind() {
    let mut counter = Counter::new();
    let result = counter.interrupt_flow(FlowError::structural::<Counter>("bad wiring"), true);
    assert!(result.is_err());
    assert!(!counter.is_flow_started());
  }

  #[tokio::test]
  async fn nonfatal_interruptions_are_recorded_and_can_restart() {
    let mut counter = Counter::new();
    let restarted = counter
      .interrupt_flow(FlowError::exhausted::<Counter>("dry"), true)
      .unwrap();
    assert!(restarted);
    assert!(counter.is_flow_started());
    assert!(matches!(
      counter.last_error(),
      Some(FlowError::Exhausted { .. })
    ));
  }
}
