//! Fan-in junction taking a fixed chunk from each member in turn.

use super::{FlowStarter, JunctionFlows};
use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Round-robins over its members, taking `chunk_size` drips from each
/// before advancing to the next.
///
/// A member running dry mid-chunk is a non-fatal exhaustion interrupt: the
/// junction's flow ends and `last_error` records which round stalled.
pub struct SplittingFlowOutputJunction<T> {
  state: FlowState,
  flows: JunctionFlows<T>,
  chunk_size: usize,
  current: usize,
  dripped: usize,
}

impl<T> SplittingFlowOutputJunction<T> {
  /// Creates a junction taking `chunk_size` drips per member (clamped to at
  /// least one).
  pub fn new(chunk_size: usize, members: Vec<FlowStarter<T>>) -> Self {
    Self {
      state: FlowState::new(),
      flows: JunctionFlows::new(members),
      chunk_size: chunk_size.max(1),
      current: 0,
      dripped: 0,
    }
  }
}

#[async_trait]
impl<T> Producer for SplittingFlowOutputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    if self.flows.is_empty() {
      return Err(self.interrupt(FlowError::exhausted::<Self>("junction has no members")));
    }
    match self.flows.next_from(self.current).await {
      Some(Ok(droplet)) => {
        self.dripped += 1;
        if self.dripped >= self.chunk_size {
          self.dripped = 0;
          self.current = (self.current + 1) % self.flows.len();
        }
        Ok(droplet)
      }
      Some(Err(error)) => Err(self.interrupt(error)),
      None => Err(self.interrupt(FlowError::exhausted::<Self>(format!(
        "member {} ran dry mid-chunk",
        self.current
      )))),
    }
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }

  fn is_flow_started(&self) -> bool {
    self.flow_state().is_open() && !self.flows.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flow::{FlowOptions, collect};
  use crate::producers::FlowSequence;
  use crate::producers::junctions::shared_flow;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  #[tokio::test]
  async fn alternates_in_chunks() {
    let odds = Arc::new(Mutex::new(FlowSequence::new(vec![1, 3])));
    let evens = Arc::new(Mutex::new(FlowSequence::new(vec![2, 4])));
    let mut junction =
      SplittingFlowOutputJunction::new(2, vec![shared_flow(odds), shared_flow(evens)]);
    let collected = collect(junction.flow(FlowOptions::default().with_max_droplets(8)), 0)
      .await
      .unwrap();
    assert_eq!(collected, vec![1, 3, 2, 4, 1, 3, 2, 4]);
  }

  #[tokio::test]
  async fn a_dry_member_interrupts_the_flow() {
    let endless = Arc::new(Mutex::new(FlowSequence::new(vec![1])));
    let empty: Arc<Mutex<FlowSequence<i32>>> = Arc::new(Mutex::new(FlowSequence::new(Vec::new())));
    let mut junction =
      SplittingFlowOutputJunction::new(1, vec![shared_flow(endless), shared_flow(empty)]);
    let collected = collect(junction.flow(FlowOptions::default()), 0).await.unwrap();
    assert_eq!(collected, vec![1]);
    assert!(matches!(
      junction.last_error(),
      Some(FlowError::Exhausted { .. })
    ));
  }
}
