//! Fan-in junction collecting one item per member into a vector droplet.

use super::{FlowStarter, JunctionFlows};
use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Pulls one item from every member per drip and emits them as one
/// `Vec<T>` droplet, in member registration order.
///
/// Same exhaustion rules as [`super::ReducingFlowOutputJunction`]: a dry
/// leading member interrupts, dry trailing members just leave a shorter
/// vector for that round.
pub struct MergingFlowOutputJunction<T> {
  state: FlowState,
  flows: JunctionFlows<T>,
}

impl<T> MergingFlowOutputJunction<T> {
  /// Creates a junction over `members`.
  pub fn new(members: Vec<FlowStarter<T>>) -> Self {
    Self {
      state: FlowState::new(),
      flows: JunctionFlows::new(members),
    }
  }
}

#[async_trait]
impl<T> Producer for MergingFlowOutputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = Vec<T>;

  async fn drip(&mut self) -> FlowResult<Vec<T>> {
    if self.flows.is_empty() {
      return Err(self.interrupt(FlowError::exhausted::<Self>("junction has no members")));
    }
    let mut merged = Vec::with_capacity(self.flows.len());
    for index in 0..self.flows.len() {
      match self.flows.next_from(index).await {
        Some(Ok(droplet)) => merged.push(droplet),
        Some(Err(error)) => return Err(self.interrupt(error)),
        None if index == 0 => {
          return Err(self.interrupt(FlowError::exhausted::<Self>("leading member ran dry")));
        }
        None => {}
      }
    }
    Ok(merged)
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
