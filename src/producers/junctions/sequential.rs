//! Fan-in junction draining one member at a time.

use super::{FlowStarter, JunctionFlows};
use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Drips from the current member until its flow is exhausted, then advances
/// to the next, wrapping around.
///
/// When a full pass over the members produces nothing, the junction raises a
/// non-fatal exhaustion interrupt and its own flow ends.
pub struct SequentialFlowOutputJunction<T> {
  state: FlowState,
  flows: JunctionFlows<T>,
  current: usize,
}

impl<T> SequentialFlowOutputJunction<T> {
  /// Creates a junction over `members`, starting from the first.
  pub fn new(members: Vec<FlowStarter<T>>) -> Self {
    Self {
      state: FlowState::new(),
      flows: JunctionFlows::new(members),
      current: 0,
    }
  }
}

#[async_trait]
impl<T> Producer for SequentialFlowOutputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    let members = self.flows.len();
    let mut dry = 0;
    while dry < members {
      match self.flows.next_from(self.current).await {
        Some(Ok(droplet)) => return Ok(droplet),
        Some(Err(error)) => return Err(self.interrupt(error)),
        None => {
          self.current = (self.current + 1) % members;
          dry += 1;
        }
      }
    }
    Err(self.interrupt(FlowError::exhausted::<Self>(
      "every member flow is exhausted",
    )))
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
  use crate::buffers::FlowBuffer;
  use crate::consumer::Consumer;
  use crate::flow::{FlowOptions, collect};
  use crate::producers::junctions::shared_flow;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  async fn filled(droplets: &[i32]) -> Arc<Mutex<FlowBuffer<i32>>> {
    let buffer = Arc::new(Mutex::new(FlowBuffer::new(0)));
    for droplet in droplets {
      buffer.lock().await.consume_droplet(*droplet).await.unwrap();
    }
    buffer
  }

  #[tokio::test]
  async fn drains_members_in_order() {
    let first = filled(&[1, 2]).await;
    let second = filled(&[3]).await;
    let mut junction =
      SequentialFlowOutputJunction::new(vec![shared_flow(first), shared_flow(second)]);
    let collected = collect(junction.flow(FlowOptions::default()), 0).await.unwrap();
    assert_eq!(collected, vec![1, 2, 3]);
    assert!(matches!(
      junction.last_error(),
      Some(FlowError::Exhausted { .. })
    ));
  }

  #[tokio::test]
  async fn wraps_back_to_refilled_members() {
    let first = filled(&[1]).await;
    let second = filled(&[2]).await;
    let mut junction = SequentialFlowOutputJunction::new(vec![
      shared_flow(first.clone()),
      shared_flow(second),
    ]);
    assert_eq!(junction.drip().await.unwrap(), 1);
    // Member one reports dry and the junction moves on to member two.
    assert_eq!(junction.drip().await.unwrap(), 2);
    first.lock().await.consume_droplet(9).await.unwrap();
    // The wrap recreates member one's flow over the refilled buffer.
    assert_eq!(junction.drip().await.unwrap(), 9);
  }
}
