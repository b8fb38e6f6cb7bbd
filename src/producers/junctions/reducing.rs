//! Fan-in junction folding one item per member into a single droplet.

use super::{FlowStarter, JunctionFlows};
use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Pulls one item from every member per drip and left-folds them into one
/// droplet.
///
/// Members are visited in registration order. The first member running dry
/// is a non-fatal exhaustion interrupt; a later member running dry is merely
/// skipped for that round, so optional side branches (a filter's sink, for
/// example) contribute only on the rounds where they hold something.
pub struct ReducingFlowOutputJunction<T> {
  state: FlowState,
  flows: JunctionFlows<T>,
  reduce: Box<dyn FnMut(T, T) -> T + Send>,
}

impl<T> ReducingFlowOutputJunction<T> {
  /// Creates a junction folding with `reduce` over `members`.
  pub fn new(
    reduce: impl FnMut(T, T) -> T + Send + 'static,
    members: Vec<FlowStarter<T>>,
  ) -> Self {
    Self {
      state: FlowState::new(),
      flows: JunctionFlows::new(members),
      reduce: Box::new(reduce),
    }
  }
}

#[async_trait]
impl<T> Producer for ReducingFlowOutputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    let mut folded: Option<T> = None;
    for index in 0..self.flows.len() {
      match self.flows.next_from(index).await {
        Some(Ok(droplet)) => {
          folded = Some(match folded {
            Some(accumulated) => (self.reduce)(accumulated, droplet),
            None => droplet,
          });
        }
        Some(Err(error)) => return Err(self.interrupt(error)),
        None if index == 0 => {
          return Err(self.interrupt(FlowError::exhausted::<Self>("leading member ran dry")));
        }
        None => {}
      }
    }
    match folded {
      Some(droplet) => Ok(droplet),
      None => Err(self.interrupt(FlowError::exhausted::<Self>("junction has no members"))),
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
