//! Repeating fixed-sequence producer.

use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Produces the droplets of a fixed sequence, cycling forever.
///
/// The cursor survives staunching, so a restarted flow resumes mid-cycle
/// rather than from the first droplet. An empty sequence cannot flow.
#[derive(Debug)]
pub struct FlowSequence<T> {
  state: FlowState,
  items: Vec<T>,
  cursor: usize,
}

impl<T> FlowSequence<T> {
  /// Creates a producer cycling over `items`.
  pub fn new(items: Vec<T>) -> Self {
    Self {
      state: FlowState::new(),
      items,
      cursor: 0,
    }
  }
}

#[async_trait]
impl<T> Producer for FlowSequence<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    if self.items.is_empty() {
      return Err(self.interrupt(FlowError::exhausted::<Self>("sequence has no droplets")));
    }
    let droplet = self.items[self.cursor].clone();
    self.cursor = (self.cursor + 1) % self.items.len();
    Ok(droplet)
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }

  fn is_flow_started(&self) -> bool {
    self.flow_state().is_open() && !self.items.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flow::{FlowOptions, collect};

  #[tokio::test]
  async fn cycles_past_the_end() {
    let mut sequence = FlowSequence::new(vec![1, 2, 3]);
    let collected = collect(sequence.flow(FlowOptions::default().with_max_droplets(7)), 0)
      .await
      .unwrap();
    assert_eq!(collected, vec![1, 2, 3, 1, 2, 3, 1]);
  }

  #[tokio::test]
  async fn an_empty_sequence_never_flows() {
    let mut sequence: FlowSequence<u8> = FlowSequence::new(Vec::new());
    assert!(!sequence.is_flow_started());
    assert!(
      collect(sequence.flow(FlowOptions::default()), 0)
        .await
        .unwrap()
        .is_empty()
    );
  }
}
