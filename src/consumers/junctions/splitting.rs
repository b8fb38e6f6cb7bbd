//! Fan-out junction dealing droplets round-robin.

use crate::consumer::{Consumer, SharedConsumer};
use crate::error::FlowResult;
use async_trait::async_trait;

/// Deals each droplet to exactly one member, round-robin.
///
/// A refusing member just passes its turn; the junction reports full only
/// after a complete round in which no member accepted anything.
pub struct SplittingFlowInputJunction<T> {
  members: Vec<SharedConsumer<T>>,
  current: usize,
  round_refused: bool,
}

impl<T> SplittingFlowInputJunction<T> {
  /// Creates a junction dealing to `members` in turn.
  pub fn new(members: Vec<SharedConsumer<T>>) -> Self {
    Self {
      members,
      current: 0,
      round_refused: true,
    }
  }
}

#[async_trait]
impl<T> Consumer for SplittingFlowInputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    if self.members.is_empty() {
      return Ok(false);
    }
    if self.current >= self.members.len() {
      // New round.
      self.current = 0;
      self.round_refused = true;
    }
    let accepted = self.members[self.current]
      .lock()
      .await
      .consume_droplet(droplet)
      .await?;
    self.current += 1;
    if accepted {
      self.round_refused = false;
      return Ok(true);
    }
    if self.round_refused && self.current == self.members.len() {
      return Ok(false);
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::buffers::FlowBuffer;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  #[tokio::test]
  async fn deals_droplets_round_robin() {
    let first = Arc::new(Mutex::new(FlowBuffer::new(0)));
    let second = Arc::new(Mutex::new(FlowBuffer::new(0)));
    let mut junction = SplittingFlowInputJunction::new(vec![first.clone(), second.clone()]);
    for droplet in 1..=4 {
      assert!(junction.consume_droplet(droplet).await.unwrap());
    }
    assert_eq!(first.lock().await.contents(), vec![1, 3]);
    assert_eq!(second.lock().await.contents(), vec![2, 4]);
  }

  #[tokio::test]
  async fn reports_full_after_a_round_of_refusals() {
    let first = Arc::new(Mutex::new(FlowBuffer::new(1)));
    let second = Arc::new(Mutex::new(FlowBuffer::new(1)));
    let mut junction = SplittingFlowInputJunction::new(vec![first.clone(), second.clone()]);
    // These two fill the members (each stored, each signalling full).
    assert!(junction.consume_droplet(1).await.unwrap());
    assert!(!junction.consume_droplet(2).await.unwrap());
    // Next round: everything refused, full reported on the last member.
    assert!(junction.consume_droplet(3).await.unwrap());
    assert!(!junction.consume_droplet(4).await.unwrap());
    assert_eq!(first.lock().await.contents(), vec![1]);
    assert_eq!(second.lock().await.contents(), vec![2]);
  }
}
