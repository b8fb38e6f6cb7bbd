//! Fan-out junction filling one member at a time.

use crate::consumer::{Consumer, SharedConsumer};
use crate::error::FlowResult;
use async_trait::async_trait;

/// Routes every droplet to the current member until that member reports
/// full, then advances to the next.
///
/// The droplet that fills a member is stored by it; the junction advances
/// and still reports room as long as members remain. Only when the last
/// member reports full does the junction itself report full, and the next
/// droplet starts over at the first member, so members drained in the
/// meantime get refilled.
pub struct SequentialFlowInputJunction<T> {
  members: Vec<SharedConsumer<T>>,
  current: usize,
}

impl<T> SequentialFlowInputJunction<T> {
  /// Creates a junction filling `members` in order.
  pub fn new(members: Vec<SharedConsumer<T>>) -> Self {
    Self {
      members,
      current: 0,
    }
  }
}

#[async_trait]
impl<T> Consumer for SequentialFlowInputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    if self.members.is_empty() {
      return Ok(false);
    }
    // A full pass wraps back to the first member, so a drained member can
    // be refilled on the next cycle.
    if self.current >= self.members.len() {
      self.current = 0;
    }
    let accepted = self.members[self.current]
      .lock()
      .await
      .consume_droplet(droplet)
      .await?;
    if !accepted {
      tracing::trace!(member = self.current, "member full, advancing");
      self.current += 1;
      if self.current == self.members.len() {
        return Ok(false);
      }
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::buffers::FlowBuffer;
  use crate::piping::PipeExt;
  use crate::producers::FlowSequence;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  #[tokio::test]
  async fn fills_members_in_order_from_a_repeating_sequence() {
    let first = Arc::new(Mutex::new(FlowBuffer::new(3)));
    let second = Arc::new(Mutex::new(FlowBuffer::new(7)));
    let mut junction = SequentialFlowInputJunction::new(vec![first.clone(), second.clone()]);
    let mut source = FlowSequence::new(vec![1, 2, 3, 4, 5]);

    let mut fed = junction.consume_flow_until_full(&mut source);
    use futures::StreamExt;
    while fed.next().await.is_some() {}
    drop(fed);

    assert_eq!(first.lock().await.contents(), vec![1, 2, 3]);
    assert_eq!(second.lock().await.contents(), vec![4, 5, 1, 2, 3, 4, 5]);
  }

  #[tokio::test]
  async fn reports_full_only_on_the_last_member() {
    let only = Arc::new(Mutex::new(FlowBuffer::new(2)));
    let mut junction = SequentialFlowInputJunction::new(vec![only.clone()]);
    assert!(junction.consume_droplet(1).await.unwrap());
    // The filling droplet is stored, but the junction is out of members.
    assert!(!junction.consume_droplet(2).await.unwrap());
    assert_eq!(only.lock().await.contents(), vec![1, 2]);
  }

  #[tokio::test]
  async fn wraps_back_to_drained_members_after_reporting_full() {
    use crate::producer::Producer;

    let only = Arc::new(Mutex::new(FlowBuffer::new(1)));
    let mut junction = SequentialFlowInputJunction::new(vec![only.clone()]);
    // The first droplet fills the single member and the junction with it.
    assert!(!junction.consume_droplet(1).await.unwrap());

    let drained = crate::flow::collect(
      only.lock().await.flow(crate::flow::FlowOptions::default()),
      0,
    )
    .await
    .unwrap();
    assert_eq!(drained, vec![1]);

    // The next cycle starts over at the first member: the droplet lands in
    // the drained buffer instead of being dropped.
    assert!(!junction.consume_droplet(2).await.unwrap());
    assert_eq!(only.lock().await.contents(), vec![2]);
  }
}
