//! Fan-out junction delivering every droplet to all members.

use crate::consumer::{Consumer, SharedConsumer};
use crate::error::FlowResult;
use async_trait::async_trait;

/// Clones every droplet to all members in registration order.
///
/// Each member is awaited before the next is offered the droplet. The
/// junction reports accepted if any member accepted; with no members it
/// reports full.
pub struct FlowInputJunction<T> {
  members: Vec<SharedConsumer<T>>,
}

impl<T> FlowInputJunction<T> {
  /// Creates a junction broadcasting to `members`.
  pub fn new(members: Vec<SharedConsumer<T>>) -> Self {
    Self { members }
  }
}

#[async_trait]
impl<T> Consumer for FlowInputJunction<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    let mut any_accepted = false;
    for member in &self.members {
      if member.lock().await.consume_droplet(droplet.clone()).await? {
        any_accepted = true;
      }
    }
    Ok(any_accepted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::buffers::FlowBuffer;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  #[tokio::test]
  async fn every_member_sees_every_droplet() {
    let first = Arc::new(Mutex::new(FlowBuffer::new(0)));
    let second = Arc::new(Mutex::new(FlowBuffer::new(0)));
    let mut junction = FlowInputJunction::new(vec![first.clone(), second.clone()]);
    for droplet in [1, 2] {
      assert!(junction.consume_droplet(droplet).await.unwrap());
    }
    assert_eq!(first.lock().await.contents(), vec![1, 2]);
    assert_eq!(second.lock().await.contents(), vec![1, 2]);
  }

  #[tokio::test]
  async fn accepted_while_any_member_has_room() {
    let tight = Arc::new(Mutex::new(FlowBuffer::new(1)));
    let roomy = Arc::new(Mutex::new(FlowBuffer::new(3)));
    let mut junction = FlowInputJunction::new(vec![tight.clone(), roomy.clone()]);
    assert!(junction.consume_droplet(1).await.unwrap());
    assert!(junction.consume_droplet(2).await.unwrap());
    // The third droplet fills the roomy member, so no member reports room.
    assert!(!junction.consume_droplet(3).await.unwrap());
    assert!(!junction.consume_droplet(4).await.unwrap());
    assert_eq!(tight.lock().await.contents(), vec![1]);
    assert_eq!(roomy.lock().await.contents(), vec![1, 2, 3]);
  }
}
