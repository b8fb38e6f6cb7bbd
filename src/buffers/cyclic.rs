//! Bounded FIFO buffer that evicts the oldest droplet instead of refusing.

use crate::consumer::Consumer;
use crate::error::FlowResult;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// A bounded FIFO buffer with an evict-oldest overflow policy.
///
/// Unlike [`super::FlowBuffer`], consuming always succeeds and always answers
/// `Ok(true)`: a droplet arriving at a full buffer silently pushes the oldest
/// one out. This makes the cyclic buffer the natural sliding window for
/// machines, which is exactly how [`crate::machines::FlowTransformer`] uses
/// it.
#[derive(Debug)]
pub struct CyclicFlowBuffer<T> {
  inner: super::FlowBuffer<T>,
}

impl<T> CyclicFlowBuffer<T> {
  /// Creates an empty cyclic buffer holding at most `capacity` droplets
  /// (zero = unbounded, in which case nothing is ever evicted).
  pub fn new(capacity: usize) -> Self {
    Self {
      inner: super::FlowBuffer::new(capacity),
    }
  }

  /// Maximum number of droplets this buffer holds (zero = unbounded).
  pub fn capacity(&self) -> usize {
    self.inner.capacity()
  }

  /// Number of droplets currently queued.
  pub fn len(&self) -> usize {
    self.inner.len()
  }

  /// Whether the queue is currently empty.
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  /// Whether every slot is occupied.
  pub fn is_full(&self) -> bool {
    self.inner.is_full()
  }

  /// Removes and returns everything queued, front-first.
  pub(crate) fn drain_all(&self) -> Vec<T> {
    self.inner.drain_all()
  }

  pub(crate) fn push_evicting(&self, droplet: T) -> Option<T> {
    self.inner.evict_push(droplet)
  }

  pub(crate) fn pop_front(&self) -> Option<T> {
    self.inner.pop_front()
  }
}

impl<T: Clone> CyclicFlowBuffer<T> {
  /// Snapshot of the queued droplets, front-first.
  pub fn contents(&self) -> Vec<T> {
    self.inner.contents()
  }
}

#[async_trait]
impl<T> Consumer for CyclicFlowBuffer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    self.inner.evict_push(droplet);
    Ok(true)
  }
}

#[async_trait]
impl<T> Producer for CyclicFlowBuffer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    self.inner.drip().await
  }

  fn flow_state(&self) -> &FlowState {
    self.inner.flow_state()
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    self.inner.flow_state_mut()
  }

  fn is_flow_started(&self) -> bool {
    self.inner.is_flow_started()
  }
}
