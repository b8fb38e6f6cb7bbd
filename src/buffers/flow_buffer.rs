//! Bounded FIFO buffer with a blocking overflow policy.

use crate::consumer::Consumer;
use crate::error::{FlowError, FlowResult};
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A bounded first-in-first-out droplet buffer.
///
/// Consuming reports the capacity signal: the droplet that lands in the last
/// free slot is stored but answers `Ok(false)`, and further droplets are
/// refused with `Ok(false)` until something drains. A capacity of zero means
/// unbounded.
///
/// As a producer the buffer drains front-first; its flow ends naturally when
/// the queue is empty, and a direct `drip` on an empty buffer is a fatal
/// structural fault.
#[derive(Debug)]
pub struct FlowBuffer<T> {
  state: FlowState,
  queue: Mutex<VecDeque<T>>,
  capacity: usize,
}

impl<T> FlowBuffer<T> {
  /// Creates an empty buffer holding at most `capacity` droplets (zero =
  /// unbounded).
  pub fn new(capacity: usize) -> Self {
    Self {
      state: FlowState::new(),
      queue: Mutex::new(VecDeque::new()),
      capacity,
    }
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<T>> {
    self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Maximum number of droplets this buffer holds (zero = unbounded).
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Number of droplets currently queued.
  pub fn len(&self) -> usize {
    self.lock().len()
  }

  /// Whether the queue is currently empty.
  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  /// Whether every slot is occupied. An unbounded buffer is never full.
  pub fn is_full(&self) -> bool {
    self.capacity > 0 && self.lock().len() >= self.capacity
  }

  pub(crate) fn pop_front(&self) -> Option<T> {
    self.lock().pop_front()
  }

  /// Appends, evicting the oldest droplet when at capacity. One lock, so the
  /// evict-then-push pair is atomic.
  pub(crate) fn evict_push(&self, droplet: T) -> Option<T> {
    let mut queue = self.lock();
    let evicted = if self.capacity > 0 && queue.len() >= self.capacity {
      queue.pop_front()
    } else {
      None
    };
    queue.push_back(droplet);
    evicted
  }

  /// Removes and returns everything queued, front-first, in one lock.
  pub(crate) fn drain_all(&self) -> Vec<T> {
    self.lock().drain(..).collect()
  }
}

impl<T: Clone> FlowBuffer<T> {
  /// Snapshot of the queued droplets, front-first.
  pub fn contents(&self) -> Vec<T> {
    self.lock().iter().cloned().collect()
  }
}

#[async_trait]
impl<T> Consumer for FlowBuffer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    let mut queue = self.lock();
    if self.capacity > 0 && queue.len() >= self.capacity {
      return Ok(false);
    }
    queue.push_back(droplet);
    Ok(self.capacity == 0 || queue.len() < self.capacity)
  }
}

#[async_trait]
impl<T> Producer for FlowBuffer<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    match self.pop_front() {
      Some(droplet) => Ok(droplet),
      None => Err(self.interrupt(FlowError::structural::<Self>("drip on an empty buffer"))),
    }
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }

  fn is_flow_started(&self) -> bool {
    self.flow_state().is_open() && !self.is_empty()
  }
}
