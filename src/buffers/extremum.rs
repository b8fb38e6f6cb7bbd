//! Single-slot buffers that keep only the extremum droplet seen so far.

use crate::consumer::Consumer;
use crate::error::FlowResult;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Comparator shared by the extremum buffers.
type Compare<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One slot plus the ordering that decides whether a candidate replaces it.
#[derive(Debug)]
struct ExtremumSlot<T> {
  slot: super::CyclicFlowBuffer<T>,
  keep_when_held_is: Ordering,
}

impl<T> ExtremumSlot<T> {
  fn new(keep_when_held_is: Ordering) -> Self {
    Self {
      slot: super::CyclicFlowBuffer::new(1),
      keep_when_held_is,
    }
  }
}

impl<T: Clone> ExtremumSlot<T> {
  fn offer(&mut self, droplet: T, compare: &Compare<T>) {
    let replace = match self.slot.contents().first() {
      // `keep_when_held_is` is the ordering of held vs candidate that
      // means the candidate is the better extremum.
      Some(held) => compare(held, &droplet) == self.keep_when_held_is,
      None => true,
    };
    if replace {
      self.slot.push_evicting(droplet);
    }
  }
}

/// Holds the smallest droplet consumed so far.
///
/// Consuming always answers `Ok(true)`; droplets larger than the held one are
/// simply discarded. Dripping takes the minimum out, leaving the buffer empty
/// until the next candidate arrives.
pub struct MinDropletBuffer<T> {
  inner: ExtremumSlot<T>,
  compare: Compare<T>,
}

/// Holds the largest droplet consumed so far.
///
/// The mirror image of [`MinDropletBuffer`].
pub struct MaxDropletBuffer<T> {
  inner: ExtremumSlot<T>,
  compare: Compare<T>,
}

impl<T> MinDropletBuffer<T> {
  /// Creates a minimum-tracking buffer using `compare`.
  pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
    Self {
      inner: ExtremumSlot::new(Ordering::Greater),
      compare: Box::new(compare),
    }
  }
}

impl<T: Ord + 'static> MinDropletBuffer<T> {
  /// Creates a minimum-tracking buffer using the type's natural order.
  pub fn natural() -> Self {
    Self::new(T::cmp)
  }
}

impl<T> MaxDropletBuffer<T> {
  /// Creates a maximum-tracking buffer using `compare`.
  pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
    Self {
      inner: ExtremumSlot::new(Ordering::Less),
      compare: Box::new(compare),
    }
  }
}

impl<T: Ord + 'static> MaxDropletBuffer<T> {
  /// Creates a maximum-tracking buffer using the type's natural order.
  pub fn natural() -> Self {
    Self::new(T::cmp)
  }
}

impl<T: Clone> MinDropletBuffer<T> {
  /// The minimum held right now, if any.
  pub fn current(&self) -> Option<T> {
    self.inner.slot.contents().into_iter().next()
  }
}

impl<T: Clone> MaxDropletBuffer<T> {
  /// The maximum held right now, if any.
  pub fn current(&self) -> Option<T> {
    self.inner.slot.contents().into_iter().next()
  }
}

macro_rules! extremum_impls {
  ($buffer:ident) => {
    #[async_trait]
    impl<T> Consumer for $buffer<T>
    where
      T: std::fmt::Debug + Clone + Send + Sync + 'static,
    {
      type Input = T;

      async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
        self.inner.offer(droplet, &self.compare);
        Ok(true)
      }
    }

    #[async_trait]
    impl<T> Producer for $buffer<T>
    where
      T: std::fmt::Debug + Clone + Send + Sync + 'static,
    {
      type Output = T;

      async fn drip(&mut self) -> FlowResult<T> {
        self.inner.slot.drip().await
      }

      fn flow_state(&self) -> &FlowState {
        self.inner.slot.flow_state()
      }

      fn flow_state_mut(&mut self) -> &mut FlowState {
        self.inner.slot.flow_state_mut()
      }

      fn is_flow_started(&self) -> bool {
        self.inner.slot.is_flow_started()
      }
    }
  };
}

extremum_impls!(MinDropletBuffer);
extremum_impls!(MaxDropletBuffer);
