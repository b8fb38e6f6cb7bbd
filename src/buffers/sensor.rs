//! Pattern-matching latch over a sliding window of droplets.

use crate::consumer::Consumer;
use crate::error::FlowResult;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Watches its input for a pattern and latches a reading.
///
/// The sensor keeps a sliding window sized to the pattern. After every
/// accepted droplet it compares the window to the pattern and latches its
/// value to `on_value` on a match, `off_value` otherwise. The latched value
/// stays until the next droplet changes it, so a brief match is observable
/// after the fact.
///
/// As a producer the sensor is an endless source of readings: every drip
/// clones the current latched value.
pub struct FlowSensor<T, V> {
  state: FlowState,
  window: super::CyclicFlowBuffer<T>,
  pattern: Vec<T>,
  on_value: V,
  off_value: V,
  value: V,
}

impl<T, V> FlowSensor<T, V>
where
  T: Clone + PartialEq,
  V: Clone,
{
  /// Creates a sensor that latches `on_value` whenever the last
  /// `pattern.len()` droplets equal `pattern`. Starts latched to
  /// `off_value`.
  pub fn new(pattern: Vec<T>, on_value: V, off_value: V) -> Self {
    Self {
      state: FlowState::new(),
      window: super::CyclicFlowBuffer::new(pattern.len()),
      pattern,
      on_value,
      value: off_value.clone(),
      off_value,
    }
  }

  /// The currently latched reading.
  pub fn value(&self) -> &V {
    &self.value
  }

  /// Whether the window currently equals the pattern.
  pub fn is_triggered(&self) -> bool {
    self.window.contents() == self.pattern
  }
}

#[async_trait]
impl<T, V> Consumer for FlowSensor<T, V>
where
  T: std::fmt::Debug + Clone + PartialEq + Send + Sync + 'static,
  V: Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, droplet: T) -> FlowResult<bool> {
    self.window.push_evicting(droplet);
    self.value = if self.is_triggered() {
      self.on_value.clone()
    } else {
      self.off_value.clone()
    };
    Ok(true)
  }
}

#[async_trait]
impl<T, V> Producer for FlowSensor<T, V>
where
  T: Send + Sync + 'static,
  V: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = V;

  async fn drip(&mut self) -> FlowResult<V> {
    Ok(self.value.clone())
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }
}
