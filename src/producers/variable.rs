//! Constant, settable, and lazily evaluated single-value producers.

use crate::error::FlowResult;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;

/// Endlessly produces clones of one fixed droplet.
#[derive(Debug)]
pub struct FlowConstant<T> {
  state: FlowState,
  value: T,
}

impl<T> FlowConstant<T> {
  /// Creates a producer that always drips `value`.
  pub fn new(value: T) -> Self {
    Self {
      state: FlowState::new(),
      value,
    }
  }
}

/// Endlessly produces clones of a value the owner can reassign at any time.
#[derive(Debug)]
pub struct FlowVariable<T> {
  state: FlowState,
  value: T,
}

impl<T> FlowVariable<T> {
  /// Creates a producer dripping `value` until it is reassigned.
  pub fn new(value: T) -> Self {
    Self {
      state: FlowState::new(),
      value,
    }
  }

  /// Reassigns the value; later drips produce the new one.
  pub fn set(&mut self, value: T) {
    self.value = value;
  }

  /// The current value.
  pub fn get(&self) -> &T {
    &self.value
  }
}

/// Produces a fresh value per drip by calling a closure.
pub struct LazyFlowVariable<T> {
  state: FlowState,
  supplier: Box<dyn FnMut() -> T + Send>,
}

impl<T> LazyFlowVariable<T> {
  /// Creates a producer that calls `supplier` once per drip.
  pub fn new(supplier: impl FnMut() -> T + Send + 'static) -> Self {
    Self {
      state: FlowState::new(),
      supplier: Box::new(supplier),
    }
  }
}

macro_rules! flow_state_accessors {
  () => {
    fn flow_state(&self) -> &FlowState {
      &self.state
    }

    fn flow_state_mut(&mut self) -> &mut FlowState {
      &mut self.state
    }
  };
}

#[async_trait]
impl<T> Producer for FlowConstant<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    Ok(self.value.clone())
  }

  flow_state_accessors!();
}

#[async_trait]
impl<T> Producer for FlowVariable<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    Ok(self.value.clone())
  }

  flow_state_accessors!();
}

#[async_trait]
impl<T> Producer for LazyFlowVariable<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    Ok((self.supplier)())
  }

  flow_state_accessors!();
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::flow::{FlowOptions, collect};

  #[tokio::test]
  async fn constants_repeat_forever() {
    let mut constant = FlowConstant::new(7);
    let collected = collect(constant.flow(FlowOptions::default().with_max_droplets(3)), 0)
      .await
      .unwrap();
    assert_eq!(collected, vec![7, 7, 7]);
  }

  #[tokio::test]
  async fn variables_drip_the_latest_assignment() {
    let mut variable = FlowVariable::new("a");
    assert_eq!(variable.drip().await.unwrap(), "a");
    variable.set("b");
    assert_eq!(variable.drip().await.unwrap(), "b");
    assert_eq!(*variable.get(), "b");
  }

  #[tokio::test]
  async fn lazy_variables_evaluate_per_drip() {
    let mut calls = 0;
    let mut lazy = LazyFlowVariable::new(move || {
      calls += 1;
      calls
    });
    assert_eq!(lazy.drip().await.unwrap(), 1);
    assert_eq!(lazy.drip().await.unwrap(), 2);
  }
}
