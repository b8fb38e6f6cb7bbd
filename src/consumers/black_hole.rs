//! Droplet-discarding terminal sink.

use crate::consumer::Consumer;
use crate::error::FlowResult;
use async_trait::async_trait;
use std::marker::PhantomData;

/// Accepts every droplet and keeps none of them.
///
/// Always answers `Ok(false)`, matching the convention for consumers that
/// never retain anything. Useful for terminating a pipeline branch whose
/// droplets only matter for their side effects upstream.
#[derive(Debug, Default)]
pub struct FlowBlackHole<T> {
  _droplet: PhantomData<fn(T)>,
}

impl<T> FlowBlackHole<T> {
  /// Creates a black hole.
  pub fn new() -> Self {
    Self {
      _droplet: PhantomData,
    }
  }
}

#[async_trait]
impl<T> Consumer for FlowBlackHole<T>
where
  T: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = T;

  async fn consume_droplet(&mut self, _droplet: T) -> FlowResult<bool> {
    Ok(false)
  }
}
