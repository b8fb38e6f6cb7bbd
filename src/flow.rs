//! # Flow Type and Options
//!
//! A [`Flow`] is a lazy, pull-driven, potentially infinite sequence of
//! droplets sourced from exactly one producer. Nothing happens until the
//! stream is polled: every item a flow yields corresponds to one `drip` on
//! the producer behind it, which is where all suspension, and therefore all
//! backpressure, lives.
//!
//! Flows yield `Ok(droplet)` items. A fatal fault appears as a single `Err`
//! item and then the stream ends; a non-fatal interruption ends the stream
//! silently after being recorded on the producer. Re-requesting a flow from
//! the same producer continues from its current state rather than restarting
//! from the beginning.

use crate::error::{FlowError, FlowResult};
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// A pull-driven stream of droplets borrowed from a producer.
pub type Flow<'a, T> = Pin<Box<dyn Stream<Item = FlowResult<T>> + Send + 'a>>;

/// A flow that owns its source, usable as a junction member.
pub type BoxFlow<T> = Flow<'static, T>;

/// Termination options for a `flow` or `pipe_flow` call.
///
/// Built in the builder style:
///
/// ```rust,ignore
/// let options = FlowOptions::default()
///   .with_max_droplets(10)
///   .with_stop(|droplet| *droplet == 0);
/// ```
pub struct FlowOptions<T> {
  /// Stop predicate, checked against each yielded droplet. The droplet that
  /// matches is still yielded; the flow ends right after it.
  pub stop: Option<Box<dyn FnMut(&T) -> bool + Send>>,
  /// Maximum number of droplets to yield. Zero means unlimited.
  pub max_droplets: usize,
}

impl<T> Default for FlowOptions<T> {
  fn default() -> Self {
    Self {
      stop: None,
      max_droplets: 0,
    }
  }
}

impl<T> FlowOptions<T> {
  /// Sets the stop predicate for this flow.
  #[must_use]
  pub fn with_stop(mut self, stop: impl FnMut(&T) -> bool + Send + 'static) -> Self {
    self.stop = Some(Box::new(stop));
    self
  }

  /// Caps the number of droplets this flow will yield (zero = unlimited).
  #[must_use]
  pub fn with_max_droplets(mut self, max_droplets: usize) -> Self {
    self.max_droplets = max_droplets;
    self
  }
}

/// Wraps an in-memory sequence into an owned, finite flow.
///
/// Useful for piping fixed fixtures into machines and junctions without
/// standing up a producer.
pub fn from_iter<T, I>(items: I) -> BoxFlow<T>
where
  T: Send + 'static,
  I: IntoIterator<Item = T>,
  I::IntoIter: Send + 'static,
{
  Box::pin(futures::stream::iter(
    items.into_iter().map(Ok::<T, FlowError>),
  ))
}

/// Collects droplets from a flow into a vector.
///
/// Stops at the end of the flow or after `max_droplets` items (zero =
/// unlimited). A fatal fault in the flow is returned as an error.
pub async fn collect<T>(mut flow: Flow<'_, T>, max_droplets: usize) -> FlowResult<Vec<T>> {
  let mut collected = Vec::new();
  while let Some(item) = flow.next().await {
    collected.push(item?);
    if max_droplets > 0 && collected.len() >= max_droplets {
      break;
    }
  }
  Ok(collected)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FlowError;

  #[tokio::test]
  async fn collect_is_bounded_by_max_droplets() {
    let flow = from_iter(vec![1, 2, 3, 4, 5]);
    let collected = collect(flow, 3).await.unwrap();
    assert_eq!(collected, vec![1, 2, 3]);
  }

  #[tokio::test]
  async fn collect_surfaces_fatal_faults() {
    let flow: BoxFlow<i32> = Box::pin(futures::stream::iter(vec![
      Ok(1),
      Err(FlowError::structural::<()>("boom")),
    ]));
    assert!(collect(flow, 0).await.is_err());
  }
}
