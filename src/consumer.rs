//! # Consumer Contract
//!
//! This module defines the [`Consumer`] trait for components that accept
//! droplets, one at a time or from a whole flow.
//!
//! The heart of the contract is the capacity signal returned by
//! `consume_droplet`: `Ok(true)` means "accepted, room remains", `Ok(false)`
//! means "accepted, but the consumer just became full" (or is unbuffered and
//! never holds anything). The droplet that triggers `Ok(false)` is still
//! stored; the signal tells the upstream scheduler to pause, drain, or
//! redirect before offering the next one. This is how backpressure travels
//! upstream without any side channel.

use crate::error::FlowResult;
use crate::flow::Flow;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A consumer behind a shared handle, usable as an input junction member or a
/// filter side channel while the caller keeps its own handle for inspection.
pub type SharedConsumer<T> = Arc<Mutex<dyn Consumer<Input = T>>>;

/// Trait for components that accept droplets.
///
/// Buffers filling their queue, machines feeding their input window, input
/// junctions fanning out to members, and terminal sinks all implement this
/// trait.
#[async_trait]
pub trait Consumer: Send
where
  Self::Input: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  /// The droplet type this consumer accepts.
  type Input;

  /// Offers one droplet to this consumer.
  ///
  /// Returns `Ok(true)` when the droplet was accepted and room remains, and
  /// `Ok(false)` when it was accepted but the consumer is now full (or never
  /// retains droplets at all). An `Err` means the droplet could not be
  /// processed.
  async fn consume_droplet(&mut self, droplet: Self::Input) -> FlowResult<bool>;

  /// Drains a flow into this consumer, one droplet at a time.
  ///
  /// Yields the capacity signal for each consumed droplet, so callers can
  /// watch the consumer approach fullness. Ends when the flow ends; a fault
  /// from either side is yielded and ends the stream.
  fn consume_flow<'a>(&'a mut self, mut flow: Flow<'a, Self::Input>) -> Flow<'a, bool>
  where
    Self: Sized,
  {
    Box::pin(stream! {
      while let Some(item) = flow.next().await {
        let droplet = match item {
          Ok(droplet) => droplet,
          Err(error) => {
            yield Err(error);
            break;
          }
        };
        match self.consume_droplet(droplet).await {
          Ok(has_room) => yield Ok(has_room),
          Err(error) => {
            yield Err(error);
            break;
          }
        }
      }
    })
  }
}
