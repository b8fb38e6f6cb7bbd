//! # Piping Combinators
//!
//! Extension methods that wire a producer directly into a consumer with a
//! termination condition, without the caller juggling the flow by hand. All
//! three combinators leave the producer open and usable afterwards, so they
//! compose into fill-drain-refill cycles.

use crate::consumer::Consumer;
use crate::flow::Flow;
use crate::producer::Producer;
use async_stream::stream;

/// Pipes a producer into `self` until a termination condition fires.
///
/// Blanket-implemented for every [`Consumer`].
pub trait PipeExt: Consumer {
  /// Consumes the producer's flow until this consumer reports full.
  ///
  /// Yields the capacity signal per droplet. When a droplet fills the
  /// consumer (it is still stored), the producer is staunched and restarted
  /// so a later call resumes from the next droplet.
  fn consume_flow_until_full<'a, P>(&'a mut self, producer: &'a mut P) -> Flow<'a, bool>
  where
    Self: Sized,
    P: Producer<Output = Self::Input>,
  {
    Box::pin(stream! {
      while producer.is_flow_started() {
        let droplet = match producer.drip().await {
          Ok(droplet) => droplet,
          Err(error) => {
            if error.is_fatal() {
              yield Err(error);
            }
            break;
          }
        };
        match self.consume_droplet(droplet).await {
          Ok(has_room) => {
            yield Ok(has_room);
            if !has_room {
              // Pause the producer where it stands; the next call refills
              // from here.
              producer.staunch_flow();
              producer.start_flow();
              break;
            }
          }
          Err(error) => {
            yield Err(error);
            break;
          }
        }
      }
    })
  }

  /// Consumes the producer's flow until `stop` returns `true`.
  ///
  /// The condition is checked before each drip, so no droplet is pulled once
  /// it fires.
  fn consume_flow_until<'a, P, F>(&'a mut self, producer: &'a mut P, mut stop: F) -> Flow<'a, bool>
  where
    Self: Sized,
    P: Producer<Output = Self::Input>,
    F: FnMut() -> bool + Send + 'a,
  {
    Box::pin(stream! {
      while producer.is_flow_started() {
        if stop() {
          break;
        }
        let droplet = match producer.drip().await {
          Ok(droplet) => droplet,
          Err(error) => {
            if error.is_fatal() {
              yield Err(error);
            }
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

  /// Consumes the producer's flow until a droplet matches `stop`.
  ///
  /// The matching droplet is dropped, not consumed; the producer is paused
  /// and restarted so the flow can continue past it later.
  fn consume_flow_until_droplet<'a, P, F>(
    &'a mut self,
    producer: &'a mut P,
    mut stop: F,
  ) -> Flow<'a, bool>
  where
    Self: Sized,
    P: Producer<Output = Self::Input>,
    F: FnMut(&Self::Input) -> bool + Send + 'a,
  {
    Box::pin(stream! {
      while producer.is_flow_started() {
        let droplet = match producer.drip().await {
          Ok(droplet) => droplet,
          Err(error) => {
            if error.is_fatal() {
              yield Err(error);
            }
            break;
          }
        };
        if stop(&droplet) {
          producer.staunch_flow();
          producer.start_flow();
          break;
        }
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

impl<C: Consumer> PipeExt for C {}
