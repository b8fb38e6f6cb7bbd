//! # Machine Contract
//!
//! A machine is a transform that sits between an input window and an output
//! window: it consumes droplets, reacts by [`Machine::update`], and produces
//! transformed droplets on demand. Machines are both [`Consumer`] and
//! [`Producer`], so they slot anywhere in a pipeline graph.
//!
//! [`Machine::pipe_flow`] is the scheduler that lets an n-droplets-in,
//! m-droplets-out transform ride on an ordinary 1:1 stream: it keeps feeding
//! the input window until output appears, drains all of it, and flushes the
//! partial window exactly once when the upstream runs dry.

use crate::consumer::Consumer;
use crate::error::FlowResult;
use crate::flow::{Flow, FlowOptions};
use crate::producer::Producer;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;

/// Trait for windowed transforms with an input and an output buffer.
#[async_trait]
pub trait Machine: Producer + Consumer {
  /// Reacts to the current input window, moving droplets to the output
  /// window when the commit condition holds.
  async fn update(&mut self) -> FlowResult<()>;

  /// Force-processes whatever partial window remains in the input buffer.
  ///
  /// Called exactly once per `pipe_flow` when the upstream ends.
  async fn flush(&mut self) -> FlowResult<()>;

  /// Capacity of the input window. Zero marks an unbuffered 1:1 machine.
  fn input_capacity(&self) -> usize;

  /// Whether the input window currently holds no droplets.
  fn input_is_empty(&self) -> bool;

  /// Whether the output window currently holds no droplets.
  fn output_is_empty(&self) -> bool;

  /// Runs `flow` through this machine, yielding transformed droplets.
  ///
  /// For a windowed machine the loop is: feed input until output appears,
  /// drain the output completely, repeat; when the upstream ends with a
  /// partial window still buffered, flush once and drain what it produced.
  /// An unbuffered machine (input capacity zero) degenerates to strict
  /// consume-one, drip-one alternation.
  ///
  /// The `options` stop predicate and droplet cap apply to the *output*
  /// droplets.
  fn pipe_flow<'a>(
    &'a mut self,
    mut flow: Flow<'a, Self::Input>,
    options: FlowOptions<Self::Output>,
  ) -> Flow<'a, Self::Output>
  where
    Self: Sized,
  {
    Box::pin(stream! {
      let FlowOptions { mut stop, max_droplets } = options;
      let mut remaining = max_droplets;

      if self.input_capacity() == 0 {
        // 1:1 fallback: one droplet in, one droplet out.
        while let Some(item) = flow.next().await {
          let droplet = match item {
            Ok(droplet) => droplet,
            Err(error) => {
              yield Err(error);
              return;
            }
          };
          if let Err(error) = self.consume_droplet(droplet).await {
            yield Err(error);
            return;
          }
          let out = match self.drip().await {
            Ok(out) => out,
            Err(error) => {
              if error.is_fatal() {
                yield Err(error);
              }
              return;
            }
          };
          let stop_hit = stop.as_mut().is_some_and(|stop| stop(&out));
          yield Ok(out);
          if stop_hit {
            return;
          }
          if remaining > 0 {
            remaining -= 1;
            if remaining == 0 {
              return;
            }
          }
        }
        return;
      }

      let mut next = flow.next().await;
      'outer: loop {
        match next.take() {
          Some(Ok(droplet)) => {
            if let Err(error) = self.consume_droplet(droplet).await {
              yield Err(error);
              break;
            }
            next = flow.next().await;
          }
          Some(Err(error)) => {
            yield Err(error);
            break;
          }
          None => {
            if self.input_is_empty() {
              break;
            }
            // Upstream dry with a partial window left: force it through.
            if let Err(error) = self.flush().await {
              yield Err(error);
              break;
            }
            if self.output_is_empty() {
              break;
            }
          }
        }
        while !self.output_is_empty() {
          let out = match self.drip().await {
            Ok(out) => out,
            Err(error) => {
              if error.is_fatal() {
                yield Err(error);
              }
              break 'outer;
            }
          };
          let stop_hit = stop.as_mut().is_some_and(|stop| stop(&out));
          yield Ok(out);
          if stop_hit {
            break 'outer;
          }
          if remaining > 0 {
            remaining -= 1;
            if remaining == 0 {
              break 'outer;
            }
          }
        }
        if next.is_none() && self.input_is_empty() {
          break;
        }
      }
    })
  }

  /// Primes this machine from `flow` until the upstream is dry, then keeps
  /// flowing from the machine's own state.
  ///
  /// Useful for seeding a transform with a fixture before letting it run as
  /// a plain producer.
  fn kickstart_flow<'a>(
    &'a mut self,
    flow: Flow<'a, Self::Input>,
    options: FlowOptions<Self::Output>,
  ) -> Flow<'a, Self::Output>
  where
    Self: Sized,
  {
    Box::pin(stream! {
      {
        let mut primed = self.pipe_flow(flow, FlowOptions::default());
        while let Some(item) = primed.next().await {
          yield item;
        }
      }
      let mut rest = self.flow(options);
      while let Some(item) = rest.next().await {
        yield item;
      }
    })
  }
}
