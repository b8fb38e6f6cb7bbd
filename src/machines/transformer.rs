//! Generic windowed transform stage, plus the mapper and filter built on it.

use crate::buffers::CyclicFlowBuffer;
use crate::consumer::{Consumer, SharedConsumer};
use crate::error::{FlowError, FlowResult};
use crate::machine::Machine;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;
use futures::future::BoxFuture;

/// What to do when the input window is full but the commit predicate did not
/// fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowStrategy {
  /// Drop the oldest input droplet and forward the first mapped droplet to
  /// the output window, so the stage keeps emitting while the window slides.
  FlushToOutput,
  /// Drop the oldest input droplet silently.
  DripOldest,
  /// Drop the entire input window.
  DiscardWindow,
}

/// Async hook invoked on every committed window, before the mapped droplets
/// reach the output window. Receives the consumed window and the mapped
/// result.
pub type CommitHook<I, O> = Box<dyn FnMut(Vec<I>, Vec<O>) -> BoxFuture<'static, ()> + Send>;

/// A windowed n-in, m-out transform stage.
///
/// Input droplets accumulate in a sliding window of `chunk_size` (a
/// [`CyclicFlowBuffer`], so raw buffering never rejects). After every
/// accepted droplet the stage maps the current window and, when the commit
/// predicate `consume_if(window, mapped)` holds, atomically swaps the window
/// for the mapped droplets on the output side. A full window that does not
/// commit goes through the [`OverflowStrategy`].
///
/// With `chunk_size` zero the input window is unbounded and
/// [`Machine::pipe_flow`] degenerates to 1:1 piping.
pub struct FlowTransformer<I, O> {
  state: FlowState,
  input: CyclicFlowBuffer<I>,
  output: CyclicFlowBuffer<O>,
  map: Box<dyn FnMut(&[I]) -> Vec<O> + Send>,
  consume_if: Box<dyn FnMut(&[I], &[O]) -> bool + Send>,
  overflow: OverflowStrategy,
  on_commit: Option<CommitHook<I, O>>,
  update_enabled: bool,
}

/// A 1-type transform: commits whenever the mapping changed the window.
pub type FlowMapper<T> = FlowTransformer<T, T>;

/// A droplet-removing transform: matched windows collapse to nothing, with
/// the matched droplets optionally handed to a side consumer.
pub type FlowFilter<T> = FlowTransformer<T, T>;

impl<I, O> FlowTransformer<I, O>
where
  I: std::fmt::Debug + Clone + Send + Sync + 'static,
  O: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  /// Creates a transformer with a `chunk_size` input window and `map`.
  ///
  /// The default commit predicate fires on a full window; the default
  /// overflow strategy is [`OverflowStrategy::FlushToOutput`].
  pub fn new(chunk_size: usize, map: impl FnMut(&[I]) -> Vec<O> + Send + 'static) -> Self {
    Self {
      state: FlowState::new(),
      input: CyclicFlowBuffer::new(chunk_size),
      output: CyclicFlowBuffer::new(0),
      map: Box::new(map),
      consume_if: Box::new(move |window, _| chunk_size == 0 || window.len() >= chunk_size),
      overflow: OverflowStrategy::FlushToOutput,
      on_commit: None,
      update_enabled: true,
    }
  }

  /// Replaces the commit predicate.
  #[must_use]
  pub fn with_consume_if(
    mut self,
    consume_if: impl FnMut(&[I], &[O]) -> bool + Send + 'static,
  ) -> Self {
    self.consume_if = Box::new(consume_if);
    self
  }

  /// Replaces the overflow strategy.
  #[must_use]
  pub fn with_overflow(mut self, overflow: OverflowStrategy) -> Self {
    self.overflow = overflow;
    self
  }

  /// Installs an async hook run on every committed window.
  #[must_use]
  pub fn with_commit_hook(
    mut self,
    hook: impl FnMut(Vec<I>, Vec<O>) -> BoxFuture<'static, ()> + Send + 'static,
  ) -> Self {
    self.on_commit = Some(Box::new(hook));
    self
  }

  /// Enables or disables reacting to consumed droplets at construction time.
  #[must_use]
  pub fn with_updates_enabled(mut self, enabled: bool) -> Self {
    self.update_enabled = enabled;
    self
  }

  /// Toggles reacting to consumed droplets. While disabled the stage is a
  /// raw sliding buffer.
  pub fn set_updates_enabled(&mut self, enabled: bool) {
    self.update_enabled = enabled;
  }

  /// Snapshot of the input window, oldest first.
  pub fn input_window(&self) -> Vec<I> {
    self.input.contents()
  }
}

impl<T> FlowTransformer<T, T>
where
  T: std::fmt::Debug + Clone + PartialEq + Send + Sync + 'static,
{
  /// Creates a [`FlowMapper`]: commits whenever `map` changed the window.
  ///
  /// Unchanged full windows slide one droplet at a time through the overflow
  /// strategy, so identity regions pass through in order.
  pub fn mapper(chunk_size: usize, map: impl FnMut(&[T]) -> Vec<T> + Send + 'static) -> Self {
    Self::new(chunk_size, map).with_consume_if(|window, mapped| mapped != window)
  }

  /// Creates a [`FlowFilter`]: windows matched by `matches` collapse to
  /// nothing, everything else passes through one droplet at a time.
  ///
  /// Matched droplets are delivered to `side_channel` when one is given.
  /// Delivery is awaited before the commit completes, so a downstream pull
  /// observes the side channel already fed; acceptance results are ignored.
  pub fn filter(
    chunk_size: usize,
    mut matches: impl FnMut(&[T]) -> bool + Send + 'static,
    side_channel: Option<SharedConsumer<T>>,
  ) -> Self {
    let stage = Self::mapper(chunk_size, move |window| {
      if matches(window) {
        Vec::new()
      } else {
        window.to_vec()
      }
    });
    match side_channel {
      Some(sink) => stage.with_commit_hook(move |window, mapped| {
        let sink = sink.clone();
        Box::pin(async move {
          if !mapped.is_empty() {
            return;
          }
          let mut sink = sink.lock().await;
          for droplet in window {
            if let Err(error) = sink.consume_droplet(droplet).await {
              tracing::debug!(error = %error, "side channel refused a filtered droplet");
            }
          }
        })
      }),
      None => stage,
    }
  }
}

#[async_trait]
impl<I, O> Consumer for FlowTransformer<I, O>
where
  I: std::fmt::Debug + Clone + Send + Sync + 'static,
  O: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Input = I;

  async fn consume_droplet(&mut self, droplet: I) -> FlowResult<bool> {
    self.input.push_evicting(droplet);
    if self.update_enabled {
      self.update().await?;
    }
    Ok(true)
  }
}

#[async_trait]
impl<I, O> Producer for FlowTransformer<I, O>
where
  I: std::fmt::Debug + Clone + Send + Sync + 'static,
  O: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  type Output = O;

  async fn drip(&mut self) -> FlowResult<O> {
    match self.output.pop_front() {
      Some(droplet) => Ok(droplet),
      None => Err(self.interrupt(FlowError::structural::<Self>(
        "drip on an empty output window",
      ))),
    }
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }

  fn is_flow_started(&self) -> bool {
    self.flow_state().is_open() && !self.output.is_empty()
  }
}

#[async_trait]
impl<I, O> Machine for FlowTransformer<I, O>
where
  I: std::fmt::Debug + Clone + Send + Sync + 'static,
  O: std::fmt::Debug + Clone + Send + Sync + 'static,
{
  async fn update(&mut self) -> FlowResult<()> {
    let window = self.input.contents();
    if window.is_empty() {
      return Ok(());
    }
    let mapped = (self.map)(&window);
    if (self.consume_if)(&window, &mapped) {
      let committed = self.input.drain_all();
      if let Some(hook) = self.on_commit.as_mut() {
        hook(committed, mapped.clone()).await;
      }
      for droplet in mapped {
        self.output.push_evicting(droplet);
      }
      return Ok(());
    }
    if self.input.is_full() {
      match self.overflow {
        OverflowStrategy::FlushToOutput => {
          self.input.pop_front();
          if let Some(first) = mapped.into_iter().next() {
            self.output.push_evicting(first);
          }
        }
        OverflowStrategy::DripOldest => {
          self.input.pop_front();
        }
        OverflowStrategy::DiscardWindow => {
          tracing::trace!(dropped = window.len(), "discarding full input window");
          self.input.drain_all();
        }
      }
    }
    Ok(())
  }

  async fn flush(&mut self) -> FlowResult<()> {
    let window = self.input.drain_all();
    if window.is_empty() {
      return Ok(());
    }
    tracing::debug!(len = window.len(), "flushing partial input window");
    let mapped = (self.map)(&window);
    if let Some(hook) = self.on_commit.as_mut() {
      hook(window, mapped.clone()).await;
    }
    for droplet in mapped {
      self.output.push_evicting(droplet);
    }
    Ok(())
  }

  fn input_capacity(&self) -> usize {
    self.input.capacity()
  }

  fn input_is_empty(&self) -> bool {
    self.input.is_empty()
  }

  fn output_is_empty(&self) -> bool {
    self.output.is_empty()
  }
}
