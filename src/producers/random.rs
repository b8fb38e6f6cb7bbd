//! Seedable random-droplet producer.

use crate::error::FlowResult;
use crate::producer::{FlowState, Producer};
use async_trait::async_trait;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Produces uniformly random droplets from a half-open range.
///
/// The generator is an explicit, seed-injected [`StdRng`] rather than a
/// process-wide one, so runs are reproducible from the seed alone. With
/// `repeat_same_sequence` enabled, `start_flow` re-seeds the generator, so
/// every staunch/restart cycle replays the identical droplet sequence.
pub struct RandomFlowSequence<T> {
  state: FlowState,
  range: Range<T>,
  rng: StdRng,
  seed: u64,
  repeat_same_sequence: bool,
}

impl<T> RandomFlowSequence<T>
where
  T: SampleUniform + PartialOrd + Clone,
{
  /// Creates a producer of droplets drawn uniformly from `range`, seeded
  /// with `seed`.
  pub fn new(range: Range<T>, seed: u64) -> Self {
    Self {
      state: FlowState::new(),
      range,
      rng: StdRng::seed_from_u64(seed),
      seed,
      repeat_same_sequence: false,
    }
  }

  /// Makes every restarted flow replay the same droplet sequence.
  #[must_use]
  pub fn with_repeat_same_sequence(mut self, repeat: bool) -> Self {
    self.repeat_same_sequence = repeat;
    self
  }
}

#[async_trait]
impl<T> Producer for RandomFlowSequence<T>
where
  T: std::fmt::Debug + Clone + PartialOrd + SampleUniform + Send + Sync + 'static,
{
  type Output = T;

  async fn drip(&mut self) -> FlowResult<T> {
    Ok(self.rng.gen_range(self.range.clone()))
  }

  fn flow_state(&self) -> &FlowState {
    &self.state
  }

  fn flow_state_mut(&mut self) -> &mut FlowState {
    &mut self.state
  }

  fn start_flow(&mut self) -> bool {
    if self.repeat_same_sequence {
      self.rng = StdRng::seed_from_u64(self.seed);
    }
    self.flow_state_mut().open();
    true
  }
}
