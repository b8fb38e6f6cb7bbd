//! End-to-end pipeline graphs wiring producers, machines, junctions, and
//! sinks together.

use dripflow::buffers::FlowBuffer;
use dripflow::consumers::junctions::SequentialFlowInputJunction;
use dripflow::flow::collect;
use dripflow::machines::FlowTransformer;
use dripflow::producers::FlowSequence;
use dripflow::producers::junctions::{
  ReducingFlowOutputJunction, SplittingFlowOutputJunction, shared_flow, shared_pipe,
};
use dripflow::{Consumer, FlowOptions, Machine, PipeExt, Producer, SharedConsumer};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

fn init_tracing() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A repeating sequence fills two chained members in order: the first to its
/// capacity, then the second, and the junction reports full only once the
/// last member does.
#[tokio::test]
async fn sequential_fan_out_fills_members_in_order() {
  init_tracing();
  let first = Arc::new(Mutex::new(FlowBuffer::new(3)));
  let second = Arc::new(Mutex::new(FlowBuffer::new(7)));
  let mut junction = SequentialFlowInputJunction::new(vec![first.clone(), second.clone()]);
  let mut source = FlowSequence::new(vec![1, 2, 3, 4, 5]);

  let mut fed = junction.consume_flow_until_full(&mut source);
  let mut signals = Vec::new();
  while let Some(signal) = fed.next().await {
    signals.push(signal.unwrap());
  }
  drop(fed);

  assert_eq!(first.lock().await.contents(), vec![1, 2, 3]);
  assert_eq!(second.lock().await.contents(), vec![4, 5, 1, 2, 3, 4, 5]);
  // Only the very last droplet flipped the junction to full.
  assert_eq!(signals.len(), 10);
  assert!(signals[..9].iter().all(|accepted| *accepted));
  assert!(!signals[9]);
}

/// Two word sequences fanned in five droplets at a time, case-inverted, and
/// drained into a bounded sink.
#[tokio::test]
async fn splitting_fan_in_through_a_case_inverter() {
  init_tracing();
  let hello = Arc::new(Mutex::new(FlowSequence::new("hello".chars().collect())));
  let world = Arc::new(Mutex::new(FlowSequence::new("WORLD".chars().collect())));
  let mut junction =
    SplittingFlowOutputJunction::new(5, vec![shared_flow(hello), shared_flow(world)]);

  let mut invert = FlowTransformer::new(1, |window: &[char]| {
    window
      .iter()
      .map(|c| {
        if c.is_ascii_uppercase() {
          c.to_ascii_lowercase()
        } else {
          c.to_ascii_uppercase()
        }
      })
      .collect()
  });
  let mut sink = FlowBuffer::new(10);

  let inverted = invert.pipe_flow(
    junction.flow(FlowOptions::default().with_max_droplets(10)),
    FlowOptions::default(),
  );
  let signals = collect(sink.consume_flow(inverted), 0).await.unwrap();

  assert_eq!(signals.len(), 10);
  let drained: String = collect(sink.flow(FlowOptions::default()), 0)
    .await
    .unwrap()
    .into_iter()
    .collect();
  assert_eq!(drained, "HELLOworld");
}

/// A filter removes the 2 from a repeating 1,2,3 and parks it in a sink; a
/// reducing junction adds the filtered branch and the sink's own flow back
/// together, giving the alternating 1, 5 pattern with the sink drained every
/// second round.
#[tokio::test]
async fn reducing_fan_in_over_a_filter_side_channel() {
  init_tracing();
  let sink = Arc::new(Mutex::new(FlowBuffer::new(0)));
  let side_channel: SharedConsumer<i32> = sink.clone();
  let filter = Arc::new(Mutex::new(FlowTransformer::filter(
    1,
    |window| window == [2],
    Some(side_channel),
  )));
  let source = Arc::new(Mutex::new(FlowSequence::new(vec![1, 2, 3])));

  let mut junction = ReducingFlowOutputJunction::new(
    |a, b| a + b,
    vec![
      shared_pipe(filter, shared_flow(source)),
      shared_flow(sink.clone()),
    ],
  );

  let collected = collect(junction.flow(FlowOptions::default().with_max_droplets(6)), 0)
    .await
    .unwrap();
  assert_eq!(collected, vec![1, 5, 1, 5, 1, 5]);
  assert!(sink.lock().await.is_empty());
}

/// The chunk-3 rewrite mapper over a repeating 1..5, collecting 12 droplets.
#[tokio::test]
async fn windowed_rewrites_over_a_repeating_sequence() {
  init_tracing();
  let mut stage = FlowTransformer::mapper(3, |window: &[i32]| {
    if window == [4, 5, 1] {
      return vec![8, 8];
    }
    if let Some(at) = window.windows(2).position(|pair| pair == [2, 3]) {
      let mut rewritten = window[..at].to_vec();
      rewritten.extend([9, 9, 9]);
      rewritten.extend(&window[at + 2..]);
      return rewritten;
    }
    window.to_vec()
  });
  let mut source = FlowSequence::new(vec![1, 2, 3, 4, 5]);

  let collected = collect(
    stage.pipe_flow(
      source.flow(FlowOptions::default()),
      FlowOptions::default().with_max_droplets(12),
    ),
    0,
  )
  .await
  .unwrap();
  assert_eq!(collected, vec![1, 9, 9, 9, 8, 8, 9, 9, 9, 8, 8, 9]);
}

/// Seeding a machine from a fixture, then letting it keep producing from its
/// own buffered state.
#[tokio::test]
async fn kickstart_primes_then_keeps_flowing() {
  init_tracing();
  let mut stage = FlowTransformer::new(2, |window: &[i32]| vec![window.iter().product::<i32>()]);
  let collected = collect(
    stage.kickstart_flow(
      dripflow::flow::from_iter([2, 3, 4, 5]),
      FlowOptions::default(),
    ),
    0,
  )
  .await
  .unwrap();
  assert_eq!(collected, vec![6, 20]);
}
