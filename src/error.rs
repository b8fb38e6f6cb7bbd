//! # Fault Taxonomy
//!
//! Every failure in a dripflow pipeline travels through one error type,
//! [`FlowError`], split into two channels:
//!
//! - **Fatal** faults ([`FlowError::Structural`]) represent a structural
//!   impossibility, such as dripping an empty blocking buffer. They are
//!   composition bugs, not runtime conditions, and always unwind to the
//!   caller.
//! - **Non-fatal** faults ([`FlowError::Exhausted`], [`FlowError::Transport`])
//!   represent ordinary upstream dryness or an adapter-level I/O failure.
//!   Producers record them as their `last_error` and suppress them by
//!   default, optionally restarting the flow so pipelines self-heal instead
//!   of crashing on transient conditions.
//!
//! Flows surface a fatal fault as a single `Err` item followed by the end of
//! the stream; non-fatal interruptions simply end the stream after being
//! recorded on the producer.

use thiserror::Error;

/// Result alias used by every drip, consume, and pipe operation.
pub type FlowResult<T> = Result<T, FlowError>;

/// An interruption of a flow, tagged with the component type that raised it.
///
/// The component name is captured with [`std::any::type_name`] so errors stay
/// cheap, cloneable, and comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
  /// A structural impossibility, such as dripping an empty blocking buffer.
  ///
  /// Always fatal: this is a composition defect, not a condition to recover
  /// from, and it propagates unconditionally.
  #[error("structural fault in {component}: {context}")]
  Structural {
    /// Type name of the component that raised the fault.
    component: &'static str,
    /// Human-readable description of the impossibility.
    context: String,
  },
  /// A producer reached its natural end.
  ///
  /// Non-fatal: recorded as the producer's `last_error` and suppressed by
  /// default, optionally followed by an automatic restart.
  #[error("flow exhausted in {component}: {context}")]
  Exhausted {
    /// Type name of the component that ran dry.
    component: &'static str,
    /// Human-readable description of the exhaustion.
    context: String,
  },
  /// An I/O failure raised by a stream adapter.
  ///
  /// Non-fatal: surfaced into the same channel as exhaustion so core
  /// pipeline code stays transport-agnostic.
  #[error("transport fault in {component}: {context}")]
  Transport {
    /// Type name of the adapter that failed.
    component: &'static str,
    /// Human-readable description of the underlying failure.
    context: String,
  },
}

impl FlowError {
  /// Creates a fatal structural fault raised by component type `C`.
  pub fn structural<C: ?Sized>(context: impl Into<String>) -> Self {
    FlowError::Structural {
      component: std::any::type_name::<C>(),
      context: context.into(),
    }
  }

  /// Creates a non-fatal exhaustion fault raised by component type `C`.
  pub fn exhausted<C: ?Sized>(context: impl Into<String>) -> Self {
    FlowError::Exhausted {
      component: std::any::type_name::<C>(),
      context: context.into(),
    }
  }

  /// Creates a non-fatal transport fault raised by component type `C`.
  pub fn transport<C: ?Sized>(context: impl Into<String>) -> Self {
    FlowError::Transport {
      component: std::any::type_name::<C>(),
      context: context.into(),
    }
  }

  /// Returns `true` when this fault must unwind to the caller.
  pub fn is_fatal(&self) -> bool {
    matches!(self, FlowError::Structural { .. })
  }

  /// Returns the type name of the component that raised this fault.
  pub fn component(&self) -> &'static str {
    match self {
      FlowError::Structural { component, .. }
      | FlowError::Exhausted { component, .. }
      | FlowError::Transport { component, .. } => component,
    }
  }
}
