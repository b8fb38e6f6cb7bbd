//! # Machine Implementations
//!
//! Concrete pipeline stages built on the [`crate::Machine`] contract. The
//! whole family is one generic type, [`FlowTransformer`], parameterized by
//! its mapping closure, commit predicate, and overflow strategy;
//! [`FlowMapper`] and [`FlowFilter`] are constructors that pick specific
//! closures rather than separate types.

mod transformer;

pub use transformer::{CommitHook, FlowFilter, FlowMapper, FlowTransformer, OverflowStrategy};
