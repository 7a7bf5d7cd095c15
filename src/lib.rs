// src/lib.rs
//! Shape-dispatched iteration over heterogeneous runtime containers.
//!
//! One protocol for traversing, filtering, transforming, reducing, and
//! searching lists, records, maps, sets, and lazy sequences: the engine
//! classifies the source's shape at call time and applies one of five
//! operations ([`each`], [`array`], [`object`], [`reduce`], [`find`]) or a
//! recursive deep variant ([`deep_each`], [`deep_map`], [`map`]).
//!
//! Everything is synchronous and call-scoped. The only failure is an
//! [`IterationError::UnsupportedSourceType`] for a source whose shape the
//! engine does not recognize; caller-supplied closures may panic through.

pub mod args;
mod body;
pub mod classify;
pub mod collections;
pub mod deep;
pub mod errors;
pub mod iterate;
pub mod ops;
pub mod value;

pub use args::{
    Arg, CanonicalCall, IterationOptions, KeyFn, Predicate, ReduceArg, ReducerFn, WithFn,
    normalize_arguments,
};
pub use classify::{ContainerKind, classify};
pub use deep::{deep_each, deep_map, map};
pub use errors::IterationError;
pub use iterate::iterate;
pub use ops::{array, each, find, object, reduce};
pub use value::{Sequence, Value};
