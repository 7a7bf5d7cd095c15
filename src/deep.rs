// src/deep.rs
//! Recursive traversal: `deep_each`, `deep_map`, and the shallow `map`
//! dispatcher.
//!
//! `deep_each` descends into any nestable container kind (sequential, keyed,
//! map-like, set-like), evaluating `when` on every value first: a container
//! that fails `when` is skipped outright, not recursed into. `deep_map`
//! rebuilds shape-for-shape but only descends into sequential and keyed
//! values; map-like and set-like values are opaque leaves handed to the
//! transform unmodified. Recursion depth is bounded only by the input's
//! nesting; pathologically deep structures can exhaust the stack.

use std::cell::RefCell;
use std::rc::Rc;

use crate::args::{Arg, Predicate, WithFn, apply_with, normalize_arguments};
use crate::classify::{ContainerKind, classify};
use crate::collections::OrderedMap;
use crate::errors::IterationError;
use crate::iterate::iterate;
use crate::ops::{array, object};
use crate::value::Value;

/// Shallow shape-preserving map: sequential sources go through `array`,
/// keyed sources through `object`. Every other kind is unsupported.
pub fn map(source: &Value, a: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "map");
    match classify(source) {
        ContainerKind::Sequential => array(source, a, Arg::Absent),
        ContainerKind::Keyed => object(source, a, Arg::Absent),
        _ => Err(IterationError::unsupported(source.type_name())),
    }
}

/// Recursively visit every leaf of a nested structure for side effects.
pub fn deep_each(source: &Value, a: Arg<'_>) -> Result<(), IterationError> {
    tracing::trace!(source = source.type_name(), "deep_each");
    let call = normalize_arguments(a, Arg::Absent);
    deep_each_inner(source, call.with, call.when)
}

fn deep_each_inner(
    source: &Value,
    with: Option<&WithFn>,
    when: Option<&Predicate>,
) -> Result<(), IterationError> {
    let mut failure = None;
    iterate(source, |value, key| {
        if let Some(pass) = when {
            if !pass(value, key) {
                return false;
            }
        }
        if classify(value).is_nestable() {
            if let Err(err) = deep_each_inner(value, with, when) {
                failure = Some(err);
                return true;
            }
        } else {
            apply_with(with, value, key);
        }
        false
    })?;
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Recursively rebuild a nested sequential/keyed structure with every
/// reachable leaf transformed exactly once. The result is isomorphic in
/// shape to the input.
pub fn deep_map(source: &Value, a: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "deep_map");
    let call = normalize_arguments(a, Arg::Absent);
    deep_map_inner(source, call.with, call.when)
}

fn deep_map_inner(
    source: &Value,
    with: Option<&WithFn>,
    when: Option<&Predicate>,
) -> Result<Value, IterationError> {
    match classify(source) {
        ContainerKind::Sequential => {
            let out = Rc::new(RefCell::new(Vec::new()));
            let mut failure = None;
            iterate(source, |value, key| {
                match deep_map_child(value, key, with, when) {
                    Ok(child) => {
                        out.borrow_mut().push(child);
                        false
                    }
                    Err(err) => {
                        failure = Some(err);
                        true
                    }
                }
            })?;
            match failure {
                Some(err) => Err(err),
                None => Ok(Value::List(out)),
            }
        }
        ContainerKind::Keyed => {
            let out = Rc::new(RefCell::new(OrderedMap::new()));
            let mut failure = None;
            iterate(source, |value, key| {
                match deep_map_child(value, key, with, when) {
                    Ok(child) => {
                        out.borrow_mut().insert(key.to_key(), child);
                        false
                    }
                    Err(err) => {
                        failure = Some(err);
                        true
                    }
                }
            })?;
            match failure {
                Some(err) => Err(err),
                None => Ok(Value::Record(out)),
            }
        }
        _ => Err(IterationError::unsupported(source.type_name())),
    }
}

fn deep_map_child(
    value: &Value,
    key: &Value,
    with: Option<&WithFn>,
    when: Option<&Predicate>,
) -> Result<Value, IterationError> {
    if classify(value).is_mappable() {
        deep_map_inner(value, with, when)
    } else if when.is_none_or(|pass| pass(value, key)) {
        Ok(apply_with(with, value, key))
    } else {
        // A filtered-out leaf passes through untransformed to keep the
        // output isomorphic.
        Ok(value.clone())
    }
}
