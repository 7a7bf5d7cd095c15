// src/ops.rs
//! The five shallow operation strategies: `each`, `array`, `object`,
//! `reduce`, `find`.
//!
//! Each strategy normalizes its trailing arguments once, fuses its
//! accumulation body with the filtering contract (except `find`, which
//! drives the adapter directly), and runs a single traversal. Failures leave
//! a caller-supplied accumulator in whatever partially-built state it had
//! reached; there is no rollback.

use std::cell::RefCell;
use std::rc::Rc;

use crate::args::{Arg, ReduceArg, apply_with, normalize_arguments};
use crate::body::normalize_body;
use crate::classify::{ContainerKind, classify};
use crate::collections::OrderedMap;
use crate::errors::IterationError;
use crate::iterate::iterate;
use crate::value::Value;

/// Traverse purely for side effects.
///
/// Returns the resolved seed unchanged if one was supplied, otherwise
/// `Value::Absent`. Never allocates a container.
pub fn each(source: &Value, a: Arg<'_>, b: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "each");
    let call = normalize_arguments(a, b);
    let (with, when, stop_when) = (call.with, call.when, call.stop_when);
    iterate(
        source,
        normalize_body(when, stop_when, |value, key| {
            apply_with(with, value, key);
        }),
    )?;
    Ok(call.into.unwrap_or(Value::Absent))
}

/// Collect transformed elements into a list, in traversal order.
///
/// A supplied list seed is appended to in place and handed back by
/// reference; any other seed is ignored and a fresh list allocated.
pub fn array(source: &Value, a: Arg<'_>, b: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "array");
    let call = normalize_arguments(a, b);
    let (with, when, stop_when) = (call.with, call.when, call.stop_when);
    let out = match call.into {
        Some(Value::List(list)) => list,
        _ => Rc::new(RefCell::new(Vec::new())),
    };
    iterate(
        source,
        normalize_body(when, stop_when, |value, key| {
            out.borrow_mut().push(apply_with(with, value, key));
        }),
    )?;
    Ok(Value::List(out))
}

/// Collect transformed elements into a string-keyed record.
///
/// Output keys come from the `key`/`with_key` deriver when supplied;
/// otherwise sequential sources key each element by its own value and every
/// other kind keeps its original key. Derived keys are coerced to strings;
/// collisions are last-write-wins.
pub fn object(source: &Value, a: Arg<'_>, b: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "object");
    let call = normalize_arguments(a, b);
    let (with, when, stop_when, key_fn) = (call.with, call.when, call.stop_when, call.key);
    let kind = classify(source);
    let out = match call.into {
        Some(Value::Record(record)) => record,
        _ => Rc::new(RefCell::new(OrderedMap::new())),
    };
    iterate(
        source,
        normalize_body(when, stop_when, |value, key| {
            let derived = match key_fn {
                Some(derive) => derive(value, key).to_key(),
                None if kind == ContainerKind::Sequential => value.to_key(),
                None => key.to_key(),
            };
            out.borrow_mut()
                .insert(derived, apply_with(with, value, key));
        }),
    )?;
    Ok(Value::Record(out))
}

/// Fold the filtered elements into a single value.
///
/// Without a seed, the first element that passes filtering becomes the
/// accumulator verbatim (the reducer is not applied to it) and zero filtered
/// elements yield `Value::Absent`. With a seed, the reducer runs on every
/// filtered element and zero filtered elements yield the seed unchanged.
pub fn reduce(source: &Value, a: ReduceArg<'_>, b: ReduceArg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "reduce");
    let call = normalize_arguments(a, b);
    let (reducer, when, stop_when) = (call.with, call.when, call.stop_when);
    let mut acc = call.into;
    iterate(
        source,
        normalize_body(when, stop_when, |value, key| {
            acc = Some(match acc.take() {
                Some(current) => match reducer {
                    Some(fold) => fold(current, value, key),
                    // Identity-of-first-argument: the accumulator.
                    None => current,
                },
                None => value.clone(),
            });
        }),
    )?;
    Ok(acc.unwrap_or(Value::Absent))
}

/// Return the transformed first match, or `Value::Absent` if none match.
///
/// With a `when` predicate, traversal stops at the first element it admits.
/// Without one, the very first visited element is taken unconditionally.
/// The transform runs at most once, on that single element; `stop_when` is
/// not consulted.
pub fn find(source: &Value, a: Arg<'_>) -> Result<Value, IterationError> {
    tracing::trace!(source = source.type_name(), "find");
    let call = normalize_arguments(a, Arg::Absent);
    let (with, when) = (call.with, call.when);
    let mut found = Value::Absent;
    iterate(source, |value, key| match when {
        Some(matches) => {
            if matches(value, key) {
                found = apply_with(with, value, key);
                true
            } else {
                false
            }
        }
        None => {
            found = apply_with(with, value, key);
            true
        }
    })?;
    Ok(found)
}
