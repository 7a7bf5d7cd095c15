// src/args.rs
//! Call-signature normalization.
//!
//! Every operation accepts up to two trailing arguments, each of which may
//! be an accumulator seed, a bare transform, an options record, or absent.
//! [`normalize_arguments`] folds the two into one [`CanonicalCall`] per
//! invocation, with explicit runtime branches in place of overload
//! resolution:
//!
//! - the first positional seed becomes `into`, and beats the
//!   `into`/`inject`/`returning` option aliases (first-present of the three
//!   otherwise);
//! - the first bare function becomes the transform, falling back to the
//!   options record's `with`;
//! - `key`/`with_key` are aliases, first present wins;
//! - a missing transform means identity-of-first-argument, decided at the
//!   point of use.
//!
//! The normalizer is deliberately lenient: malformed combinations (a second
//! seed, a second options record) degrade to "no transform" or "no options"
//! and never raise.

use crate::value::Value;

/// Per-element predicate: `(value, key) -> bool`.
pub type Predicate = dyn Fn(&Value, &Value) -> bool;
/// Per-element transform/visitor: `(value, key) -> output`.
pub type WithFn = dyn Fn(&Value, &Value) -> Value;
/// Output-key deriver; same signature as a transform.
pub type KeyFn = WithFn;
/// Fold step: `(accumulator, value, key) -> accumulator`.
pub type ReducerFn = dyn Fn(Value, &Value, &Value) -> Value;

/// The options record. Construct with a struct literal plus
/// `..Default::default()`; it is immutable for the duration of a call.
///
/// `into`/`inject`/`returning` are three names for the same accumulator
/// seed slot, and `key`/`with_key` for the same output-key deriver.
pub struct IterationOptions<'a, F: ?Sized = WithFn> {
    pub when: Option<&'a Predicate>,
    pub stop_when: Option<&'a Predicate>,
    pub with: Option<&'a F>,
    pub key: Option<&'a KeyFn>,
    pub with_key: Option<&'a KeyFn>,
    pub into: Option<Value>,
    pub inject: Option<Value>,
    pub returning: Option<Value>,
}

impl<'a, F: ?Sized> Default for IterationOptions<'a, F> {
    fn default() -> Self {
        Self {
            when: None,
            stop_when: None,
            with: None,
            key: None,
            with_key: None,
            into: None,
            inject: None,
            returning: None,
        }
    }
}

/// One trailing call argument.
pub enum Arg<'a, F: ?Sized = WithFn> {
    Absent,
    /// An explicit positional accumulator seed.
    Seed(Value),
    /// A bare transform (or reducer, for `reduce`).
    With(&'a F),
    /// An options record.
    Options(IterationOptions<'a, F>),
}

/// `Arg` specialized to reduce's three-argument fold function.
pub type ReduceArg<'a> = Arg<'a, ReducerFn>;

/// The single normalized form every invocation reduces to.
pub struct CanonicalCall<'a, F: ?Sized = WithFn> {
    pub into: Option<Value>,
    pub with: Option<&'a F>,
    pub when: Option<&'a Predicate>,
    pub stop_when: Option<&'a Predicate>,
    pub key: Option<&'a KeyFn>,
}

/// Fold the two trailing arguments into a [`CanonicalCall`].
pub fn normalize_arguments<'a, F: ?Sized>(a: Arg<'a, F>, b: Arg<'a, F>) -> CanonicalCall<'a, F> {
    let mut positional_seed = None;
    let mut positional_with = None;
    let mut record = None;

    for arg in [a, b] {
        match arg {
            Arg::Absent => {}
            Arg::Seed(value) if positional_seed.is_none() => positional_seed = Some(value),
            Arg::With(with) if positional_with.is_none() => positional_with = Some(with),
            Arg::Options(options) if record.is_none() => record = Some(options),
            // Duplicates degrade silently; leniency is part of the contract.
            Arg::Seed(_) | Arg::With(_) | Arg::Options(_) => {}
        }
    }

    let IterationOptions {
        when,
        stop_when,
        with,
        key,
        with_key,
        into,
        inject,
        returning,
    } = record.unwrap_or_default();

    CanonicalCall {
        into: positional_seed.or(into).or(inject).or(returning),
        with: positional_with.or(with),
        when,
        stop_when,
        key: key.or(with_key),
    }
}

/// Apply the resolved transform, defaulting to identity-of-first-argument.
pub(crate) fn apply_with(with: Option<&WithFn>, value: &Value, key: &Value) -> Value {
    match with {
        Some(f) => f(value, key),
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_yields_empty_call() {
        let call: CanonicalCall<'_> = normalize_arguments(Arg::Absent, Arg::Absent);
        assert!(call.into.is_none());
        assert!(call.with.is_none());
        assert!(call.when.is_none());
        assert!(call.stop_when.is_none());
        assert!(call.key.is_none());
    }

    #[test]
    fn test_bare_function_becomes_the_transform() {
        let double: &WithFn = &|v, _| Value::Int(v.as_int().unwrap() * 2);
        let call = normalize_arguments(Arg::With(double), Arg::Absent);
        let out = apply_with(call.with, &Value::Int(4), &Value::Int(0));
        assert_eq!(out, Value::Int(8));
    }

    #[test]
    fn test_seed_then_function() {
        let ident: &WithFn = &|v, _| v.clone();
        let call = normalize_arguments(Arg::Seed(Value::Int(9)), Arg::With(ident));
        assert_eq!(call.into, Some(Value::Int(9)));
        assert!(call.with.is_some());
    }

    #[test]
    fn test_options_supply_seed_and_transform() {
        let ident: &WithFn = &|v, _| v.clone();
        let call = normalize_arguments(
            Arg::Options(IterationOptions {
                with: Some(ident),
                inject: Some(Value::Int(1)),
                ..Default::default()
            }),
            Arg::Absent,
        );
        assert_eq!(call.into, Some(Value::Int(1)));
        assert!(call.with.is_some());
    }

    #[test]
    fn test_seed_alias_precedence_is_into_inject_returning() {
        let call: CanonicalCall<'_> = normalize_arguments(
            Arg::Options(IterationOptions {
                inject: Some(Value::Int(2)),
                returning: Some(Value::Int(3)),
                ..Default::default()
            }),
            Arg::Absent,
        );
        assert_eq!(call.into, Some(Value::Int(2)));

        let call: CanonicalCall<'_> = normalize_arguments(
            Arg::Options(IterationOptions {
                into: Some(Value::Int(1)),
                returning: Some(Value::Int(3)),
                ..Default::default()
            }),
            Arg::Absent,
        );
        assert_eq!(call.into, Some(Value::Int(1)));
    }

    #[test]
    fn test_positional_seed_beats_option_aliases() {
        let call: CanonicalCall<'_> = normalize_arguments(
            Arg::Seed(Value::Int(10)),
            Arg::Options(IterationOptions {
                into: Some(Value::Int(99)),
                ..Default::default()
            }),
        );
        assert_eq!(call.into, Some(Value::Int(10)));
    }

    #[test]
    fn test_key_and_with_key_are_aliases() {
        let from_key: &KeyFn = &|_, k| k.clone();
        let from_value: &KeyFn = &|v, _| v.clone();

        let call: CanonicalCall<'_> = normalize_arguments(
            Arg::Options(IterationOptions {
                with_key: Some(from_key),
                ..Default::default()
            }),
            Arg::Absent,
        );
        assert!(call.key.is_some());

        let call: CanonicalCall<'_> = normalize_arguments(
            Arg::Options(IterationOptions {
                key: Some(from_value),
                with_key: Some(from_key),
                ..Default::default()
            }),
            Arg::Absent,
        );
        let derived = call.key.map(|f| f(&Value::Int(5), &Value::Int(0)));
        assert_eq!(derived, Some(Value::Int(5)));
    }

    #[test]
    fn test_positional_transform_beats_options_with() {
        let ten: &WithFn = &|_, _| Value::Int(10);
        let twenty: &WithFn = &|_, _| Value::Int(20);
        let call = normalize_arguments(
            Arg::With(ten),
            Arg::Options(IterationOptions {
                with: Some(twenty),
                ..Default::default()
            }),
        );
        let out = apply_with(call.with, &Value::Absent, &Value::Absent);
        assert_eq!(out, Value::Int(10));
    }

    #[test]
    fn test_duplicate_seeds_degrade_to_first() {
        let call: CanonicalCall<'_> =
            normalize_arguments(Arg::Seed(Value::Int(1)), Arg::Seed(Value::Int(2)));
        assert_eq!(call.into, Some(Value::Int(1)));
    }

    #[test]
    fn test_missing_transform_defaults_to_identity() {
        let out = apply_with(None, &Value::Int(7), &Value::Int(3));
        assert_eq!(out, Value::Int(7));
    }
}
