// src/iterate.rs
//! The traversal adapter.
//!
//! [`iterate`] drives one forward pass over a source in its natural order,
//! invoking `visitor(value, key)` per element and breaking out the instant
//! the visitor returns `true`. Keys follow the container kind: sequential
//! sources get their integer index, keyed sources their string key, map-like
//! sources their key value, and set-like or sequence sources the element
//! itself.
//!
//! The adapter never holds a `RefCell` borrow across a visitor call: it
//! snapshots the length once and re-borrows per step, so visitors are free
//! to touch the accumulator (including a seeded one) mid-traversal. It never
//! mutates the source.

use crate::classify::classify;
use crate::errors::IterationError;
use crate::value::Value;

/// Visit every element of `source` until `visitor` asks to stop.
///
/// Absent sources are a no-op. A non-absent, non-container source fails with
/// [`IterationError::UnsupportedSourceType`] before any visit.
pub fn iterate<F>(source: &Value, mut visitor: F) -> Result<(), IterationError>
where
    F: FnMut(&Value, &Value) -> bool,
{
    tracing::trace!(kind = ?classify(source), "iterate");
    match source {
        Value::Absent => Ok(()),
        Value::List(list) => {
            let len = list.borrow().len();
            for index in 0..len {
                let Some(item) = list.borrow().get(index).cloned() else {
                    break;
                };
                if visitor(&item, &Value::Int(index as i64)) {
                    break;
                }
            }
            Ok(())
        }
        Value::Record(record) => {
            let len = record.borrow().len();
            for index in 0..len {
                let entry = record
                    .borrow()
                    .get_index(index)
                    .map(|(k, v)| (k.clone(), v.clone()));
                let Some((key, item)) = entry else {
                    break;
                };
                if visitor(&item, &Value::Str(key)) {
                    break;
                }
            }
            Ok(())
        }
        Value::Map(map) => {
            let len = map.borrow().len();
            for index in 0..len {
                let entry = map
                    .borrow()
                    .get_index(index)
                    .map(|(k, v)| (k.clone(), v.clone()));
                let Some((key, item)) = entry else {
                    break;
                };
                if visitor(&item, &key) {
                    break;
                }
            }
            Ok(())
        }
        Value::Set(set) => {
            let len = set.borrow().len();
            for index in 0..len {
                let Some(item) = set.borrow().get_index(index).cloned() else {
                    break;
                };
                // A set element is its own key.
                if visitor(&item, &item) {
                    break;
                }
            }
            Ok(())
        }
        Value::Sequence(seq) => {
            loop {
                let next = seq.borrow_mut().pull();
                match next {
                    Some(item) => {
                        if visitor(&item, &item) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Ok(())
        }
        other => Err(IterationError::unsupported(other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visited(source: &Value) -> Vec<(Value, Value)> {
        let mut seen = Vec::new();
        iterate(source, |value, key| {
            seen.push((value.clone(), key.clone()));
            false
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_absent_is_a_noop() {
        assert!(visited(&Value::Absent).is_empty());
    }

    #[test]
    fn test_list_visits_indices_ascending() {
        let source = Value::list([Value::from("a"), Value::from("b")]);
        let seen = visited(&source);
        assert_eq!(
            seen,
            vec![
                (Value::from("a"), Value::Int(0)),
                (Value::from("b"), Value::Int(1)),
            ]
        );
    }

    #[test]
    fn test_record_visits_in_insertion_order_with_string_keys() {
        let source = Value::record([("b", Value::Int(2)), ("a", Value::Int(1))]);
        let seen = visited(&source);
        assert_eq!(
            seen,
            vec![
                (Value::Int(2), Value::from("b")),
                (Value::Int(1), Value::from("a")),
            ]
        );
    }

    #[test]
    fn test_map_keys_are_the_map_keys() {
        let source = Value::map([(Value::Int(10), Value::from("x"))]);
        let seen = visited(&source);
        assert_eq!(seen, vec![(Value::from("x"), Value::Int(10))]);
    }

    #[test]
    fn test_set_key_equals_value() {
        let source = Value::set([Value::Int(3), Value::Int(7)]);
        let seen = visited(&source);
        assert_eq!(
            seen,
            vec![
                (Value::Int(3), Value::Int(3)),
                (Value::Int(7), Value::Int(7)),
            ]
        );
    }

    #[test]
    fn test_stop_halts_immediately() {
        let source = Value::list([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let mut count = 0;
        iterate(&source, |_, _| {
            count += 1;
            count == 2
        })
        .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_sequence_is_pulled_lazily() {
        use std::cell::Cell;
        use std::rc::Rc;

        let pulls = Rc::new(Cell::new(0));
        let counter = pulls.clone();
        let mut n = 0;
        let source = Value::sequence(move || {
            counter.set(counter.get() + 1);
            n += 1;
            Some(Value::Int(n))
        });

        iterate(&source, |value, _| value == &Value::Int(2)).unwrap();
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_scalar_source_is_unsupported() {
        let err = iterate(&Value::Int(5), |_, _| false).unwrap_err();
        assert_eq!(
            err,
            IterationError::UnsupportedSourceType { type_name: "int" }
        );
        let err = iterate(&Value::from("s"), |_, _| false).unwrap_err();
        assert_eq!(
            err,
            IterationError::UnsupportedSourceType { type_name: "string" }
        );
    }
}
