// src/body.rs
//! Per-element body normalization: fuses `when`/`stop_when` and the
//! operation body into the single visitor the traversal adapter expects.

use crate::args::Predicate;
use crate::value::Value;

/// Wrap an operation body with the filtering contract.
///
/// Evaluation order per element is fixed: `stop_when` first (a hit stops the
/// traversal and the element is never passed to the body, even if `when`
/// would have admitted it), then `when` (a miss skips silently), then the
/// body. Without either predicate the body always runs and nothing stops.
pub(crate) fn normalize_body<B>(
    when: Option<&Predicate>,
    stop_when: Option<&Predicate>,
    mut body: B,
) -> impl FnMut(&Value, &Value) -> bool
where
    B: FnMut(&Value, &Value),
{
    move |value, key| {
        if let Some(stop) = stop_when {
            if stop(value, key) {
                return true;
            }
        }
        match when {
            Some(pass) => {
                if pass(value, key) {
                    body(value, key);
                }
            }
            None => body(value, key),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        when: Option<&Predicate>,
        stop_when: Option<&Predicate>,
        inputs: &[i64],
    ) -> (Vec<i64>, usize) {
        let mut applied = Vec::new();
        let mut visited = 0;
        {
            let mut visitor = normalize_body(when, stop_when, |value: &Value, _: &Value| {
                applied.push(value.as_int().unwrap());
            });
            for n in inputs {
                visited += 1;
                if visitor(&Value::Int(*n), &Value::Int(0)) {
                    break;
                }
            }
        }
        (applied, visited)
    }

    #[test]
    fn test_no_predicates_applies_everything() {
        let (applied, visited) = run(None, None, &[1, 2, 3]);
        assert_eq!(applied, vec![1, 2, 3]);
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_when_only_skips_silently() {
        let even: &Predicate = &|v, _| v.as_int().unwrap() % 2 == 0;
        let (applied, visited) = run(Some(even), None, &[1, 2, 3, 4]);
        assert_eq!(applied, vec![2, 4]);
        assert_eq!(visited, 4);
    }

    #[test]
    fn test_stop_when_excludes_the_trigger() {
        let at_three: &Predicate = &|v, _| v.as_int().unwrap() == 3;
        let (applied, visited) = run(None, Some(at_three), &[1, 2, 3, 4]);
        assert_eq!(applied, vec![1, 2]);
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_stop_when_is_checked_before_when() {
        // The trigger element would pass `when`, but stop_when fires first.
        let even: &Predicate = &|v, _| v.as_int().unwrap() % 2 == 0;
        let at_four: &Predicate = &|v, _| v.as_int().unwrap() == 4;
        let (applied, _) = run(Some(even), Some(at_four), &[1, 2, 3, 4, 6]);
        assert_eq!(applied, vec![2]);
    }
}
