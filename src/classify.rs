// src/classify.rs
//! Container shape classification.
//!
//! Every public operation resolves the source's shape once per call through
//! [`classify`]; nothing is cached across calls. Dispatch downstream is an
//! exhaustive match on [`ContainerKind`].

use crate::value::Value;

/// The shape a runtime value presents to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Null/missing: traversal is a no-op.
    Absent,
    /// Index-addressable with a length; visited `0..len` ascending.
    Sequential,
    /// String-keyed mapping; visited in insertion order.
    Keyed,
    /// Ordered key/value store with unrestricted keys.
    MapLike,
    /// Ordered unique values; the key of each element is the element.
    SetLike,
    /// Pull-based external sequence; the key of each element is the element.
    ExternalIterable,
    /// Anything else: traversal fails with `UnsupportedSourceType`.
    Unsupported,
}

impl ContainerKind {
    /// Kinds the deep traversal layer recurses into.
    pub fn is_nestable(self) -> bool {
        matches!(
            self,
            ContainerKind::Sequential
                | ContainerKind::Keyed
                | ContainerKind::MapLike
                | ContainerKind::SetLike
        )
    }

    /// Kinds that can be rebuilt shape-for-shape by `map`/`deep_map`.
    pub fn is_mappable(self) -> bool {
        matches!(self, ContainerKind::Sequential | ContainerKind::Keyed)
    }
}

/// Classify a value into exactly one container kind.
pub fn classify(value: &Value) -> ContainerKind {
    match value {
        Value::Absent => ContainerKind::Absent,
        Value::List(_) => ContainerKind::Sequential,
        Value::Record(_) => ContainerKind::Keyed,
        Value::Map(_) => ContainerKind::MapLike,
        Value::Set(_) => ContainerKind::SetLike,
        Value::Sequence(_) => ContainerKind::ExternalIterable,
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => {
            ContainerKind::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_kind() {
        assert_eq!(classify(&Value::Absent), ContainerKind::Absent);
        assert_eq!(classify(&Value::list([])), ContainerKind::Sequential);
        assert_eq!(
            classify(&Value::record([("a", Value::Int(1))])),
            ContainerKind::Keyed
        );
        assert_eq!(classify(&Value::map([])), ContainerKind::MapLike);
        assert_eq!(classify(&Value::set([])), ContainerKind::SetLike);
        assert_eq!(
            classify(&Value::sequence(|| None)),
            ContainerKind::ExternalIterable
        );
        assert_eq!(classify(&Value::Int(1)), ContainerKind::Unsupported);
        assert_eq!(classify(&Value::from("x")), ContainerKind::Unsupported);
    }

    #[test]
    fn test_nestable_excludes_external_sequences() {
        assert!(ContainerKind::Sequential.is_nestable());
        assert!(ContainerKind::Keyed.is_nestable());
        assert!(ContainerKind::MapLike.is_nestable());
        assert!(ContainerKind::SetLike.is_nestable());
        assert!(!ContainerKind::ExternalIterable.is_nestable());
        assert!(!ContainerKind::Absent.is_nestable());
    }

    #[test]
    fn test_mappable_is_sequential_or_keyed_only() {
        assert!(ContainerKind::Sequential.is_mappable());
        assert!(ContainerKind::Keyed.is_mappable());
        assert!(!ContainerKind::MapLike.is_mappable());
        assert!(!ContainerKind::SetLike.is_mappable());
    }
}
