// src/value.rs
//! The dynamic value model.
//!
//! Every source the engine traverses is a [`Value`]. Containers are
//! reference-counted so a caller-supplied accumulator seed is mutated in
//! place and handed back by reference, not copied. Scalars compare
//! structurally (floats SameValueZero-style); aggregate containers compare
//! by content; lazy sequences compare by identity.

use std::cell::RefCell;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use crate::collections::{OrderedMap, OrderedSet};

/// Reference-counted list storage.
pub type RcList = Rc<RefCell<Vec<Value>>>;
/// Reference-counted string-keyed record storage.
pub type RcRecord = Rc<RefCell<OrderedMap<Rc<str>, Value>>>;
/// Reference-counted value-keyed map storage.
pub type RcMap = Rc<RefCell<OrderedMap<Value, Value>>>;
/// Reference-counted unique-value set storage.
pub type RcSet = Rc<RefCell<OrderedSet<Value>>>;
/// Reference-counted lazy sequence storage.
pub type RcSequence = Rc<RefCell<Sequence>>;

/// A pull-based, possibly lazy, external sequence.
pub struct Sequence {
    next: Box<dyn FnMut() -> Option<Value>>,
}

impl Sequence {
    pub fn new(next: impl FnMut() -> Option<Value> + 'static) -> Self {
        Self {
            next: Box::new(next),
        }
    }

    pub fn from_iter(iter: impl IntoIterator<Item = Value, IntoIter: 'static>) -> Self {
        let mut iter = iter.into_iter();
        Self::new(move || iter.next())
    }

    /// Pull the next value, or `None` when exhausted.
    pub fn pull(&mut self) -> Option<Value> {
        (self.next)()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sequence")
    }
}

/// A runtime value: a scalar, a container, or nothing at all.
#[derive(Clone, Debug)]
pub enum Value {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(RcList),
    Record(RcRecord),
    Map(RcMap),
    Set(RcSet),
    Sequence(RcSequence),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn record<K: Into<Rc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Record(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Value {
        Value::Map(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Set(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn sequence(next: impl FnMut() -> Option<Value> + 'static) -> Value {
        Value::Sequence(Rc::new(RefCell::new(Sequence::new(next))))
    }

    /// A lazy sequence over an existing iterator.
    pub fn sequence_from(iter: impl IntoIterator<Item = Value, IntoIter: 'static>) -> Value {
        Value::Sequence(Rc::new(RefCell::new(Sequence::from_iter(iter))))
    }

    /// Runtime type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<Rc<str>> {
        match self {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Element count for eager containers, `None` for everything else.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(list) => Some(list.borrow().len()),
            Value::Record(record) => Some(record.borrow().len()),
            Value::Map(map) => Some(map.borrow().len()),
            Value::Set(set) => Some(set.borrow().len()),
            _ => None,
        }
    }

    /// Coerce this value to a record key string.
    pub fn to_key(&self) -> Rc<str> {
        match self {
            Value::Str(s) => s.clone(),
            other => Rc::from(other.to_string().as_str()),
        }
    }
}

// NaN compares equal to itself and -0.0 to 0.0, so float keys behave sanely
// in maps and sets.
fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn float_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0_f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Sequence(a), Value::Sequence(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Absent => state.write_u8(0),
            Value::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Int(n) => {
                state.write_u8(2);
                n.hash(state);
            }
            Value::Float(f) => {
                state.write_u8(3);
                state.write_u64(float_bits(*f));
            }
            Value::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            }
            Value::List(list) => {
                state.write_u8(5);
                for item in list.borrow().iter() {
                    item.hash(state);
                }
            }
            // Map-shaped containers compare order-independently, so their
            // hash must be an order-independent combination too.
            Value::Record(record) => {
                state.write_u8(6);
                let record = record.borrow();
                let mut combined: u64 = 0;
                for (key, item) in record.iter() {
                    let mut entry = DefaultHasher::new();
                    key.hash(&mut entry);
                    item.hash(&mut entry);
                    combined = combined.wrapping_add(entry.finish());
                }
                state.write_u64(combined);
            }
            Value::Map(map) => {
                state.write_u8(7);
                let map = map.borrow();
                let mut combined: u64 = 0;
                for (key, item) in map.iter() {
                    let mut entry = DefaultHasher::new();
                    key.hash(&mut entry);
                    item.hash(&mut entry);
                    combined = combined.wrapping_add(entry.finish());
                }
                state.write_u64(combined);
            }
            Value::Set(set) => {
                state.write_u8(8);
                let set = set.borrow();
                let mut combined: u64 = 0;
                for item in set.iter() {
                    combined = combined.wrapping_add(hash_of(item));
                }
                state.write_u64(combined);
            }
            Value::Sequence(seq) => {
                state.write_u8(9);
                state.write_usize(Rc::as_ptr(seq) as *const () as usize);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("absent"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (i, (key, item)) in record.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
            Value::Set(set) => {
                f.write_str("{")?;
                for (i, item) in set.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Value::Sequence(_) => f.write_str("<sequence>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s.as_str()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}
