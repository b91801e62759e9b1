//! Dynamic value type produced and consumed by path resolution.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::access::Introspect;
use crate::{identity, repr, Error, Result};
use super::PropertyMap;

/// A value reachable from a root object.
///
/// Covers:
/// - Scalars: Null, Bool, Int, Float, String, Bytes
/// - Containers: List, Set, Map
/// - Temporal: Date, DateTime
/// - Objects: anything implementing [`Introspect`]
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// Distinct values in first-seen order. Produced by broadcast resolution.
    Set(Vec<Value>),
    Map(PropertyMap),

    // Temporal types
    Date(NaiveDate),
    DateTime(DateTime<Utc>),

    Object(Box<dyn Introspect>),
}

// ============================================================================
// Construction & type checking
// ============================================================================

impl Value {
    /// Box an introspectable object.
    pub fn object(obj: impl Introspect) -> Self {
        Value::Object(Box::new(obj))
    }

    /// Build a `Set`, collapsing structurally equal values onto the first one seen.
    pub fn ordered_set(items: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = items.into_iter().collect();
        let mut keep = vec![false; items.len()];
        for index in first_occurrences(&items) {
            keep[index] = true;
        }
        Value::Set(items.into_iter().zip(keep).filter_map(|(item, kept)| kept.then_some(item)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::List(_) => "LIST",
            Value::Set(_) => "SET",
            Value::Map(_) => "MAP",
            Value::Date(_) => "DATE",
            Value::DateTime(_) => "DATETIME",
            Value::Object(_) => "OBJECT",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    /// Elements of a `List` or `Set`.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for Value {
            fn from(v: $source) -> Self { Value::$variant(v.into()) }
        })*
    };
}

value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    String => String,
    &str => String,
    NaiveDate => Date,
    DateTime<Utc> => DateTime,
    PropertyMap => Map,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display (natural string form)
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part: 10.0, not 10
            Value::Float(v) => write!(f, "{v:?}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<bytes[{}]>", b.len()),
            Value::List(items) | Value::Set(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                let mut entries: Vec<_> = m.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{{")?;
                for (i, (k, v)) in entries.into_iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}={v}")?;
                }
                write!(f, "}}")
            }
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Object(obj) => {
                let obj = obj.as_ref();
                f.write_str(&repr::to_string(obj, &repr::default_string(obj)))
            }
        }
    }
}

// ============================================================================
// Structural equality
// ============================================================================

impl Value {
    /// Per-type structural equality.
    ///
    /// `Int` never equals `Float`. NaN equals NaN, `0.0` does not equal `-0.0`.
    /// Sets and maps ignore order, and sets ignore repeats. Objects compare through their identity
    /// declaration, so an object without one equals nothing.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Set(a), Value::Set(b)) => contains_all(a, b) && contains_all(b, a),
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.structural_eq(w)))
            }
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => identity::equals(a.as_ref(), Some(b.as_ref())),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

// ============================================================================
// Stable hashing
// ============================================================================

impl Value {
    /// Hash that is stable across calls and processes, consistent with
    /// [`Value::structural_eq`].
    pub fn stable_hash(&self) -> i32 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => if *b { 1231 } else { 1237 },
            Value::Int(i) => fold64(*i as u64),
            Value::Float(f) => fold64(float_bits(*f)),
            Value::String(s) => string_hash(s),
            Value::Bytes(bytes) => bytes
                .iter()
                .fold(1i32, |h, b| h.wrapping_mul(31).wrapping_add(i32::from(*b as i8))),
            Value::List(items) => items
                .iter()
                .fold(1i32, |h, v| h.wrapping_mul(31).wrapping_add(v.stable_hash())),
            Value::Set(items) => first_occurrences(items)
                .into_iter()
                .fold(0i32, |h, index| h.wrapping_add(items[index].stable_hash())),
            Value::Map(map) => map
                .iter()
                .fold(0i32, |h, (k, v)| h.wrapping_add(string_hash(k) ^ v.stable_hash())),
            Value::Date(d) => fold64(d.num_days_from_ce() as u64),
            Value::DateTime(dt) => fold64(dt.timestamp_millis() as u64),
            Value::Object(obj) => identity::hash_code(obj.as_ref()),
        }
    }
}

fn contains_all(haystack: &[Value], needles: &[Value]) -> bool {
    needles.iter().all(|x| haystack.iter().any(|y| x.structural_eq(y)))
}

/// Index of the first occurrence of each structurally distinct value, in
/// order. Values are bucketed by `stable_hash`; only a bucket is scanned.
fn first_occurrences(items: &[Value]) -> Vec<usize> {
    let mut buckets: HashMap<i32, SmallVec<[usize; 1]>> = HashMap::new();
    let mut firsts = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let bucket = buckets.entry(item.stable_hash()).or_default();
        if !bucket.iter().any(|&seen| items[seen].structural_eq(item)) {
            bucket.push(index);
            firsts.push(index);
        }
    }
    firsts
}

/// 31-polynomial over UTF-16 code units.
pub(crate) fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn fold64(bits: u64) -> i32 {
    (bits ^ (bits >> 32)) as i32
}

/// Bit pattern with every NaN collapsed onto the canonical one.
fn float_bits(f: f64) -> u64 {
    if f.is_nan() { f64::NAN.to_bits() } else { f.to_bits() }
}

// ============================================================================
// Natural ordering
// ============================================================================

impl Value {
    /// Natural ordering between two values of the same kind. Null sorts first.
    ///
    /// Values of different kinds, and kinds without a natural order (lists,
    /// sets, maps), are a type mismatch rather than an arbitrary ordering.
    pub fn natural_cmp(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Less),
            (_, Value::Null) => Ok(Ordering::Greater),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(a.total_cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Ok(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Ok(a.cmp(b)),
            (Value::Object(a), Value::Object(b)) => identity::compare_to(a.as_ref(), Some(b.as_ref())),
            (a, b) if a.type_name() == b.type_name() => {
                Err(Error::type_mismatch("a naturally ordered value", a.type_name()))
            }
            (a, b) => Err(Error::type_mismatch(a.type_name(), b.type_name())),
        }
    }
}
