//! # Property Path Resolution
//!
//! Evaluates property paths against a value tree:
//!
//! ```text
//! "group.owner.name"     dot path: one segment per step
//! "items.price"          broadcast: `items` is a list, `price` is read on every element
//! "[qty] x [price]"      template: see `template`
//! ```
//!
//! Each step looks at the current value:
//!
//! | Current value | Segment means |
//! |---------------|---------------|
//! | `Map` | key lookup, absent key is null |
//! | `List` / `Set` | read the segment on every element, collect a distinct ordered `Set` |
//! | `Object` | `Introspect::property` |
//! | `String` / `Bytes` | built-in `length`, `empty` (and `blank` for strings) |
//!
//! A null anywhere ends resolution with `Value::Null`. Missing or failing
//! accessors are logged and resolve to null; only malformed paths are errors.

pub mod template;

use smallvec::SmallVec;
use tracing::warn;

use crate::access::Introspect;
use crate::model::Value;
use crate::{Error, Result};

pub use template::{render, render_object, render_with_placeholder, ElementFormatter, NullPlaceholder};

// ============================================================================
// PropertyPath
// ============================================================================

/// A parsed dot path. Always has at least one segment; no segment is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath<'a> {
    segments: SmallVec<[&'a str; 4]>,
}

impl<'a> PropertyPath<'a> {
    pub fn parse(path: &'a str) -> Result<Self> {
        ensure_not_blank(path, "property path")?;
        let segments: SmallVec<[&'a str; 4]> = path.split('.').collect();
        if let Some(position) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "blank segment {position} in property path '{path}'"
            )));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// First segment and the continuation.
    pub fn split_first(&self) -> (&'a str, &[&'a str]) {
        (self.segments[0], &self.segments[1..])
    }

    /// Last segment and the segments leading to it.
    pub fn split_last(&self) -> (&'a str, &[&'a str]) {
        let last = self.segments.len() - 1;
        (self.segments[last], &self.segments[..last])
    }
}

/// Reject empty or whitespace-only text.
pub(crate) fn ensure_not_blank(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{what} should not be empty")));
    }
    Ok(())
}

/// Last segment of a dot path: `"a.b.c"` → `"c"`.
pub fn base_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Everything before the last segment: `"a.b.c"` → `Some("a.b")`.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind('.').map(|index| &path[..index])
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve `path` against `root`.
///
/// A path containing `[` is rendered as a template (nulls become `""`) and
/// comes back as `Value::String`.
pub fn resolve(root: &Value, path: &str) -> Result<Value> {
    if root.is_null() {
        return Ok(Value::Null);
    }
    if path.contains('[') {
        return render(root, path, &NullPlaceholder::default()).map(Value::String);
    }
    let parsed = PropertyPath::parse(path)?;
    Ok(resolve_segments(root, parsed.segments()))
}

/// Resolve `path` starting at an object, without boxing it into a `Value`.
pub fn property_value(obj: &dyn Introspect, path: &str) -> Result<Value> {
    if path.contains('[') {
        return render_object(obj, path, &NullPlaceholder::default()).map(Value::String);
    }
    let parsed = PropertyPath::parse(path)?;
    let (head, rest) = parsed.split_first();
    Ok(continue_from(object_property(obj, head), rest))
}

/// Multi-valued resolution: the elements of a collection result, nothing
/// for null, or the single value.
pub fn resolve_all(root: &Value, path: &str) -> Result<Vec<Value>> {
    Ok(match resolve(root, path)? {
        Value::Null => Vec::new(),
        Value::List(items) | Value::Set(items) => items,
        single => vec![single],
    })
}

/// Resolve `path` on every element of a collection, one result per element.
///
/// Unlike broadcast resolution nothing is deduplicated. A null collection
/// gives an empty vector.
pub fn collect_properties(collection: &Value, path: &str) -> Result<Vec<Value>> {
    match collection {
        Value::Null => Ok(Vec::new()),
        Value::List(items) | Value::Set(items) => {
            items.iter().map(|item| resolve(item, path)).collect()
        }
        other => Err(Error::type_mismatch("LIST or SET", other.type_name())),
    }
}

fn resolve_segments(root: &Value, segments: &[&str]) -> Value {
    match segments.split_first() {
        None => root.clone(),
        Some((head, rest)) => continue_from(segment_value(root, head), rest),
    }
}

fn continue_from(value: Value, rest: &[&str]) -> Value {
    if rest.is_empty() || value.is_null() {
        value
    } else {
        resolve_segments(&value, rest)
    }
}

fn segment_value(root: &Value, segment: &str) -> Value {
    match root {
        Value::Null => Value::Null,
        Value::Map(map) => map.get(segment).cloned().unwrap_or(Value::Null),
        Value::List(items) | Value::Set(items) => Value::ordered_set(
            items.iter().map(|item| segment_value(item, segment)),
        ),
        Value::Object(obj) => object_property(obj.as_ref(), segment),
        scalar => builtin_property(scalar, segment),
    }
}

fn object_property(obj: &dyn Introspect, segment: &str) -> Value {
    match obj.property(segment) {
        Ok(Some(value)) => value,
        Ok(None) => {
            warn!(property = segment, type_name = obj.type_info().name(), "no accessor found, resolving to null");
            Value::Null
        }
        Err(err) => {
            warn!(property = segment, type_name = obj.type_info().name(), error = %err, "accessor failed, resolving to null");
            Value::Null
        }
    }
}

fn builtin_property(scalar: &Value, segment: &str) -> Value {
    match (scalar, segment) {
        (Value::String(s), "length") => Value::Int(s.chars().count() as i64),
        (Value::String(s), "empty") => Value::Bool(s.is_empty()),
        (Value::String(s), "blank") => Value::Bool(s.trim().is_empty()),
        (Value::Bytes(b), "length") => Value::Int(b.len() as i64),
        (Value::Bytes(b), "empty") => Value::Bool(b.is_empty()),
        _ => {
            warn!(property = segment, type_name = scalar.type_name(), "no accessor found, resolving to null");
            Value::Null
        }
    }
}
