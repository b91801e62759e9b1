//! # Accessor Contract
//!
//! `Introspect` is THE contract between user types and the engines. It
//! replaces name-based getter/setter discovery with an explicit capability:
//! a type answers property reads by name, optionally exposes mutable slots,
//! and hands out its static [`TypeInfo`].
//!
//! Types that extend another type embed it and delegate unknown names to
//! it, which is how "search the ancestors" works:
//!
//! ```rust
//! use propkit::{Introspect, TypeInfo, Value, Result};
//!
//! static ANIMAL: TypeInfo = TypeInfo::new("zoo::Animal");
//! static DOG: TypeInfo = TypeInfo::new("zoo::Dog").extends(&ANIMAL);
//!
//! #[derive(Clone)]
//! struct Animal { name: String }
//! #[derive(Clone)]
//! struct Dog { animal: Animal, good: bool }
//!
//! impl Introspect for Animal {
//!     fn type_info(&self) -> &'static TypeInfo { &ANIMAL }
//!     fn property(&self, name: &str) -> Result<Option<Value>> {
//!         Ok(match name {
//!             "name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         })
//!     }
//!     fn clone_boxed(&self) -> Box<dyn Introspect> { Box::new(self.clone()) }
//! }
//!
//! impl Introspect for Dog {
//!     fn type_info(&self) -> &'static TypeInfo { &DOG }
//!     fn property(&self, name: &str) -> Result<Option<Value>> {
//!         match name {
//!             "good" => Ok(Some(self.good.into())),
//!             _ => self.animal.property(name),
//!         }
//!     }
//!     fn clone_boxed(&self) -> Box<dyn Introspect> { Box::new(self.clone()) }
//! }
//!
//! let dog = Dog { animal: Animal { name: "Rex".into() }, good: true };
//! assert_eq!(propkit::access::get_property(&dog, "name").unwrap(), Value::from("Rex"));
//! ```

use std::fmt;

use tracing::warn;

use crate::model::{TypeInfo, Value};
use crate::path::{ensure_not_blank, PropertyPath};
use crate::{repr, Error, Result};

// ============================================================================
// Introspect
// ============================================================================

pub trait Introspect: Send + Sync + 'static {
    /// Static descriptor of the runtime type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Read a property.
    ///
    /// `Ok(None)` means this type (and the types it embeds) has no such
    /// property. `Err` means the accessor exists but failed.
    fn property(&self, name: &str) -> Result<Option<Value>>;

    /// Mutable slot for a stored property, used to walk nested setter paths.
    fn property_mut(&mut self, _name: &str) -> Option<&mut Value> {
        None
    }

    /// Write a property. The default writes through [`Introspect::property_mut`].
    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        let type_name = self.type_info().name();
        match self.property_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::not_found(name, type_name)),
        }
    }

    fn clone_boxed(&self) -> Box<dyn Introspect>;
}

impl Clone for Box<dyn Introspect> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl fmt::Debug for dyn Introspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::to_string(self, &repr::default_string(self)))
    }
}

// ============================================================================
// Strict accessors
// ============================================================================

/// Read a single property, failing when no accessor exists.
pub fn get_property(obj: &dyn Introspect, name: &str) -> Result<Value> {
    ensure_not_blank(name, "property")?;
    match obj.property(name)? {
        Some(value) => Ok(value),
        None => {
            let type_name = obj.type_info().name();
            warn!(property = name, type_name, "no accessor found");
            Err(Error::not_found(name, type_name))
        }
    }
}

/// Write the property at a (possibly nested) path.
///
/// Intermediate segments must be stored objects or maps; the final segment
/// is written with [`Introspect::set_property`] or a map insert.
pub fn set_value(root: &mut dyn Introspect, path: &str, value: Value) -> Result<()> {
    let parsed = PropertyPath::parse(path)?;
    let (last, parents) = parsed.split_last();
    let Some((first, rest)) = parents.split_first() else {
        return root.set_property(last, value);
    };

    let type_name = root.type_info().name();
    let mut slot = root.property_mut(first).ok_or_else(|| {
        warn!(property = *first, type_name, path, "no mutable property on setter path");
        Error::not_found(first, type_name)
    })?;
    for segment in rest {
        slot = step_mut(slot, segment)?;
    }

    match slot {
        Value::Object(obj) => obj.set_property(last, value),
        Value::Map(map) => {
            map.insert(last.to_owned(), value);
            Ok(())
        }
        other => Err(Error::type_mismatch("OBJECT or MAP", other.type_name())),
    }
}

fn step_mut<'a>(slot: &'a mut Value, segment: &str) -> Result<&'a mut Value> {
    match slot {
        Value::Object(obj) => {
            let type_name = obj.type_info().name();
            obj.property_mut(segment).ok_or_else(|| Error::not_found(segment, type_name))
        }
        Value::Map(map) => map
            .get_mut(segment)
            .ok_or_else(|| Error::not_found(segment, "MAP")),
        other => Err(Error::type_mismatch("OBJECT or MAP", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{map_of, Record};

    static COUNTER: TypeInfo = TypeInfo::new("test::Counter");
    static HOLDER: TypeInfo = TypeInfo::new("test::Holder");

    /// Read-only type: no mutable slots.
    #[derive(Clone)]
    struct Counter {
        hits: i64,
        broken: bool,
    }

    impl Introspect for Counter {
        fn type_info(&self) -> &'static TypeInfo {
            &COUNTER
        }

        fn property(&self, name: &str) -> Result<Option<Value>> {
            match name {
                "hits" if self.broken => Err(Error::Access {
                    property: name.into(),
                    type_name: COUNTER.name().into(),
                    message: "counter offline".into(),
                }),
                "hits" => Ok(Some(self.hits.into())),
                _ => Ok(None),
            }
        }

        fn clone_boxed(&self) -> Box<dyn Introspect> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_get_property_found() {
        let counter = Counter { hits: 3, broken: false };
        assert_eq!(get_property(&counter, "hits").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_get_property_missing_is_not_found() {
        let counter = Counter { hits: 3, broken: false };
        let err = get_property(&counter, "misses").unwrap_err();
        assert!(matches!(err, Error::NotFound { ref property, .. } if property == "misses"));
    }

    #[test]
    fn test_get_property_blank_is_invalid() {
        let counter = Counter { hits: 3, broken: false };
        assert!(matches!(get_property(&counter, "  "), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_get_property_propagates_accessor_failure() {
        let counter = Counter { hits: 3, broken: true };
        assert!(matches!(get_property(&counter, "hits"), Err(Error::Access { .. })));
    }

    #[test]
    fn test_default_setter_is_not_found() {
        let mut counter = Counter { hits: 3, broken: false };
        let err = counter.set_property("hits", Value::Int(4)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_set_value_nested() {
        let inner = Record::new(&COUNTER).with_property("hits", 1);
        let mut holder = Record::new(&HOLDER)
            .with_property("counter", Value::object(inner))
            .with_property("meta", map_of([("owner", "ada")]));

        set_value(&mut holder, "counter.hits", Value::Int(9)).unwrap();
        set_value(&mut holder, "meta.owner", Value::from("grace")).unwrap();
        set_value(&mut holder, "label", Value::from("main")).unwrap();

        let root = Value::object(holder);
        assert_eq!(crate::path::resolve(&root, "counter.hits").unwrap(), Value::Int(9));
        assert_eq!(crate::path::resolve(&root, "meta.owner").unwrap(), Value::from("grace"));
        assert_eq!(crate::path::resolve(&root, "label").unwrap(), Value::from("main"));
    }

    #[test]
    fn test_set_value_missing_intermediate() {
        let mut holder = Record::new(&HOLDER);
        let err = set_value(&mut holder, "counter.hits", Value::Int(1)).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref property, .. } if property == "counter"));
    }

    #[test]
    fn test_set_value_through_scalar_is_mismatch() {
        let mut holder = Record::new(&HOLDER).with_property("count", 1);
        let err = set_value(&mut holder, "count.value", Value::Int(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
