//! Identity engine: equality, hashing and ordering from identity declarations.
//!
//! All three read the type's identity properties from the config cache and
//! resolve each one as a property path on both instances. An empty property
//! list opts the type out: nothing is equal to it, its hash is 0.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::access::Introspect;
use crate::config::identity_properties_of;
use crate::model::Value;
use crate::path::property_value;
use crate::{repr, Error, Result};

const HASH_SEED: i32 = 17;
const HASH_MULTIPLIER: i32 = 37;

/// Structural equality over identity properties.
///
/// False when `other` is `None`, when `other` is not of `this`'s type (or a
/// subtype), or when `this`'s type declares no identity properties. A
/// property that fails to resolve counts as a mismatch.
pub fn equals(this: &dyn Introspect, other: Option<&dyn Introspect>) -> bool {
    let Some(other) = other else { return false };
    if !this.type_info().is_assignable_from(other.type_info()) {
        return false;
    }
    let config = identity_properties_of(this.type_info());
    if config.is_empty() {
        return false;
    }
    config.properties().iter().filter(|p| !p.is_empty()).all(|property| {
        match (property_value(this, property), property_value(other, property)) {
            (Ok(a), Ok(b)) => a.structural_eq(&b),
            (Err(err), _) | (_, Err(err)) => {
                warn!(property, type_name = this.type_info().name(), error = %err, "identity property failed to resolve");
                false
            }
        }
    })
}

/// Order-sensitive fold of the identity values: `h = h * 37 + hash(v)`,
/// starting from 17. Returns 0 when no identity properties are declared.
pub fn hash_code(this: &dyn Introspect) -> i32 {
    let config = identity_properties_of(this.type_info());
    if config.is_empty() {
        return 0;
    }
    config
        .properties()
        .iter()
        .filter(|p| !p.is_empty())
        .fold(HASH_SEED, |hash, property| {
            let value = property_value(this, property).unwrap_or_else(|err| {
                warn!(property, type_name = this.type_info().name(), error = %err, "identity property failed to resolve, hashing as null");
                Value::Null
            });
            hash.wrapping_mul(HASH_MULTIPLIER).wrapping_add(value.stable_hash())
        })
}

/// Compare identity values in declaration order; the first difference wins.
///
/// `None` sorts before everything. An unrelated runtime type, or a pair of
/// values without a natural order between them, is a `TypeMismatch`.
pub fn compare_to(this: &dyn Introspect, other: Option<&dyn Introspect>) -> Result<Ordering> {
    let Some(other) = other else { return Ok(Ordering::Greater) };
    if !this.type_info().is_assignable_from(other.type_info()) {
        return Err(Error::type_mismatch(this.type_info().name(), other.type_info().name()));
    }
    let config = identity_properties_of(this.type_info());
    for property in config.properties().iter().filter(|p| !p.is_empty()) {
        let ours = property_value(this, property)?;
        let theirs = property_value(other, property)?;
        match ours.natural_cmp(&theirs)? {
            Ordering::Equal => continue,
            decided => return Ok(decided),
        }
    }
    Ok(Ordering::Equal)
}

/// Resolved identity values, in declaration order.
pub fn identity_values(this: &dyn Introspect) -> Result<Vec<Value>> {
    identity_properties_of(this.type_info())
        .properties()
        .iter()
        .filter(|p| !p.is_empty())
        .map(|property| property_value(this, property))
        .collect()
}

// ============================================================================
// Identified<T>
// ============================================================================

/// Wrapper giving an introspectable type `PartialEq`, `Hash`, `PartialOrd`,
/// `Display` and `Debug` from its declarations.
///
/// Not `Eq`: a type without identity properties is unequal to itself.
#[derive(Clone, Default)]
pub struct Identified<T>(pub T);

impl<T> Deref for Identified<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.0 }
}

impl<T> DerefMut for Identified<T> {
    fn deref_mut(&mut self) -> &mut T { &mut self.0 }
}

impl<T: Introspect> PartialEq for Identified<T> {
    fn eq(&self, other: &Self) -> bool {
        equals(&self.0, Some(&other.0))
    }
}

impl<T: Introspect> Hash for Identified<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_code(&self.0).hash(state);
    }
}

impl<T: Introspect> PartialOrd for Identified<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match compare_to(&self.0, Some(&other.0)).ok()? {
            // Keep `partial_cmp == Equal` in step with `eq`.
            Ordering::Equal if !self.eq(other) => None,
            ordering => Some(ordering),
        }
    }
}

impl<T: Introspect> fmt::Display for Identified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::to_string(&self.0, &repr::default_string(&self.0)))
    }
}

impl<T: Introspect> fmt::Debug for Identified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
