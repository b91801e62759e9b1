//! # Per-type Configuration Cache
//!
//! Folds the identity and representation declarations along a type's parent
//! chain into flat property lists, once per type.
//!
//! ## Inheritance
//!
//! | Declaration | `inherit = true` | `inherit = false` |
//! |-------------|------------------|-------------------|
//! | Identity | parent's list, then own | own only |
//! | Representation | own, then parent's list | own only |
//!
//! A type without a direct declaration takes its parent's resolved list.
//! The representation style comes from the nearest declaration (self,
//! interfaces, then parents) regardless of `inherit`; none at all means
//! `ReprStyle::Default`.
//!
//! ## Lifetime
//!
//! Entries are never evicted. Declarations are `'static`, so a cached entry
//! can never go stale. Concurrent misses on the same type may both compute;
//! the first insert wins and everyone gets that `Arc`.

use std::sync::{Arc, LazyLock};

use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::model::{ReprStyle, TypeInfo};

static GLOBAL: LazyLock<ConfigCache> = LazyLock::new(ConfigCache::new);

// ============================================================================
// Resolved configurations
// ============================================================================

/// Flattened identity properties of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityConfig {
    properties: Vec<&'static str>,
}

impl IdentityConfig {
    pub fn properties(&self) -> &[&'static str] {
        &self.properties
    }

    /// Opted out of identity: equality is always false, the hash is 0.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Flattened representation properties and style of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReprConfig {
    properties: Vec<&'static str>,
    style: ReprStyle,
}

impl ReprConfig {
    pub fn properties(&self) -> &[&'static str] {
        &self.properties
    }

    pub fn style(&self) -> ReprStyle {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// ============================================================================
// ConfigCache
// ============================================================================

/// Memoized configurations keyed by type name.
#[derive(Default)]
pub struct ConfigCache {
    identity: RwLock<HashMap<&'static str, Arc<IdentityConfig>>>,
    representation: RwLock<HashMap<&'static str, Arc<ReprConfig>>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache the engines use.
    pub fn global() -> &'static ConfigCache {
        &GLOBAL
    }

    pub fn identity_properties_of(&self, ty: &'static TypeInfo) -> Arc<IdentityConfig> {
        if let Some(hit) = self.identity.read().get(ty.name()) {
            return Arc::clone(hit);
        }
        let computed = Arc::new(IdentityConfig { properties: identity_properties(Some(ty)) });
        debug!(type_name = ty.name(), properties = ?computed.properties, "identity config resolved");
        Arc::clone(self.identity.write().entry(ty.name()).or_insert(computed))
    }

    pub fn representation_config_of(&self, ty: &'static TypeInfo) -> Arc<ReprConfig> {
        if let Some(hit) = self.representation.read().get(ty.name()) {
            return Arc::clone(hit);
        }
        let computed = Arc::new(ReprConfig {
            properties: representation_properties(Some(ty)),
            style: representation_style(ty),
        });
        debug!(
            type_name = ty.name(),
            properties = ?computed.properties,
            style = ?computed.style,
            "representation config resolved"
        );
        Arc::clone(self.representation.write().entry(ty.name()).or_insert(computed))
    }

    /// Number of types with a cached identity config.
    pub fn identity_len(&self) -> usize {
        self.identity.read().len()
    }

    /// Number of types with a cached representation config.
    pub fn representation_len(&self) -> usize {
        self.representation.read().len()
    }
}

/// Identity config from the process-wide cache.
pub fn identity_properties_of(ty: &'static TypeInfo) -> Arc<IdentityConfig> {
    GLOBAL.identity_properties_of(ty)
}

/// Representation config from the process-wide cache.
pub fn representation_config_of(ty: &'static TypeInfo) -> Arc<ReprConfig> {
    GLOBAL.representation_config_of(ty)
}

// ============================================================================
// Hierarchy folding (uncached)
// ============================================================================

/// Identity properties of `ty`, ancestors first.
pub fn identity_properties(ty: Option<&TypeInfo>) -> Vec<&'static str> {
    let Some(ty) = ty else { return Vec::new() };
    match ty.declared_identity() {
        None => identity_properties(ty.parent()),
        Some(decl) if decl.inherit => {
            let mut properties = identity_properties(ty.parent());
            properties.extend_from_slice(decl.properties);
            properties
        }
        Some(decl) => decl.properties.to_vec(),
    }
}

/// Representation properties of `ty`, own properties first.
pub fn representation_properties(ty: Option<&TypeInfo>) -> Vec<&'static str> {
    let Some(ty) = ty else { return Vec::new() };
    match ty.declared_representation() {
        None => representation_properties(ty.parent()),
        Some(decl) if decl.inherit => {
            let mut properties = decl.properties.to_vec();
            properties.extend(representation_properties(ty.parent()));
            properties
        }
        Some(decl) => decl.properties.to_vec(),
    }
}

pub fn representation_style(ty: &TypeInfo) -> ReprStyle {
    ty.find_representation().map(|decl| decl.style).unwrap_or_default()
}
