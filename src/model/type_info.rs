//! Static type descriptors and the declarations attached to them.
//!
//! A `TypeInfo` stands in for a class: it has a stable qualified name, an
//! optional parent, a list of interfaces, and optional identity and
//! representation declarations. Descriptors are built in `const` context:
//!
//! ```rust
//! use propkit::{TypeInfo, IdentityDecl, ReprDecl, ReprStyle};
//!
//! static PARTY: TypeInfo = TypeInfo::new("crm::Party")
//!     .identity(IdentityDecl::new(&["id"]));
//! static PERSON: TypeInfo = TypeInfo::new("crm::Person")
//!     .extends(&PARTY)
//!     .representation(ReprDecl::new(&["name"]).style(ReprStyle::MultiLine));
//!
//! assert!(PARTY.is_assignable_from(&PERSON));
//! assert_eq!(PERSON.short_name(), "Person");
//! ```

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// Representation style
// ============================================================================

/// How the representation engine lays out `name=value` pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReprStyle {
    /// `acme::User@7f3a[login=ada,age=3]`
    #[default]
    Default,
    /// One pair per line, indented by two spaces.
    MultiLine,
    /// `acme::User@7f3a[ada,3]`
    NoFieldNames,
    /// `User[login=ada,age=3]`
    ShortPrefix,
    /// `ada,3`
    Simple,
}

// ============================================================================
// Declarations
// ============================================================================

/// Identity declaration: the properties equality, hashing and ordering use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityDecl {
    pub properties: &'static [&'static str],
    /// Prepend the parent's identity properties.
    pub inherit: bool,
}

impl IdentityDecl {
    pub const fn new(properties: &'static [&'static str]) -> Self {
        Self { properties, inherit: true }
    }

    pub const fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

/// Representation declaration: the properties rendered by `repr::to_string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReprDecl {
    pub properties: &'static [&'static str],
    pub style: ReprStyle,
    /// Append the parent's representation properties.
    pub inherit: bool,
}

impl ReprDecl {
    /// Declaration with the `ShortPrefix` style.
    pub const fn new(properties: &'static [&'static str]) -> Self {
        Self { properties, style: ReprStyle::ShortPrefix, inherit: true }
    }

    pub const fn style(mut self, style: ReprStyle) -> Self {
        self.style = style;
        self
    }

    pub const fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

// ============================================================================
// TypeInfo
// ============================================================================

/// Static descriptor of a runtime type.
///
/// The name is the stable type identifier: the configuration cache is keyed
/// by it, so two descriptors must never share a name.
#[derive(Debug)]
pub struct TypeInfo {
    name: &'static str,
    parent: Option<&'static TypeInfo>,
    interfaces: &'static [&'static TypeInfo],
    identity: Option<IdentityDecl>,
    representation: Option<ReprDecl>,
}

impl TypeInfo {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            interfaces: &[],
            identity: None,
            representation: None,
        }
    }

    pub const fn extends(mut self, parent: &'static TypeInfo) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Interfaces (or marker types) whose representation declaration is
    /// visible to this type when it declares none itself. Keep the list in
    /// its own `static` so the reference is `'static`.
    pub const fn implements(mut self, interfaces: &'static [&'static TypeInfo]) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub const fn identity(mut self, decl: IdentityDecl) -> Self {
        self.identity = Some(decl);
        self
    }

    pub const fn representation(mut self, decl: ReprDecl) -> Self {
        self.representation = Some(decl);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name without its module path: `acme::model::User` → `User`.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent
    }

    pub fn interfaces(&self) -> &'static [&'static TypeInfo] {
        self.interfaces
    }

    /// Identity declared on this type itself, ignoring ancestors.
    pub fn declared_identity(&self) -> Option<&IdentityDecl> {
        self.identity.as_ref()
    }

    /// Representation declared on this type itself, ignoring ancestors.
    pub fn declared_representation(&self) -> Option<&ReprDecl> {
        self.representation.as_ref()
    }

    /// Nearest representation declaration: this type, then its interfaces
    /// (depth-first), then the parent chain.
    pub fn find_representation(&self) -> Option<&ReprDecl> {
        let mut visited = HashSet::new();
        self.find_representation_in(&mut visited)
    }

    fn find_representation_in(&self, visited: &mut HashSet<&'static str>) -> Option<&ReprDecl> {
        if !visited.insert(self.name) {
            return None;
        }
        if let Some(decl) = self.declared_representation() {
            return Some(decl);
        }
        for ifc in self.interfaces {
            if let Some(decl) = ifc.find_representation_in(visited) {
                return Some(decl);
            }
        }
        self.parent.and_then(|parent| parent.find_representation_in(visited))
    }

    /// This type followed by its parent chain.
    pub fn lineage(&self) -> impl Iterator<Item = &TypeInfo> {
        std::iter::successors(Some(self), |ty| ty.parent.map(|p| p as &TypeInfo))
    }

    /// Whether an instance of `other` may stand where `self` is expected:
    /// `other` is `self`, extends it, or implements it.
    pub fn is_assignable_from(&self, other: &TypeInfo) -> bool {
        let mut visited = HashSet::new();
        self.is_supertype_of(other, &mut visited)
    }

    fn is_supertype_of(&self, other: &TypeInfo, visited: &mut HashSet<&'static str>) -> bool {
        if !visited.insert(other.name) {
            return false;
        }
        other.name == self.name
            || other
                .interfaces
                .iter()
                .chain(other.parent.iter())
                .any(|ty| self.is_supertype_of(ty, visited))
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeInfo {}
