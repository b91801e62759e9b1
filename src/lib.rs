//! # propkit: Property Paths, Identity and Representation
//!
//! Resolve dotted/bracketed property paths against dynamic object graphs,
//! and derive `equals` / `hash_code` / `compare_to` / `to_string` from
//! per-type declarations instead of hand-written boilerplate.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Introspect` is the contract between the engines and user types
//! 2. **Static metadata**: every type hands out a `'static TypeInfo` descriptor;
//!    declarations (identity, representation) hang off it
//! 3. **Resolve once**: per-type configuration is computed lazily and cached
//!    for the life of the process
//! 4. **Strict identity, lenient display**: ordering errors propagate,
//!    representation degrades to `<null>`
//!
//! ## Quick Start
//!
//! ```rust
//! use propkit::{Record, TypeInfo, IdentityDecl, ReprDecl, Value, identity, path, repr};
//!
//! static GROUP: TypeInfo = TypeInfo::new("acme::Group");
//! static USER: TypeInfo = TypeInfo::new("acme::User")
//!     .identity(IdentityDecl::new(&["login"]))
//!     .representation(ReprDecl::new(&["login", "group.name"]));
//!
//! let user = Record::new(&USER)
//!     .with_property("login", "ada")
//!     .with_property("group", Value::object(Record::new(&GROUP).with_property("name", "admins")));
//!
//! let root = Value::object(user.clone());
//! assert_eq!(path::resolve(&root, "group.name").unwrap(), Value::from("admins"));
//! assert!(identity::equals(&user, Some(&user)));
//! assert_eq!(repr::to_string(&user, "?"), "User[login=ada,group.name=admins]");
//! ```
//!
//! ## Path Syntax
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | Dot path | `group.owner.name` | follow properties, map keys, broadcast over collections |
//! | Template | `[price]-[tax]` | render each bracketed dot path, keep the literals before each bracket |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod access;
pub mod path;
pub mod config;
pub mod identity;
pub mod repr;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Value, PropertyMap, Record,
    TypeInfo, IdentityDecl, ReprDecl, ReprStyle,
};

// ============================================================================
// Re-exports: Access, Paths, Configuration
// ============================================================================

pub use access::Introspect;
pub use path::{PropertyPath, ElementFormatter, NullPlaceholder};
pub use config::{ConfigCache, IdentityConfig, ReprConfig};
pub use identity::Identified;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: no accessor for property '{property}' on {type_name}")]
    NotFound { property: String, type_name: String },

    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Accessor error on {type_name}.{property}: {message}")]
    Access { property: String, type_name: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(property: &str, type_name: &str) -> Self {
        Error::NotFound { property: property.to_owned(), type_name: type_name.to_owned() }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::TypeMismatch { expected: expected.into(), got: got.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
