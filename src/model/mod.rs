//! # Object Model
//!
//! The value universe the resolver walks, and the static type descriptors
//! that carry identity/representation declarations.
//!
//! Design rule: this module is pure data. No caching, no logging; the
//! engines in `config`, `identity` and `repr` consume it.

pub mod value;
pub mod property_map;
pub mod type_info;
pub mod record;
pub mod json;

pub use value::Value;
pub use property_map::{PropertyMap, map_of};
pub use type_info::{TypeInfo, IdentityDecl, ReprDecl, ReprStyle};
pub use record::Record;
