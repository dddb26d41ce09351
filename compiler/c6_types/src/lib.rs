//! Machine-level types for the c6 IR.
//!
//! Types are referenced by [`TypeId`]. Primitive integer and float types
//! have fixed ids; pointer types are created on demand and interned, so two
//! requests for `*u64` return the same id and type equality is id equality.

mod flags;
mod id;
mod registry;

pub use flags::TypeFlags;
pub use id::TypeId;
pub use registry::{Primitive, SharedTypes, TypeInfo, TypeKind, TypeRegistry};
