//! Type handle.

use std::fmt;

/// A 32-bit index into a [`TypeRegistry`](crate::TypeRegistry).
///
/// Primitives occupy the first indices in a fixed order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const I8: Self = Self(0);
    pub const U8: Self = Self(1);
    pub const I16: Self = Self(2);
    pub const U16: Self = Self(3);
    pub const I32: Self = Self(4);
    pub const U32: Self = Self(5);
    pub const I64: Self = Self(6);
    pub const U64: Self = Self(7);
    pub const F32: Self = Self(8);
    pub const F64: Self = Self(9);
    /// Result of comparisons and condition of `branch`.
    pub const BOOL: Self = Self(10);

    /// Number of pre-registered primitive types.
    pub const PRIMITIVE_COUNT: u32 = 11;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
