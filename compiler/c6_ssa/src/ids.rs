//! Index handles into a [`Function`](crate::Function) or [`Module`](crate::Module).

use std::fmt;

/// Define a `u32` index newtype with `new`/`raw`/`index` and a short
/// `Display` form (`%3`, `bb1`, `@0`).
macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident => $prefix:literal),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
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

            /// Handle for the element at `index` of a `Vec`.
            #[track_caller]
            pub(crate) fn from_index(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) => Self(raw),
                    Err(_) => panic!("{} overflow: {index}", stringify!($name)),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    )* };
}

define_id!(
    /// A value: an index into a function's value table.
    ValueId => "%",
    /// A basic block of one function.
    BlockId => "bb",
    /// A function of a [`Module`](crate::Module).
    FuncId => "@",
);
