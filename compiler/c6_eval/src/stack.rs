//! Synthetic call stack: frame headers and locals in one byte buffer.

use std::mem::{align_of, size_of};
use std::ptr::NonNull;

use c6_ssa::FuncId;

/// Header of one activation, stored inside the [`Stack`].
///
/// Frames form a singly linked chain through `caller`, which holds the
/// stack offset of the caller's header.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) func: FuncId,
    /// First register of this frame's window. The register just below it
    /// receives the return value.
    pub(crate) registers_base: u32,
    /// First free stack byte after this frame's header and locals.
    pub(crate) stack_offset: u32,
    /// Index into the function's instruction array. While a callee runs,
    /// this points at the `Call`.
    pub(crate) cursor: u32,
    pub(crate) caller: u32,
}

impl Frame {
    pub(crate) const NO_CALLER: u32 = u32::MAX;
    pub(crate) const SIZE: usize = size_of::<Frame>();
    pub(crate) const ALIGN: usize = align_of::<Frame>();

    #[inline]
    pub(crate) fn base(&self) -> usize {
        self.registers_base as usize
    }

    #[inline]
    pub(crate) fn has_caller(&self) -> bool {
        self.caller != Self::NO_CALLER
    }
}

/// Fixed-size byte region handed out by the caller's arena.
pub(crate) struct Stack {
    base: NonNull<u8>,
    len: usize,
}

impl Stack {
    pub(crate) fn new(base: NonNull<u8>, len: usize) -> Self {
        assert!(
            len < Frame::NO_CALLER as usize,
            "interpreter stack of {len} bytes is too large"
        );
        Stack { base, len }
    }

    /// Claim `size` bytes aligned to `align` at or after `offset` and return
    /// the start of the claimed range.
    ///
    /// # Panics
    /// If the range does not fit.
    #[track_caller]
    pub(crate) fn reserve(&self, offset: usize, size: usize, align: usize) -> usize {
        debug_assert!(align.is_power_of_two());
        let start = (offset + align - 1) & !(align - 1);
        match start.checked_add(size) {
            Some(end) if end <= self.len => start,
            _ => panic!(
                "interpreter stack overflow: {size} bytes at offset {start} exceed {} bytes",
                self.len
            ),
        }
    }

    /// Raw address of `offset`. Stays valid as long as the arena region does.
    #[inline]
    pub(crate) fn address(&self, offset: usize) -> *mut u8 {
        debug_assert!(offset <= self.len);
        self.base.as_ptr().wrapping_add(offset)
    }

    pub(crate) fn write_frame(&self, offset: usize, frame: Frame) {
        assert!(offset + Frame::SIZE <= self.len, "frame header out of bounds");
        // SAFETY: the range lies inside the buffer (checked above) and the
        // arena region is exclusively ours for the duration of the run.
        unsafe { self.address(offset).cast::<Frame>().write_unaligned(frame) }
    }

    pub(crate) fn read_frame(&self, offset: usize) -> Frame {
        assert!(offset + Frame::SIZE <= self.len, "frame header out of bounds");
        // SAFETY: in bounds, and only ever written by `write_frame`.
        unsafe { self.address(offset).cast::<Frame>().read_unaligned() }
    }
}
