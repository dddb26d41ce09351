//! Bump allocator over a fixed memory region.
//!
//! An [`Arena`] hands out aligned byte ranges from a buffer reserved up
//! front. Individual allocations are never freed. Instead a caller takes an
//! [`ArenaMark`] with [`Arena::snapshot`] and later calls
//! [`Arena::rollback`] to reclaim everything allocated since.
//!
//! # Design
//!
//! - One arena per worker thread. `Arena` is `Send` but not `Sync`, and
//!   `alloc` takes `&mut self`, so no synchronization happens inside it.
//! - The backing store is `Box<[Cell<u8>]>`. Pointers handed out are derived
//!   from a shared view of interior-mutable bytes, so callers may write
//!   through them while the arena keeps being used.
//! - Alignment is computed on the absolute address, not the offset, so an
//!   `align` of 16 really yields a 16-byte aligned pointer.
//! - Exhaustion is fatal. There is no out-of-memory recovery path.
//!
//! Memory handed out is not guaranteed to be zeroed after a rollback. Callers
//! that need zeroed storage must clear it themselves.

use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

/// Position inside an [`Arena`], used to undo allocations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArenaMark(usize);

impl ArenaMark {
    /// Byte offset recorded by this mark.
    #[inline]
    pub const fn offset(self) -> usize {
        self.0
    }
}

/// Fixed-capacity bump allocator.
pub struct Arena {
    buffer: Box<[Cell<u8>]>,
    offset: usize,
}

impl Arena {
    /// Reserve `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            buffer: (0..capacity).map(|_| Cell::new(0)).collect(),
            offset: 0,
        }
    }

    /// Total number of bytes reserved.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes consumed so far, padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Number of bytes still available (before alignment padding).
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Carve out `size * count` bytes aligned to `align`.
    ///
    /// When `count` is zero the current (aligned) position is returned and
    /// nothing is consumed.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two, if `size * count` overflows,
    /// or if the arena is exhausted.
    pub fn alloc(&mut self, size: usize, align: usize, count: usize) -> NonNull<u8> {
        assert!(
            align.is_power_of_two(),
            "arena alignment must be a power of two, got {align}"
        );
        let bytes = size
            .checked_mul(count)
            .unwrap_or_else(|| panic!("arena allocation size overflow: {size} * {count}"));

        let start = self.aligned_offset(align);
        let end = start
            .checked_add(bytes)
            .filter(|&end| end <= self.capacity())
            .unwrap_or_else(|| self.exhausted(bytes, align));

        if bytes > 0 {
            self.offset = end;
        }
        self.ptr_at(start)
    }

    /// Allocate room for `count` values of type `T`.
    #[inline]
    pub fn alloc_for<T>(&mut self, count: usize) -> NonNull<T> {
        self.alloc(std::mem::size_of::<T>(), std::mem::align_of::<T>(), count).cast()
    }

    /// Record the current position.
    #[inline]
    pub fn snapshot(&self) -> ArenaMark {
        ArenaMark(self.offset)
    }

    /// Discard every allocation made since `mark` was taken.
    ///
    /// # Panics
    ///
    /// Panics if `mark` lies beyond the current position (it was taken after
    /// a more recent rollback, or belongs to another arena).
    pub fn rollback(&mut self, mark: ArenaMark) {
        assert!(
            mark.0 <= self.offset,
            "arena rollback to {} past current offset {}",
            mark.0,
            self.offset
        );
        self.offset = mark.0;
    }

    /// Discard all allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Whether `ptr` points inside this arena's reserved region.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let base = self.base() as usize;
        let addr = ptr as usize;
        addr >= base && addr < base + self.capacity()
    }

    fn base(&self) -> *mut u8 {
        self.buffer.as_ptr().cast::<u8>().cast_mut()
    }

    fn ptr_at(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset <= self.capacity());
        NonNull::new(self.base().wrapping_add(offset)).unwrap_or(NonNull::dangling())
    }

    fn aligned_offset(&self, align: usize) -> usize {
        let base = self.base() as usize;
        let addr = base + self.offset;
        let aligned = align_up(addr, align);
        aligned - base
    }

    #[cold]
    fn exhausted(&self, bytes: usize, align: usize) -> ! {
        panic!(
            "arena exhausted: requested {bytes} bytes (align {align}) with {} of {} bytes in use",
            self.offset,
            self.capacity()
        )
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("used", &self.offset)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Round `value` up to the next multiple of `align` (a power of two).
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
