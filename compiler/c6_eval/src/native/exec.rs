//! Per-thread executable page for call shims.

use std::cell::RefCell;
use std::ptr::NonNull;

struct ExecPage {
    ptr: NonNull<u8>,
    len: usize,
}

impl ExecPage {
    fn new() -> Self {
        // SAFETY: sysconf has no preconditions.
        let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        let len = usize::try_from(page).ok().filter(|&n| n > 0).unwrap_or(4096);
        // SAFETY: anonymous private mapping with no address hint.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANON,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            panic!("cannot map an executable page: {}", std::io::Error::last_os_error());
        }
        match NonNull::new(ptr.cast::<u8>()) {
            Some(ptr) => ExecPage { ptr, len },
            None => panic!("mmap returned a null page"),
        }
    }

    fn protect(&self, prot: libc::c_int) {
        // SAFETY: `ptr..ptr+len` is exactly the mapping created in `new`.
        let rc = unsafe { libc::mprotect(self.ptr.as_ptr().cast(), self.len, prot) };
        assert!(
            rc == 0,
            "mprotect failed: {}",
            std::io::Error::last_os_error()
        );
    }

    /// Copy `code` into the page and run it.
    ///
    /// # Safety
    /// `code` must be a complete function that follows the C ABI.
    unsafe fn run(&mut self, code: &[u8]) -> u64 {
        assert!(
            code.len() <= self.len,
            "call shim of {} bytes does not fit in a page",
            code.len()
        );
        self.protect(libc::PROT_READ | libc::PROT_WRITE);
        // SAFETY: the page is writable and large enough; the source is a
        // separate heap buffer.
        unsafe { std::ptr::copy_nonoverlapping(code.as_ptr(), self.ptr.as_ptr(), code.len()) };
        self.protect(libc::PROT_READ | libc::PROT_EXEC);
        // SAFETY: the page now holds `code`, which the caller guarantees is a
        // valid `extern "C" fn() -> u64`.
        let entry: extern "C" fn() -> u64 = unsafe { std::mem::transmute(self.ptr.as_ptr()) };
        entry()
    }
}

impl Drop for ExecPage {
    fn drop(&mut self) {
        // SAFETY: unmapping the region mapped in `new`, exactly once.
        unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) };
    }
}

thread_local! {
    static PAGE: RefCell<Option<ExecPage>> = const { RefCell::new(None) };
}

/// Run a call shim on this thread's page, mapping it on first use.
///
/// # Safety
/// See [`ExecPage::run`].
pub(super) unsafe fn run(code: &[u8]) -> u64 {
    PAGE.with(|page| {
        let mut page = page.borrow_mut();
        let page = page.get_or_insert_with(ExecPage::new);
        // SAFETY: forwarded from the caller.
        unsafe { page.run(code) }
    })
}
