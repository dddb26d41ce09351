//! Calls into native code.
//!
//! The interpreter classifies each argument as integer or floating point and
//! hands the raw bits to a [`NativeCaller`]. [`HostCaller`] implements the
//! x86-64 System V convention by encoding a call shim with
//! [`encode_sysv_call`] and running it from a per-thread executable page.

#[cfg(all(target_arch = "x86_64", unix))]
mod exec;
mod trampoline;

pub use trampoline::{encode_sysv_call, MAX_FLOAT_ARGS, MAX_INT_ARGS};

/// One argument of a native call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NativeArg {
    pub bits: u64,
    /// Passed in a vector register instead of a general-purpose one.
    pub is_float: bool,
}

impl NativeArg {
    pub const fn int(bits: u64) -> Self {
        NativeArg {
            bits,
            is_float: false,
        }
    }

    pub fn float(value: f64) -> Self {
        NativeArg {
            bits: value.to_bits(),
            is_float: true,
        }
    }
}

/// Shape of a native call beyond its arguments.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeSignature {
    /// The result comes back in `xmm0`.
    pub returns_float: bool,
    /// The callee takes `...`; the vector-register count goes in `al`.
    pub variadic: bool,
}

/// Resolves and invokes native functions on behalf of the interpreter.
pub trait NativeCaller {
    /// Address of `symbol`, or `None` if it is not loaded.
    fn resolve(&mut self, symbol: &str) -> Option<usize> {
        resolve_symbol(symbol)
    }

    /// Call the function at `address` and return the raw result register.
    ///
    /// # Safety
    ///
    /// `address` must be a function whose C signature matches `args` and
    /// `signature`. Pointer arguments must be valid for whatever the callee
    /// does with them.
    unsafe fn call(
        &mut self,
        address: usize,
        args: &[NativeArg],
        signature: NativeSignature,
    ) -> u64;
}

/// Look `symbol` up among the objects already loaded into the process.
#[cfg(unix)]
pub fn resolve_symbol(symbol: &str) -> Option<usize> {
    let name = std::ffi::CString::new(symbol).ok()?;
    // SAFETY: `name` is NUL-terminated and outlives the call.
    let address = unsafe { libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr()) };
    if address.is_null() {
        tracing::debug!(symbol, "symbol not found");
        return None;
    }
    tracing::trace!(symbol, address = format_args!("{address:p}"), "resolved");
    Some(address as usize)
}

#[cfg(not(unix))]
pub fn resolve_symbol(_symbol: &str) -> Option<usize> {
    None
}

/// [`NativeCaller`] for the running process on x86-64 System V hosts.
#[derive(Copy, Clone, Debug, Default)]
pub struct HostCaller;

impl NativeCaller for HostCaller {
    unsafe fn call(
        &mut self,
        address: usize,
        args: &[NativeArg],
        signature: NativeSignature,
    ) -> u64 {
        let code = encode_sysv_call(address, args, signature);
        // SAFETY: forwarded from the caller's contract.
        unsafe { call_host(&code) }
    }
}

#[cfg(all(target_arch = "x86_64", unix))]
unsafe fn call_host(code: &[u8]) -> u64 {
    // SAFETY: `code` is a complete shim produced by `encode_sysv_call`.
    unsafe { exec::run(code) }
}

#[cfg(not(all(target_arch = "x86_64", unix)))]
unsafe fn call_host(_code: &[u8]) -> u64 {
    panic!("native calls are only supported on x86-64 unix hosts")
}
