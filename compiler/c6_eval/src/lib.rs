//! Register-machine interpreter for c6 IR.
//!
//! Executes [`c6_ssa`] functions without a native backend. Each call frame
//! owns a window of one shared register file, and frame headers plus stack
//! locals live in a synthetic stack carved out of the caller's
//! [`Arena`](c6_arena::Arena). IR-level recursion therefore never touches the
//! host call stack.
//!
//! Calls to `#foreign` functions go through a [`NativeCaller`]. The provided
//! [`HostCaller`] resolves symbols with `dlsym` and synthesizes an x86-64
//! System V call shim in an executable page (see [`encode_sysv_call`]).
//!
//! # Failure model
//!
//! Everything that can go wrong here is a bug in an earlier stage or a
//! resource limit: stack or register exhaustion, an unresolvable symbol,
//! an unsupported load width, too many native arguments. All of them panic.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "synthetic stack frames, raw loads/stores and native calls need unsafe"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_ptr_alignment,
    reason = "registers are untyped 64-bit payloads; narrowing casts reinterpret bits on purpose"
)]

mod config;
mod interpreter;
mod native;
mod stack;

pub use config::InterpreterConfig;
pub use interpreter::Interpreter;
pub use native::{
    encode_sysv_call, resolve_symbol, HostCaller, NativeArg, NativeCaller, NativeSignature,
    MAX_FLOAT_ARGS, MAX_INT_ARGS,
};

#[cfg(test)]
mod tests;
