//! Register-based IR for the c6 compiler.
//!
//! A [`Function`] owns a table of typed values, a flat instruction array and
//! a list of [`BasicBlock`]s, each a slice of that array ending in exactly one
//! terminator. Values are plain indices; their only attribute is a
//! [`TypeId`](c6_types::TypeId). Functions are created through a [`Builder`]
//! and are append-only afterwards.
//!
//! Calls are encoded as a run of `PushArg` instructions followed by the
//! `Call`, which records only the callee and argument count (see
//! [`Function::call_args`]).

mod builder;
mod function;
mod ids;
mod instr;
mod module;
mod print;

pub use builder::Builder;
pub use function::{BasicBlock, Function, FunctionFlags, LocalAlloc};
pub use ids::{BlockId, FuncId, ValueId};
pub use instr::{BinOp, FloatPredicate, Instruction, IntPredicate, RawValue};
pub use module::Module;
pub use print::{FunctionDisplay, ModuleDisplay};

#[cfg(test)]
mod tests;
