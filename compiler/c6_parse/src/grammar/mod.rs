//! Grammar productions, one file per area.
//!
//! Every production is a method on [`Parser`](crate::Parser) whose body runs
//! inside `self.attempt(..)`.

mod decl;
mod expr;
mod operators;
mod stmt;
mod ty;
