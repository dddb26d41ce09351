//! Interpreter capacity limits.

/// Sizes of the buffers an [`Interpreter`](crate::Interpreter) works in.
///
/// Both limits are hard: exceeding either aborts execution with a panic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Bytes of synthetic stack for frame headers and locals.
    pub stack_size: usize,
    /// Upper bound on the shared register file, in registers.
    pub max_registers: usize,
}

impl InterpreterConfig {
    /// Default synthetic stack size (64 KiB).
    pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

    /// Default register file bound (1 Mi registers).
    pub const DEFAULT_MAX_REGISTERS: usize = 1 << 20;

    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    #[must_use]
    pub fn with_max_registers(mut self, max_registers: usize) -> Self {
        self.max_registers = max_registers;
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            stack_size: Self::DEFAULT_STACK_SIZE,
            max_registers: Self::DEFAULT_MAX_REGISTERS,
        }
    }
}
