//! Instructions and constant payloads.

use std::fmt;

use crate::{BlockId, FuncId, ValueId};

/// Untyped 64-bit payload of a register or constant.
///
/// Integers narrower than 64 bits are kept sign- or zero-extended according
/// to their type; `f32` occupies the low 32 bits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(transparent)]
pub struct RawValue(u64);

impl RawValue {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    #[expect(clippy::cast_sign_loss, reason = "bit-preserving reinterpretation")]
    pub const fn from_i64(value: i64) -> Self {
        Self(value as u64)
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self(value.to_bits())
    }

    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self(u64::from(value.to_bits()))
    }

    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize as u64)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    #[expect(clippy::cast_possible_wrap, reason = "bit-preserving reinterpretation")]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline]
    #[expect(clippy::cast_possible_truncation, reason = "f32 lives in the low half")]
    pub fn as_f32(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawValue({:#x})", self.0)
    }
}

/// Two-operand arithmetic. Operands and result share one type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    IAdd,
    ISub,
    IMul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
    FAdd,
    FSub,
    FMul,
    FDiv,
}

impl BinOp {
    pub const fn is_float(self) -> bool {
        matches!(self, BinOp::FAdd | BinOp::FSub | BinOp::FMul | BinOp::FDiv)
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            BinOp::IAdd => "iadd",
            BinOp::ISub => "isub",
            BinOp::IMul => "imul",
            BinOp::SDiv => "sdiv",
            BinOp::UDiv => "udiv",
            BinOp::SRem => "srem",
            BinOp::URem => "urem",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::LShr => "lshr",
            BinOp::AShr => "ashr",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

impl IntPredicate {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
            IntPredicate::Ult => "ult",
            IntPredicate::Ule => "ule",
            IntPredicate::Ugt => "ugt",
            IntPredicate::Uge => "uge",
        }
    }
}

/// Ordered float comparisons; any comparison with NaN is false.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatPredicate {
    Oeq,
    One,
    Olt,
    Ole,
    Ogt,
    Oge,
}

impl FloatPredicate {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            FloatPredicate::Oeq => "oeq",
            FloatPredicate::One => "one",
            FloatPredicate::Olt => "olt",
            FloatPredicate::Ole => "ole",
            FloatPredicate::Ogt => "ogt",
            FloatPredicate::Oge => "oge",
        }
    }
}

/// One instruction of a function's flat instruction array.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Instruction {
    /// First instruction of every entry block: lays out all locals of the
    /// function on the interpreter stack.
    AllocStack,
    Constant {
        result: ValueId,
        value: RawValue,
    },
    Binary {
        op: BinOp,
        result: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    ICmp {
        pred: IntPredicate,
        result: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    FCmp {
        pred: FloatPredicate,
        result: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },
    Load {
        result: ValueId,
        address: ValueId,
    },
    Store {
        address: ValueId,
        value: ValueId,
    },
    /// Argument of the next `Call`, in order.
    PushArg {
        value: ValueId,
    },
    /// Arguments are the `argc` `PushArg`s immediately before.
    Call {
        callee: FuncId,
        argc: u32,
        result: Option<ValueId>,
    },
    Jump {
        target: BlockId,
    },
    Branch {
        condition: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Ret {
        value: ValueId,
    },
    RetVoid,
}

impl Instruction {
    /// Whether this instruction ends a basic block.
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Jump { .. }
                | Instruction::Branch { .. }
                | Instruction::Ret { .. }
                | Instruction::RetVoid
        )
    }

    /// Value defined by this instruction, if any.
    pub const fn result(&self) -> Option<ValueId> {
        match *self {
            Instruction::Constant { result, .. }
            | Instruction::Binary { result, .. }
            | Instruction::ICmp { result, .. }
            | Instruction::FCmp { result, .. }
            | Instruction::Load { result, .. } => Some(result),
            Instruction::Call { result, .. } => result,
            _ => None,
        }
    }
}
