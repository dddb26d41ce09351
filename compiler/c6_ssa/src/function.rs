//! Functions: value table, flat instruction array and block slices.

use std::sync::OnceLock;

use bitflags::bitflags;
use c6_types::TypeId;
use smallvec::SmallVec;

use crate::{BlockId, Instruction, ValueId};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u16 {
        /// Body lives in native code, reached through a symbol.
        const EXTERNAL = 1 << 0;
        /// Takes extra arguments after the declared ones.
        const VARIADIC = 1 << 1;
    }
}

/// A run of instructions in [`Function::instructions`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BasicBlock {
    pub offset: u32,
    pub len: u32,
}

impl BasicBlock {
    /// Offset of a block that has been created but not started.
    pub(crate) const UNSTARTED: u32 = u32::MAX;

    pub(crate) const fn unstarted() -> Self {
        BasicBlock {
            offset: Self::UNSTARTED,
            len: 0,
        }
    }

    #[inline]
    pub const fn is_started(&self) -> bool {
        self.offset != Self::UNSTARTED
    }

    /// Instruction indices of this block.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        if !self.is_started() {
            return 0..0;
        }
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// A stack slot: `value` is a pointer to a fresh `ty`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LocalAlloc {
    pub ty: TypeId,
    pub value: ValueId,
}

/// Native linkage of an external function.
#[derive(Clone, Debug, Default)]
pub(crate) struct Foreign {
    pub(crate) library: Option<String>,
    pub(crate) symbol: String,
}

/// One IR function.
///
/// Values `0..arg_count` are the arguments. Blocks are slices of the
/// instruction array; block 0 is the entry block.
#[derive(Debug)]
pub struct Function {
    pub(crate) name: String,
    pub(crate) ret_type: Option<TypeId>,
    pub(crate) arg_count: u32,
    pub(crate) values: Vec<TypeId>,
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) locals: Vec<LocalAlloc>,
    pub(crate) flags: FunctionFlags,
    pub(crate) foreign: Option<Foreign>,
    resolved: OnceLock<usize>,
}

impl Function {
    pub(crate) fn new(name: String, args: &[TypeId], ret_type: Option<TypeId>) -> Self {
        Function {
            name,
            ret_type,
            arg_count: u32::try_from(args.len()).unwrap_or(u32::MAX),
            values: args.to_vec(),
            blocks: Vec::new(),
            instructions: Vec::new(),
            locals: Vec::new(),
            flags: FunctionFlags::empty(),
            foreign: None,
            resolved: OnceLock::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ret_type(&self) -> Option<TypeId> {
        self.ret_type
    }

    #[inline]
    pub fn arg_count(&self) -> usize {
        self.arg_count as usize
    }

    /// Type of every value, indexed by [`ValueId`].
    #[inline]
    pub fn values(&self) -> &[TypeId] {
        &self.values
    }

    #[inline]
    #[track_caller]
    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.values[value.index()]
    }

    #[inline]
    pub fn arg(&self, index: usize) -> ValueId {
        assert!(
            index < self.arg_count(),
            "{} has {} arguments, asked for #{index}",
            self.name,
            self.arg_count
        );
        ValueId::from_index(index)
    }

    #[inline]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    #[inline]
    #[track_caller]
    pub fn block(&self, block: BlockId) -> &[Instruction] {
        &self.instructions[self.blocks[block.index()].range()]
    }

    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[inline]
    pub fn locals(&self) -> &[LocalAlloc] {
        &self.locals
    }

    #[inline]
    pub fn flags(&self) -> FunctionFlags {
        self.flags
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.flags.contains(FunctionFlags::EXTERNAL)
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.flags.contains(FunctionFlags::VARIADIC)
    }

    /// Library named in the declaration, for external functions.
    pub fn library(&self) -> Option<&str> {
        self.foreign.as_ref()?.library.as_deref()
    }

    /// Native symbol of an external function.
    pub fn symbol(&self) -> Option<&str> {
        self.foreign.as_ref().map(|f| f.symbol.as_str())
    }

    /// Address of the native symbol, resolved on first use with `resolve`
    /// and cached afterwards.
    pub fn native_address(&self, resolve: impl FnOnce(&str) -> Option<usize>) -> Option<usize> {
        if let Some(&address) = self.resolved.get() {
            return Some(address);
        }
        let address = resolve(self.symbol()?)?;
        Some(*self.resolved.get_or_init(|| address))
    }

    /// Arguments of the `Call` at `index`: the `PushArg`s right before it.
    ///
    /// # Panics
    /// If `index` is not a call or its arguments are not in place.
    #[track_caller]
    pub fn call_args(&self, index: usize) -> SmallVec<[ValueId; 8]> {
        let Instruction::Call { argc, .. } = self.instructions[index] else {
            panic!("instruction {index} of {} is not a call", self.name);
        };
        let argc = argc as usize;
        assert!(argc <= index, "call at {index} has {argc} arguments");
        self.instructions[index - argc..index]
            .iter()
            .map(|inst| match *inst {
                Instruction::PushArg { value } => value,
                other => panic!("expected push_arg before call at {index}, found {other:?}"),
            })
            .collect()
    }

    /// Every started block ends in exactly one terminator, and every branch
    /// target is a started block other than the entry block.
    pub fn is_well_formed(&self) -> bool {
        let valid_target = |target: BlockId| {
            target.index() != 0
                && self
                    .blocks
                    .get(target.index())
                    .is_some_and(BasicBlock::is_started)
        };
        let targets_ok = self.instructions.iter().all(|inst| match *inst {
            Instruction::Jump { target } => valid_target(target),
            Instruction::Branch {
                then_block,
                else_block,
                ..
            } => valid_target(then_block) && valid_target(else_block),
            _ => true,
        });
        targets_ok && self.blocks.iter().all(|block| {
            let insts = &self.instructions[block.range()];
            match insts.split_last() {
                Some((last, rest)) => {
                    last.is_terminator() && !rest.iter().any(Instruction::is_terminator)
                }
                None => !block.is_started(),
            }
        })
    }
}
