//! Function builder.
//!
//! The builder appends to the *current* block of the function created last.
//! Blocks are filled one at a time: a block is created up front (so it can be
//! a jump target) and started with [`Builder::switch_to`] once the current
//! block has its terminator. Misuse is a compiler bug and panics.

use c6_types::{TypeId, TypeInfo, TypeRegistry};
use tracing::debug;

use crate::function::Foreign;
use crate::{
    BasicBlock, BinOp, BlockId, FloatPredicate, FuncId, Function, FunctionFlags, Instruction,
    IntPredicate, LocalAlloc, Module, RawValue, ValueId,
};

#[derive(Copy, Clone, Debug)]
struct Cursor {
    func: FuncId,
    block: BlockId,
}

/// Emit one named method per integer or float operator.
macro_rules! binary_ops {
    ($($method:ident => $op:ident),* $(,)?) => { $(
        #[doc = concat!("`", stringify!($method), "` of two values of the same type.")]
        pub fn $method(&mut self, lhs: ValueId, rhs: ValueId) -> ValueId {
            self.binary(BinOp::$op, lhs, rhs)
        }
    )* };
}

pub struct Builder<'m> {
    module: &'m mut Module,
    types: &'m TypeRegistry,
    cursor: Option<Cursor>,
}

impl<'m> Builder<'m> {
    pub fn new(module: &'m mut Module, types: &'m TypeRegistry) -> Self {
        Builder {
            module,
            types,
            cursor: None,
        }
    }

    #[inline]
    pub fn module(&self) -> &Module {
        self.module
    }

    #[inline]
    pub fn types(&self) -> &'m TypeRegistry {
        self.types
    }

    // ─── Functions and blocks ───────────────────────────────────────────

    /// Start a function with an entry block and make it current.
    pub fn function(&mut self, name: &str, args: &[TypeId], ret: Option<TypeId>) -> FuncId {
        let mut function = Function::new(name.to_owned(), args, ret);
        function.blocks.push(BasicBlock { offset: 0, len: 1 });
        function.instructions.push(Instruction::AllocStack);
        let func = self.module.push(function);
        self.cursor = Some(Cursor {
            func,
            block: BlockId::new(0),
        });
        debug!(%func, name, args = args.len(), "new function");
        func
    }

    /// Declare a function implemented in native code. The current function
    /// does not change.
    pub fn foreign_function(
        &mut self,
        name: &str,
        library: Option<&str>,
        args: &[TypeId],
        ret: Option<TypeId>,
        variadic: bool,
    ) -> FuncId {
        let mut function = Function::new(name.to_owned(), args, ret);
        function.flags = FunctionFlags::EXTERNAL;
        if variadic {
            function.flags |= FunctionFlags::VARIADIC;
        }
        function.foreign = Some(Foreign {
            library: library.map(str::to_owned),
            symbol: name.to_owned(),
        });
        let func = self.module.push(function);
        debug!(%func, name, library, variadic, "foreign function");
        func
    }

    /// Function being built.
    #[inline]
    #[track_caller]
    pub fn current_function(&self) -> FuncId {
        self.cursor().func
    }

    #[inline]
    #[track_caller]
    pub fn current_block(&self) -> BlockId {
        self.cursor().block
    }

    /// Argument `index` of the current function.
    #[track_caller]
    pub fn arg(&self, index: usize) -> ValueId {
        self.func().arg(index)
    }

    /// Reserve a block in the current function without starting it.
    #[track_caller]
    pub fn create_block(&mut self) -> BlockId {
        let func = self.func_mut();
        let block = BlockId::from_index(func.blocks.len());
        func.blocks.push(BasicBlock::unstarted());
        block
    }

    /// Start `block` at the end of the instruction array.
    ///
    /// # Panics
    /// If the current block has no terminator yet or `block` was started
    /// before.
    #[track_caller]
    pub fn switch_to(&mut self, block: BlockId) {
        let current = self.current_block();
        assert!(
            self.is_terminated(),
            "{current} must end in a terminator before {block} starts"
        );
        let func = self.func_mut();
        let offset = u32::try_from(func.instructions.len()).unwrap_or(u32::MAX);
        let slot = &mut func.blocks[block.index()];
        assert!(!slot.is_started(), "{block} was already started");
        *slot = BasicBlock { offset, len: 0 };
        if let Some(cursor) = &mut self.cursor {
            cursor.block = block;
        }
    }

    /// Whether the current block ends in a terminator.
    #[track_caller]
    pub fn is_terminated(&self) -> bool {
        self.func()
            .block(self.current_block())
            .last()
            .is_some_and(Instruction::is_terminator)
    }

    // ─── Values ─────────────────────────────────────────────────────────

    /// A constant of type `ty`.
    #[track_caller]
    pub fn constant(&mut self, ty: TypeId, value: RawValue) -> ValueId {
        let result = self.new_value(ty);
        self.push(Instruction::Constant { result, value });
        result
    }

    pub fn const_i64(&mut self, value: i64) -> ValueId {
        self.constant(TypeId::I64, RawValue::from_i64(value))
    }

    pub fn const_u64(&mut self, value: u64) -> ValueId {
        self.constant(TypeId::U64, RawValue::from_u64(value))
    }

    pub fn const_f64(&mut self, value: f64) -> ValueId {
        self.constant(TypeId::F64, RawValue::from_f64(value))
    }

    #[track_caller]
    pub fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.same_type(op.mnemonic(), lhs, rhs);
        let info = self.types.info(ty);
        if op.is_float() {
            assert!(info.is_float(), "{} on non-float {}", op.mnemonic(), self.types.name(ty));
        } else {
            assert!(info.is_int(), "{} on non-integer {}", op.mnemonic(), self.types.name(ty));
        }
        let result = self.new_value(ty);
        self.push(Instruction::Binary {
            op,
            result,
            lhs,
            rhs,
        });
        result
    }

    binary_ops!(
        iadd => IAdd,
        isub => ISub,
        imul => IMul,
        sdiv => SDiv,
        udiv => UDiv,
        srem => SRem,
        urem => URem,
        and => And,
        or => Or,
        xor => Xor,
        shl => Shl,
        lshr => LShr,
        ashr => AShr,
        fadd => FAdd,
        fsub => FSub,
        fmul => FMul,
        fdiv => FDiv,
    );

    /// Integer or pointer comparison; the result is `bool`.
    #[track_caller]
    pub fn icmp(&mut self, pred: IntPredicate, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.same_type("icmp", lhs, rhs);
        let info = self.types.info(ty);
        assert!(
            info.is_int() || info.is_pointer(),
            "icmp on {}",
            self.types.name(ty)
        );
        let result = self.new_value(TypeId::BOOL);
        self.push(Instruction::ICmp {
            pred,
            result,
            lhs,
            rhs,
        });
        result
    }

    #[track_caller]
    pub fn fcmp(&mut self, pred: FloatPredicate, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.same_type("fcmp", lhs, rhs);
        assert!(self.types.info(ty).is_float(), "fcmp on {}", self.types.name(ty));
        let result = self.new_value(TypeId::BOOL);
        self.push(Instruction::FCmp {
            pred,
            result,
            lhs,
            rhs,
        });
        result
    }

    // ─── Memory ─────────────────────────────────────────────────────────

    /// A stack slot for a `ty`, returned as a `*ty` value.
    ///
    /// Emits nothing here: the entry block's `AllocStack` lays out every
    /// local of the function when it runs.
    #[track_caller]
    pub fn alloca(&mut self, ty: TypeId) -> ValueId {
        let pointer = self.types.pointer_to(ty);
        let value = self.new_value(pointer);
        self.func_mut().locals.push(LocalAlloc { ty, value });
        value
    }

    #[track_caller]
    pub fn load(&mut self, address: ValueId) -> ValueId {
        let pointee = self.pointee(address);
        let result = self.new_value(pointee);
        self.push(Instruction::Load { result, address });
        result
    }

    #[track_caller]
    pub fn store(&mut self, address: ValueId, value: ValueId) {
        let pointee = self.pointee(address);
        let ty = self.func().value_type(value);
        assert_eq!(
            pointee,
            ty,
            "store of {} through *{}",
            self.types.name(ty),
            self.types.name(pointee)
        );
        self.push(Instruction::Store { address, value });
    }

    // ─── Calls ──────────────────────────────────────────────────────────

    /// Call `callee`; returns the result value unless it returns nothing.
    #[track_caller]
    pub fn call(&mut self, callee: FuncId, args: &[ValueId]) -> Option<ValueId> {
        let target = self.module.get(callee);
        let fixed = target.arg_count();
        if target.is_variadic() {
            assert!(
                args.len() >= fixed,
                "{} takes at least {fixed} arguments, got {}",
                target.name(),
                args.len()
            );
        } else {
            assert_eq!(
                args.len(),
                fixed,
                "{} takes {fixed} arguments",
                target.name()
            );
        }
        let ret_type = target.ret_type();
        let expected: Vec<TypeId> = target.values()[..fixed].to_vec();

        for (i, (&arg, &want)) in args.iter().zip(&expected).enumerate() {
            let got = self.func().value_type(arg);
            assert_eq!(
                got,
                want,
                "argument #{i}: expected {}, found {}",
                self.types.name(want),
                self.types.name(got)
            );
        }
        for &value in args {
            self.push(Instruction::PushArg { value });
        }
        let result = ret_type.map(|ty| self.new_value(ty));
        self.push(Instruction::Call {
            callee,
            argc: u32::try_from(args.len()).unwrap_or(u32::MAX),
            result,
        });
        result
    }

    // ─── Terminators ────────────────────────────────────────────────────

    #[track_caller]
    pub fn jump(&mut self, target: BlockId) {
        self.check_block(target);
        self.push(Instruction::Jump { target });
    }

    #[track_caller]
    pub fn branch(&mut self, condition: ValueId, then_block: BlockId, else_block: BlockId) {
        self.check_block(then_block);
        self.check_block(else_block);
        let ty = self.func().value_type(condition);
        assert!(self.types.info(ty).is_int(), "branch on {}", self.types.name(ty));
        self.push(Instruction::Branch {
            condition,
            then_block,
            else_block,
        });
    }

    #[track_caller]
    pub fn ret(&mut self, value: ValueId) {
        let func = self.func();
        let ty = func.value_type(value);
        assert_eq!(
            func.ret_type(),
            Some(ty),
            "{} returns a {}",
            func.name(),
            self.types.name(ty)
        );
        self.push(Instruction::Ret { value });
    }

    #[track_caller]
    pub fn ret_void(&mut self) {
        let func = self.func();
        assert!(func.ret_type().is_none(), "{} must return a value", func.name());
        self.push(Instruction::RetVoid);
    }

    // ─── Internals ──────────────────────────────────────────────────────

    #[track_caller]
    fn cursor(&self) -> Cursor {
        match self.cursor {
            Some(cursor) => cursor,
            None => panic!("no function is being built"),
        }
    }

    #[track_caller]
    fn func(&self) -> &Function {
        self.module.get(self.cursor().func)
    }

    #[track_caller]
    fn func_mut(&mut self) -> &mut Function {
        let func = self.cursor().func;
        self.module.get_mut(func)
    }

    fn new_value(&mut self, ty: TypeId) -> ValueId {
        let func = self.func_mut();
        let value = ValueId::from_index(func.values.len());
        func.values.push(ty);
        value
    }

    /// Append to the current block, which is always the last one started.
    #[track_caller]
    fn push(&mut self, inst: Instruction) {
        let block = self.current_block();
        assert!(
            !self.is_terminated(),
            "cannot insert into {block}: it already ends in a terminator"
        );
        let func = self.func_mut();
        func.instructions.push(inst);
        func.blocks[block.index()].len += 1;
    }

    #[track_caller]
    fn same_type(&self, what: &str, lhs: ValueId, rhs: ValueId) -> TypeId {
        let func = self.func();
        let (a, b) = (func.value_type(lhs), func.value_type(rhs));
        assert_eq!(
            a,
            b,
            "{what} operands differ: {} vs {}",
            self.types.name(a),
            self.types.name(b)
        );
        a
    }

    #[track_caller]
    fn pointee(&self, address: ValueId) -> TypeId {
        let ty = self.func().value_type(address);
        let info: TypeInfo = self.types.info(ty);
        match info.pointee() {
            Some(pointee) => pointee,
            None => panic!("{address} is a {}, not a pointer", self.types.name(ty)),
        }
    }

    #[track_caller]
    fn check_block(&self, block: BlockId) {
        let count = self.func().blocks.len();
        assert!(block.index() < count, "{block} does not exist ({count} blocks)");
        // Locals are laid out once, by the entry block's `alloc_stack`.
        assert!(
            block.index() != 0,
            "{block} is the entry block and cannot be a branch target"
        );
    }
}
