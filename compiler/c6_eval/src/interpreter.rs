//! The execution loop.
//!
//! Register windows: the entry frame's window starts at register 1 and
//! register 0 receives its return value. A callee's window starts one past
//! the end of its caller's window; the register in between is the callee's
//! return slot. On return the caller copies that slot into the `Call`'s
//! result value.
//!
//! Stack layout: the entry frame header sits at offset 0. A frame's locals
//! follow its header, and a callee's header follows the caller's locals.
//! Returning simply abandons the callee's part of the stack.

use c6_arena::Arena;
use c6_ssa::{
    BinOp, BlockId, FloatPredicate, FuncId, Function, Instruction, IntPredicate, Module, RawValue,
    ValueId,
};
use c6_types::{TypeFlags, TypeId, TypeInfo, TypeRegistry};
use smallvec::SmallVec;
use tracing::debug;

use crate::native::{HostCaller, NativeArg, NativeCaller, NativeSignature};
use crate::stack::{Frame, Stack};
use crate::InterpreterConfig;

/// Native arguments of one call.
type ArgList = SmallVec<[NativeArg; 8]>;

/// Executes functions of one [`Module`].
///
/// The register file is kept between runs to avoid reallocating it; the
/// synthetic stack is taken from the arena passed to [`Interpreter::run`].
pub struct Interpreter<'m, N: NativeCaller = HostCaller> {
    module: &'m Module,
    types: &'m TypeRegistry,
    config: InterpreterConfig,
    native: N,
    registers: Vec<RawValue>,
}

impl<'m> Interpreter<'m, HostCaller> {
    pub fn new(module: &'m Module, types: &'m TypeRegistry, config: InterpreterConfig) -> Self {
        Self::with_native(module, types, config, HostCaller)
    }
}

impl<'m, N: NativeCaller> Interpreter<'m, N> {
    pub fn with_native(
        module: &'m Module,
        types: &'m TypeRegistry,
        config: InterpreterConfig,
        native: N,
    ) -> Self {
        Interpreter {
            module,
            types,
            config,
            native,
            registers: Vec::new(),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    /// Run `func` with `args` to completion and return its result
    /// ([`RawValue::ZERO`] for functions without one).
    ///
    /// The synthetic stack is allocated from `arena` and released before
    /// returning.
    ///
    /// # Panics
    /// On argument count mismatch, stack or register exhaustion, division
    /// by zero, an unresolvable foreign symbol, or a malformed function.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(func = %self.module[func].name(), args = args.len())
    )]
    pub fn run(&mut self, arena: &mut Arena, func: FuncId, args: &[RawValue]) -> RawValue {
        let module = self.module;
        let function = &module[func];
        assert!(
            args.len() == function.arg_count(),
            "{} takes {} arguments, got {}",
            function.name(),
            function.arg_count(),
            args.len()
        );

        if function.is_external() {
            let native_args: ArgList = args
                .iter()
                .zip(function.values())
                .map(|(&value, &ty)| self.native_arg(value, ty, false))
                .collect();
            return self.call_native(function, &native_args);
        }

        let mark = arena.snapshot();
        let stack = Stack::new(arena.alloc(self.config.stack_size, 16, 1), self.config.stack_size);
        let result = self.execute(&stack, func, args);
        arena.rollback(mark);
        debug!(result = ?result, "finished");
        result
    }

    fn execute(&mut self, stack: &Stack, entry: FuncId, args: &[RawValue]) -> RawValue {
        self.registers.clear();
        self.grow_registers(1 + self.module[entry].values().len());
        self.registers[1..=args.len()].copy_from_slice(args);

        let mut frame_at = stack.reserve(0, Frame::SIZE, Frame::ALIGN);
        let mut frame = Frame {
            func: entry,
            registers_base: 1,
            stack_offset: to_u32(frame_at + Frame::SIZE),
            cursor: entry_offset(&self.module[entry]),
            caller: Frame::NO_CALLER,
        };

        loop {
            let module = self.module;
            let function = &module[frame.func];
            let cursor = frame.cursor as usize;
            let base = frame.base();
            let Some(&inst) = function.instructions().get(cursor) else {
                panic!("{} runs past its last instruction", function.name());
            };

            match inst {
                Instruction::AllocStack => {
                    let mut offset = frame.stack_offset as usize;
                    for local in function.locals() {
                        let info = self.types.info(local.ty);
                        let at = stack.reserve(offset, info.size as usize, info.align as usize);
                        offset = at + info.size as usize;
                        self.registers[base + local.value.index()] =
                            RawValue::from_ptr(stack.address(at));
                    }
                    frame.stack_offset = to_u32(offset);
                }
                Instruction::Constant { result, value } => {
                    self.registers[base + result.index()] = value;
                }
                Instruction::Binary {
                    op,
                    result,
                    lhs,
                    rhs,
                } => {
                    let info = self.types.info(function.value_type(result));
                    let (a, b) = (self.reg(base, lhs), self.reg(base, rhs));
                    let value = if op.is_float() {
                        float_binary(op, &info, a, b)
                    } else {
                        int_binary(op, &info, a, b, function)
                    };
                    self.registers[base + result.index()] = value;
                }
                Instruction::ICmp {
                    pred,
                    result,
                    lhs,
                    rhs,
                } => {
                    let info = self.types.info(function.value_type(lhs));
                    let (a, b) = (self.reg(base, lhs), self.reg(base, rhs));
                    self.registers[base + result.index()] =
                        RawValue::from_u64(u64::from(int_compare(pred, &info, a, b)));
                }
                Instruction::FCmp {
                    pred,
                    result,
                    lhs,
                    rhs,
                } => {
                    let info = self.types.info(function.value_type(lhs));
                    let (a, b) = (self.reg(base, lhs), self.reg(base, rhs));
                    self.registers[base + result.index()] =
                        RawValue::from_u64(u64::from(float_compare(pred, &info, a, b)));
                }
                Instruction::Load { result, address } => {
                    let info = self.types.info(function.value_type(result));
                    let ptr = self.reg(base, address).as_u64() as usize as *const u8;
                    let bits = load(ptr, info.size);
                    self.registers[base + result.index()] = normalize(&info, bits);
                }
                Instruction::Store { address, value } => {
                    let info = self.types.info(function.value_type(value));
                    let ptr = self.reg(base, address).as_u64() as usize as *mut u8;
                    store(ptr, info.size, self.reg(base, value).bits());
                }
                Instruction::PushArg { .. } => {}
                Instruction::Call {
                    callee: callee_id,
                    result,
                    ..
                } => {
                    let callee = &module[callee_id];
                    let args = function.call_args(cursor);

                    if callee.is_external() {
                        let native_args: ArgList = args
                            .iter()
                            .enumerate()
                            .map(|(i, &arg)| {
                                let extra = i >= callee.arg_count();
                                self.native_arg(self.reg(base, arg), function.value_type(arg), extra)
                            })
                            .collect();
                        let value = self.call_native(callee, &native_args);
                        if let Some(result) = result {
                            self.registers[base + result.index()] = value;
                        }
                        frame.cursor += 1;
                        continue;
                    }

                    let callee_base = base + function.values().len() + 1;
                    self.grow_registers(callee_base + callee.values().len());
                    for (i, &arg) in args.iter().enumerate() {
                        self.registers[callee_base + i] = self.reg(base, arg);
                    }

                    stack.write_frame(frame_at, frame);
                    let at = stack.reserve(frame.stack_offset as usize, Frame::SIZE, Frame::ALIGN);
                    frame = Frame {
                        func: callee_id,
                        registers_base: to_u32(callee_base),
                        stack_offset: to_u32(at + Frame::SIZE),
                        cursor: entry_offset(callee),
                        caller: to_u32(frame_at),
                    };
                    frame_at = at;
                    continue;
                }
                Instruction::Jump { target } => {
                    frame.cursor = block_offset(function, target);
                    continue;
                }
                Instruction::Branch {
                    condition,
                    then_block,
                    else_block,
                } => {
                    let target = if self.reg(base, condition).bits() == 0 {
                        else_block
                    } else {
                        then_block
                    };
                    frame.cursor = block_offset(function, target);
                    continue;
                }
                Instruction::Ret { .. } | Instruction::RetVoid => {
                    let value = match inst {
                        Instruction::Ret { value } => self.reg(base, value),
                        _ => RawValue::ZERO,
                    };
                    self.registers[base - 1] = value;
                    if !frame.has_caller() {
                        return self.registers[0];
                    }

                    frame_at = frame.caller as usize;
                    frame = stack.read_frame(frame_at);
                    let caller = &module[frame.func];
                    if let Instruction::Call {
                        result: Some(result),
                        ..
                    } = caller.instructions()[frame.cursor as usize]
                    {
                        self.registers[frame.base() + result.index()] = value;
                    }
                }
            }
            frame.cursor += 1;
        }
    }

    #[inline]
    fn reg(&self, base: usize, value: ValueId) -> RawValue {
        self.registers[base + value.index()]
    }

    fn grow_registers(&mut self, len: usize) {
        assert!(
            len <= self.config.max_registers,
            "register file overflow: {len} registers exceed the limit of {}",
            self.config.max_registers
        );
        if self.registers.len() < len {
            self.registers.resize(len, RawValue::ZERO);
        }
    }

    /// Classify `value` of type `ty` for a native call. Extra arguments of a
    /// variadic call follow C promotion: `f32` travels as `f64`.
    fn native_arg(&self, value: RawValue, ty: TypeId, extra: bool) -> NativeArg {
        let info = self.types.info(ty);
        if !info.is_float() {
            return NativeArg::int(value.bits());
        }
        if extra && info.size == 4 {
            return NativeArg::float(f64::from(value.as_f32()));
        }
        NativeArg {
            bits: value.bits(),
            is_float: true,
        }
    }

    fn call_native(&mut self, callee: &Function, args: &[NativeArg]) -> RawValue {
        let native = &mut self.native;
        let Some(address) = callee.native_address(|symbol| native.resolve(symbol)) else {
            panic!(
                "cannot resolve foreign symbol `{}`",
                callee.symbol().unwrap_or(callee.name())
            );
        };

        let ret = callee.ret_type().map(|ty| self.types.info(ty));
        let signature = NativeSignature {
            returns_float: ret.is_some_and(|info| info.is_float()),
            variadic: callee.is_variadic(),
        };
        debug!(
            callee = callee.name(),
            address = format_args!("{address:#x}"),
            args = args.len(),
            "native call"
        );
        // SAFETY: the address was resolved for this function's symbol and
        // the arguments were classified from its declared signature.
        let bits = unsafe { self.native.call(address, args, signature) };
        match ret {
            Some(info) => normalize(&info, bits),
            None => RawValue::ZERO,
        }
    }
}

fn entry_offset(function: &Function) -> u32 {
    match function.blocks().first() {
        Some(block) if block.is_started() => block.offset,
        _ => panic!("{} has no body", function.name()),
    }
}

fn block_offset(function: &Function, target: BlockId) -> u32 {
    match function.blocks().get(target.index()) {
        Some(block) if block.is_started() => block.offset,
        _ => panic!(
            "{} jumps to {target}, which has no instructions",
            function.name()
        ),
    }
}

#[track_caller]
fn to_u32(value: usize) -> u32 {
    match u32::try_from(value) {
        Ok(value) => value,
        Err(_) => panic!("interpreter offset {value} does not fit in 32 bits"),
    }
}

// ─── Value representation ───────────────────────────────────────────────

fn bit_width(info: &TypeInfo) -> u32 {
    info.size * 8
}

fn zero_extend(bits: u64, width: u32) -> u64 {
    if width >= 64 {
        bits
    } else {
        bits & ((1u64 << width) - 1)
    }
}

fn sign_extend(bits: u64, width: u32) -> i64 {
    if width >= 64 {
        bits as i64
    } else {
        let shift = 64 - width;
        ((bits << shift) as i64) >> shift
    }
}

/// Bring raw `bits` of type `info` into register form: narrow integers
/// sign- or zero-extended by signedness, `f32` in the low 32 bits.
fn normalize(info: &TypeInfo, bits: u64) -> RawValue {
    let width = bit_width(info);
    if info.is_float() {
        return RawValue::from_bits(zero_extend(bits, width));
    }
    if info.flags.contains(TypeFlags::UNSIGNED) || info.is_pointer() {
        RawValue::from_u64(zero_extend(bits, width))
    } else {
        RawValue::from_i64(sign_extend(bits, width))
    }
}

fn load(ptr: *const u8, size: u32) -> u64 {
    // SAFETY: IR addresses come from `alloc_stack` or from native code; the
    // builder checked that the loaded type matches the pointee.
    unsafe {
        match size {
            1 => u64::from(ptr.read()),
            2 => u64::from(ptr.cast::<u16>().read_unaligned()),
            4 => u64::from(ptr.cast::<u32>().read_unaligned()),
            8 => ptr.cast::<u64>().read_unaligned(),
            _ => panic!("load of {size} bytes is not supported"),
        }
    }
}

fn store(ptr: *mut u8, size: u32, bits: u64) {
    // SAFETY: as for `load`.
    unsafe {
        match size {
            1 => ptr.write(bits as u8),
            2 => ptr.cast::<u16>().write_unaligned(bits as u16),
            4 => ptr.cast::<u32>().write_unaligned(bits as u32),
            8 => ptr.cast::<u64>().write_unaligned(bits),
            _ => panic!("store of {size} bytes is not supported"),
        }
    }
}

// ─── Arithmetic ─────────────────────────────────────────────────────────

fn int_binary(op: BinOp, info: &TypeInfo, a: RawValue, b: RawValue, func: &Function) -> RawValue {
    let width = bit_width(info);
    let (ua, ub) = (zero_extend(a.bits(), width), zero_extend(b.bits(), width));
    let (sa, sb) = (sign_extend(a.bits(), width), sign_extend(b.bits(), width));
    let check_divisor = || {
        assert!(ub != 0, "division by zero in {}", func.name());
    };
    let shift = |amount: u64| (amount % u64::from(width)) as u32;

    let bits = match op {
        BinOp::IAdd => ua.wrapping_add(ub),
        BinOp::ISub => ua.wrapping_sub(ub),
        BinOp::IMul => ua.wrapping_mul(ub),
        BinOp::SDiv => {
            check_divisor();
            sa.wrapping_div(sb) as u64
        }
        BinOp::UDiv => {
            check_divisor();
            ua / ub
        }
        BinOp::SRem => {
            check_divisor();
            sa.wrapping_rem(sb) as u64
        }
        BinOp::URem => {
            check_divisor();
            ua % ub
        }
        BinOp::And => ua & ub,
        BinOp::Or => ua | ub,
        BinOp::Xor => ua ^ ub,
        BinOp::Shl => ua << shift(ub),
        BinOp::LShr => ua >> shift(ub),
        BinOp::AShr => (sa >> shift(ub)) as u64,
        BinOp::FAdd | BinOp::FSub | BinOp::FMul | BinOp::FDiv => {
            panic!("{} is not an integer operation", op.mnemonic())
        }
    };
    normalize(info, bits)
}

fn float_binary(op: BinOp, info: &TypeInfo, a: RawValue, b: RawValue) -> RawValue {
    macro_rules! apply {
        ($a:expr, $b:expr) => {
            match op {
                BinOp::FAdd => $a + $b,
                BinOp::FSub => $a - $b,
                BinOp::FMul => $a * $b,
                BinOp::FDiv => $a / $b,
                _ => panic!("{} is not a floating-point operation", op.mnemonic()),
            }
        };
    }
    if info.size == 4 {
        RawValue::from_f32(apply!(a.as_f32(), b.as_f32()))
    } else {
        RawValue::from_f64(apply!(a.as_f64(), b.as_f64()))
    }
}

fn int_compare(pred: IntPredicate, info: &TypeInfo, a: RawValue, b: RawValue) -> bool {
    let width = bit_width(info);
    let (ua, ub) = (zero_extend(a.bits(), width), zero_extend(b.bits(), width));
    let (sa, sb) = (sign_extend(a.bits(), width), sign_extend(b.bits(), width));
    match pred {
        IntPredicate::Eq => ua == ub,
        IntPredicate::Ne => ua != ub,
        IntPredicate::Slt => sa < sb,
        IntPredicate::Sle => sa <= sb,
        IntPredicate::Sgt => sa > sb,
        IntPredicate::Sge => sa >= sb,
        IntPredicate::Ult => ua < ub,
        IntPredicate::Ule => ua <= ub,
        IntPredicate::Ugt => ua > ub,
        IntPredicate::Uge => ua >= ub,
    }
}

#[allow(clippy::float_cmp, reason = "IR float comparisons are exact")]
fn float_compare(pred: FloatPredicate, info: &TypeInfo, a: RawValue, b: RawValue) -> bool {
    let (a, b) = if info.size == 4 {
        (f64::from(a.as_f32()), f64::from(b.as_f32()))
    } else {
        (a.as_f64(), b.as_f64())
    };
    match pred {
        FloatPredicate::Oeq => a == b,
        FloatPredicate::One => a < b || a > b,
        FloatPredicate::Olt => a < b,
        FloatPredicate::Ole => a <= b,
        FloatPredicate::Ogt => a > b,
        FloatPredicate::Oge => a >= b,
    }
}
