#![allow(clippy::unwrap_used, clippy::expect_used)]

use c6_arena::Arena;
use c6_ssa::{BinOp, Builder, FuncId, IntPredicate, Module, RawValue};
use c6_types::{TypeId, TypeRegistry};
use pretty_assertions::assert_eq;

use super::*;

fn arena() -> Arena {
    Arena::with_capacity(256 * 1024)
}

fn run(module: &Module, types: &TypeRegistry, func: FuncId, args: &[RawValue]) -> RawValue {
    let mut arena = arena();
    Interpreter::new(module, types, InterpreterConfig::default()).run(&mut arena, func, args)
}

fn build_add(b: &mut Builder<'_>) -> FuncId {
    let add = b.function("add", &[TypeId::I64, TypeId::I64], Some(TypeId::I64));
    let (x, y) = (b.arg(0), b.arg(1));
    let sum = b.iadd(x, y);
    b.ret(sum);
    add
}

/// `fact(n) = n <= 1 ? 1 : n * fact(n - 1)`
fn build_factorial(b: &mut Builder<'_>) -> FuncId {
    let fact = b.function("fact", &[TypeId::I64], Some(TypeId::I64));
    let n = b.arg(0);
    let base_case = b.create_block();
    let recurse = b.create_block();
    let one = b.const_i64(1);
    let small = b.icmp(IntPredicate::Sle, n, one);
    b.branch(small, base_case, recurse);
    b.switch_to(base_case);
    b.ret(one);
    b.switch_to(recurse);
    let pred = b.isub(n, one);
    let rest = b.call(fact, &[pred]).unwrap();
    let product = b.imul(n, rest);
    b.ret(product);
    fact
}

#[test]
fn test_add() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let add = build_add(&mut Builder::new(&mut module, &types));
    let result = run(&module, &types, add, &[RawValue::from_i64(1), RawValue::from_i64(2)]);
    assert_eq!(result.as_i64(), 3);
}

#[test]
fn test_nested_calls() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let add = build_add(&mut b);
    let add3 = b.function(
        "add3",
        &[TypeId::I64, TypeId::I64, TypeId::I64],
        Some(TypeId::I64),
    );
    let (x, y, z) = (b.arg(0), b.arg(1), b.arg(2));
    let partial = b.call(add, &[x, y]).unwrap();
    let total = b.call(add, &[partial, z]).unwrap();
    b.ret(total);

    let args = [1, 2, 3].map(RawValue::from_i64);
    assert_eq!(run(&module, &types, add3, &args).as_i64(), 6);
}

#[test]
fn test_stack_slot_round_trip() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("slot", &[], Some(TypeId::U64));
    let slot = b.alloca(TypeId::U64);
    let value = b.const_u64(12_345_678);
    b.store(slot, value);
    let loaded = b.load(slot);
    b.ret(loaded);

    assert_eq!(run(&module, &types, f, &[]).as_u64(), 12_345_678);
}

#[test]
fn test_recursion() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let fact = build_factorial(&mut Builder::new(&mut module, &types));
    let result = run(&module, &types, fact, &[RawValue::from_i64(20)]);
    assert_eq!(result.as_i64(), 2_432_902_008_176_640_000);
}

#[test]
fn test_loop_over_locals() {
    // i := 1; sum := 0; while i <= 100 { sum = sum + i; i = i + 1; } return sum;
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("sum", &[], Some(TypeId::I64));
    let i = b.alloca(TypeId::I64);
    let sum = b.alloca(TypeId::I64);
    let head = b.create_block();
    let body = b.create_block();
    let exit = b.create_block();
    let one = b.const_i64(1);
    let zero = b.const_i64(0);
    let limit = b.const_i64(100);
    b.store(i, one);
    b.store(sum, zero);
    b.jump(head);

    b.switch_to(head);
    let iv = b.load(i);
    let more = b.icmp(IntPredicate::Sle, iv, limit);
    b.branch(more, body, exit);

    b.switch_to(body);
    let sv = b.load(sum);
    let iv = b.load(i);
    let next_sum = b.iadd(sv, iv);
    b.store(sum, next_sum);
    let next_i = b.iadd(iv, one);
    b.store(i, next_i);
    b.jump(head);

    b.switch_to(exit);
    let total = b.load(sum);
    b.ret(total);

    assert_eq!(run(&module, &types, f, &[]).as_i64(), 5050);
}

#[test]
fn test_callee_locals_do_not_clobber_caller() {
    // inner writes its own slot; outer's slot must survive the call.
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let inner = b.function("inner", &[], Some(TypeId::I64));
    let slot = b.alloca(TypeId::I64);
    let junk = b.const_i64(-1);
    b.store(slot, junk);
    let v = b.load(slot);
    b.ret(v);

    let outer = b.function("outer", &[], Some(TypeId::I64));
    let slot = b.alloca(TypeId::I64);
    let keep = b.const_i64(42);
    b.store(slot, keep);
    let junk = b.call(inner, &[]).unwrap();
    let kept = b.load(slot);
    let sum = b.iadd(kept, junk);
    b.ret(sum);

    assert_eq!(run(&module, &types, outer, &[]).as_i64(), 41);
}

#[test]
fn test_narrow_integers_wrap() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let wrap32 = b.function("wrap32", &[TypeId::I32], Some(TypeId::I32));
    let x = b.arg(0);
    let one = b.constant(TypeId::I32, RawValue::from_i64(1));
    let y = b.iadd(x, one);
    b.ret(y);

    let wrap8 = b.function("wrap8", &[], Some(TypeId::U8));
    let slot = b.alloca(TypeId::U8);
    let max = b.constant(TypeId::U8, RawValue::from_u64(0xff));
    b.store(slot, max);
    let v = b.load(slot);
    let one = b.constant(TypeId::U8, RawValue::from_u64(1));
    let y = b.iadd(v, one);
    b.ret(y);

    let max32 = RawValue::from_i64(i64::from(i32::MAX));
    assert_eq!(
        run(&module, &types, wrap32, &[max32]).as_i64(),
        i64::from(i32::MIN)
    );
    assert_eq!(run(&module, &types, wrap8, &[]).as_u64(), 0);
}

#[test]
fn test_shifts_and_unsigned_ops() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let mut funcs = Vec::new();
    for op in [BinOp::AShr, BinOp::LShr, BinOp::UDiv, BinOp::SRem] {
        let f = b.function(op.mnemonic(), &[TypeId::I8, TypeId::I8], Some(TypeId::I8));
        let (x, y) = (b.arg(0), b.arg(1));
        let r = b.binary(op, x, y);
        b.ret(r);
        funcs.push(f);
    }

    let args = |x: i64, y: i64| [RawValue::from_i64(x), RawValue::from_i64(y)];
    let results: Vec<i64> = funcs
        .iter()
        .zip([args(-16, 2), args(-1, 4), args(-2, 2), args(-7, 3)])
        .map(|(&f, a)| run(&module, &types, f, &a).as_i64())
        .collect();
    // ashr -16 >> 2, lshr 0xff >> 4, 0xfe / 2, -7 % 3
    assert_eq!(results, vec![-4, 0x0f, 0x7f, -1]);
}

#[test]
fn test_float_arithmetic() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("hyp", &[TypeId::F64, TypeId::F64], Some(TypeId::F64));
    let (x, y) = (b.arg(0), b.arg(1));
    let xx = b.fmul(x, x);
    let yy = b.fmul(y, y);
    let sum = b.fadd(xx, yy);
    b.ret(sum);

    let g = b.function("halve", &[TypeId::F32], Some(TypeId::F32));
    let x = b.arg(0);
    let two = b.constant(TypeId::F32, RawValue::from_f32(2.0));
    let half = b.fdiv(x, two);
    b.ret(half);

    let result = run(&module, &types, f, &[RawValue::from_f64(3.0), RawValue::from_f64(4.0)]);
    assert!((result.as_f64() - 25.0).abs() < f64::EPSILON);
    let result = run(&module, &types, g, &[RawValue::from_f32(5.0)]);
    assert!((result.as_f32() - 2.5).abs() < f32::EPSILON);
    assert_eq!(result.bits() >> 32, 0);
}

#[test]
fn test_arena_is_restored() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let fact = build_factorial(&mut Builder::new(&mut module, &types));

    let mut arena = arena();
    arena.alloc(24, 8, 1);
    let used = arena.used();
    let mut interp = Interpreter::new(&module, &types, InterpreterConfig::default());
    let first = interp.run(&mut arena, fact, &[RawValue::from_i64(5)]);
    let second = interp.run(&mut arena, fact, &[RawValue::from_i64(6)]);
    assert_eq!((first.as_i64(), second.as_i64()), (120, 720));
    assert_eq!(arena.used(), used);
}

// ─── Native calls through a recording caller ────────────────────────────

#[derive(Default)]
struct Recorder {
    calls: Vec<(usize, Vec<NativeArg>, NativeSignature)>,
    resolved: Vec<String>,
}

impl NativeCaller for Recorder {
    fn resolve(&mut self, symbol: &str) -> Option<usize> {
        self.resolved.push(symbol.to_owned());
        (symbol != "missing").then_some(0x1000)
    }

    unsafe fn call(&mut self, address: usize, args: &[NativeArg], signature: NativeSignature) -> u64 {
        self.calls.push((address, args.to_vec(), signature));
        args.first().map_or(0, |arg| arg.bits.wrapping_mul(2))
    }
}

#[test]
fn test_foreign_calls_use_native_caller() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let twice = b.foreign_function("twice", None, &[TypeId::I64], Some(TypeId::I64), true);
    let f = b.function("main", &[], Some(TypeId::I64));
    let a = b.const_i64(21);
    let extra = b.constant(TypeId::F32, RawValue::from_f32(1.5));
    let first = b.call(twice, &[a, extra]).unwrap();
    let second = b.call(twice, &[first]).unwrap();
    b.ret(second);

    let mut arena = arena();
    let mut interp =
        Interpreter::with_native(&module, &types, InterpreterConfig::default(), Recorder::default());
    let result = interp.run(&mut arena, f, &[]);
    assert_eq!(result.as_i64(), 84);

    let recorder = interp.native();
    assert_eq!(recorder.resolved, vec!["twice".to_owned()]);
    assert_eq!(recorder.calls.len(), 2);
    let (address, args, signature) = &recorder.calls[0];
    assert_eq!(*address, 0x1000);
    assert_eq!(args, &vec![NativeArg::int(21), NativeArg::float(1.5)]);
    assert_eq!(
        *signature,
        NativeSignature {
            returns_float: false,
            variadic: true
        }
    );
}

#[test]
fn test_external_entry_function() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let twice = Builder::new(&mut module, &types).foreign_function(
        "twice",
        None,
        &[TypeId::I32],
        Some(TypeId::I32),
        false,
    );
    let mut arena = arena();
    let mut interp =
        Interpreter::with_native(&module, &types, InterpreterConfig::default(), Recorder::default());
    // 0x4000_0000 * 2 wraps to i32::MIN.
    let result = interp.run(&mut arena, twice, &[RawValue::from_i64(0x4000_0000)]);
    assert_eq!(result.as_i64(), i64::from(i32::MIN));
    assert_eq!(arena.used(), 0);
}

#[test]
#[should_panic(expected = "cannot resolve foreign symbol `missing`")]
fn test_unresolved_symbol_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let missing = b.foreign_function("missing", None, &[], None, false);
    let f = b.function("main", &[], None);
    b.call(missing, &[]);
    b.ret_void();

    let mut arena = arena();
    Interpreter::with_native(&module, &types, InterpreterConfig::default(), Recorder::default())
        .run(&mut arena, f, &[]);
}

// ─── Limits ─────────────────────────────────────────────────────────────

fn build_endless(b: &mut Builder<'_>) -> FuncId {
    let f = b.function("endless", &[TypeId::I64], Some(TypeId::I64));
    let x = b.arg(0);
    let r = b.call(f, &[x]).unwrap();
    b.ret(r);
    f
}

#[test]
#[should_panic(expected = "interpreter stack overflow")]
fn test_stack_overflow_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let f = build_endless(&mut Builder::new(&mut module, &types));
    let mut arena = arena();
    let config = InterpreterConfig::default().with_stack_size(256);
    Interpreter::new(&module, &types, config).run(&mut arena, f, &[RawValue::ZERO]);
}

#[test]
fn test_back_edges_keep_locals_in_place() {
    // A loop of 10_000 iterations over one local runs in a 256-byte stack.
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("spin", &[], Some(TypeId::U64));
    let counter = b.alloca(TypeId::U64);
    let head = b.create_block();
    let exit = b.create_block();
    let zero = b.const_u64(0);
    let one = b.const_u64(1);
    let limit = b.const_u64(10_000);
    b.store(counter, zero);
    b.jump(head);

    b.switch_to(head);
    let n = b.load(counter);
    let next = b.iadd(n, one);
    b.store(counter, next);
    let more = b.icmp(IntPredicate::Ult, next, limit);
    b.branch(more, head, exit);

    b.switch_to(exit);
    let total = b.load(counter);
    b.ret(total);

    let mut arena = arena();
    let config = InterpreterConfig::default().with_stack_size(256);
    let result = Interpreter::new(&module, &types, config).run(&mut arena, f, &[]);
    assert_eq!(result.as_u64(), 10_000);
}

#[test]
#[should_panic(expected = "dangling jumps to bb1, which has no instructions")]
fn test_jump_to_unstarted_block_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("dangling", &[], None);
    let never = b.create_block();
    b.jump(never);
    assert!(!module[f].is_well_formed());
    run(&module, &types, f, &[]);
}

#[test]
#[should_panic(expected = "register file overflow")]
fn test_register_overflow_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let f = build_endless(&mut Builder::new(&mut module, &types));
    let mut arena = arena();
    let config = InterpreterConfig::default().with_max_registers(64);
    Interpreter::new(&module, &types, config).run(&mut arena, f, &[RawValue::ZERO]);
}

#[test]
#[should_panic(expected = "division by zero in div")]
fn test_division_by_zero_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("div", &[TypeId::I64, TypeId::I64], Some(TypeId::I64));
    let (x, y) = (b.arg(0), b.arg(1));
    let q = b.sdiv(x, y);
    b.ret(q);
    run(&module, &types, f, &[RawValue::from_i64(1), RawValue::ZERO]);
}

#[test]
#[should_panic(expected = "add takes 2 arguments, got 1")]
fn test_entry_arity_is_checked() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let add = build_add(&mut Builder::new(&mut module, &types));
    run(&module, &types, add, &[RawValue::ZERO]);
}

// ─── Live native calls ──────────────────────────────────────────────────

#[cfg(all(target_arch = "x86_64", unix))]
#[test]
fn test_printf_through_trampoline() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let text = types.pointer_to(TypeId::U8);
    let printf = b.foreign_function("printf", Some("c"), &[text], Some(TypeId::I32), true);
    let main = b.function("main", &[text], Some(TypeId::I32));
    let fmt = b.arg(0);
    let printed = b.call(printf, &[fmt]).unwrap();
    b.ret(printed);

    let message = b"c6\n\0";
    let result = run(&module, &types, main, &[RawValue::from_ptr(message.as_ptr())]);
    assert_eq!(result.as_i64(), 3);
}

#[cfg(all(target_arch = "x86_64", unix))]
#[test]
fn test_float_result_through_trampoline() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let text = types.pointer_to(TypeId::U8);
    let atof = b.foreign_function("atof", None, &[text], Some(TypeId::F64), false);
    let main = b.function("main", &[text], Some(TypeId::F64));
    let s = b.arg(0);
    let parsed = b.call(atof, &[s]).unwrap();
    let two = b.const_f64(2.0);
    let doubled = b.fmul(parsed, two);
    b.ret(doubled);

    let digits = b"1.25\0";
    let result = run(&module, &types, main, &[RawValue::from_ptr(digits.as_ptr())]);
    assert!((result.as_f64() - 2.5).abs() < f64::EPSILON);
}
