#![allow(clippy::unwrap_used, clippy::expect_used)]

use c6_types::{TypeId, TypeRegistry};
use pretty_assertions::assert_eq;

use super::*;

fn build_add(b: &mut Builder<'_>) -> FuncId {
    let add = b.function("add", &[TypeId::I64, TypeId::I64], Some(TypeId::I64));
    let (x, y) = (b.arg(0), b.arg(1));
    let sum = b.iadd(x, y);
    b.ret(sum);
    add
}

#[test]
fn test_add_function_text() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let add = build_add(&mut b);

    let expected = "\
func add(%0: i64, %1: i64) -> i64 {
bb0:
  alloc_stack
  %2 = iadd i64 %0, %1
  ret i64 %2
}
";
    assert_eq!(module.display_function(add, &types).to_string(), expected);
    assert!(module[add].is_well_formed());
}

#[test]
fn test_entry_block_starts_with_alloc_stack() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("empty", &[], None);
    b.ret_void();
    let func = &module[f];
    assert_eq!(
        func.block(BlockId::new(0)),
        &[Instruction::AllocStack, Instruction::RetVoid]
    );
}

#[test]
fn test_locals_are_hoisted() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("slot", &[], Some(TypeId::U64));
    let p = b.alloca(TypeId::U64);
    let c = b.const_u64(12_345_678);
    b.store(p, c);
    let v = b.load(p);
    b.ret(v);

    let func = &module[f];
    assert_eq!(
        func.locals(),
        &[LocalAlloc {
            ty: TypeId::U64,
            value: p
        }]
    );
    assert_eq!(func.value_type(p), types.pointer_to(TypeId::U64));
    assert_eq!(func.value_type(v), TypeId::U64);

    let expected = "\
func slot() -> u64 {
bb0:
  alloc_stack %0: u64
  %1 = const u64 12345678
  store u64 %1, %0
  %2 = load u64, %0
  ret u64 %2
}
";
    assert_eq!(module.display_function(f, &types).to_string(), expected);
}

#[test]
fn test_branches_and_block_slices() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("max", &[TypeId::I64, TypeId::I64], Some(TypeId::I64));
    let (x, y) = (b.arg(0), b.arg(1));
    let then_bb = b.create_block();
    let else_bb = b.create_block();
    let greater = b.icmp(IntPredicate::Sgt, x, y);
    b.branch(greater, then_bb, else_bb);
    b.switch_to(then_bb);
    b.ret(x);
    b.switch_to(else_bb);
    b.ret(y);

    let func = &module[f];
    assert_eq!(func.value_type(greater), TypeId::BOOL);
    assert_eq!(
        func.blocks(),
        &[
            BasicBlock { offset: 0, len: 3 },
            BasicBlock { offset: 3, len: 1 },
            BasicBlock { offset: 4, len: 1 },
        ]
    );
    assert!(func.is_well_formed());

    let expected = "\
func max(%0: i64, %1: i64) -> i64 {
bb0:
  alloc_stack
  %2 = icmp sgt i64 %0, %1
  branch %2, bb1, bb2
bb1:
  ret i64 %0
bb2:
  ret i64 %1
}
";
    assert_eq!(module.display_function(f, &types).to_string(), expected);
}

#[test]
fn test_call_arguments_are_recovered() {
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

    let func = &module[add3];
    assert_eq!(func.call_args(3).as_slice(), &[x, y]);
    assert_eq!(func.call_args(6).as_slice(), &[partial, z]);
    assert_eq!(
        func.instructions()[6],
        Instruction::Call {
            callee: add,
            argc: 2,
            result: Some(total)
        }
    );
    assert_eq!(module.lookup("add3"), Some(add3));
    assert_eq!(module.lookup("sub"), None);

    let expected = "\
func add3(%0: i64, %1: i64, %2: i64) -> i64 {
bb0:
  alloc_stack
  push_arg %0
  push_arg %1
  %3 = call i64 @add
  push_arg %3
  push_arg %2
  %4 = call i64 @add
  ret i64 %4
}
";
    assert_eq!(module.display_function(add3, &types).to_string(), expected);
}

#[test]
fn test_foreign_function() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let text = types.pointer_to(TypeId::U8);
    let printf = b.foreign_function("printf", Some("c"), &[text], Some(TypeId::I32), true);
    let main = b.function("main", &[text], None);
    let fmt = b.arg(0);
    let n = b.const_i64(7);
    let printed = b.call(printf, &[fmt, n]);
    b.ret_void();

    let callee = &module[printf];
    assert!(callee.is_external() && callee.is_variadic());
    assert_eq!(callee.symbol(), Some("printf"));
    assert_eq!(callee.library(), Some("c"));
    assert!(callee.blocks().is_empty());
    assert!(printed.is_some());
    assert_eq!(module[main].symbol(), None);

    let text = module.display(&types).to_string();
    assert!(text.starts_with("func printf(%0: *u8, ...) -> i32 #foreign \"c\"\n\nfunc main("));
}

#[test]
fn test_native_address_is_cached() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let puts = b.foreign_function("puts", None, &[], None, false);
    let func = &module[puts];
    assert_eq!(func.native_address(|_| None), None);
    assert_eq!(func.native_address(|sym| (sym == "puts").then_some(0x1000)), Some(0x1000));
    assert_eq!(func.native_address(|_| Some(0x2000)), Some(0x1000));
}

#[test]
fn test_float_ops() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("half", &[TypeId::F64], Some(TypeId::F64));
    let x = b.arg(0);
    let two = b.const_f64(2.0);
    let half = b.fdiv(x, two);
    let _ = b.fcmp(FloatPredicate::Olt, half, x);
    b.ret(half);
    let text = module.display_function(f, &types).to_string();
    assert!(text.contains("%1 = const f64 2.0\n"));
    assert!(text.contains("%2 = fdiv f64 %0, %1\n"));
    assert!(text.contains("%3 = fcmp olt f64 %2, %0\n"));
}

#[test]
#[should_panic(expected = "already ends in a terminator")]
fn test_insert_after_terminator_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[], None);
    b.ret_void();
    b.const_i64(1);
}

#[test]
#[should_panic(expected = "must end in a terminator")]
fn test_switch_before_terminator_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[], None);
    let next = b.create_block();
    b.switch_to(next);
}

#[test]
#[should_panic(expected = "was already started")]
fn test_block_started_twice_panics() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[], None);
    let next = b.create_block();
    b.jump(next);
    b.switch_to(next);
    b.jump(next);
    b.switch_to(next);
}

#[test]
#[should_panic(expected = "bb0 is the entry block and cannot be a branch target")]
fn test_entry_block_is_not_a_branch_target() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[TypeId::BOOL], None);
    let exit = b.create_block();
    let c = b.arg(0);
    b.branch(c, BlockId::new(0), exit);
}

#[test]
fn test_unstarted_target_is_not_well_formed() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let f = b.function("f", &[], None);
    let next = b.create_block();
    b.jump(next);
    assert!(!module[f].is_well_formed());

    let mut b = Builder::new(&mut module, &types);
    let g = b.function("g", &[], None);
    let next = b.create_block();
    b.jump(next);
    b.switch_to(next);
    b.ret_void();
    assert!(module[g].is_well_formed());
}

#[test]
#[should_panic(expected = "iadd operands differ")]
fn test_operand_types_must_match() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[TypeId::I64, TypeId::I32], None);
    let (x, y) = (b.arg(0), b.arg(1));
    b.iadd(x, y);
}

#[test]
#[should_panic(expected = "store of i32 through *u64")]
fn test_store_type_must_match_pointee() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    b.function("f", &[TypeId::I32], None);
    let slot = b.alloca(TypeId::U64);
    let x = b.arg(0);
    b.store(slot, x);
}

#[test]
#[should_panic(expected = "takes 2 arguments")]
fn test_call_arity_is_checked() {
    let types = TypeRegistry::new();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module, &types);
    let add = build_add(&mut b);
    b.function("g", &[TypeId::I64], None);
    let x = b.arg(0);
    b.call(add, &[x]);
}
