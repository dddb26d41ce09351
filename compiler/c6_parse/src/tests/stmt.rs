use c6_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

use super::{dump_file, parse_err, parse_src};

#[test]
fn test_control_flow_statements() {
    let src = "\
main :: func() {
    if a < b { return a; } else return b;
    while i { i = i - 1; }
    defer f();
    break;
    continue;
    var n: i32;
    return;
}
";
    let expected = "\
File
  Function main
    Block
      If
        BinaryOp <
          Identifier a
          Identifier b
        Block
          Return
            Identifier a
        Else
          Return
            Identifier b
      While
        Identifier i
        Block
          Assignment
            Identifier i
            =
              BinaryOp -
                Identifier i
                NumberLiteral 1
      Defer
        ExpressionStatement
          Call
            Identifier f
      Break
      Continue
      VariableDefinition
        Var n
          Type i32
      Return
";
    assert_eq!(dump_file(src), expected);
}

#[test]
fn test_multiple_assignment_and_returns() {
    let src = "swap :: func(a, b: i64) (i64, i64) { a, b = b, a; return a, b; }";
    let expected = "\
File
  Function swap
    Var a
      Type i64
    Var b
      Type i64
    Returns
      Type i64
      Type i64
    Block
      Assignment
        Identifier a
        Identifier b
        =
          Identifier b
          Identifier a
      Return
        Identifier a
        Identifier b
";
    assert_eq!(dump_file(src), expected);
}

#[test]
fn test_local_declarations() {
    let src = "main :: func() { K :: 3; Inner :: struct { v: u8; } x, y: f32 = 1.5, K.(f32); }";
    let expected = "\
File
  Function main
    Block
      Const K
        NumberLiteral 3
      Struct Inner
        VariableDefinition
          Var v
            Type u8
      VariableDefinition
        Var x
          Type f32
          NumberLiteral 1.5
        Var y
          Type f32
          Cast
            Identifier K
            Type f32
";
    assert_eq!(dump_file(src), expected);
}

#[test]
fn test_initializer_count_mismatch() {
    let err = parse_err("a, b := 1;");
    assert_eq!(err.code, ErrorCode::E1007);
    assert_eq!(err.offset(), 8);

    let err = parse_err("a: i32 = 1, 2;");
    assert_eq!(err.code, ErrorCode::E1007);
}

#[test]
fn test_type_or_initializer_required() {
    let err = parse_err("x: ;");
    assert_eq!(err.code, ErrorCode::E1008);
    assert_eq!(err.offset(), 3);
    assert_eq!(err.message, "expected type or initializer, found `;`");
}

#[test]
fn test_furthest_error_wins() {
    let err = parse_err("main :: func() { x + ; }");
    assert_eq!(err.code, ErrorCode::E1002);
    assert_eq!(err.offset(), 21);
    assert_eq!(err.message, "expected expression, found `;`");
}

#[test]
fn test_unknown_statement() {
    let err = parse_err("main :: func() { ) }");
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected statement, found `)`");
}

#[test]
fn test_unclosed_block() {
    let err = parse_err("main :: func() { a := 1;");
    assert_eq!(err.offset(), 24);
}

#[test]
fn test_failed_alternatives_leave_no_nodes() {
    // `a + b;` is first tried as an assignment, which allocates three nodes
    // before failing at `;`.
    let src = "main :: func() { a := 1; b = a; a + b; }";
    let out = parse_src(src);
    let dump = dump_file(src);
    let reachable = dump.lines().filter(|line| line.trim() != "=").count();
    assert_eq!(reachable, 13);
    assert_eq!(out.pool.len(), reachable);
}
