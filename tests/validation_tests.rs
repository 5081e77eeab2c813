// tests/validation_tests.rs
//! Programs the compiler must reject, checked through the public entry point.
//!
//! Each test names the error class and the detail that identifies the
//! offending construct.


use glacier::*;

fn compile_err(source: &str) -> CompileError {
    test_harness::init_test_logging();
    match compile(source) {
        Ok(_) => panic!("Expected compilation to fail:\n{source}"),
        Err(err) => err,
    }
}

fn expect_parse_error(source: &str, expected_kind: ParseErrorKind) -> ParseError {
    match compile_err(source) {
        CompileError::Parse(err) => {
            assert_eq!(err.kind, expected_kind, "unexpected parse error: {err}");
            err
        }
        other => panic!("Expected a parse error, got: {other:?}"),
    }
}

fn expect_type_error(source: &str) -> TypeError {
    match compile_err(source) {
        CompileError::Type(err) => err,
        other => panic!("Expected a type error, got: {other:?}"),
    }
}

// =========================================
// Syntax
// =========================================

#[test]
fn test_unrecognized_character() {
    let err = expect_parse_error(
        "fn main() -> void { let x = 1 $ 2; }",
        ParseErrorKind::UnrecognizedCharacter,
    );
    assert_eq!((err.span.line, err.span.col), (1, 31));
}

#[test]
fn test_missing_semicolon() {
    expect_parse_error(
        "fn main() -> void { print(1) }",
        ParseErrorKind::ExpectedToken,
    );
}

#[test]
fn test_missing_return_type() {
    expect_parse_error("fn main() { }", ParseErrorKind::ExpectedToken);
}

#[test]
fn test_struct_requires_trailing_semicolon() {
    expect_parse_error(
        "struct A { int x; } fn main() -> void { }",
        ParseErrorKind::ExpectedToken,
    );
}

#[test]
fn test_vector_literal_requires_element_type() {
    expect_parse_error(
        "fn main() -> void { let v = [1, 2]; }",
        ParseErrorKind::ExpectedToken,
    );
}

#[test]
fn test_integer_literal_overflow() {
    expect_parse_error(
        "fn main() -> void { print(99999999999999999999); }",
        ParseErrorKind::InvalidLiteral,
    );
}

#[test]
fn test_unexpected_end_of_input() {
    expect_parse_error("fn main() -> void {", ParseErrorKind::UnexpectedEof);
}

// =========================================
// Names
// =========================================

#[test]
fn test_unknown_function() {
    let err = expect_type_error("fn main() -> void { frobnicate(1); }");
    assert!(matches!(err, TypeError::UnknownFunction { ref name, .. } if name == "frobnicate"));
}

#[test]
fn test_duplicate_function() {
    let err = expect_type_error("fn f() -> void { } fn f() -> void { } fn main() -> void { }");
    assert!(matches!(err, TypeError::DuplicateFunction { ref name, .. } if name == "f"));
}

#[test]
fn test_function_shadowing_intrinsic() {
    let err = expect_type_error("fn print(int x) -> void { } fn main() -> void { }");
    assert!(matches!(err, TypeError::DuplicateFunction { ref name, .. } if name == "print"));
}

#[test]
fn test_duplicate_struct() {
    let err = expect_type_error("struct A { int x; }; struct A { int y; }; fn main() -> void { }");
    assert!(matches!(err, TypeError::DuplicateStruct { ref name, .. } if name == "A"));
}

#[test]
fn test_redeclared_local() {
    let err = expect_type_error("fn f(int a) -> void { let a = 2; } fn main() -> void { }");
    assert!(matches!(err, TypeError::DuplicateVariable { ref name, .. } if name == "a"));
}

#[test]
fn test_unknown_member() {
    let err = expect_type_error(
        "struct P { int x = 0; }; fn main() -> void { let p = new P(); print(p.y); }",
    );
    assert!(matches!(err, TypeError::UnknownMember { .. }));
}

#[test]
fn test_unknown_method() {
    let err = expect_type_error(
        "struct P { int x = 0; }; fn main() -> void { let p = new P(); p.run(); }",
    );
    assert!(matches!(err, TypeError::UnknownMethod { .. }));
}

#[test]
fn test_struct_used_before_declaration() {
    let err = expect_type_error("struct A { B b; }; struct B { int x; }; fn main() -> void { }");
    assert!(matches!(err, TypeError::UnknownStruct { ref name, .. } if name == "B"));
}

// =========================================
// Types
// =========================================

#[test]
fn test_mixed_operands() {
    let err = expect_type_error("fn main() -> void { print(1 + \"a\"); }");
    assert!(matches!(err, TypeError::OperandMismatch { ref op, .. } if op == "+"));
}

#[test]
fn test_string_ordering_rejected() {
    let err = expect_type_error("fn main() -> void { print(\"a\" < \"b\"); }");
    assert!(matches!(err, TypeError::OperandMismatch { ref op, .. } if op == "<"));
}

#[test]
fn test_string_equality_rejected() {
    let err = expect_type_error(r#"fn main() -> void { if ("a" == "b") { print(1); } }"#);
    assert!(matches!(err, TypeError::OperandMismatch { ref op, ref left, ref right, .. }
        if op == "==" && left == "string" && right == "string"));
}

#[test]
fn test_struct_map_key_rejected() {
    let err = expect_type_error(
        "struct P { int x = 0; }; fn main() -> void { let m = {} <P, int>; print(m[new P()]); }",
    );
    assert!(matches!(err, TypeError::InvalidMapKey { ref found, .. } if found == "P"));
}

#[test]
fn test_void_parameter_rejected() {
    let err = expect_type_error("fn f(void x) -> void { } fn main() -> void { }");
    assert!(matches!(err, TypeError::VoidType { .. }));
}

#[test]
fn test_condition_must_be_int() {
    let err = expect_type_error("fn main() -> void { if (\"yes\") { print(1); } }");
    assert!(matches!(err, TypeError::TypeMismatch { ref context, .. } if context == "if condition"));
}

#[test]
fn test_assignment_type_mismatch() {
    let err = expect_type_error("fn main() -> void { let x = 1; x = \"two\"; }");
    assert!(matches!(err, TypeError::TypeMismatch { ref expected, ref found, .. }
        if expected == "int" && found == "string"));
}

#[test]
fn test_chained_assignment_rejected() {
    let err = expect_type_error("fn main() -> void { let a = 1; let b = 2; a = b = 3; }");
    assert!(matches!(err, TypeError::VoidValue { .. }));
}

#[test]
fn test_assign_to_literal() {
    let err = expect_type_error("fn main() -> void { 1 = 2; }");
    assert!(matches!(err, TypeError::NotAssignable { .. }));
}

#[test]
fn test_index_non_collection() {
    let err = expect_type_error("fn main() -> void { let x = 1; print(x[0]); }");
    assert!(matches!(err, TypeError::NotIndexable { .. }));
}

#[test]
fn test_wrong_argument_count() {
    let err = expect_type_error("fn f(int a) -> int { return a; } fn main() -> void { f(1, 2); }");
    assert!(matches!(err, TypeError::ArgumentCount { expected: 1, got: 2, .. }));
}

#[test]
fn test_intrinsic_argument_type() {
    let err = expect_type_error("fn main() -> void { push(1, 2); }");
    assert!(matches!(err, TypeError::ArgumentType { ref callee, position: 1, .. } if callee == "push"));
}

#[test]
fn test_void_value_in_let() {
    let err = expect_type_error("fn f() -> void { } fn main() -> void { let x = f(); }");
    assert!(matches!(err, TypeError::VoidValue { .. }));
}

#[test]
fn test_missing_return_value() {
    let err = expect_type_error("fn f() -> int { return; } fn main() -> void { }");
    assert!(matches!(err, TypeError::MissingReturnValue { .. }));
}

#[test]
fn test_return_value_from_void() {
    let err = expect_type_error("fn main() -> void { return 1; }");
    assert!(matches!(err, TypeError::UnexpectedReturnValue { .. }));
}

// =========================================
// Structs
// =========================================

#[test]
fn test_too_many_constructor_args() {
    let err = expect_type_error("struct P { int x; }; fn main() -> void { let p = new P(1, 2); }");
    assert!(matches!(err, TypeError::TooManyConstructorArgs { .. }));
}

#[test]
fn test_uncovered_member_without_default() {
    let err = expect_type_error(
        "struct P { int x; int y; }; fn main() -> void { let p = new P(1); }",
    );
    assert!(matches!(err, TypeError::MissingMemberValue { ref member, .. } if member == "y"));
}

#[test]
fn test_default_of_wrong_type() {
    let err = expect_type_error("struct P { int x = \"zero\"; }; fn main() -> void { }");
    assert!(matches!(err, TypeError::TypeMismatch { .. }));
}

#[test]
fn test_vector_member_unsupported() {
    let err = expect_type_error("struct P { vector<int> xs; }; fn main() -> void { }");
    assert!(matches!(err, TypeError::UnsupportedMemberType { .. }));
}

#[test]
fn test_self_referential_default() {
    let err = expect_type_error("struct N { N next = new N(); }; fn main() -> void { }");
    assert!(matches!(err, TypeError::RecursiveDefault { ref struct_name, .. } if struct_name == "N"));
}

// =========================================
// Encoding limits
// =========================================

#[test]
fn test_byte_width_rejects_large_literal() {
    test_harness::init_test_logging();
    let err = compile_with(
        "fn main() -> void { print(300); }",
        &CompileOptions::compatible(),
    )
    .unwrap_err();
    assert!(err.is_encode(), "expected an encode error, got {err:?}");

    // The same program fits at the default width.
    assert!(compile("fn main() -> void { print(300); }").is_ok());
}
