// tests/integration_tests.rs
//! End-to-end compilation of the scripts in `test_scripts/`.


use glacier::bytecode::MAGIC;
use glacier::{CompileError, CompileOptions, Instruction, LexError, OperandWidth, TypeError};
use std::collections::HashSet;
use test_harness::{TestHarness, TestResult};

fn contains_sequence(result: &TestResult, expected: &[Instruction]) -> bool {
    let instructions: Vec<Instruction> = result.program.body_instructions().cloned().collect();
    instructions.windows(expected.len()).any(|w| w == expected)
}

/// Every function-table entry points at the matching `FUNCTION_DEF` marker.
fn assert_function_table_consistent(result: &TestResult) {
    let defs: HashSet<(usize, u32)> = result.function_defs().into_iter().collect();
    let table = result.function_table();
    assert_eq!(table.len(), defs.len());
    for (id, offset) in table {
        assert!(
            defs.contains(&(offset as usize, id)),
            "function {id} listed at {offset}, markers: {defs:?}"
        );
    }
}

fn assert_jumps_land_on_instructions(result: &TestResult) {
    let offsets: HashSet<usize> = result.program.body.iter().map(|(at, _)| *at).collect();
    for instr in result.program.body_instructions() {
        if let Instruction::Jump(target)
        | Instruction::JumpIfTrue(target)
        | Instruction::JumpIfFalse(target) = instr
        {
            assert!(
                offsets.contains(&(*target as usize)),
                "jump to {target} does not start an instruction"
            );
        }
    }
}

// =========================================
// Scripts
// =========================================

#[test]
fn test_hello_world() {
    let harness = TestHarness::new();
    let result = harness.compile("hello.glc");

    assert_eq!(
        result.program.header,
        vec![Instruction::FunctionJmp { id: 0, offset: 0 }]
    );
    assert_eq!(
        result.instructions(),
        vec![
            &Instruction::FunctionDef { id: 0, params: 0 },
            &Instruction::String("hello, world".to_string()),
            &Instruction::Print,
            &Instruction::Return,
        ]
    );
}

#[test]
fn test_structs() {
    let harness = TestHarness::new();
    let result = harness.compile("structs.glc");

    assert_eq!(
        result.struct_defs(),
        vec![(2, vec![0, 0]), (3, vec![2, 2, 1])]
    );
    assert_function_table_consistent(&result);

    // `new Line()` expands both Point defaults in place.
    assert_eq!(result.count(|i| *i == Instruction::Struct(2)), 2);
    assert_eq!(result.count(|i| *i == Instruction::Struct(3)), 1);

    // line.to.x = 5
    assert!(contains_sequence(
        &result,
        &[
            Instruction::Int(5),
            Instruction::GetVar(0),
            Instruction::GetStructMember(1),
            Instruction::SetStructMember(0),
        ]
    ));

    // print(line.to.sum())
    assert!(contains_sequence(
        &result,
        &[
            Instruction::GetVar(0),
            Instruction::GetStructMember(1),
            Instruction::CallFunc(1),
            Instruction::Print,
        ]
    ));
}

#[test]
fn test_control_flow() {
    let harness = TestHarness::new();
    let result = harness.compile("control_flow.glc");

    assert_function_table_consistent(&result);
    assert_jumps_land_on_instructions(&result);
    assert_eq!(result.count(|i| *i == Instruction::CallFunc(1)), 3);
    assert_eq!(result.count(|i| *i == Instruction::ReturnVal), 2);

    // The while loop jumps backwards to its condition.
    let back_edges = result
        .program
        .body
        .iter()
        .filter(|(at, instr)| matches!(instr, Instruction::Jump(target) if (*target as usize) < *at))
        .count();
    assert_eq!(back_edges, 1);
}

#[test]
fn test_collections() {
    let harness = TestHarness::new();
    let result = harness.compile("collections.glc");

    assert!(contains_sequence(
        &result,
        &[
            Instruction::Int(3),
            Instruction::Int(2),
            Instruction::Int(1),
            Instruction::Vec(3),
        ]
    ));
    assert!(contains_sequence(
        &result,
        &[
            Instruction::String("ann".to_string()),
            Instruction::Int(31),
            Instruction::String("bob".to_string()),
            Instruction::Int(27),
            Instruction::Map(2),
        ]
    ));
    assert_eq!(result.count(|i| *i == Instruction::Vec(0)), 1);
    assert_eq!(result.count(|i| *i == Instruction::VecPush), 2);
    assert_eq!(result.count(|i| *i == Instruction::VecLen), 1);
    assert_eq!(result.count(|i| *i == Instruction::VecPop), 1);
    assert_eq!(result.count(|i| *i == Instruction::VecAccess), 1);
    assert_eq!(result.count(|i| *i == Instruction::MapAccess), 1);
    assert_eq!(result.count(|i| *i == Instruction::MapInsert), 1);
    assert_eq!(result.count(|i| *i == Instruction::ReadStr), 1);
    assert_eq!(result.count(|i| *i == Instruction::ReadInt), 1);
}

#[test]
fn test_methods_and_forward_calls() {
    let harness = TestHarness::new();
    let result = harness.compile("methods.glc");

    // bump=1, get=2, main=0, isEven=3, isOdd=4
    let mut ids: Vec<u32> = result.function_table().iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_function_table_consistent(&result);

    assert_eq!(result.count(|i| *i == Instruction::CallFunc(1)), 1);
    assert_eq!(result.count(|i| *i == Instruction::CallFunc(2)), 1);
    assert_eq!(result.count(|i| *i == Instruction::CallFunc(3)), 2);
    assert_eq!(result.count(|i| *i == Instruction::CallFunc(4)), 1);

    // c.bump(3): receiver first, then the argument.
    assert!(contains_sequence(
        &result,
        &[
            Instruction::GetVar(0),
            Instruction::Int(3),
            Instruction::CallFunc(1),
        ]
    ));
}

// =========================================
// Options and container
// =========================================

#[test]
fn test_widths_decode_to_same_program() {
    let harness = TestHarness::new();
    let wide = harness.compile("control_flow.glc");
    let narrow = harness.compile_with("control_flow.glc", &CompileOptions::compatible());

    assert_jumps_land_on_instructions(&narrow);
    assert_function_table_consistent(&narrow);

    // Offsets differ between widths, so compare everything but jump targets.
    let strip = |result: &TestResult| -> Vec<Instruction> {
        result
            .program
            .body_instructions()
            .filter(|i| {
                !matches!(
                    i,
                    Instruction::Jump(_) | Instruction::JumpIfTrue(_) | Instruction::JumpIfFalse(_)
                )
            })
            .cloned()
            .collect()
    };
    assert_eq!(strip(&wide), strip(&narrow));
    assert!(narrow.artifact.body().len() < wide.artifact.body().len());
}

#[test]
fn test_preamble_layout() {
    let harness = TestHarness::new();
    let result = harness.compile("methods.glc");
    let bytes = result.artifact.to_bytes();

    assert_eq!(&bytes[..4], &MAGIC);
    assert_eq!(bytes[4], 1);
    assert_eq!(bytes[5], 4);
    let header_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    assert_eq!(header_len, result.artifact.header().len());
    assert_eq!(bytes.len(), 10 + header_len + result.artifact.body().len());
    assert_eq!(*result.artifact.header().last().unwrap(), 0x0E);

    let decoded = glacier::bytecode::decode(&bytes, &CompileOptions::default()).unwrap();
    assert_eq!(decoded, result.program);
}

#[test]
fn test_compatible_layout_has_no_preamble() {
    let harness = TestHarness::new();
    let result = harness.compile_with("hello.glc", &CompileOptions::compatible());
    let bytes = result.artifact.to_bytes();

    assert_eq!(result.artifact.options().operand_width, OperandWidth::Byte);
    assert_eq!(bytes[0], 0x0D);
    assert_eq!(&bytes[..4], &[0x0D, 0, 0, 0x0E]);
    assert_eq!(bytes.len(), 4 + result.artifact.body().len());
}

#[test]
fn test_disassembly_lists_sections() {
    let harness = TestHarness::new();
    let result = harness.compile("hello.glc");
    let listing = result.artifact.disassemble().unwrap();

    assert!(listing.starts_with("header:\n  FUNCTION_JMP 0 @0\n"));
    assert!(listing.contains("body:\n"));
    assert!(listing.contains("STRING \"hello, world\""));
    assert!(listing.contains("PRINT"));
}

#[test]
fn test_compilation_is_deterministic() {
    let harness = TestHarness::new();
    let source = harness.load("structs.glc");
    let a = glacier::compile(&source).unwrap();
    let b = glacier::compile(&source).unwrap();
    assert_eq!(a.to_bytes(), b.to_bytes());
}

// =========================================
// Dumps
// =========================================

#[test]
fn test_dump_tokens() {
    let harness = TestHarness::new();
    let dump = glacier::dump_tokens(&harness.load("hello.glc")).unwrap();
    let first = dump.lines().next().unwrap();
    assert_eq!(first, "1:1\tFn\tfn");
    assert!(dump.contains("2:11\tStringLiteral\t\"hello, world\""));
}

#[test]
fn test_dump_ast() {
    let harness = TestHarness::new();
    let dump = glacier::dump_ast(&harness.load("structs.glc")).unwrap();
    assert!(dump.starts_with("struct Point\n  member int x\n"));
    assert!(dump.contains("struct Line\n  member Point from\n    new Point\n"));
    assert!(dump.contains("fn sum(Point this) -> int"));
}

// =========================================
// Rejected scripts
// =========================================

#[test]
fn test_undefined_variable_script() {
    let harness = TestHarness::new();
    let err = harness.compile_err("errors/undefined_variable.glc");
    match err {
        CompileError::Type(TypeError::UnknownVariable { name, span }) => {
            assert_eq!(name, "b");
            assert_eq!((span.line, span.col), (3, 15));
        }
        other => panic!("expected an unknown variable, got {other:?}"),
    }
}

#[test]
fn test_bad_argument_script() {
    let harness = TestHarness::new();
    let err = harness.compile_err("errors/bad_argument.glc");
    match err {
        CompileError::Type(TypeError::ArgumentType {
            callee,
            position,
            expected,
            found,
            ..
        }) => {
            assert_eq!(callee, "square");
            assert_eq!(position, 1);
            assert_eq!(expected, "int");
            assert_eq!(found, "string");
        }
        other => panic!("expected an argument type error, got {other:?}"),
    }
}

#[test]
fn test_unterminated_string_script() {
    let harness = TestHarness::new();
    let err = harness.compile_err("errors/unterminated_string.glc");
    assert!(matches!(
        err,
        CompileError::Lex(LexError::UnterminatedString { .. })
    ));
}
