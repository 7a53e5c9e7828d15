use super::*;
use cv_ir::{BlockId, Function, Instruction, IrType, Value, slot_index, verify_module};
use cv_syntax::make::*;
use cv_syntax::{BinaryOp, Item, UnaryOp};

fn lower(items: Vec<Item>) -> LowerResult<Module> {
    lower_program(&program(items), &LowerOptions::default())
}

fn lower_one(item: Item) -> Function {
    let mut module = lower(vec![item]).unwrap();
    verify_module(&module).unwrap();
    module.functions.remove(0)
}

fn add_fn() -> Item {
    function(
        "add",
        &[("a", "int"), ("b", "int")],
        "int",
        vec![ret(binary(BinaryOp::Add, var("a"), var("b")))],
    )
}

/// `int f(int x) { while (x == 0) { x = x + 1; } return x; }`
fn while_fn() -> Item {
    function(
        "f",
        &[("x", "int")],
        "int",
        vec![
            while_loop(
                binary(BinaryOp::Eq, var("x"), int(0)),
                vec![assign("x", binary(BinaryOp::Add, var("x"), int(1)))],
            ),
            ret(var("x")),
        ],
    )
}

fn loaded_slots(func: &Function) -> Vec<u32> {
    func.instructions()
        .filter_map(|instr| match instr {
            Instruction::Load { slot, .. } => Some(slot_index(*slot)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_add_lowers_to_single_block() {
    let func = lower_one(add_fn());
    assert_eq!(func.name, "add");
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.blocks.len(), 1);

    let entry = func.entry_block();
    let count = |pred: fn(&Instruction) -> bool| entry.instructions.iter().filter(|instr| pred(instr)).count();
    assert_eq!(count(|instr| matches!(instr, Instruction::Allocate { .. })), 2);
    assert_eq!(count(|instr| matches!(instr, Instruction::Store { .. })), 2);
    assert_eq!(count(|instr| matches!(instr, Instruction::Load { .. })), 2);
    assert_eq!(count(|instr| matches!(instr, Instruction::Binary { .. })), 1);

    let Some(Instruction::Binary { dest, .. }) = entry.instructions.get(6) else {
        panic!("expected the addition before the return");
    };
    assert_eq!(
        entry.terminator(),
        Some(&Instruction::Return {
            value: Some(Value::Register {
                id: *dest,
                ty: IrType::I32
            })
        })
    );
}

#[test]
fn test_while_rechecks_condition() {
    let func = lower_one(while_fn());
    let labels: Vec<&str> = func.blocks.iter().map(|block| block.label.as_str()).collect();
    assert_eq!(labels, ["entry", "while.cond.0", "while.body.0", "while.end.0"]);

    let cond = func.block_by_label("while.cond.0").unwrap();
    let body = func.block_by_label("while.body.0").unwrap();
    let end = func.block_by_label("while.end.0").unwrap();
    assert!(matches!(
        cond.terminator(),
        Some(Instruction::CondBranch { then_target, else_target, .. })
            if *then_target == body.id && *else_target == end.id
    ));
    assert_eq!(body.terminator(), Some(&Instruction::Branch { target: cond.id }));
    assert!(matches!(end.terminator(), Some(Instruction::Return { value: Some(_) })));
}

#[test]
fn test_inner_scope_shadows_outer() {
    // int f(int x) { int y = 1; { int y = 2; x = y; } return y; }
    let func = lower_one(function(
        "f",
        &[("x", "int")],
        "int",
        vec![
            var_decl("y", "int", Some(int(1))),
            nested(vec![var_decl("y", "int", Some(int(2))), assign("x", var("y"))]),
            ret(var("y")),
        ],
    ));
    assert_eq!(func.slots.len(), 3);
    assert_eq!(loaded_slots(&func), vec![2, 1]);
}

#[test]
fn test_binding_invisible_after_scope() {
    let err = lower(vec![function(
        "f",
        &[],
        "int",
        vec![nested(vec![var_decl("z", "int", Some(int(1)))]), ret(var("z"))],
    )])
    .unwrap_err();
    assert!(matches!(err, LowerError::UndeclaredIdentifier { name, .. } if name == "z"));
}

#[test]
fn test_initializer_sees_outer_binding() {
    // int f(int x) { { int x = x + 1; return x; } }
    let func = lower_one(function(
        "f",
        &[("x", "int")],
        "int",
        vec![nested(vec![
            var_decl("x", "int", Some(binary(BinaryOp::Add, var("x"), int(1)))),
            ret(var("x")),
        ])],
    ));
    assert_eq!(loaded_slots(&func), vec![0, 1]);
}

#[test]
fn test_left_operand_lowers_first() {
    let err = lower(vec![function(
        "f",
        &[],
        "int",
        vec![ret(binary(BinaryOp::Sub, var("left"), var("right")))],
    )])
    .unwrap_err();
    assert!(matches!(err, LowerError::UndeclaredIdentifier { name, .. } if name == "left"));
}

#[test]
fn test_redeclaration_in_same_block() {
    let err = lower(vec![function(
        "f",
        &[],
        "void",
        vec![var_decl("x", "int", None), var_decl("x", "int", None)],
    )])
    .unwrap_err();
    assert_eq!(err.kind(), "RedeclarationError");
}

#[test]
fn test_parameter_redeclared_in_body() {
    let err = lower(vec![function("f", &[("x", "int")], "void", vec![var_decl("x", "int", None)])]).unwrap_err();
    assert!(matches!(err, LowerError::Redeclaration { name, .. } if name == "x"));
}

#[test]
fn test_duplicate_parameter() {
    let err = lower(vec![function("f", &[("x", "int"), ("x", "int")], "void", vec![])]).unwrap_err();
    assert_eq!(err.kind(), "RedeclarationError");
}

#[test]
fn test_undeclared_identifier_suggests_names() {
    let err = lower(vec![function(
        "f",
        &[("count", "int")],
        "int",
        vec![ret(var("cuont"))],
    )])
    .unwrap_err();
    let LowerError::UndeclaredIdentifier { suggestions, .. } = err else {
        panic!("expected an undeclared identifier, got {err:?}");
    };
    assert_eq!(suggestions, vec!["count".to_string()]);
}

#[test]
fn test_duplicate_function() {
    let err = lower(vec![add_fn(), add_fn()]).unwrap_err();
    assert!(matches!(err, LowerError::DuplicateFunction { name, .. } if name == "add"));
}

#[test]
fn test_missing_return_on_fallthrough() {
    let err = lower(vec![function(
        "f",
        &[("x", "int")],
        "int",
        vec![if_else(var("x"), vec![ret(int(1))], None)],
    )])
    .unwrap_err();
    assert!(matches!(err, LowerError::MissingReturn { function, .. } if function == "f"));
}

#[test]
fn test_both_branches_return() {
    let func = lower_one(function(
        "f",
        &[("x", "int")],
        "int",
        vec![if_else(var("x"), vec![ret(int(1))], Some(vec![ret(int(2))]))],
    ));
    let labels: Vec<&str> = func.blocks.iter().map(|block| block.label.as_str()).collect();
    assert_eq!(labels, ["entry", "if.then.0", "if.else.0"]);
    assert_eq!(func.blocks[2].id, BlockId(2));
}

#[test]
fn test_integer_condition_compares_against_zero() {
    let func = lower_one(function(
        "f",
        &[("x", "int")],
        "int",
        vec![if_else(var("x"), vec![ret(int(1))], None), ret(int(0))],
    ));
    assert!(func.entry_block().instructions.iter().any(|instr| matches!(
        instr,
        Instruction::Compare {
            op: cv_ir::CompareOp::Ne,
            rhs: Value::Constant(cv_ir::Constant::I32(0)),
            ..
        }
    )));
}

#[test]
fn test_statement_after_return_is_unreachable() {
    let err = lower(vec![function("f", &[], "int", vec![ret(int(1)), ret(int(2))])]).unwrap_err();
    assert_eq!(err.kind(), "UnreachableCodeError");
}

#[test]
fn test_statement_after_break_is_unreachable() {
    let err = lower(vec![function(
        "f",
        &[],
        "void",
        vec![while_loop(int(1), vec![break_stmt(), expr_stmt(int(3))])],
    )])
    .unwrap_err();
    assert_eq!(err.kind(), "UnreachableCodeError");
}

#[test]
fn test_void_function_gets_implicit_return() {
    let func = lower_one(function("f", &[], "void", vec![var_decl("x", "int", Some(int(1)))]));
    assert_eq!(func.entry_block().terminator(), Some(&Instruction::Return { value: None }));
}

#[test]
fn test_implicit_return_can_be_disabled() {
    let options = LowerOptions {
        implicit_void_return: false,
        ..LowerOptions::default()
    };
    let err = lower_program(&program(vec![function("f", &[], "void", vec![])]), &options).unwrap_err();
    assert_eq!(err.kind(), "MissingReturnError");
}

#[test]
fn test_type_errors() {
    let cases = vec![
        (function("f", &[], "float", vec![]), "UnknownTypeError"),
        (function("f", &[("p", "void")], "void", vec![]), "VoidBindingError"),
        (function("f", &[], "void", vec![var_decl("v", "void", None)]), "VoidBindingError"),
        (
            function("f", &[], "int", vec![ret(binary(BinaryOp::Lt, int(1), int(2)))]),
            "TypeMismatchError",
        ),
        (function("f", &[], "void", vec![ret(int(1))]), "TypeMismatchError"),
        (function("f", &[], "int", vec![ret_void()]), "TypeMismatchError"),
        (
            function("f", &[], "int", vec![ret(unary(UnaryOp::Not, binary(BinaryOp::Eq, int(1), int(1))))]),
            "TypeMismatchError",
        ),
        (function("f", &[], "int", vec![ret(int(1 << 40))]), "LiteralOutOfRangeError"),
    ];
    for (item, kind) in cases {
        assert_eq!(lower(vec![item]).unwrap_err().kind(), kind);
    }
}

#[test]
fn test_unsupported_constructs() {
    let calling = function("f", &[], "int", vec![ret(call("g", vec![int(1)]))]);
    let logical = function("f", &[], "int", vec![ret(binary(BinaryOp::And, int(1), int(0)))]);
    for item in [calling, logical] {
        assert_eq!(lower(vec![item]).unwrap_err().kind(), "UnsupportedConstructError");
    }
}

#[test]
fn test_jump_outside_loop() {
    let err = lower(vec![function("f", &[], "void", vec![continue_stmt()])]).unwrap_err();
    assert!(matches!(err, LowerError::JumpOutsideLoop { keyword, .. } if keyword == "continue"));
}

#[test]
fn test_unary_operators() {
    let func = lower_one(function(
        "f",
        &[("x", "int")],
        "int",
        vec![
            if_else(unary(UnaryOp::Not, var("x")), vec![ret(int(0))], None),
            ret(unary(UnaryOp::Neg, var("x"))),
        ],
    ));
    let instrs: Vec<&Instruction> = func.instructions().collect();
    assert!(instrs.iter().any(|instr| matches!(
        instr,
        Instruction::Compare { op: cv_ir::CompareOp::Eq, .. }
    )));
    assert!(instrs.iter().any(|instr| matches!(
        instr,
        Instruction::Binary {
            op: cv_ir::BinaryOp::Sub,
            lhs: Value::Constant(cv_ir::Constant::I32(0)),
            ..
        }
    )));
}

#[test]
fn test_for_loop_blocks_and_continue() {
    // int sum(int n) { int s = 0; for (int i = 0; i < n; i = i + 1) { if (i == 2) { continue; } s = s + i; } return s; }
    let func = lower_one(function(
        "sum",
        &[("n", "int")],
        "int",
        vec![
            var_decl("s", "int", Some(int(0))),
            for_loop(
                Some(var_decl("i", "int", Some(int(0)))),
                Some(binary(BinaryOp::Lt, var("i"), var("n"))),
                Some(assign("i", binary(BinaryOp::Add, var("i"), int(1)))),
                vec![
                    if_else(binary(BinaryOp::Eq, var("i"), int(2)), vec![continue_stmt()], None),
                    assign("s", binary(BinaryOp::Add, var("s"), var("i"))),
                ],
            ),
            ret(var("s")),
        ],
    ));
    let labels: Vec<&str> = func.blocks.iter().map(|block| block.label.as_str()).collect();
    assert_eq!(
        labels,
        ["entry", "for.cond.0", "for.body.0", "for.step.0", "for.end.0", "if.then.1", "if.end.1"]
    );
    let step = func.block_by_label("for.step.0").unwrap().id;
    let cond = func.block_by_label("for.cond.0").unwrap().id;
    let then = func.block_by_label("if.then.1").unwrap();
    assert_eq!(then.terminator(), Some(&Instruction::Branch { target: step }));
    assert_eq!(
        func.block_by_label("for.step.0").unwrap().terminator(),
        Some(&Instruction::Branch { target: cond })
    );
}

#[test]
fn test_for_header_scope_ends_with_loop() {
    let err = lower(vec![function(
        "f",
        &[],
        "int",
        vec![
            for_loop(Some(var_decl("i", "int", Some(int(0)))), Some(var("i")), None, vec![break_stmt()]),
            ret(var("i")),
        ],
    )])
    .unwrap_err();
    assert!(matches!(err, LowerError::UndeclaredIdentifier { name, .. } if name == "i"));
}

#[test]
fn test_endless_for_drops_exit_block() {
    let func = lower_one(function("spin", &[], "void", vec![for_loop(None, None, None, vec![])]));
    assert!(func.block_by_label("for.end.0").is_none());
    assert_eq!(func.blocks.len(), 4);
}

#[test]
fn test_break_makes_loop_exit_reachable() {
    let func = lower_one(function(
        "f",
        &[],
        "int",
        vec![for_loop(None, None, None, vec![break_stmt()]), ret(int(7))],
    ));
    let end = func.block_by_label("for.end.0").unwrap();
    let body = func.block_by_label("for.body.0").unwrap();
    assert_eq!(body.terminator(), Some(&Instruction::Branch { target: end.id }));
    // break leaves the step block without predecessors
    assert!(func.block_by_label("for.step.0").is_none());
}

#[test]
fn test_globals_are_skipped() {
    let module = lower(vec![global("counter", "int"), add_fn()]).unwrap();
    assert_eq!(module.functions.len(), 1);
    assert_eq!(module.name, "main");
}

#[test]
fn test_lowering_is_deterministic() {
    let items = || vec![add_fn(), while_fn()];
    let first = lower(items()).unwrap();
    let second = lower(items()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_nested_loops_verify() {
    // void f(int n) { while (n) { int k = n; while (k > 0) { k = k - 1; if (k == 3) { break; } } n = n - 1; } }
    let module = lower(vec![function(
        "f",
        &[("n", "int")],
        "void",
        vec![while_loop(
            var("n"),
            vec![
                var_decl("k", "int", Some(var("n"))),
                while_loop(
                    binary(BinaryOp::Gt, var("k"), int(0)),
                    vec![
                        assign("k", binary(BinaryOp::Sub, var("k"), int(1))),
                        if_else(binary(BinaryOp::Eq, var("k"), int(3)), vec![break_stmt()], None),
                    ],
                ),
                assign("n", binary(BinaryOp::Sub, var("n"), int(1))),
            ],
        )],
    )])
    .unwrap();
    assert_eq!(verify_module(&module), Ok(()));
    let func = &module.functions[0];
    assert!(func.blocks.iter().skip(1).all(|block| {
        block
            .instructions
            .iter()
            .all(|instr| !matches!(instr, Instruction::Allocate { .. }))
    }));
}
