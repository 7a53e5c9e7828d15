//! End-to-end tests over the test programs

use cv_driver::{
    CompileRequest, CompileResponse, Config, JsonTreeParser, compile, compile_source, handle, run,
};
use cv_facts::{FactStore, InMemoryStore};
use cv_interpreter::Value;
use cv_ir::{Instruction, verify_module};
use std::io::Write;

#[test]
fn test_valid_programs_verify() {
    let config = Config::default();
    for name in integration_tests::all_programs().unwrap() {
        let program = integration_tests::load(&name).unwrap();
        match compile(&program, &config) {
            Ok(compilation) => assert_eq!(verify_module(&compilation.module), Ok(()), "{name}"),
            Err(err) => assert!(name.contains("redeclared"), "{name} failed: {err}"),
        }
    }
}

#[test]
fn test_fibonacci_runs() {
    let config = Config::default();
    let compilation = compile(&integration_tests::load("03-fibonacci").unwrap(), &config).unwrap();
    let fib = |n| run(&compilation, "fibonacci", &[n], &config).unwrap();
    assert_eq!(fib(0), Value::Int(0));
    assert_eq!(fib(1), Value::Int(1));
    assert_eq!(fib(2), Value::Int(1));
    assert_eq!(fib(10), Value::Int(55));
    assert_eq!(fib(20), Value::Int(6765));
}

#[test]
fn test_fibonacci_loop_structure() {
    let compilation = compile(&integration_tests::load("03-fibonacci").unwrap(), &Config::default()).unwrap();
    let func = compilation.module.function("fibonacci").unwrap();

    let cond = func.block_by_label("for.cond.1").unwrap();
    let step = func.block_by_label("for.step.1").unwrap();
    let body = func.block_by_label("for.body.1").unwrap();
    assert_eq!(body.terminator(), Some(&Instruction::Branch { target: step.id }));
    assert_eq!(step.terminator(), Some(&Instruction::Branch { target: cond.id }));
    let slots = func
        .instructions()
        .filter(|instr| matches!(instr, Instruction::Allocate { .. }))
        .count();
    assert_eq!(slots, 5);
}

#[test]
fn test_shadowing_and_jumps_run() {
    let config = Config::default();
    let compilation = compile(&integration_tests::load("04-scopes").unwrap(), &config).unwrap();
    assert_eq!(compilation.module.functions.len(), 1);
    assert_eq!(run(&compilation, "clamp_sum", &[3, 5], &config), Ok(Value::Int(6)));
    assert_eq!(run(&compilation, "clamp_sum", &[3, 20], &config), Ok(Value::Int(10)));
}

#[test]
fn test_redeclaration_reports_both_locations() {
    let err = compile(&integration_tests::load("05-redeclared").unwrap(), &Config::default()).unwrap_err();
    let cv_driver::CompileError::Lower(cv_lower::LowerError::Redeclaration { first, second, .. }) = &err else {
        panic!("expected a redeclaration, got {err:?}");
    };
    assert_eq!(first.span.start, 20);
    assert_eq!(second.span.start, 31);
}

#[test]
fn test_request_boundary_never_returns_partial_ir() {
    let config = Config::default();
    let request = CompileRequest {
        source: integration_tests::source("05-redeclared").unwrap(),
    };
    let json = serde_json::to_string(&handle(&JsonTreeParser, &request, &config)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"], "failure");
    assert_eq!(value["error"]["kind"], "RedeclarationError");
    assert!(value.get("ir").is_none());

    let request = CompileRequest {
        source: integration_tests::source("01-add").unwrap(),
    };
    let CompileResponse::Success { ir, .. } = handle(&JsonTreeParser, &request, &config) else {
        panic!("expected success");
    };
    assert!(ir.contains("define i32 @add"));
}

#[test]
fn test_recompiling_does_not_duplicate_facts() {
    let mut config = Config::default();
    config.facts.enabled = true;
    let source = integration_tests::source("03-fibonacci").unwrap();

    let mut store = InMemoryStore::new();
    for _ in 0..3 {
        let compilation = compile_source(&JsonTreeParser, &source, &config).unwrap();
        store.merge(&compilation.facts.unwrap());
    }

    // fibonacci, n, a, b, c, i
    assert_eq!(store.entity_count(), 6);
    assert!(store.entity("fibonacci::i").is_some());
    let once = cv_facts::extract(&integration_tests::load("03-fibonacci").unwrap());
    assert_eq!(store.snapshot(), once);
}

#[test]
fn test_config_file_drives_compilation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[lowering]\nmodule_name = \"fib\"\n\n[facts]\nenabled = true\n\n[interpreter]\nfuel = 50"
    )
    .unwrap();
    let config = Config::from_file(file.path()).unwrap();

    let compilation = compile(&integration_tests::load("03-fibonacci").unwrap(), &config).unwrap();
    assert!(compilation.ir.starts_with("; module fib\n"));
    assert!(compilation.facts.is_some());
    assert_eq!(
        run(&compilation, "fibonacci", &[30], &config),
        Err(cv_interpreter::InterpreterError::FuelExhausted(50))
    );
}
