//! IR text snapshots
//!
//! Update with `UPDATE_EXPECT=1` after an intentional change to the printer
//! or the lowering.

use cv_driver::{Config, compile};
use expect_test::expect;

fn ir(name: &str) -> String {
    let program = integration_tests::load(name).unwrap();
    compile(&program, &Config::default()).unwrap().ir
}

#[test]
fn test_add_snapshot() {
    expect![[r#"
        ; module main

        define i32 @add(i32 %0, i32 %1) {
        entry:
          $0 = alloca i32 ; a
          $1 = alloca i32 ; b
          store i32 %0, $0
          store i32 %1, $1
          %2 = load i32, $0
          %3 = load i32, $1
          %4 = add i32 %2, %3
          ret i32 %4
        }
    "#]]
    .assert_eq(&ir("01-add"));
}

#[test]
fn test_while_snapshot() {
    expect![[r#"
        ; module main

        define i32 @f(i32 %0) {
        entry:
          $0 = alloca i32 ; x
          store i32 %0, $0
          br label %while.cond.0

        while.cond.0:
          %1 = load i32, $0
          %2 = icmp eq i32 %1, 0
          br i1 %2, label %while.body.0, label %while.end.0

        while.body.0:
          %3 = load i32, $0
          %4 = add i32 %3, 1
          store i32 %4, $0
          br label %while.cond.0

        while.end.0:
          %5 = load i32, $0
          ret i32 %5
        }
    "#]]
    .assert_eq(&ir("02-while"));
}
