/*
 * error_messages.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * User-facing failure messages. Every evaluation message names the access
 * path of the value being accessed and the offending value.
 */

use template_expr::{Value, ValueContext, compile_str};

fn fixture() -> ValueContext {
    ValueContext::new()
        .with("title", "Report")
        .with(
            "report",
            Value::map([
                ("rows", Value::list(["r0", "r1"])),
                ("owner", Value::map([("name", "Ada")])),
            ]),
        )
        .with("empty", Value::list(Vec::<Value>::new()))
}

fn eval_error(source: &str) -> String {
    compile_str(source)
        .unwrap()
        .evaluate(&fixture())
        .unwrap_err()
        .to_string()
}

fn compile_error(source: &str) -> String {
    compile_str(source).unwrap_err().to_string()
}

#[test]
fn test_evaluation_messages() {
    insta::assert_snapshot!(eval_error("${author}"), @"Attribute 'author' is not defined");
    insta::assert_snapshot!(
        eval_error("${report.rows(9)}"),
        @"Index 9 is out of bounds for 'report.rows'"
    );
    insta::assert_snapshot!(
        eval_error("${report.owner.email}"),
        @"Key 'email' is not defined in 'report.owner'"
    );
    insta::assert_snapshot!(
        eval_error("${title.size}"),
        @"Cannot take the size of 'title': value 'Report' is not a collection"
    );
    insta::assert_snapshot!(
        eval_error("${report.rows.first}"),
        @"Cannot access keys of 'report.rows': value '[r0, r1]' is not a map"
    );
    insta::assert_snapshot!(
        eval_error("${empty.random}"),
        @"Cannot pick a random element of 'empty': value '[]' is not a non-empty list"
    );
    insta::assert_snapshot!(
        eval_error("${report.owner(0)}"),
        @"Cannot index 'report.owner': value '{name=Ada}' is not a list"
    );
}

#[test]
fn test_cast_message() {
    let err = template_expr::compile::<i64>("${title}")
        .unwrap()
        .evaluate(&fixture())
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Cannot cast 'Report' to i64");
}

#[test]
fn test_compile_messages() {
    insta::assert_snapshot!(
        compile_error("Dear ${name"),
        @"Invalid expression 'Dear ${name': unterminated expression, expected '}' at offset 5"
    );
    insta::assert_snapshot!(
        compile_error("${}"),
        @"Invalid expression '${}': expected an object name at offset 2"
    );
    insta::assert_snapshot!(
        compile_error("${rows(1)x}"),
        @"Invalid expression '${rows(1)x}': unexpected character 'x' at offset 9"
    );
}
