use std::io::Cursor;

use crate::{
    environment::prelude::{Environment, Value, ValueType},
    parser::prelude::parse_module,
};

use super::prelude::{Evaluator, RuntimeError, RuntimeErrorType};

fn run_with_input(src: &str, input: &str) -> (String, Environment) {
    let parsed = parse_module(src).expect("program should parse");

    let mut output = Vec::new();

    let env = {
        let mut evaluator = Evaluator::new(Cursor::new(input.as_bytes()), &mut output);
        evaluator.eval(&parsed.module).expect("program should run");
        evaluator.env
    };

    (String::from_utf8(output).expect("output is utf8"), env)
}

fn run(src: &str) -> String {
    run_with_input(src, "").0
}

fn run_err(src: &str, input: &str) -> RuntimeError {
    let parsed = parse_module(src).expect("program should parse");

    let mut output = Vec::new();
    let mut evaluator = Evaluator::new(Cursor::new(input.as_bytes()), &mut output);

    evaluator
        .eval(&parsed.module)
        .expect_err("program should abort")
}

#[test]
fn test_declaration_and_arithmetic() {
    let output = run(
        "SUGOD MUGNA NUMERO xyz, abc=100  xyz=((abc*5)/10+10)*-1  IPAKITA:[[]&xyz&[]] KATAPUSAN",
    );

    assert_eq!(output, "[-60]");
}

#[test]
fn test_fixed_loop() {
    let output = run(
        "SUGOD MUGNA NUMERO ctr  ALANG SA(ctr=1, ctr<=10, ctr++) PUNDOK{ IPAKITA: ctr & ' ' } KATAPUSAN",
    );

    assert_eq!(output, "1 2 3 4 5 6 7 8 9 10 ");
}

#[test]
fn test_conditional_chain() {
    let output = run(
        r#"SUGOD MUGNA NUMERO score=75 KUNG(score>=90)PUNDOK{IPAKITA:"A"} KUNG DILI(score>=80)PUNDOK{IPAKITA:"B"} KUNG DILI(score>=70)PUNDOK{IPAKITA:"C"} KUNG WALA PUNDOK{IPAKITA:"F"} KATAPUSAN"#,
    );

    assert_eq!(output, "C");
}

#[test]
fn test_fibonacci() {
    let input = r#"
        SUGOD
        MUGNA NUMERO n=10, a=0, b=1, i=1, t
        IPAKITA: "Fibonacci sequence:"
        SAMTANG (i <= n) PUNDOK {
            t = b
            IPAKITA: ' ' & b
            b = a + b
            a = t
            i++
        }
        KATAPUSAN
    "#;

    assert_eq!(run(input), "Fibonacci sequence: 1 1 2 3 5 8 13 21 34 55");
}

#[test]
fn test_newline_sentinel() {
    let output = run(
        r#"SUGOD IPAKITA:"Resulta:" & $ & "Katapusan sa Linya" KATAPUSAN"#,
    );

    assert_eq!(output, "Resulta:\nKatapusan sa Linya");
}

#[test]
fn test_increment_statement_stores() {
    let output = run("SUGOD MUGNA NUMERO i=0  i++  IPAKITA:i KATAPUSAN");

    assert_eq!(output, "1");
}

#[test]
fn test_increment_expression_does_not_store() {
    // `i++` yields the incremented value at its use site but writes nothing
    let output = run(r#"SUGOD MUGNA NUMERO i=1 IPAKITA: i++ & " " & i KATAPUSAN"#);

    assert_eq!(output, "2 1");
}

#[test]
fn test_float_formatting() {
    assert_eq!(run("SUGOD IPAKITA: 0.1 + 0.2 KATAPUSAN"), "0.3");

    let output = run(
        "SUGOD MUGNA TIPIK a=5.5, b=2.2  IPAKITA: (a * b) / (a - b) + 100 KATAPUSAN",
    );
    assert_eq!(output, "103.666664");

    let output = run("SUGOD MUGNA TIPIK x = 10.0  x = x * 3  IPAKITA: x KATAPUSAN");
    assert_eq!(output, "30.0");
}

#[test]
fn test_boolean_display() {
    let output = run(
        r#"SUGOD MUGNA TINUOD t="OO", f="DILI" IPAKITA: t & ' ' & f KATAPUSAN"#,
    );

    assert_eq!(output, "OO DILI");
}

#[test]
fn test_defaults_per_kind() {
    let output = run(
        r#"SUGOD MUGNA NUMERO n  MUGNA TIPIK t  MUGNA TINUOD b  MUGNA PULONG s  IPAKITA: n & ' ' & t & ' ' & b & ' ' & s & '!' KATAPUSAN"#,
    );

    assert_eq!(output, "0 0.0 DILI !");
}

#[test]
fn test_for_loop_matches_while_transcription() {
    let fixed = run(
        r#"SUGOD MUGNA NUMERO i, s=0 ALANG SA (i=1, i<=5, i++) PUNDOK { s = s + i IPAKITA: s & ' ' } KATAPUSAN"#,
    );
    let transcribed = run(
        r#"SUGOD MUGNA NUMERO i, s=0 i=1 SAMTANG (i<=5) PUNDOK { s = s + i IPAKITA: s & ' ' i++ } KATAPUSAN"#,
    );

    assert_eq!(fixed, transcribed);
}

#[test]
fn test_logical_operators() {
    let output = run(
        r#"SUGOD MUGNA NUMERO a=5 IPAKITA: (a > 1 UG a < 10) & ' ' & (a > 9 O a == 5) & ' ' & DILI (a == 5) KATAPUSAN"#,
    );

    assert_eq!(output, "OO OO DILI");
}

#[test]
fn test_logicals_require_booleans() {
    let err = run_err("SUGOD IPAKITA: 1 UG 2 KATAPUSAN", "");

    assert!(matches!(
        err.error,
        RuntimeErrorType::OperatorMismatch { left: ValueType::Int, right: ValueType::Int, .. }
    ));
}

#[test]
fn test_numeric_strings_take_part_as_numbers() {
    let output = run(
        r#"SUGOD MUGNA PULONG s="5" MUGNA NUMERO n  n = s + 5  IPAKITA: n KATAPUSAN"#,
    );

    assert_eq!(output, "10");
}

#[test]
fn test_int_promotes_to_float() {
    let output = run("SUGOD IPAKITA: 3 + 0.5 KATAPUSAN");

    assert_eq!(output, "3.5");
}

#[test]
fn test_equality_on_chars_strings_and_bools() {
    let output = run(
        r#"SUGOD IPAKITA: ('a' == 'a') & ('a' <> 'b') & ("x" == "x") & ("OO" == "DILI") KATAPUSAN"#,
    );

    assert_eq!(output, "OOOOOODILI");
}

#[test]
fn test_division_by_zero() {
    let err = run_err("SUGOD IPAKITA: 1 / 0 KATAPUSAN", "");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);

    let err = run_err("SUGOD IPAKITA: 1 % 0 KATAPUSAN", "");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);

    let err = run_err("SUGOD IPAKITA: 1.5 / 0.0 KATAPUSAN", "");
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);
}

#[test]
fn test_integer_overflow_is_reported() {
    let err = run_err("SUGOD IPAKITA: 2147483647 + 1 KATAPUSAN", "");
    assert_eq!(err.error, RuntimeErrorType::IntegerOverflow);

    let err = run_err("SUGOD IPAKITA: 2147483647 * 2 KATAPUSAN", "");
    assert_eq!(err.error, RuntimeErrorType::IntegerOverflow);

    let err = run_err(
        "SUGOD MUGNA NUMERO i=2147483647  i++ KATAPUSAN",
        "",
    );
    assert_eq!(err.error, RuntimeErrorType::IntegerOverflow);
}

#[test]
fn test_assignment_coercion_failure() {
    let err = run_err(r#"SUGOD MUGNA NUMERO n  n = "abc" KATAPUSAN"#, "");

    assert_eq!(
        err.error,
        RuntimeErrorType::TypeMismatch {
            variable: "n".into(),
            value: "abc".into(),
            expected: ValueType::Int,
            got: ValueType::String,
        }
    );
}

#[test]
fn test_condition_must_be_boolean() {
    let err = run_err("SUGOD KUNG (1) PUNDOK { IPAKITA: 1 } KATAPUSAN", "");

    assert_eq!(
        err.error,
        RuntimeErrorType::InvalidCondition { got: ValueType::Int }
    );
}

#[test]
fn test_input_reads_in_order_and_coerces() {
    let (output, env) = run_with_input(
        r#"SUGOD MUGNA PULONG ngalan MUGNA NUMERO edad DAWAT: ngalan, edad IPAKITA: ngalan & " " & edad KATAPUSAN"#,
        "Juan\n25\n",
    );

    assert_eq!(output, "Juan 25");
    assert_eq!(
        env.get("edad").map(|variable| &variable.value),
        Some(&Value::Int { value: 25 })
    );
}

#[test]
fn test_input_empty_line_is_an_error() {
    let err = run_err(
        "SUGOD MUGNA NUMERO n DAWAT: n IPAKITA: n KATAPUSAN",
        "\n",
    );

    assert_eq!(
        err.error,
        RuntimeErrorType::EmptyInput { variable: "n".into() }
    );
}

#[test]
fn test_input_eof_is_an_error() {
    let err = run_err(
        "SUGOD MUGNA NUMERO n DAWAT: n IPAKITA: n KATAPUSAN",
        "",
    );

    assert_eq!(
        err.error,
        RuntimeErrorType::InputExhausted { variable: "n".into() }
    );
}

#[test]
fn test_input_type_mismatch() {
    let err = run_err(
        "SUGOD MUGNA NUMERO n DAWAT: n IPAKITA: n KATAPUSAN",
        "abc\n",
    );

    assert!(matches!(
        err.error,
        RuntimeErrorType::TypeMismatch { expected: ValueType::Int, .. }
    ));
}

#[test]
fn test_assignment_chain() {
    let output = run(
        "SUGOD MUGNA NUMERO a, b  a = b = 4  IPAKITA: a & ' ' & b KATAPUSAN",
    );

    assert_eq!(output, "4 4");
}

#[test]
fn test_stored_values_match_declared_kinds() {
    let (_, env) = run_with_input(
        r#"SUGOD MUGNA TIPIK x = 5 MUGNA PULONG s s = 12 KATAPUSAN"#,
        "",
    );

    // an int initializer promotes into the declared float
    assert_eq!(
        env.get("x").map(|variable| &variable.value),
        Some(&Value::Float { value: 5.0 })
    );
    // and anything stored in a PULONG arrives as its display form
    assert_eq!(
        env.get("s").map(|variable| &variable.value),
        Some(&Value::String { value: "12".into() })
    );

    for variable in env.store.values() {
        assert_eq!(variable.value.value_type(), variable.kind);
    }
}

#[test]
fn test_no_implicit_trailing_newline() {
    assert_eq!(run("SUGOD IPAKITA: 42 KATAPUSAN"), "42");
}

#[test]
fn test_unary_on_numeric_string() {
    let output = run(r#"SUGOD IPAKITA: -"5" & ' ' & +"2.5" KATAPUSAN"#);

    assert_eq!(output, "-5 2.5");
}

#[test]
fn test_empty_program_produces_no_output() {
    assert_eq!(run("SUGOD KATAPUSAN"), "");
}

#[test]
fn test_integer_division_truncates() {
    assert_eq!(run("SUGOD IPAKITA: 7 / 2 & ' ' & 505 / 10 KATAPUSAN"), "3 50");
}

#[test]
fn test_modulo() {
    assert_eq!(run("SUGOD IPAKITA: 7 % 3 & ' ' & 10 % 5 KATAPUSAN"), "1 0");
    assert_eq!(run("SUGOD IPAKITA: 5.5 % 2.0 KATAPUSAN"), "1.5");
}

#[test]
fn test_comparisons() {
    let output = run(
        "SUGOD IPAKITA: (1 < 2) & (2 <= 2) & (3 > 2) & (2 >= 3) & (1 == 1) & (1 <> 1) KATAPUSAN",
    );

    assert_eq!(output, "OOOOOODILIOODILI");
}

#[test]
fn test_not_chains() {
    assert_eq!(run(r#"SUGOD IPAKITA: DILI DILI "OO" KATAPUSAN"#), "OO");
}

#[test]
fn test_while_countdown() {
    let output = run(
        "SUGOD MUGNA NUMERO n=3 SAMTANG (n > 0) PUNDOK { IPAKITA: n & ' ' n = n - 1 } KATAPUSAN",
    );

    assert_eq!(output, "3 2 1 ");
}

#[test]
fn test_nested_loops() {
    let input = r#"
        SUGOD
        MUGNA NUMERO i, j
        ALANG SA (i=1, i<=3, i++) PUNDOK {
            ALANG SA (j=1, j<=3, j++) PUNDOK {
                IPAKITA: i * j & ' '
            }
            IPAKITA: $
        }
        KATAPUSAN
    "#;

    assert_eq!(run(input), "1 2 3 \n2 4 6 \n3 6 9 \n");
}

#[test]
fn test_if_branches_both_ways() {
    let input = r#"
        SUGOD
        MUGNA NUMERO x=10
        KUNG (x > 5) PUNDOK { IPAKITA: "dako" }
        KUNG (x > 50) PUNDOK { IPAKITA: "x" } KUNG WALA PUNDOK { IPAKITA: "gamay" }
        KATAPUSAN
    "#;

    assert_eq!(run(input), "dakogamay");
}

#[test]
fn test_string_truthiness_drives_fixed_loop() {
    // "OO" keeps the loop going, "DILI" stops it
    let input = r#"
        SUGOD
        MUGNA NUMERO i
        MUGNA PULONG go="OO"
        ALANG SA (i=1, go, i++) PUNDOK {
            KUNG (i >= 3) PUNDOK { go = "DILI" }
        }
        IPAKITA: i
        KATAPUSAN
    "#;

    assert_eq!(run(input), "4");
}

#[test]
fn test_subtraction_overflow() {
    let err = run_err("SUGOD IPAKITA: 0 - 2147483647 - 2 KATAPUSAN", "");

    assert_eq!(err.error, RuntimeErrorType::IntegerOverflow);
}

#[test]
fn test_char_and_bool_input() {
    let (output, env) = run_with_input(
        "SUGOD MUGNA LETRA grade MUGNA TINUOD passed DAWAT: grade, passed IPAKITA: grade & passed KATAPUSAN",
        "B\nOO\n",
    );

    assert_eq!(output, "BOO");
    assert_eq!(
        env.get("grade").map(|variable| &variable.value),
        Some(&Value::Char { value: 'B' })
    );
    assert_eq!(
        env.get("passed").map(|variable| &variable.value),
        Some(&Value::Bool { value: true })
    );
}

#[test]
fn test_float_input() {
    let (output, _) = run_with_input(
        "SUGOD MUGNA TIPIK t DAWAT: t IPAKITA: t KATAPUSAN",
        "2.5\n",
    );

    assert_eq!(output, "2.5");
}

#[test]
fn test_string_variables_compare_equal() {
    let output = run(
        r#"SUGOD MUGNA PULONG a="abc", b="abc" IPAKITA: a == b KATAPUSAN"#,
    );

    assert_eq!(output, "OO");
}

#[test]
fn test_unary_minus_on_variable() {
    let output = run("SUGOD MUGNA NUMERO x=5 IPAKITA: -x & ' ' & +x KATAPUSAN");

    assert_eq!(output, "-5 5");
}

#[test]
fn test_concat_coerces_every_kind() {
    let output = run(
        r#"SUGOD MUGNA NUMERO n=7 MUGNA TIPIK t=2.0 MUGNA LETRA c='x' MUGNA TINUOD b="OO" IPAKITA: n & t & c & b KATAPUSAN"#,
    );

    assert_eq!(output, "72.0xOO");
}

#[test]
fn test_increment_inside_nested_block() {
    let input = r#"
        SUGOD
        MUGNA NUMERO i=0, n=0
        SAMTANG (i < 3) PUNDOK {
            KUNG (i == 1) PUNDOK { n++ }
            i++
        }
        IPAKITA: n
        KATAPUSAN
    "#;

    assert_eq!(run(input), "1");
}
