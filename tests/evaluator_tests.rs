use dew::error::{DewError, ErrorKind};
use dew::{run_source, Value};

/// Values of every expression statement, plus the diagnostics raised.
fn eval(source: &str) -> (Vec<Value>, Vec<DewError>) {
    let (outcome, errors) = run_source(source);
    match outcome {
        Ok(values) => (values, errors),
        Err(failure) => panic!("{:?} failed with {}: {:?}", source, failure, errors),
    }
}

fn eval_one(source: &str) -> Value {
    let (values, errors) = eval(source);
    assert!(errors.is_empty(), "unexpected diagnostics for {:?}: {:?}", source, errors);
    assert_eq!(values.len(), 1, "values for {:?}", source);
    values.into_iter().next().unwrap()
}

#[test]
fn precedence_and_grouping() {
    assert_eq!(eval_one("1 + 2 * 3;"), Value::Int(7));
    assert_eq!(eval_one("(1 + 2) * 3;"), Value::Int(9));
    assert_eq!(eval_one("10 - 4 - 3;"), Value::Int(3));
    assert_eq!(eval_one("2 * (3 + (4 - 1)) % 5;"), Value::Int(2));
}

#[test]
fn numeric_promotion() {
    assert_eq!(eval_one("1 + 2.5;"), Value::Float(3.5));
    assert_eq!(eval_one("2.5 + 1;"), Value::Float(3.5));
    assert_eq!(eval_one("1.5 * 2.0;"), Value::Float(3.0));
    assert_eq!(eval_one("7.0 / 2;"), Value::Float(3.5));
    assert_eq!(eval_one("5.5 % 2;"), Value::Float(1.5));
}

#[test]
fn integer_division_truncates() {
    assert_eq!(eval_one("7 / 2;"), Value::Int(3));
    assert_eq!(eval_one("-7 / 2;"), Value::Int(-3));
    assert_eq!(eval_one("7 % 3;"), Value::Int(1));
}

#[test]
fn integer_division_by_zero_is_null_with_diagnostic() {
    let (values, errors) = eval("1 / 0;");
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::RuntimeError);
    assert_eq!(errors[0].message, "division by zero");

    let (values, errors) = eval("1 % 0;");
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(errors[0].message, "modulo by zero");
}

#[test]
fn float_division_by_zero_follows_ieee() {
    assert_eq!(eval_one("1.0 / 0;"), Value::Float(f64::INFINITY));
    assert_eq!(eval_one("-1 / 0.0;"), Value::Float(f64::NEG_INFINITY));
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(eval_one("9223372036854775807 + 1;"), Value::Int(i64::MIN));
}

#[test]
fn negation() {
    assert_eq!(eval_one("-5;"), Value::Int(-5));
    assert_eq!(eval_one("-2.5;"), Value::Float(-2.5));
    assert_eq!(eval_one("--3;"), Value::Int(3));
    assert_eq!(eval_one("-(1 - 4);"), Value::Int(3));
}

#[test]
fn negating_non_numeric_is_null_with_diagnostic() {
    for source in ["-\"a\";", "-true;", "-null;"] {
        let (values, errors) = eval(source);
        assert_eq!(values, vec![Value::Null], "{:?}", source);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot negate a non-numeric value");
        assert_eq!(errors[0].offset(), 0);
    }
}

#[test]
fn logical_not_uses_truthiness() {
    assert_eq!(eval_one("!0;"), Value::Bool(true));
    assert_eq!(eval_one("!!0;"), Value::Bool(false));
    assert_eq!(eval_one("!!1;"), Value::Bool(true));
    assert_eq!(eval_one("!0.0;"), Value::Bool(true));
    assert_eq!(eval_one("!2.5;"), Value::Bool(false));
    assert_eq!(eval_one("!\"\";"), Value::Bool(true));
    assert_eq!(eval_one("!\"a\";"), Value::Bool(false));
    assert_eq!(eval_one("!null;"), Value::Bool(true));
    assert_eq!(eval_one("!false;"), Value::Bool(true));
    assert_eq!(eval_one("!true;"), Value::Bool(false));
}

#[test]
fn comparisons() {
    assert_eq!(eval_one("1 < 2;"), Value::Bool(true));
    assert_eq!(eval_one("2 <= 2;"), Value::Bool(true));
    assert_eq!(eval_one("3 > 2.5;"), Value::Bool(true));
    assert_eq!(eval_one("2 >= 3;"), Value::Bool(false));
    assert_eq!(eval_one("1.5 < 1;"), Value::Bool(false));
}

#[test]
fn comparing_non_numeric_is_null_with_diagnostic() {
    let (values, errors) = eval("\"a\" < 1;");
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("cannot compare string and int"));
}

#[test]
fn equality_by_value() {
    assert_eq!(eval_one("1 == 1.0;"), Value::Bool(true));
    assert_eq!(eval_one("\"a\" == \"a\";"), Value::Bool(true));
    assert_eq!(eval_one("\"a\" != \"b\";"), Value::Bool(true));
    assert_eq!(eval_one("null == null;"), Value::Bool(true));
    assert_eq!(eval_one("true == true;"), Value::Bool(true));
    assert_eq!(eval_one("true == 1;"), Value::Bool(false));
    assert_eq!(eval_one("1 != 1;"), Value::Bool(false));
    assert_eq!(eval_one("1 < 2 == true;"), Value::Bool(true));
}

#[test]
fn arithmetic_on_non_numeric_is_null_with_diagnostic() {
    let (values, errors) = eval("\"a\" + 1;");
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "cannot add string and int");
    assert_eq!(errors[0].kind, ErrorKind::RuntimeError);
    assert!(errors[0].help.as_deref().unwrap().ends_with("not string."));

    let (_, errors) = eval("1.5 * null;");
    assert_eq!(errors[0].message, "cannot multiply float and null");
    assert!(errors[0].help.as_deref().unwrap().ends_with("not null."));
}

#[test]
fn evaluation_errors_do_not_stop_siblings() {
    let (values, errors) = eval("-\"x\"; 1 + 1;");
    assert_eq!(values, vec![Value::Null, Value::Int(2)]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn operands_evaluate_left_to_right() {
    let (values, errors) = eval("(-\"a\") + (-\"b\");");
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].offset(), 1);
    assert_eq!(errors[1].offset(), 10);
    assert_eq!(errors[2].message, "cannot add null and null");
}

#[test]
fn literals_evaluate_to_themselves() {
    assert_eq!(eval_one("42;"), Value::Int(42));
    assert_eq!(eval_one("3.;"), Value::Float(3.0));
    assert_eq!(eval_one(".5;"), Value::Float(0.5));
    assert_eq!(eval_one("\"hi\";"), Value::String("hi".to_string()));
    assert_eq!(eval_one("true;"), Value::Bool(true));
    assert_eq!(eval_one("null;"), Value::Null);
}

#[test]
fn unbound_forms_fall_back_to_null() {
    assert_eq!(eval_one("x;"), Value::Null);
    assert_eq!(eval_one("x = 3;"), Value::Null);

    let (values, errors) = eval("int x = 3; 1;");
    assert!(errors.is_empty());
    assert_eq!(values, vec![Value::Int(1)]);
}

#[test]
fn declaration_initializer_still_reports() {
    let (values, errors) = eval("int x = 1 / 0;");
    assert!(values.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "division by zero");
}

#[test]
fn values_display() {
    assert_eq!(Value::Float(3.0).to_string(), "3.0");
    assert_eq!(Value::Float(3.5).to_string(), "3.5");
    assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
    assert_eq!(Value::Int(7).to_string(), "7");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::String("s".to_string()).to_string(), "s");
}
