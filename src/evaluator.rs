use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{Diagnostics, DewError, Span};
use crate::value::Value;
use std::cmp::Ordering;

/// Tree-walking evaluator.
///
/// Operator errors never abort evaluation: they are pushed to the script's
/// diagnostics and the failing node evaluates to `null`.
pub struct Evaluator<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Evaluator<'a> {
    pub fn new(diagnostics: &'a mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Evaluates every statement in order and returns one value per
    /// expression statement. Declarations only evaluate their initializer.
    pub fn evaluate_program(&mut self, program: &Program) -> Vec<Value> {
        let mut values = Vec::new();

        for statement in &program.statements {
            match statement {
                Stmt::Expression { expr, .. } => values.push(self.evaluate_expression(expr)),
                Stmt::VarDeclare { initializer, .. } => {
                    self.evaluate_expression(initializer);
                }
            }
        }

        values
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Literal { value, .. } => value.clone(),
            // Names are never bound to storage
            Expr::Symbol { .. } => Value::Null,
            Expr::Grouping { expr, .. } => self.evaluate_expression(expr),
            Expr::Unary {
                operator,
                operand,
                span,
            } => {
                let operand_val = self.evaluate_expression(operand);
                let result = self.evaluate_unary_op(operator, operand_val, span);
                self.recover(result)
            }
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate_expression(left);
                let right_val = self.evaluate_expression(right);
                let result = self.evaluate_binary_op(operator, left_val, right_val, span);
                self.recover(result)
            }
            Expr::Assign { value, .. } => {
                self.evaluate_expression(value);
                Value::Null
            }
        }
    }

    fn recover(&mut self, result: Result<Value, DewError>) -> Value {
        match result {
            Ok(value) => value,
            Err(error) => {
                self.diagnostics.push(error);
                Value::Null
            }
        }
    }

    fn evaluate_binary_op(
        &self,
        operator: &BinaryOp,
        left: Value,
        right: Value,
        span: &Span,
    ) -> Result<Value, DewError> {
        match operator {
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo => self.evaluate_arithmetic(operator, left, right, span),
            BinaryOp::Equal => Ok(Value::Bool(self.is_equal(&left, &right))),
            BinaryOp::NotEqual => Ok(Value::Bool(!self.is_equal(&left, &right))),
            BinaryOp::Greater
            | BinaryOp::GreaterEqual
            | BinaryOp::Less
            | BinaryOp::LessEqual => {
                let ordering = self.compare(&left, &right).ok_or_else(|| {
                    DewError::runtime_error_with_help(
                        span.clone(),
                        format!(
                            "cannot compare {} and {}",
                            left.type_name(),
                            right.type_name()
                        ),
                        "Relational operators only work on int and float values.".to_string(),
                    )
                })?;

                let result = match operator {
                    BinaryOp::Greater => ordering == Ordering::Greater,
                    BinaryOp::GreaterEqual => ordering != Ordering::Less,
                    BinaryOp::Less => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                };
                Ok(Value::Bool(result))
            }
        }
    }

    fn evaluate_arithmetic(
        &self,
        operator: &BinaryOp,
        left: Value,
        right: Value,
        span: &Span,
    ) -> Result<Value, DewError> {
        match (left, right) {
            (Value::Int(l), Value::Int(r)) => self.integer_arithmetic(operator, l, r, span),
            (Value::Int(l), Value::Float(r)) => Ok(Value::Float(float_arithmetic(operator, l as f64, r))),
            (Value::Float(l), Value::Int(r)) => Ok(Value::Float(float_arithmetic(operator, l, r as f64))),
            (Value::Float(l), Value::Float(r)) => Ok(Value::Float(float_arithmetic(operator, l, r))),
            (l, r) => {
                let verb = match operator {
                    BinaryOp::Add => "add",
                    BinaryOp::Subtract => "subtract",
                    BinaryOp::Multiply => "multiply",
                    BinaryOp::Divide => "divide",
                    _ => "take the modulo of",
                };
                let offending = if l.is_numeric() { &r } else { &l };
                Err(DewError::runtime_error_with_help(
                    span.clone(),
                    format!("cannot {} {} and {}", verb, l.type_name(), r.type_name()),
                    format!(
                        "Arithmetic operators only work on int and float values, not {}.",
                        offending.type_name()
                    ),
                ))
            }
        }
    }

    fn integer_arithmetic(
        &self,
        operator: &BinaryOp,
        l: i64,
        r: i64,
        span: &Span,
    ) -> Result<Value, DewError> {
        let value = match operator {
            BinaryOp::Add => l.wrapping_add(r),
            BinaryOp::Subtract => l.wrapping_sub(r),
            BinaryOp::Multiply => l.wrapping_mul(r),
            BinaryOp::Divide => {
                if r == 0 {
                    return Err(DewError::runtime_error(
                        span.clone(),
                        "division by zero".to_string(),
                    ));
                }
                l.wrapping_div(r)
            }
            _ => {
                if r == 0 {
                    return Err(DewError::runtime_error(
                        span.clone(),
                        "modulo by zero".to_string(),
                    ));
                }
                l.wrapping_rem(r)
            }
        };

        Ok(Value::Int(value))
    }

    fn evaluate_unary_op(
        &self,
        operator: &UnaryOp,
        operand: Value,
        span: &Span,
    ) -> Result<Value, DewError> {
        match operator {
            UnaryOp::Negate => match operand {
                Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                Value::Float(n) => Ok(Value::Float(-n)),
                _ => Err(DewError::runtime_error_with_help(
                    span.clone(),
                    "cannot negate a non-numeric value".to_string(),
                    format!("The operand is of type {}; only int and float can be negated.", operand.type_name()),
                )),
            },
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        }
    }

    /// Numeric ordering with int to float promotion. `None` for anything
    /// non-numeric, and for NaN.
    fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        match (left, right) {
            (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
            (Value::Int(l), Value::Float(r)) => (*l as f64).partial_cmp(r),
            (Value::Float(l), Value::Int(r)) => l.partial_cmp(&(*r as f64)),
            (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
            _ => None,
        }
    }

    fn is_equal(&self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l == r,
            (Value::Int(l), Value::Float(r)) => (*l as f64) == *r,
            (Value::Float(l), Value::Int(r)) => *l == (*r as f64),
            (Value::String(l), Value::String(r)) => l == r,
            _ => false,
        }
    }
}

/// IEEE-754 semantics throughout; dividing by zero gives an infinity or NaN.
fn float_arithmetic(operator: &BinaryOp, l: f64, r: f64) -> f64 {
    match operator {
        BinaryOp::Add => l + r,
        BinaryOp::Subtract => l - r,
        BinaryOp::Multiply => l * r,
        BinaryOp::Divide => l / r,
        _ => l % r,
    }
}
