use crate::error::Span;
use crate::value::Value;
use std::fmt;

/// Root of a parsed source: the statement sequence, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression {
        expr: Expr,
        span: Span,
    },
    /// `type name [= initializer];`, the initializer defaults to `null`.
    VarDeclare {
        type_name: String,
        name: String,
        initializer: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Expression { span, .. } => span,
            Stmt::VarDeclare { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
        span: Span,
    },
    Symbol {
        name: String,
        span: Span,
    },
    Grouping {
        expr: Box<Expr>,
        span: Span,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        name: String,
        value: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. } => span,
            Expr::Symbol { span, .. } => span,
            Expr::Grouping { span, .. } => span,
            Expr::Unary { span, .. } => span,
            Expr::Binary { span, .. } => span,
            Expr::Assign { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Modulo => "modulo",
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not-equal",
            BinaryOp::Less => "less",
            BinaryOp::LessEqual => "less-equal",
            BinaryOp::Greater => "greater",
            BinaryOp::GreaterEqual => "greater-equal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "negate",
            UnaryOp::Not => "not",
        }
    }
}

// S-expression printer, used by `--ast` and by tests to check tree shape.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression { expr, .. } => write!(f, "{}", expr),
            Stmt::VarDeclare {
                type_name,
                name,
                initializer,
                ..
            } => write!(f, "(declare {} {} {})", type_name, name, initializer),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => match value {
                Value::String(s) => write!(f, "{:?}", s),
                Value::Float(n) => write!(f, "{:?}", n),
                other => write!(f, "{}", other),
            },
            Expr::Symbol { name, .. } => write!(f, "{}", name),
            Expr::Grouping { expr, .. } => write!(f, "(group {})", expr),
            Expr::Unary {
                operator, operand, ..
            } => write!(f, "({} {})", operator.name(), operand),
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", operator.name(), left, right),
            Expr::Assign { name, value, .. } => write!(f, "(assign {} {})", name, value),
        }
    }
}
