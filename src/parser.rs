use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{DewError, Span};
use crate::lexer::{Literal, Token, TokenType};
use crate::value::Value;

/// Deepest allowed nesting of groupings, prefix operators and chained
/// assignments. The evaluator and `Drop` recurse over the same depth.
pub const MAX_NESTING: usize = 64;

/// Recursive-descent parser over a finished token sequence.
///
/// Precedence, lowest first: assignment, equality, relational, additive,
/// multiplicative, unary, primary. Every rule returns `Result` and the first
/// error ends the parse.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Program, DewError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        Ok(Program { statements })
    }

    fn declaration(&mut self) -> Result<Stmt, DewError> {
        // Two symbols in a row can only be `type name`
        if self.check(TokenType::Symbol) && self.check_next(TokenType::Symbol) {
            self.var_declaration()
        } else {
            self.expression_statement()
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, DewError> {
        let type_token = self.advance().clone();
        let name_token = self.advance().clone();

        let initializer = if self.match_types(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            self.expect_operand(
                &equals,
                "A declaration with '=' needs an initial value. Example: int x = 1;",
            )?;
            self.expression()?
        } else {
            Expr::Literal {
                value: Value::Null,
                span: Span::new(name_token.span.end, name_token.span.end),
            }
        };

        let semicolon = self.consume_with_help(
            TokenType::Semicolon,
            "expected ';' to end statement",
            "Every statement must be terminated with ';'.".to_string(),
        )?;
        let end = semicolon.span.end;

        Ok(Stmt::VarDeclare {
            type_name: symbol_name(&type_token),
            name: symbol_name(&name_token),
            initializer,
            span: Span::new(type_token.span.start, end),
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, DewError> {
        let start_span = self.peek_span().start;
        let expr = self.expression()?;

        let semicolon = self.consume_with_help(
            TokenType::Semicolon,
            "expected ';' to end statement",
            "Every statement must be terminated with ';'.".to_string(),
        )?;
        let end_span = semicolon.span.end;

        Ok(Stmt::Expression {
            expr,
            span: Span::new(start_span, end_span),
        })
    }

    pub fn expression(&mut self) -> Result<Expr, DewError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, DewError> {
        let expr = self.equality()?;

        if self.match_types(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            self.expect_operand(
                &equals,
                "An assignment needs a value on the right of '='. Example: x = 1;",
            )?;
            self.enter_nesting(&equals.span)?;
            let value = self.assignment();
            self.depth -= 1;
            let value = value?;

            if let Expr::Symbol { name, span } = expr {
                let end = value.span().end;
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                    span: Span::new(span.start, end),
                });
            }

            return Err(DewError::parse_error_with_help(
                equals.span,
                "invalid assignment target".to_string(),
                "Only names can be assigned to. Example: 'x = 10;'".to_string(),
            ));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, DewError> {
        self.binary_level(
            &[
                (TokenType::BangEqual, BinaryOp::NotEqual),
                (TokenType::EqualEqual, BinaryOp::Equal),
            ],
            Self::comparison,
            "Equality operators like '==' and '!=' require expressions on both sides.",
        )
    }

    fn comparison(&mut self) -> Result<Expr, DewError> {
        self.binary_level(
            &[
                (TokenType::Greater, BinaryOp::Greater),
                (TokenType::GreaterEqual, BinaryOp::GreaterEqual),
                (TokenType::Less, BinaryOp::Less),
                (TokenType::LessEqual, BinaryOp::LessEqual),
            ],
            Self::term,
            "Comparison operators like '>', '<', '>=' and '<=' require expressions on both sides.",
        )
    }

    fn term(&mut self) -> Result<Expr, DewError> {
        self.binary_level(
            &[
                (TokenType::Minus, BinaryOp::Subtract),
                (TokenType::Plus, BinaryOp::Add),
            ],
            Self::factor,
            "Arithmetic operators like '+' and '-' require expressions on both sides.",
        )
    }

    fn factor(&mut self) -> Result<Expr, DewError> {
        self.binary_level(
            &[
                (TokenType::Slash, BinaryOp::Divide),
                (TokenType::Star, BinaryOp::Multiply),
                (TokenType::Percent, BinaryOp::Modulo),
            ],
            Self::unary,
            "Multiplication, division and modulo operators require expressions on both sides.",
        )
    }

    /// One left-associative precedence level: `next (op next)*`.
    fn binary_level(
        &mut self,
        operators: &[(TokenType, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, DewError>,
        help: &str,
    ) -> Result<Expr, DewError> {
        let mut expr = next(self)?;

        while let Some(operator) = self.match_operator(operators) {
            let operator_token = self.previous().clone();

            self.expect_operand(&operator_token, help)?;
            let right = next(self)?;

            let start = expr.span().start;
            let end = right.span().end;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, DewError> {
        if self.match_types(&[TokenType::Bang, TokenType::Minus]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Bang => UnaryOp::Not,
                _ => UnaryOp::Negate,
            };

            self.expect_operand(
                &operator_token,
                "Unary operators like '-' and '!' must be followed by an expression.",
            )?;
            self.enter_nesting(&operator_token.span)?;
            let right = self.unary();
            self.depth -= 1;
            let right = right?;
            let end = right.span().end;

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(right),
                span: Span::new(operator_token.span.start, end),
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, DewError> {
        if self.is_at_end() {
            return Err(DewError::parse_error_with_help(
                self.peek_span(),
                "unexpected end of input".to_string(),
                "Expected an expression here. Check for unmatched parentheses or incomplete statements.".to_string(),
            ));
        }

        let token = self.advance().clone();

        match token.token_type {
            TokenType::False => Ok(Expr::Literal {
                value: Value::Bool(false),
                span: token.span,
            }),
            TokenType::True => Ok(Expr::Literal {
                value: Value::Bool(true),
                span: token.span,
            }),
            TokenType::Null => Ok(Expr::Literal {
                value: Value::Null,
                span: token.span,
            }),
            TokenType::Integer | TokenType::Float | TokenType::String => {
                let value = match token.literal {
                    Literal::Integer(n) => Value::Int(n),
                    Literal::Float(n) => Value::Float(n),
                    Literal::String(s) => Value::String(s),
                    Literal::None => Value::Null,
                };
                Ok(Expr::Literal {
                    value,
                    span: token.span,
                })
            }
            TokenType::Symbol => Ok(Expr::Symbol {
                name: symbol_name(&token),
                span: token.span,
            }),
            TokenType::LeftParen => {
                let start_span = token.span.clone();

                if self.is_at_end() {
                    return Err(DewError::parse_error_with_help(
                        start_span,
                        "expected expression after '('".to_string(),
                        "Opening parentheses '(' must contain a valid expression. Example: (x + 1)".to_string(),
                    ));
                }

                if self.check(TokenType::RightParen) {
                    return Err(DewError::parse_error_with_help(
                        Span::new(start_span.start, self.peek_span().end),
                        "empty parentheses are not allowed".to_string(),
                        "Parentheses must contain an expression. Use 'null' for a null value: (null)".to_string(),
                    ));
                }

                self.enter_nesting(&start_span)?;
                let expr = self.expression();
                self.depth -= 1;
                let expr = expr?;

                let end_token = self.consume_with_help(
                    TokenType::RightParen,
                    "expected ')' to end grouping",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'.".to_string(),
                )?;

                Ok(Expr::Grouping {
                    expr: Box::new(expr),
                    span: Span::new(start_span.start, end_token.span.end),
                })
            }
            other => {
                let help_msg = match other {
                    TokenType::RightParen => "Found ')' without matching '('. Check for unbalanced parentheses.",
                    TokenType::Semicolon => "A statement must contain an expression before its ';'.",
                    _ => "Expected a literal value, name, or parenthesized expression here.",
                };
                Err(DewError::parse_error_with_help(
                    token.span,
                    format!("expected expression, found '{}'", other.lexeme()),
                    help_msg.to_string(),
                ))
            }
        }
    }

    /// Fails with a message naming `operator_token` unless the next token can
    /// begin an operand.
    fn expect_operand(&self, operator_token: &Token, help: &str) -> Result<(), DewError> {
        let starts_operand = self.peek().map_or(false, |token| {
            matches!(
                token.token_type,
                TokenType::Integer
                    | TokenType::Float
                    | TokenType::String
                    | TokenType::Symbol
                    | TokenType::True
                    | TokenType::False
                    | TokenType::Null
                    | TokenType::LeftParen
                    | TokenType::Minus
                    | TokenType::Bang
            )
        });

        if starts_operand {
            Ok(())
        } else {
            Err(DewError::parse_error_with_help(
                operator_token.span.clone(),
                format!(
                    "expected expression after '{}'",
                    operator_token.token_type.lexeme()
                ),
                help.to_string(),
            ))
        }
    }

    fn enter_nesting(&mut self, span: &Span) -> Result<(), DewError> {
        if self.depth >= MAX_NESTING {
            return Err(DewError::parse_error_with_help(
                span.clone(),
                "expression nested too deeply".to_string(),
                format!(
                    "At most {} groupings, prefix operators or chained assignments may nest. Split the expression into smaller statements.",
                    MAX_NESTING
                ),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consumes the next token if it is one of `operators`' tokens.
    fn match_operator(&mut self, operators: &[(TokenType, BinaryOp)]) -> Option<BinaryOp> {
        let operator = self.peek().and_then(|token| {
            operators
                .iter()
                .find(|(token_type, _)| *token_type == token.token_type)
                .map(|&(_, operator)| operator)
        })?;
        self.advance();
        Some(operator)
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(*token_type) {
                self.advance();
                return true;
            }
        }

        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek()
            .map_or(false, |token| token.token_type == token_type)
    }

    fn check_next(&self, token_type: TokenType) -> bool {
        self.tokens
            .get(self.current + 1)
            .map_or(false, |token| token.token_type == token_type)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Span of the next token, or a one-byte span just past the last token
    /// at end of input.
    fn peek_span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span.clone(),
            None => match self.tokens.last() {
                Some(last) => Span::single(last.span.end),
                None => Span::single(0),
            },
        }
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: String,
    ) -> Result<&Token, DewError> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(DewError::parse_error_with_help(
                self.peek_span(),
                message.to_string(),
                help,
            ))
        }
    }
}

fn symbol_name(token: &Token) -> String {
    match &token.literal {
        Literal::String(name) => name.clone(),
        _ => String::new(),
    }
}
