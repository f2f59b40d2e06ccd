//! Recursive-descent parser.
//!
//! Consumes the full token sequence and produces one `Program` root plus
//! collected syntax diagnostics. On an unexpected token the parser
//! reports what it expected and what it found, then skips to the next
//! statement boundary (`;` or a closing `}`), so one malformed statement
//! costs one diagnostic instead of a cascade.

use crate::frontend::ast::*;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::errors::{AnalyzeError, AnalyzeResult, SyntaxError, SyntaxErrorKind};
use crate::utils::location::Span;
use anyhow::{anyhow, bail, Result};

/// Upper bound on AST nodes per request, to reject pathological input.
pub const MAX_NODES: usize = 200_000;

/// The result of parsing one token sequence.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Best-effort program, recovered statements omitted.
    pub program: Program,
    /// Syntax diagnostics, in source order.
    pub errors: Vec<SyntaxError>,
}

/// Parse a token sequence. Fails only when the node bound is exceeded.
pub fn parse_tokens(tokens: Vec<Token>) -> AnalyzeResult<ParseOutput> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    Ok(ParseOutput { program, errors: parser.errors })
}

/// A parser over one token sequence.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
    nodes: usize,
}

impl Parser {
    /// Create a parser. The sequence must end with an `Eof` token, as
    /// the lexer guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, errors: Vec::new(), nodes: 0 }
    }

    /// Parse a complete program.
    pub fn parse_program(&mut self) -> AnalyzeResult<Program> {
        let start = self.current().span;
        let mut program = Program::new();

        while !self.is_at_end() {
            if self.nodes > MAX_NODES {
                return Err(AnalyzeError::ResourceExceeded(format!(
                    "program produced more than {} syntax nodes",
                    MAX_NODES
                )));
            }
            match self.parse_item() {
                Ok(item) => program.items.push(item),
                Err(e) => {
                    self.record_error(&e.to_string());
                    self.synchronize();
                }
            }
        }

        program.span = start.merge(&self.previous_span());
        Ok(program)
    }

    fn parse_item(&mut self) -> Result<Item> {
        self.bump_nodes();
        if self.check(TokenKind::Class) {
            return Ok(Item::Class(self.parse_class()?));
        }
        if self.at_method_decl() {
            return Ok(Item::Method(self.parse_method()?));
        }
        Ok(Item::Stmt(self.parse_statement()?))
    }

    /// Lookahead for `type ident (` or `void ident (`.
    fn at_method_decl(&self) -> bool {
        let is_return_type =
            self.current().kind.is_type_keyword() || self.check(TokenKind::Void);
        is_return_type
            && self.peek_kind(1) == Some(TokenKind::Identifier)
            && self.peek_kind(2) == Some(TokenKind::LeftParen)
    }

    fn parse_class(&mut self) -> Result<ClassDecl> {
        let start = self.current().span;
        self.consume(TokenKind::Class, "expected 'class'")?;
        let name = self.consume_identifier("expected class name")?;
        self.consume(TokenKind::LeftBrace, "expected '{' after class name")?;

        // An empty body is valid and yields no members.
        let mut members = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.parse_member() {
                Ok(member) => members.push(member),
                Err(e) => {
                    self.record_error(&e.to_string());
                    self.synchronize_statement();
                }
            }
        }

        self.consume(TokenKind::RightBrace, "expected '}' to close class body")?;
        Ok(ClassDecl { name, members, span: start.merge(&self.previous_span()) })
    }

    fn parse_member(&mut self) -> Result<Member> {
        self.bump_nodes();
        if self.at_method_decl() {
            return Ok(Member::Method(self.parse_method()?));
        }
        if self.current().kind.is_type_keyword() {
            let start = self.current().span;
            let ty = self.parse_type()?;
            let name = self.consume_identifier("expected field name")?;
            self.consume(TokenKind::Semicolon, "expected ';' after field declaration")?;
            return Ok(Member::Field(FieldDecl {
                ty,
                name,
                span: start.merge(&self.previous_span()),
            }));
        }
        bail!("expected field or method declaration in class body")
    }

    fn parse_method(&mut self) -> Result<MethodDecl> {
        let start = self.current().span;
        let return_type = if self.match_token(TokenKind::Void) {
            Type::Void
        } else {
            self.parse_type()?
        };
        let name = self.consume_identifier("expected method name")?;
        self.consume(TokenKind::LeftParen, "expected '(' after method name")?;
        let params = self.parse_params()?;
        self.consume(TokenKind::RightParen, "expected ')' after parameters")?;
        // Bodies require a block even when empty.
        let body = self.parse_block()?;
        Ok(MethodDecl {
            return_type,
            name,
            params,
            body,
            span: start.merge(&self.previous_span()),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let start = self.current().span;
                let ty = self.parse_type()?;
                let name = self.consume_identifier("expected parameter name")?;
                params.push(Param { ty, name, span: start.merge(&self.previous_span()) });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Type> {
        let ty = match self.current().kind {
            TokenKind::Int => Type::Int,
            TokenKind::Double => Type::Double,
            TokenKind::Bool => Type::Bool,
            TokenKind::CharType => Type::Char,
            TokenKind::StringType => Type::Str,
            _ => bail!("expected type"),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_block(&mut self) -> Result<Block> {
        let start = self.current().span;
        self.consume(TokenKind::LeftBrace, "expected '{'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.record_error(&e.to_string());
                    self.synchronize_statement();
                }
            }
        }

        self.consume(TokenKind::RightBrace, "expected '}'")?;
        Ok(Block { statements, span: start.merge(&self.previous_span()) })
    }

    /// Statement dispatch by lookahead on the current token.
    fn parse_statement(&mut self) -> Result<Stmt> {
        self.bump_nodes();
        let start = self.current().span;

        let kind = match self.current().kind {
            TokenKind::For => self.parse_for()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Var => self.parse_var_inferred()?,
            TokenKind::LeftBrace => StmtKind::Block(self.parse_block()?),
            k if k.is_type_keyword() => self.parse_var_decl()?,
            TokenKind::Identifier => self.parse_assignment_or_call()?,
            _ => bail!("expected statement"),
        };

        Ok(Stmt { kind, span: start.merge(&self.previous_span()) })
    }

    fn parse_var_decl(&mut self) -> Result<StmtKind> {
        let ty = self.parse_type()?;
        let name = self.consume_identifier("expected variable name")?;
        let init = if self.match_token(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "expected ';' after declaration")?;
        Ok(StmtKind::VarDecl { ty, name, init })
    }

    /// `var x = expr;` — the declared type comes from the initializer.
    fn parse_var_inferred(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::Var, "expected 'var'")?;
        let name = self.consume_identifier("expected variable name")?;
        self.consume(TokenKind::Equal, "expected '=' in 'var' declaration")?;
        let init = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "expected ';' after declaration")?;
        Ok(StmtKind::VarDecl { ty: Type::Inferred, name, init: Some(init) })
    }

    fn parse_assignment_or_call(&mut self) -> Result<StmtKind> {
        let target_span = self.current().span;
        let name = self.parse_callee_name()?;

        if self.check(TokenKind::LeftParen) {
            self.advance();
            let args = self.parse_args()?;
            self.consume(TokenKind::RightParen, "expected ')' after call arguments")?;
            self.consume(TokenKind::Semicolon, "expected ';' after call")?;
            return Ok(StmtKind::Call { callee: name, args });
        }

        if name.contains('.') {
            bail!("expected '(' after dotted name");
        }

        self.consume(TokenKind::Equal, "expected '=' or '(' after identifier")?;
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "expected ';' after assignment")?;
        Ok(StmtKind::Assignment { target: name, target_span, value })
    }

    /// `identifier` optionally extended by `.identifier` segments, as in
    /// `Console.WriteLine`.
    fn parse_callee_name(&mut self) -> Result<String> {
        let mut name = self.consume_identifier("expected identifier")?;
        while self.check(TokenKind::Dot) && self.peek_kind(1) == Some(TokenKind::Identifier) {
            self.advance();
            name.push('.');
            name.push_str(&self.consume_identifier("expected identifier after '.'")?);
        }
        Ok(name)
    }

    fn parse_if(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::If, "expected 'if'")?;
        self.consume(TokenKind::LeftParen, "expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "expected ')' after condition")?;
        let then_block = self.parse_block()?;
        let else_block = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(StmtKind::If { condition, then_block, else_block })
    }

    fn parse_while(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::While, "expected 'while'")?;
        self.consume(TokenKind::LeftParen, "expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "expected ')' after condition")?;
        let body = self.parse_block()?;
        Ok(StmtKind::While { condition, body })
    }

    /// `for (init; cond; step) { body }` where init and step are
    /// assignments and the condition is a general expression; whether
    /// the condition types to bool is a semantic question, not a parse
    /// failure.
    fn parse_for(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::For, "expected 'for'")?;
        self.consume(TokenKind::LeftParen, "expected '(' after 'for'")?;

        let init = self.parse_header_assignment()?;
        self.consume(TokenKind::Semicolon, "expected ';' after for initializer")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "expected ';' after for condition")?;
        let step = self.parse_header_assignment()?;
        self.consume(TokenKind::RightParen, "expected ')' after for header")?;

        let body = self.parse_block()?;
        Ok(StmtKind::For {
            init: Box::new(init),
            condition,
            step: Box::new(step),
            body,
        })
    }

    /// An assignment without its trailing ';', as in a `for` header.
    fn parse_header_assignment(&mut self) -> Result<Stmt> {
        self.bump_nodes();
        let start = self.current().span;
        let target_span = self.current().span;
        let target = self.consume_identifier("expected identifier in for header")?;
        self.consume(TokenKind::Equal, "expected '=' in for header")?;
        let value = self.parse_expression()?;
        Ok(Stmt {
            kind: StmtKind::Assignment { target, target_span, value },
            span: start.merge(&self.previous_span()),
        })
    }

    fn parse_return(&mut self) -> Result<StmtKind> {
        self.consume(TokenKind::Return, "expected 'return'")?;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon, "expected ';' after return")?;
        Ok(StmtKind::Return { value })
    }

    // Expression ladder, loosest to tightest. Comparison binds looser
    // than additive, additive looser than multiplicative and primary.
    fn parse_expression(&mut self) -> Result<Expr> {
        self.bump_nodes();
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_token(TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEqual => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEqual => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let start = self.current().span;
        let op = match self.current().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(&operand.span);
            return Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        self.bump_nodes();
        let start = self.current().span;

        match self.current().kind {
            TokenKind::IntLiteral => {
                let value: i64 = self
                    .current()
                    .lexeme
                    .parse()
                    .map_err(|_| anyhow!("invalid integer literal '{}'", self.current().lexeme))?;
                self.advance();
                Ok(Expr::new(ExprKind::IntLiteral(value), start))
            }
            TokenKind::DoubleLiteral => {
                let value: f64 = self
                    .current()
                    .lexeme
                    .parse()
                    .map_err(|_| anyhow!("invalid double literal '{}'", self.current().lexeme))?;
                self.advance();
                Ok(Expr::new(ExprKind::DoubleLiteral(value), start))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLiteral(true), start))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLiteral(false), start))
            }
            TokenKind::StringLiteral => {
                let value = trim_delimiters(&self.current().lexeme, '"');
                self.advance();
                Ok(Expr::new(ExprKind::StringLiteral(value), start))
            }
            TokenKind::CharLiteral => {
                let value = trim_delimiters(&self.current().lexeme, '\'');
                self.advance();
                Ok(Expr::new(ExprKind::CharLiteral(value), start))
            }
            TokenKind::Identifier => {
                let name = self.parse_callee_name()?;
                if self.check(TokenKind::LeftParen) {
                    self.advance();
                    let args = self.parse_args()?;
                    self.consume(TokenKind::RightParen, "expected ')' after call arguments")?;
                    Ok(Expr::new(
                        ExprKind::Call { callee: name, args },
                        start.merge(&self.previous_span()),
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), start.merge(&self.previous_span())))
                }
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "expected ')'")?;
                Ok(Expr::new(
                    ExprKind::Grouped(Box::new(inner)),
                    start.merge(&self.previous_span()),
                ))
            }
            _ => bail!("expected expression"),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }

    fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        self.bump_nodes();
        let span = left.span.merge(&right.span);
        Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span)
    }

    // Token cursor helpers

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current().span
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            bail!("{}", message)
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<String> {
        if self.check(TokenKind::Identifier) {
            let name = self.current().lexeme.clone();
            self.advance();
            Ok(name)
        } else {
            bail!("{}", message)
        }
    }

    fn found_name(&self) -> String {
        let token = self.current();
        if token.is_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", token.lexeme)
        }
    }

    fn bump_nodes(&mut self) {
        self.nodes += 1;
    }

    fn record_error(&mut self, message: &str) {
        let kind = if self.is_at_end() {
            SyntaxErrorKind::UnexpectedEof
        } else if message.starts_with("expected expression") {
            SyntaxErrorKind::ExpectedExpression
        } else if message.starts_with("expected statement") {
            SyntaxErrorKind::ExpectedStatement
        } else if message.starts_with("expected '") {
            SyntaxErrorKind::ExpectedToken
        } else {
            SyntaxErrorKind::UnexpectedToken
        };
        self.errors.push(SyntaxError {
            message: message.to_string(),
            span: self.current().span,
            kind,
            expected: None,
            found: Some(self.found_name()),
        });
    }

    /// Top-level recovery: skip to the next statement boundary or
    /// item-starting keyword. Returning at an item start is safe:
    /// every production consumes at least one token before it can fail
    /// again, so recovery always makes progress.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::Class
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Var
                | TokenKind::Return => return,
                k if k.is_type_keyword() => return,
                _ => {}
            }
            self.advance();
            let prev = self.tokens[self.pos - 1].kind;
            if prev == TokenKind::Semicolon || prev == TokenKind::RightBrace {
                return;
            }
        }
    }

    /// Statement-level recovery inside a block: stop before the closing
    /// brace so the enclosing construct can finish.
    fn synchronize_statement(&mut self) {
        while !self.is_at_end() && !self.check(TokenKind::RightBrace) {
            match self.current().kind {
                TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Var => return,
                k if k.is_type_keyword() => return,
                _ => {}
            }
            self.advance();
            if self.tokens[self.pos - 1].kind == TokenKind::Semicolon {
                return;
            }
        }
    }
}

fn trim_delimiters(lexeme: &str, delim: char) -> String {
    let s = lexeme.strip_prefix(delim).unwrap_or(lexeme);
    s.strip_suffix(delim).unwrap_or(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer;

    fn parse(source: &str) -> ParseOutput {
        let lex = lexer::tokenize(source).unwrap();
        parse_tokens(lex.tokens).unwrap()
    }

    #[test]
    fn test_declarations_with_literals() {
        let out = parse(
            "int cantidad = 10;\n\
             double precioTotal = 25.99;\n\
             string mensaje = \"Hola Mundo\";\n\
             char inicial = 'A';\n\
             bool activo = true;",
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.program.items.len(), 5);
    }

    #[test]
    fn test_empty_class_body() {
        let out = parse("class Vacia { }");
        assert!(out.errors.is_empty());
        assert_eq!(out.program.items.len(), 1);
        match &out.program.items[0] {
            Item::Class(class) => {
                assert_eq!(class.name, "Vacia");
                assert!(class.members.is_empty());
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_class_with_fields_and_method() {
        let out = parse(
            "class Persona {\n\
                 string nombre;\n\
                 int edad;\n\
                 void Saludar() { Console.WriteLine(nombre); }\n\
             }",
        );
        assert!(out.errors.is_empty());
        match &out.program.items[0] {
            Item::Class(class) => {
                assert_eq!(class.members.len(), 3);
                assert!(matches!(class.members[0], Member::Field(_)));
                assert!(matches!(class.members[2], Member::Method(_)));
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_equality_condition_parses() {
        let out = parse("int i = 0; int suma = 0; for (i = 0; i == 10; i = i + 1) { suma = suma + i; }");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_while_and_console_call() {
        let out = parse(
            "int contador = 0;\n\
             while (contador == 10) {\n\
                 Console.WriteLine(contador);\n\
                 contador = contador + 1;\n\
             }",
        );
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_void_procedure_with_params() {
        let out = parse("void GuardarInfo(string nombre, int edad) { Console.WriteLine(nombre); }");
        assert!(out.errors.is_empty());
        match &out.program.items[0] {
            Item::Method(m) => {
                assert_eq!(m.return_type, Type::Void);
                assert_eq!(m.params.len(), 2);
            }
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_method_with_return() {
        let out = parse("int Sumar(int a, int b) { return a + b; }");
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_var_declaration() {
        let out = parse("double precioTotal = 1.5; var _resultadoFinal_42 = precioTotal;");
        assert!(out.errors.is_empty());
        match &out.program.items[1] {
            Item::Stmt(stmt) => match &stmt.kind {
                StmtKind::VarDecl { ty, name, init } => {
                    assert_eq!(*ty, Type::Inferred);
                    assert_eq!(name, "_resultadoFinal_42");
                    assert!(init.is_some());
                }
                other => panic!("expected var decl, got {:?}", other),
            },
            other => panic!("expected statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_comparison_looser_than_additive() {
        let out = parse("bool b = 1 + 2 == 3;");
        assert!(out.errors.is_empty());
        match &out.program.items[0] {
            Item::Stmt(stmt) => match &stmt.kind {
                StmtKind::VarDecl { init: Some(expr), .. } => match &expr.kind {
                    ExprKind::Binary { op, .. } => assert_eq!(*op, BinaryOp::Eq),
                    other => panic!("expected binary, got {:?}", other),
                },
                other => panic!("expected init, got {:?}", other),
            },
            other => panic!("expected statement, got {:?}", other),
        }
    }

    #[test]
    fn test_read_call_in_expression_position() {
        let out = parse("string nombre = \"x\"; nombre = Console.ReadLine();");
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_recovery_one_error_per_malformed_statement() {
        // missing ';' on the first statement; the second parses fine
        let out = parse("int x = 1\nint y = 2;");
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.contains("expected ';'"));
        assert_eq!(out.program.items.len(), 1);
    }

    #[test]
    fn test_recovery_inside_block() {
        let out = parse("void F() { int x = ; int y = 2; }");
        assert_eq!(out.errors.len(), 1);
        match &out.program.items[0] {
            Item::Method(m) => assert_eq!(m.body.statements.len(), 1),
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_positions_non_decreasing() {
        let out = parse("int a = 1;\nint b = 2;\nclass C { int f; }");
        let mut last = 0;
        for item in &out.program.items {
            let line = match item {
                Item::Class(c) => c.span.start_line,
                Item::Method(m) => m.span.start_line,
                Item::Stmt(s) => s.span.start_line,
            };
            assert!(line >= last);
            last = line;
        }
    }
}
