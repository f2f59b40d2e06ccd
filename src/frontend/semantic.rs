//! Semantic analysis.
//!
//! One depth-first walk over the AST builds the scope tree and checks
//! declarations, references, assignment state, and operand types. All
//! findings are collected; analysis never stops at the first error.
//! Undeclared references stay unresolved and type to `Unknown`, which is
//! compatible with everything so one mistake is reported once instead of
//! cascading.

use crate::frontend::ast::*;
use crate::frontend::symbols::{ScopeId, ScopeKind, ScopeTree, SymbolStatus};
use crate::utils::errors::{SemanticError, SemanticErrorKind};
use crate::utils::location::Span;
use log::debug;

/// The result of analyzing one program.
#[derive(Debug, Clone)]
pub struct SemanticOutput {
    /// Scope tree and all declared symbols.
    pub table: ScopeTree,
    /// Semantic diagnostics, in traversal order.
    pub errors: Vec<SemanticError>,
}

/// Analyze a parsed program.
pub fn analyze(program: &Program) -> SemanticOutput {
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.check_program(program);
    debug!(
        "semantic analysis: {} symbols, {} errors",
        analyzer.table.len(),
        analyzer.errors.len()
    );
    SemanticOutput { table: analyzer.table, errors: analyzer.errors }
}

struct SemanticAnalyzer {
    table: ScopeTree,
    errors: Vec<SemanticError>,
    /// Name and return type of the method being walked, if any.
    current_method: Option<(String, Type)>,
    /// Whether the current method has satisfied its return obligation.
    returned: bool,
}

impl SemanticAnalyzer {
    fn new() -> Self {
        Self {
            table: ScopeTree::new(),
            errors: Vec::new(),
            current_method: None,
            returned: false,
        }
    }

    fn check_program(&mut self, program: &Program) {
        let global = self.table.global();
        for item in &program.items {
            match item {
                Item::Class(class) => self.check_class(class, global),
                Item::Method(method) => self.check_method(method, global),
                Item::Stmt(stmt) => self.check_stmt(stmt, global),
            }
        }
    }

    fn check_class(&mut self, class: &ClassDecl, enclosing: ScopeId) {
        self.declare(enclosing, &class.name, Type::Class, SymbolStatus::Assigned, class.span);
        let scope =
            self.table
                .push_scope(ScopeKind::Class, format!("class {}", class.name), enclosing);
        for member in &class.members {
            match member {
                Member::Field(field) => {
                    self.declare(scope, &field.name, field.ty, SymbolStatus::Declared, field.span);
                }
                Member::Method(method) => self.check_method(method, scope),
            }
        }
    }

    fn check_method(&mut self, method: &MethodDecl, enclosing: ScopeId) {
        self.declare(
            enclosing,
            &method.name,
            method.return_type,
            SymbolStatus::Assigned,
            method.span,
        );
        let scope = self.table.push_scope(
            ScopeKind::Method,
            format!("method {}", method.name),
            enclosing,
        );
        // Parameters carry a caller-provided value from the start.
        for param in &method.params {
            self.declare(scope, &param.name, param.ty, SymbolStatus::Assigned, param.span);
        }

        let enclosing_method =
            self.current_method.replace((method.name.clone(), method.return_type));
        let enclosing_returned = self.returned;
        self.returned = false;

        for stmt in &method.body.statements {
            self.check_stmt(stmt, scope);
        }

        if method.return_type != Type::Void && !self.returned {
            self.errors.push(SemanticError {
                message: format!(
                    "method '{}' must return a value of type {}",
                    method.name, method.return_type
                ),
                span: method.span,
                kind: SemanticErrorKind::MissingReturn,
            });
        }

        self.current_method = enclosing_method;
        self.returned = enclosing_returned;
    }

    fn check_stmt(&mut self, stmt: &Stmt, scope: ScopeId) {
        match &stmt.kind {
            StmtKind::VarDecl { ty, name, init } => {
                self.check_var_decl(*ty, name, init.as_ref(), stmt.span, scope);
            }
            StmtKind::Assignment { target, target_span, value } => {
                self.check_assignment(target, *target_span, value, scope);
            }
            StmtKind::If { condition, then_block, else_block } => {
                self.check_condition(condition, scope, "if");
                self.check_block(then_block, scope);
                if let Some(block) = else_block {
                    self.check_block(block, scope);
                }
            }
            StmtKind::For { init, condition, step, body } => {
                // The header and body share one scope.
                let loop_scope = self.table.push_scope(ScopeKind::Block, "block", scope);
                self.check_stmt(init, loop_scope);
                self.check_condition(condition, loop_scope, "for");
                self.check_stmt(step, loop_scope);
                for stmt in &body.statements {
                    self.check_stmt(stmt, loop_scope);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_condition(condition, scope, "while");
                self.check_block(body, scope);
            }
            StmtKind::Call { callee, args } => {
                self.check_call(callee, args, stmt.span, scope);
            }
            StmtKind::Return { value } => {
                let value_ty = value.as_ref().map(|expr| self.check_expr(expr, scope));
                self.check_return(value_ty, stmt.span);
            }
            StmtKind::Block(block) => self.check_block(block, scope),
        }
    }

    fn check_block(&mut self, block: &Block, enclosing: ScopeId) {
        let scope = self.table.push_scope(ScopeKind::Block, "block", enclosing);
        for stmt in &block.statements {
            self.check_stmt(stmt, scope);
        }
    }

    fn check_var_decl(
        &mut self,
        declared: Type,
        name: &str,
        init: Option<&Expr>,
        span: Span,
        scope: ScopeId,
    ) {
        // Evaluate the initializer first so a self-reference like
        // `int x = x;` is reported as undeclared.
        let init_ty = init.map(|expr| self.check_expr(expr, scope));

        let (ty, status) = match init_ty {
            Some(init_ty) => {
                let ty = if declared == Type::Inferred { init_ty } else { declared };
                if declared != Type::Inferred && !assignable(declared, init_ty) {
                    self.errors.push(SemanticError {
                        message: format!(
                            "cannot initialize '{}' of type {} with a value of type {}",
                            name, declared, init_ty
                        ),
                        span,
                        kind: SemanticErrorKind::TypeMismatch,
                    });
                }
                (ty, SymbolStatus::Assigned)
            }
            None => (declared, SymbolStatus::Declared),
        };

        self.declare(scope, name, ty, status, span);
    }

    fn check_assignment(&mut self, target: &str, target_span: Span, value: &Expr, scope: ScopeId) {
        let value_ty = self.check_expr(value, scope);

        match self.table.lookup(scope, target) {
            Some(index) => {
                let declared = self.table.symbol(index).ty;
                if !assignable(declared, value_ty) {
                    self.errors.push(SemanticError {
                        message: format!(
                            "cannot assign a value of type {} to '{}' of type {}",
                            value_ty, target, declared
                        ),
                        span: target_span,
                        kind: SemanticErrorKind::TypeMismatch,
                    });
                }
                self.table.assign(index);
            }
            None => self.undeclared(target, target_span),
        }
    }

    fn check_condition(&mut self, condition: &Expr, scope: ScopeId, construct: &str) {
        let ty = self.check_expr(condition, scope);
        if ty != Type::Bool && ty != Type::Unknown {
            self.errors.push(SemanticError {
                message: format!(
                    "'{}' condition must be of type bool, found {}",
                    construct, ty
                ),
                span: condition.span,
                kind: SemanticErrorKind::TypeMismatch,
            });
        }
    }

    /// Check a return statement against the enclosing method's
    /// declared return type. Outside any method the expression has
    /// already been typed and there is nothing more to check.
    fn check_return(&mut self, value_ty: Option<Type>, span: Span) {
        let (name, expected) = match &self.current_method {
            Some((name, expected)) => (name.clone(), *expected),
            None => return,
        };

        match value_ty {
            Some(_) if expected == Type::Void => {
                self.errors.push(SemanticError {
                    message: format!("'{}' is void and must not return a value", name),
                    span,
                    kind: SemanticErrorKind::TypeMismatch,
                });
            }
            Some(ty) => {
                self.returned = true;
                if !assignable(expected, ty) {
                    self.errors.push(SemanticError {
                        message: format!(
                            "cannot return a value of type {} from '{}' returning {}",
                            ty, name, expected
                        ),
                        span,
                        kind: SemanticErrorKind::TypeMismatch,
                    });
                }
            }
            None if expected != Type::Void => {
                // Report the bare return here; it also settles the
                // method's obligation so the miss is not reported twice.
                self.returned = true;
                self.errors.push(SemanticError {
                    message: format!(
                        "'{}' must return a value of type {}",
                        name, expected
                    ),
                    span,
                    kind: SemanticErrorKind::MissingReturn,
                });
            }
            None => {}
        }
    }

    fn check_call(&mut self, callee: &str, args: &[Expr], span: Span, scope: ScopeId) -> Type {
        for arg in args {
            self.check_expr(arg, scope);
        }
        // Dotted names such as `Console.WriteLine` are console I/O
        // builtins, not user symbols.
        if callee.contains('.') {
            return Type::Unknown;
        }
        match self.table.lookup(scope, callee) {
            Some(index) => self.table.symbol(index).ty,
            None => {
                self.undeclared(callee, span);
                Type::Unknown
            }
        }
    }

    /// Type an expression, reporting problems along the way.
    fn check_expr(&mut self, expr: &Expr, scope: ScopeId) -> Type {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Type::Int,
            ExprKind::DoubleLiteral(_) => Type::Double,
            ExprKind::BoolLiteral(_) => Type::Bool,
            ExprKind::StringLiteral(_) => Type::Str,
            ExprKind::CharLiteral(_) => Type::Char,
            ExprKind::Grouped(inner) => self.check_expr(inner, scope),
            ExprKind::Identifier(name) => self.check_identifier(name, expr.span, scope),
            ExprKind::Call { callee, args } => self.check_call(callee, args, expr.span, scope),
            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand, scope);
                match op {
                    UnaryOp::Neg if ty.is_numeric() || ty == Type::Unknown => ty,
                    UnaryOp::Not if ty == Type::Bool || ty == Type::Unknown => Type::Bool,
                    _ => {
                        self.errors.push(SemanticError {
                            message: format!("operator '{}' cannot apply to type {}", op, ty),
                            span: expr.span,
                            kind: SemanticErrorKind::TypeMismatch,
                        });
                        Type::Unknown
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.check_expr(left, scope);
                let rhs = self.check_expr(right, scope);
                self.check_binary(*op, lhs, rhs, expr.span)
            }
        }
    }

    fn check_identifier(&mut self, name: &str, span: Span, scope: ScopeId) -> Type {
        match self.table.lookup(scope, name) {
            Some(index) => {
                let symbol = self.table.symbol(index);
                if symbol.status == SymbolStatus::Declared {
                    self.errors.push(SemanticError {
                        message: format!("variable '{}' is used before being assigned", name),
                        span,
                        kind: SemanticErrorKind::UsedBeforeAssignment,
                    });
                }
                symbol.ty
            }
            None => {
                self.undeclared(name, span);
                Type::Unknown
            }
        }
    }

    fn check_binary(&mut self, op: BinaryOp, lhs: Type, rhs: Type, span: Span) -> Type {
        if lhs == Type::Unknown || rhs == Type::Unknown {
            // Already reported at the operand; give the rest a pass.
            return if op.is_arithmetic() { Type::Unknown } else { Type::Bool };
        }

        if op.is_arithmetic() {
            if lhs.is_numeric() && rhs.is_numeric() {
                return if lhs == Type::Double || rhs == Type::Double {
                    Type::Double
                } else {
                    Type::Int
                };
            }
            self.type_mismatch(op, lhs, rhs, span);
            return Type::Unknown;
        }

        if op.is_logical() {
            if lhs != Type::Bool || rhs != Type::Bool {
                self.type_mismatch(op, lhs, rhs, span);
            }
            return Type::Bool;
        }

        // Comparisons: equality needs compatible operands, ordering
        // needs numeric ones.
        match op {
            BinaryOp::Eq | BinaryOp::Ne => {
                if !assignable(lhs, rhs) && !assignable(rhs, lhs) {
                    self.type_mismatch(op, lhs, rhs, span);
                }
            }
            _ => {
                if !lhs.is_numeric() || !rhs.is_numeric() {
                    self.type_mismatch(op, lhs, rhs, span);
                }
            }
        }
        Type::Bool
    }

    fn declare(&mut self, scope: ScopeId, name: &str, ty: Type, status: SymbolStatus, span: Span) {
        if let Err(existing) = self.table.declare(scope, name, ty, status, span) {
            let first = self.table.symbol(existing);
            self.errors.push(SemanticError {
                message: format!(
                    "'{}' is already declared in this scope (first declared at {})",
                    name, first.span
                ),
                span,
                kind: SemanticErrorKind::DuplicateDeclaration,
            });
        }
    }

    fn undeclared(&mut self, name: &str, span: Span) {
        self.errors.push(SemanticError {
            message: format!("undeclared identifier '{}'", name),
            span,
            kind: SemanticErrorKind::UndeclaredIdentifier,
        });
    }

    fn type_mismatch(&mut self, op: BinaryOp, lhs: Type, rhs: Type, span: Span) {
        self.errors.push(SemanticError {
            message: format!("operator '{}' cannot apply to types {} and {}", op, lhs, rhs),
            span,
            kind: SemanticErrorKind::TypeMismatch,
        });
    }
}

/// A value of type `from` can land in a slot of type `to`.
/// The only implicit widening is int to double.
fn assignable(to: Type, from: Type) -> bool {
    to == from
        || (to == Type::Double && from == Type::Int)
        || to == Type::Unknown
        || from == Type::Unknown
        || to == Type::Inferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{lexer, parser};

    fn analyze_source(source: &str) -> SemanticOutput {
        let lex = lexer::tokenize(source).unwrap();
        let parse = parser::parse_tokens(lex.tokens).unwrap();
        assert!(parse.errors.is_empty(), "syntax errors: {:?}", parse.errors);
        analyze(&parse.program)
    }

    #[test]
    fn test_clean_program_has_no_errors() {
        let out = analyze_source(
            "int cantidad = 10;\n\
             double precio = 25.99;\n\
             double total = precio * cantidad;",
        );
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        assert_eq!(out.table.len(), 3);
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        let out = analyze_source("int edad = 30;\ndouble edad = 1.5;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::DuplicateDeclaration);
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.symbols()[0].ty, Type::Int);
    }

    #[test]
    fn test_undeclared_identifier() {
        let out = analyze_source("int x = 1;\nx = valor + 1;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::UndeclaredIdentifier);
        assert!(out.errors[0].message.contains("'valor'"));
        // nothing was fabricated for the unknown name
        assert_eq!(out.table.len(), 1);
    }

    #[test]
    fn test_used_before_assignment() {
        let out = analyze_source("int contador;\nint x = contador + 1;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::UsedBeforeAssignment);
    }

    #[test]
    fn test_assignment_clears_declared_status() {
        let out = analyze_source("int contador;\ncontador = 0;\nint x = contador + 1;");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_int_widens_to_double() {
        let out = analyze_source("double precio = 10;");
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_double_does_not_narrow_to_int() {
        let out = analyze_source("int cantidad = 2.5;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
    }

    #[test]
    fn test_string_assignment_to_int_rejected() {
        let out = analyze_source("int x = 1;\nx = \"hola\";");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
    }

    #[test]
    fn test_condition_must_be_bool() {
        let out = analyze_source("int x = 1;\nif (x + 1) { x = 2; }");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
        assert!(out.errors[0].message.contains("bool"));
    }

    #[test]
    fn test_comparison_condition_is_bool() {
        let out = analyze_source(
            "int i = 0;\nint suma = 0;\nfor (i = 0; i == 10; i = i + 1) { suma = suma + i; }",
        );
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_var_infers_initializer_type() {
        let out = analyze_source("var total = 2.5;\ndouble d = total;\nint i = total;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
        assert_eq!(out.table.symbols()[0].ty, Type::Double);
    }

    #[test]
    fn test_shadowing_across_scopes() {
        let out = analyze_source("int x = 1;\n{ double x = 2.5; double y = x; }");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
        assert_eq!(out.table.len(), 3);
    }

    #[test]
    fn test_class_members_and_scopes() {
        let out = analyze_source(
            "class Persona {\n\
                 string nombre;\n\
                 int edad;\n\
                 void Saludar() { Console.WriteLine(nombre); }\n\
             }",
        );
        // reading the unassigned field 'nombre' inside the method
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::UsedBeforeAssignment);

        let names: Vec<&str> = out.table.symbols().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Persona", "nombre", "edad", "Saludar"]);
        assert_eq!(out.table.symbols()[0].ty, Type::Class);
        assert_eq!(out.table.symbols()[0].scope_kind, ScopeKind::Global);
        assert_eq!(out.table.symbols()[1].scope_kind, ScopeKind::Class);
    }

    #[test]
    fn test_method_params_count_as_assigned() {
        let out = analyze_source("int Sumar(int a, int b) { return a + b; }");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_non_void_method_requires_return() {
        let out = analyze_source("int Sumar(int a, int b) { a = b; }");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::MissingReturn);
        assert!(out.errors[0].message.contains("'Sumar'"));
    }

    #[test]
    fn test_void_method_must_not_return_value() {
        let out = analyze_source("void Mostrar() { return 5; }");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
        assert!(out.errors[0].message.contains("void"));
    }

    #[test]
    fn test_bare_return_in_void_method() {
        let out = analyze_source("void Salir() { return; }");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_return_type_checked_against_declaration() {
        let out = analyze_source("int Obtener() { return 2.5; }");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
    }

    #[test]
    fn test_return_widens_int_to_double() {
        let out = analyze_source("double Promedio() { return 3; }");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_bare_return_in_non_void_reported_once() {
        let out = analyze_source("int Dar() { return; }");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::MissingReturn);
    }

    #[test]
    fn test_console_builtin_not_resolved() {
        let out = analyze_source("string nombre = \"x\";\nnombre = Console.ReadLine();");
        assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    }

    #[test]
    fn test_bare_undeclared_call_reported() {
        let out = analyze_source("Procesar();");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::UndeclaredIdentifier);
    }

    #[test]
    fn test_each_bad_read_reported() {
        let out = analyze_source("int a;\nint b = a + a;");
        assert_eq!(out.errors.len(), 2);
    }

    #[test]
    fn test_logical_operands_must_be_bool() {
        let out = analyze_source("bool activo = true;\nbool r = activo && 1;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, SemanticErrorKind::TypeMismatch);
    }
}
