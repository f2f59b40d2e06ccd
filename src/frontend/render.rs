//! Indented textual rendering of the AST.
//!
//! One node per line, children indented two spaces under their parent.
//! Used by the text emitter and handy when eyeballing parser output.

use crate::frontend::ast::*;

/// Render a program as an indented tree.
pub fn render_program(program: &Program) -> String {
    let mut r = Renderer::new();
    r.line("Program");
    r.indented(|r| {
        for item in &program.items {
            r.render_item(item);
        }
    });
    r.finish()
}

struct Renderer {
    out: String,
    indent: usize,
}

impl Renderer {
    fn new() -> Self {
        Self { out: String::new(), indent: 0 }
    }

    fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn render_item(&mut self, item: &Item) {
        match item {
            Item::Class(class) => self.render_class(class),
            Item::Method(method) => self.render_method(method),
            Item::Stmt(stmt) => self.render_stmt(stmt),
        }
    }

    fn render_class(&mut self, class: &ClassDecl) {
        self.line(format!("Class {}", class.name));
        self.indented(|r| {
            for member in &class.members {
                match member {
                    Member::Field(field) => {
                        r.line(format!("Field {} {}", field.ty, field.name));
                    }
                    Member::Method(method) => r.render_method(method),
                }
            }
        });
    }

    fn render_method(&mut self, method: &MethodDecl) {
        let params: Vec<String> = method
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        self.line(format!(
            "Method {} {}({})",
            method.return_type,
            method.name,
            params.join(", ")
        ));
        self.indented(|r| r.render_block(&method.body));
    }

    fn render_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.render_stmt(stmt);
        }
    }

    fn render_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl { ty, name, init } => {
                self.line(format!("VarDecl {} {}", ty, name));
                if let Some(init) = init {
                    self.indented(|r| r.render_expr(init));
                }
            }
            StmtKind::Assignment { target, value, .. } => {
                self.line(format!("Assign {}", target));
                self.indented(|r| r.render_expr(value));
            }
            StmtKind::If { condition, then_block, else_block } => {
                self.line("If");
                self.indented(|r| {
                    r.line("Condition");
                    r.indented(|r| r.render_expr(condition));
                    r.line("Then");
                    r.indented(|r| r.render_block(then_block));
                    if let Some(block) = else_block {
                        r.line("Else");
                        r.indented(|r| r.render_block(block));
                    }
                });
            }
            StmtKind::For { init, condition, step, body } => {
                self.line("For");
                self.indented(|r| {
                    r.line("Init");
                    r.indented(|r| r.render_stmt(init));
                    r.line("Condition");
                    r.indented(|r| r.render_expr(condition));
                    r.line("Step");
                    r.indented(|r| r.render_stmt(step));
                    r.line("Body");
                    r.indented(|r| r.render_block(body));
                });
            }
            StmtKind::While { condition, body } => {
                self.line("While");
                self.indented(|r| {
                    r.line("Condition");
                    r.indented(|r| r.render_expr(condition));
                    r.line("Body");
                    r.indented(|r| r.render_block(body));
                });
            }
            StmtKind::Call { callee, args } => {
                self.line(format!("Call {}", callee));
                self.indented(|r| {
                    for arg in args {
                        r.render_expr(arg);
                    }
                });
            }
            StmtKind::Return { value } => {
                self.line("Return");
                if let Some(expr) = value {
                    self.indented(|r| r.render_expr(expr));
                }
            }
            StmtKind::Block(block) => {
                self.line("Block");
                self.indented(|r| r.render_block(block));
            }
        }
    }

    fn render_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLiteral(v) => self.line(format!("Int {}", v)),
            ExprKind::DoubleLiteral(v) => self.line(format!("Double {}", v)),
            ExprKind::BoolLiteral(v) => self.line(format!("Bool {}", v)),
            ExprKind::StringLiteral(v) => self.line(format!("String \"{}\"", v)),
            ExprKind::CharLiteral(v) => self.line(format!("Char '{}'", v)),
            ExprKind::Identifier(name) => self.line(format!("Ident {}", name)),
            ExprKind::Binary { op, left, right } => {
                self.line(format!("Binary {}", op));
                self.indented(|r| {
                    r.render_expr(left);
                    r.render_expr(right);
                });
            }
            ExprKind::Unary { op, operand } => {
                self.line(format!("Unary {}", op));
                self.indented(|r| r.render_expr(operand));
            }
            ExprKind::Call { callee, args } => {
                self.line(format!("Call {}", callee));
                self.indented(|r| {
                    for arg in args {
                        r.render_expr(arg);
                    }
                });
            }
            ExprKind::Grouped(inner) => {
                self.line("Group");
                self.indented(|r| r.render_expr(inner));
            }
        }
    }
}
