//! Abstract syntax tree for the analyzed language.
//!
//! Closed sum types, built bottom-up by the parser and read-only
//! afterwards. Every node owns its children and carries a span; matches
//! over `StmtKind`/`ExprKind` are exhaustive at each traversal site.

use crate::utils::location::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete parsed program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Top-level items in source order
    pub items: Vec<Item>,
    /// Source span
    pub span: Span,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { items: Vec::new(), span: Span::dummy() }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// A top-level item. The language allows statements, procedures, and
/// class declarations at file level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Item {
    /// A class declaration
    Class(ClassDecl),
    /// A method or void procedure
    Method(MethodDecl),
    /// Any other statement
    Stmt(Stmt),
}

/// A class declaration with fields and methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// Members in source order; empty bodies are valid
    pub members: Vec<Member>,
    /// Source span
    pub span: Span,
}

/// A class member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Member {
    /// A typed field
    Field(FieldDecl),
    /// A method
    Method(MethodDecl),
}

/// A field declaration inside a class body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Declared type
    pub ty: Type,
    /// Field name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// A method or procedure declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Return type; `void` for procedures
    pub return_type: Type,
    /// Method name
    pub name: String,
    /// Parameters in source order
    pub params: Vec<Param>,
    /// Body; required even when empty
    pub body: Block,
    /// Source span
    pub span: Span,
}

/// A method parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    /// Declared type
    pub ty: Type,
    /// Parameter name
    pub name: String,
    /// Source span
    pub span: Span,
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Statements in source order
    pub statements: Vec<Stmt>,
    /// Source span
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    /// The kind of statement
    pub kind: StmtKind,
    /// Source span
    pub span: Span,
}

/// The kind of a statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StmtKind {
    /// `int x;` or `double y = 1.5;` or `var z = expr;`
    VarDecl {
        /// Declared type; `Inferred` for `var`
        ty: Type,
        /// Variable name
        name: String,
        /// Optional initializer
        init: Option<Expr>,
    },

    /// `x = expr;`
    Assignment {
        /// Target variable name
        target: String,
        /// Span of the target identifier alone
        target_span: Span,
        /// Assigned value
        value: Expr,
    },

    /// `if (cond) { } else { }`
    If {
        /// Condition expression
        condition: Expr,
        /// Then branch
        then_block: Block,
        /// Optional else branch
        else_block: Option<Block>,
    },

    /// `for (init; cond; step) { }`
    For {
        /// Header initializer assignment
        init: Box<Stmt>,
        /// Header condition, a general expression
        condition: Expr,
        /// Header step assignment
        step: Box<Stmt>,
        /// Loop body
        body: Block,
    },

    /// `while (cond) { }`
    While {
        /// Condition expression
        condition: Expr,
        /// Loop body
        body: Block,
    },

    /// `Console.WriteLine(x);` or `Procesar();`
    Call {
        /// Callee name, possibly dotted
        callee: String,
        /// Call arguments
        args: Vec<Expr>,
    },

    /// `return;` or `return expr;`
    Return {
        /// Optional returned value
        value: Option<Expr>,
    },

    /// `{ stmts }`
    Block(Block),
}

/// An expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    /// The kind of expression
    pub kind: ExprKind,
    /// Source span
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of an expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    /// Integer literal
    IntLiteral(i64),
    /// Double literal
    DoubleLiteral(f64),
    /// Boolean literal
    BoolLiteral(bool),
    /// String literal, quotes stripped
    StringLiteral(String),
    /// Character literal, quotes stripped
    CharLiteral(String),

    /// Variable reference
    Identifier(String),

    /// `left op right`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// `-x` or `!x`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// `Console.ReadLine()` or `Sumar(a, b)` in expression position
    Call {
        /// Callee name, possibly dotted
        callee: String,
        /// Call arguments
        args: Vec<Expr>,
    },

    /// Parenthesized expression
    Grouped(Box<Expr>),
}

/// Binary operators, loosest-binding first in the parser's ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

impl BinaryOp {
    /// Check if this operator compares its operands.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Check if this operator is arithmetic.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    /// Check if this operator is logical.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        write!(f, "{}", s)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// A type in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// `int`
    Int,
    /// `double`
    Double,
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `string`
    Str,
    /// `void`, methods only
    Void,
    /// A class name (class symbols in the listing)
    Class,
    /// `var` declaration awaiting its initializer's type
    Inferred,
    /// Not determinable (undeclared references, console reads)
    Unknown,
}

impl Type {
    /// Check if this is `int` or `double`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Double)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Type::Int => "int",
            Type::Double => "double",
            Type::Bool => "bool",
            Type::Char => "char",
            Type::Str => "string",
            Type::Void => "void",
            Type::Class => "class",
            Type::Inferred => "var",
            Type::Unknown => "?",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Str.to_string(), "string");
        assert_eq!(Type::Unknown.to_string(), "?");
    }

    #[test]
    fn test_op_predicates() {
        assert!(BinaryOp::Eq.is_comparison());
        assert!(BinaryOp::Add.is_arithmetic());
        assert!(BinaryOp::And.is_logical());
        assert!(!BinaryOp::Add.is_comparison());
    }
}
