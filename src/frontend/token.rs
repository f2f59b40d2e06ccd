//! Token types produced by the lexer.

use crate::utils::location::Span;
use std::fmt;

/// A classified piece of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source span
    pub span: Span,
    /// The exact source text the token was derived from
    pub lexeme: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, lexeme: String) -> Self {
        Self { kind, span, lexeme }
    }

    /// Check if this is the end-of-input marker.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Line the token starts on.
    pub fn line(&self) -> usize {
        self.span.start_line
    }

    /// Column the token starts at.
    pub fn column(&self) -> usize {
        self.span.start_column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.lexeme)
    }
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    IntLiteral,
    /// Floating-point literal
    DoubleLiteral,
    /// String literal delimited by `"`
    StringLiteral,
    /// Character literal delimited by `'`
    CharLiteral,

    /// Identifier
    Identifier,

    // Type keywords
    /// `int`
    Int,
    /// `double`
    Double,
    /// `bool`
    Bool,
    /// `char`
    CharType,
    /// `string`
    StringType,
    /// `void`
    Void,
    /// `var`
    Var,

    // Control and declaration keywords
    /// `class`
    Class,
    /// `if`
    If,
    /// `else`
    Else,
    /// `for`
    For,
    /// `while`
    While,
    /// `return`
    Return,
    /// `true`
    True,
    /// `false`
    False,
    /// `new`
    New,
    /// `const`
    Const,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `switch`
    Switch,
    /// `case`
    Case,
    /// `default`
    Default,
    /// `null`
    Null,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=`
    Equal,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    // Special
    /// Character that starts no token
    Invalid,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if this kind is a reserved word.
    pub fn is_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Int | Double
                | Bool
                | CharType
                | StringType
                | Void
                | Var
                | Class
                | If
                | Else
                | For
                | While
                | Return
                | True
                | False
                | New
                | Const
                | Break
                | Continue
                | Switch
                | Case
                | Default
                | Null
        )
    }

    /// Check if this kind names a value type (`int`, `double`, ...).
    pub fn is_type_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(self, Int | Double | Bool | CharType | StringType)
    }

    /// Check if this kind is an operator.
    pub fn is_operator(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Plus | Minus
                | Star
                | Slash
                | Percent
                | EqualEqual
                | BangEqual
                | Less
                | LessEqual
                | Greater
                | GreaterEqual
                | Equal
                | AmpAmp
                | PipePipe
                | Bang
                | PlusPlus
                | MinusMinus
        )
    }

    /// Check if this kind is punctuation.
    pub fn is_punctuation(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            LeftParen
                | RightParen
                | LeftBrace
                | RightBrace
                | Comma
                | Semicolon
                | Dot
        )
    }

    /// Map a completed identifier to its keyword kind, if reserved.
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "int" => Some(TokenKind::Int),
            "double" => Some(TokenKind::Double),
            "bool" => Some(TokenKind::Bool),
            "char" => Some(TokenKind::CharType),
            "string" => Some(TokenKind::StringType),
            "void" => Some(TokenKind::Void),
            "var" => Some(TokenKind::Var),
            "class" => Some(TokenKind::Class),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "for" => Some(TokenKind::For),
            "while" => Some(TokenKind::While),
            "return" => Some(TokenKind::Return),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "new" => Some(TokenKind::New),
            "const" => Some(TokenKind::Const),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            "switch" => Some(TokenKind::Switch),
            "case" => Some(TokenKind::Case),
            "default" => Some(TokenKind::Default),
            "null" => Some(TokenKind::Null),
            _ => None,
        }
    }

    /// Coarse class used by the boundary token report.
    pub fn category(&self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "int_literal",
            DoubleLiteral => "double_literal",
            StringLiteral => "string_literal",
            CharLiteral => "char_literal",
            Identifier => "identifier",
            Invalid => "invalid",
            Eof => "eof",
            k if k.is_keyword() => "keyword",
            k if k.is_operator() => "operator",
            _ => "punctuation",
        }
    }

    /// Human-readable name for messages.
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            DoubleLiteral => "double literal",
            StringLiteral => "string literal",
            CharLiteral => "char literal",
            Identifier => "identifier",
            Int => "int",
            Double => "double",
            Bool => "bool",
            CharType => "char",
            StringType => "string",
            Void => "void",
            Var => "var",
            Class => "class",
            If => "if",
            Else => "else",
            For => "for",
            While => "while",
            Return => "return",
            True => "true",
            False => "false",
            New => "new",
            Const => "const",
            Break => "break",
            Continue => "continue",
            Switch => "switch",
            Case => "case",
            Default => "default",
            Null => "null",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            EqualEqual => "==",
            BangEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Equal => "=",
            AmpAmp => "&&",
            PipePipe => "||",
            Bang => "!",
            PlusPlus => "++",
            MinusMinus => "--",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            Comma => ",",
            Semicolon => ";",
            Dot => ".",
            Invalid => "invalid character",
            Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
