//! Token types for the taskforge DSL.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Describes the token for "found ..." diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Int(n) => format!("integer `{n}`"),
            TokenKind::Float(n) => format!("float `{n}`"),
            TokenKind::String(s) => format!("string {s:?}"),
            TokenKind::Error(msg) => format!("invalid token ({msg})"),
            other => other.name().to_string(),
        }
    }
}

/// Token types for the taskforge DSL.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // Punctuation and operators
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `->`
    Arrow,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
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
    /// `!`
    Bang,

    // Keywords
    /// `entity_type`
    EntityType,
    /// `fn`
    Fn,
    /// `graph`
    Graph,
    /// `var`
    Var,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `in`
    In,
    /// `return`
    Return,
    /// `and`
    And,
    /// `or`
    Or,
    /// `true`
    True,
    /// `false`
    False,

    // Literals
    /// Identifier like `goblin`
    Ident(String),
    /// Integer literal like `42`
    Int(i64),
    /// Float literal like `3.5` or `1e-3`
    Float(f64),
    /// String literal like `"hello"`
    String(String),

    // Meta
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns the keyword for an identifier-like word, if it is one.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        Some(match word {
            "entity_type" => Self::EntityType,
            "fn" => Self::Fn,
            "graph" => Self::Graph,
            "var" => Self::Var,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "for" => Self::For,
            "in" => Self::In,
            "return" => Self::Return,
            "and" => Self::And,
            "or" => Self::Or,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        })
    }

    /// Returns true if this token can begin a top-level definition.
    #[must_use]
    pub const fn starts_definition(&self) -> bool {
        matches!(self, Self::EntityType | Self::Fn | Self::Graph)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Dot => "'.'",
            Self::Arrow => "'->'",
            Self::Assign => "'='",
            Self::EqEq => "'=='",
            Self::NotEq => "'!='",
            Self::Less => "'<'",
            Self::LessEq => "'<='",
            Self::Greater => "'>'",
            Self::GreaterEq => "'>='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Bang => "'!'",
            Self::EntityType => "'entity_type'",
            Self::Fn => "'fn'",
            Self::Graph => "'graph'",
            Self::Var => "'var'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::For => "'for'",
            Self::In => "'in'",
            Self::Return => "'return'",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Ident(_) => "identifier",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Eof => "end of input",
            Self::Error(_) => "invalid token",
        }
    }
}
