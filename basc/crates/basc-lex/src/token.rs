//! Token representation produced by the lexer.

use basc_util::{Span, Symbol};

/// A literal value attached to a token, already parsed to its native form.
///
/// The lexer parses numeric and string literals eagerly so the parser never
/// has to re-scan token text.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i32),
    LongInteger(i64),
    Float(f32),
    Double(f64),
    Str(Symbol),
}

/// The kind of a token, independent of its source text.
///
/// `#const`/`#if`/`#else if`/`#else`/`#end if`/`#error` conditional-compilation
/// directives are handled entirely inside the lexer and never reach the
/// parser as tokens of their own kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // ---- Literals and identifiers ----
    Identifier,
    IntegerLiteral,
    LongIntegerLiteral,
    FloatLiteral,
    DoubleLiteral,
    StringLiteral,
    /// Raw, un-split template-string text (including any `${...}` spans);
    /// the parser re-invokes the lexer/parser over each interpolated span.
    TemplateString,
    /// A `'`- or `rem`-led line comment, text included, up to but excluding
    /// the newline. Comments are real tokens here (section 4.1), not trivia.
    Comment,

    // ---- Reserved keywords (single-word) ----
    Sub,
    Function,
    End,
    If,
    Then,
    Else,
    For,
    Each,
    While,
    Exit,
    Return,
    Goto,
    Print,
    Stop,
    Dim,
    Class,
    Extends,
    Override,
    New,
    Library,
    Import,
    Rem,
    As,
    In,
    To,
    Step,
    True,
    False,
    And,
    Or,
    Not,
    Mod,

    // ---- Merged multi-word keywords (section 4.1) ----
    EndIf,
    EndFor,
    EndWhile,
    EndSub,
    EndFunction,
    EndClass,
    ElseIf,
    ForEach,
    ExitFor,
    ExitWhile,

    // ---- Built-in type names ----
    TypeInteger,
    TypeLongInteger,
    TypeFloat,
    TypeDouble,
    TypeString,
    TypeBoolean,
    TypeObject,
    TypeDynamic,
    TypeVoid,

    // ---- Punctuation ----
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Newline,

    // ---- Operators ----
    Plus,
    Minus,
    Star,
    Slash,
    Backslash,
    Caret,
    Ampersand,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    AmpersandEqual,
    PlusPlus,
    MinusMinus,

    Eof,
    /// A character or sequence the lexer could not classify; carries no
    /// further structure, recovery continues from the next character.
    Invalid,
}

impl TokenKind {
    /// True for every keyword the parser may need to reject as an identifier
    /// (section 4.3's `disallowedIdentifiers`/reserved-word rules look at this).
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Sub | Function
                | End
                | If
                | Then
                | Else
                | For
                | Each
                | While
                | Exit
                | Return
                | Goto
                | Print
                | Stop
                | Dim
                | Class
                | Extends
                | Override
                | New
                | Library
                | Import
                | Rem
                | As
                | In
                | To
                | Step
                | True
                | False
                | And
                | Or
                | Not
                | Mod
                | EndIf
                | EndFor
                | EndWhile
                | EndSub
                | EndFunction
                | EndClass
                | ElseIf
                | ForEach
                | ExitFor
                | ExitWhile
                | TypeInteger
                | TypeLongInteger
                | TypeFloat
                | TypeDouble
                | TypeString
                | TypeBoolean
                | TypeObject
                | TypeDynamic
                | TypeVoid
        )
    }

    /// Keywords that are only reserved in specific grammatical positions
    /// (`then`, `as`, `in`, `to`, `step`, `extends`, `override`, `new`,
    /// `library`, `import`) and may otherwise be used as ordinary identifiers.
    pub fn is_contextual_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Then
                | TokenKind::As
                | TokenKind::In
                | TokenKind::To
                | TokenKind::Step
                | TokenKind::Extends
                | TokenKind::Override
                | TokenKind::New
                | TokenKind::Library
                | TokenKind::Import
        )
    }

    /// True for the statement terminators the parser's statement loop
    /// synchronizes on (section 4.2).
    pub fn is_terminator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Colon | TokenKind::Eof)
    }
}

/// A single lexical token.
///
/// `isReserved` mirrors the external `Token` shape's flag distinguishing a
/// reserved word from a same-spelled identifier that the parser happens to
/// accept in a permissive position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Symbol,
    pub span: Span,
    pub literal: Option<Literal>,
    pub is_reserved: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: Symbol, span: Span) -> Self {
        Self {
            kind,
            text,
            span,
            literal: None,
            is_reserved: kind.is_keyword(),
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: Symbol::intern(""),
            span,
            literal: None,
            is_reserved: false,
        }
    }
}
