//! Identifier, keyword, type-sigil, and multi-word-keyword lexing.
//!
//! BASIC keywords are case-insensitive; identifiers preserve whatever casing
//! the source used. A handful of statement keywords merge with a following
//! word on the same line into one token (section 4.1): `end if`, `end for`,
//! `end while`, `end sub`, `end function`, `end class`, `else if`, `for each`,
//! `exit for`, `exit while`.

use basc_util::Symbol;

use super::core::Lexer;
use crate::token::{Token, TokenKind};
use crate::unicode::{is_ascii_ident_continue, is_ident_continue};

impl<'a> Lexer<'a> {
    /// Lexes an identifier, a reserved keyword, or a merged multi-word
    /// keyword, folding a trailing type-designator sigil (`$ % ! # &`) into
    /// the identifier's text when present.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char())
            || is_ident_continue(self.cursor.current_char())
        {
            self.cursor.advance();
        }

        let word = self.cursor.slice_from(self.token_start);
        let lower = word.to_ascii_lowercase();

        if let Some(kind) = single_word_keyword(&lower) {
            if let Some(merged) = self.try_merge_keyword(kind) {
                return merged;
            }
            return self.make_token(kind, word);
        }

        // Type designator sigil directly following an identifier, e.g. `count%`.
        if matches!(self.cursor.current_char(), '$' | '%' | '!' | '#' | '&') {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        Token::new(TokenKind::Identifier, Symbol::intern(text), self.current_span())
    }

    /// After reading a keyword that can start a merged multi-word form,
    /// looks ahead (skipping only inline whitespace, never crossing a
    /// newline) for the matching second word and folds it into one token.
    fn try_merge_keyword(&mut self, first: TokenKind) -> Option<Token> {
        let second_options: &[(&str, TokenKind)] = match first {
            TokenKind::End => &[
                ("if", TokenKind::EndIf),
                ("for", TokenKind::EndFor),
                ("while", TokenKind::EndWhile),
                ("sub", TokenKind::EndSub),
                ("function", TokenKind::EndFunction),
                ("class", TokenKind::EndClass),
            ],
            TokenKind::Else => &[("if", TokenKind::ElseIf)],
            TokenKind::For => &[("each", TokenKind::ForEach)],
            TokenKind::Exit => &[("for", TokenKind::ExitFor), ("while", TokenKind::ExitWhile)],
            _ => return None,
        };

        let snapshot = self.cursor.snapshot();
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
        let word_start = self.cursor.position();
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let second_word = self.cursor.slice_from(word_start).to_ascii_lowercase();

        for (expected, merged_kind) in second_options {
            if second_word == *expected {
                let text = self.cursor.slice_from(self.token_start);
                return Some(self.make_token(*merged_kind, text));
            }
        }

        self.cursor.restore(snapshot);
        None
    }
}

/// Maps a lower-cased word to its single-word keyword `TokenKind`, or `None`
/// if it is an ordinary identifier.
fn single_word_keyword(lower: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match lower {
        "sub" => Sub,
        "function" => Function,
        "end" => End,
        "if" => If,
        "then" => Then,
        "else" => Else,
        "for" => For,
        "each" => Each,
        "while" => While,
        "exit" => Exit,
        "return" => Return,
        "goto" => Goto,
        "print" => Print,
        "stop" => Stop,
        "dim" => Dim,
        "class" => Class,
        "extends" => Extends,
        "override" => Override,
        "new" => New,
        "library" => Library,
        "import" => Import,
        "rem" => Rem,
        "as" => As,
        "in" => In,
        "to" => To,
        "step" => Step,
        "true" => True,
        "false" => False,
        "invalid" => Invalid,
        "and" => And,
        "or" => Or,
        "not" => Not,
        "mod" => Mod,
        "integer" => TypeInteger,
        "longinteger" => TypeLongInteger,
        "float" => TypeFloat,
        "double" => TypeDouble,
        "string" => TypeString,
        "boolean" => TypeBoolean,
        "object" => TypeObject,
        "dynamic" => TypeDynamic,
        "void" => TypeVoid,
        _ => return None,
    })
}
