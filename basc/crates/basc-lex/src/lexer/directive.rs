//! Conditional-compilation directive handling: `#const`, `#if`/`#else if`/
//! `#else`/`#end if`, and `#error` (section 4.1).
//!
//! Directives are resolved entirely inside the lexer: the parser never sees
//! a `#`-token, only whichever branch's tokens were active.

use basc_util::diagnostic::DiagnosticCode;
use basc_util::{DiagnosticBuilder, Symbol};

use super::core::Lexer;

/// One level of `#if`/`#else if`/`#else` nesting.
pub struct CcFrame {
    /// Whether this frame's branch is currently emitting tokens. A frame
    /// nested inside an inactive outer frame is always inactive regardless
    /// of its own condition.
    pub active: bool,
    /// Whether any branch at this nesting level has already been taken, so
    /// a later `#else if`/`#else` knows to stay inactive even if its own
    /// condition would otherwise hold.
    pub any_taken: bool,
}

impl<'a> Lexer<'a> {
    /// Attempts to parse and apply a `#`-directive at the cursor. Returns
    /// `true` if a directive was consumed (the caller should re-enter the
    /// whitespace/comment/directive skip loop), `false` if `#` did not start
    /// a recognised directive (treated as an ordinary token instead).
    pub(crate) fn handle_directive(&mut self) -> bool {
        let snapshot = self.cursor.snapshot();
        self.cursor.advance(); // consume '#'
        self.skip_directive_whitespace();

        let name = self.read_bareword();
        match name.as_str() {
            "const" => {
                self.handle_hash_const();
                true
            }
            "if" => {
                self.handle_hash_if();
                true
            }
            "else" => {
                self.skip_directive_whitespace();
                let save = self.cursor.snapshot();
                let second = self.read_bareword();
                if second == "if" {
                    self.handle_hash_else_if();
                } else {
                    self.cursor.restore(save);
                    self.handle_hash_else();
                }
                true
            }
            "end" => {
                self.skip_directive_whitespace();
                let second = self.read_bareword();
                if second == "if" {
                    self.handle_hash_end_if();
                } else {
                    self.cursor.restore(snapshot);
                    return false;
                }
                true
            }
            "error" => {
                self.handle_hash_error();
                true
            }
            _ => {
                self.cursor.restore(snapshot);
                false
            }
        }
    }

    fn skip_directive_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
    }

    fn read_bareword(&mut self) -> String {
        let start = self.cursor.position();
        while crate::unicode::is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.cursor.slice_from(start).to_ascii_lowercase()
    }

    fn skip_to_eol(&mut self) -> &'a str {
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        self.cursor.slice_from(start)
    }

    /// `#const NAME = true|false|OTHER_NAME`
    fn handle_hash_const(&mut self) {
        self.skip_directive_whitespace();
        let name = Symbol::intern(self.read_bareword().as_str());
        self.skip_directive_whitespace();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
        }
        self.skip_directive_whitespace();
        let value = self.eval_hash_const_value();
        self.consts.insert(name, value);
        self.skip_to_eol();
    }

    /// Resolves the right-hand side of a `#const` or the condition of a
    /// `#if`/`#else if` to a boolean, reporting `INVALID_HASH_CONST_VALUE`
    /// or `UNKNOWN_HASH_CONST_NAME` for anything else.
    fn eval_hash_const_value(&mut self) -> bool {
        let negate = if self.cursor.current_char() == 'n' || self.cursor.current_char() == 'N' {
            let save = self.cursor.snapshot();
            let word = self.read_bareword();
            if word == "not" {
                self.skip_directive_whitespace();
                true
            } else {
                self.cursor.restore(save);
                false
            }
        } else {
            false
        };

        let word = self.read_bareword();
        let value = match word.as_str() {
            "true" => true,
            "false" => false,
            "" => {
                self.report_error(
                    "expected a value after '='".to_string(),
                    DiagnosticCode::INVALID_HASH_CONST_VALUE,
                );
                false
            }
            other => {
                let sym = Symbol::intern(other);
                match self.consts.get(&sym) {
                    Some(v) => *v,
                    None => {
                        self.report_error(
                            format!("unknown conditional-compilation constant '{other}'"),
                            DiagnosticCode::UNKNOWN_HASH_CONST_NAME,
                        );
                        false
                    }
                }
            }
        };
        if negate {
            !value
        } else {
            value
        }
    }

    fn handle_hash_if(&mut self) {
        let condition = self.eval_hash_const_value();
        self.skip_to_eol();
        let parent_active = self.active_branch();
        self.cc_stack.push(CcFrame {
            active: parent_active && condition,
            any_taken: condition,
        });
    }

    fn handle_hash_else_if(&mut self) {
        let condition = self.eval_hash_const_value();
        self.skip_to_eol();
        let parent_active = self.cc_stack.len() < 2 || self.cc_stack[..self.cc_stack.len() - 1]
            .iter()
            .all(|f| f.active);
        if let Some(frame) = self.cc_stack.last_mut() {
            let take = !frame.any_taken && condition;
            frame.active = parent_active && take;
            frame.any_taken |= take;
        } else {
            self.report_error(
                "'#else if' with no matching '#if'".to_string(),
                DiagnosticCode::UNBALANCED_CONDITIONAL_COMPILATION,
            );
        }
    }

    fn handle_hash_else(&mut self) {
        self.skip_to_eol();
        let parent_active = self.cc_stack.len() < 2 || self.cc_stack[..self.cc_stack.len() - 1]
            .iter()
            .all(|f| f.active);
        if let Some(frame) = self.cc_stack.last_mut() {
            let take = !frame.any_taken;
            frame.active = parent_active && take;
            frame.any_taken = true;
        } else {
            self.report_error(
                "'#else' with no matching '#if'".to_string(),
                DiagnosticCode::UNBALANCED_CONDITIONAL_COMPILATION,
            );
        }
    }

    fn handle_hash_end_if(&mut self) {
        self.skip_to_eol();
        if self.cc_stack.pop().is_none() {
            self.report_error(
                "'#end if' with no matching '#if'".to_string(),
                DiagnosticCode::UNBALANCED_CONDITIONAL_COMPILATION,
            );
        }
    }

    fn handle_hash_error(&mut self) {
        let message = self.skip_to_eol().trim().to_string();
        if self.active_branch() {
            self.report_error(
                format!("#error: {message}"),
                DiagnosticCode::HASH_ERROR_DIRECTIVE,
            );
        }
    }

    /// While inside an inactive branch, skip whole lines without lexing
    /// their contents, stopping at the next directive line so nested
    /// `#if`/`#else if`/`#else`/`#end if` are still recognised.
    pub(crate) fn skip_inactive_line(&mut self) {
        self.skip_directive_whitespace();
        if self.cursor.current_char() == '#' {
            return;
        }
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '\n' {
            self.cursor.advance();
        }
    }
}
