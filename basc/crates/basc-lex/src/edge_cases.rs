//! Edge case tests for basc-lex, covering boundary conditions that don't fit
//! naturally alongside a single lexing concern in `lexer/*.rs`.

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::token::{Literal, TokenKind};
    use crate::Lexer;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let lexer = Lexer::new(source, &handler);
        lexer.map(|t| t.kind).collect()
    }

    #[test]
    fn test_edge_empty_source() {
        assert_eq!(lex_all(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_edge_whitespace_only() {
        assert_eq!(lex_all("   \t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_edge_single_char_ident() {
        assert_eq!(lex_all("x"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(5000);
        let source = format!("{} = 1", name);
        assert_eq!(
            lex_all(&source),
            vec![TokenKind::Identifier, TokenKind::Equal, TokenKind::IntegerLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        assert_eq!(lex_all("sub if"), vec![TokenKind::Sub, TokenKind::If, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_keyword_matching_is_case_insensitive() {
        assert_eq!(lex_all("SUB"), vec![TokenKind::Sub, TokenKind::Eof]);
        assert_eq!(lex_all("Sub"), vec![TokenKind::Sub, TokenKind::Eof]);
        assert_eq!(lex_all("sUb"), vec![TokenKind::Sub, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_multiword_keyword_requires_same_line() {
        assert_eq!(
            lex_all("end\nif"),
            vec![TokenKind::End, TokenKind::Newline, TokenKind::If, TokenKind::Eof]
        );
    }

    #[test]
    fn test_edge_multiword_keyword_merges_across_inline_whitespace() {
        assert_eq!(lex_all("end    if"), vec![TokenKind::EndIf, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_sigil_on_keyword_like_prefix_is_still_identifier() {
        assert_eq!(lex_all("end%"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_hex_bounds() {
        assert_eq!(lex_all("&h0"), vec![TokenKind::IntegerLiteral, TokenKind::Eof]);
        assert_eq!(lex_all("&hFFFFFFFF"), vec![TokenKind::LongIntegerLiteral, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_integer_overflow_promotes_to_long() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("99999999999", &handler);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::LongIntegerLiteral);
        assert_eq!(tok.literal, Some(Literal::LongInteger(99999999999)));
    }

    #[test]
    fn test_edge_unterminated_string_at_eof_reports_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new(r#""unterminated"#, &handler);
        let _ = lexer.next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn test_edge_unterminated_string_at_eol_reports_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"unterminated\nnext line", &handler);
        let _ = lexer.next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn test_edge_unbalanced_end_if_reports_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("#end if\n", &handler);
        while lexer.next_token().kind != TokenKind::Eof {}
        assert!(handler.has_errors());
    }

    #[test]
    fn test_edge_deeply_nested_template_interpolation() {
        let source = "`${ { { {a: 1} } } }`";
        assert_eq!(lex_all(source), vec![TokenKind::TemplateString, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_invalid_character_reports_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("@", &handler);
        let _ = lexer.next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn test_edge_rem_mid_statement_is_identifier_not_comment() {
        assert_eq!(
            lex_all("m.rem"),
            vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Rem, TokenKind::Eof]
        );
    }

    #[test]
    fn test_edge_rem_at_statement_start_is_comment() {
        assert_eq!(lex_all("rem this is a comment"), vec![TokenKind::Comment, TokenKind::Eof]);
    }
}
