//! Edge case tests for the statement/expression grammar that don't fit
//! naturally alongside `expr.rs`'s precedence tests or `types.rs`'s
//! annotation tests.

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::ast::*;
    use crate::Parser;

    fn parse_source(source: &str) -> (Ast, Handler) {
        let handler = Handler::new();
        let mut parser = Parser::new(source, &handler);
        let ast = parser.parse_program();
        (ast, handler)
    }

    #[test]
    fn empty_source() {
        let (ast, handler) = parse_source("");
        assert!(ast.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn whitespace_and_blank_lines_only() {
        let (ast, handler) = parse_source("\n\n   \n\n");
        assert!(ast.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn single_function_declaration() {
        let (ast, handler) = parse_source("function main()\nend function\n");
        assert_eq!(ast.len(), 1);
        assert!(matches!(ast[0], Stmt::FunctionStatement(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn sub_with_no_params_and_empty_body() {
        let (ast, handler) = parse_source("sub doNothing()\nend sub\n");
        match &ast[0] {
            Stmt::FunctionStatement(s) => {
                assert!(s.decl.is_sub);
                assert!(s.decl.body.stmts.is_empty());
            }
            other => panic!("expected FunctionStatement, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn single_line_if_with_no_else() {
        let (ast, handler) = parse_source("if x > 0 then print x\n");
        match &ast[0] {
            Stmt::If(s) => {
                assert_eq!(s.then_branch.stmts.len(), 1);
                assert!(s.else_branch.is_none());
                assert!(s.else_ifs.is_empty());
            }
            other => panic!("expected If, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn multi_line_if_else_if_else_chain() {
        let src = "if a\nprint 1\nelse if b\nprint 2\nelse\nprint 3\nend if\n";
        let (ast, handler) = parse_source(src);
        match &ast[0] {
            Stmt::If(s) => {
                assert_eq!(s.else_ifs.len(), 1);
                assert!(s.else_branch.is_some());
            }
            other => panic!("expected If, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn for_loop_with_step() {
        let (ast, handler) = parse_source("for i = 0 to 10 step 2\nprint i\nend for\n");
        match &ast[0] {
            Stmt::For(s) => assert!(s.step.is_some()),
            other => panic!("expected For, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn for_loop_without_step_defaults_to_none() {
        let (ast, handler) = parse_source("for i = 0 to 10\nend for\n");
        match &ast[0] {
            Stmt::For(s) => assert!(s.step.is_none()),
            other => panic!("expected For, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn for_each_over_an_iterable() {
        let (ast, handler) = parse_source("for each item in items\nend for\n");
        assert!(matches!(ast[0], Stmt::ForEach(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn compound_assign_desugars_into_binary_value() {
        let (ast, handler) = parse_source("x += 1\n");
        match &ast[0] {
            Stmt::Assignment(s) => match &s.value {
                Expr::Binary(b) => assert_eq!(b.op, BinOp::Add),
                other => panic!("expected desugared Binary value, got {other:?}"),
            },
            other => panic!("expected Assignment, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn dotted_set_statement() {
        let (ast, handler) = parse_source("obj.field = 5\n");
        assert!(matches!(ast[0], Stmt::DottedSet(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn indexed_set_statement() {
        let (ast, handler) = parse_source("arr[0] = 5\n");
        assert!(matches!(ast[0], Stmt::IndexedSet(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn increment_and_decrement() {
        let (ast, handler) = parse_source("x++\ny--\n");
        assert!(matches!(ast[0], Stmt::Increment(_)));
        assert!(matches!(ast[1], Stmt::Increment(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn increment_on_call_result_is_diagnosed_but_recovers() {
        let (ast, handler) = parse_source("foo()++\n");
        assert!(matches!(ast[0], Stmt::Increment(_)));
        assert!(handler.has_errors());
    }

    #[test]
    fn class_with_extends_and_members() {
        let src = "class Dog extends Animal\npublic name as string\noverride function speak()\nend function\nend class\n";
        let (ast, handler) = parse_source(src);
        match &ast[0] {
            Stmt::ClassStatement(s) => {
                assert!(s.extends.is_some());
                assert_eq!(s.members.len(), 2);
                assert!(matches!(s.members[1], Stmt::ClassMethod(_)));
            }
            other => panic!("expected ClassStatement, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn constructor_cannot_be_override() {
        let src = "class Foo\noverride function new()\nend function\nend class\n";
        let (_ast, handler) = parse_source(src);
        assert!(handler.has_errors());
    }

    #[test]
    fn library_statement_at_top_of_file_is_legal() {
        let (ast, handler) = parse_source("library \"v30/bslCore.brs\"\nprint 1\n");
        assert!(matches!(ast[0], Stmt::Library(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn library_statement_after_other_code_is_diagnosed() {
        let (_ast, handler) = parse_source("print 1\nlibrary \"v30/bslCore.brs\"\n");
        assert!(handler.has_errors());
    }

    #[test]
    fn empty_library_path_is_diagnosed() {
        let (ast, handler) = parse_source("library \"\"\n");
        assert!(matches!(ast[0], Stmt::Library(_)));
        assert!(handler.has_errors());
    }

    #[test]
    fn goto_and_label() {
        let (ast, handler) = parse_source("top:\ngoto top\n");
        assert!(matches!(ast[0], Stmt::Label(_)));
        assert!(matches!(ast[1], Stmt::Goto(_)));
        assert!(!handler.has_errors());
    }

    #[test]
    fn a_malformed_statement_recovers_at_the_next_line() {
        let (ast, handler) = parse_source("x = +\nprint \"ok\"\n");
        assert!(handler.has_errors());
        assert!(ast.iter().any(|s| matches!(s, Stmt::Print(_))));
    }

    #[test]
    fn namespaced_class_name_joins_dotted_segments_into_one_symbol() {
        let (ast, handler) = parse_source("class Utils.Shapes.Rect extends Utils.Shape\nend class\n");
        match &ast[0] {
            Stmt::ClassStatement(s) => {
                assert_eq!(s.name.as_str(), "Utils.Shapes.Rect");
                assert_eq!(s.extends.map(|e| e.as_str()), Some("Utils.Shape"));
            }
            other => panic!("expected ClassStatement, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn new_expr_accepts_a_namespaced_class_name() {
        let (ast, handler) = parse_source("x = new Utils.Shapes.Rect(1, 2)\n");
        match &ast[0] {
            Stmt::Assignment(s) => match &s.value {
                Expr::New(n) => assert_eq!(n.class_name.as_str(), "Utils.Shapes.Rect"),
                other => panic!("expected New, got {other:?}"),
            },
            other => panic!("expected Assignment, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn print_with_multiple_comma_separated_arguments() {
        let (ast, handler) = parse_source("print 1, 2, 3\n");
        match &ast[0] {
            Stmt::Print(s) => assert_eq!(s.args.len(), 3),
            other => panic!("expected Print, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }
}
