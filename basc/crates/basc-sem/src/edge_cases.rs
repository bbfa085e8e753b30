//! Edge case tests for the Structural/Scoped validator.

#[cfg(test)]
mod tests {
    use basc_util::diagnostic::DiagnosticCode;
    use basc_util::{Handler, Span, Symbol};

    use crate::validate::{validate_scoped, validate_structural, NoCaseCheck, PathCaseProvider};
    use crate::{validate, ProgramIndex};

    fn parse(src: &str) -> basc_par::Ast {
        let handler = Handler::new();
        basc_par::parse(src, &handler)
    }

    fn single_component(name: &str, sources: &[&str]) -> ProgramIndex {
        let mut index = ProgramIndex::new();
        let scripts = sources
            .iter()
            .enumerate()
            .map(|(i, src)| index.add_script(Symbol::intern(&format!("{name}_{i}.bs")), parse(src)))
            .collect();
        index.add_component(Symbol::intern(name), None, scripts, Span::DUMMY);
        index.link_components();
        index
    }

    fn codes(handler: &Handler) -> Vec<DiagnosticCode> {
        handler.diagnostics().iter().filter_map(|d| d.code).collect()
    }

    #[test]
    fn duplicate_class_member_is_structural() {
        let ast = parse("class Foo\npublic x as integer\npublic x as integer\nend class\n");
        let handler = Handler::new();
        validate_structural(&ast, "foo.bs", &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::DUPLICATE_CLASS_MEMBER));
    }

    #[test]
    fn constructor_super_call_must_be_first_statement() {
        let src = "class Dog extends Animal\nfunction new()\nprint \"hi\"\nsuper.new()\nend function\nend class\n";
        let ast = parse(src);
        let handler = Handler::new();
        validate_structural(&ast, "dog.bs", &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::SUPER_CALL_MUST_BE_FIRST_STATEMENT));
    }

    #[test]
    fn constructor_super_call_as_first_statement_is_clean() {
        let src = "class Dog extends Animal\nfunction new()\nsuper.new()\nprint \"hi\"\nend function\nend class\n";
        let ast = parse(src);
        let handler = Handler::new();
        validate_structural(&ast, "dog.bs", &handler);
        assert!(!handler.has_errors());
    }

    #[test]
    fn constructor_without_extends_does_not_require_super_call() {
        let src = "class Animal\nfunction new()\nprint \"hi\"\nend function\nend class\n";
        let ast = parse(src);
        let handler = Handler::new();
        validate_structural(&ast, "animal.bs", &handler);
        assert!(!handler.has_errors());
    }

    #[test]
    fn duplicate_function_implementation_across_files_in_same_component() {
        let index = single_component(
            "Comp",
            &["function helper()\nend function\n", "function helper()\nend function\n"],
        );
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::DUPLICATE_FUNCTION_IMPLEMENTATION));
    }

    #[test]
    fn duplicate_class_declaration_across_files_in_same_component() {
        let index = single_component("Comp", &["class Foo\nend class\n", "class Foo\nend class\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::DUPLICATE_CLASS_DECLARATION));
    }

    #[test]
    fn namespaced_class_collides_with_non_namespaced_leaf_name() {
        let index = single_component("Comp", &["class Utils.Shape\nend class\nclass Shape\nend class\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::NAMESPACED_CLASS_CANNOT_SHARE_NAME_WITH_NON_NAMESPACED_CLASS));
    }

    #[test]
    fn call_to_unknown_function_is_flagged() {
        let index = single_component("Comp", &["function main()\ngoAway()\nend function\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION));
    }

    #[test]
    fn call_to_known_function_with_right_arity_is_clean() {
        let index = single_component(
            "Comp",
            &["function main()\nhelper(1, 2)\nend function\nfunction helper(a, b)\nend function\n"],
        );
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(!handler.has_errors());
    }

    #[test]
    fn mismatched_argument_count_is_flagged() {
        let index = single_component(
            "Comp",
            &["function main()\nhelper(1, 2, 3)\nend function\nfunction helper(a, b)\nend function\n"],
        );
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::MISMATCHED_ARGUMENT_COUNT));
    }

    #[test]
    fn optional_parameters_widen_the_accepted_argument_range() {
        let index = single_component(
            "Comp",
            &["function main()\nhelper(1)\nend function\nfunction helper(a, b = 2)\nend function\n"],
        );
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(!handler.has_errors());
    }

    #[test]
    fn new_unknown_class_is_flagged() {
        let index = single_component("Comp", &["function main()\nx = new Ghost()\nend function\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::UNKNOWN_CLASS_REFERENCE));
    }

    #[test]
    fn override_with_no_ancestor_method_is_flagged() {
        let mut index = ProgramIndex::new();
        let parent = index.add_script(
            Symbol::intern("animal.bs"),
            parse("class Animal\nfunction new()\nend function\nend class\n"),
        );
        let child = index.add_script(
            Symbol::intern("dog.bs"),
            parse("class Dog extends Animal\noverride function speak()\nend function\nend class\n"),
        );
        let parent_id = index.add_component(Symbol::intern("Animal"), None, vec![parent], Span::DUMMY);
        let child_id =
            index.add_component(Symbol::intern("Dog"), Some(Symbol::intern("Animal")), vec![child], Span::DUMMY);
        let _ = (parent_id, child_id);
        index.link_components();

        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::METHOD_DOES_NOT_EXIST_ON_ANCESTOR));
    }

    #[test]
    fn missing_override_keyword_on_a_real_ancestor_method_is_flagged() {
        let mut index = ProgramIndex::new();
        let parent = index.add_script(
            Symbol::intern("animal.bs"),
            parse("class Animal\nfunction speak()\nend function\nend class\n"),
        );
        let child = index.add_script(
            Symbol::intern("dog.bs"),
            parse("class Dog extends Animal\nfunction speak()\nend function\nend class\n"),
        );
        index.add_component(Symbol::intern("Animal"), None, vec![parent], Span::DUMMY);
        index.add_component(Symbol::intern("Dog"), Some(Symbol::intern("Animal")), vec![child], Span::DUMMY);
        index.link_components();

        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::MISSING_OVERRIDE_KEYWORD));
    }

    #[test]
    fn field_redeclared_from_an_ancestor_class_is_flagged() {
        let mut index = ProgramIndex::new();
        let parent =
            index.add_script(Symbol::intern("animal.bs"), parse("class Animal\npublic name as string\nend class\n"));
        let child = index.add_script(
            Symbol::intern("dog.bs"),
            parse("class Dog extends Animal\npublic name as string\nend class\n"),
        );
        index.add_component(Symbol::intern("Animal"), None, vec![parent], Span::DUMMY);
        index.add_component(Symbol::intern("Dog"), Some(Symbol::intern("Animal")), vec![child], Span::DUMMY);
        index.link_components();

        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::FIELD_CANNOT_BE_OVERRIDDEN));
    }

    #[test]
    fn component_missing_extends_attribute_is_a_hint_not_an_error() {
        let index = single_component("Standalone", &["function main()\nend function\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::MISSING_EXTENDS_ATTRIBUTE));
        assert!(!handler.has_errors());
    }

    #[test]
    fn unused_import_is_flagged_when_script_never_references_a_foreign_name() {
        let index = single_component("Comp", &["import \"Utils.bs\"\nfunction main()\nend function\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::UNUSED_IMPORT));
    }

    #[test]
    fn import_is_not_flagged_when_script_calls_an_undeclared_name() {
        let index = single_component("Comp", &["import \"Utils.bs\"\nfunction main()\nhelper()\nend function\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &NoCaseCheck, &handler);
        assert!(!codes(&handler).contains(&DiagnosticCode::UNUSED_IMPORT));
    }

    struct StubProvider;
    impl PathCaseProvider for StubProvider {
        fn canonical_case(&self, logical_path: &str) -> Option<String> {
            Some(logical_path.to_ascii_lowercase())
        }
    }

    #[test]
    fn import_case_mismatch_is_a_warning() {
        let index = single_component("Comp", &["import \"Utils.bs\"\n"]);
        let handler = Handler::new();
        validate_scoped(&index, &StubProvider, &handler);
        assert!(codes(&handler).contains(&DiagnosticCode::SCRIPT_IMPORT_CASE_MISMATCH));
        assert!(!handler.has_errors());
    }

    #[test]
    fn validation_is_idempotent_as_a_diagnostic_multiset() {
        let index = single_component("Comp", &["function main()\ngoAway()\nend function\n"]);

        let first = Handler::new();
        validate(&index, &NoCaseCheck, &first);
        let second = Handler::new();
        validate(&index, &NoCaseCheck, &second);

        let mut first_codes = codes(&first);
        let mut second_codes = codes(&second);
        first_codes.sort_by_key(|c| c.as_str());
        second_codes.sort_by_key(|c| c.as_str());
        assert_eq!(first_codes, second_codes);
    }
}
