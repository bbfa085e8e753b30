//! Diagnostic codes for categorizing lexical, syntactic, and semantic errors.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages. Codes are stable across releases: the registry below is
//! the sole source of truth for the mapping from a diagnostic name to its
//! numeric code, and removing a code here is a breaking change.
//!
//! # Examples
//!
//! ```
//! use basc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E1020");
//! ```

/// A unique code identifying a diagnostic message
///
/// Codes follow the format `{prefix}{number}` where `prefix` is `"E"` for
/// error-severity diagnostics and `"W"` for warning/hint/info-severity ones,
/// and `number` is a stable 4-digit identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix ("E" for error-class, "W" for everything else)
    pub prefix: &'static str,
    /// The stable numeric identifier
    pub number: u16,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u16) -> Self {
        Self { prefix, number }
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    #[inline]
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// Full code string, e.g. `"E1020"`.
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXICAL (1000-1099)
    // =========================================================================

    /// Unexpected character encountered outside any known token form.
    pub const UNEXPECTED_CHARACTER: Self = Self::new("E", 1001);
    /// Double-quoted string never closed before end of line.
    pub const UNTERMINATED_STRING_AT_EOL: Self = Self::new("E", 1002);
    /// Double-quoted string never closed before end of file.
    pub const UNTERMINATED_STRING_AT_EOF: Self = Self::new("E", 1003);
    /// Template string (backtick) never closed.
    pub const UNTERMINATED_TEMPLATE_STRING: Self = Self::new("E", 1004);
    /// A numeric literal's digits could not be parsed for its selected base/kind.
    pub const MALFORMED_NUMERIC_LITERAL: Self = Self::new("E", 1005);
    /// `#const` right-hand side was not `true`, `false`, or a known `#const` name.
    pub const INVALID_HASH_CONST_VALUE: Self = Self::new("E", 1006);
    /// `#if`/`#const` referenced a name with no matching `#const` declaration.
    pub const UNKNOWN_HASH_CONST_NAME: Self = Self::new("E", 1007);
    /// `#error` directive reached while its branch is active.
    pub const HASH_ERROR_DIRECTIVE: Self = Self::new("E", 1008);
    /// A conditional-compilation directive (`#if`/`#else if`/`#end if`) with no matching opener/closer.
    pub const UNBALANCED_CONDITIONAL_COMPILATION: Self = Self::new("E", 1009);

    // =========================================================================
    // SYNTACTIC (1010-1099, 2000-2099)
    // =========================================================================

    /// Generic unexpected-token diagnostic used by the recursive-descent parser.
    pub const UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
    /// A specific token kind was required but a different one was found.
    pub const EXPECTED_TOKEN: Self = Self::new("E", 2002);
    /// Input ended while a construct was still open.
    pub const UNEXPECTED_EOF: Self = Self::new("E", 2003);
    /// `if`/`for`/`while`/`sub`/`function`/`class` opened but never closed.
    pub const MISSING_TERMINATOR: Self = Self::new("E", 2004);
    /// `end` keyword did not match the construct it is meant to close, e.g. `function ... end sub`.
    pub const MISMATCHED_END_KEYWORD: Self = Self::new("E", 2005);
    /// Single-line `if` reached `end if` without the separating `:`.
    pub const SINGLE_LINE_IF_MISSING_COLON: Self = Self::new("E", 2006);
    /// More than `MAX_ARGS` (255) arguments/parameters supplied.
    pub const TOO_MANY_CALLABLE_PARAMETERS: Self = Self::new("E", 2007);
    /// A required parameter followed an optional (default-valued) one.
    pub const REQUIRED_PARAM_AFTER_OPTIONAL: Self = Self::new("E", 2008);
    /// Parameter or return type annotation was not a recognised type name.
    pub const INVALID_TYPE_ANNOTATION: Self = Self::new("E", 2009);
    /// `++`/`--` applied directly to the result of a call expression.
    pub const INCREMENT_ON_CALL_RESULT: Self = Self::new("E", 2010);
    /// `++`/`--` immediately followed by another `++`/`--` with no statement between.
    pub const CONSECUTIVE_INCREMENT_DECREMENT: Self = Self::new("E", 2011);
    /// `library` statement's argument string was empty.
    pub const EMPTY_LIBRARY_STRING: Self = Self::new("E", 2012);
    /// `library`/`import` appeared after a non-comment statement.
    pub const IMPORT_STATEMENT_NOT_AT_TOP_OF_FILE: Self = Self::new("E", 2013);
    /// A reserved word was used where an identifier was expected.
    pub const RESERVED_WORD_AS_IDENTIFIER_SYNTAX: Self = Self::new("E", 2014);
    /// Associative-array brace-literal key was not an identifier, allowed reserved word, or string.
    pub const INVALID_AA_LITERAL_KEY: Self = Self::new("E", 2015);

    // =========================================================================
    // SEMANTIC — SCOPE & SYMBOL (1020-1099)
    // =========================================================================

    /// A call target name was not found in any scope containing the file.
    pub const CALL_TO_UNKNOWN_FUNCTION: Self = Self::new("E", 1020);
    /// Two files in the same component scope both implement a function of the same name.
    pub const DUPLICATE_FUNCTION_IMPLEMENTATION: Self = Self::new("E", 1021);
    /// A child scope redefines a function already defined in an ancestor scope.
    pub const OVERRIDES_ANCESTOR_FUNCTION: Self = Self::new("W", 1022);
    /// A class with the same name is declared in two scripts of the same scope.
    pub const DUPLICATE_CLASS_DECLARATION: Self = Self::new("E", 1023);
    /// A namespaced class and a non-namespaced class share the same leaf name.
    pub const NAMESPACED_CLASS_CANNOT_SHARE_NAME_WITH_NON_NAMESPACED_CLASS: Self = Self::new("E", 1024);
    /// `new` referenced a class name not present in any reachable scope.
    pub const UNKNOWN_CLASS_REFERENCE: Self = Self::new("E", 1025);
    /// Call-site argument count did not match the declared parameter count (after optionals).
    pub const MISMATCHED_ARGUMENT_COUNT: Self = Self::new("E", 1026);
    /// An `import`'s on-disk path casing did not match the logical path casing exactly.
    pub const SCRIPT_IMPORT_CASE_MISMATCH: Self = Self::new("W", 1027);
    /// Component's `extends` attribute was absent; the platform root `Group` was assumed.
    pub const MISSING_EXTENDS_ATTRIBUTE: Self = Self::new("W", 1028);
    /// An imported file is never referenced by any component that declares it.
    pub const UNUSED_IMPORT: Self = Self::new("W", 1029);

    // =========================================================================
    // SEMANTIC — CLASS RULES (1040-1099)
    // =========================================================================

    /// A local variable name matched a fully-reserved (disallowed) identifier.
    pub const CANNOT_USE_RESERVED_WORD_AS_IDENTIFIER: Self = Self::new("E", 1040);
    /// Two members of the same class share a name.
    pub const DUPLICATE_CLASS_MEMBER: Self = Self::new("E", 1041);
    /// `override` method has no same-named method in any ancestor class.
    pub const METHOD_DOES_NOT_EXIST_ON_ANCESTOR: Self = Self::new("E", 1042);
    /// A method overrides an ancestor method but omitted the `override` keyword.
    pub const MISSING_OVERRIDE_KEYWORD: Self = Self::new("E", 1043);
    /// `new` is not a legal modifier for a constructor method.
    pub const CONSTRUCTOR_CANNOT_BE_OVERRIDE: Self = Self::new("E", 1044);
    /// A field re-declares the name of a field already present in an ancestor class.
    pub const FIELD_CANNOT_BE_OVERRIDDEN: Self = Self::new("E", 1045);
    /// Constructor's call to `super()` was not the first statement in its body.
    pub const SUPER_CALL_MUST_BE_FIRST_STATEMENT: Self = Self::new("E", 1046);

    // =========================================================================
    // FATAL / INTERNAL (9000-9099)
    // =========================================================================

    /// The file provider could not read a file's contents (I/O failure).
    pub const FILE_UNREADABLE: Self = Self::new("E", 9001);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
