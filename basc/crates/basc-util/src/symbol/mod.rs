//! Symbol module - String interning for efficient identifier handling.
//!
//! This module provides the [`Symbol`] type, a compact (4-byte) handle to an
//! interned string. Symbols enable O(1) string comparison and reduce memory
//! usage when the same string (a keyword, a variable name, a class name)
//! appears repeatedly across a file or program.
//!
//! # Thread Safety
//!
//! The interner is fully thread-safe (`Sync + Send`), backed by `DashMap`, so
//! the per-file concurrent lexer/parser workers described in section 5 can
//! intern identifiers without contending on a single lock.
//!
//! # Examples
//!
//! ```
//! use basc_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! let s3 = Symbol::intern("world");
//!
//! assert_eq!(s1, s2);
//! assert_ne!(s1, s3);
//! ```
//!
//! Known keywords are pre-interned at fixed indices:
//!
//! ```
//! use basc_util::symbol::{Symbol, KW_SUB, KW_END};
//!
//! assert_eq!(KW_SUB.as_str(), "sub");
//! assert!(KW_END.is_known());
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Statistics about the string interner for profiling.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    /// Number of unique interned strings.
    pub count: usize,
    /// Hash map capacity (number of buckets).
    pub capacity: usize,
    /// Number of hash collisions encountered.
    pub collisions: usize,
    /// Number of cache hits (string already interned).
    pub hits: usize,
    /// Number of cache misses (new string allocation).
    pub misses: usize,
}

impl InternerStats {
    pub const fn new(
        count: usize,
        capacity: usize,
        collisions: usize,
        hits: usize,
        misses: usize,
    ) -> Self {
        Self {
            count,
            capacity,
            collisions,
            hits,
            misses,
        }
    }

    /// Load factor (`count / capacity`); `0.0` if capacity is `0`.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    pub fn is_near_capacity(&self) -> bool {
        self.load_factor() > 0.75
    }

    /// Hit rate (`hits / (hits + misses)`); `0.0` if no lookups happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }

    pub fn memory_efficiency(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.count as f64 / self.total_operations() as f64
        }
    }
}

/// An interned string identifier.
///
/// `Symbol` is exactly 4 bytes (a `u32` index into the global string table),
/// cheap to copy and compare, and stable for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub(crate) index: u32,
}

// ============================================================================
// KNOWN SYMBOLS (KEYWORDS AND TYPE NAMES)
// ============================================================================

/// Reserved symbol indices for known symbols (keywords, type names).
///
/// All symbols with index < this value are pre-interned at startup and
/// correspond to reserved words of the language (section 4.1/4.2/4.3).
const RESERVED_SYMBOLS_END: u32 = 512;

// ----------------------------------------------------------------------------
// Statement and declaration keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `sub` keyword.
pub const KW_SUB: Symbol = Symbol { index: 0 };
/// Known symbol for the `function` keyword.
pub const KW_FUNCTION: Symbol = Symbol { index: 1 };
/// Known symbol for the `end` keyword.
pub const KW_END: Symbol = Symbol { index: 2 };
/// Known symbol for the `if` keyword.
pub const KW_IF: Symbol = Symbol { index: 3 };
/// Known symbol for the contextual `then` keyword.
pub const KW_THEN: Symbol = Symbol { index: 4 };
/// Known symbol for the `else` keyword.
pub const KW_ELSE: Symbol = Symbol { index: 5 };
/// Known symbol for the `for` keyword.
pub const KW_FOR: Symbol = Symbol { index: 6 };
/// Known symbol for the `each` keyword (`for each`).
pub const KW_EACH: Symbol = Symbol { index: 7 };
/// Known symbol for the `while` keyword.
pub const KW_WHILE: Symbol = Symbol { index: 8 };
/// Known symbol for the `exit` keyword (`exit for` / `exit while`).
pub const KW_EXIT: Symbol = Symbol { index: 9 };
/// Known symbol for the `return` keyword.
pub const KW_RETURN: Symbol = Symbol { index: 10 };
/// Known symbol for the `goto` keyword.
pub const KW_GOTO: Symbol = Symbol { index: 11 };
/// Known symbol for the `print` keyword.
pub const KW_PRINT: Symbol = Symbol { index: 12 };
/// Known symbol for the `stop` keyword.
pub const KW_STOP: Symbol = Symbol { index: 13 };
/// Known symbol for the `dim` keyword.
pub const KW_DIM: Symbol = Symbol { index: 14 };
/// Known symbol for the `class` keyword.
pub const KW_CLASS: Symbol = Symbol { index: 15 };
/// Known symbol for the contextual `extends` keyword.
pub const KW_EXTENDS: Symbol = Symbol { index: 16 };
/// Known symbol for the contextual `override` keyword.
pub const KW_OVERRIDE: Symbol = Symbol { index: 17 };
/// Known symbol for the contextual `new` keyword.
pub const KW_NEW: Symbol = Symbol { index: 18 };
/// Known symbol for the `library` keyword.
pub const KW_LIBRARY: Symbol = Symbol { index: 19 };
/// Known symbol for the contextual `import` keyword.
pub const KW_IMPORT: Symbol = Symbol { index: 20 };
/// Known symbol for `rem` (end-of-line comment marker; also a reserved
/// dotted-property-only identifier, see section 9).
pub const KW_REM: Symbol = Symbol { index: 21 };
/// Known symbol for the contextual `as` keyword (type annotations).
pub const KW_AS: Symbol = Symbol { index: 22 };
/// Known symbol for the contextual `in` keyword (`for each ... in`).
pub const KW_IN: Symbol = Symbol { index: 23 };

// ----------------------------------------------------------------------------
// Literal and operator keywords
// ----------------------------------------------------------------------------

/// Known symbol for the `true` literal.
pub const KW_TRUE: Symbol = Symbol { index: 24 };
/// Known symbol for the `false` literal.
pub const KW_FALSE: Symbol = Symbol { index: 25 };
/// Known symbol for the `invalid` literal (the null-like value).
pub const KW_INVALID: Symbol = Symbol { index: 26 };
/// Known symbol for the `and` operator keyword.
pub const KW_AND: Symbol = Symbol { index: 27 };
/// Known symbol for the `or` operator keyword.
pub const KW_OR: Symbol = Symbol { index: 28 };
/// Known symbol for the `not` operator keyword.
pub const KW_NOT: Symbol = Symbol { index: 29 };
/// Known symbol for the `mod` operator keyword.
pub const KW_MOD: Symbol = Symbol { index: 30 };

// ----------------------------------------------------------------------------
// Built-in type names
// ----------------------------------------------------------------------------

/// Known symbol for the `integer` type name.
pub const TY_INTEGER: Symbol = Symbol { index: 31 };
/// Known symbol for the `longinteger` type name.
pub const TY_LONGINTEGER: Symbol = Symbol { index: 32 };
/// Known symbol for the `float` type name.
pub const TY_FLOAT: Symbol = Symbol { index: 33 };
/// Known symbol for the `double` type name.
pub const TY_DOUBLE: Symbol = Symbol { index: 34 };
/// Known symbol for the `string` type name.
pub const TY_STRING: Symbol = Symbol { index: 35 };
/// Known symbol for the `boolean` type name.
pub const TY_BOOLEAN: Symbol = Symbol { index: 36 };
/// Known symbol for the `object` type name.
pub const TY_OBJECT: Symbol = Symbol { index: 37 };
/// Known symbol for the `dynamic` type name.
pub const TY_DYNAMIC: Symbol = Symbol { index: 38 };
/// Known symbol for the `void` type name (sub return type).
pub const TY_VOID: Symbol = Symbol { index: 39 };

impl Symbol {
    /// The maximum index value for a symbol.
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol.
    ///
    /// Same string always returns the same symbol; safe to call concurrently
    /// from multiple file-parsing workers.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string value associated with this symbol.
    ///
    /// Returns the empty string if the symbol was constructed with an
    /// out-of-bounds index (e.g. via [`Symbol::from_u32_unchecked`]).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    #[inline]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    /// Compare the symbol's string with a `&str` without allocation.
    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Returns true if this is a "known" symbol (a pre-interned reserved word).
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// Create a symbol from a raw index.
    ///
    /// # Safety
    ///
    /// The index must correspond to a valid entry in the string table, or
    /// `as_str()` silently returns `""` rather than panicking.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    #[inline]
    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    #[inline]
    pub fn stats() -> (usize, usize) {
        let stats = STRING_TABLE.stats();
        (stats.count, stats.capacity)
    }

    /// Intern a word that may be a known keyword/type name, returning the
    /// predefined symbol without hashing when it is.
    ///
    /// The lexer calls this for every identifier-shaped token so that
    /// keyword classification (`is_known`) is a plain index comparison.
    #[inline]
    pub fn intern_known(string: &str) -> Self {
        match string {
            "sub" => KW_SUB,
            "function" => KW_FUNCTION,
            "end" => KW_END,
            "if" => KW_IF,
            "then" => KW_THEN,
            "else" => KW_ELSE,
            "for" => KW_FOR,
            "each" => KW_EACH,
            "while" => KW_WHILE,
            "exit" => KW_EXIT,
            "return" => KW_RETURN,
            "goto" => KW_GOTO,
            "print" => KW_PRINT,
            "stop" => KW_STOP,
            "dim" => KW_DIM,
            "class" => KW_CLASS,
            "extends" => KW_EXTENDS,
            "override" => KW_OVERRIDE,
            "new" => KW_NEW,
            "library" => KW_LIBRARY,
            "import" => KW_IMPORT,
            "rem" => KW_REM,
            "as" => KW_AS,
            "in" => KW_IN,
            "true" => KW_TRUE,
            "false" => KW_FALSE,
            "invalid" => KW_INVALID,
            "and" => KW_AND,
            "or" => KW_OR,
            "not" => KW_NOT,
            "mod" => KW_MOD,
            "integer" => TY_INTEGER,
            "longinteger" => TY_LONGINTEGER,
            "float" => TY_FLOAT,
            "double" => TY_DOUBLE,
            "string" => TY_STRING,
            "boolean" => TY_BOOLEAN,
            "object" => TY_OBJECT,
            "dynamic" => TY_DYNAMIC,
            "void" => TY_VOID,
            _ => Self::intern(string),
        }
    }

    /// Get the symbol for a built-in type name, interning unknown type names
    /// (class names used as a type annotation) normally.
    #[inline]
    pub fn intern_type(string: &str) -> Self {
        match string {
            "integer" => TY_INTEGER,
            "longinteger" => TY_LONGINTEGER,
            "float" => TY_FLOAT,
            "double" => TY_DOUBLE,
            "string" => TY_STRING,
            "boolean" => TY_BOOLEAN,
            "object" => TY_OBJECT,
            "dynamic" => TY_DYNAMIC,
            "void" => TY_VOID,
            _ => Self::intern(string),
        }
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-print a symbol with quotes, to distinguish it from a plain string
/// in diagnostic text.
pub trait SymbolPretty {
    fn pretty(&self) -> SymbolPrettyDisplay<'_>;
}

impl SymbolPretty for Symbol {
    fn pretty(&self) -> SymbolPrettyDisplay<'_> {
        SymbolPrettyDisplay(self)
    }
}

pub struct SymbolPrettyDisplay<'a>(&'a Symbol);

impl std::fmt::Display for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.as_str())
    }
}

impl std::fmt::Debug for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolPretty(\"{}\")", self.0.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);
