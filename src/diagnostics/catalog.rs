//! Diagnostic codes, their message templates and the constant tables the
//! rules consult.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Every code the checker can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Code {
    B001,
    B002,
    B003,
    B004,
    B005,
    B006,
    B007,
    B008,
    B009,
    B010,
    B011,
    B012,
    B013,
    B014,
    B015,
    B016,
    B017,
    B901,
    B902,
    B903,
    B904,
    B950,
}

/// Codes that stay off unless selected.
pub const DISABLED_BY_DEFAULT: &[Code] = &[Code::B901, Code::B902, Code::B903, Code::B904, Code::B950];

impl Code {
    pub const ALL: &'static [Code] = &[
        Code::B001,
        Code::B002,
        Code::B003,
        Code::B004,
        Code::B005,
        Code::B006,
        Code::B007,
        Code::B008,
        Code::B009,
        Code::B010,
        Code::B011,
        Code::B012,
        Code::B013,
        Code::B014,
        Code::B015,
        Code::B016,
        Code::B017,
        Code::B901,
        Code::B902,
        Code::B903,
        Code::B904,
        Code::B950,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Code::B001 => "B001",
            Code::B002 => "B002",
            Code::B003 => "B003",
            Code::B004 => "B004",
            Code::B005 => "B005",
            Code::B006 => "B006",
            Code::B007 => "B007",
            Code::B008 => "B008",
            Code::B009 => "B009",
            Code::B010 => "B010",
            Code::B011 => "B011",
            Code::B012 => "B012",
            Code::B013 => "B013",
            Code::B014 => "B014",
            Code::B015 => "B015",
            Code::B016 => "B016",
            Code::B017 => "B017",
            Code::B901 => "B901",
            Code::B902 => "B902",
            Code::B903 => "B903",
            Code::B904 => "B904",
            Code::B950 => "B950",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Code::ALL.iter().copied().find(|code| code.as_str() == s)
    }

    /// Opt-in codes live in the `B9` range.
    pub fn is_optional(&self) -> bool {
        self.as_str().starts_with("B9")
    }

    /// Message template, without the leading code.
    pub fn template(&self) -> &'static str {
        match self {
            Code::B001 => {
                "Do not use {}, it also catches unexpected events like memory errors, \
                 interrupts, system exit, and so on.  Prefer `except Exception:`.  \
                 If you're sure what you're doing, be explicit and write \
                 `except BaseException:`."
            }
            Code::B002 => {
                "Python does not support the unary prefix increment. Writing ++n is \
                 equivalent to +(+(n)), which equals n. You meant n += 1."
            }
            Code::B003 => {
                "Assigning to `os.environ` doesn't clear the environment. Subprocesses \
                 are going to see outdated variables, in disagreement with the current \
                 process. Use `os.environ.clear()` or the `env=` argument to Popen."
            }
            Code::B004 => {
                "Using `hasattr(x, '__call__')` to test if `x` is callable is unreliable. \
                 If `x` implements custom `__getattr__` or its `__call__` is itself not \
                 callable, you might get misleading results. Use `callable(x)` for \
                 consistent results."
            }
            Code::B005 => {
                "Using .strip() with multi-character strings is misleading the reader. \
                 It looks like stripping a substring. Move your character set to a \
                 constant if this is deliberate. Use .replace() or regular expressions \
                 to remove string fragments."
            }
            Code::B006 => {
                "Do not use mutable data structures for argument defaults.  They are \
                 created during function definition time. All calls to the function \
                 reuse this one instance of that data structure, persisting changes \
                 between them."
            }
            Code::B007 => {
                "Loop control variable {!r} not used within the loop body. If this is \
                 intended, start the name with an underscore."
            }
            Code::B008 => {
                "Do not perform function calls in argument defaults.  The call is \
                 performed only once at function definition time. All calls to your \
                 function will reuse the result of that definition-time function call.  \
                 If this is intended, assign the function call to a module-level \
                 variable and use that variable as a default value."
            }
            Code::B009 => {
                "Do not call getattr with a constant attribute value, it is not any \
                 safer than normal property access."
            }
            Code::B010 => {
                "Do not call setattr with a constant attribute value, it is not any \
                 safer than normal property access."
            }
            Code::B011 => {
                "Do not call assert False since python -O removes these calls. Instead \
                 callers should raise AssertionError()."
            }
            Code::B012 => {
                "return/continue/break inside finally blocks cause exceptions to be \
                 silenced. Exceptions should be silenced in except blocks. Control \
                 statements can be moved outside the finally block."
            }
            Code::B013 => {
                "A length-one tuple literal is redundant.  Write `except {0}:` instead \
                 of `except ({0},):`."
            }
            Code::B014 => {
                "Redundant exception types in `except ({0}){1}:`.  Write \
                 `except {2}{1}:`, which catches exactly the same exceptions."
            }
            Code::B015 => {
                "Pointless comparison. This comparison does nothing but waste CPU \
                 instructions. Either prepend `assert` or remove it."
            }
            Code::B016 => {
                "Cannot raise a literal. Did you intend to return it or raise an \
                 Exception?"
            }
            Code::B017 => {
                "assertRaises(Exception): should be considered evil. It can lead to \
                 your test passing even if the code being tested is never executed due \
                 to a typo. Either assert for a more specific exception (builtin or \
                 custom), use assertRaisesRegex, or use the context manager form of \
                 assertRaises."
            }
            Code::B901 => {
                "Using `yield` together with `return x`. Use native `async def` \
                 coroutines or put a `# noqa` comment on this line if this was \
                 intentional."
            }
            Code::B902 => {
                "Invalid first argument {} used for {} method. Use the canonical first \
                 argument name in methods, i.e. {}."
            }
            Code::B903 => {
                "Data class should either be immutable or use __slots__ to save memory. \
                 Use collections.namedtuple to generate an immutable class, or \
                 enumerate the attributes in a __slot__ declaration in the class to \
                 leave attributes mutable."
            }
            Code::B904 => {
                "Within an `except` clause, raise exceptions with `raise ... from err` \
                 or `raise ... from None` to distinguish them from errors in exception \
                 handling.  See \
                 https://docs.python.org/3/tutorial/errors.html#exception-chaining for \
                 details."
            }
            Code::B950 => "line too long ({} > {} characters)",
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Code {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::parse(s).ok_or_else(|| format!("unknown code: {}", s))
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Rule tables
// =============================================================================

/// Methods checked by B005.
pub static STRIP_METHODS: phf::Set<&'static str> = phf_set! {
    "lstrip",
    "rstrip",
    "strip",
};

/// Receivers whose `.strip("...")` calls are exempt from B005.
pub const STRIP_EXEMPT_PATHS: &[&str] = &[];

/// Calls that build a fresh mutable container (B006).
pub static MUTABLE_CALLS: phf::Set<&'static str> = phf_set! {
    "Counter",
    "OrderedDict",
    "collections.Counter",
    "collections.OrderedDict",
    "collections.defaultdict",
    "collections.deque",
    "defaultdict",
    "deque",
    "dict",
    "list",
    "set",
};

/// Calls whose result is safe to share between invocations (B008).
pub static IMMUTABLE_CALLS: phf::Set<&'static str> = phf_set! {
    "tuple",
    "frozenset",
    "types.MappingProxyType",
    "MappingProxyType",
    "re.compile",
    "operator.attrgetter",
    "operator.itemgetter",
    "operator.methodcaller",
    "attrgetter",
    "itemgetter",
    "methodcaller",
};

/// Names that are aliases of `OSError` (B014).
pub static OSERROR_ALIASES: phf::Set<&'static str> = phf_set! {
    "EnvironmentError",
    "IOError",
    "WindowsError",
    "mmap.error",
    "socket.error",
    "select.error",
};

/// Methods that receive the class implicitly even without `@classmethod` (B902).
pub static IMPLICIT_CLASSMETHODS: phf::Set<&'static str> = phf_set! {
    "__new__",
    "__init_subclass__",
    "__class_getitem__",
};

pub const EXPECTED_SELF: &[&str] = &["self"];
pub const EXPECTED_CLS: &[&str] = &["cls", "klass"];
pub const EXPECTED_METACLS: &[&str] = &["metacls", "metaclass", "typ", "mcs"];

/// Reserved words that cannot be accessed as plain attributes (B009, B010).
pub static PYTHON_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
};

lazy_static! {
    pub static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    pub static ref INF_OR_NAN: Regex = Regex::new(r"^[+-]?(inf|infinity|nan)$").unwrap();
}
