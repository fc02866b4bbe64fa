//! Static model of Python's built-in exception hierarchy.
//!
//! B014 needs "is `a` the same as or a subclass of `b`" for names written in
//! an `except` tuple. Only built-in classes are known; anything else is
//! unrelated to everything, including itself under a different spelling.

use phf::phf_map;

/// Built-in exception name → direct base classes.
static HIERARCHY: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "BaseException" => &[],
    "BaseExceptionGroup" => &["BaseException"],
    "GeneratorExit" => &["BaseException"],
    "KeyboardInterrupt" => &["BaseException"],
    "SystemExit" => &["BaseException"],
    "Exception" => &["BaseException"],
    "ArithmeticError" => &["Exception"],
    "FloatingPointError" => &["ArithmeticError"],
    "OverflowError" => &["ArithmeticError"],
    "ZeroDivisionError" => &["ArithmeticError"],
    "AssertionError" => &["Exception"],
    "AttributeError" => &["Exception"],
    "BufferError" => &["Exception"],
    "EOFError" => &["Exception"],
    "ExceptionGroup" => &["BaseExceptionGroup", "Exception"],
    "ImportError" => &["Exception"],
    "ModuleNotFoundError" => &["ImportError"],
    "LookupError" => &["Exception"],
    "IndexError" => &["LookupError"],
    "KeyError" => &["LookupError"],
    "MemoryError" => &["Exception"],
    "NameError" => &["Exception"],
    "UnboundLocalError" => &["NameError"],
    "OSError" => &["Exception"],
    "BlockingIOError" => &["OSError"],
    "ChildProcessError" => &["OSError"],
    "ConnectionError" => &["OSError"],
    "BrokenPipeError" => &["ConnectionError"],
    "ConnectionAbortedError" => &["ConnectionError"],
    "ConnectionRefusedError" => &["ConnectionError"],
    "ConnectionResetError" => &["ConnectionError"],
    "FileExistsError" => &["OSError"],
    "FileNotFoundError" => &["OSError"],
    "InterruptedError" => &["OSError"],
    "IsADirectoryError" => &["OSError"],
    "NotADirectoryError" => &["OSError"],
    "PermissionError" => &["OSError"],
    "ProcessLookupError" => &["OSError"],
    "TimeoutError" => &["OSError"],
    "ReferenceError" => &["Exception"],
    "RuntimeError" => &["Exception"],
    "NotImplementedError" => &["RuntimeError"],
    "RecursionError" => &["RuntimeError"],
    "PythonFinalizationError" => &["RuntimeError"],
    "StopAsyncIteration" => &["Exception"],
    "StopIteration" => &["Exception"],
    "SyntaxError" => &["Exception"],
    "IndentationError" => &["SyntaxError"],
    "TabError" => &["IndentationError"],
    "SystemError" => &["Exception"],
    "TypeError" => &["Exception"],
    "ValueError" => &["Exception"],
    "UnicodeError" => &["ValueError"],
    "UnicodeDecodeError" => &["UnicodeError"],
    "UnicodeEncodeError" => &["UnicodeError"],
    "UnicodeTranslateError" => &["UnicodeError"],
    "Warning" => &["Exception"],
    "BytesWarning" => &["Warning"],
    "DeprecationWarning" => &["Warning"],
    "EncodingWarning" => &["Warning"],
    "FutureWarning" => &["Warning"],
    "ImportWarning" => &["Warning"],
    "PendingDeprecationWarning" => &["Warning"],
    "ResourceWarning" => &["Warning"],
    "RuntimeWarning" => &["Warning"],
    "SyntaxWarning" => &["Warning"],
    "UnicodeWarning" => &["Warning"],
    "UserWarning" => &["Warning"],
};

/// Built-in names bound to another built-in class.
static ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "EnvironmentError" => "OSError",
    "IOError" => "OSError",
    "WindowsError" => "OSError",
};

/// The built-in class a name refers to, if any.
pub fn resolve(name: &str) -> Option<&'static str> {
    let canonical = ALIASES.get(name).copied().unwrap_or(name);
    HIERARCHY.get_key(canonical).copied()
}

/// Whether `name` is the same class as `base` or inherits from it.
pub fn is_subclass(name: &str, base: &str) -> bool {
    match (resolve(name), resolve(base)) {
        (Some(class), Some(base)) => inherits(class, base),
        _ => false,
    }
}

fn inherits(class: &str, base: &str) -> bool {
    if class == base {
        return true;
    }
    HIERARCHY
        .get(class)
        .map(|parents| parents.iter().any(|parent| inherits(parent, base)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_and_transitive_subclasses() {
        assert!(is_subclass("TypeError", "Exception"));
        assert!(is_subclass("TabError", "SyntaxError"));
        assert!(is_subclass("ConnectionResetError", "OSError"));
        assert!(is_subclass("KeyboardInterrupt", "BaseException"));
        assert!(!is_subclass("KeyboardInterrupt", "Exception"));
        assert!(!is_subclass("Exception", "TypeError"));
    }

    #[test]
    fn test_aliases_resolve_to_oserror() {
        assert_eq!(resolve("IOError"), Some("OSError"));
        assert!(is_subclass("IOError", "OSError"));
        assert!(is_subclass("OSError", "EnvironmentError"));
    }

    #[test]
    fn test_exception_group_has_two_bases() {
        assert!(is_subclass("ExceptionGroup", "Exception"));
        assert!(is_subclass("ExceptionGroup", "BaseExceptionGroup"));
    }

    #[test]
    fn test_unknown_names_are_unrelated() {
        assert!(!is_subclass("MyError", "Exception"));
        assert!(!is_subclass("MyError", "MyError"));
        assert!(!is_subclass("socket.error", "OSError"));
    }
}
