//! `except` clauses and `raise` statements: B001, B013, B014, B016, B904.

use crate::ast::{Constant, ExceptHandler, Expr, ExprKind, NodeKind, Stmt, StmtKind};
use crate::checker::visitor::Context;
use crate::diagnostics::builtins::is_subclass;
use crate::diagnostics::catalog::OSERROR_ALIASES;
use crate::diagnostics::{Code, Diagnostic};

/// Dotted rendering of an exception expression: `ValueError`,
/// `socket.error`. Subscripts and starred expressions render as their value.
fn to_name_str(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Name { id } => Some(id.clone()),
        ExprKind::Attribute { value, attr } => Some(format!("{}.{}", to_name_str(value)?, attr)),
        ExprKind::Subscript { value, .. } | ExprKind::Starred { value } => to_name_str(value),
        _ => None,
    }
}

fn tuple_elements(handler: &ExceptHandler) -> Option<&[Expr]> {
    match &handler.type_.as_ref()?.kind {
        ExprKind::Tuple { elts } => Some(elts),
        _ => None,
    }
}

fn as_suffix(handler: &ExceptHandler) -> String {
    handler
        .name
        .as_ref()
        .map(|name| format!(" as {}", name))
        .unwrap_or_default()
}

/// B001: `except:` and `except ():`.
pub fn bare_except(handler: &ExceptHandler, ctx: &mut Context<'_>) {
    let what = match &handler.type_ {
        None => "bare `except:`".to_string(),
        Some(_) if tuple_elements(handler).is_some_and(|elts| elts.is_empty()) => {
            format!("`except (){}:`", as_suffix(handler))
        }
        Some(_) => return,
    };
    ctx.emit(Diagnostic::new(handler.pos, Code::B001, vec![what]));
}

/// B013: `except (ValueError,):`.
pub fn single_element_tuple(handler: &ExceptHandler, ctx: &mut Context<'_>) {
    let Some([only]) = tuple_elements(handler) else {
        return;
    };
    if let Some(name) = to_name_str(only) {
        ctx.emit(Diagnostic::new(handler.pos, Code::B013, vec![name]));
    }
}

/// B014: tuples naming an exception twice, or an exception together with
/// one of its bases.
pub fn redundant_tuple(handler: &ExceptHandler, ctx: &mut Context<'_>) {
    let Some(elts) = tuple_elements(handler) else {
        return;
    };
    if elts.len() < 2 {
        return;
    }
    let Some(names) = elts.iter().map(to_name_str).collect::<Option<Vec<_>>>() else {
        return;
    };

    let good = reduce_exception_names(&names);
    if good == names {
        return;
    }

    let suggestion = match good.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", good.join(", ")),
    };
    ctx.emit(Diagnostic::new(
        handler.pos,
        Code::B014,
        vec![names.join(", "), as_suffix(handler), suggestion],
    ));
}

/// The smallest list of names catching the same exceptions as `names`.
pub fn reduce_exception_names(names: &[String]) -> Vec<String> {
    let mut good: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !good.contains(name) {
            good.push(name.clone());
        }
    }

    if good.iter().any(|n| n == "BaseException") {
        return vec!["BaseException".to_string()];
    }
    if good.iter().any(|n| n == "OSError") {
        good.retain(|n| !OSERROR_ALIASES.contains(n.as_str()));
    }

    let snapshot = good.clone();
    for name in &snapshot {
        for other in &snapshot {
            if name == other || !good.contains(other) {
                continue;
            }
            if is_subclass(name, other) {
                good.retain(|n| n != name);
            }
        }
    }
    good
}

/// B016: `raise "oops"`, `raise 1`, `raise None`.
pub fn raise_literal(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::Raise { exc: Some(exc), .. } = &stmt.kind else {
        return;
    };
    if let ExprKind::Constant(constant) = &exc.kind {
        if !matches!(constant, Constant::Bytes(_) | Constant::Ellipsis) {
            ctx.emit(Diagnostic::new(stmt.pos, Code::B016, vec![]));
        }
    }
}

/// Python's `str.islower()`: at least one cased character, none uppercase.
fn is_lower(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            cased = true;
        }
    }
    cased
}

/// B904: `raise NewError()` inside an `except` block without `from`.
pub fn raise_without_cause(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::Raise {
        exc: Some(exc),
        cause: None,
    } = &stmt.kind
    else {
        return;
    };
    if exc.as_name().is_some_and(is_lower) {
        return;
    }
    if ctx
        .ancestors()
        .any(|node| node.kind() == NodeKind::ExceptHandler)
    {
        ctx.emit(Diagnostic::new(stmt.pos, Code::B904, vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::rules::test_support::{check, codes};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_bare_except() {
        let found = check("try:\n    pass\nexcept:\n    pass\n");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1), (3, 0));
        assert!(found[0].3.starts_with("B001 Do not use bare `except:`, it also catches"));
    }

    #[test]
    fn test_empty_tuple_except() {
        let found = check("try:\n    pass\nexcept () as e:\n    pass\n");
        assert_eq!(found[0].2, "B001");
        assert!(found[0].3.contains("Do not use `except () as e:`, it also"));
    }

    #[test]
    fn test_single_type_is_fine() {
        assert!(codes("try:\n    pass\nexcept ValueError:\n    pass\n").is_empty());
    }

    #[test]
    fn test_single_element_tuple() {
        let found = check("try:\n    pass\nexcept (ValueError,):\n    pass\n");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].3,
            "B013 A length-one tuple literal is redundant.  Write `except ValueError:` \
             instead of `except (ValueError,):`."
        );
    }

    #[test]
    fn test_redundant_tuple_message() {
        let found = check("try:\n    pass\nexcept (IOError, OSError) as err:\n    pass\n");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].3,
            "B014 Redundant exception types in `except (IOError, OSError) as err:`.  \
             Write `except OSError as err:`, which catches exactly the same exceptions."
        );
    }

    #[test]
    fn test_reduction() {
        assert_eq!(reduce_exception_names(&names(&["IOError", "OSError"])), names(&["OSError"]));
        assert_eq!(
            reduce_exception_names(&names(&["ValueError", "ValueError"])),
            names(&["ValueError"])
        );
        assert_eq!(
            reduce_exception_names(&names(&["Exception", "TypeError"])),
            names(&["Exception"])
        );
        assert_eq!(
            reduce_exception_names(&names(&["MyError", "BaseException", "ValueError"])),
            names(&["BaseException"])
        );
        assert_eq!(
            reduce_exception_names(&names(&["ValueError", "UnicodeError", "UnicodeDecodeError"])),
            names(&["ValueError"])
        );
        assert_eq!(
            reduce_exception_names(&names(&["IOError", "EnvironmentError"])),
            names(&["EnvironmentError"])
        );
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let once = reduce_exception_names(&names(&["KeyError", "LookupError", "mod.Err", "IOError"]));
        assert_eq!(reduce_exception_names(&once), once);
        assert_eq!(once, names(&["LookupError", "mod.Err", "IOError"]));
    }

    #[test]
    fn test_unrelated_tuple_is_fine() {
        assert!(codes("try:\n    pass\nexcept (ValueError, mod.Error, KeyError):\n    pass\n").is_empty());
    }

    #[test]
    fn test_unrenderable_tuple_is_skipped() {
        assert!(codes("try:\n    pass\nexcept (ValueError, get()):\n    pass\n").is_empty());
    }

    #[test]
    fn test_raise_literal() {
        assert_eq!(codes("raise 'oops'\n"), vec!["B016"]);
        assert_eq!(codes("raise 3\n"), vec!["B016"]);
        assert_eq!(codes("raise None\n"), vec!["B016"]);
        assert!(codes("raise ValueError('oops')\n").is_empty());
        assert!(codes("raise b'x'\n").is_empty());
    }

    #[test]
    fn test_raise_without_cause() {
        let source = "try:\n    pass\nexcept ValueError as e:\n    raise TypeError()\n";
        let found = check(source);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (4, 4, "B904"));
    }

    #[test]
    fn test_raise_without_cause_exemptions() {
        let base = "try:\n    pass\nexcept ValueError as e:\n";
        assert!(codes(&format!("{}    raise\n", base)).is_empty());
        assert!(codes(&format!("{}    raise e\n", base)).is_empty());
        assert!(codes(&format!("{}    raise TypeError() from e\n", base)).is_empty());
        assert!(codes(&format!("{}    raise TypeError() from None\n", base)).is_empty());
        assert!(codes("raise TypeError()\n").is_empty());
        assert_eq!(codes(&format!("{}    raise Err\n", base)), vec!["B904"]);
    }

    #[test]
    fn test_is_lower() {
        assert!(is_lower("err"));
        assert!(is_lower("err_2"));
        assert!(!is_lower("Err"));
        assert!(!is_lower("_"));
    }
}
