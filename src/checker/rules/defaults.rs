//! Argument defaults evaluated once at definition time: B006, B008.

use crate::ast::{Expr, ExprKind, FunctionDef};
use crate::checker::visitor::Context;
use crate::diagnostics::catalog::{IMMUTABLE_CALLS, INF_OR_NAN, MUTABLE_CALLS};
use crate::diagnostics::{Code, Diagnostic};

use super::calls::call_path;

/// Positional defaults, then keyword-only defaults.
fn defaults(def: &FunctionDef) -> impl Iterator<Item = &Expr> {
    def.args
        .defaults
        .iter()
        .chain(def.args.kw_defaults.iter().flatten())
}

fn is_mutable(default: &Expr) -> bool {
    match &default.kind {
        ExprKind::Dict { .. } | ExprKind::List { .. } | ExprKind::Set { .. } => true,
        ExprKind::Call { func, .. } => MUTABLE_CALLS.contains(call_path(func).as_str()),
        _ => false,
    }
}

/// `float("inf")`, `float("-nan")` and friends.
fn is_float_literal(path: &str, args: &[Expr]) -> bool {
    if path != "float" {
        return false;
    }
    match args {
        [arg] => arg
            .as_str_literal()
            .is_some_and(|s| INF_OR_NAN.is_match(&s.to_lowercase())),
        _ => false,
    }
}

/// B006: `def f(a=[])`.
pub fn mutable_defaults(def: &FunctionDef, ctx: &mut Context<'_>) {
    for default in defaults(def) {
        if is_mutable(default) {
            ctx.emit(Diagnostic::new(default.pos, Code::B006, vec![]));
        }
    }
}

/// B008: `def f(a=compute())`.
pub fn call_defaults(def: &FunctionDef, ctx: &mut Context<'_>) {
    for default in defaults(def) {
        let ExprKind::Call { func, args, .. } = &default.kind else {
            continue;
        };
        let path = call_path(func);
        if MUTABLE_CALLS.contains(path.as_str()) || IMMUTABLE_CALLS.contains(path.as_str()) {
            continue;
        }
        if is_float_literal(&path, args) {
            continue;
        }
        ctx.emit(Diagnostic::new(default.pos, Code::B008, vec![]));
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::rules::test_support::{check, codes};

    fn def(params: &str) -> String {
        format!("def f({}):\n    pass\n", params)
    }

    #[test]
    fn test_mutable_literals() {
        let found = check(&def("a, b=[]"));
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (1, 11, "B006"));
        assert_eq!(codes(&def("a={}")), vec!["B006"]);
        assert_eq!(codes(&def("a={1}")), vec!["B006"]);
        assert_eq!(codes(&def("*, a=[]")), vec!["B006"]);
    }

    #[test]
    fn test_mutable_calls() {
        assert_eq!(codes(&def("a=dict()")), vec!["B006"]);
        assert_eq!(codes(&def("a=collections.defaultdict(list)")), vec!["B006"]);
        assert_eq!(codes(&def("a=deque()")), vec!["B006"]);
    }

    #[test]
    fn test_immutable_defaults() {
        assert!(codes(&def("a=()")).is_empty());
        assert!(codes(&def("a=None, b=1, c='x'")).is_empty());
        assert!(codes(&def("a=tuple()")).is_empty());
        assert!(codes(&def("a=frozenset()")).is_empty());
        assert!(codes(&def("a=re.compile('x')")).is_empty());
        assert!(codes(&def("a=operator.itemgetter(0)")).is_empty());
    }

    #[test]
    fn test_call_defaults() {
        let found = check(&def("a=time.time()"));
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (1, 8, "B008"));
        assert_eq!(codes(&def("a=float('1.5')")), vec!["B008"]);
        assert_eq!(codes(&def("*, a=compute()")), vec!["B008"]);
    }

    #[test]
    fn test_float_inf_and_nan() {
        assert!(codes(&def("a=float('nan')")).is_empty());
        assert!(codes(&def("a=float('-inf')")).is_empty());
        assert!(codes(&def("a=float('+Infinity')")).is_empty());
        assert_eq!(codes(&def("a=float('nan', 1)")), vec!["B008"]);
    }

    #[test]
    fn test_async_def_and_lambda() {
        assert_eq!(
            codes("async def f(a=[], b=now()):\n    pass\n"),
            vec!["B006", "B008"]
        );
        assert!(codes("g = lambda a=[]: a\n").is_empty());
    }

    #[test]
    fn test_mutable_before_call_codes_are_grouped() {
        assert_eq!(codes(&def("a=now(), b=[]")), vec!["B006", "B008"]);
    }
}
