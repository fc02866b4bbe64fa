//! Class-level checks: B903.

use crate::ast::{ExprKind, Stmt, StmtKind};
use crate::checker::visitor::Context;
use crate::diagnostics::{Code, Diagnostic};

fn is_docstring(stmt: &Stmt) -> bool {
    matches!(&stmt.kind, StmtKind::Expr { value } if value.as_str_literal().is_some())
}

/// `self.attr = name`
fn is_attribute_copy(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Assign { targets, value } => {
            matches!(targets.as_slice(), [target] if matches!(target.kind, ExprKind::Attribute { .. }))
                && value.as_name().is_some()
        }
        _ => false,
    }
}

/// B903: a class whose only member is an `__init__` copying its arguments
/// onto attributes.
pub fn init_only_data_class(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::ClassDef(class) = &stmt.kind else {
        return;
    };
    let body = match class.body.split_first() {
        Some((first, rest)) if is_docstring(first) => rest,
        _ => class.body.as_slice(),
    };
    let [only] = body else {
        return;
    };
    let StmtKind::FunctionDef(init) = &only.kind else {
        return;
    };
    if init.is_async || init.name != "__init__" {
        return;
    }
    if init.body.iter().all(is_attribute_copy) {
        ctx.emit(Diagnostic::new(stmt.pos, Code::B903, vec![]));
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::rules::test_support::{check, codes};

    #[test]
    fn test_init_only_class() {
        let source = "class Point:\n    \"\"\"A point.\"\"\"\n\n    def __init__(self, x, y):\n        self.x = x\n        self.y = y\n";
        let found = check(source);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (1, 0, "B903"));
    }

    #[test]
    fn test_classes_with_behaviour_are_fine() {
        let with_method = "class P:\n    def __init__(self, x):\n        self.x = x\n\n    def norm(self):\n        return self.x\n";
        assert!(codes(with_method).is_empty());

        let computed = "class P:\n    def __init__(self, x):\n        self.x = x * 2\n";
        assert!(codes(computed).is_empty());

        let slots = "class P:\n    __slots__ = ('x',)\n\n    def __init__(self, x):\n        self.x = x\n";
        assert!(codes(slots).is_empty());

        let chained = "class P:\n    def __init__(self, x):\n        self.x = self.y = x\n";
        assert!(codes(chained).is_empty());
    }

    #[test]
    fn test_init_must_only_copy_arguments() {
        assert_eq!(
            codes("class P:\n    def __init__(self):\n        pass\n"),
            Vec::<String>::new()
        );
        assert_eq!(
            codes("class P:\n    def __init__(self, a):\n        self.a = a\n"),
            vec!["B903"]
        );
    }
}
