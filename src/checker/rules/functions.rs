//! Function-level checks: B901, B902.

use crate::ast::{FunctionDef, NodeKind, NodeRef, Position, Stmt, StmtKind};
use crate::checker::names::NameFinder;
use crate::checker::visitor::Context;
use crate::diagnostics::catalog::{
    EXPECTED_CLS, EXPECTED_METACLS, EXPECTED_SELF, IMPLICIT_CLASSMETHODS,
};
use crate::diagnostics::{python_repr, Code, Diagnostic};

/// Pre-order `(parent, node)` pairs of a function body, not entering nested
/// function definitions.
fn body_pairs<'a>(def_node: NodeRef<'a>, def: &'a FunctionDef) -> Vec<(NodeRef<'a>, NodeRef<'a>)> {
    fn descend<'a>(
        parent: NodeRef<'a>,
        node: NodeRef<'a>,
        out: &mut Vec<(NodeRef<'a>, NodeRef<'a>)>,
    ) {
        if node.kind().is_function_def() {
            return;
        }
        out.push((parent, node));
        for child in node.children() {
            descend(node, child, out);
        }
    }

    let mut out = Vec::new();
    for stmt in &def.body {
        descend(def_node, NodeRef::Stmt(stmt), &mut out);
    }
    out
}

/// B901: a generator that also returns a value.
pub fn yield_with_return(def: &FunctionDef, stmt: &Stmt, ctx: &mut Context<'_>) {
    if def.name == "__await__" {
        return;
    }

    let mut has_yield = false;
    let mut return_at: Option<Position> = None;

    for (parent, node) in body_pairs(NodeRef::Stmt(stmt), def) {
        if parent.kind() == NodeKind::Expr
            && matches!(node.kind(), NodeKind::Yield | NodeKind::YieldFrom)
        {
            has_yield = true;
        }
        if let Some(Stmt {
            pos,
            kind: StmtKind::Return { value: Some(_) },
        }) = node.as_stmt()
        {
            return_at = Some(*pos);
        }
        if let (true, Some(pos)) = (has_yield, return_at) {
            ctx.emit(Diagnostic::new(pos, Code::B901, vec![]));
            break;
        }
    }
}

/// B902: first parameter of a method named against convention.
pub fn first_argument(stmt: &Stmt, def: &FunctionDef, ctx: &mut Context<'_>) {
    let Some(class) = ctx.parent().and_then(|p| p.as_stmt()) else {
        return;
    };
    let StmtKind::ClassDef(class) = &class.kind else {
        return;
    };

    let mut decorators = NameFinder::new();
    decorators.visit_all(def.decorator_list.iter().map(NodeRef::Expr));
    let decorators = decorators.into_names();
    if decorators.contains_key("staticmethod") {
        return;
    }

    let is_metaclass = class.bases.iter().any(|b| b.as_name() == Some("type"));
    let is_classmethod =
        decorators.contains_key("classmethod") || IMPLICIT_CLASSMETHODS.contains(def.name.as_str());
    let (expected, kind) = match (is_metaclass, is_classmethod) {
        (true, true) => (EXPECTED_METACLS, "metaclass class"),
        (true, false) => (EXPECTED_CLS, "metaclass instance"),
        (false, true) => (EXPECTED_CLS, "class"),
        (false, false) => (EXPECTED_SELF, "instance"),
    };

    let args = &def.args;
    let (actual, pos) = if let Some(arg) = args.posonlyargs.first().or(args.args.first()) {
        (arg.name.clone(), arg.pos)
    } else if let Some(arg) = &args.vararg {
        (format!("*{}", arg.name), arg.pos)
    } else if let Some(arg) = &args.kwarg {
        (format!("**{}", arg.name), arg.pos)
    } else if let Some(arg) = args.kwonlyargs.first() {
        (format!("*, {}", arg.name), arg.pos)
    } else {
        ("(none)".to_string(), stmt.pos)
    };

    if expected.contains(&actual.as_str()) {
        return;
    }
    let shown = if actual.starts_with('(') || actual.starts_with('*') {
        actual
    } else {
        python_repr(&actual)
    };
    ctx.emit(Diagnostic::new(
        pos,
        Code::B902,
        vec![shown, kind.to_string(), expected[0].to_string()],
    ));
}

#[cfg(test)]
mod tests {
    use crate::checker::rules::test_support::{check, codes};

    #[test]
    fn test_yield_with_return() {
        let source = "def gen():\n    yield 1\n    return 2\n";
        let found = check(source);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (3, 4, "B901"));
    }

    #[test]
    fn test_return_before_yield() {
        let source = "def gen(x):\n    if x:\n        return 2\n    yield from other()\n";
        let found = check(source);
        assert_eq!((found[0].0, found[0].2.as_str()), (3, "B901"));
    }

    #[test]
    fn test_yield_forms_that_do_not_count() {
        assert!(codes("def f():\n    x = yield 1\n    return 2\n").is_empty());
        assert!(codes("def f():\n    yield 1\n    return\n").is_empty());
        assert!(codes("def __await__(self):\n    yield\n    return 1\n").is_empty());
        assert!(codes("async def f():\n    yield 1\n    return 2\n").is_empty());
    }

    #[test]
    fn test_nested_functions_are_separate() {
        let source = "def outer():\n    def inner():\n        yield 1\n    return inner\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_first_argument_conventions() {
        let source = "class C:\n    def method(this):\n        pass\n";
        let found = check(source);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].0, found[0].1, found[0].2.as_str()), (2, 15, "B902"));
        assert_eq!(
            found[0].3,
            "B902 Invalid first argument 'this' used for instance method. Use the \
             canonical first argument name in methods, i.e. self."
        );
    }

    #[test]
    fn test_classmethods() {
        let source = "class C:\n    @classmethod\n    def make(self):\n        pass\n\n    def __new__(klass):\n        pass\n";
        let found = check(source);
        assert_eq!(found.len(), 1);
        assert!(found[0].3.contains("'self' used for class method"));
        assert!(found[0].3.ends_with("i.e. cls."));
    }

    #[test]
    fn test_metaclasses() {
        let source = "class Meta(type):\n    def __new__(cls):\n        pass\n\n    def method(self):\n        pass\n\n    @classmethod\n    def build(mcs):\n        pass\n";
        let found = check(source);
        assert_eq!(found.len(), 2);
        assert!(found[0].3.contains("'cls' used for metaclass class method"));
        assert!(found[0].3.ends_with("i.e. metacls."));
        assert!(found[1].3.contains("'self' used for metaclass instance method"));
    }

    #[test]
    fn test_unusual_signatures() {
        let source = "class C:\n    def a(*args):\n        pass\n\n    def b(**kw):\n        pass\n\n    def c(*, key):\n        pass\n\n    def d():\n        pass\n";
        let messages: Vec<_> = check(source).into_iter().map(|f| (f.0, f.3)).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].1.contains("argument *args used"));
        assert!(messages[1].1.contains("argument **kw used"));
        assert!(messages[2].1.contains("argument *, key used"));
        assert!(messages[3].1.contains("argument (none) used"));
        assert_eq!(messages[3].0, 11);
    }

    #[test]
    fn test_staticmethods_and_plain_functions_are_skipped() {
        assert!(codes("class C:\n    @staticmethod\n    def f(x):\n        pass\n").is_empty());
        assert!(codes("def f(x):\n    pass\n").is_empty());
        assert!(codes("class C:\n    async def f(self):\n        pass\n").is_empty());
    }
}
