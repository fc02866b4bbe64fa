//! Python source to [`crate::ast::Module`].
//!
//! Parsing is done by tree-sitter-python; the concrete tree is then lowered
//! into the `ast`-shaped types the checker walks. A tree containing any
//! error or missing node is rejected as a whole.

mod lower;
mod strings;

use tree_sitter::{Language, Node, Parser};

use crate::ast::Module;
use lower::Lowerer;

/// Errors produced while turning source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load the Python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("the parser returned no tree")]
    NoTree,

    /// Line is 1-indexed, column 0-indexed.
    #[error("invalid syntax at {line}:{column}")]
    Syntax { line: usize, column: usize },
}

pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    pub fn parse(&self, source: &str) -> Result<Module, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ParseError::Syntax {
                line: at.row + 1,
                column: at.column,
            });
        }

        Ok(Lowerer::new(source.as_bytes()).module(root))
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete module.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    PythonParser::new().parse(source)
}

/// Leftmost error or missing node, searched depth first.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, ExprKind, StmtKind, UnaryOp};

    fn parse(source: &str) -> Module {
        parse_module(source).expect("source should parse")
    }

    fn only_expr(module: &Module) -> &ExprKind {
        match &module.body[0].kind {
            StmtKind::Expr { value } => &value.kind,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_syntax() {
        let err = parse_module("def f(:\n    pass\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_chained_assignment() {
        let module = parse("a = b = 1\n");
        match &module.body[0].kind {
            StmtKind::Assign { targets, value } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(targets[0].as_name(), Some("a"));
                assert_eq!(targets[1].as_name(), Some("b"));
                assert_eq!(value.kind, ExprKind::Constant(Constant::Int("1".into())));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_annotated_assignment() {
        let module = parse("x: int = 3\n");
        assert!(matches!(module.body[0].kind, StmtKind::AnnAssign { .. }));
    }

    #[test]
    fn test_elif_becomes_nested_if() {
        let module = parse("if a:\n    pass\nelif b:\n    pass\nelse:\n    x = 1\n");
        let StmtKind::If { orelse, .. } = &module.body[0].kind else {
            panic!("expected if");
        };
        assert_eq!(orelse.len(), 1);
        assert_eq!(orelse[0].pos.line, 3);
        let StmtKind::If { orelse: inner, .. } = &orelse[0].kind else {
            panic!("expected nested if");
        };
        assert!(matches!(inner[0].kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn test_except_clause_forms() {
        let module = parse(
            "try:\n    pass\nexcept:\n    pass\nexcept (A, B) as e:\n    pass\nexcept C:\n    pass\n",
        );
        let StmtKind::Try(t) = &module.body[0].kind else {
            panic!("expected try");
        };
        assert_eq!(t.handlers.len(), 3);
        assert!(t.handlers[0].type_.is_none());
        assert_eq!(t.handlers[0].pos.line, 3);
        let second = t.handlers[1].type_.as_ref().unwrap();
        assert!(matches!(&second.kind, ExprKind::Tuple { elts } if elts.len() == 2));
        assert_eq!(t.handlers[1].name.as_deref(), Some("e"));
        assert_eq!(t.handlers[2].type_.as_ref().unwrap().as_name(), Some("C"));
    }

    #[test]
    fn test_parameters() {
        let module = parse("def f(a, b=[], /, c=1, *args, d, e=None, **kw):\n    pass\n");
        let StmtKind::FunctionDef(def) = &module.body[0].kind else {
            panic!("expected def");
        };
        let args = &def.args;
        assert_eq!(args.posonlyargs.len(), 2);
        assert_eq!(args.args.len(), 1);
        assert_eq!(args.defaults.len(), 2);
        assert_eq!(args.vararg.as_ref().unwrap().name, "args");
        assert_eq!(args.kwonlyargs.len(), 2);
        assert!(args.kw_defaults[0].is_none());
        assert!(args.kw_defaults[1].is_some());
        assert_eq!(args.kwarg.as_ref().unwrap().name, "kw");
        assert!(!def.is_async);
    }

    #[test]
    fn test_async_def_and_decorators() {
        let module = parse("@staticmethod\nasync def f():\n    pass\n");
        let StmtKind::FunctionDef(def) = &module.body[0].kind else {
            panic!("expected def");
        };
        assert!(def.is_async);
        assert_eq!(def.decorator_list[0].as_name(), Some("staticmethod"));
        assert_eq!(module.body[0].pos.line, 2);
    }

    #[test]
    fn test_unary_plus_nesting() {
        let module = parse("++n\n");
        let ExprKind::UnaryOp { op, operand } = only_expr(&module) else {
            panic!("expected unary op");
        };
        assert_eq!(*op, UnaryOp::UAdd);
        assert!(matches!(
            operand.kind,
            ExprKind::UnaryOp {
                op: UnaryOp::UAdd,
                ..
            }
        ));
    }

    #[test]
    fn test_string_literals() {
        let module = parse("'a\\tb'\n");
        assert_eq!(
            only_expr(&module),
            &ExprKind::Constant(Constant::Str("a\tb".into()))
        );

        let module = parse("r'\\d'\n");
        assert_eq!(
            only_expr(&module),
            &ExprKind::Constant(Constant::Str("\\d".into()))
        );

        let module = parse("b'ab'\n");
        assert_eq!(
            only_expr(&module),
            &ExprKind::Constant(Constant::Bytes(b"ab".to_vec()))
        );

        let module = parse("'a' 'b'\n");
        assert_eq!(
            only_expr(&module),
            &ExprKind::Constant(Constant::Str("ab".into()))
        );

        let module = parse("f'{x}'\n");
        assert!(matches!(only_expr(&module), ExprKind::JoinedStr { values } if values.len() == 1));
    }

    #[test]
    fn test_parentheses_are_dropped() {
        let module = parse("x = (1)\n");
        let StmtKind::Assign { value, .. } = &module.body[0].kind else {
            panic!("expected assign");
        };
        assert_eq!(value.kind, ExprKind::Constant(Constant::Int("1".into())));
        assert_eq!(value.pos.column, 5);
    }

    #[test]
    fn test_bool_op_is_flattened() {
        let module = parse("a and b and c\n");
        assert!(matches!(
            only_expr(&module),
            ExprKind::BoolOp { values, .. } if values.len() == 3
        ));
    }

    #[test]
    fn test_with_items() {
        let module = parse("with a() as b, c:\n    pass\n");
        let StmtKind::With(with) = &module.body[0].kind else {
            panic!("expected with");
        };
        assert_eq!(with.items.len(), 2);
        assert_eq!(
            with.items[0].optional_vars.as_ref().and_then(|v| v.as_name()),
            Some("b")
        );
        assert!(with.items[1].optional_vars.is_none());
    }
}
