//! Lowering of tree-sitter-python concrete syntax into [`crate::ast`].
//!
//! tree-sitter keeps punctuation, parentheses and comments; Python's `ast`
//! does not. Everything here exists to close that gap: parenthesized
//! expressions collapse to their contents, comma lists become tuples, `elif`
//! chains become nested `If` statements and string literals are decoded.

use tree_sitter::Node;

use super::strings::{self, StringPrefix};
use crate::ast::*;

/// Named nodes that tree-sitter allows anywhere and `ast` drops.
fn is_trivia(kind: &str) -> bool {
    matches!(kind, "comment" | "line_continuation")
}

fn pos(node: Node) -> Position {
    let start = node.start_position();
    Position::new(start.row + 1, start.column)
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_trivia(c.kind()))
        .collect()
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

fn field_nodes<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let nodes = node.children_by_field_name(field, &mut cursor).collect();
    nodes
}

pub(super) struct Lowerer<'s> {
    source: &'s [u8],
}

impl<'s> Lowerer<'s> {
    pub fn new(source: &'s [u8]) -> Self {
        Self { source }
    }

    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    pub fn module(&self, root: Node) -> Module {
        Module {
            body: self.block(root),
        }
    }

    fn block(&self, node: Node) -> Vec<Stmt> {
        named_children(node)
            .into_iter()
            .filter_map(|child| self.stmt(child))
            .collect()
    }

    /// Statements of a suite stored under `field`, falling back to the first
    /// `block` child.
    fn suite(&self, node: Node, field: &str) -> Vec<Stmt> {
        let block = node
            .child_by_field_name(field)
            .or_else(|| named_children(node).into_iter().find(|c| c.kind() == "block"));
        block.map(|b| self.block(b)).unwrap_or_default()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn stmt(&self, node: Node) -> Option<Stmt> {
        let kind = match node.kind() {
            "expression_statement" => self.expression_statement(node)?,
            "return_statement" => StmtKind::Return {
                value: named_children(node).first().map(|v| self.expr(*v)),
            },
            "delete_statement" => StmtKind::Delete {
                targets: named_children(node)
                    .into_iter()
                    .flat_map(|t| self.flatten_list(t))
                    .collect(),
            },
            "raise_statement" => {
                let cause = node.child_by_field_name("cause");
                let exc = named_children(node)
                    .into_iter()
                    .find(|c| Some(*c) != cause)
                    .map(|c| self.expr(c));
                StmtKind::Raise {
                    exc,
                    cause: cause.map(|c| self.expr(c)),
                }
            }
            "pass_statement" => StmtKind::Pass,
            "break_statement" => StmtKind::Break,
            "continue_statement" => StmtKind::Continue,
            "assert_statement" => {
                let mut parts = named_children(node).into_iter();
                StmtKind::Assert {
                    test: self.expr(parts.next()?),
                    msg: parts.next().map(|m| self.expr(m)),
                }
            }
            "global_statement" => StmtKind::Global {
                names: self.texts(named_children(node)),
            },
            "nonlocal_statement" => StmtKind::Nonlocal {
                names: self.texts(named_children(node)),
            },
            "import_statement" => StmtKind::Import {
                names: self.texts(named_children(node)),
            },
            "import_from_statement" => {
                let module = node.child_by_field_name("module_name");
                StmtKind::ImportFrom {
                    module: module.map(|m| self.text(m).to_string()),
                    names: self.texts(
                        named_children(node)
                            .into_iter()
                            .filter(|c| Some(*c) != module)
                            .collect(),
                    ),
                }
            }
            "future_import_statement" => StmtKind::ImportFrom {
                module: Some("__future__".to_string()),
                names: self.texts(named_children(node)),
            },
            "print_statement" | "exec_statement" => {
                let func = node.kind().trim_end_matches("_statement");
                StmtKind::Expr {
                    value: Expr::new(
                        pos(node),
                        ExprKind::Call {
                            func: Box::new(Expr::new(
                                pos(node),
                                ExprKind::Name {
                                    id: func.to_string(),
                                },
                            )),
                            args: self.exprs(named_children(node)),
                            keywords: vec![],
                        },
                    ),
                }
            }
            "if_statement" => self.if_statement(node)?,
            "for_statement" => StmtKind::For(For {
                target: self.expr(node.child_by_field_name("left")?),
                iter: self.expr_list(field_nodes(node, "right"))?,
                body: self.suite(node, "body"),
                orelse: self.else_suite(node),
                is_async: has_token(node, "async"),
            }),
            "while_statement" => StmtKind::While {
                test: self.expr(node.child_by_field_name("condition")?),
                body: self.suite(node, "body"),
                orelse: self.else_suite(node),
            },
            "try_statement" => StmtKind::Try(self.try_statement(node)),
            "with_statement" => StmtKind::With(self.with_statement(node)),
            "function_definition" => StmtKind::FunctionDef(self.function_def(node, vec![])?),
            "class_definition" => StmtKind::ClassDef(self.class_def(node, vec![])?),
            "decorated_definition" => return self.decorated_definition(node),
            "match_statement" => self.match_statement(node)?,
            // `type X = ...` aliases and anything unrecognised carry nothing
            // the checks look at.
            _ => return None,
        };
        Some(Stmt::new(pos(node), kind))
    }

    fn expression_statement(&self, node: Node) -> Option<StmtKind> {
        let children = named_children(node);
        if children.len() > 1 {
            return Some(StmtKind::Expr {
                value: Expr::new(
                    pos(node),
                    ExprKind::Tuple {
                        elts: self.exprs(children),
                    },
                ),
            });
        }
        let child = *children.first()?;
        let kind = match child.kind() {
            "assignment" => self.assignment(child)?,
            "augmented_assignment" => StmtKind::AugAssign {
                target: self.expr(child.child_by_field_name("left")?),
                value: self.expr(child.child_by_field_name("right")?),
            },
            _ => StmtKind::Expr {
                value: self.expr(child),
            },
        };
        Some(kind)
    }

    /// `a = b = value` becomes one `Assign` with two targets; an annotated
    /// assignment becomes `AnnAssign`.
    fn assignment(&self, node: Node) -> Option<StmtKind> {
        let left = node.child_by_field_name("left")?;
        if let Some(annotation) = node.child_by_field_name("type") {
            return Some(StmtKind::AnnAssign {
                target: self.expr(left),
                annotation: self.expr(annotation),
                value: node.child_by_field_name("right").map(|r| self.expr(r)),
            });
        }

        let mut targets = vec![self.expr(left)];
        let mut value = node.child_by_field_name("right")?;
        while value.kind() == "assignment" && value.child_by_field_name("type").is_none() {
            let (Some(next_left), Some(next_right)) = (
                value.child_by_field_name("left"),
                value.child_by_field_name("right"),
            ) else {
                break;
            };
            targets.push(self.expr(next_left));
            value = next_right;
        }
        Some(StmtKind::Assign {
            targets,
            value: self.expr(value),
        })
    }

    fn if_statement(&self, node: Node) -> Option<StmtKind> {
        let mut orelse = Vec::new();
        for alternative in field_nodes(node, "alternative").into_iter().rev() {
            match alternative.kind() {
                "else_clause" => orelse = self.suite(alternative, "body"),
                "elif_clause" => {
                    let Some(condition) = alternative.child_by_field_name("condition") else {
                        continue;
                    };
                    let nested = StmtKind::If {
                        test: self.expr(condition),
                        body: self.suite(alternative, "consequence"),
                        orelse,
                    };
                    orelse = vec![Stmt::new(pos(alternative), nested)];
                }
                _ => {}
            }
        }
        Some(StmtKind::If {
            test: self.expr(node.child_by_field_name("condition")?),
            body: self.suite(node, "consequence"),
            orelse,
        })
    }

    fn else_suite(&self, node: Node) -> Vec<Stmt> {
        node.child_by_field_name("alternative")
            .map(|alt| self.suite(alt, "body"))
            .unwrap_or_default()
    }

    fn try_statement(&self, node: Node) -> Try {
        let mut result = Try {
            body: self.suite(node, "body"),
            handlers: Vec::new(),
            orelse: Vec::new(),
            finalbody: Vec::new(),
            is_star: false,
        };
        for child in named_children(node) {
            match child.kind() {
                "except_clause" => result.handlers.push(self.except_handler(child)),
                "except_group_clause" => {
                    result.is_star = true;
                    result.handlers.push(self.except_handler(child));
                }
                "else_clause" => result.orelse = self.suite(child, "body"),
                "finally_clause" => result.finalbody = self.suite(child, "body"),
                _ => {}
            }
        }
        result
    }

    fn except_handler(&self, node: Node) -> ExceptHandler {
        let parts = named_children(node);
        let body = parts
            .iter()
            .find(|c| c.kind() == "block")
            .map(|b| self.block(*b))
            .unwrap_or_default();
        let heads: Vec<_> = parts.into_iter().filter(|c| c.kind() != "block").collect();

        let (type_, name) = match heads.first() {
            Some(head) if head.kind() == "as_pattern" => {
                let inner = named_children(*head);
                let alias = head
                    .child_by_field_name("alias")
                    .or_else(|| inner.get(1).copied());
                (
                    inner.first().map(|t| self.expr(*t)),
                    alias.map(|a| self.text(a).to_string()),
                )
            }
            Some(head) => (
                Some(self.expr(*head)),
                heads.get(1).map(|n| self.text(*n).to_string()),
            ),
            None => (None, None),
        };

        ExceptHandler {
            pos: pos(node),
            type_,
            name,
            body,
        }
    }

    fn with_statement(&self, node: Node) -> With {
        let mut items = Vec::new();
        let clause = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "with_clause");
        if let Some(clause) = clause {
            for item in named_children(clause) {
                if item.kind() == "with_item" {
                    if let Some(item) = self.with_item(item) {
                        items.push(item);
                    }
                }
            }
        }
        With {
            items,
            body: self.suite(node, "body"),
            is_async: has_token(node, "async"),
        }
    }

    fn with_item(&self, node: Node) -> Option<WithItem> {
        let value = node
            .child_by_field_name("value")
            .or_else(|| named_children(node).into_iter().next())?;
        if value.kind() == "as_pattern" {
            let inner = named_children(value);
            let target = value
                .child_by_field_name("alias")
                .or_else(|| inner.get(1).copied());
            return Some(WithItem {
                context_expr: self.expr(*inner.first()?),
                optional_vars: target.map(|t| self.expr(t)),
            });
        }
        Some(WithItem {
            context_expr: self.expr(value),
            optional_vars: node.child_by_field_name("alias").map(|a| self.expr(a)),
        })
    }

    fn function_def(&self, node: Node, decorator_list: Vec<Expr>) -> Option<FunctionDef> {
        Some(FunctionDef {
            name: self.text(node.child_by_field_name("name")?).to_string(),
            args: self.parameters(node.child_by_field_name("parameters")),
            body: self.suite(node, "body"),
            decorator_list,
            returns: node.child_by_field_name("return_type").map(|r| self.expr(r)),
            is_async: has_token(node, "async"),
        })
    }

    fn class_def(&self, node: Node, decorator_list: Vec<Expr>) -> Option<ClassDef> {
        let (bases, keywords) = node
            .child_by_field_name("superclasses")
            .map(|s| self.call_arguments(s))
            .unwrap_or_default();
        Some(ClassDef {
            name: self.text(node.child_by_field_name("name")?).to_string(),
            bases,
            keywords,
            body: self.suite(node, "body"),
            decorator_list,
        })
    }

    fn decorated_definition(&self, node: Node) -> Option<Stmt> {
        let children = named_children(node);
        let decorators = children
            .iter()
            .filter(|c| c.kind() == "decorator")
            .filter_map(|d| named_children(*d).first().map(|e| self.expr(*e)))
            .collect();
        let definition = node
            .child_by_field_name("definition")
            .or_else(|| children.iter().rev().find(|c| c.kind() != "decorator").copied())?;
        let kind = match definition.kind() {
            "function_definition" => {
                StmtKind::FunctionDef(self.function_def(definition, decorators)?)
            }
            "class_definition" => StmtKind::ClassDef(self.class_def(definition, decorators)?),
            _ => return None,
        };
        Some(Stmt::new(pos(definition), kind))
    }

    fn match_statement(&self, node: Node) -> Option<StmtKind> {
        let subject = self.expr_list(field_nodes(node, "subject"))?;
        let mut cases = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for case in named_children(body) {
                if case.kind() != "case_clause" {
                    continue;
                }
                let guard = named_children(case)
                    .into_iter()
                    .find(|c| c.kind() == "if_clause")
                    .and_then(|g| named_children(g).first().map(|e| self.expr(*e)));
                cases.push(MatchCase {
                    guard,
                    body: self.suite(case, "consequence"),
                });
            }
        }
        Some(StmtKind::Match { subject, cases })
    }

    // =========================================================================
    // Parameters and arguments
    // =========================================================================

    fn parameters(&self, node: Option<Node>) -> Arguments {
        let mut args = Arguments::default();
        let Some(node) = node else {
            return args;
        };
        let mut keyword_only = false;

        for param in named_children(node) {
            match param.kind() {
                "identifier" => push_param(&mut args, keyword_only, self.arg(param, None), None),
                "typed_parameter" => {
                    let annotation = param.child_by_field_name("type").map(|t| self.expr(t));
                    let Some(inner) = named_children(param).into_iter().next() else {
                        continue;
                    };
                    match inner.kind() {
                        "list_splat_pattern" => {
                            args.vararg = self.splat_arg(inner, annotation);
                            keyword_only = true;
                        }
                        "dictionary_splat_pattern" => {
                            args.kwarg = self.splat_arg(inner, annotation);
                        }
                        _ => push_param(&mut args, keyword_only, self.arg(inner, annotation), None),
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let (Some(name), Some(value)) = (
                        param.child_by_field_name("name"),
                        param.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    let annotation = param.child_by_field_name("type").map(|t| self.expr(t));
                    push_param(
                        &mut args,
                        keyword_only,
                        self.arg(name, annotation),
                        Some(self.expr(value)),
                    );
                }
                "list_splat_pattern" => {
                    args.vararg = self.splat_arg(param, None);
                    keyword_only = true;
                }
                "dictionary_splat_pattern" => args.kwarg = self.splat_arg(param, None),
                "keyword_separator" => keyword_only = true,
                "positional_separator" => {
                    let positional = std::mem::take(&mut args.args);
                    args.posonlyargs.extend(positional);
                }
                _ => {}
            }
        }
        args
    }

    fn arg(&self, name: Node, annotation: Option<Expr>) -> Arg {
        Arg {
            pos: pos(name),
            name: self.text(name).to_string(),
            annotation,
        }
    }

    /// `*args` / `**kwargs`; the position is the name's, not the star's.
    fn splat_arg(&self, node: Node, annotation: Option<Expr>) -> Option<Arg> {
        let name = named_children(node).into_iter().next()?;
        Some(self.arg(name, annotation))
    }

    fn call_arguments(&self, node: Node) -> (Vec<Expr>, Vec<Keyword>) {
        if node.kind() == "generator_expression" {
            return (vec![self.expr(node)], vec![]);
        }
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "keyword_argument" => {
                    let (Some(name), Some(value)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    keywords.push(Keyword {
                        pos: pos(child),
                        arg: Some(self.text(name).to_string()),
                        value: self.expr(value),
                    });
                }
                "dictionary_splat" => {
                    if let Some(value) = named_children(child).into_iter().next() {
                        keywords.push(Keyword {
                            pos: pos(child),
                            arg: None,
                            value: self.expr(value),
                        });
                    }
                }
                _ => args.push(self.expr(child)),
            }
        }
        (args, keywords)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn exprs(&self, nodes: Vec<Node>) -> Vec<Expr> {
        nodes.into_iter().map(|n| self.expr(n)).collect()
    }

    fn texts(&self, nodes: Vec<Node>) -> Vec<String> {
        nodes
            .into_iter()
            .map(|n| self.text(n).to_string())
            .collect()
    }

    /// One expression, or a tuple when a field repeats (`for x in a, b:`).
    fn expr_list(&self, nodes: Vec<Node>) -> Option<Expr> {
        match nodes.len() {
            0 => None,
            1 => Some(self.expr(nodes[0])),
            _ => Some(Expr::new(
                pos(nodes[0]),
                ExprKind::Tuple {
                    elts: self.exprs(nodes),
                },
            )),
        }
    }

    /// Elements of a bare comma list, or the node itself.
    fn flatten_list(&self, node: Node) -> Vec<Expr> {
        if node.kind() == "expression_list" {
            self.exprs(named_children(node))
        } else {
            vec![self.expr(node)]
        }
    }

    fn boxed(&self, node: Option<Node>, fallback: Node) -> Box<Expr> {
        match node {
            Some(n) => Box::new(self.expr(n)),
            None => Box::new(Expr::new(pos(fallback), ExprKind::Other { children: vec![] })),
        }
    }

    pub fn expr(&self, node: Node) -> Expr {
        let at = pos(node);
        let children = named_children(node);
        let kind = match node.kind() {
            "identifier" | "keyword_identifier" => ExprKind::Name {
                id: self.text(node).to_string(),
            },
            "integer" | "float" => {
                let text = self.text(node).to_string();
                if text.ends_with(['j', 'J']) {
                    ExprKind::Constant(Constant::Complex(text))
                } else if node.kind() == "integer" {
                    ExprKind::Constant(Constant::Int(text))
                } else {
                    ExprKind::Constant(Constant::Float(text))
                }
            }
            "true" => ExprKind::Constant(Constant::Bool(true)),
            "false" => ExprKind::Constant(Constant::Bool(false)),
            "none" => ExprKind::Constant(Constant::None),
            "ellipsis" => ExprKind::Constant(Constant::Ellipsis),
            "string" => self.string(node),
            "concatenated_string" => self.concatenated_string(children),
            "parenthesized_expression" | "parenthesized_list_splat" | "type" | "as_pattern" => {
                match children.first() {
                    Some(inner) if children.len() == 1 || node.kind() == "as_pattern" => {
                        return self.expr(*inner)
                    }
                    _ => ExprKind::Other {
                        children: self.exprs(children),
                    },
                }
            }
            "as_pattern_target" => match children.len() {
                0 => ExprKind::Name {
                    id: self.text(node).to_string(),
                },
                1 => return self.expr(children[0]),
                _ => ExprKind::Tuple {
                    elts: self.exprs(children),
                },
            },
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => ExprKind::Tuple {
                elts: self.exprs(children),
            },
            "list" | "list_pattern" => ExprKind::List {
                elts: self.exprs(children),
            },
            "set" => ExprKind::Set {
                elts: self.exprs(children),
            },
            "dictionary" => self.dictionary(children),
            "list_splat" | "list_splat_pattern" => ExprKind::Starred {
                value: self.boxed(children.first().copied(), node),
            },
            "attribute" => match (
                node.child_by_field_name("object"),
                node.child_by_field_name("attribute"),
            ) {
                (Some(object), Some(attr)) => ExprKind::Attribute {
                    value: Box::new(self.expr(object)),
                    attr: self.text(attr).to_string(),
                },
                _ => ExprKind::Other {
                    children: self.exprs(children),
                },
            },
            "subscript" => {
                let value = node.child_by_field_name("value");
                let slice = self.expr_list(field_nodes(node, "subscript"));
                match (value, slice) {
                    (Some(value), Some(slice)) => ExprKind::Subscript {
                        value: Box::new(self.expr(value)),
                        slice: Box::new(slice),
                    },
                    _ => ExprKind::Other {
                        children: self.exprs(children),
                    },
                }
            }
            "slice" => self.slice(node),
            "call" => {
                let (args, keywords) = node
                    .child_by_field_name("arguments")
                    .map(|a| self.call_arguments(a))
                    .unwrap_or_default();
                ExprKind::Call {
                    func: self.boxed(node.child_by_field_name("function"), node),
                    args,
                    keywords,
                }
            }
            "unary_operator" => {
                let op = match node.child_by_field_name("operator").map(|o| self.text(o)) {
                    Some("-") => UnaryOp::USub,
                    Some("~") => UnaryOp::Invert,
                    _ => UnaryOp::UAdd,
                };
                ExprKind::UnaryOp {
                    op,
                    operand: self.boxed(node.child_by_field_name("argument"), node),
                }
            }
            "not_operator" => ExprKind::UnaryOp {
                op: UnaryOp::Not,
                operand: self.boxed(node.child_by_field_name("argument"), node),
            },
            "binary_operator" => ExprKind::BinOp {
                left: self.boxed(node.child_by_field_name("left"), node),
                op: node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default(),
                right: self.boxed(node.child_by_field_name("right"), node),
            },
            "boolean_operator" => self.boolean_operator(node),
            "comparison_operator" => {
                let mut operands = self.exprs(children).into_iter();
                match operands.next() {
                    Some(left) => ExprKind::Compare {
                        left: Box::new(left),
                        comparators: operands.collect(),
                    },
                    None => ExprKind::Other { children: vec![] },
                }
            }
            "conditional_expression" if children.len() == 3 => {
                let mut parts = self.exprs(children).into_iter();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(body), Some(test), Some(orelse)) => ExprKind::IfExp {
                        test: Box::new(test),
                        body: Box::new(body),
                        orelse: Box::new(orelse),
                    },
                    _ => ExprKind::Other { children: vec![] },
                }
            }
            "named_expression" => ExprKind::NamedExpr {
                target: self.boxed(node.child_by_field_name("name"), node),
                value: self.boxed(node.child_by_field_name("value"), node),
            },
            "lambda" => ExprKind::Lambda {
                args: Box::new(self.parameters(node.child_by_field_name("parameters"))),
                body: self.boxed(node.child_by_field_name("body"), node),
            },
            "await" => ExprKind::Await {
                value: self.boxed(children.first().copied(), node),
            },
            "yield" => {
                if has_token(node, "from") {
                    ExprKind::YieldFrom {
                        value: self.boxed(children.first().copied(), node),
                    }
                } else {
                    ExprKind::Yield {
                        value: children.first().map(|v| Box::new(self.expr(*v))),
                    }
                }
            }
            "list_comprehension" | "set_comprehension" | "generator_expression" => {
                let elt = self.boxed(node.child_by_field_name("body"), node);
                let generators = self.generators(children);
                match node.kind() {
                    "list_comprehension" => ExprKind::ListComp { elt, generators },
                    "set_comprehension" => ExprKind::SetComp { elt, generators },
                    _ => ExprKind::GeneratorExp { elt, generators },
                }
            }
            "dictionary_comprehension" => {
                let pair = node.child_by_field_name("body");
                ExprKind::DictComp {
                    key: self.boxed(pair.and_then(|p| p.child_by_field_name("key")), node),
                    value: self.boxed(pair.and_then(|p| p.child_by_field_name("value")), node),
                    generators: self.generators(children),
                }
            }
            _ => ExprKind::Other {
                children: self.exprs(children),
            },
        };
        Expr::new(at, kind)
    }

    fn dictionary(&self, children: Vec<Node>) -> ExprKind {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for entry in children {
            match entry.kind() {
                "pair" => {
                    let (Some(key), Some(value)) = (
                        entry.child_by_field_name("key"),
                        entry.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    keys.push(Some(self.expr(key)));
                    values.push(self.expr(value));
                }
                "dictionary_splat" => {
                    if let Some(value) = named_children(entry).into_iter().next() {
                        keys.push(None);
                        values.push(self.expr(value));
                    }
                }
                _ => {}
            }
        }
        ExprKind::Dict { keys, values }
    }

    /// `a and b and c` is one `BoolOp` with three values.
    fn boolean_operator(&self, node: Node) -> ExprKind {
        let operator = node.child_by_field_name("operator").map(|o| self.text(o));
        let op = if operator == Some("or") {
            BoolOp::Or
        } else {
            BoolOp::And
        };

        let mut values = Vec::new();
        if let Some(left) = node.child_by_field_name("left") {
            let left = self.expr(left);
            match left.kind {
                ExprKind::BoolOp {
                    op: left_op,
                    values: left_values,
                } if left_op == op && !self.is_parenthesized(node) => {
                    values.extend(left_values)
                }
                kind => values.push(Expr::new(left.pos, kind)),
            }
        }
        if let Some(right) = node.child_by_field_name("right") {
            values.push(self.expr(right));
        }
        ExprKind::BoolOp { op, values }
    }

    /// Whether the left operand of `node` was written in parentheses.
    fn is_parenthesized(&self, node: Node) -> bool {
        node.child_by_field_name("left")
            .map(|l| l.kind() == "parenthesized_expression")
            .unwrap_or(false)
    }

    fn slice(&self, node: Node) -> ExprKind {
        let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut colons = 0;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() {
                if child.kind() == ":" {
                    colons += 1;
                }
                continue;
            }
            if is_trivia(child.kind()) || colons > 2 {
                continue;
            }
            parts[colons] = Some(Box::new(self.expr(child)));
        }
        let [lower, upper, step] = parts;
        ExprKind::Slice { lower, upper, step }
    }

    fn generators(&self, children: Vec<Node>) -> Vec<Comprehension> {
        let mut generators: Vec<Comprehension> = Vec::new();
        for clause in children {
            match clause.kind() {
                "for_in_clause" => {
                    let (Some(target), Some(iter)) = (
                        clause.child_by_field_name("left"),
                        self.expr_list(field_nodes(clause, "right")),
                    ) else {
                        continue;
                    };
                    generators.push(Comprehension {
                        target: self.expr(target),
                        iter,
                        ifs: Vec::new(),
                        is_async: has_token(clause, "async"),
                    });
                }
                "if_clause" => {
                    let condition = named_children(clause).into_iter().next();
                    if let (Some(last), Some(condition)) = (generators.last_mut(), condition) {
                        last.ifs.push(self.expr(condition));
                    }
                }
                _ => {}
            }
        }
        generators
    }

    // =========================================================================
    // Strings
    // =========================================================================

    fn string(&self, node: Node) -> ExprKind {
        let text = self.text(node);
        let prefix_len = text
            .find(['"', '\''])
            .unwrap_or(0);
        let prefix = StringPrefix::from_start_token(&text[..prefix_len]);

        if prefix.format {
            return ExprKind::JoinedStr {
                values: self.interpolations(node),
            };
        }

        let quoted = &text[prefix_len..];
        let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            3
        } else {
            1
        };
        let body = if quoted.len() >= 2 * quote_len {
            &quoted[quote_len..quoted.len() - quote_len]
        } else {
            ""
        };
        let decoded = if prefix.raw {
            body.to_string()
        } else {
            strings::unescape(body, prefix.bytes)
        };

        if prefix.bytes {
            ExprKind::Constant(Constant::Bytes(strings::to_bytes(&decoded)))
        } else {
            ExprKind::Constant(Constant::Str(decoded))
        }
    }

    fn interpolations(&self, node: Node) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "interpolation")
            .filter_map(|i| {
                i.child_by_field_name("expression")
                    .or_else(|| named_children(i).into_iter().next())
            })
            .map(|e| self.expr(e))
            .collect()
    }

    /// Implicitly concatenated literals: `"a" "b"`, `b"a" b"b"`, `"a" f"{b}"`.
    fn concatenated_string(&self, parts: Vec<Node>) -> ExprKind {
        let lowered: Vec<ExprKind> = parts.into_iter().map(|p| self.string(p)).collect();

        if lowered
            .iter()
            .any(|k| matches!(k, ExprKind::JoinedStr { .. }))
        {
            let values = lowered
                .into_iter()
                .flat_map(|k| match k {
                    ExprKind::JoinedStr { values } => values,
                    _ => Vec::new(),
                })
                .collect();
            return ExprKind::JoinedStr { values };
        }

        let mut text = String::new();
        let mut bytes = Vec::new();
        let mut saw_str = false;
        let mut saw_bytes = false;
        for kind in lowered {
            match kind {
                ExprKind::Constant(Constant::Str(s)) => {
                    saw_str = true;
                    text.push_str(&s);
                }
                ExprKind::Constant(Constant::Bytes(b)) => {
                    saw_bytes = true;
                    bytes.extend(b);
                }
                _ => {}
            }
        }
        match (saw_str, saw_bytes) {
            (_, false) => ExprKind::Constant(Constant::Str(text)),
            (false, true) => ExprKind::Constant(Constant::Bytes(bytes)),
            (true, true) => ExprKind::Other { children: vec![] },
        }
    }
}

fn push_param(args: &mut Arguments, keyword_only: bool, arg: Arg, default: Option<Expr>) {
    if keyword_only {
        args.kwonlyargs.push(arg);
        args.kw_defaults.push(default);
    } else {
        args.args.push(arg);
        if let Some(default) = default {
            args.defaults.push(default);
        }
    }
}
