use std::collections::BTreeMap;

use crate::ast::{ExprKind, NodeRef, Position};

/// Collects every bare-name reference in a subtree.
#[derive(Debug, Default)]
pub struct NameFinder {
    names: BTreeMap<String, Vec<Position>>,
}

impl NameFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit(&mut self, node: NodeRef<'_>) {
        if let NodeRef::Expr(expr) = node {
            if let ExprKind::Name { id } = &expr.kind {
                self.names.entry(id.clone()).or_default().push(expr.pos);
            }
        }
        for child in node.children() {
            self.visit(child);
        }
    }

    pub fn visit_all<'a>(&mut self, nodes: impl IntoIterator<Item = NodeRef<'a>>) {
        for node in nodes {
            self.visit(node);
        }
    }

    /// Name → positions in visit order.
    pub fn names(&self) -> &BTreeMap<String, Vec<Position>> {
        &self.names
    }

    pub fn into_names(self) -> BTreeMap<String, Vec<Position>> {
        self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;

    #[test]
    fn test_collects_names_in_visit_order() {
        let module = parse_module("a = b + a.c\nprint(a)\n").unwrap();
        let mut finder = NameFinder::new();
        finder.visit(NodeRef::Module(&module));
        let names = finder.into_names();

        assert_eq!(names.keys().collect::<Vec<_>>(), vec!["a", "b", "print"]);
        let a: Vec<_> = names["a"].iter().map(|p| (p.line, p.column)).collect();
        assert_eq!(a, vec![(1, 0), (1, 8), (2, 6)]);
    }

    #[test]
    fn test_attribute_names_are_not_references() {
        let module = parse_module("x.y.z\n").unwrap();
        let mut finder = NameFinder::new();
        finder.visit(NodeRef::Module(&module));
        assert!(finder.names().contains_key("x"));
        assert!(!finder.names().contains_key("y"));
    }
}
