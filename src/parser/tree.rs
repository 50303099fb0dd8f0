// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navigable syntax trees and node selectors

use std::path::{Path, PathBuf};

use thiserror::Error;
use tree_sitter::{Node, Tree};

/// Tree lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("`{parent}` at byte {offset} has no matching descendant")]
    MissingChild { parent: &'static str, offset: usize },
}

/// Node predicate
pub trait Selector {
    fn matches(&self, node: &TreeNode<'_>) -> bool;
}

impl<F> Selector for F
where
    F: Fn(&TreeNode<'_>) -> bool,
{
    fn matches(&self, node: &TreeNode<'_>) -> bool {
        self(node)
    }
}

/// Matches every node
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Selector for Any {
    fn matches(&self, _node: &TreeNode<'_>) -> bool {
        true
    }
}

/// Matches nodes of one kind
#[derive(Debug, Clone, Copy)]
pub struct Kind(pub &'static str);

impl Selector for Kind {
    fn matches(&self, node: &TreeNode<'_>) -> bool {
        node.kind() == self.0
    }
}

/// A parsed file
pub struct SyntaxTree<'s> {
    path: PathBuf,
    source: &'s str,
    tree: Tree,
}

impl<'s> SyntaxTree<'s> {
    pub(crate) fn new(path: &Path, source: &'s str, tree: Tree) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
            tree,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> TreeNode<'_> {
        TreeNode {
            node: self.tree.root_node(),
            source: self.source,
        }
    }
}

/// A named node in a [`SyntaxTree`]
///
/// Navigation only visits named nodes; punctuation and keywords are skipped.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> TreeNode<'t> {
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    /// Direct named children matching `selector`, in source order.
    pub fn children<S: Selector + ?Sized>(&self, selector: &S) -> Vec<TreeNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| self.wrap(node))
            .filter(|child| selector.matches(child))
            .collect()
    }

    /// First named descendant matching `selector`, in pre-order.
    pub fn child<S: Selector + ?Sized>(&self, selector: &S) -> Result<TreeNode<'t>, TreeError> {
        let mut cursor = self.node.walk();
        let mut stack: Vec<Node<'t>> = self.node.named_children(&mut cursor).collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            let candidate = self.wrap(node);
            if selector.matches(&candidate) {
                return Ok(candidate);
            }
            let mut cursor = node.walk();
            let start = stack.len();
            stack.extend(node.named_children(&mut cursor));
            stack[start..].reverse();
        }

        Err(TreeError::MissingChild {
            parent: self.kind(),
            offset: self.node.start_byte(),
        })
    }

    fn wrap(&self, node: Node<'t>) -> TreeNode<'t> {
        TreeNode {
            node,
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parser::{DiscardEvents, Lexer, ParseContext, Parser, StopOnFirstError, TreeSitterBackend};

    fn build(source: &str) -> SyntaxTree<'_> {
        Parser::new(StopOnFirstError, DiscardEvents)
            .build_tree(
                &TreeSitterBackend,
                &ParseContext::new(),
                Path::new("test.ts"),
                &Lexer::new(source, Dialect::Typescript),
            )
            .unwrap()
    }

    fn is_declaration(node: &TreeNode<'_>) -> bool {
        node.kind().ends_with("_declaration")
    }

    #[test]
    fn test_root_and_children() {
        let tree = build("const x: number = 1;\nfunction f() {}\n");
        let root = tree.root();
        assert_eq!(root.kind(), "program");
        assert_eq!(tree.path(), Path::new("test.ts"));

        let kinds: Vec<&str> = root.children(&Any).iter().map(TreeNode::kind).collect();
        assert_eq!(kinds, vec!["lexical_declaration", "function_declaration"]);
    }

    #[test]
    fn test_child_finds_first_descendant() {
        let tree = build("const x: number = 1;\n");
        let decl = tree.root().child(&Any).unwrap();
        assert_eq!(decl.kind(), "lexical_declaration");
        let declarator = decl.child(&Any).unwrap();
        assert_eq!(declarator.kind(), "variable_declarator");
        assert_eq!(declarator.text(), "x: number = 1");
    }

    #[test]
    fn test_kind_selector_searches_deeper() {
        let tree = build("function f() { return g(1); }\n");
        let call = tree.root().child(&Kind("call_expression")).unwrap();
        assert_eq!(call.text(), "g(1)");
    }

    #[test]
    fn test_function_selector() {
        let tree = build("a = 1;\nfunction f() {}\nclass C {}\n");
        let decls = tree.root().children(&is_declaration);
        let kinds: Vec<&str> = decls.iter().map(TreeNode::kind).collect();
        assert_eq!(kinds, vec!["function_declaration", "class_declaration"]);
    }

    #[test]
    fn test_missing_child_is_typed() {
        let tree = build("// only a comment\n");
        let comment = tree.root().child(&Any).unwrap();
        assert_eq!(comment.kind(), "comment");
        let err = comment.child(&Any).unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingChild {
                parent: "comment",
                offset: 0
            }
        );
    }
}
