//! Iterative traversal of function bodies, marking bindings as used.
//!
//! Nested statements and expressions are flattened into one queue instead
//! of being visited recursively, so the native stack stays flat no matter
//! how deeply the body nests. Every node is dequeued once and replaced by
//! the nodes it contains.

use std::collections::VecDeque;
use rowan::TextSize;
use crate::{
    collector::Collector,
    resolve::Resolution,
    scope::Scope,
    syntax::{children_of_kind, SyntaxKind::{self, *}, SyntaxNode},
};

/// A function or closure body waiting to be walked against its own scope
#[derive(Debug, Clone)]
pub struct Job {
    /// reported as the enclosing name of unused bindings
    pub name: String,
    /// start of the declaration, reported as its line
    pub start: TextSize,
    pub scope: Scope,
    pub body: Vec<SyntaxNode>,
}

#[derive(Debug, Clone)]
struct WorkItem {
    node: SyntaxNode,
    /// part of a closure body re-walked against the enclosing scope
    captures_only: bool,
}

pub struct Walker<'a> {
    resolution: &'a Resolution,
    scope: &'a mut Scope,
    collector: &'a mut Collector,
    /// closures found bound to names, to be walked as jobs of their own
    pub(crate) closures: &'a mut Vec<Job>,
    worklist: VecDeque<WorkItem>,
}

impl<'a> Walker<'a> {
    pub fn new(
        resolution: &'a Resolution,
        scope: &'a mut Scope,
        collector: &'a mut Collector,
        closures: &'a mut Vec<Job>,
    ) -> Self {
        Walker {
            resolution,
            scope,
            collector,
            closures,
            worklist: VecDeque::new(),
        }
    }

    /// Walk `body` until the worklist runs dry
    pub fn walk(mut self, body: impl IntoIterator<Item = SyntaxNode>) {
        for node in body {
            self.push(node, false);
        }
        while let Some(item) = self.worklist.pop_front() {
            self.visit(item);
        }
    }

    pub(crate) fn push(&mut self, node: SyntaxNode, captures_only: bool) {
        self.worklist.push_back(WorkItem { node, captures_only });
    }

    fn push_children(&mut self, node: &SyntaxNode, captures_only: bool) {
        for child in node.children() {
            self.push(child, captures_only);
        }
    }

    /// Queue everything but the declared names
    fn push_types(&mut self, node: &SyntaxNode, captures_only: bool) {
        for child in node.children() {
            if child.kind() != NODE_NAME {
                self.push(child, captures_only);
            }
        }
    }

    fn mark(&mut self, ident: &SyntaxNode) {
        if let Some(id) = self.resolution.resolve(ident) {
            self.scope.mark_used(id);
        }
    }

    fn visit(&mut self, WorkItem { node, captures_only }: WorkItem) {
        match node.kind() {
            // statements
            NODE_BLOCK
            | NODE_EXPR_STMT
            | NODE_SEND_STMT
            | NODE_INC_DEC_STMT
            | NODE_IF_STMT
            | NODE_FOR_STMT
            | NODE_FOR_CLAUSE
            | NODE_RANGE_CLAUSE
            | NODE_SWITCH_STMT
            | NODE_SELECT_STMT
            | NODE_CASE_CLAUSE
            | NODE_COMM_CLAUSE
            | NODE_GO_STMT
            | NODE_DEFER_STMT
            | NODE_RETURN_STMT
            | NODE_LABELED_STMT
            | NODE_VAR_DECL
            | NODE_CONST_DECL
            | NODE_TYPE_DECL =>
                self.push_children(&node, captures_only),
            NODE_BRANCH_STMT => {}
            NODE_ASSIGN_STMT | NODE_SHORT_VAR_DECL =>
                self.assignment(&node, captures_only),
            NODE_VAR_SPEC | NODE_CONST_SPEC =>
                self.value_spec(&node, captures_only),
            NODE_TYPE_SPEC => {
                for child in node.children() {
                    if !matches!(child.kind(), NODE_NAME | NODE_TYPE_PARAM_LIST) {
                        self.push(child, captures_only);
                    }
                }
            }

            // expressions
            NODE_IDENT => self.mark(&node),
            NODE_LITERAL | NODE_NAME => {}
            NODE_SELECTOR_EXPR => {
                let mut children = node.children();
                if let Some(base) = children.next() {
                    self.push(base, captures_only);
                }
                // the member only counts when it aliases a tracked binding
                for member in children {
                    self.mark(&member);
                }
            }
            NODE_EXPR_LIST
            | NODE_ARG_LIST
            | NODE_PAREN_EXPR
            | NODE_CALL_EXPR
            | NODE_INDEX_EXPR
            | NODE_SLICE_EXPR
            | NODE_TYPE_ASSERT_EXPR
            | NODE_UNARY_EXPR
            | NODE_BINARY_EXPR
            | NODE_COMPOSITE_LIT
            | NODE_LITERAL_VALUE
            | NODE_KEYED_ELEMENT =>
                self.push_children(&node, captures_only),
            // not bound to a name: its parameters are not tracked, but its
            // body may still capture from this scope
            NODE_FUNC_LIT =>
                self.push_children(&node, captures_only),

            // types
            NODE_TYPE_NAME | NODE_TYPE_PARAM_LIST => {}
            NODE_POINTER_TYPE
            | NODE_ARRAY_TYPE
            | NODE_SLICE_TYPE
            | NODE_MAP_TYPE
            | NODE_CHAN_TYPE
            | NODE_FUNC_TYPE
            | NODE_RESULT
            | NODE_PARAM_LIST
            | NODE_STRUCT_TYPE
            | NODE_INTERFACE_TYPE
            | NODE_CONSTRAINT
            | NODE_PAREN_TYPE
            | NODE_VARIADIC_TYPE =>
                self.push_children(&node, captures_only),
            // field and parameter names are not bindings of this body
            NODE_PARAM | NODE_FIELD | NODE_METHOD_SPEC =>
                self.push_types(&node, captures_only),

            _ => self.collector.shape_error(&node),
        }
    }

    /// `a, b = x, y` and `a, b := x, y`
    ///
    /// Both sides are walked: assigning to a parameter counts as using it.
    fn assignment(&mut self, node: &SyntaxNode, captures_only: bool) {
        let mut lists = children_of_kind(node, NODE_EXPR_LIST);
        let (Some(targets), Some(values)) = (lists.next(), lists.next()) else {
            self.push_children(node, captures_only);
            return;
        };
        let targets = targets.children().collect::<Vec<_>>();
        let values = values.children().collect::<Vec<_>>();
        self.bind_values(&targets, values, NODE_IDENT, captures_only);
        for target in targets {
            self.push(target, captures_only);
        }
    }

    /// `var a, b T = x, y`
    fn value_spec(&mut self, node: &SyntaxNode, captures_only: bool) {
        let mut names = Vec::new();
        let mut values = Vec::new();
        for child in node.children() {
            match child.kind() {
                NODE_NAME => names.push(child),
                NODE_EXPR_LIST => values.extend(child.children()),
                _ => self.push(child, captures_only),
            }
        }
        self.bind_values(&names, values, NODE_NAME, captures_only);
    }

    /// Queue `values`, handing each function literal bound one-to-one to
    /// an identifier over to closure analysis
    fn bind_values(
        &mut self,
        targets: &[SyntaxNode],
        values: Vec<SyntaxNode>,
        target_kind: SyntaxKind,
        captures_only: bool,
    ) {
        let paired = targets.len() == values.len();
        for (i, value) in values.into_iter().enumerate() {
            let target = targets.get(i)
                .filter(|target| paired && target.kind() == target_kind);
            match target {
                Some(target) if value.kind() == NODE_FUNC_LIT =>
                    self.bind_closure(target, &value, captures_only),
                _ => self.push(value, captures_only),
            }
        }
    }
}
