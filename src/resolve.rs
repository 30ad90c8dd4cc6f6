//! Map identifier occurrences to the declarations they refer to.

use std::collections::HashMap;
use crate::{
    binding::BindingId,
    syntax::{children_of_kind, has_token, ident_text, SyntaxKind::*, SyntaxNode},
};

/// Identifier uses resolved to their declaring nodes
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    refs: HashMap<SyntaxNode, BindingId>,
}

impl Resolution {
    /// Resolve every `NODE_IDENT` below the `NODE_SOURCE_FILE` `root`
    pub fn new(root: &SyntaxNode) -> Self {
        let mut resolver = Resolver {
            scopes: vec![HashMap::new()],
            refs: HashMap::new(),
            tasks: Vec::new(),
        };
        resolver.run(root);
        Resolution { refs: resolver.refs }
    }

    /// The declaration `ident` refers to. Unresolved for package names,
    /// builtins, selector members and anything declared in another file.
    pub fn resolve(&self, ident: &SyntaxNode) -> Option<&BindingId> {
        self.refs.get(ident)
    }
}

#[derive(Debug)]
enum Task {
    Visit(SyntaxNode),
    Declare(SyntaxNode),
    /// left-hand side identifier of `:=`: new unless already declared in
    /// the innermost scope
    Define(SyntaxNode),
    PushScope,
    PopScope,
}

struct Resolver {
    scopes: Vec<HashMap<String, SyntaxNode>>,
    refs: HashMap<SyntaxNode, BindingId>,
    /// pending tasks, executed from the back
    tasks: Vec<Task>,
}

impl Resolver {
    fn run(&mut self, root: &SyntaxNode) {
        // package level names are visible in the whole file
        for decl in root.children() {
            match decl.kind() {
                NODE_FUNC_DECL if children_of_kind(&decl, NODE_RECEIVER).next().is_none() => {
                    if let Some(name) = children_of_kind(&decl, NODE_NAME).next() {
                        self.declare(&name);
                    }
                }
                NODE_VAR_DECL | NODE_CONST_DECL | NODE_TYPE_DECL => {
                    for spec in decl.children() {
                        for name in children_of_kind(&spec, NODE_NAME) {
                            self.declare(&name);
                        }
                    }
                }
                _ => {}
            }
        }

        self.schedule(root.children().map(Task::Visit).collect());
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Visit(node) => self.visit(&node),
                Task::Declare(node) => self.declare(&node),
                Task::Define(node) => self.define(&node),
                Task::PushScope => self.scopes.push(HashMap::new()),
                Task::PopScope => {
                    self.scopes.pop();
                }
            }
        }
    }

    /// Queue `tasks` to run in the given order, before anything queued
    /// earlier
    fn schedule(&mut self, tasks: Vec<Task>) {
        self.tasks.extend(tasks.into_iter().rev());
    }

    fn declare(&mut self, node: &SyntaxNode) {
        let Some(name) = ident_text(node) else { return };
        if name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, node.clone());
        }
    }

    fn define(&mut self, ident: &SyntaxNode) {
        let Some(name) = ident_text(ident) else { return };
        let redeclared = self.scopes.last()
            .map_or(false, |scope| scope.contains_key(&name));
        if redeclared {
            self.use_ident(ident);
        } else {
            self.declare(ident);
        }
    }

    fn use_ident(&mut self, ident: &SyntaxNode) {
        let Some(name) = ident_text(ident) else { return };
        let decl = self.scopes.iter().rev()
            .find_map(|scope| scope.get(&name));
        if let Some(decl) = decl {
            self.refs.insert(ident.clone(), BindingId::new(decl.clone()));
        }
    }

    fn visit(&mut self, node: &SyntaxNode) {
        let tasks = match node.kind() {
            NODE_IDENT => {
                self.use_ident(node);
                return;
            }
            NODE_NAME => return,

            NODE_FUNC_DECL | NODE_FUNC_LIT => function(node),

            NODE_BLOCK
            | NODE_IF_STMT
            | NODE_FOR_STMT
            | NODE_SWITCH_STMT
            | NODE_SELECT_STMT
            | NODE_CASE_CLAUSE
            | NODE_COMM_CLAUSE => {
                let mut tasks = vec![Task::PushScope];
                tasks.extend(node.children().map(Task::Visit));
                tasks.push(Task::PopScope);
                tasks
            }

            NODE_SHORT_VAR_DECL => {
                let mut lists = children_of_kind(node, NODE_EXPR_LIST);
                let targets = lists.next();
                let mut tasks = lists.map(Task::Visit).collect::<Vec<_>>();
                tasks.extend(targets.into_iter().flat_map(|targets| targets.children()).map(define));
                tasks
            }

            NODE_RANGE_CLAUSE if has_token(node, TOKEN_DEFINE) => {
                let mut children = node.children().collect::<Vec<_>>();
                let range = children.pop();
                let mut tasks = range.into_iter().map(Task::Visit).collect::<Vec<_>>();
                tasks.extend(
                    children.into_iter()
                        .filter(|child| child.kind() == NODE_EXPR_LIST)
                        .flat_map(|targets| targets.children())
                        .map(define)
                );
                tasks
            }

            NODE_VAR_SPEC | NODE_CONST_SPEC => {
                let (names, rest): (Vec<_>, Vec<_>) = node.children()
                    .partition(|child| child.kind() == NODE_NAME);
                rest.into_iter().map(Task::Visit)
                    .chain(names.into_iter().map(Task::Declare))
                    .collect()
            }

            NODE_TYPE_SPEC => {
                let mut tasks = children_of_kind(node, NODE_NAME).map(Task::Declare).collect::<Vec<_>>();
                tasks.push(Task::PushScope);
                for child in node.children() {
                    match child.kind() {
                        NODE_NAME => {}
                        NODE_TYPE_PARAM_LIST => tasks.extend(params(&child)),
                        _ => tasks.push(Task::Visit(child)),
                    }
                }
                tasks.push(Task::PopScope);
                tasks
            }

            _ => node.children().map(Task::Visit).collect(),
        };
        self.schedule(tasks);
    }
}

/// Identifiers on the left of `:=` are declarations, anything else there
/// is an ordinary expression
fn define(target: SyntaxNode) -> Task {
    if target.kind() == NODE_IDENT {
        Task::Define(target)
    } else {
        Task::Visit(target)
    }
}

/// Receiver, type parameters, parameters and results share one scope with
/// the top level of the body
fn function(node: &SyntaxNode) -> Vec<Task> {
    let mut tasks = vec![Task::PushScope];
    for child in node.children() {
        match child.kind() {
            NODE_RECEIVER | NODE_RESULT => {
                for list in child.children() {
                    if list.kind() == NODE_PARAM_LIST {
                        tasks.extend(params(&list));
                    } else {
                        tasks.push(Task::Visit(list));
                    }
                }
            }
            NODE_TYPE_PARAM_LIST | NODE_PARAM_LIST => tasks.extend(params(&child)),
            // the outermost block does not open a scope of its own
            NODE_BLOCK => tasks.extend(child.children().map(Task::Visit)),
            NODE_NAME => {}
            _ => tasks.push(Task::Visit(child)),
        }
    }
    tasks.push(Task::PopScope);
    tasks
}

/// Types first, then the names they declare
fn params(list: &SyntaxNode) -> Vec<Task> {
    let mut types = Vec::new();
    let mut names = Vec::new();
    for param in children_of_kind(list, NODE_PARAM) {
        for child in param.children() {
            if child.kind() == NODE_NAME {
                names.push(Task::Declare(child));
            } else {
                types.push(Task::Visit(child));
            }
        }
    }
    types.extend(names);
    types
}
