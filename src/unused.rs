use std::fmt;
use rowan::TextRange;
use crate::{
    binding::BindingKind,
    collector::Collector,
    resolve::Resolution,
    scope::Scope,
    signature::function_scope,
    syntax::{children_of_kind, ident_text, SyntaxKind::*, SyntaxNode},
    walker::{Job, Walker},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Report named results that are never referenced
    pub include_named_returns: bool,
    /// Report unused method receivers
    pub include_receivers: bool,
    /// Analyze `*_test.go` files
    pub include_tests: bool,
    /// Whether found diagnostics should make the run fail
    pub set_exit_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            include_named_returns: false,
            include_receivers: true,
            include_tests: true,
            set_exit_status: true,
        }
    }
}

/// One unused binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedParam {
    /// 1-based line of the enclosing function or closure
    pub line: usize,
    /// name of the enclosing function, method or closure variable
    pub function: String,
    pub name: String,
    pub kind: BindingKind,
    pub name_range: TextRange,
}

impl fmt::Display for UnusedParam {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} contains unused parameter {}", self.function, self.name)
    }
}

impl Settings {
    /// Find unused parameters in a parsed file, ordered by line
    pub fn find_unused_params(&self, root: &SyntaxNode) -> Vec<UnusedParam> {
        let resolution = Resolution::new(root);
        let mut collector = Collector::new(&root.text().to_string());

        // package level `var f = func(...) {...}` bodies
        let mut jobs = vec![Job {
            name: String::new(),
            start: root.text_range().start(),
            scope: Scope::new(),
            body: children_of_kind(root, NODE_VAR_DECL).collect(),
        }];
        for func in children_of_kind(root, NODE_FUNC_DECL) {
            let Some(scope) = function_scope(&func, self) else { continue };
            let Some(name) = children_of_kind(&func, NODE_NAME).next()
                .and_then(|name| ident_text(&name))
            else { continue };
            jobs.push(Job {
                name,
                start: func.text_range().start(),
                scope,
                body: children_of_kind(&func, NODE_BLOCK).collect(),
            });
        }

        while let Some(Job { name, start, mut scope, body }) = jobs.pop() {
            tracing::debug!("checking {} ({} bindings)", name, scope.len());
            Walker::new(&resolution, &mut scope, &mut collector, &mut jobs)
                .walk(body);
            collector.report_unused(&name, start, &scope);
        }

        collector.finish()
    }
}

