//! Function literals bound to a name get their own scope.
//!
//! The literal's parameters are checked against its body in a separate
//! job, while the same body is re-walked against the enclosing scope so
//! that captured bindings count as used there.

use crate::{
    signature::closure_scope,
    syntax::{children_of_kind, ident_text, SyntaxKind::*, SyntaxNode},
    walker::{Job, Walker},
};

impl Walker<'_> {
    /// Analyze the `NODE_FUNC_LIT` `lit` assigned to `name`
    pub(crate) fn bind_closure(&mut self, name: &SyntaxNode, lit: &SyntaxNode, captures_only: bool) {
        // a capture-only walk reaches closures that already have a job
        if !captures_only {
            if let (Some(name), Some(scope)) = (ident_text(name), closure_scope(lit)) {
                tracing::trace!("closure {}", name);
                self.closures.push(Job {
                    name,
                    start: lit.text_range().start(),
                    scope,
                    body: children_of_kind(lit, NODE_BLOCK).collect(),
                });
            }
        }

        for child in lit.children() {
            self.push(child, true);
        }
    }
}
