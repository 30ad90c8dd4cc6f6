//! Collect the trackable bindings a function signature introduces.

use crate::{
    binding::BindingKind,
    scope::Scope,
    syntax::{children_of_kind, SyntaxKind::*, SyntaxNode},
    unused::Settings,
};

/// Whether `node` has a body with at least one statement
///
/// Stubs like `func f(a int) {}` are never reported.
fn has_statements(node: &SyntaxNode) -> bool {
    children_of_kind(node, NODE_BLOCK)
        .next()
        .map_or(false, |block| block.children().next().is_some())
}

/// Initial scope of a `NODE_FUNC_DECL`
///
/// Returns `None` for declarations without a body or with an empty one,
/// which have nothing to analyze.
pub fn function_scope(func: &SyntaxNode, settings: &Settings) -> Option<Scope> {
    if !has_statements(func) {
        return None;
    }

    let mut scope = Scope::new();
    if settings.include_receivers {
        for receiver in children_of_kind(func, NODE_RECEIVER) {
            collect(&mut scope, &receiver, BindingKind::Receiver);
        }
    }
    for params in children_of_kind(func, NODE_PARAM_LIST) {
        add_params(&mut scope, &params, BindingKind::Parameter);
    }
    if settings.include_named_returns {
        for result in children_of_kind(func, NODE_RESULT) {
            collect(&mut scope, &result, BindingKind::NamedReturn);
        }
    }
    Some(scope)
}

/// Scope of a `NODE_FUNC_LIT`: its parameters only. `None` for an empty
/// body, like `function_scope`.
pub fn closure_scope(lit: &SyntaxNode) -> Option<Scope> {
    if !has_statements(lit) {
        return None;
    }
    let mut scope = Scope::new();
    for params in children_of_kind(lit, NODE_PARAM_LIST) {
        add_params(&mut scope, &params, BindingKind::ClosureParameter);
    }
    Some(scope)
}

/// Add the parameter lists wrapped by a `NODE_RECEIVER` or `NODE_RESULT`
fn collect(scope: &mut Scope, wrapper: &SyntaxNode, kind: BindingKind) {
    for params in children_of_kind(wrapper, NODE_PARAM_LIST) {
        add_params(scope, &params, kind);
    }
}

fn add_params(scope: &mut Scope, params: &SyntaxNode, kind: BindingKind) {
    for param in children_of_kind(params, NODE_PARAM) {
        for name in children_of_kind(&param, NODE_NAME) {
            scope.insert(&name, kind);
        }
    }
}
