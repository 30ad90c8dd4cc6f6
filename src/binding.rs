use std::fmt;
use rowan::TextRange;
use crate::syntax::{ident_text, SyntaxNode};

/// Identity of a declaration: the node that introduces its name
///
/// Two bindings with the same text in different scopes never compare
/// equal, because their declaring nodes sit at different tree positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingId(SyntaxNode);

impl BindingId {
    pub fn new(node: SyntaxNode) -> Self {
        BindingId(node)
    }

    pub fn node(&self) -> &SyntaxNode {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Parameter,
    Receiver,
    NamedReturn,
    ClosureParameter,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BindingKind::Parameter =>
                write!(fmt, "parameter"),
            BindingKind::Receiver =>
                write!(fmt, "receiver"),
            BindingKind::NamedReturn =>
                write!(fmt, "named return"),
            BindingKind::ClosureParameter =>
                write!(fmt, "closure parameter"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    used: bool,
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}
impl Eq for Binding {}

impl Binding {
    /// Binding for a `NODE_NAME` declaration, `None` if it carries no
    /// identifier
    pub fn new(node: &SyntaxNode, kind: BindingKind) -> Option<Self> {
        let name = ident_text(node)?;
        Some(Binding {
            id: BindingId::new(node.clone()),
            name,
            kind,
            used: false,
        })
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }

    /// Source range of the declared name
    pub fn range(&self) -> TextRange {
        self.id.node().text_range()
    }
}
