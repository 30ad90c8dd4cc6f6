use std::collections::{HashMap, HashSet};
use rowan::TextSize;
use crate::{
    scope::Scope,
    syntax::{LineIndex, SyntaxKind, SyntaxNode},
    unused::UnusedParam,
};

/// Pools the diagnostics of one file
#[derive(Debug)]
pub struct Collector {
    lines: LineIndex,
    results: HashMap<(usize, String, String), UnusedParam>,
    /// node kinds the walker has already complained about
    reported_shapes: HashSet<SyntaxKind>,
}

impl Collector {
    pub fn new(text: &str) -> Self {
        Collector {
            lines: LineIndex::new(text),
            results: HashMap::new(),
            reported_shapes: HashSet::new(),
        }
    }

    /// Report every unused binding of `scope`, attributed to `function`
    /// declared at `start`
    pub fn report_unused(&mut self, function: &str, start: TextSize, scope: &Scope) {
        let line = self.lines.line(start);
        for binding in scope.unused() {
            self.push(UnusedParam {
                line,
                function: function.to_string(),
                name: binding.name.clone(),
                kind: binding.kind,
                name_range: binding.range(),
            });
        }
    }

    /// Identical line, function and name collapse into one diagnostic
    pub fn push(&mut self, result: UnusedParam) {
        let key = (result.line, result.function.clone(), result.name.clone());
        self.results.entry(key).or_insert(result);
    }

    pub fn shape_error(&mut self, node: &SyntaxNode) {
        if self.reported_shapes.insert(node.kind()) {
            tracing::warn!(
                "unexpected {:?} at {:?}, skipping",
                node.kind(), node.text_range()
            );
        }
    }

    /// Diagnostics ordered by line, then by position of the name
    pub fn finish(self) -> Vec<UnusedParam> {
        let mut results = self.results.into_values()
            .collect::<Vec<_>>();
        results.sort_unstable_by_key(|result|
            (result.line, result.name_range.start())
        );
        results
    }
}
