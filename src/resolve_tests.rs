#![cfg(test)]

use crate::{
    parser::parse,
    resolve::Resolution,
    syntax::{ident_text, SyntaxKind::*, SyntaxNode},
};

fn run(content: &str) -> (SyntaxNode, Resolution) {
    let ast = parse(content);
    assert!(ast.errors().is_empty(), "{:?}", ast.errors());
    let node = ast.node();
    let resolution = Resolution::new(&node);
    (node, resolution)
}

/// For every use of `name`, the text offset of its declaration
fn targets(content: &str, name: &str) -> Vec<Option<usize>> {
    let (node, resolution) = run(content);
    node.descendants()
        .filter(|node| node.kind() == NODE_IDENT && ident_text(node).as_deref() == Some(name))
        .map(|ident| resolution.resolve(&ident)
             .map(|id| usize::from(id.node().text_range().start())))
        .collect()
}

#[test]
fn parameter_use() {
    let content = "package p\nfunc f(a int) int { return a }\n";
    let decl = content.find("a int").unwrap();
    assert_eq!(targets(content, "a"), vec![Some(decl)]);
}

#[test]
fn builtin_unresolved() {
    assert_eq!(targets("package p\nfunc f() { println(len(\"x\")) }\n", "len"), vec![None]);
}

#[test]
fn shadowed_by_block_var() {
    let content = "package p\nfunc f(a int) {\n\t{\n\t\ta := 1\n\t\t_ = a\n\t}\n}\n";
    let inner = content.find("a := 1").unwrap();
    let uses = targets(content, "a");
    // the `a` of `a := 1` itself is a declaration, not a use
    assert_eq!(uses, vec![None, Some(inner)]);
}

#[test]
fn redeclaration_is_use() {
    let content = "package p\nfunc f(a int) {\n\ta, b := 1, 2\n\t_ = b\n}\n";
    let param = content.find("a int").unwrap();
    assert_eq!(targets(content, "a"), vec![Some(param)]);
}

#[test]
fn right_hand_side_first() {
    let content = "package p\nfunc f(a int) {\n\t{\n\t\ta := a + 1\n\t\t_ = a\n\t}\n}\n";
    let param = content.find("a int").unwrap();
    let inner = content.find("a := a").unwrap();
    assert_eq!(targets(content, "a"), vec![None, Some(param), Some(inner)]);
}

#[test]
fn closure_sees_enclosing() {
    let content = "package p\nfunc f(r int) {\n\tg := func() int { return r }\n\t_ = g\n}\n";
    let param = content.find("r int").unwrap();
    assert_eq!(targets(content, "r"), vec![Some(param)]);
}

#[test]
fn package_level_forward_reference() {
    let content = "package p\nfunc f() int { return x }\nvar x = 1\n";
    let decl = content.find("x = 1").unwrap();
    assert_eq!(targets(content, "x"), vec![Some(decl)]);
}

#[test]
fn range_variables() {
    let content = "package p\nfunc f(xs []int) {\n\tfor i, x := range xs {\n\t\t_ = i + x\n\t}\n}\n";
    let param = content.find("xs []int").unwrap();
    assert_eq!(targets(content, "xs"), vec![Some(param)]);
    let decl = content.find("x := range").unwrap();
    assert_eq!(targets(content, "x"), vec![None, Some(decl)]);
}

#[test]
fn selector_member_unresolved() {
    let content = "package p\nfunc f(s S, Field int) int { return s.Field }\n";
    assert_eq!(targets(content, "Field"), Vec::<Option<usize>>::new());
}
