#![cfg(test)]

use crate::{
    lexer::tokenize,
    parser::parse,
    syntax::{ident_text, SyntaxKind::{self, *}, SyntaxNode},
};

fn run(content: &str) -> SyntaxNode {
    let ast = parse(content);
    assert!(ast.errors().is_empty(), "{:?}", ast.errors());
    ast.node()
}

fn descendants(node: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    node.descendants()
        .filter(|node| node.kind() == kind)
        .collect()
}

/// Names declared by each `NODE_PARAM` of the first parameter list
fn param_names(node: &SyntaxNode) -> Vec<Option<String>> {
    let list = descendants(node, NODE_PARAM_LIST).remove(0);
    list.children()
        .filter(|param| param.kind() == NODE_PARAM)
        .map(|param| {
            param.children()
                .find(|child| child.kind() == NODE_NAME)
                .and_then(|name| ident_text(&name))
        })
        .collect()
}

const SAMPLE: &str = r#"package sample

import (
	"fmt"
	str "strings"
)

type Pair[K comparable, V any] struct {
	Key   K
	Value V `json:"value"`
	*fmt.Stringer
}

type Number interface {
	~int | ~float64
	String() string
}

const (
	A = iota
	B
)

var handler = func(w string, _ int) error { return nil }

func (p *Pair[K, V]) Swap() (v V, k K) {
	return p.Value, p.Key
}

func Sum[T Number](xs ...T) (total T) {
	for _, x := range xs {
		total += x
	}
	return
}

func control(ch chan<- int, in <-chan int, m map[string][]int) {
	if v, ok := m["a"]; ok && len(v) > 0 {
		ch <- v[0]
	} else if len(m) == 0 {
		return
	}
	for i := 0; i < 10; i++ {
		continue
	}
	for range in {
	}
	switch x := len(m); {
	case x > 1:
		fallthrough
	default:
	}
	var any interface{} = m
	switch t := any.(type) {
	case int, string:
		_ = t
	}
	select {
	case v := <-in:
		_ = v
	default:
	}
outer:
	for {
		break outer
	}
	go func() { defer fmt.Println(str.ToUpper("x")) }()
	p := &Pair[string, int]{Key: "a", Value: 1}
	_ = []struct{ a int }{{1}, {a: 2}}
	_ = p.Key[1:2:3]
	_ = 1.5e3 + 0x1F - 'c'
}
"#;

#[test]
fn lossless() {
    let node = parse(SAMPLE).node();
    assert_eq!(node.text().to_string(), SAMPLE);
}

#[test]
fn lossless_with_errors() {
    let content = "package p\nfunc f( {\n\t} }\n";
    let node = parse(content).node();
    assert_eq!(node.text().to_string(), content);
}

#[test]
fn sample_parses() {
    let node = run(SAMPLE);
    assert_eq!(descendants(&node, NODE_FUNC_DECL).len(), 3);
    assert_eq!(descendants(&node, NODE_FUNC_LIT).len(), 2);
    assert_eq!(descendants(&node, NODE_RANGE_CLAUSE).len(), 2);
    assert_eq!(descendants(&node, NODE_COMPOSITE_LIT).len(), 2);
    assert_eq!(descendants(&node, NODE_LABELED_STMT).len(), 1);
}

#[test]
fn grouped_params_named() {
    let node = run("package p\nfunc f(a, b int, c string) {}\n");
    assert_eq!(param_names(&node), vec![Some("a".into()), Some("b".into()), Some("c".into())]);
}

#[test]
fn params_unnamed() {
    let node = run("package p\nfunc f(int, string) {}\n");
    assert_eq!(param_names(&node), vec![None, None]);
}

#[test]
fn qualified_type_unnamed() {
    let node = run("package p\nfunc f(fmt.Stringer, []int) {}\n");
    assert_eq!(param_names(&node), vec![None, None]);
}

#[test]
fn qualified_type_named() {
    let node = run("package p\nfunc f(s fmt.Stringer) {}\n");
    assert_eq!(param_names(&node), vec![Some("s".into())]);
}

#[test]
fn instantiated_type_unnamed() {
    let node = run("package p\ntype F func(List[int], Map[string, int])\n");
    assert_eq!(param_names(&node), vec![None, None]);
    assert_eq!(descendants(&node, NODE_TYPE_ARGS).len(), 2);
}

#[test]
fn instantiated_receiver_unnamed() {
    let node = run("package p\nfunc (List[T]) Len() int { return 0 }\n");
    assert_eq!(param_names(&node), vec![None]);
    let receiver = descendants(&node, NODE_RECEIVER).remove(0);
    assert_eq!(descendants(&receiver, NODE_TYPE_ARGS).len(), 1);
}

#[test]
fn array_and_slice_named() {
    let node = run("package p\nfunc f(a []int, b [3]int) {}\n");
    assert_eq!(param_names(&node), vec![Some("a".into()), Some("b".into())]);
}

#[test]
fn variadic_named() {
    let node = run("package p\nfunc f(format string, args ...any) {}\n");
    assert_eq!(param_names(&node), vec![Some("format".into()), Some("args".into())]);
    assert_eq!(descendants(&node, NODE_VARIADIC_TYPE).len(), 1);
}

#[test]
fn receiver_without_name() {
    let node = run("package p\nfunc (f) m() {}\n");
    let receiver = descendants(&node, NODE_RECEIVER).remove(0);
    assert!(descendants(&receiver, NODE_NAME).is_empty());
    assert_eq!(descendants(&receiver, NODE_TYPE_NAME).len(), 1);
}

#[test]
fn result_list() {
    let node = run("package p\nfunc f() (n int, err error) { return }\n");
    let result = descendants(&node, NODE_RESULT).remove(0);
    assert_eq!(descendants(&result, NODE_NAME).len(), 2);
}

#[test]
fn declaration_without_body() {
    let node = run("package p\nfunc f(a int)\n");
    assert!(descendants(&node, NODE_BLOCK).is_empty());
}

#[test]
fn short_var_decl_shape() {
    let node = run("package p\nfunc f() { a, b := 1, 2 }\n");
    let decl = descendants(&node, NODE_SHORT_VAR_DECL).remove(0);
    let lists = decl.children()
        .map(|list| (list.kind(), list.children().count()))
        .collect::<Vec<_>>();
    assert_eq!(lists, vec![(NODE_EXPR_LIST, 2), (NODE_EXPR_LIST, 2)]);
}

#[test]
fn no_composite_in_if_header() {
    // `x {` opens the block, not a composite literal
    let node = run("package p\nfunc f(x bool) { if x { return } }\n");
    assert!(descendants(&node, NODE_COMPOSITE_LIT).is_empty());
    assert_eq!(descendants(&node, NODE_BLOCK).len(), 2);
}

#[test]
fn composite_in_parens_inside_header() {
    let node = run("package p\nfunc f() { if (T{}) == x { } }\n");
    assert_eq!(descendants(&node, NODE_COMPOSITE_LIT).len(), 1);
}

#[test]
fn binary_precedence() {
    let node = run("package p\nvar x = a + b * c\n");
    let outer = descendants(&node, NODE_BINARY_EXPR).remove(0);
    let operands = outer.children()
        .map(|child| child.kind())
        .collect::<Vec<_>>();
    assert_eq!(operands, vec![NODE_IDENT, NODE_BINARY_EXPR]);
}

#[test]
fn syntax_error_reported() {
    let ast = parse("package p\nfunc f(a int {\n}\n");
    assert!(!ast.errors().is_empty());
}

#[test]
fn unterminated_string() {
    let ast = parse("package p\nvar s = \"abc\n");
    assert!(!ast.errors().is_empty());
}

#[test]
fn garbage_does_not_hang() {
    let ast = parse("package p\n)))}}}]]] func ( { @ # $\n");
    assert!(!ast.errors().is_empty());
}

#[test]
fn semicolon_insertion() {
    let tokens = tokenize("return\nx++\n}\n")
        .into_iter()
        .filter(|(kind, _)| *kind == TOKEN_SEMICOLON)
        .count();
    assert_eq!(tokens, 3);
}

#[test]
fn no_semicolon_after_operator() {
    let tokens = tokenize("a +\nb")
        .into_iter()
        .map(|(kind, _)| kind)
        .collect::<Vec<_>>();
    assert_eq!(tokens, vec![TOKEN_IDENT, TOKEN_WHITESPACE, TOKEN_OPERATOR, TOKEN_WHITESPACE, TOKEN_IDENT]);
}

#[test]
fn numbers() {
    let kinds = tokenize("0x1F 1.5e3 3i 0b101 .5")
        .into_iter()
        .map(|(kind, _)| kind)
        .filter(|kind| *kind != TOKEN_WHITESPACE)
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec![TOKEN_INT, TOKEN_FLOAT, TOKEN_IMAG, TOKEN_INT, TOKEN_FLOAT]);
}
