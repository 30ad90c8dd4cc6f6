#![cfg(test)]

use rowan::GreenNodeBuilder;
use crate::{
    binding::BindingKind,
    parser::parse,
    syntax::{SyntaxKind::{self, *}, SyntaxNode},
    unused::{Settings, UnusedParam},
};

fn run_with(settings: &Settings, content: &str) -> Vec<UnusedParam> {
    let ast = parse(content);
    assert!(ast.errors().is_empty(), "{:?}", ast.errors());

    settings.find_unused_params(&ast.node())
}

fn run(content: &str) -> Vec<UnusedParam> {
    run_with(&Settings::default(), content)
}

fn names(results: &[UnusedParam]) -> Vec<&str> {
    results.iter()
        .map(|result| result.name.as_str())
        .collect()
}

#[test]
fn unused_param() {
    let results = run("package p\n\nfunc funcOne(a, b, c int) int { return a + b }\n");
    assert_eq!(1, results.len());
    assert_eq!(results[0].name, "c");
    assert_eq!(results[0].function, "funcOne");
    assert_eq!(results[0].kind, BindingKind::Parameter);
    assert_eq!(results[0].line, 3);
    assert_eq!(results[0].to_string(), "funcOne contains unused parameter c");
}

#[test]
fn all_used() {
    let results = run("package p\nfunc f(a, b int) int { return a * b }\n");
    assert_eq!(0, results.len());
}

#[test]
fn unnamed_receiver() {
    let results = run("package p\nfunc (f) funcTwo(a, b, c int) int { return a+b }\n");
    assert_eq!(names(&results), vec!["c"]);
    assert_eq!(results[0].function, "funcTwo");
}

#[test]
fn receiver_toggle() {
    let content = "package p\nfunc (recv f) funcThree(a int) int { return a }\n";
    let results = run(content);
    assert_eq!(names(&results), vec!["recv"]);
    assert_eq!(results[0].kind, BindingKind::Receiver);

    let settings = Settings {
        include_receivers: false,
        ..Settings::default()
    };
    assert_eq!(0, run_with(&settings, content).len());
}

#[test]
fn used_receiver() {
    let results = run("package p\nfunc (t *T) m() int { return t.n }\n");
    assert_eq!(0, results.len());
}

#[test]
fn named_return_toggle() {
    let content = "package p\nfunc funcThree() (namedReturn int) { return }\n";
    assert_eq!(0, run(content).len());

    let settings = Settings {
        include_named_returns: true,
        ..Settings::default()
    };
    let results = run_with(&settings, content);
    assert_eq!(names(&results), vec!["namedReturn"]);
    assert_eq!(results[0].kind, BindingKind::NamedReturn);
}

#[test]
fn named_return_assigned() {
    let settings = Settings {
        include_named_returns: true,
        ..Settings::default()
    };
    let results = run_with(&settings, "package p\nfunc f() (n int) { n = 1; return }\n");
    assert_eq!(0, results.len());
}

#[test]
fn discard_never_reported() {
    let results = run("package p\nfunc f(_ int, a string, _ bool) { println() }\n");
    assert_eq!(names(&results), vec!["a"]);
}

#[test]
fn unnamed_params_ignored() {
    let results = run("package p\nfunc f(int, string) { println() }\n");
    assert_eq!(0, results.len());
}

#[test]
fn empty_body_skipped() {
    let results = run("package p\n\nfunc unusedFunc(f func()) {\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn empty_closure_skipped() {
    let results = run("package p\nfunc f(a int) {\n\tg := func(x int) {}\n\tg(a)\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn declaration_without_body_skipped() {
    let results = run("package p\nfunc f(a int)\n");
    assert_eq!(0, results.len());
}

#[test]
fn closure_param() {
    let results = run("package p

func closures() {
	closure := func(v int) {
		enclosed := 2
		enclosed++
	}
	closure(1)
}
");
    assert_eq!(1, results.len());
    assert_eq!(results[0].name, "v");
    assert_eq!(results[0].function, "closure");
    assert_eq!(results[0].kind, BindingKind::ClosureParameter);
    assert_eq!(results[0].line, 4);
}

#[test]
fn closure_never_called() {
    let results = run("package p\nfunc f() {\n\tg := func(x int) { println() }\n\t_ = g\n}\n");
    assert_eq!(names(&results), vec!["x"]);
}

#[test]
fn closure_capture() {
    let results = run("package p
func outer(r int) {
	f := func(n int) int { return r }
	f(1)
}
");
    assert_eq!(names(&results), vec!["n"]);
    assert_eq!(results[0].function, "f");
}

#[test]
fn closure_param_shadows_outer() {
    let results = run("package p\nfunc f(n int) {\n\tg := func(n int) { _ = n }\n\tg(1)\n}\n");
    assert_eq!(names(&results), vec!["n"]);
    assert_eq!(results[0].function, "f");
    assert_eq!(results[0].kind, BindingKind::Parameter);
}

#[test]
fn instantiated_receiver_type() {
    let results = run("package p\nfunc (List[T]) Len(n int) int { return 0 }\n");
    assert_eq!(names(&results), vec!["n"]);
    assert_eq!(results[0].function, "Len");
}

#[test]
fn nested_capture() {
    let results = run("package p
func f(a int) {
	g := func(b int) {
		h := func(c int) {
			_ = a + b
		}
		h(1)
	}
	g(1)
}
");
    assert_eq!(names(&results), vec!["c"]);
    assert_eq!(results[0].function, "h");
    assert_eq!(results[0].line, 4);
}

#[test]
fn closure_reassigned() {
    let results = run("package p
func f(a int) {
	var g func(int)
	g = func(x int) { println(a) }
	g(1)
}
");
    assert_eq!(names(&results), vec!["x"]);
    assert_eq!(results[0].function, "g");
}

#[test]
fn package_level_closure() {
    let results = run("package p\n\nvar handler = func(w string, r int) { _ = r }\n");
    assert_eq!(names(&results), vec!["w"]);
    assert_eq!(results[0].function, "handler");
    assert_eq!(results[0].line, 3);
}

#[test]
fn unbound_closure_captures() {
    let results = run("package p
func f(a int, b int) {
	run(func(x int) { _ = a })
	defer func() { println(b) }()
}
");
    assert_eq!(0, results.len());
}

#[test]
fn closure_in_aggregate_not_tracked() {
    let results = run("package p
func f(a int) map[string]func(int) {
	return map[string]func(int){\"x\": func(y int) { _ = a }}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn shadowing_is_not_use() {
    let results = run("package p
func f(a int) {
	{
		a := 1
		_ = a
	}
}
");
    assert_eq!(names(&results), vec!["a"]);
}

#[test]
fn redeclaration_is_use() {
    let results = run("package p\nfunc f(a int) {\n\ta, b := 1, 2\n\t_ = b\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn assignment_is_use() {
    let results = run("package p\nfunc f(a int) {\n\ta = 2\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn selector_member_is_not_use() {
    let results = run("package p\nfunc f(s S, Field int) int { return s.Field }\n");
    assert_eq!(names(&results), vec!["Field"]);
}

#[test]
fn struct_field_names_are_not_use() {
    let results = run("package p
func f(name string) {
	type T struct{ name string }
	var t T
	_ = t
}
");
    assert_eq!(names(&results), vec!["name"]);
}

#[test]
fn used_in_statements() {
    let results = run("package p
func f(a, b, c, d, e, g int, ch chan int, m map[int]int, xs []int) {
	if a > 0 {
	} else if b > 0 {
	}
	for i := 0; i < c; i++ {
	}
	switch d {
	case e:
	}
	select {
	case ch <- g:
	}
	for k := range m {
		_ = xs[k:]
	}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn used_in_expressions() {
    let results = run("package p
func f(a, b, c, d, e int, v any, p *T) []T {
	x := T{Key: a, Value: -b}
	_ = v.(string)
	_ = (*p).field
	_ = [...]int{c: d}
	return []T{x, {Key: e}}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn type_param_not_reported() {
    let results = run("package p\nfunc f[T any](x T) { println() }\n");
    assert_eq!(names(&results), vec!["x"]);
}

#[test]
fn sorted_by_line_and_offset() {
    let results = run("package p

func one(a, b int) { println() }

func two(c int) {
	d := func(e int) { println() }
	_ = d
}
");
    let lines = results.iter()
        .map(|result| (result.line, result.name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(lines, vec![(3, "a"), (3, "b"), (5, "c"), (6, "e")]);
}

#[test]
fn deterministic() {
    let content = "package p
func f(a, b, c int) { println() }
func g(d int) { h := func(e, f int) { _ = f }; h(1, 2) }
";
    let first = run(content);
    for _ in 0..10 {
        assert_eq!(first, run(content));
    }
}

/// `func f(x int) { { { ... leaf ... } } }` nested `depth` blocks deep
fn nested(depth: usize, leaf: SyntaxKind) -> SyntaxNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(NODE_SOURCE_FILE.into());
    builder.start_node(NODE_FUNC_DECL.into());
    builder.token(TOKEN_FUNC.into(), "func");
    builder.token(TOKEN_WHITESPACE.into(), " ");
    builder.start_node(NODE_NAME.into());
    builder.token(TOKEN_IDENT.into(), "f");
    builder.finish_node();
    builder.start_node(NODE_PARAM_LIST.into());
    builder.token(TOKEN_L_PAREN.into(), "(");
    builder.start_node(NODE_PARAM.into());
    builder.start_node(NODE_NAME.into());
    builder.token(TOKEN_IDENT.into(), "x");
    builder.finish_node();
    builder.token(TOKEN_WHITESPACE.into(), " ");
    builder.start_node(NODE_TYPE_NAME.into());
    builder.token(TOKEN_IDENT.into(), "int");
    builder.finish_node();
    builder.finish_node();
    builder.token(TOKEN_R_PAREN.into(), ")");
    builder.finish_node();
    for _ in 0..depth {
        builder.start_node(NODE_BLOCK.into());
        builder.token(TOKEN_L_BRACE.into(), "{");
    }
    builder.start_node(leaf.into());
    builder.token(TOKEN_IMPORT.into(), "import");
    builder.finish_node();
    builder.start_node(NODE_EXPR_STMT.into());
    builder.start_node(NODE_IDENT.into());
    builder.token(TOKEN_IDENT.into(), "x");
    builder.finish_node();
    builder.finish_node();
    for _ in 0..depth {
        builder.token(TOKEN_R_BRACE.into(), "}");
        builder.finish_node();
    }
    builder.finish_node();
    builder.finish_node();
    SyntaxNode::new_root(builder.finish())
}

#[test]
fn deep_nesting() {
    let node = nested(3000, NODE_EXPR_STMT);
    let results = Settings::default().find_unused_params(&node);
    assert_eq!(0, results.len());
}

#[test]
fn unexpected_node_skipped() {
    // an import spec has no business inside a body
    let node = nested(3, NODE_IMPORT_SPEC);
    let results = Settings::default().find_unused_params(&node);
    assert_eq!(0, results.len());
}
