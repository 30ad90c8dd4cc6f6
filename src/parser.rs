//! Lossless recursive-descent parser producing a rowan tree of Go source.

use std::fmt;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};
use crate::{
    lexer::tokenize,
    syntax::{SyntaxKind::{self, *}, SyntaxNode},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub range: TextRange,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} at {}..{}",
               self.message,
               u32::from(self.range.start()),
               u32::from(self.range.end()))
    }
}

/// Result of parsing one source file
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

pub fn parse(input: &str) -> Parse {
    let mut parser = Parser {
        tokens: tokenize(input),
        pos: 0,
        offset: 0,
        consumed: 0,
        no_composite: false,
        builder: GreenNodeBuilder::new(),
        errors: Vec::new(),
    };
    parser.source_file();
    Parse {
        green: parser.builder.finish(),
        errors: parser.errors,
    }
}

/// Whether a primary expression may be followed by a composite literal body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Composite {
    No,
    /// a (possibly qualified or instantiated) type name, forbidden in
    /// control clause headers
    Named,
    /// an explicit type literal like `[]int` or `map[K]V`
    Literal,
}

type Spec<'a> = fn(&mut Parser<'a>);

struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    /// byte offset of `tokens[pos]`
    offset: usize,
    /// count of significant tokens bumped, to detect lack of progress
    consumed: usize,
    /// inside an if/for/switch header
    no_composite: bool,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

fn describe(kind: SyntaxKind) -> String {
    match kind {
        TOKEN_L_PAREN => "`(`".to_string(),
        TOKEN_R_PAREN => "`)`".to_string(),
        TOKEN_L_BRACK => "`[`".to_string(),
        TOKEN_R_BRACK => "`]`".to_string(),
        TOKEN_L_BRACE => "`{`".to_string(),
        TOKEN_R_BRACE => "`}`".to_string(),
        TOKEN_COLON => "`:`".to_string(),
        TOKEN_SEMICOLON => "`;` or newline".to_string(),
        TOKEN_IDENT => "identifier".to_string(),
        TOKEN_STRING => "string literal".to_string(),
        TOKEN_CHAN => "`chan`".to_string(),
        kind => format!("{:?}", kind),
    }
}

impl<'a> Parser<'a> {
    fn significant(&self) -> impl Iterator<Item = (SyntaxKind, &'a str)> + '_ {
        self.tokens[self.pos..]
            .iter()
            .copied()
            .filter(|(kind, _)| !kind.is_trivia())
    }

    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.significant().nth(n).map(|(kind, _)| kind)
    }

    fn peek(&self) -> Option<SyntaxKind> {
        self.nth(0)
    }

    fn peek_token(&self) -> Option<(SyntaxKind, &'a str)> {
        self.significant().next()
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == Some(kind)
    }

    fn skip_trivia(&mut self) {
        while let Some(&(kind, text)) = self.tokens.get(self.pos) {
            if !kind.is_trivia() {
                break;
            }
            self.builder.token(kind.into(), text);
            self.pos += 1;
            self.offset += text.len();
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(&(kind, text)) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), text);
            self.pos += 1;
            self.offset += text.len();
            self.consumed += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.error(format!("expected {}", describe(kind)));
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Range of the next significant token
    fn current_range(&self) -> TextRange {
        let mut offset = self.offset;
        for &(kind, text) in &self.tokens[self.pos..] {
            if !kind.is_trivia() {
                return TextRange::at(TextSize::from(offset as u32), TextSize::from(text.len() as u32));
            }
            offset += text.len();
        }
        TextRange::empty(TextSize::from(offset as u32))
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        let message = match self.peek_token() {
            Some((_, text)) if text.trim().is_empty() => format!("{}, found newline", message.into()),
            Some((_, text)) => format!("{}, found `{}`", message.into(), text.trim()),
            None => format!("{}, found end of file", message.into()),
        };
        self.errors.push(ParseError { range, message });
    }

    /// Report an error and consume the offending token
    fn error_bump(&mut self, message: &str) {
        self.error(message);
        if self.peek().is_some() {
            self.start_node(NODE_ERROR);
            self.bump();
            self.finish_node();
        }
    }

    // Declarations

    fn source_file(&mut self) {
        self.builder.start_node(NODE_SOURCE_FILE.into());
        while let Some(kind) = self.peek() {
            match kind {
                TOKEN_SEMICOLON => self.bump(),
                TOKEN_PACKAGE => {
                    self.start_node(NODE_PACKAGE_CLAUSE);
                    self.bump();
                    self.expect(TOKEN_IDENT);
                    self.finish_node();
                }
                TOKEN_IMPORT => {
                    self.start_node(NODE_IMPORT_DECL);
                    self.bump();
                    self.group(Self::import_spec);
                    self.finish_node();
                }
                TOKEN_FUNC => self.func_decl(),
                TOKEN_VAR | TOKEN_CONST | TOKEN_TYPE => self.decl(),
                _ => self.error_bump("expected a declaration"),
            }
        }
        self.skip_trivia();
        self.builder.finish_node();
    }

    /// A single spec, or a parenthesized group of them
    fn group(&mut self, spec: Spec<'a>) {
        if !self.eat(TOKEN_L_PAREN) {
            spec(self);
            return;
        }
        while let Some(kind) = self.peek() {
            if kind == TOKEN_R_PAREN {
                break;
            }
            if self.eat(TOKEN_SEMICOLON) {
                continue;
            }
            let before = self.consumed;
            spec(self);
            if self.consumed == before {
                self.error_bump("unexpected token in declaration group");
            }
        }
        self.expect(TOKEN_R_PAREN);
    }

    fn import_spec(&mut self) {
        self.start_node(NODE_IMPORT_SPEC);
        if !self.eat(TOKEN_IDENT) {
            self.eat(TOKEN_DOT);
        }
        self.expect(TOKEN_STRING);
        self.finish_node();
    }

    fn decl(&mut self) {
        let (kind, spec): (SyntaxKind, Spec<'a>) = match self.peek() {
            Some(TOKEN_VAR) => (NODE_VAR_DECL, |p| p.value_spec(NODE_VAR_SPEC)),
            Some(TOKEN_CONST) => (NODE_CONST_DECL, |p| p.value_spec(NODE_CONST_SPEC)),
            _ => (NODE_TYPE_DECL, Self::type_spec),
        };
        self.start_node(kind);
        self.bump();
        self.group(spec);
        self.finish_node();
    }

    fn value_spec(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.name();
        while self.eat(TOKEN_COMMA) {
            self.name();
        }
        if !matches!(self.peek(), None | Some(TOKEN_ASSIGN | TOKEN_SEMICOLON | TOKEN_R_PAREN)) {
            self.ty();
        }
        if self.eat(TOKEN_ASSIGN) {
            self.expr_list();
        }
        self.finish_node();
    }

    fn type_spec(&mut self) {
        self.start_node(NODE_TYPE_SPEC);
        self.name();
        // `type A[T any] ...` versus the array type in `type A [N]int`
        if self.at(TOKEN_L_BRACK)
            && self.nth(1) == Some(TOKEN_IDENT)
            && self.nth(2) != Some(TOKEN_R_BRACK)
        {
            self.type_param_list();
        }
        self.eat(TOKEN_ASSIGN);
        self.ty();
        self.finish_node();
    }

    fn func_decl(&mut self) {
        self.start_node(NODE_FUNC_DECL);
        self.bump();
        if self.at(TOKEN_L_PAREN) {
            self.start_node(NODE_RECEIVER);
            self.param_list();
            self.finish_node();
        }
        self.name();
        if self.at(TOKEN_L_BRACK) {
            self.type_param_list();
        }
        self.signature();
        if self.at(TOKEN_L_BRACE) {
            self.block();
        }
        self.finish_node();
    }

    fn name(&mut self) {
        if self.at(TOKEN_IDENT) {
            self.start_node(NODE_NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected a name");
        }
    }

    fn signature(&mut self) {
        self.param_list();
        if self.at(TOKEN_L_PAREN) {
            self.start_node(NODE_RESULT);
            self.param_list();
            self.finish_node();
        } else if self.at_type_start() {
            self.start_node(NODE_RESULT);
            self.ty();
            self.finish_node();
        }
    }

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TOKEN_IDENT
                    | TOKEN_STAR
                    | TOKEN_L_BRACK
                    | TOKEN_MAP
                    | TOKEN_CHAN
                    | TOKEN_FUNC
                    | TOKEN_STRUCT
                    | TOKEN_INTERFACE
                    | TOKEN_ARROW
                    | TOKEN_L_PAREN
            )
        )
    }

    fn param_list(&mut self) {
        self.start_node(NODE_PARAM_LIST);
        if self.eat(TOKEN_L_PAREN) {
            let named = self.params_are_named();
            while !matches!(self.peek(), None | Some(TOKEN_R_PAREN)) {
                self.param(named);
                if !self.eat(TOKEN_COMMA) {
                    break;
                }
            }
            self.expect(TOKEN_R_PAREN);
        } else {
            self.error("expected `(`");
        }
        self.finish_node();
    }

    /// Scan ahead to the closing parenthesis: a list is named as soon as
    /// one entry is an identifier followed by anything other than a
    /// qualifying dot. `T[...]` ending the entry is an instantiated type,
    /// while `name [N]T` or `name []T` continues after the brackets.
    fn params_are_named(&self) -> bool {
        let mut depth = 0usize;
        let mut first = None;
        let mut second = None;
        let mut after_brackets = None;
        let mut len = 0;
        for (kind, _) in self.significant() {
            if depth == 0 && matches!(kind, TOKEN_COMMA | TOKEN_R_PAREN) {
                let named = match (first, second) {
                    (Some(TOKEN_IDENT), Some(TOKEN_L_BRACK)) => after_brackets.is_some(),
                    (Some(TOKEN_IDENT), Some(second)) => second != TOKEN_DOT,
                    _ => false,
                };
                if named {
                    return true;
                }
                if kind == TOKEN_R_PAREN {
                    return false;
                }
                first = None;
                second = None;
                after_brackets = None;
                len = 0;
                continue;
            }
            if depth == 0 && len >= 2 && second == Some(TOKEN_L_BRACK) && after_brackets.is_none() {
                after_brackets = Some(kind);
            }
            match kind {
                TOKEN_L_PAREN | TOKEN_L_BRACK | TOKEN_L_BRACE => depth += 1,
                TOKEN_R_PAREN | TOKEN_R_BRACK | TOKEN_R_BRACE => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            match len {
                0 => first = Some(kind),
                1 => second = Some(kind),
                _ => {}
            }
            len += 1;
        }
        false
    }

    fn param(&mut self, named: bool) {
        self.start_node(NODE_PARAM);
        if named && self.at(TOKEN_IDENT) {
            self.name();
            if !matches!(self.peek(), None | Some(TOKEN_COMMA | TOKEN_R_PAREN)) {
                self.param_type();
            }
        } else {
            self.param_type();
        }
        self.finish_node();
    }

    fn param_type(&mut self) {
        if self.at(TOKEN_ELLIPSIS) {
            self.start_node(NODE_VARIADIC_TYPE);
            self.bump();
            self.ty();
            self.finish_node();
        } else {
            self.ty();
        }
    }

    fn type_param_list(&mut self) {
        self.start_node(NODE_TYPE_PARAM_LIST);
        self.bump();
        while self.at(TOKEN_IDENT) {
            self.start_node(NODE_PARAM);
            self.name();
            if !matches!(self.peek(), None | Some(TOKEN_COMMA | TOKEN_R_BRACK)) {
                self.constraint();
            }
            self.finish_node();
            if !self.eat(TOKEN_COMMA) {
                break;
            }
        }
        self.expect(TOKEN_R_BRACK);
        self.finish_node();
    }

    /// A type, or a union of `~`-prefixed type terms
    fn constraint(&mut self) {
        let checkpoint = self.checkpoint();
        let tilde = self.eat(TOKEN_TILDE);
        self.ty();
        if tilde || self.at(TOKEN_PIPE) {
            self.start_node_at(checkpoint, NODE_CONSTRAINT);
            while self.eat(TOKEN_PIPE) {
                self.eat(TOKEN_TILDE);
                self.ty();
            }
            self.finish_node();
        }
    }

    // Types

    fn ty(&mut self) {
        match self.peek() {
            Some(TOKEN_IDENT) => self.type_name(),
            Some(TOKEN_STAR) => {
                self.start_node(NODE_POINTER_TYPE);
                self.bump();
                self.ty();
                self.finish_node();
            }
            Some(TOKEN_L_BRACK) => self.array_or_slice_type(),
            Some(TOKEN_MAP) => {
                self.start_node(NODE_MAP_TYPE);
                self.bump();
                self.expect(TOKEN_L_BRACK);
                self.ty();
                self.expect(TOKEN_R_BRACK);
                self.ty();
                self.finish_node();
            }
            Some(TOKEN_CHAN) => {
                self.start_node(NODE_CHAN_TYPE);
                self.bump();
                self.eat(TOKEN_ARROW);
                self.ty();
                self.finish_node();
            }
            Some(TOKEN_ARROW) => {
                self.start_node(NODE_CHAN_TYPE);
                self.bump();
                self.expect(TOKEN_CHAN);
                self.ty();
                self.finish_node();
            }
            Some(TOKEN_FUNC) => {
                self.start_node(NODE_FUNC_TYPE);
                self.bump();
                self.signature();
                self.finish_node();
            }
            Some(TOKEN_STRUCT) => self.struct_type(),
            Some(TOKEN_INTERFACE) => self.interface_type(),
            Some(TOKEN_L_PAREN) => {
                self.start_node(NODE_PAREN_TYPE);
                self.bump();
                self.ty();
                self.expect(TOKEN_R_PAREN);
                self.finish_node();
            }
            _ => self.error("expected a type"),
        }
    }

    fn type_name(&mut self) {
        self.start_node(NODE_TYPE_NAME);
        self.bump();
        if self.eat(TOKEN_DOT) {
            self.expect(TOKEN_IDENT);
        }
        if self.at(TOKEN_L_BRACK) {
            self.start_node(NODE_TYPE_ARGS);
            self.bump();
            while !matches!(self.peek(), None | Some(TOKEN_R_BRACK)) {
                self.ty();
                if !self.eat(TOKEN_COMMA) {
                    break;
                }
            }
            self.expect(TOKEN_R_BRACK);
            self.finish_node();
        }
        self.finish_node();
    }

    fn array_or_slice_type(&mut self) {
        if self.nth(1) == Some(TOKEN_R_BRACK) {
            self.start_node(NODE_SLICE_TYPE);
            self.bump();
            self.bump();
        } else {
            self.start_node(NODE_ARRAY_TYPE);
            self.bump();
            if !self.eat(TOKEN_ELLIPSIS) {
                let no_composite = std::mem::replace(&mut self.no_composite, false);
                self.expr();
                self.no_composite = no_composite;
            }
            self.expect(TOKEN_R_BRACK);
        }
        self.ty();
        self.finish_node();
    }

    fn struct_type(&mut self) {
        self.start_node(NODE_STRUCT_TYPE);
        self.bump();
        self.expect(TOKEN_L_BRACE);
        while let Some(kind) = self.peek() {
            if kind == TOKEN_R_BRACE {
                break;
            }
            if self.eat(TOKEN_SEMICOLON) {
                continue;
            }
            let before = self.consumed;
            self.field();
            if self.consumed == before {
                self.error_bump("expected a struct field");
            }
        }
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    fn field(&mut self) {
        self.start_node(NODE_FIELD);
        let embedded = !self.at(TOKEN_IDENT)
            || matches!(
                self.nth(1),
                None | Some(TOKEN_DOT | TOKEN_SEMICOLON | TOKEN_R_BRACE | TOKEN_STRING)
            );
        if embedded {
            self.eat(TOKEN_STAR);
            if self.at(TOKEN_IDENT) {
                self.type_name();
            } else {
                self.error("expected an embedded type");
            }
        } else {
            self.name();
            while self.eat(TOKEN_COMMA) {
                self.name();
            }
            self.ty();
        }
        self.eat(TOKEN_STRING);
        self.finish_node();
    }

    fn interface_type(&mut self) {
        self.start_node(NODE_INTERFACE_TYPE);
        self.bump();
        self.expect(TOKEN_L_BRACE);
        while let Some(kind) = self.peek() {
            if kind == TOKEN_R_BRACE {
                break;
            }
            if self.eat(TOKEN_SEMICOLON) {
                continue;
            }
            let before = self.consumed;
            if kind == TOKEN_IDENT && self.nth(1) == Some(TOKEN_L_PAREN) {
                self.start_node(NODE_METHOD_SPEC);
                self.name();
                self.signature();
                self.finish_node();
            } else {
                self.constraint();
            }
            if self.consumed == before {
                self.error_bump("expected a method or embedded type");
            }
        }
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    // Statements

    fn block(&mut self) {
        self.start_node(NODE_BLOCK);
        self.expect(TOKEN_L_BRACE);
        let no_composite = std::mem::replace(&mut self.no_composite, false);
        self.stmt_list();
        self.no_composite = no_composite;
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    fn stmt_list(&mut self) {
        while let Some(kind) = self.peek() {
            if matches!(kind, TOKEN_R_BRACE | TOKEN_CASE | TOKEN_DEFAULT) {
                break;
            }
            if self.eat(TOKEN_SEMICOLON) {
                continue;
            }
            let before = self.consumed;
            self.stmt();
            if self.consumed == before {
                self.error_bump("expected a statement");
            }
        }
    }

    fn stmt(&mut self) {
        match self.peek() {
            Some(TOKEN_VAR | TOKEN_CONST | TOKEN_TYPE) => self.decl(),
            Some(TOKEN_L_BRACE) => self.block(),
            Some(TOKEN_IF) => self.if_stmt(),
            Some(TOKEN_FOR) => self.for_stmt(),
            Some(TOKEN_SWITCH) => self.switch_stmt(),
            Some(TOKEN_SELECT) => self.select_stmt(),
            Some(TOKEN_GO) => self.keyword_stmt(NODE_GO_STMT),
            Some(TOKEN_DEFER) => self.keyword_stmt(NODE_DEFER_STMT),
            Some(TOKEN_RETURN) => {
                self.start_node(NODE_RETURN_STMT);
                self.bump();
                if !matches!(self.peek(), None | Some(TOKEN_SEMICOLON | TOKEN_R_BRACE)) {
                    self.expr_list();
                }
                self.finish_node();
            }
            Some(TOKEN_BREAK | TOKEN_CONTINUE | TOKEN_GOTO) => {
                self.start_node(NODE_BRANCH_STMT);
                self.bump();
                self.eat(TOKEN_IDENT);
                self.finish_node();
            }
            Some(TOKEN_FALLTHROUGH) => {
                self.start_node(NODE_BRANCH_STMT);
                self.bump();
                self.finish_node();
            }
            Some(TOKEN_IDENT) if self.nth(1) == Some(TOKEN_COLON) => {
                self.start_node(NODE_LABELED_STMT);
                self.bump();
                self.bump();
                if !matches!(self.peek(), None | Some(TOKEN_SEMICOLON | TOKEN_R_BRACE)) {
                    self.stmt();
                }
                self.finish_node();
            }
            _ => self.simple_stmt(),
        }
    }

    fn keyword_stmt(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expr();
        self.finish_node();
    }

    fn simple_stmt(&mut self) {
        let checkpoint = self.checkpoint();
        let count = self.bare_expr_list();
        self.finish_simple_stmt(checkpoint, count);
    }

    /// Wrap the expression list parsed since `checkpoint` into the
    /// statement the next token calls for
    fn finish_simple_stmt(&mut self, checkpoint: Checkpoint, count: usize) {
        match self.peek() {
            Some(kind @ (TOKEN_DEFINE | TOKEN_ASSIGN | TOKEN_ASSIGN_OP)) => {
                let stmt = if kind == TOKEN_DEFINE {
                    NODE_SHORT_VAR_DECL
                } else {
                    NODE_ASSIGN_STMT
                };
                self.start_node_at(checkpoint, stmt);
                self.start_node_at(checkpoint, NODE_EXPR_LIST);
                self.finish_node();
                self.bump();
                self.expr_list();
                self.finish_node();
            }
            Some(TOKEN_INC | TOKEN_DEC) if count == 1 => {
                self.start_node_at(checkpoint, NODE_INC_DEC_STMT);
                self.bump();
                self.finish_node();
            }
            Some(TOKEN_ARROW) if count == 1 => {
                self.start_node_at(checkpoint, NODE_SEND_STMT);
                self.bump();
                self.expr();
                self.finish_node();
            }
            _ => {
                self.start_node_at(checkpoint, NODE_EXPR_STMT);
                self.finish_node();
                if count > 1 {
                    self.error("expected `=` or `:=` after expression list");
                }
            }
        }
    }

    fn at_simple_stmt_op(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TOKEN_DEFINE
                    | TOKEN_ASSIGN
                    | TOKEN_ASSIGN_OP
                    | TOKEN_INC
                    | TOKEN_DEC
                    | TOKEN_ARROW
                    | TOKEN_SEMICOLON
            )
        )
    }

    /// `[init ;] tail` as found in if and switch headers
    fn clause_header(&mut self, tail: Spec<'a>) {
        if self.eat(TOKEN_SEMICOLON) {
            if !self.at(TOKEN_L_BRACE) {
                tail(self);
            }
            return;
        }
        let checkpoint = self.checkpoint();
        let count = self.bare_expr_list();
        if self.at_simple_stmt_op() {
            self.finish_simple_stmt(checkpoint, count);
            if self.eat(TOKEN_SEMICOLON) && !self.at(TOKEN_L_BRACE) {
                tail(self);
            }
        } else if count > 1 {
            self.error("expected a single expression");
        }
    }

    fn if_stmt(&mut self) {
        self.start_node(NODE_IF_STMT);
        self.bump();
        let no_composite = std::mem::replace(&mut self.no_composite, true);
        self.clause_header(Self::expr);
        self.no_composite = no_composite;
        self.block();
        if self.eat(TOKEN_ELSE) {
            match self.peek() {
                Some(TOKEN_IF) => self.if_stmt(),
                Some(TOKEN_L_BRACE) => self.block(),
                _ => self.error("expected `if` or block after `else`"),
            }
        }
        self.finish_node();
    }

    fn for_stmt(&mut self) {
        self.start_node(NODE_FOR_STMT);
        self.bump();
        let no_composite = std::mem::replace(&mut self.no_composite, true);
        match self.peek() {
            Some(TOKEN_L_BRACE) => {}
            Some(TOKEN_RANGE) => {
                self.start_node(NODE_RANGE_CLAUSE);
                self.bump();
                self.expr();
                self.finish_node();
            }
            Some(TOKEN_SEMICOLON) => {
                self.start_node(NODE_FOR_CLAUSE);
                self.for_clause_rest();
                self.finish_node();
            }
            _ => self.for_header(),
        }
        self.no_composite = no_composite;
        self.block();
        self.finish_node();
    }

    fn for_header(&mut self) {
        let checkpoint = self.checkpoint();
        let count = self.bare_expr_list();
        match self.peek() {
            Some(TOKEN_DEFINE | TOKEN_ASSIGN) if self.nth(1) == Some(TOKEN_RANGE) => {
                self.start_node_at(checkpoint, NODE_RANGE_CLAUSE);
                self.start_node_at(checkpoint, NODE_EXPR_LIST);
                self.finish_node();
                self.bump();
                self.bump();
                self.expr();
                self.finish_node();
            }
            // condition only
            Some(TOKEN_L_BRACE) if count == 1 => {}
            _ => {
                self.start_node_at(checkpoint, NODE_FOR_CLAUSE);
                self.finish_simple_stmt(checkpoint, count);
                self.for_clause_rest();
                self.finish_node();
            }
        }
    }

    /// `; [cond] ; [post]` after the init statement of a for clause
    fn for_clause_rest(&mut self) {
        self.expect(TOKEN_SEMICOLON);
        if !self.at(TOKEN_SEMICOLON) {
            self.expr();
        }
        self.expect(TOKEN_SEMICOLON);
        if !self.at(TOKEN_L_BRACE) {
            self.simple_stmt();
        }
    }

    fn switch_stmt(&mut self) {
        self.start_node(NODE_SWITCH_STMT);
        self.bump();
        let no_composite = std::mem::replace(&mut self.no_composite, true);
        if !self.at(TOKEN_L_BRACE) {
            self.clause_header(Self::switch_tag);
        }
        self.no_composite = no_composite;
        self.expect(TOKEN_L_BRACE);
        while let Some(kind) = self.peek() {
            match kind {
                TOKEN_CASE | TOKEN_DEFAULT => self.case_clause(NODE_CASE_CLAUSE),
                TOKEN_SEMICOLON => self.bump(),
                TOKEN_R_BRACE => break,
                _ => self.error_bump("expected `case` or `default`"),
            }
        }
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    /// Switch tag, or the `v := x.(type)` guard of a type switch
    fn switch_tag(&mut self) {
        let checkpoint = self.checkpoint();
        let count = self.bare_expr_list();
        if matches!(self.peek(), Some(TOKEN_DEFINE | TOKEN_ASSIGN)) {
            self.finish_simple_stmt(checkpoint, count);
        } else if count > 1 {
            self.error("expected a single expression");
        }
    }

    fn select_stmt(&mut self) {
        self.start_node(NODE_SELECT_STMT);
        self.bump();
        self.expect(TOKEN_L_BRACE);
        while let Some(kind) = self.peek() {
            match kind {
                TOKEN_CASE | TOKEN_DEFAULT => self.case_clause(NODE_COMM_CLAUSE),
                TOKEN_SEMICOLON => self.bump(),
                TOKEN_R_BRACE => break,
                _ => self.error_bump("expected `case` or `default`"),
            }
        }
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    fn case_clause(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        if self.eat(TOKEN_CASE) {
            if kind == NODE_COMM_CLAUSE {
                self.simple_stmt();
            } else {
                self.expr_list();
            }
        } else {
            self.bump();
        }
        self.expect(TOKEN_COLON);
        self.stmt_list();
        self.finish_node();
    }

    // Expressions

    fn expr_list(&mut self) {
        self.start_node(NODE_EXPR_LIST);
        self.bare_expr_list();
        self.finish_node();
    }

    fn bare_expr_list(&mut self) -> usize {
        let mut count = 1;
        self.expr();
        while self.eat(TOKEN_COMMA) {
            self.expr();
            count += 1;
        }
        count
    }

    fn expr(&mut self) {
        self.binary_expr(1);
    }

    fn binary_precedence(&self) -> Option<u8> {
        let (kind, text) = self.peek_token()?;
        match kind {
            TOKEN_STAR | TOKEN_AMP => Some(5),
            TOKEN_PIPE => Some(4),
            TOKEN_OPERATOR => match text {
                "||" => Some(1),
                "&&" => Some(2),
                "==" | "!=" | "<" | "<=" | ">" | ">=" => Some(3),
                "+" | "-" | "^" => Some(4),
                "/" | "%" | "<<" | ">>" | "&^" => Some(5),
                _ => None,
            },
            _ => None,
        }
    }

    fn binary_expr(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.unary_expr();
        while let Some(precedence) = self.binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            self.start_node_at(checkpoint, NODE_BINARY_EXPR);
            self.bump();
            self.binary_expr(precedence + 1);
            self.finish_node();
        }
    }

    fn unary_expr(&mut self) {
        let unary = match self.peek_token() {
            Some((TOKEN_ARROW, _)) => self.nth(1) != Some(TOKEN_CHAN),
            Some((TOKEN_STAR | TOKEN_AMP | TOKEN_TILDE, _)) => true,
            Some((TOKEN_OPERATOR, text)) => matches!(text, "+" | "-" | "!" | "^"),
            _ => false,
        };
        if unary {
            self.start_node(NODE_UNARY_EXPR);
            self.bump();
            self.unary_expr();
            self.finish_node();
        } else {
            self.primary_expr();
        }
    }

    fn primary_expr(&mut self) {
        let checkpoint = self.checkpoint();
        let mut composite = self.operand();
        loop {
            match self.peek() {
                Some(TOKEN_DOT) if self.nth(1) == Some(TOKEN_L_PAREN) => {
                    self.start_node_at(checkpoint, NODE_TYPE_ASSERT_EXPR);
                    self.bump();
                    self.bump();
                    if !self.eat(TOKEN_TYPE) {
                        self.ty();
                    }
                    self.expect(TOKEN_R_PAREN);
                    self.finish_node();
                    composite = Composite::No;
                }
                Some(TOKEN_DOT) => {
                    self.start_node_at(checkpoint, NODE_SELECTOR_EXPR);
                    self.bump();
                    self.name();
                    self.finish_node();
                    if composite != Composite::Named {
                        composite = Composite::No;
                    }
                }
                Some(TOKEN_L_PAREN) => {
                    self.start_node_at(checkpoint, NODE_CALL_EXPR);
                    self.arg_list();
                    self.finish_node();
                    composite = Composite::No;
                }
                Some(TOKEN_L_BRACK) => {
                    self.index_or_slice(checkpoint);
                    if composite != Composite::Named {
                        composite = Composite::No;
                    }
                }
                Some(TOKEN_L_BRACE)
                    if composite == Composite::Literal
                        || (composite == Composite::Named && !self.no_composite) =>
                {
                    self.start_node_at(checkpoint, NODE_COMPOSITE_LIT);
                    self.literal_value();
                    self.finish_node();
                    composite = Composite::No;
                }
                _ => break,
            }
        }
    }

    fn operand(&mut self) -> Composite {
        match self.peek() {
            Some(TOKEN_IDENT) => {
                self.start_node(NODE_IDENT);
                self.bump();
                self.finish_node();
                Composite::Named
            }
            Some(kind) if kind.is_literal() => {
                self.start_node(NODE_LITERAL);
                self.bump();
                self.finish_node();
                Composite::No
            }
            Some(TOKEN_L_PAREN) => {
                self.start_node(NODE_PAREN_EXPR);
                self.bump();
                let no_composite = std::mem::replace(&mut self.no_composite, false);
                self.expr();
                self.no_composite = no_composite;
                self.expect(TOKEN_R_PAREN);
                self.finish_node();
                Composite::No
            }
            Some(TOKEN_FUNC) => {
                let checkpoint = self.checkpoint();
                self.bump();
                self.signature();
                if self.at(TOKEN_L_BRACE) {
                    self.start_node_at(checkpoint, NODE_FUNC_LIT);
                    self.block();
                } else {
                    self.start_node_at(checkpoint, NODE_FUNC_TYPE);
                }
                self.finish_node();
                Composite::No
            }
            Some(TOKEN_L_BRACK | TOKEN_MAP | TOKEN_STRUCT) => {
                self.ty();
                Composite::Literal
            }
            Some(TOKEN_CHAN | TOKEN_INTERFACE | TOKEN_ARROW) => {
                self.ty();
                Composite::No
            }
            _ => {
                self.error("expected an expression");
                Composite::No
            }
        }
    }

    fn arg_list(&mut self) {
        self.start_node(NODE_ARG_LIST);
        self.bump();
        let no_composite = std::mem::replace(&mut self.no_composite, false);
        while !matches!(self.peek(), None | Some(TOKEN_R_PAREN)) {
            self.expr();
            self.eat(TOKEN_ELLIPSIS);
            if !self.eat(TOKEN_COMMA) {
                break;
            }
        }
        self.no_composite = no_composite;
        self.expect(TOKEN_R_PAREN);
        self.finish_node();
    }

    fn index_or_slice(&mut self, checkpoint: Checkpoint) {
        let no_composite = std::mem::replace(&mut self.no_composite, false);
        self.bump();
        let mut kind = NODE_INDEX_EXPR;
        if !self.at(TOKEN_COLON) {
            self.expr();
            // type argument lists of generic instantiations
            while self.eat(TOKEN_COMMA) {
                if self.at(TOKEN_R_BRACK) {
                    break;
                }
                self.expr();
            }
        }
        while self.eat(TOKEN_COLON) {
            kind = NODE_SLICE_EXPR;
            if !matches!(self.peek(), None | Some(TOKEN_COLON | TOKEN_R_BRACK)) {
                self.expr();
            }
        }
        self.expect(TOKEN_R_BRACK);
        self.no_composite = no_composite;
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    fn literal_value(&mut self) {
        self.start_node(NODE_LITERAL_VALUE);
        self.bump();
        let no_composite = std::mem::replace(&mut self.no_composite, false);
        while !matches!(self.peek(), None | Some(TOKEN_R_BRACE)) {
            let checkpoint = self.checkpoint();
            self.element();
            if self.eat(TOKEN_COLON) {
                self.start_node_at(checkpoint, NODE_KEYED_ELEMENT);
                self.element();
                self.finish_node();
            }
            if !self.eat(TOKEN_COMMA) {
                break;
            }
        }
        self.no_composite = no_composite;
        self.expect(TOKEN_R_BRACE);
        self.finish_node();
    }

    fn element(&mut self) {
        if self.at(TOKEN_L_BRACE) {
            self.literal_value();
        } else {
            self.expr();
        }
    }
}
