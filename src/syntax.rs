//! Syntax kinds and the rowan language for Go source trees.

use rowan::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // trivia and leaf tokens
    TOKEN_WHITESPACE = 0,
    TOKEN_COMMENT,
    TOKEN_ERROR,
    TOKEN_IDENT,
    TOKEN_INT,
    TOKEN_FLOAT,
    TOKEN_IMAG,
    TOKEN_CHAR,
    TOKEN_STRING,

    // keywords
    TOKEN_BREAK,
    TOKEN_CASE,
    TOKEN_CHAN,
    TOKEN_CONST,
    TOKEN_CONTINUE,
    TOKEN_DEFAULT,
    TOKEN_DEFER,
    TOKEN_ELSE,
    TOKEN_FALLTHROUGH,
    TOKEN_FOR,
    TOKEN_FUNC,
    TOKEN_GO,
    TOKEN_GOTO,
    TOKEN_IF,
    TOKEN_IMPORT,
    TOKEN_INTERFACE,
    TOKEN_MAP,
    TOKEN_PACKAGE,
    TOKEN_RANGE,
    TOKEN_RETURN,
    TOKEN_SELECT,
    TOKEN_STRUCT,
    TOKEN_SWITCH,
    TOKEN_TYPE,
    TOKEN_VAR,

    // punctuation
    TOKEN_L_PAREN,
    TOKEN_R_PAREN,
    TOKEN_L_BRACK,
    TOKEN_R_BRACK,
    TOKEN_L_BRACE,
    TOKEN_R_BRACE,
    TOKEN_COMMA,
    TOKEN_SEMICOLON,
    TOKEN_DOT,
    TOKEN_ELLIPSIS,
    TOKEN_COLON,
    TOKEN_DEFINE,
    TOKEN_ASSIGN,
    TOKEN_ASSIGN_OP,
    TOKEN_ARROW,
    TOKEN_INC,
    TOKEN_DEC,
    TOKEN_STAR,
    TOKEN_AMP,
    TOKEN_TILDE,
    TOKEN_PIPE,
    TOKEN_OPERATOR,

    // top level
    NODE_SOURCE_FILE,
    NODE_ERROR,
    NODE_PACKAGE_CLAUSE,
    NODE_IMPORT_DECL,
    NODE_IMPORT_SPEC,
    NODE_FUNC_DECL,
    NODE_RECEIVER,
    NODE_TYPE_PARAM_LIST,
    NODE_PARAM_LIST,
    NODE_PARAM,
    NODE_RESULT,
    NODE_NAME,
    NODE_VAR_DECL,
    NODE_CONST_DECL,
    NODE_TYPE_DECL,
    NODE_VAR_SPEC,
    NODE_CONST_SPEC,
    NODE_TYPE_SPEC,

    // types
    NODE_TYPE_NAME,
    NODE_TYPE_ARGS,
    NODE_POINTER_TYPE,
    NODE_ARRAY_TYPE,
    NODE_SLICE_TYPE,
    NODE_MAP_TYPE,
    NODE_CHAN_TYPE,
    NODE_FUNC_TYPE,
    NODE_STRUCT_TYPE,
    NODE_FIELD,
    NODE_INTERFACE_TYPE,
    NODE_METHOD_SPEC,
    NODE_CONSTRAINT,
    NODE_PAREN_TYPE,
    NODE_VARIADIC_TYPE,

    // statements
    NODE_BLOCK,
    NODE_EXPR_STMT,
    NODE_SEND_STMT,
    NODE_INC_DEC_STMT,
    NODE_ASSIGN_STMT,
    NODE_SHORT_VAR_DECL,
    NODE_IF_STMT,
    NODE_FOR_STMT,
    NODE_FOR_CLAUSE,
    NODE_RANGE_CLAUSE,
    NODE_SWITCH_STMT,
    NODE_SELECT_STMT,
    NODE_CASE_CLAUSE,
    NODE_COMM_CLAUSE,
    NODE_GO_STMT,
    NODE_DEFER_STMT,
    NODE_RETURN_STMT,
    NODE_BRANCH_STMT,
    NODE_LABELED_STMT,

    // expressions
    NODE_IDENT,
    NODE_LITERAL,
    NODE_COMPOSITE_LIT,
    NODE_LITERAL_VALUE,
    NODE_KEYED_ELEMENT,
    NODE_FUNC_LIT,
    NODE_PAREN_EXPR,
    NODE_SELECTOR_EXPR,
    NODE_INDEX_EXPR,
    NODE_SLICE_EXPR,
    NODE_TYPE_ASSERT_EXPR,
    NODE_CALL_EXPR,
    NODE_ARG_LIST,
    NODE_UNARY_EXPR,
    NODE_BINARY_EXPR,
    NODE_EXPR_LIST,

    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Whitespace and comments, skipped by the parser
    pub fn is_trivia(self) -> bool {
        matches!(self, TOKEN_WHITESPACE | TOKEN_COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        TOKEN_BREAK as u16 <= self as u16 && self as u16 <= TOKEN_VAR as u16
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TOKEN_INT | TOKEN_FLOAT | TOKEN_IMAG | TOKEN_CHAR | TOKEN_STRING)
    }

    /// Map an identifier-shaped word to its keyword kind, if it is one
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "break" => TOKEN_BREAK,
            "case" => TOKEN_CASE,
            "chan" => TOKEN_CHAN,
            "const" => TOKEN_CONST,
            "continue" => TOKEN_CONTINUE,
            "default" => TOKEN_DEFAULT,
            "defer" => TOKEN_DEFER,
            "else" => TOKEN_ELSE,
            "fallthrough" => TOKEN_FALLTHROUGH,
            "for" => TOKEN_FOR,
            "func" => TOKEN_FUNC,
            "go" => TOKEN_GO,
            "goto" => TOKEN_GOTO,
            "if" => TOKEN_IF,
            "import" => TOKEN_IMPORT,
            "interface" => TOKEN_INTERFACE,
            "map" => TOKEN_MAP,
            "package" => TOKEN_PACKAGE,
            "range" => TOKEN_RANGE,
            "return" => TOKEN_RETURN,
            "select" => TOKEN_SELECT,
            "struct" => TOKEN_STRUCT,
            "switch" => TOKEN_SWITCH,
            "type" => TOKEN_TYPE,
            "var" => TOKEN_VAR,
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Every kind in discriminant order
const KINDS: [SyntaxKind; __LAST as usize] = [
    TOKEN_WHITESPACE, TOKEN_COMMENT, TOKEN_ERROR, TOKEN_IDENT, TOKEN_INT,
    TOKEN_FLOAT, TOKEN_IMAG, TOKEN_CHAR, TOKEN_STRING, TOKEN_BREAK, TOKEN_CASE,
    TOKEN_CHAN, TOKEN_CONST, TOKEN_CONTINUE, TOKEN_DEFAULT, TOKEN_DEFER,
    TOKEN_ELSE, TOKEN_FALLTHROUGH, TOKEN_FOR, TOKEN_FUNC, TOKEN_GO, TOKEN_GOTO,
    TOKEN_IF, TOKEN_IMPORT, TOKEN_INTERFACE, TOKEN_MAP, TOKEN_PACKAGE,
    TOKEN_RANGE, TOKEN_RETURN, TOKEN_SELECT, TOKEN_STRUCT, TOKEN_SWITCH,
    TOKEN_TYPE, TOKEN_VAR, TOKEN_L_PAREN, TOKEN_R_PAREN, TOKEN_L_BRACK,
    TOKEN_R_BRACK, TOKEN_L_BRACE, TOKEN_R_BRACE, TOKEN_COMMA, TOKEN_SEMICOLON,
    TOKEN_DOT, TOKEN_ELLIPSIS, TOKEN_COLON, TOKEN_DEFINE, TOKEN_ASSIGN,
    TOKEN_ASSIGN_OP, TOKEN_ARROW, TOKEN_INC, TOKEN_DEC, TOKEN_STAR, TOKEN_AMP,
    TOKEN_TILDE, TOKEN_PIPE, TOKEN_OPERATOR, NODE_SOURCE_FILE, NODE_ERROR,
    NODE_PACKAGE_CLAUSE, NODE_IMPORT_DECL, NODE_IMPORT_SPEC, NODE_FUNC_DECL,
    NODE_RECEIVER, NODE_TYPE_PARAM_LIST, NODE_PARAM_LIST, NODE_PARAM,
    NODE_RESULT, NODE_NAME, NODE_VAR_DECL, NODE_CONST_DECL, NODE_TYPE_DECL,
    NODE_VAR_SPEC, NODE_CONST_SPEC, NODE_TYPE_SPEC, NODE_TYPE_NAME,
    NODE_TYPE_ARGS, NODE_POINTER_TYPE, NODE_ARRAY_TYPE, NODE_SLICE_TYPE,
    NODE_MAP_TYPE, NODE_CHAN_TYPE, NODE_FUNC_TYPE, NODE_STRUCT_TYPE, NODE_FIELD,
    NODE_INTERFACE_TYPE, NODE_METHOD_SPEC, NODE_CONSTRAINT, NODE_PAREN_TYPE,
    NODE_VARIADIC_TYPE, NODE_BLOCK, NODE_EXPR_STMT, NODE_SEND_STMT,
    NODE_INC_DEC_STMT, NODE_ASSIGN_STMT, NODE_SHORT_VAR_DECL, NODE_IF_STMT,
    NODE_FOR_STMT, NODE_FOR_CLAUSE, NODE_RANGE_CLAUSE, NODE_SWITCH_STMT,
    NODE_SELECT_STMT, NODE_CASE_CLAUSE, NODE_COMM_CLAUSE, NODE_GO_STMT,
    NODE_DEFER_STMT, NODE_RETURN_STMT, NODE_BRANCH_STMT, NODE_LABELED_STMT,
    NODE_IDENT, NODE_LITERAL, NODE_COMPOSITE_LIT, NODE_LITERAL_VALUE,
    NODE_KEYED_ELEMENT, NODE_FUNC_LIT, NODE_PAREN_EXPR, NODE_SELECTOR_EXPR,
    NODE_INDEX_EXPR, NODE_SLICE_EXPR, NODE_TYPE_ASSERT_EXPR, NODE_CALL_EXPR,
    NODE_ARG_LIST, NODE_UNARY_EXPR, NODE_BINARY_EXPR, NODE_EXPR_LIST,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        assert!(raw.0 < __LAST as u16);
        KINDS[usize::from(raw.0)]
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;

/// The identifier text of a `NODE_NAME` or `NODE_IDENT`
pub fn ident_text(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|child| child.into_token())
        .find(|token| token.kind() == TOKEN_IDENT)
        .map(|token| token.text().to_string())
}

/// Direct child nodes of `node` with the given kind
pub fn children_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    node.children().filter(move |child| child.kind() == kind)
}

/// Whether `node` has a direct child token of the given kind
pub fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .any(|child| child.kind() == kind)
}

/// Converts byte offsets into 1-based line numbers
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from(offset as u32 + 1))
        );
        LineIndex { line_starts }
    }

    pub fn line(&self, offset: TextSize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// 1-based line and 0-based byte column of the start of `range`
    pub fn line_col(&self, range: TextRange) -> (usize, usize) {
        let line = self.line(range.start());
        let col = range.start() - self.line_starts[line - 1];
        (line, usize::from(col))
    }
}
