//! Go tokenizer with automatic semicolon insertion.

use crate::syntax::SyntaxKind::{self, *};

const OPERATORS: &[(&str, SyntaxKind)] = &[
    ("<<=", TOKEN_ASSIGN_OP),
    (">>=", TOKEN_ASSIGN_OP),
    ("&^=", TOKEN_ASSIGN_OP),
    ("...", TOKEN_ELLIPSIS),
    ("&&", TOKEN_OPERATOR),
    ("||", TOKEN_OPERATOR),
    ("<-", TOKEN_ARROW),
    ("++", TOKEN_INC),
    ("--", TOKEN_DEC),
    ("==", TOKEN_OPERATOR),
    ("!=", TOKEN_OPERATOR),
    ("<=", TOKEN_OPERATOR),
    (">=", TOKEN_OPERATOR),
    (":=", TOKEN_DEFINE),
    ("<<", TOKEN_OPERATOR),
    (">>", TOKEN_OPERATOR),
    ("&^", TOKEN_OPERATOR),
    ("+=", TOKEN_ASSIGN_OP),
    ("-=", TOKEN_ASSIGN_OP),
    ("*=", TOKEN_ASSIGN_OP),
    ("/=", TOKEN_ASSIGN_OP),
    ("%=", TOKEN_ASSIGN_OP),
    ("&=", TOKEN_ASSIGN_OP),
    ("|=", TOKEN_ASSIGN_OP),
    ("^=", TOKEN_ASSIGN_OP),
    ("+", TOKEN_OPERATOR),
    ("-", TOKEN_OPERATOR),
    ("!", TOKEN_OPERATOR),
    ("^", TOKEN_OPERATOR),
    ("/", TOKEN_OPERATOR),
    ("%", TOKEN_OPERATOR),
    ("<", TOKEN_OPERATOR),
    (">", TOKEN_OPERATOR),
    ("*", TOKEN_STAR),
    ("&", TOKEN_AMP),
    ("|", TOKEN_PIPE),
    ("~", TOKEN_TILDE),
    ("=", TOKEN_ASSIGN),
    (":", TOKEN_COLON),
    (".", TOKEN_DOT),
    (",", TOKEN_COMMA),
    (";", TOKEN_SEMICOLON),
    ("(", TOKEN_L_PAREN),
    (")", TOKEN_R_PAREN),
    ("[", TOKEN_L_BRACK),
    ("]", TOKEN_R_BRACK),
    ("{", TOKEN_L_BRACE),
    ("}", TOKEN_R_BRACE),
];

/// Split `input` into tokens, trivia included.
///
/// A newline that ends a line whose last token may end a statement is
/// emitted as a `TOKEN_SEMICOLON` with the text `"\n"`, so the returned
/// tokens always concatenate back to `input`.
pub fn tokenize(input: &str) -> Vec<(SyntaxKind, &str)> {
    let mut lexer = Lexer {
        input,
        pos: 0,
        insert_semicolon: false,
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    insert_semicolon: bool,
    tokens: Vec<(SyntaxKind, &'a str)>,
}

/// Tokens after which a newline terminates the statement
fn ends_statement(kind: SyntaxKind) -> bool {
    kind == TOKEN_IDENT
        || kind.is_literal()
        || matches!(
            kind,
            TOKEN_BREAK
                | TOKEN_CONTINUE
                | TOKEN_FALLTHROUGH
                | TOKEN_RETURN
                | TOKEN_INC
                | TOKEN_DEC
                | TOKEN_R_PAREN
                | TOKEN_R_BRACK
                | TOKEN_R_BRACE
        )
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let kind = self.next_kind(c);
            match kind {
                TOKEN_WHITESPACE | TOKEN_COMMENT => {}
                TOKEN_SEMICOLON => self.insert_semicolon = false,
                _ => self.insert_semicolon = ends_statement(kind),
            }
            self.tokens.push((kind, &self.input[start..self.pos]));
        }
    }

    fn next_kind(&mut self, c: char) -> SyntaxKind {
        match c {
            '\n' if self.insert_semicolon => {
                self.pos += 1;
                TOKEN_SEMICOLON
            }
            c if c.is_whitespace() => {
                let insert_semicolon = self.insert_semicolon;
                self.bump_while(|c| c.is_whitespace() && !(c == '\n' && insert_semicolon));
                TOKEN_WHITESPACE
            }
            '/' if self.peek_nth(1) == Some('/') => {
                self.bump_while(|c| c != '\n');
                TOKEN_COMMENT
            }
            '/' if self.peek_nth(1) == Some('*') => match self.rest()[2..].find("*/") {
                Some(end) => {
                    self.pos += end + 4;
                    TOKEN_COMMENT
                }
                None => {
                    self.pos = self.input.len();
                    TOKEN_ERROR
                }
            },
            c if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                self.bump_while(|c| c.is_alphanumeric() || c == '_');
                SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(TOKEN_IDENT)
            }
            c if c.is_ascii_digit() => self.number(),
            '.' if self.peek_nth(1).map_or(false, |c| c.is_ascii_digit()) => self.number(),
            '"' => self.quoted('"', TOKEN_STRING),
            '\'' => self.quoted('\'', TOKEN_CHAR),
            '`' => {
                self.bump();
                match self.rest().find('`') {
                    Some(end) => {
                        self.pos += end + 1;
                        TOKEN_STRING
                    }
                    None => {
                        self.pos = self.input.len();
                        TOKEN_ERROR
                    }
                }
            }
            _ => {
                let rest = self.rest();
                match OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
                    Some((op, kind)) => {
                        self.pos += op.len();
                        *kind
                    }
                    None => {
                        self.bump();
                        TOKEN_ERROR
                    }
                }
            }
        }
    }

    fn number(&mut self) -> SyntaxKind {
        let mut kind = TOKEN_INT;
        let prefix = self.rest().get(..2).map(|prefix| prefix.to_ascii_lowercase());
        match prefix.as_deref() {
            Some("0x") => {
                self.pos += 2;
                self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
                if self.peek() == Some('.') {
                    kind = TOKEN_FLOAT;
                    self.bump();
                    self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
                }
                if matches!(self.peek(), Some('p' | 'P')) {
                    kind = TOKEN_FLOAT;
                    self.exponent();
                }
            }
            Some("0b") | Some("0o") => {
                self.pos += 2;
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
            }
            _ => {
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
                if self.peek() == Some('.') {
                    kind = TOKEN_FLOAT;
                    self.bump();
                    self.bump_while(|c| c.is_ascii_digit() || c == '_');
                }
                if matches!(self.peek(), Some('e' | 'E')) {
                    kind = TOKEN_FLOAT;
                    self.exponent();
                }
            }
        }
        if self.peek() == Some('i') {
            self.bump();
            kind = TOKEN_IMAG;
        }
        kind
    }

    fn exponent(&mut self) {
        self.bump();
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        self.bump_while(|c| c.is_ascii_digit() || c == '_');
    }

    /// Interpreted string or rune literal; a newline or EOF before the
    /// closing quote is an error
    fn quoted(&mut self, quote: char, kind: SyntaxKind) -> SyntaxKind {
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return TOKEN_ERROR,
                Some('\\') => {
                    self.bump();
                    if self.peek().map_or(false, |c| c != '\n') {
                        self.bump();
                    }
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return kind;
                    }
                }
            }
        }
    }
}
