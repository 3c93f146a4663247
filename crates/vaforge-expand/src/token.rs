use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::{ExpandError, ExpandResult};

/// Names of the macros a token must not trigger again.
pub(crate) type HideSet = Rc<BTreeSet<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    /// String or character literal, quotes included.
    Literal,
    Punct,
}

/// A preprocessing token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Whitespace preceded the token in its source.
    pub leading_space: bool,
    pub(crate) hide: HideSet,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, leading_space: bool) -> Self {
        Self {
            kind,
            text: text.into(),
            leading_space,
            hide: HideSet::default(),
        }
    }

    pub(crate) fn comma() -> Self {
        Self::new(TokenKind::Punct, ",", false)
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.hide.contains(&self.text)
    }

    pub(crate) fn with_space(mut self, leading_space: bool) -> Self {
        self.leading_space = leading_space;
        self
    }

    /// Adds every name of `hide` to this token's hide set.
    pub(crate) fn hidden_by(mut self, hide: &BTreeSet<String>) -> Self {
        if !hide.is_subset(&self.hide) {
            let merged: BTreeSet<String> = self.hide.union(hide).cloned().collect();
            self.hide = Rc::new(merged);
        }
        self
    }
}

const PUNCTUATORS: &[&str] = &[
    "...", "<<=", ">>=", "##", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "::",
];

const SINGLE_PUNCTUATORS: &str = "#()[]{},;:?.+-*/%<>=!&|^~";

/// Splits `src` into preprocessing tokens; newlines count as whitespace.
pub fn tokenize(src: &str) -> ExpandResult<Vec<Token>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut offset = 0;
    let mut space = false;

    while offset < bytes.len() {
        let rest = &src[offset..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch.is_whitespace() {
            space = true;
            offset += ch.len_utf8();
            continue;
        }

        let (kind, len) = if ch == '_' || ch.is_ascii_alphabetic() {
            (TokenKind::Ident, scan_while(rest, |c| c == '_' || c.is_ascii_alphanumeric()))
        } else if ch.is_ascii_digit() || (ch == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit())) {
            (TokenKind::Number, scan_number(rest))
        } else if ch == '"' || ch == '\'' {
            (TokenKind::Literal, scan_literal(rest, ch, offset)?)
        } else if let Some(punct) = PUNCTUATORS.iter().find(|punct| rest.starts_with(**punct)) {
            (TokenKind::Punct, punct.len())
        } else if SINGLE_PUNCTUATORS.contains(ch) {
            (TokenKind::Punct, 1)
        } else {
            return Err(ExpandError::UnexpectedChar { ch, offset });
        };

        tokens.push(Token::new(kind, &rest[..len], space));
        space = false;
        offset += len;
    }

    Ok(tokens)
}

fn scan_while(rest: &str, accept: impl Fn(char) -> bool) -> usize {
    rest.char_indices()
        .find(|(_, c)| !accept(*c))
        .map_or(rest.len(), |(index, _)| index)
}

// pp-number: digits, letters, '_', '.', and a sign right after an exponent.
fn scan_number(rest: &str) -> usize {
    let mut len = 0;
    let mut prev = '\0';
    for c in rest.chars() {
        let accepted = c.is_ascii_alphanumeric()
            || c == '_'
            || c == '.'
            || ((c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P'));
        if !accepted {
            break;
        }
        len += c.len_utf8();
        prev = c;
    }
    len
}

fn scan_literal(rest: &str, quote: char, offset: usize) -> ExpandResult<usize> {
    let mut escaped = false;
    for (index, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok(index + 1);
        } else if c == '\n' {
            break;
        }
    }
    Err(ExpandError::Unterminated {
        what: "literal",
        offset,
    })
}

/// Spells `tokens` the way `#` would, without the surrounding quotes.
pub(crate) fn spell(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 && token.leading_space {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}
