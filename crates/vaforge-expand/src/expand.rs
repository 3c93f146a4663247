//! Macro expansion with hide sets.
//!
//! Every token carries the set of macro names it must not re-trigger. A
//! function-like invocation hides its own name in the tokens it produces,
//! intersected with the hide set of the closing parenthesis, so a macro can
//! be invoked again by text that merely follows its expansion.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::define::{MacroDef, parse_define, parse_definition};
use crate::error::{ExpandError, ExpandResult};
use crate::token::{Token, TokenKind, spell, tokenize};

/// Default ceiling on macro invocations per [`Preprocessor::expand`] call.
pub const DEFAULT_STEP_LIMIT: usize = 200_000;
/// Default ceiling on nested argument pre-expansion.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// The result of expanding a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    tokens: Vec<Token>,
}

impl Expansion {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn spellings(&self) -> Vec<&str> {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token-wise comparison that ignores whitespace.
    pub fn matches(&self, expected: &str) -> bool {
        tokenize(expected).is_ok_and(|expected| {
            expected.len() == self.tokens.len()
                && expected
                    .iter()
                    .zip(&self.tokens)
                    .all(|(want, got)| want.text == got.text)
        })
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&spell(&self.tokens))
    }
}

/// A table of macro definitions and the expander working on it.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    macros: HashMap<String, MacroDef>,
    step_limit: usize,
    depth_limit: usize,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            macros: HashMap::new(),
            step_limit: DEFAULT_STEP_LIMIT,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a preprocessor from the `#define`s of a header.
    pub fn from_source(src: &str) -> ExpandResult<Self> {
        let mut preprocessor = Self::new();
        preprocessor.load(src)?;
        Ok(preprocessor)
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&MacroDef> {
        self.macros.get(name)
    }

    /// Reads the directives of `src` and returns how many macros it defined.
    ///
    /// Only `#define` and `#undef` take effect; conditional directives are
    /// skipped, as are lines of ordinary text.
    pub fn load(&mut self, src: &str) -> ExpandResult<usize> {
        let cleaned = strip_comments(&splice_lines(src))?;
        let mut defined = 0;
        for line in cleaned.lines() {
            let Some(directive) = line.trim_start().strip_prefix('#') else {
                continue;
            };
            let directive = directive.trim_start();
            let keyword_len = directive
                .find(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))
                .unwrap_or(directive.len());
            let (keyword, rest) = directive.split_at(keyword_len);
            match keyword {
                "define" => {
                    self.insert(parse_define(tokenize(rest)?)?);
                    defined += 1;
                }
                "undef" => {
                    if let Some(name) = tokenize(rest)?.first() {
                        self.macros.remove(&name.text);
                    }
                }
                other => trace!(directive = other, "directive skipped"),
            }
        }
        debug!(defined, total = self.macros.len(), "definitions loaded");
        Ok(defined)
    }

    /// Adds a command-line style definition such as `SQUARE(i, x)=x*x`.
    pub fn define(&mut self, definition: &str) -> ExpandResult<()> {
        self.insert(parse_definition(definition)?);
        Ok(())
    }

    fn insert(&mut self, def: MacroDef) {
        if let Some(previous) = self.macros.get(&def.name) {
            if !previous.same_definition(&def) {
                warn!(name = %def.name, "macro redefined");
            }
        }
        self.macros.insert(def.name.clone(), def);
    }

    /// Fully expands `text`.
    pub fn expand(&self, text: &str) -> ExpandResult<Expansion> {
        let mut steps = 0;
        let tokens = self.expand_tokens(tokenize(text)?, 0, &mut steps)?;
        trace!(steps, "expansion finished");
        Ok(Expansion { tokens })
    }

    fn expand_tokens(
        &self,
        input: Vec<Token>,
        depth: usize,
        steps: &mut usize,
    ) -> ExpandResult<Vec<Token>> {
        if depth > self.depth_limit {
            return Err(ExpandError::DepthLimit(self.depth_limit));
        }
        let mut pending: VecDeque<Token> = input.into();
        let mut out = Vec::new();

        while let Some(token) = pending.pop_front() {
            let def = match self.macros.get(&token.text) {
                Some(def) if token.kind == TokenKind::Ident && !token.is_hidden() => def,
                _ => {
                    out.push(token);
                    continue;
                }
            };

            let (args, hide) = if def.is_function_like() {
                if !pending.front().is_some_and(|next| next.is_punct("(")) {
                    out.push(token);
                    continue;
                }
                let (args, close) = collect_args(&mut pending, &def.name)?;
                let mut hide: BTreeSet<String> =
                    token.hide.intersection(&close.hide).cloned().collect();
                hide.insert(def.name.clone());
                (args, hide)
            } else {
                let mut hide: BTreeSet<String> = token.hide.iter().cloned().collect();
                hide.insert(def.name.clone());
                (Vec::new(), hide)
            };

            *steps += 1;
            if *steps > self.step_limit {
                return Err(ExpandError::StepLimit(self.step_limit));
            }

            let actuals = bind(def, args)?;
            let mut replacement = self.substitute(def, &actuals, &hide, depth, steps)?;
            if let Some(first) = replacement.first_mut() {
                first.leading_space = token.leading_space;
            }
            for token in replacement.into_iter().rev() {
                pending.push_front(token);
            }
        }

        Ok(out)
    }

    fn substitute(
        &self,
        def: &MacroDef,
        actuals: &[Vec<Token>],
        hide: &BTreeSet<String>,
        depth: usize,
        steps: &mut usize,
    ) -> ExpandResult<Vec<Token>> {
        let body = &def.body;
        let mut expanded: Vec<Option<Vec<Token>>> = vec![None; actuals.len()];
        let mut out: Vec<Token> = Vec::new();
        let mut index = 0;

        while index < body.len() {
            let token = &body[index];
            let next = body.get(index + 1);
            let param = def.param_index(token);
            let next_param = next.and_then(|next| def.param_index(next));

            if token.is_punct("#") && def.is_function_like() {
                if let Some(param) = next_param {
                    out.push(stringize(&actuals[param], token.leading_space));
                    index += 2;
                    continue;
                }
            }

            if token.is_punct("##") {
                if let Some(next) = next {
                    match next_param {
                        Some(param) => paste(&mut out, actuals[param].clone())?,
                        None => paste(&mut out, vec![next.clone()])?,
                    }
                    index += 2;
                    continue;
                }
            }

            if let Some(param) = param {
                let actual = &actuals[param];
                if next.is_some_and(|next| next.is_punct("##")) {
                    if !actual.is_empty() {
                        out.extend(respace(actual.clone(), token.leading_space));
                        index += 1;
                    } else if let Some(after) = body.get(index + 2).and_then(|t| def.param_index(t)) {
                        out.extend(respace(actuals[after].clone(), token.leading_space));
                        index += 3;
                    } else {
                        index += 2;
                    }
                    continue;
                }

                if expanded[param].is_none() {
                    expanded[param] = Some(self.expand_tokens(actual.clone(), depth + 1, steps)?);
                }
                if let Some(tokens) = &expanded[param] {
                    out.extend(respace(tokens.clone(), token.leading_space));
                }
                index += 1;
                continue;
            }

            out.push(token.clone());
            index += 1;
        }

        Ok(out.into_iter().map(|token| token.hidden_by(hide)).collect())
    }
}

/// Consumes `( args... )` from the front of `pending`.
fn collect_args(
    pending: &mut VecDeque<Token>,
    macro_name: &str,
) -> ExpandResult<(Vec<Vec<Token>>, Token)> {
    pending.pop_front();
    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut depth = 1;

    loop {
        let token = pending
            .pop_front()
            .ok_or_else(|| ExpandError::UnterminatedInvocation {
                macro_name: macro_name.to_string(),
            })?;
        if token.is_punct("(") {
            depth += 1;
        } else if token.is_punct(")") {
            depth -= 1;
            if depth == 0 {
                args.push(current);
                return Ok((args, token));
            }
        } else if token.is_punct(",") && depth == 1 {
            args.push(std::mem::take(&mut current));
            continue;
        }
        current.push(token);
    }
}

/// Lines up call arguments with the parameters of `def`; the variadic
/// tail, when present, is the last entry.
fn bind(def: &MacroDef, mut args: Vec<Vec<Token>>) -> ExpandResult<Vec<Vec<Token>>> {
    let Some(params) = &def.params else {
        return Ok(Vec::new());
    };
    let named = params.len();
    let count_error = |expected: String, found: usize| ExpandError::ArgumentCount {
        macro_name: def.name.clone(),
        expected,
        found,
    };

    if named == 0 && !def.variadic {
        let empty_call = args.len() == 1 && args[0].is_empty();
        return if empty_call {
            Ok(Vec::new())
        } else {
            Err(count_error("0".to_string(), args.len()))
        };
    }

    if !def.variadic {
        if args.len() != named {
            return Err(count_error(named.to_string(), args.len()));
        }
        return Ok(args);
    }

    if args.len() < named {
        return Err(count_error(format!("at least {named}"), args.len()));
    }
    let rest = args.split_off(named);
    let mut variadic = Vec::new();
    for (index, arg) in rest.into_iter().enumerate() {
        if index > 0 {
            variadic.push(Token::comma());
        }
        variadic.extend(arg);
    }
    args.push(variadic);
    Ok(args)
}

fn respace(mut tokens: Vec<Token>, leading_space: bool) -> Vec<Token> {
    if let Some(first) = tokens.first_mut() {
        first.leading_space = leading_space;
    }
    tokens
}

fn stringize(tokens: &[Token], leading_space: bool) -> Token {
    let mut literal = String::from("\"");
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 && token.leading_space {
            literal.push(' ');
        }
        if token.kind == TokenKind::Literal {
            for c in token.text.chars() {
                if c == '"' || c == '\\' {
                    literal.push('\\');
                }
                literal.push(c);
            }
        } else {
            literal.push_str(&token.text);
        }
    }
    literal.push('"');
    Token::new(TokenKind::Literal, literal, leading_space)
}

/// Glues the last token of `out` to the first token of `rhs`.
fn paste(out: &mut Vec<Token>, rhs: Vec<Token>) -> ExpandResult<()> {
    let mut rhs = rhs.into_iter();
    let Some(right) = rhs.next() else {
        return Ok(());
    };
    let Some(left) = out.pop() else {
        out.push(right);
        out.extend(rhs);
        return Ok(());
    };

    let joined = format!("{}{}", left.text, right.text);
    let invalid = || ExpandError::InvalidPaste {
        left: left.text.clone(),
        right: right.text.clone(),
    };
    let mut glued = tokenize(&joined).map_err(|_| invalid())?;
    if glued.len() != 1 {
        return Err(invalid());
    }
    let mut token = glued.remove(0).with_space(left.leading_space);
    token.hide = std::rc::Rc::new(left.hide.intersection(&right.hide).cloned().collect());
    out.push(token);
    out.extend(rhs);
    Ok(())
}

fn splice_lines(src: &str) -> String {
    src.replace("\\\r\n", "").replace("\\\n", "")
}

/// Replaces comments with a single space, leaving literals intact.
fn strip_comments(src: &str) -> ExpandResult<String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '/' if chars.peek().is_some_and(|(_, next)| *next == '/') => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek().is_some_and(|(_, next)| *next == '*') => {
                chars.next();
                let mut previous = '\0';
                let mut closed = false;
                for (_, skipped) in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        closed = true;
                        break;
                    }
                    previous = skipped;
                }
                if !closed {
                    return Err(ExpandError::Unterminated {
                        what: "comment",
                        offset,
                    });
                }
                out.push(' ');
            }
            '"' | '\'' => {
                out.push(c);
                let mut escaped = false;
                for (_, inner) in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == c || inner == '\n' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
