use crate::error::{ExpandError, ExpandResult};
use crate::token::{Token, TokenKind, tokenize};

/// Name the variadic parameter is referred to by in a replacement list.
pub const VA_ARGS: &str = "__VA_ARGS__";

/// A `#define`d macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    pub name: String,
    /// Named parameters; `None` for object-like macros.
    pub params: Option<Vec<String>>,
    /// Ends its parameter list with `...`.
    pub variadic: bool,
    pub body: Vec<Token>,
}

impl MacroDef {
    pub fn is_function_like(&self) -> bool {
        self.params.is_some()
    }

    /// Position of `name` among the parameters, with `__VA_ARGS__` last.
    pub(crate) fn param_index(&self, token: &Token) -> Option<usize> {
        if token.kind != TokenKind::Ident {
            return None;
        }
        let params = self.params.as_ref()?;
        if let Some(index) = params.iter().position(|param| *param == token.text) {
            return Some(index);
        }
        (self.variadic && token.text == VA_ARGS).then_some(params.len())
    }

    /// Two definitions are interchangeable when their spelling matches.
    pub fn same_definition(&self, other: &MacroDef) -> bool {
        fn spelling(body: &[Token]) -> Vec<(&str, bool)> {
            body.iter()
                .map(|token| (token.text.as_str(), token.leading_space))
                .collect()
        }
        self.params == other.params
            && self.variadic == other.variadic
            && spelling(&self.body) == spelling(&other.body)
    }
}

/// Parses the tokens following `#define`.
pub(crate) fn parse_define(tokens: Vec<Token>) -> ExpandResult<MacroDef> {
    let mut tokens = tokens.into_iter().peekable();
    let name = match tokens.next() {
        Some(token) if token.kind == TokenKind::Ident => token.text,
        Some(token) => {
            return Err(ExpandError::MalformedDefine(format!(
                "expected a macro name, found '{}'",
                token.text
            )));
        }
        None => return Err(ExpandError::MalformedDefine("missing macro name".to_string())),
    };

    let mut params = None;
    let mut variadic = false;
    if tokens
        .peek()
        .is_some_and(|token| token.is_punct("(") && !token.leading_space)
    {
        tokens.next();
        let mut names = Vec::new();
        loop {
            let token = tokens.next().ok_or_else(|| {
                ExpandError::MalformedDefine(format!("unterminated parameter list of {name}"))
            })?;
            match token.kind {
                TokenKind::Punct if token.text == ")" && names.is_empty() => break,
                TokenKind::Punct if token.text == "..." => {
                    variadic = true;
                    expect_close(tokens.next(), &name)?;
                    break;
                }
                TokenKind::Ident if token.text != VA_ARGS => {
                    if names.contains(&token.text) {
                        return Err(ExpandError::MalformedDefine(format!(
                            "duplicate parameter '{}' in {name}",
                            token.text
                        )));
                    }
                    names.push(token.text);
                    match tokens.next() {
                        Some(next) if next.is_punct(",") => {}
                        Some(next) if next.is_punct(")") => break,
                        _ => {
                            return Err(ExpandError::MalformedDefine(format!(
                                "expected ',' or ')' in parameters of {name}"
                            )));
                        }
                    }
                }
                _ => {
                    return Err(ExpandError::MalformedDefine(format!(
                        "unexpected '{}' in parameters of {name}",
                        token.text
                    )));
                }
            }
        }
        params = Some(names);
    }

    let mut body: Vec<Token> = tokens.collect();
    if let Some(first) = body.first_mut() {
        first.leading_space = false;
    }

    let def = MacroDef {
        name,
        params,
        variadic,
        body,
    };
    check_operators(&def)?;
    Ok(def)
}

/// Parses a command-line style definition: `NAME`, `NAME=BODY` or
/// `NAME(params)=BODY`. A bare name is defined as `1`.
pub fn parse_definition(definition: &str) -> ExpandResult<MacroDef> {
    let text = match definition.split_once('=') {
        Some((head, body)) => format!("{head} {body}"),
        None => format!("{definition} 1"),
    };
    parse_define(tokenize(&text)?)
}

fn expect_close(token: Option<Token>, name: &str) -> ExpandResult<()> {
    match token {
        Some(token) if token.is_punct(")") => Ok(()),
        _ => Err(ExpandError::MalformedDefine(format!(
            "'...' must end the parameters of {name}"
        ))),
    }
}

fn check_operators(def: &MacroDef) -> ExpandResult<()> {
    let body = &def.body;
    let dangling = |token: Option<&Token>| token.is_some_and(|token| token.is_punct("##"));
    if dangling(body.first()) || dangling(body.last()) {
        return Err(ExpandError::DanglingPaste {
            macro_name: def.name.clone(),
        });
    }
    if def.is_function_like() {
        for (index, token) in body.iter().enumerate() {
            if token.is_punct("#")
                && !body
                    .get(index + 1)
                    .is_some_and(|next| def.param_index(next).is_some())
            {
                return Err(ExpandError::InvalidStringize {
                    macro_name: def.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn define(src: &str) -> ExpandResult<MacroDef> {
        parse_define(tokenize(src)?)
    }

    #[test]
    fn object_like() {
        let def = define("ANSWER 42").unwrap();
        assert_eq!(def.name, "ANSWER");
        assert!(!def.is_function_like());
        assert_eq!(def.body.len(), 1);
        assert!(!def.body[0].leading_space);
    }

    #[test]
    fn space_before_paren_makes_an_object_like_macro() {
        let def = define("PAIR (a, b)").unwrap();
        assert!(def.params.is_none());
        assert_eq!(def.body.len(), 5);
    }

    #[test]
    fn function_like_with_variadic_tail() {
        let def = define("GET(n, ...) n __VA_ARGS__").unwrap();
        assert_eq!(def.params.as_deref(), Some(&["n".to_string()][..]));
        assert!(def.variadic);
        assert_eq!(def.param_index(&def.body[0]), Some(0));
        assert_eq!(def.param_index(&def.body[1]), Some(1));
    }

    #[test]
    fn empty_parameter_list() {
        let def = define("EMPTY()").unwrap();
        assert_eq!(def.params, Some(Vec::new()));
        assert!(def.body.is_empty());
    }

    #[test]
    fn rejects_malformed_parameters() {
        assert!(matches!(define("F(a b) a"), Err(ExpandError::MalformedDefine(_))));
        assert!(matches!(define("F(a, a) a"), Err(ExpandError::MalformedDefine(_))));
        assert!(matches!(define("F(..., a) a"), Err(ExpandError::MalformedDefine(_))));
        assert!(matches!(define("F(a"), Err(ExpandError::MalformedDefine(_))));
        assert!(matches!(define("42"), Err(ExpandError::MalformedDefine(_))));
    }

    #[test]
    fn checks_operator_operands() {
        assert!(matches!(define("F(a) # b"), Err(ExpandError::InvalidStringize { .. })));
        assert!(matches!(define("F(a) ## a"), Err(ExpandError::DanglingPaste { .. })));
        assert!(define("S(x) #x").is_ok());
        assert!(define("HASH # x").is_ok());
    }

    #[test]
    fn command_line_definitions() {
        let def = parse_definition("SQUARE(i, x)=x*x").unwrap();
        assert_eq!(def.params.as_ref().map(Vec::len), Some(2));
        assert_eq!(def.body.len(), 3);

        let flag = parse_definition("DEBUG").unwrap();
        assert_eq!(flag.body[0].text, "1");
    }

    #[test]
    fn redefinition_compares_spelling() {
        let a = define("F(x) x + 1").unwrap();
        let b = define("F(x)   x +  1").unwrap();
        let c = define("F(x) x+1").unwrap();
        assert!(a.same_definition(&b));
        assert!(!a.same_definition(&c));
    }
}
