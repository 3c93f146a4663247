//! A small model of the C preprocessor's macro expansion.
//!
//! Supports object-like and function-like `#define`s, `__VA_ARGS__`, the
//! `#` and `##` operators, argument pre-expansion and rescanning. It is
//! enough to evaluate headers produced by `vaforge-core` without a C
//! compiler; conditional inclusion and `#include` are not modelled.

pub mod define;
pub mod error;
pub mod expand;
pub mod token;

pub use define::{MacroDef, VA_ARGS, parse_definition};
pub use error::{ExpandError, ExpandResult};
pub use expand::{DEFAULT_DEPTH_LIMIT, DEFAULT_STEP_LIMIT, Expansion, Preprocessor};
pub use token::{Token, TokenKind, tokenize};
