//! Repetition and enumeration tables.
//!
//! Entry `i` is the literal unrolling of `m(0, ...)` through `m(i-1, ...)`.
//! The tables run up to and including the arity bound so that every count
//! produced by `VA_LENGTH` has a matching entry.

use std::fmt::{self, Write};

use super::doc;
use crate::options::HeaderOptions;

/// Join token placed between two consecutive applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// The caller-supplied separator parameter `s`.
    Separator,
    /// A literal comma.
    Comma,
}

impl Join {
    fn token(self) -> &'static str {
        match self {
            Join::Separator => " s",
            Join::Comma => ",",
        }
    }
}

/// Body of table entry `count`: `count` applications of `m` joined by `join`.
pub fn unrolled(count: usize, join: Join) -> String {
    let mut body = String::new();
    for index in 0..count {
        if index > 0 {
            body.push_str(join.token());
        }
        body.push_str(&format!(" m({index},__VA_ARGS__)"));
    }
    body
}

pub fn emit_repetition<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let repeat_with = options.name("REPEAT_WITH");
    let concat = options.name("CONCAT");

    for count in 0..=options.max_arity {
        writeln!(
            out,
            "#define {repeat_with}_{count}(s,m,...){}",
            unrolled(count, Join::Separator)
        )?;
    }
    doc(
        out,
        &[
            "Expands to `m(0, ...) s m(1, ...) s ... m(n-1, ...)`.",
            "",
            &format!("`n` must expand to an integer from 0 to {}.", options.max_arity),
        ],
    )?;
    writeln!(
        out,
        "#define {repeat_with}(s,n,m,...) {concat}({repeat_with}_, n)(s,m,__VA_ARGS__)"
    )?;
    doc(out, &["Same as the separated variant, with nothing in between."])?;
    writeln!(
        out,
        "#define {}(n,m,...) {repeat_with}(,n,m,__VA_ARGS__)",
        options.name("REPEAT")
    )?;
    writeln!(out)?;
    Ok(())
}

pub fn emit_enumeration<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let enum_impl = options.name("ENUM_IMPL");

    for count in 0..=options.max_arity {
        writeln!(
            out,
            "#define {enum_impl}_{count}(m,...){}",
            unrolled(count, Join::Comma)
        )?;
    }
    doc(
        out,
        &["Expands to the comma-separated list `m(0, ...), ..., m(n-1, ...)`."],
    )?;
    writeln!(
        out,
        "#define {}(n,m,...) {}({enum_impl}_, n)(m,__VA_ARGS__)",
        options.name("ENUM"),
        options.name("CONCAT")
    )?;
    writeln!(out)?;
    Ok(())
}
