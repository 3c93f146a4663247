//! Argument counting.
//!
//! `VA_LENGTH(args...)` appends the descending sequence `N..1` to the
//! caller's arguments and hands the lot to `ARG_N`, whose `N+1`-th
//! positional parameter then lands on the argument count.

use std::fmt::{self, Write};

use super::{doc, numbered};
use crate::options::HeaderOptions;

pub fn emit<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let n = options.max_arity;
    let length = options.name("VA_LENGTH");
    let length_impl = options.name("VA_LENGTH_IMPL");
    let arg_n = options.name("ARG_N");
    let rseq_n = options.name("RSEQ_N");

    doc(
        out,
        &[
            &format!("Expands to the number of arguments passed, from 1 to {n}."),
            "",
            "Requires at least one argument. Calling it with none, or with",
            &format!("more than {n}, is outside its contract."),
        ],
    )?;
    writeln!(out, "#define {length}(...) {length_impl}(__VA_ARGS__,{rseq_n}())")?;
    writeln!(out, "#define {length_impl}(...) {arg_n}(__VA_ARGS__)")?;
    writeln!(out, "#define {arg_n}({},N,...) N", numbered("_", n))?;
    writeln!(out, "#define {rseq_n}() {}", descending(n))?;
    Ok(())
}

fn descending(n: usize) -> String {
    (1..=n)
        .rev()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
