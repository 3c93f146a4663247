//! For-each composition.
//!
//! `FOR_EACH(m, items...)` repeats `FOR_EACH_IMPL` once per item. Each
//! application receives the full item list and picks its own item
//! with `GET_VA_ARG` before calling `m(index, item)`.

use std::fmt::{self, Write};

use super::doc;
use crate::options::HeaderOptions;

pub fn emit<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let step = options.name("FOR_EACH_IMPL");
    let call = options.name("FOR_EACH_IMPL2");
    let with = options.name("FOR_EACH_WITH");
    let length = options.name("VA_LENGTH");

    writeln!(
        out,
        "#define {step}(i, m, ...) {call}(i, m, {}(i, __VA_ARGS__))",
        options.name("GET_VA_ARG")
    )?;
    writeln!(out, "#define {call}(i, m, ...) m(i, __VA_ARGS__)")?;
    doc(
        out,
        &[
            "Calls `m(index, item)` for every item, joined by `s`.",
            "",
            &format!("Supports 1 to {} items.", options.max_arity),
        ],
    )?;
    writeln!(
        out,
        "#define {with}(s, m, ...) {}(s, {length}(__VA_ARGS__), {step}, m, __VA_ARGS__)",
        options.name("REPEAT_WITH")
    )?;
    doc(out, &["Calls `m(index, item)` for every item."])?;
    writeln!(
        out,
        "#define {}(m, ...) {with}(, m, __VA_ARGS__)",
        options.name("FOR_EACH")
    )?;
    doc(
        out,
        &["Calls `m(index, item)` for every item and separates the results with commas."],
    )?;
    writeln!(
        out,
        "#define {}(m, ...) {}({length}(__VA_ARGS__), {step}, m, __VA_ARGS__)",
        options.name("FOR_EACH_ENUM"),
        options.name("ENUM")
    )?;
    Ok(())
}
