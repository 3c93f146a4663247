//! Small helpers emitted between the defer chain and the tables.

use std::fmt::{self, Write};

use super::doc;
use crate::options::HeaderOptions;

pub fn emit<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let concat = options.name("CONCAT");
    let concat_impl = options.name("CONCAT_IMPL");

    doc(
        out,
        &[
            "Pastes two tokens together after expanding both of them.",
        ],
    )?;
    writeln!(out, "#define {concat}(a, b) {concat_impl}(a, b)")?;
    writeln!(out, "#define {concat_impl}(a, b) a ## b")?;
    writeln!(out)?;
    doc(
        out,
        &["Compile-time assertion whose message repeats the failed condition."],
    )?;
    writeln!(
        out,
        "#define {}(stmt) static_assert(stmt, \"Compile-time assertion failed: \" #stmt)",
        options.name("STATIC_ASSERT")
    )?;
    writeln!(out)?;
    doc(
        out,
        &[
            "Silences unused-variable warnings, mostly for generated variables",
            "of which only some end up being used.",
        ],
    )?;
    writeln!(out, "#define {}(x) (void)(x);", options.name("UNUSED"))?;
    writeln!(out)?;
    doc(
        out,
        &[
            "Largest argument count supported by the macros in this header.",
            "Compilers may impose a lower limit of their own.",
        ],
    )?;
    writeln!(
        out,
        "#define {} {}",
        options.name("VA_MAX_LENGTH"),
        options.max_arity
    )?;
    Ok(())
}
