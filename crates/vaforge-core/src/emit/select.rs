//! Positional argument selection.

use std::fmt::{self, Write};

use super::doc;
use crate::options::HeaderOptions;

pub fn emit<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let get = options.name("GET_VA_ARG");

    for index in 0..options.max_arity {
        let params = (0..=index)
            .map(|position| format!("arg{position}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "#define {get}_{index}({params},...) arg{index}")?;
    }
    doc(
        out,
        &[
            "Expands to the zero-based `n`-th of the remaining arguments.",
            "",
            &format!(
                "`n` must be below {} and at least `n + 1` arguments must follow it.",
                options.max_arity
            ),
        ],
    )?;
    writeln!(
        out,
        "#define {get}(n,...) {}({get}_, n)(__VA_ARGS__)",
        options.name("CONCAT")
    )?;
    writeln!(out)?;
    Ok(())
}
