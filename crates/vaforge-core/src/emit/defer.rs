//! Deferred substitution.
//!
//! `DEFER_k(m)(args)` unfolds to `m EMPTY^k ()^k (args)`. The scan that
//! produces it consumes one `EMPTY ()` pair, and every forced rescan
//! (`EVAL`) consumes one more, so `m(args)` is only invoked on rescan `k`.

use std::fmt::{self, Write};

use super::doc;
use crate::options::HeaderOptions;

pub fn emit<W: Write>(out: &mut W, options: &HeaderOptions) -> fmt::Result {
    let empty = options.name("EMPTY");
    let defer = options.name("DEFER");
    let concat = options.name("CONCAT");

    writeln!(out, "#define {empty}()")?;
    writeln!(out)?;
    doc(
        out,
        &[
            "Delays the expansion of a function-like macro by one rescan.",
            "",
            &format!("`{defer}(FOO)(x)` leaves `FOO (x)` behind; a later"),
            &format!("`{}` turns it into `FOO(x)`.", options.name("EVAL")),
        ],
    )?;
    writeln!(out, "#define {defer}(...) __VA_ARGS__ {empty}()")?;
    writeln!(out, "#define {defer}_1(...) __VA_ARGS__ {empty}()")?;
    for level in 2..=options.max_defer_level() {
        writeln!(
            out,
            "#define {defer}_{level}(...) {defer}_{}(__VA_ARGS__ {empty})()",
            level - 1
        )?;
    }
    doc(
        out,
        &[&format!(
            "Defers by `n` rescans, for `n` from 1 to {}.",
            options.max_defer_level()
        )],
    )?;
    writeln!(
        out,
        "#define {defer}_N(n, ...) {concat}({defer}_, n)(__VA_ARGS__)"
    )?;
    writeln!(out)?;
    writeln!(out, "#define {}(x) x", options.name("EXPAND"))?;
    writeln!(out)?;
    doc(out, &["Forces one extra rescan of its arguments."])?;
    writeln!(out, "#define {}(...) __VA_ARGS__", options.name("EVAL"))?;
    Ok(())
}
