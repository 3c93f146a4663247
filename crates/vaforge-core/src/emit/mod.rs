//! Rule-table emitters.
//!
//! Each emitter is a pure function of [`HeaderOptions`] that writes one
//! family of `#define` lines into the caller's sink. Entries of a table are
//! unrolled independently; no entry refers to another entry of its own table.

pub mod compose;
pub mod counter;
pub mod defer;
pub mod prelude;
pub mod repeat;
pub mod select;

use std::fmt::{self, Write};

/// Writes a block of `///` documentation lines.
pub(crate) fn doc<W: Write>(out: &mut W, lines: &[&str]) -> fmt::Result {
    for line in lines {
        if line.is_empty() {
            writeln!(out, "///")?;
        } else {
            writeln!(out, "/// {line}")?;
        }
    }
    Ok(())
}

/// Comma-separated `name0,name1,...` list for `0..count`.
pub(crate) fn numbered(stem: &str, count: usize) -> String {
    (0..count)
        .map(|index| format!("{stem}{index}"))
        .collect::<Vec<_>>()
        .join(",")
}
