use std::borrow::Cow;
use std::fmt::Write;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::emit::{compose, counter, defer, prelude, repeat, select};
use crate::error::Result;
use crate::options::HeaderOptions;

/// Start of the banner line carrying the generation timestamp.
pub const BANNER_PREFIX: &str = "// This file was generated by vaforge on ";
/// `strftime` format of the banner timestamp.
pub const TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S";

const TIMESTAMP_PLACEHOLDER: &str = "<timestamp>";

/// A fully rendered macro header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    text: String,
    generated_at: String,
}

impl Header {
    pub fn render(options: &HeaderOptions, generated_at: NaiveDateTime) -> Result<Self> {
        let generated_at = generated_at.format(TIMESTAMP_FORMAT).to_string();
        let mut text = String::new();
        render_into(&mut text, options, &generated_at)?;
        Ok(Self { text, generated_at })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Digest of the text with the timestamp masked out.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.text)
    }
}

/// Writes the whole header into `out`.
///
/// The tables are emitted in dependency order: counting, deferral, the
/// helpers, repetition, enumeration, selection and finally the for-each
/// composer that builds on all of them.
pub fn render_into<W: Write>(out: &mut W, options: &HeaderOptions, generated_at: &str) -> Result<()> {
    options.validate()?;
    if options.exceeds_portable_limit() {
        warn!(
            max_arity = options.max_arity,
            "counter invocations exceed the portable limit of 127 macro arguments"
        );
    }

    let guard = &options.guard;
    writeln!(out, "{BANNER_PREFIX}{generated_at}.")?;
    writeln!(out, "//")?;
    writeln!(out, "// Do not edit it by hand; change the generator configuration and")?;
    writeln!(out, "// regenerate it instead.")?;
    writeln!(out)?;
    writeln!(out, "/// Variadic macro utilities for up to {} arguments.", options.max_arity)?;
    writeln!(out, "///")?;
    writeln!(out, "/// Every table below is unrolled up to that bound, since the")?;
    writeln!(out, "/// preprocessor cannot recurse.")?;
    writeln!(out)?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;

    counter::emit(out, options)?;
    writeln!(out)?;
    defer::emit(out, options)?;
    writeln!(out)?;
    prelude::emit(out, options)?;
    writeln!(out)?;
    repeat::emit_repetition(out, options)?;
    repeat::emit_enumeration(out, options)?;
    select::emit(out, options)?;
    compose::emit(out, options)?;

    writeln!(out)?;
    writeln!(out, "#endif // #ifndef {guard}")?;

    debug!(
        max_arity = options.max_arity,
        prefix = %options.prefix,
        "header rendered"
    );
    Ok(())
}

/// Replaces the banner timestamp with a fixed placeholder.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let Some(start) = banner_offset(text) else {
        return Cow::Borrowed(text);
    };
    let stamp_start = start + BANNER_PREFIX.len();
    let stamp_end = text[stamp_start..]
        .find('\n')
        .map_or(text.len(), |offset| stamp_start + offset);

    let mut normalized = String::with_capacity(text.len());
    normalized.push_str(&text[..stamp_start]);
    normalized.push_str(TIMESTAMP_PLACEHOLDER);
    normalized.push_str(&text[stamp_end..]);
    Cow::Owned(normalized)
}

/// Hex SHA-256 of the normalized text.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hex::encode(hasher.finalize())
}

fn banner_offset(text: &str) -> Option<usize> {
    if text.starts_with(BANNER_PREFIX) {
        return Some(0);
    }
    text.find(&format!("\n{BANNER_PREFIX}")).map(|offset| offset + 1)
}
