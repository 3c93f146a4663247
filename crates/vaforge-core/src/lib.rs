//! Generator for a table-driven C preprocessor header of variadic macros.
//!
//! The preprocessor cannot recurse or count, so every capability is
//! unrolled for each arity from 0 up to a fixed bound `N`: argument
//! counting, deferred expansion, repetition, enumeration, positional
//! selection and the `FOR_EACH` family built on top of them.

pub mod emit;
pub mod error;
pub mod header;
pub mod options;
pub mod surface;

pub use error::{Error, Result};
pub use header::{BANNER_PREFIX, Header, TIMESTAMP_FORMAT, fingerprint, normalize, render_into};
pub use options::{
    DEFAULT_GUARD, DEFAULT_MAX_ARITY, DEFAULT_PREFIX, HeaderOptions, MAX_ARITY_LIMIT,
    PORTABLE_ARGUMENT_LIMIT,
};
pub use surface::{MacroSignature, surface};
