use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default maximum number of variadic arguments supported by the header.
pub const DEFAULT_MAX_ARITY: usize = 20;
/// Default prefix applied to every emitted macro name.
pub const DEFAULT_PREFIX: &str = "ZEN_";
/// Default include guard of the emitted header.
pub const DEFAULT_GUARD: &str = "ZEN_MACRO_H";

/// Largest accepted arity bound. The tables grow quadratically with it.
pub const MAX_ARITY_LIMIT: usize = 1024;

/// Smallest macro argument count every conforming C preprocessor accepts.
pub const PORTABLE_ARGUMENT_LIMIT: usize = 127;

/// Options shared by every emitter of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOptions {
    /// Maximum supported arity `N`.
    pub max_arity: usize,
    /// Prefix prepended to every macro name.
    pub prefix: String,
    /// Include guard macro wrapping the header.
    pub guard: String,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            max_arity: DEFAULT_MAX_ARITY,
            prefix: DEFAULT_PREFIX.to_string(),
            guard: DEFAULT_GUARD.to_string(),
        }
    }
}

impl HeaderOptions {
    pub fn new(max_arity: usize) -> Self {
        Self {
            max_arity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_arity == 0 || self.max_arity > MAX_ARITY_LIMIT {
            return Err(Error::InvalidArity(self.max_arity));
        }
        if !self.prefix.is_empty() && !is_identifier(&self.prefix) {
            return Err(Error::InvalidIdentifier {
                field: "prefix",
                value: self.prefix.clone(),
            });
        }
        if !is_identifier(&self.guard) {
            return Err(Error::InvalidIdentifier {
                field: "guard",
                value: self.guard.clone(),
            });
        }
        Ok(())
    }

    /// Full macro name for `suffix`, e.g. `ZEN_FOR_EACH`.
    pub fn name(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    /// Highest deferral level; `DEFER_1` always exists.
    pub fn max_defer_level(&self) -> usize {
        self.max_arity.saturating_sub(1).max(1)
    }

    /// Whether the counter invocation `ARG_N(args..., RSEQ_N())` may pass
    /// more arguments than a minimal preprocessor is required to accept.
    pub fn exceeds_portable_limit(&self) -> bool {
        self.max_arity.saturating_mul(2) > PORTABLE_ARGUMENT_LIMIT
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = HeaderOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.name("VA_LENGTH"), "ZEN_VA_LENGTH");
        assert_eq!(options.max_defer_level(), 19);
    }

    #[test]
    fn zero_arity_is_rejected() {
        let err = HeaderOptions::new(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArity(0)));
    }

    #[test]
    fn oversized_arity_is_rejected() {
        assert!(HeaderOptions::new(MAX_ARITY_LIMIT).validate().is_ok());
        let err = HeaderOptions::new(MAX_ARITY_LIMIT + 1).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArity(n) if n == MAX_ARITY_LIMIT + 1));

        let huge = HeaderOptions::new(usize::MAX / 2 + 1);
        assert!(matches!(huge.validate(), Err(Error::InvalidArity(_))));
        assert!(huge.exceeds_portable_limit());
    }

    #[test]
    fn rejects_bad_identifiers() {
        let options = HeaderOptions {
            prefix: "9X_".to_string(),
            ..HeaderOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidIdentifier { field: "prefix", .. })
        ));

        let options = HeaderOptions {
            guard: "MY-GUARD".to_string(),
            ..HeaderOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidIdentifier { field: "guard", .. })
        ));
    }

    #[test]
    fn empty_prefix_is_allowed() {
        let options = HeaderOptions {
            prefix: String::new(),
            ..HeaderOptions::default()
        };
        assert!(options.validate().is_ok());
        assert_eq!(options.name("DEFER"), "DEFER");
    }

    #[test]
    fn defer_levels_never_drop_below_one() {
        assert_eq!(HeaderOptions::new(1).max_defer_level(), 1);
        assert_eq!(HeaderOptions::new(2).max_defer_level(), 1);
        assert_eq!(HeaderOptions::new(3).max_defer_level(), 2);
    }

    #[test]
    fn portable_limit_threshold() {
        assert!(!HeaderOptions::new(63).exceeds_portable_limit());
        assert!(HeaderOptions::new(64).exceeds_portable_limit());
    }
}
