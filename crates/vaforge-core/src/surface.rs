use serde::Serialize;

use crate::options::HeaderOptions;

/// A macro consumers of the header are expected to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroSignature {
    pub name: String,
    /// `None` for object-like macros.
    pub params: Option<Vec<String>>,
    pub summary: String,
}

impl MacroSignature {
    fn function(name: String, params: &[&str], summary: impl Into<String>) -> Self {
        Self {
            name,
            params: Some(params.iter().map(|param| param.to_string()).collect()),
            summary: summary.into(),
        }
    }

    fn object(name: String, summary: impl Into<String>) -> Self {
        Self {
            name,
            params: None,
            summary: summary.into(),
        }
    }

    /// `NAME(a, b)` or `NAME`.
    pub fn display(&self) -> String {
        match &self.params {
            Some(params) => format!("{}({})", self.name, params.join(", ")),
            None => self.name.clone(),
        }
    }
}

/// Lists the consumer-facing macros of a header rendered with `options`.
pub fn surface(options: &HeaderOptions) -> Vec<MacroSignature> {
    let n = options.max_arity;
    let name = |suffix: &str| options.name(suffix);
    let mut macros = vec![
        MacroSignature::function(
            name("VA_LENGTH"),
            &["..."],
            format!("number of arguments, 1 to {n}"),
        ),
        MacroSignature::function(name("EMPTY"), &[], "expands to nothing"),
        MacroSignature::function(name("DEFER"), &["..."], "delay expansion by one rescan"),
    ];
    for level in 1..=options.max_defer_level() {
        macros.push(MacroSignature::function(
            name(&format!("DEFER_{level}")),
            &["..."],
            format!("delay expansion by {level} rescan(s)"),
        ));
    }
    macros.extend([
        MacroSignature::function(name("DEFER_N"), &["n", "..."], "delay expansion by n rescans"),
        MacroSignature::function(name("EXPAND"), &["x"], "expand a single argument"),
        MacroSignature::function(name("EVAL"), &["..."], "force one extra rescan"),
        MacroSignature::function(name("CONCAT"), &["a", "b"], "paste two expanded tokens"),
        MacroSignature::function(
            name("STATIC_ASSERT"),
            &["stmt"],
            "compile-time assertion",
        ),
        MacroSignature::function(name("UNUSED"), &["x"], "suppress unused warnings"),
        MacroSignature::object(name("VA_MAX_LENGTH"), format!("supported arity ({n})")),
        MacroSignature::function(
            name("REPEAT_WITH"),
            &["s", "n", "m", "..."],
            "n applications of m joined by s",
        ),
        MacroSignature::function(name("REPEAT"), &["n", "m", "..."], "n applications of m"),
        MacroSignature::function(
            name("ENUM"),
            &["n", "m", "..."],
            "n applications of m joined by commas",
        ),
        MacroSignature::function(
            name("GET_VA_ARG"),
            &["n", "..."],
            format!("n-th argument, n below {n}"),
        ),
        MacroSignature::function(
            name("FOR_EACH_WITH"),
            &["s", "m", "..."],
            "m(index, item) per item joined by s",
        ),
        MacroSignature::function(name("FOR_EACH"), &["m", "..."], "m(index, item) per item"),
        MacroSignature::function(
            name("FOR_EACH_ENUM"),
            &["m", "..."],
            "m(index, item) per item joined by commas",
        ),
    ]);
    macros
}
