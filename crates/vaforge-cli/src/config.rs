use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;
use vaforge_core::HeaderOptions;

use crate::error::{CliError, CliResult};

/// Config file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "vaforge.toml";
/// Output path used when neither the flags nor the config file name one.
pub const DEFAULT_OUT: &str = "include/zen/macros.h";

/// Flags shared by every subcommand that renders a header.
#[derive(Args, Debug, Clone, Default)]
pub struct HeaderArgs {
    /// Config file (defaults to ./vaforge.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Maximum number of variadic arguments supported.
    #[arg(long, value_name = "N")]
    pub max_arity: Option<usize>,
    /// Prefix of every emitted macro name.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Include guard of the header.
    #[arg(long)]
    pub guard: Option<String>,
    /// Output path of the header.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Contents of `vaforge.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub max_arity: Option<usize>,
    pub prefix: Option<String>,
    pub guard: Option<String>,
    pub out: Option<PathBuf>,
}

/// Fully resolved settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub options: HeaderOptions,
    pub out: PathBuf,
}

impl Settings {
    /// Flags win over the config file, which wins over the defaults.
    pub fn resolve(args: &HeaderArgs) -> CliResult<Self> {
        let file = load_config(args.config.as_deref())?;
        let defaults = HeaderOptions::default();
        let options = HeaderOptions {
            max_arity: args
                .max_arity
                .or(file.max_arity)
                .unwrap_or(defaults.max_arity),
            prefix: args.prefix.clone().or(file.prefix).unwrap_or(defaults.prefix),
            guard: args.guard.clone().or(file.guard).unwrap_or(defaults.guard),
        };
        options.validate()?;

        let out = args
            .out
            .clone()
            .or(file.out)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
        Ok(Self { options, out })
    }
}

/// Reads the config file. An explicit path must exist; the default one may
/// be missing.
pub fn load_config(path: Option<&Path>) -> CliResult<ConfigFile> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };
    if !required && !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}
