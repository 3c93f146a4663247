mod config;
mod error;
mod logging;
mod output;

use std::io::ErrorKind;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};
use vaforge_core::{Header, fingerprint, surface};
use vaforge_expand::Preprocessor;

use config::{HeaderArgs, Settings};
use error::{CliError, CliResult};
use logging::init_logging;
use output::write_bytes_atomic;

#[derive(Parser, Debug)]
#[command(
    name = "vaforge",
    version,
    about = "Generates a header of variadic C preprocessor macros"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Append JSON logs to this file instead of printing them.
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the header and write it to the output path.
    Generate(GenerateArgs),
    /// Verify that the header on disk matches the current configuration.
    Check(HeaderArgs),
    /// Expand an expression with the header's macros.
    Expand(ExpandArgs),
    /// List the macros the header provides.
    Surface(SurfaceArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    header: HeaderArgs,
    /// Print the header instead of writing it.
    #[arg(long, conflicts_with = "out")]
    stdout: bool,
}

#[derive(Args, Debug)]
struct ExpandArgs {
    #[command(flatten)]
    header: HeaderArgs,
    /// Read macros from this file instead of rendering them.
    #[arg(long = "header", value_name = "PATH")]
    from: Option<PathBuf>,
    /// Extra definition, e.g. -D 'SQUARE(i, x)=x*x'.
    #[arg(short = 'D', long = "define", value_name = "NAME[(PARAMS)]=BODY")]
    defines: Vec<String>,
    /// Expression to expand.
    expr: String,
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    #[command(flatten)]
    header: HeaderArgs,
    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
        Command::Expand(args) => run_expand(args),
        Command::Surface(args) => run_surface(args),
    }
}

fn render(settings: &Settings) -> CliResult<Header> {
    let generated_at = chrono::Local::now().naive_local();
    Ok(Header::render(&settings.options, generated_at)?)
}

fn run_generate(args: GenerateArgs) -> CliResult<()> {
    let settings = Settings::resolve(&args.header)?;
    info!(
        event = "generation_started",
        max_arity = settings.options.max_arity,
        prefix = %settings.options.prefix
    );

    let header = render(&settings)?;
    if args.stdout {
        print!("{}", header.text());
        return Ok(());
    }

    write_bytes_atomic(&settings.out, header.text().as_bytes())?;
    info!(
        event = "header_written",
        path = %settings.out.display(),
        bytes = header.text().len(),
        fingerprint = %header.fingerprint()
    );
    Ok(())
}

fn run_check(args: HeaderArgs) -> CliResult<()> {
    let settings = Settings::resolve(&args)?;
    let existing = match std::fs::read_to_string(&settings.out) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(CliError::Stale {
                path: settings.out,
                reason: "missing",
            });
        }
        Err(err) => return Err(err.into()),
    };

    let expected = render(&settings)?.fingerprint();
    let actual = fingerprint(&existing);
    debug!(%expected, %actual, "fingerprints compared");
    if expected != actual {
        return Err(CliError::Stale {
            path: settings.out,
            reason: "content differs",
        });
    }

    info!(event = "header_current", path = %settings.out.display());
    println!("{} is up to date", settings.out.display());
    Ok(())
}

fn run_expand(args: ExpandArgs) -> CliResult<()> {
    let source = match &args.from {
        Some(path) => std::fs::read_to_string(path)?,
        None => render(&Settings::resolve(&args.header)?)?.into_string(),
    };

    let mut preprocessor = Preprocessor::from_source(&source)?;
    for define in &args.defines {
        preprocessor.define(define)?;
    }
    debug!(macros = preprocessor.len(), "preprocessor ready");

    let expansion = preprocessor.expand(&args.expr)?;
    println!("{expansion}");
    Ok(())
}

fn run_surface(args: SurfaceArgs) -> CliResult<()> {
    let settings = Settings::resolve(&args.header)?;
    let catalog = surface(&settings.options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let width = catalog
        .iter()
        .map(|entry| entry.display().len())
        .max()
        .unwrap_or(0);
    for entry in &catalog {
        println!("{:<width$}  {}", entry.display(), entry.summary);
    }
    Ok(())
}
