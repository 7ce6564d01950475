use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use glob::glob;
use serde::Serialize;
use supcount_core::{
    AnalysisError, FailureKind, STDIN_LABEL, StreamSummary, SupInput, analyze_source,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SUPCOUNT_LOG";

// sysexits(3)
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_IOERR: u8 = 74;

#[derive(Parser, Debug)]
#[command(name = "sup-count-forced")]
#[command(version)]
#[command(
    about = "Count forced composition objects in PGS (SUP) subtitle streams.",
    long_about = None,
    after_help = "Prints one line per input: <forced objects> <total objects>\n\nExamples:\n  sup-count-forced movie.sup\n  sup-count-forced 'disc/*.sup' --json\n  sup-count-forced < movie.sup"
)]
struct Cli {
    /// SUP files to read, in order; standard input when omitted or `-`
    inputs: Vec<PathBuf>,

    /// Emit one JSON object per input instead of the plain counts line
    #[arg(long)]
    json: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.code)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
    code: u8,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>, code: u8) -> Self {
        Self {
            message: message.into(),
            hint,
            code,
        }
    }

    fn from_analysis(label: &str, err: &AnalysisError) -> Self {
        let (hint, code) = match err.kind() {
            FailureKind::InputUnavailable => (Some("check the path and its permissions"), EX_NOINPUT),
            FailureKind::IoFailure => (None, EX_IOERR),
            FailureKind::MalformedData => {
                (Some("input does not look like a PGS/SUP stream"), EX_DATAERR)
            }
            FailureKind::TruncatedStream => (
                Some("the stream ends inside a segment; the file may be incomplete"),
                EX_DATAERR,
            ),
        };
        CliError::new(format!("{label}: {err}"), hint.map(str::to_string), code)
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None, EX_IOERR)
    }
}

#[derive(Debug)]
enum InputSpec {
    Stdin,
    File(PathBuf),
}

impl InputSpec {
    fn label(&self) -> String {
        match self {
            InputSpec::Stdin => STDIN_LABEL.to_string(),
            InputSpec::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
struct InputReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    summary: &'a StreamSummary,
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.inputs.is_empty() {
        return count_input(InputSpec::Stdin, cli.json);
    }
    // Patterns are resolved one argument at a time so that a failure stops
    // before any later argument is touched.
    for arg in &cli.inputs {
        for spec in resolve_input(arg)? {
            count_input(spec, cli.json)?;
        }
    }
    Ok(())
}

fn count_input(spec: InputSpec, json: bool) -> Result<(), CliError> {
    let opened = match &spec {
        InputSpec::Stdin => SupInput::stdin(),
        InputSpec::File(path) => SupInput::open(path),
    };
    let input = opened
        .map_err(|err| CliError::from_analysis(&spec.label(), &AnalysisError::from(err)))?;
    let label = input.label().to_string();
    debug!(input = %label, "counting");
    let summary = analyze_source(input).map_err(|err| CliError::from_analysis(&label, &err))?;
    emit(&label, &summary, json)
}

fn emit(label: &str, summary: &StreamSummary, json: bool) -> Result<(), CliError> {
    let line = if json {
        serde_json::to_string(&InputReport {
            input: label,
            summary,
        })
        .context("JSON serialization failed")?
    } else {
        summary.to_string()
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}")
        .and_then(|()| stdout.flush())
        .context("Failed to write output")?;
    Ok(())
}

fn resolve_input(input: &Path) -> Result<Vec<InputSpec>, CliError> {
    if input.as_os_str() == "-" {
        return Ok(vec![InputSpec::Stdin]);
    }
    let pattern = input.to_string_lossy();
    // Names like `Movie [eng].sup` are taken literally when they exist.
    if input.exists() || !is_glob_pattern(&pattern) {
        return Ok(vec![InputSpec::File(input.to_path_buf())]);
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
            EX_USAGE,
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| read_failure(err.path(), err.error()))?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
            EX_NOINPUT,
        ));
    }
    matches.sort();
    debug!(pattern = %pattern, matches = matches.len(), "expanded input pattern");
    Ok(matches.into_iter().map(InputSpec::File).collect())
}

fn read_failure(path: &Path, err: &io::Error) -> CliError {
    CliError::new(
        format!("failed to read {}: {}", path.display(), err),
        None,
        EX_IOERR,
    )
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::{EX_IOERR, InputSpec, is_glob_pattern, read_failure, resolve_input};
    use std::io;
    use std::path::Path;

    #[test]
    fn directory_read_failure_is_io_error() {
        let err = read_failure(
            Path::new("subs/locked"),
            &io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.code, EX_IOERR);
        assert!(err.message.contains("failed to read subs/locked"));
    }

    #[test]
    fn dash_is_stdin() {
        let specs = resolve_input(Path::new("-")).unwrap();
        assert!(matches!(specs.as_slice(), [InputSpec::Stdin]));
    }

    #[test]
    fn plain_path_is_not_expanded() {
        assert!(!is_glob_pattern("movie.sup"));
        let specs = resolve_input(Path::new("missing.sup")).unwrap();
        assert!(matches!(specs.as_slice(), [InputSpec::File(_)]));
    }
}
