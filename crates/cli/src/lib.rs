//! The `adx` command line.
//!
//! Commands return `Result<(), String>` and are mapped to exit codes by
//! [`run_command`]; the binary only initializes tracing and calls
//! [`run_cli`].

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub mod config;
pub mod transliterate;
pub mod writer;

/// Crates whose spans and events `ADX_LOG=<level>` turns on.
const LOG_TARGETS: [&str; 2] = ["adx_cli", "adx_core"];

#[derive(Parser)]
#[command(
    name = "adx",
    version,
    about = "\x1b[33madx\x1b[0m generates typed tracking functions from a tracking plan 📈"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 🔤 Transliterate a tracking plan into TypeScript modules
    Transliterate(transliterate::TransliterateArgs),
}

/// Parse `args` (program name first) and run the selected command.
///
/// Returns the process exit code: 0 on success, 1 on a command error, clap's
/// code for usage errors.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Transliterate(args)) => transliterate::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Run a command body, reporting its error on stderr and mapping it to an
/// exit code.
pub fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Install the stderr fmt subscriber, filtered by `ADX_LOG` (default `info`).
pub fn init_tracing() {
    // ADX_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "adx_core=debug,adx_cli=warn"
    let filter = match std::env::var("ADX_LOG") {
        Ok(level) if is_plain_level(&level) => targets_filter(&level),
        Ok(spec) => spec,
        Err(_) => targets_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn targets_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("adx_core=debug"));
    }

    #[test]
    fn test_targets_filter() {
        assert_eq!(targets_filter("debug"), "adx_cli=debug,adx_core=debug");
    }

    #[test]
    fn test_run_command_exit_codes() {
        assert_eq!(run_command(|| Ok(())), 0);
        assert_eq!(run_command(|| Err("boom".to_string())), 1);
    }

    #[test]
    fn test_no_command_prints_help() {
        assert_eq!(run_cli(vec!["adx".to_string()]), 0);
    }

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        assert_eq!(
            run_cli(vec!["adx".into(), "transliterate".into(), "--bogus".into()]),
            2
        );
    }

    #[test]
    fn test_methods_async_parses_booleans() {
        let cli = Cli::try_parse_from([
            "adx",
            "transliterate",
            "-i",
            "plan.yml",
            "--methodsAsync",
            "false",
        ]);
        match cli {
            Ok(Cli {
                command: Some(Commands::Transliterate(args)),
            }) => assert_eq!(args.methods_async, Some(false)),
            _ => unreachable!("transliterate args should parse"),
        }
    }
}
