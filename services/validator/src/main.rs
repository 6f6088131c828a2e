//! RxFeed validator - validate and correct pharmacy-benefit data files
//!
//! Usage:
//!   rxfeed-validate validate --client UMR --category accumulator UMR_ACCUM_20250429.txt
//!   rxfeed-validate correct --client UMR --output fixed.txt UMR_ACCUM_20250429.txt
//!   rxfeed-validate --config rxfeed.toml layouts
//!
//! Results are printed to stdout as JSON; logs go to stderr. The exit code is
//! 0 for a valid file and 1 otherwise.

mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rxfeed_codec::{date_from_filename, EngineError, FileValidator, ValidationRequest};
use rxfeed_config::{load_settings, EngineSettings, LayoutRegistry};
use rxfeed_types::{CorrectionResult, FileCategory, ValidationResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::output::{corrected_path, print_json, LayoutListing};

#[derive(Parser, Debug)]
#[command(name = "rxfeed-validate")]
#[command(about = "RxFeed layout-driven file validator")]
#[command(version)]
struct Args {
    /// Path to engine settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the settings file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print JSON results
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a file and print the result
    Validate {
        /// Client name, matched exactly (e.g. UMR, ALLIED)
        #[arg(long)]
        client: String,

        /// claims, accumulator, accumulator_10pm or eligibility
        #[arg(long)]
        category: String,

        /// Date (CCYYMMDD) to check the file against. Filename tokens fall back to
        /// today; eligibility date columns and the EDI ISA date are only checked
        /// when a date is given or carried by a PBLXV426 filename
        #[arg(long)]
        expected_date: Option<String>,

        file: PathBuf,
    },

    /// Validate, correct and optionally persist an accumulator file
    Correct {
        #[arg(long)]
        client: String,

        /// Date (CCYYMMDD) filename tokens must carry. Without it, or a date in a
        /// PBLXV426 filename, tokens are not checked
        #[arg(long)]
        expected_date: Option<String>,

        /// Corrected file location; defaults to `<name>_corrected` in the settings
        /// output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        file: PathBuf,
    },

    /// List layout bindings of the active registry
    Layouts,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {:#}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&args, &settings) {
        eprintln!("Failed to initialise logging: {:#}", e);
        return ExitCode::from(2);
    }

    match run(&args, &settings) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args, settings: &EngineSettings) -> Result<bool> {
    let registry = settings.registry().context("Failed to load layout registry")?;
    let validator = FileValidator::new(&registry);

    match &args.command {
        Command::Validate {
            client,
            category,
            expected_date,
            file,
        } => {
            let result = match parse_category(category) {
                Ok(category) => {
                    let content = read_input(file)?;
                    let filename = file_name(file);
                    let request = ValidationRequest::new(client, category)
                        .with_expected_date(expected_date.as_deref())
                        .with_filename(filename.as_deref());
                    validator.validate_request(&content, &request)
                }
                Err(e) => ValidationResult::from_fatal(e),
            };
            print_json(&result, args.pretty)?;
            Ok(result.is_valid())
        }
        Command::Correct {
            client,
            expected_date,
            output,
            file,
        } => {
            let result = correct_file(
                &validator,
                client,
                expected_date.as_deref(),
                file,
                output.as_deref(),
                settings.output_dir.as_deref(),
            )?;
            print_json(&result, args.pretty)?;
            Ok(result.is_valid())
        }
        Command::Layouts => {
            list_layouts(&registry, args.pretty)?;
            Ok(true)
        }
    }
}

fn correct_file(
    validator: &FileValidator<'_>,
    client: &str,
    expected_date: Option<&str>,
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<CorrectionResult> {
    let path = corrected_path(output, output_dir, input);
    if let Some(path) = &path {
        if same_file(path, input) {
            bail!("Refusing to overwrite input file {}", input.display());
        }
    }

    let content = read_input(input)?;
    let derived = file_name(input).as_deref().and_then(date_from_filename);
    let expected_date = expected_date.or(derived.as_deref());
    validator
        .validate_and_correct(&content, client, expected_date, path.as_deref())
        .context("Failed to write corrected file")
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn list_layouts(registry: &LayoutRegistry, pretty: bool) -> Result<()> {
    let listing = LayoutListing::from_registry(registry);
    info!(
        "📐 {} layouts, {} bindings from {}",
        listing.layouts,
        listing.bindings.len(),
        listing.source
    );
    print_json(&listing, pretty)
}

fn parse_category(category: &str) -> Result<FileCategory, EngineError> {
    category
        .parse()
        .map_err(|_| EngineError::UnknownCategory(category.to_string()))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!("📄 Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn init_logging(args: &Args, settings: &EngineSettings) -> Result<()> {
    let level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if args.json_logs || settings.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_validate() {
        let args = Args::try_parse_from([
            "rxfeed-validate",
            "--pretty",
            "validate",
            "--client",
            "UMR",
            "--category",
            "accumulator",
            "--expected-date",
            "20250429",
            "UMR_ACCUM_20250429.txt",
        ])
        .unwrap();
        assert!(args.pretty);
        match args.command {
            Command::Validate { client, expected_date, .. } => {
                assert_eq!(client, "UMR");
                assert_eq!(expected_date.as_deref(), Some("20250429"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_correct_parses_output() {
        let args = Args::try_parse_from([
            "rxfeed-validate",
            "correct",
            "--client",
            "UMR",
            "-o",
            "fixed.txt",
            "in.txt",
        ])
        .unwrap();
        match args.command {
            Command::Correct { output, expected_date, .. } => {
                assert_eq!(output, Some(PathBuf::from("fixed.txt")));
                assert!(expected_date.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_message() {
        let err = parse_category("pharmacy").unwrap_err();
        assert!(err.to_string().starts_with("Unknown file category 'pharmacy'"));
        assert_eq!(parse_category("ACCUM").unwrap(), FileCategory::Accumulator);
    }

    #[test]
    fn test_expected_date_help_names_unchecked_dates() {
        let command = Args::command();
        let help = |name: &str| -> String {
            command
                .find_subcommand(name)
                .and_then(|sub| sub.get_arguments().find(|a| a.get_id() == "expected_date"))
                .and_then(|arg| arg.get_help())
                .map(ToString::to_string)
                .unwrap()
        };
        assert!(help("validate").contains("EDI ISA date are only checked when a date is given"));
        assert!(help("correct").contains("tokens are not checked"));
    }

    fn umr_file() -> String {
        let line = |values: &[(usize, &str)]| {
            let mut buffer = vec![' '; 500];
            for (from, value) in values {
                for (offset, c) in value.chars().enumerate() {
                    buffer[from - 1 + offset] = c;
                }
            }
            buffer.into_iter().collect::<String>()
        };
        let name = "UMR_ACCUM_20250429";
        [
            line(&[(1, "1"), (3, name), (33, "20250429"), (41, "120000")]),
            line(&[
                (1, "2"),
                (3, "AB-12"),
                (20, "JANE"),
                (46, "DOE"),
                (81, "19800101"),
                (104, "M"),
                (105, "EE"),
            ]),
            line(&[(1, "3"), (3, name), (33, "20250429"), (41, "120000"), (67, "00000001")]),
        ]
        .join("\n")
    }

    #[test]
    fn test_correct_keeps_input_and_writes_suffixed_copy() {
        let registry = LayoutRegistry::bundled().unwrap();
        let validator = FileValidator::new(&registry);
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("UMR_ACCUM_20250429.txt");
        std::fs::write(&input, umr_file()).unwrap();

        let result =
            correct_file(&validator, "UMR", None, &input, None, Some(dir.path())).unwrap();
        assert_eq!(result.errors(), result.corrections());
        assert_eq!(result.corrections().len(), 1);

        assert_eq!(std::fs::read_to_string(&input).unwrap(), umr_file());
        let written =
            std::fs::read_to_string(dir.path().join("UMR_ACCUM_20250429_corrected.txt")).unwrap();
        assert!(written.lines().nth(1).unwrap().starts_with("2 AB012"));
    }

    #[test]
    fn test_correct_refuses_to_overwrite_input() {
        let registry = LayoutRegistry::bundled().unwrap();
        let validator = FileValidator::new(&registry);
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("accum.txt");
        std::fs::write(&input, umr_file()).unwrap();

        let err = correct_file(&validator, "UMR", None, &input, Some(&input), None).unwrap_err();
        assert!(err.to_string().starts_with("Refusing to overwrite input file"));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), umr_file());
    }

    #[test]
    fn test_correct_configuration_error_writes_nothing() {
        let registry = LayoutRegistry::bundled().unwrap();
        let validator = FileValidator::new(&registry);
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("e.txt");
        std::fs::write(&input, "x").unwrap();
        let out = tempfile::tempdir().unwrap();

        let result =
            correct_file(&validator, "LUCENT", None, &input, None, Some(out.path())).unwrap();
        assert!(!result.is_valid());
        assert!(!out.path().join("e_corrected.txt").exists());
    }
}
