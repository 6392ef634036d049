//! firma: analyze a signature scan or compare two, printing JSON.
//!
//! Reads images from disk, runs the `firma-pipeline` analysis and writes
//! the result to stdout. Failures are printed as `{"error": "..."}` and
//! exit with a non-zero status.
//!
//! # Usage
//!
//! ```text
//! firma analyze <IMAGE> --width-mm 120 --height-mm 40
//! firma compare <VERIFICA> <REFERENCE> --verifica-size 120x40 --reference-size 118x42
//! ```
//!
//! Set `RUST_LOG=debug` to see which features fell back to neutral values.

#![allow(clippy::print_stdout)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use firma_pipeline::{
    AnalysisConfig, AnalysisMetadata, ErrorReport, FeatureValue, FirmaError, PhysicalSize,
    SignatureFeatures, SignatureInput, SimilarityKind,
};
use serde::Serialize;

/// Signature feature extraction and forensic comparison.
#[derive(Parser)]
#[command(name = "firma", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Full analysis config as a JSON string.
    ///
    /// Missing fields take their defaults. The JSON must be a valid
    /// `AnalysisConfig` serialization.
    #[arg(long, global = true)]
    config_json: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the feature descriptor of one signature.
    Analyze(AnalyzeArgs),
    /// Compare a questioned signature against a reference.
    Compare(CompareArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to the signature image (PNG, JPEG, BMP, WebP, TIFF).
    image: PathBuf,

    /// Physical width of the scanned area in millimeters.
    #[arg(long)]
    width_mm: f64,

    /// Physical height of the scanned area in millimeters.
    #[arg(long)]
    height_mm: f64,

    /// Also emit the legacy spelling of every parameter name.
    #[arg(long)]
    legacy_keys: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// Path to the questioned signature.
    verifica: PathBuf,

    /// Path to the reference signature.
    reference: PathBuf,

    /// Physical size of the questioned scan, as `WIDTHxHEIGHT` in mm.
    #[arg(long, value_parser = parse_size)]
    verifica_size: PhysicalSize,

    /// Physical size of the reference scan, as `WIDTHxHEIGHT` in mm.
    #[arg(long, value_parser = parse_size)]
    reference_size: PhysicalSize,
}

/// Failures of the command-line layer.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid --config-json: {0}")]
    Config(serde_json::Error),

    #[error("failed to serialize output: {0}")]
    Output(serde_json::Error),

    #[error("invalid arguments: {0}")]
    Args(String),

    #[error(transparent)]
    Pipeline(#[from] FirmaError),
}

/// Output of `firma analyze`.
#[derive(Serialize)]
struct AnalyzeOutput {
    parameters: BTreeMap<String, FeatureValue>,
    features: SignatureFeatures,
    metadata: AnalysisMetadata,
}

/// Parse `120x40` (or `120X40`) into a physical size.
fn parse_size(s: &str) -> Result<PhysicalSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT in mm, got {s:?}"))?;
    let width_mm: f64 = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height_mm: f64 = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok(PhysicalSize::new(width_mm, height_mm))
}

/// Parse arguments. Help and version requests are not errors and are
/// returned untouched so clap can print them.
fn parse_cli<I, T>(args: I) -> Result<Result<Cli, CliError>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Ok(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .split("\n\n")
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .trim();
            Ok(Err(CliError::Args(message.to_string())))
        }
    }
}

fn config_from_cli(cli: &Cli) -> Result<AnalysisConfig, CliError> {
    cli.config_json.as_deref().map_or_else(
        || Ok(AnalysisConfig::default()),
        |json| serde_json::from_str(json).map_err(CliError::Config),
    )
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(CliError::Output)
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = config_from_cli(cli)?;
    log::debug!("config: {config:?}");

    match &cli.command {
        Command::Analyze(args) => {
            let bytes = read(&args.image)?;
            let physical = PhysicalSize::new(args.width_mm, args.height_mm);
            let analysis = firma_pipeline::analyze(&bytes, physical, &config)?;
            to_json(
                &AnalyzeOutput {
                    parameters: if args.legacy_keys {
                        analysis.descriptor.with_legacy_aliases()
                    } else {
                        analysis.descriptor.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
                    },
                    features: analysis.features,
                    metadata: analysis.metadata,
                },
                cli.pretty,
            )
        }
        Command::Compare(args) => {
            let verifica = read(&args.verifica)?;
            let reference = read(&args.reference)?;
            let report = firma_pipeline::compare(
                SignatureInput {
                    image_bytes: &verifica,
                    physical: args.verifica_size,
                },
                SignatureInput {
                    image_bytes: &reference,
                    physical: args.reference_size,
                },
                &config,
                &SimilarityKind::Mssim,
            )?;
            log::info!("{} ({}%)", report.verdict, report.confidence);
            to_json(&report, cli.pretty)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let result = match parse_cli(std::env::args_os()) {
        Ok(parsed) => parsed.and_then(|cli| run(&cli)),
        Err(help) => help.exit(),
    };

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            let report = ErrorReport::from(&e);
            println!("{}", serde_json::to_string(&report).unwrap_or_default());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_both_separators() {
        let s = parse_size("120x40").unwrap();
        assert!((s.width_mm - 120.0).abs() < f64::EPSILON);
        assert!((s.height_mm - 40.0).abs() < f64::EPSILON);
        let s = parse_size("80.5X 30").unwrap();
        assert!((s.width_mm - 80.5).abs() < f64::EPSILON);
    }

    #[test]
    fn size_rejects_garbage() {
        assert!(parse_size("120").is_err());
        assert!(parse_size("ax40").is_err());
    }

    #[test]
    fn compare_requires_both_sizes() {
        let parsed = parse_cli(["firma", "compare", "a.png", "b.png", "--verifica-size", "10x5"]).unwrap();
        let err = parsed.err().unwrap();
        assert!(matches!(err, CliError::Args(_)));
        assert!(err.to_string().contains("--reference-size"), "got {err}");

        let report = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert!(report["error"].as_str().unwrap().starts_with("invalid arguments"));
    }

    #[test]
    fn help_is_not_an_error_report() {
        let err = parse_cli(["firma", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn config_json_fills_defaults() {
        let cli = Cli::try_parse_from([
            "firma",
            "analyze",
            "a.png",
            "--width-mm",
            "100",
            "--height-mm",
            "40",
            "--config-json",
            r#"{"ink_threshold": 120}"#,
        ])
        .unwrap();
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.ink_threshold, 120);
        assert_eq!(config.analysis_width, AnalysisConfig::DEFAULT_ANALYSIS_WIDTH);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read(Path::new("/nonexistent/firma.png")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
