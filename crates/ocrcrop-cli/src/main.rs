//! ocrcrop command-line interface.
//!
//! Recognizes text in one image, writes it to a file and/or stdout, and
//! optionally saves the image cropped to the recognized text.
//!
//! Configuration is layered: `--config <file>`, else a discovered
//! `ocrcrop.toml`, else defaults; flags given on the command line win.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ocrcrop::core::extractor::process_file;
use ocrcrop::{OcrCropConfig, PipelineReport, Recognizer, TesseractCli};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "ocrcrop",
    version,
    about = "Recognize text in an image and crop the image to it"
)]
struct Cli {
    /// Image file to recognize
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Text file to write the recognized text to
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the recognized text to stdout. Default when neither --output nor --crop is given
    #[arg(short = 's', long)]
    stdout: bool,

    /// Image file to write the region covering the recognized text to
    #[arg(short = 'c', long)]
    crop: Option<PathBuf>,

    /// Margin added around the recognized text before cropping [default: 10]
    #[arg(short = 'b', long = "bb-margin", allow_negative_numbers = true)]
    bb_margin: Option<f64>,

    /// Append to --output instead of overwriting it
    #[arg(short = 'a', long)]
    append: bool,

    /// Language tag to recognize with
    #[arg(short = 'l', long)]
    lang: Option<String>,

    /// Print the languages available for recognition
    #[arg(short = 'x', long = "lang-list")]
    lang_list: bool,

    /// Emit the recognized text as a single line
    #[arg(short = 'n', long = "one-line")]
    one_line: bool,

    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit with failure when the crop step fails
    #[arg(long)]
    strict_crop: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<OcrCropConfig> {
    match path {
        Some(path) => {
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            let config = if is_json {
                OcrCropConfig::from_json_file(path)?
            } else {
                OcrCropConfig::from_toml_file(path)?
            };
            Ok(config)
        }
        None => Ok(OcrCropConfig::discover()
            .context("Failed to load discovered configuration")?
            .unwrap_or_default()),
    }
}

/// Flags override whatever the configuration file set.
fn apply_overrides(config: &mut OcrCropConfig, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output.text_output_path = Some(output.clone());
    }
    if let Some(crop) = &cli.crop {
        config.output.crop_output_path = Some(crop.clone());
    }
    if let Some(margin) = cli.bb_margin {
        config.output.bounding_box_margin = margin;
    }
    if let Some(lang) = &cli.lang {
        config.ocr.language = Some(lang.clone());
    }
    config.output.print_to_stdout |= cli.stdout;
    config.output.append_to_text_output |= cli.append;
    config.output.single_line_text |= cli.one_line;
    config.strict_crop |= cli.strict_crop;
}

fn print_languages<W: Write>(out: &mut W, languages: &[String]) -> std::io::Result<()> {
    writeln!(out, "Supported languages:")?;
    for language in languages {
        writeln!(out, "{}", language)?;
    }
    out.flush()
}

/// Report a failed crop step on `stderr` and decide whether the run succeeded.
fn finish<W: Write>(report: &PipelineReport, strict_crop: bool, stderr: &mut W) -> std::io::Result<bool> {
    if let Some(err) = report.crop_error() {
        writeln!(stderr, "{}", err)?;
    }
    Ok(report.is_success(strict_crop))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    let engine = TesseractCli::new(&config.ocr);
    let mut stdout = std::io::stdout();

    if cli.lang_list {
        let languages = engine
            .available_languages()
            .await
            .context("Failed to list recognition languages")?;
        print_languages(&mut stdout, &languages)?;

        if cli.input.is_none() {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("No input file provided. To show help enter: ocrcrop --help"))?;

    let report = process_file(input, &engine, &config, &mut stdout).await?;

    if finish(&report, config.strict_crop, &mut std::io::stderr())? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
