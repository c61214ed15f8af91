// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compliqbot CLI - page accessibility audit and simulation helpers

use anyhow::{anyhow, Context};
use compliqbot::color::parse_color;
use compliqbot::config::{self, Config};
use compliqbot::preview::preview_file;
use compliqbot::report::{generate_report, OutputFormat};
use compliqbot::scanner::{self, PageAudit};
use compliqbot::simulation::ColorBlindness;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Heuristic accessibility audit for HTML pages
#[derive(Parser)]
#[command(name = "compliqbot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, default_value_os_t = config::default_config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a single HTML file
    Audit {
        /// File to audit
        file: PathBuf,

        /// Output format (defaults to the configured one)
        #[arg(long)]
        format: Option<FormatArg>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with status 1 when the score is below this
        #[arg(long)]
        min_score: Option<u8>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Audit every HTML file under a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Output format (defaults to the configured one)
        #[arg(long)]
        format: Option<FormatArg>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with status 1 when any page scores below this
        #[arg(long)]
        min_score: Option<u8>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Show what a screen reader would announce for matching elements
    Preview {
        /// HTML file
        file: PathBuf,

        /// CSS selector of the elements to describe
        #[arg(long)]
        selector: String,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Show how a color appears with a color-vision deficiency
    Simulate {
        /// Color as #hex, rgb()/rgba() or a CSS name
        color: String,

        /// Deficiency (defaults to the configured one)
        #[arg(long = "type")]
        kind: Option<ColorBlindnessArg>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Write a default configuration file to the --config path
    Init,
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

/// Color-vision deficiency CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorBlindnessArg {
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
}

impl From<ColorBlindnessArg> for ColorBlindness {
    fn from(arg: ColorBlindnessArg) -> Self {
        match arg {
            ColorBlindnessArg::Protanopia => ColorBlindness::Protanopia,
            ColorBlindnessArg::Deuteranopia => ColorBlindness::Deuteranopia,
            ColorBlindnessArg::Tritanopia => ColorBlindness::Tritanopia,
            ColorBlindnessArg::Achromatopsia => ColorBlindness::Achromatopsia,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("compliqbot=debug")
    } else {
        EnvFilter::new(format!("compliqbot={}", level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config;
    let load = || -> anyhow::Result<Config> {
        config::load_config(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))
    };

    match cli.command {
        Commands::Audit { file, format, output, min_score, verbose } => {
            let config = load()?;
            init_logging(verbose, &config.log.level);
            let audit = scanner::scan_file(&file)
                .with_context(|| format!("auditing {}", file.display()))?;
            let audits = vec![audit];
            finish(&audits, &config, format, output.as_deref(), min_score)?;
        }

        Commands::Scan { dir, format, output, min_score, verbose } => {
            let config = load()?;
            init_logging(verbose, &config.log.level);
            let audits = scanner::scan_directory(&dir, &config.scan)?;
            finish(&audits, &config, format, output.as_deref(), min_score)?;
        }

        Commands::Preview { file, selector, verbose } => {
            let config = load()?;
            init_logging(verbose, &config.log.level);
            let previews = preview_file(&file, &selector)
                .with_context(|| format!("previewing {}", file.display()))?;
            if previews.is_empty() {
                eprintln!("No elements match {}", selector);
            }
            for item in previews {
                println!("<{}> #{}", item.tag, item.element);
                println!("{}\n", item.preview);
            }
        }

        Commands::Simulate { color, kind, verbose } => {
            let config = load()?;
            init_logging(verbose, &config.log.level);
            let rgb = parse_color(&color).ok_or_else(|| anyhow!("Unrecognized color: {}", color))?;
            let kind = kind
                .map(ColorBlindness::from)
                .unwrap_or(config.simulation.color_blindness.kind);
            println!("{}: {} -> {}", kind, rgb, kind.simulate(rgb));
        }

        Commands::Init => {
            config::write_default_config(&config_path)?;
            eprintln!("Default configuration written to {}", config_path.display());
        }
    }

    Ok(())
}

/// Render, write and apply the score threshold
fn finish(
    audits: &[PageAudit],
    config: &Config,
    format: Option<FormatArg>,
    output: Option<&Path>,
    min_score: Option<u8>,
) -> anyhow::Result<()> {
    let format = format.map(OutputFormat::from).unwrap_or(config.report.format);
    let report = generate_report(audits, format);
    write_output(&report, output)?;

    let min_score = min_score.unwrap_or(config.report.min_score);
    if min_score > 0 {
        let below = audits.iter().filter(|a| a.result.score < min_score).count();
        if below > 0 {
            info!("{} page(s) scored below {}", below, min_score);
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
