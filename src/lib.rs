//! gtprep: OCR ground truth to text-recognition manifests.
//!
//! gtprep reads per-image ground-truth files (`x1,y1,...,x4,y4,label` lines)
//! next to a directory of images and writes tab-separated training
//! manifests, either one row per image with the full text or one cropped
//! image and row per text line.
//!
//! # Modules
//!
//! - [`gt`]: Ground-truth parsing, encoding fallback and bounding boxes
//! - [`manifest`]: Tab-separated manifest writer
//! - [`convert`]: Full-text and per-line batch passes with their reports
//! - [`config`]: Pass configuration and YAML job files
//! - [`error`]: Error types for gtprep operations

pub mod config;
pub mod convert;
pub mod error;
pub mod gt;
pub mod manifest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use config::{CropIndex, JobFile, Mode, NamedPass, PassConfig};
pub use convert::{ConversionReport, RunTotals};
pub use error::GtPrepError;

use gt::TextEncoding;

/// The gtprep CLI application.
#[derive(Parser)]
#[command(name = "gtprep")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write one manifest row per image with all of its labels.
    FullText(FullTextArgs),
    /// Crop every text line and write one manifest row per crop.
    Crop(CropArgs),
    /// Run the passes listed in a YAML job file.
    Run(RunArgs),
}

/// Options shared by both single-pass subcommands.
#[derive(clap::Args)]
struct CommonArgs {
    /// Directory holding the images.
    #[arg(long, default_value = "data/images")]
    images_dir: PathBuf,

    /// Directory holding one ground-truth .txt file per image.
    #[arg(long, default_value = "data/gt")]
    gt_dir: PathBuf,

    /// Image file extension.
    #[arg(long, default_value = "jpg")]
    image_ext: String,

    /// Candidate encodings for ground-truth files, tried in order.
    #[arg(
        long = "encoding",
        value_delimiter = ',',
        default_values = ["utf-8", "latin-1", "cp1252", "iso-8859-1"]
    )]
    encodings: Vec<String>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    report: String,
}

impl CommonArgs {
    fn encodings(&self) -> Result<Vec<TextEncoding>, GtPrepError> {
        self.encodings.iter().map(|label| label.parse()).collect()
    }
}

/// Arguments for the full-text subcommand.
#[derive(clap::Args)]
struct FullTextArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Manifest to write.
    #[arg(long, default_value = "data/gt.txt")]
    output: PathBuf,

    /// Directory prefix for image paths in the manifest.
    #[arg(long, default_value = "images")]
    image_prefix: String,
}

/// Arguments for the crop subcommand.
#[derive(clap::Args)]
struct CropArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Manifest to write.
    #[arg(long, default_value = "data/gt_cropped.txt")]
    output: PathBuf,

    /// Directory for cropped line images.
    #[arg(long, default_value = "data/images_cropped")]
    crops_dir: PathBuf,

    /// Number crops 000, 001, ... per file instead of by source line.
    #[arg(long)]
    dense_index: bool,

    /// Minimum crop width and height in pixels.
    #[arg(long, default_value_t = 5)]
    min_size: u32,

    /// Log progress every N processed files.
    #[arg(long, default_value_t = 50)]
    progress_every: usize,
}

/// Arguments for the run subcommand.
#[derive(clap::Args)]
struct RunArgs {
    /// YAML job file. Without one, crops data/ (train) and val_data/ (val).
    jobs: Option<PathBuf>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    report: String,
}

/// Run the gtprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), GtPrepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::FullText(args)) => run_full_text(args),
        Some(Commands::Crop(args)) => run_crop(args),
        Some(Commands::Run(args)) => run_jobs(args),
        None => {
            println!("gtprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("OCR ground truth to text-recognition manifests.");
            println!();
            println!("Run 'gtprep --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the full-text subcommand.
fn run_full_text(args: FullTextArgs) -> Result<(), GtPrepError> {
    let config = PassConfig {
        mode: Mode::FullText,
        images_dir: args.common.images_dir.clone(),
        gt_dir: args.common.gt_dir.clone(),
        output: args.output,
        image_extension: args.common.image_ext.clone(),
        image_prefix: args.image_prefix,
        encodings: args.common.encodings()?,
        ..Default::default()
    };

    let report = convert::run_pass("full-text", &config)?;
    print_report(&report, &args.common.report)
}

/// Execute the crop subcommand.
fn run_crop(args: CropArgs) -> Result<(), GtPrepError> {
    let config = PassConfig {
        mode: Mode::PerLine,
        images_dir: args.common.images_dir.clone(),
        gt_dir: args.common.gt_dir.clone(),
        output: args.output,
        crops_dir: args.crops_dir,
        image_extension: args.common.image_ext.clone(),
        encodings: args.common.encodings()?,
        crop_index: if args.dense_index {
            CropIndex::Dense
        } else {
            CropIndex::Line
        },
        min_crop_size: args.min_size,
        progress_every: args.progress_every,
        ..Default::default()
    };

    let report = convert::run_pass("crop", &config)?;
    print_report(&report, &args.common.report)
}

/// Execute the run subcommand.
fn run_jobs(args: RunArgs) -> Result<(), GtPrepError> {
    let job = match &args.jobs {
        Some(path) => JobFile::read(path)?,
        None => JobFile::default_plan(),
    };

    let reports = convert::run_job(&job)?;
    print_run(&reports, &args.report)
}

fn print_report(report: &ConversionReport, format: &str) -> Result<(), GtPrepError> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => print!("{report}"),
    }
    Ok(())
}

fn print_run(reports: &[ConversionReport], format: &str) -> Result<(), GtPrepError> {
    let totals = RunTotals::from_reports(reports);
    match format {
        "json" => {
            let json = serde_json::json!({
                "passes": reports,
                "totals": totals,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            for report in reports {
                print!("{report}");
                println!();
            }
            print!("{totals}");
        }
    }
    Ok(())
}
