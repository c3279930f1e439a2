use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Extract tables from Persian PDF documents into spreadsheets.
#[derive(Debug, Parser)]
#[command(name = "jadval", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract tables from PDF files or directories and write them to disk
    Extract(ExtractArgs),

    /// Print detected tables as text grids without writing files
    Preview {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        text: TextArgs,

        /// Table detection strategy
        #[arg(long, value_enum)]
        strategy: Option<TableStrategy>,

        /// TOML configuration file
        #[arg(long, env = "JADVAL_CONFIG", value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Arguments of the `extract` subcommand.
///
/// Options left unset fall back to the configuration file, then to the
/// built-in defaults.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// PDF files or directories containing PDF files
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory to write output files into [default: output]
    #[arg(short, long, env = "JADVAL_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Value written to the subject column (e.g. 'هنر')
    #[arg(long)]
    pub subject: Option<String>,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write one file per page or one per document
    #[arg(long, value_enum)]
    pub split: Option<SplitMode>,

    #[command(flatten)]
    pub text: TextArgs,

    /// OCR handling for scanned pages
    #[arg(long, value_enum)]
    pub ocr: Option<OcrMode>,

    /// Tesseract language code(s), e.g. 'fas' or 'fas+eng'
    #[arg(long, value_name = "LANG")]
    pub ocr_lang: Option<String>,

    /// Rendering resolution for OCR
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Table detection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<TableStrategy>,

    /// Height in points of the band above a table read for titles
    #[arg(long)]
    pub header_height: Option<f64>,

    /// Height in points of the band below a table read for footer lines
    #[arg(long)]
    pub footer_height: Option<f64>,

    /// Write worksheets left to right instead of right to left
    #[arg(long)]
    pub ltr_sheet: bool,

    /// Search input directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// TOML configuration file
    #[arg(long, env = "JADVAL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Text repair flags shared by `extract` and `preview`.
#[derive(Debug, Args)]
pub struct TextArgs {
    /// How to restore reading order of extracted strings
    #[arg(long, value_enum)]
    pub text_order: Option<TextOrder>,

    /// Digit style for extracted text
    #[arg(long, value_enum)]
    pub digits: Option<DigitStyle>,
}

/// Output format for extracted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl From<OutputFormat> for jadval::OutputFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Xlsx => Self::Xlsx,
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Output file granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitMode {
    Page,
    Document,
}

impl From<SplitMode> for jadval::SplitMode {
    fn from(value: SplitMode) -> Self {
        match value {
            SplitMode::Page => Self::Page,
            SplitMode::Document => Self::Document,
        }
    }
}

/// Reading-order repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextOrder {
    /// Reverse right-to-left text, keeping numbers and Latin runs intact
    Visual,
    /// Reverse every string character by character
    Reverse,
    /// Keep strings as extracted
    Logical,
}

impl From<TextOrder> for jadval::jadval_core::TextOrder {
    fn from(value: TextOrder) -> Self {
        match value {
            TextOrder::Visual => Self::Visual,
            TextOrder::Reverse => Self::Reverse,
            TextOrder::Logical => Self::Logical,
        }
    }
}

/// Digit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigitStyle {
    Keep,
    Ascii,
    Persian,
}

impl From<DigitStyle> for jadval::jadval_core::DigitStyle {
    fn from(value: DigitStyle) -> Self {
        match value {
            DigitStyle::Keep => Self::Keep,
            DigitStyle::Ascii => Self::Ascii,
            DigitStyle::Persian => Self::Persian,
        }
    }
}

/// OCR mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OcrMode {
    /// Never run OCR
    Off,
    /// OCR pages without a text layer
    Auto,
    /// OCR every page
    Force,
}

impl From<OcrMode> for jadval::OcrMode {
    fn from(value: OcrMode) -> Self {
        match value {
            OcrMode::Off => Self::Off,
            OcrMode::Auto => Self::Auto,
            OcrMode::Force => Self::Force,
        }
    }
}

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableStrategy {
    /// Detect tables from ruling lines
    Lattice,
    /// Detect tables from text alignment
    Stream,
}

impl From<TableStrategy> for jadval::TableStrategy {
    fn from(value: TableStrategy) -> Self {
        match value {
            TableStrategy::Lattice => Self::Lattice,
            TableStrategy::Stream => Self::Stream,
        }
    }
}
