//! TOML configuration file and command-line overrides.
//!
//! ```toml
//! [extract]
//! subject = "هنر"
//! header_height = 60.0
//! text = { order = "visual", normalizer = { digits = "ascii" } }
//!
//! [output]
//! dir = "excel"
//! format = "xlsx"
//! split = "page"
//! right_to_left = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use jadval::{ExtractOptions, OutputFormat, OutputPlan, SplitMode, WriteOptions};
use serde::Deserialize;

use crate::cli::{ExtractArgs, TableStrategy, TextArgs};

/// Output directory used when neither the command line nor the
/// configuration file names one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extract: ExtractOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub split: SplitMode,
    #[serde(flatten)]
    pub write: WriteOptions,
}

impl Config {
    /// Load `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `extract` flags on top of the file values.
    pub fn into_extract(self, args: &ExtractArgs) -> (ExtractOptions, OutputPlan) {
        let mut options = self.extract;
        apply_text_args(&mut options, &args.text);
        apply_strategy(&mut options, args.strategy);

        if let Some(subject) = &args.subject {
            options.subject = subject.clone();
        }
        if let Some(mode) = args.ocr {
            options.ocr.mode = mode.into();
        }
        if let Some(lang) = &args.ocr_lang {
            options.ocr.language = lang.clone();
        }
        if let Some(dpi) = args.dpi {
            options.ocr.dpi = dpi;
        }
        if let Some(height) = args.header_height {
            options.header_height = height;
        }
        if let Some(height) = args.footer_height {
            options.footer_height = height;
        }

        let output = self.output;
        let dir = args
            .output_dir
            .clone()
            .or(output.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let mut plan = OutputPlan {
            format: args.format.map(Into::into).unwrap_or(output.format),
            split: args.split.map(Into::into).unwrap_or(output.split),
            write: output.write,
            ..OutputPlan::new(dir)
        };
        if args.ltr_sheet {
            plan.write.right_to_left = false;
        }

        (options, plan)
    }

    /// Apply `preview` flags on top of the file values.
    pub fn into_preview(self, text: &TextArgs, strategy: Option<TableStrategy>) -> ExtractOptions {
        let mut options = self.extract;
        apply_text_args(&mut options, text);
        apply_strategy(&mut options, strategy);
        options
    }
}

fn apply_text_args(options: &mut ExtractOptions, text: &TextArgs) {
    if let Some(order) = text.text_order {
        options.text.order = order.into();
    }
    if let Some(digits) = text.digits {
        options.text.normalizer.digits = digits.into();
    }
}

fn apply_strategy(options: &mut ExtractOptions, strategy: Option<TableStrategy>) {
    if let Some(strategy) = strategy {
        options.strategy = strategy.into();
    }
}
