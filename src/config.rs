//! Run configuration.

use std::path::{Path, PathBuf};

use crate::fonts;
use crate::render::{PageSetup, TableSpec};
use crate::rows::RowOptions;

/// Input file read when none is given.
pub const DEFAULT_INPUT: &str = "resume.yaml";

/// Everything one generation run needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The resume YAML file.
    pub input: PathBuf,
    /// Explicit output path; derived from `input` when `None`.
    pub output: Option<PathBuf>,
    /// Directory searched for fonts before the default locations.
    pub fonts_dir: Option<PathBuf>,
    /// Font family name, the prefix of its `-Regular.ttf` / `-Bold.ttf` files.
    pub font_family: String,
    pub page: PageSetup,
    pub table: TableSpec,
    pub rows: RowOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT)
    }
}

impl Config {
    /// Default settings for the given input file.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            fonts_dir: None,
            font_family: fonts::DEFAULT_FONT_FAMILY_NAME.to_owned(),
            page: PageSetup::default(),
            table: TableSpec::default(),
            rows: RowOptions::default(),
        }
    }

    /// Where the PDF is written: the explicit output, or the input with a `.pdf` extension.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }
}

/// `resume.yaml` -> `resume.pdf`, keeping the directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}
