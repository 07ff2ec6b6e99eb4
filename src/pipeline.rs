//! One generation run: load the YAML, build rows, render, write the PDF.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::builder::DocumentBuilder;
use crate::config::Config;
use crate::error::ResumeError;
use crate::model::ResumeDocument;
use crate::render::{render_layout, GenpdfSink, RenderedPdf};
use crate::rows::RowModelBuilder;

/// Renders the resume described by `config` into memory.
pub fn render_resume(config: &Config) -> Result<RenderedPdf, ResumeError> {
    debug!("loading {}", config.input.display());
    let document = ResumeDocument::from_path(&config.input)?;
    let layout = RowModelBuilder::with_options(config.rows.clone()).build(&document)?;

    let builder = DocumentBuilder::new()
        .with_title(layout.headings.name.text())
        .with_font_family(config.font_family.as_str())
        .with_fonts_dir(config.fonts_dir.clone());
    render_layout(GenpdfSink::new(builder), &config.page, &config.table, &layout)
}

/// Renders the resume and writes it to [`Config::output_path`], returning that path.
///
/// Nothing is written unless rendering succeeds.
pub fn generate(config: &Config) -> Result<PathBuf, ResumeError> {
    let pdf = render_resume(config)?;
    let output = config.output_path();
    write_pdf(&output, &pdf.bytes)?;
    info!("wrote {} ({} bytes)", output.display(), pdf.bytes.len());
    Ok(output)
}

/// Writes `bytes` to a sibling temporary file and renames it over `path`.
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<(), ResumeError> {
    let partial = partial_path(path);
    let result = write_and_sync(&partial, bytes).and_then(|()| fs::rename(&partial, path));
    result.map_err(|source| {
        let _ = fs::remove_file(&partial);
        ResumeError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
