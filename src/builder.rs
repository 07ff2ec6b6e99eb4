//! Construction of pre-configured `genpdf` documents.

use std::path::PathBuf;

use genpdf::{Margins, Mm, PaperSize, SimplePageDecorator, Size};

use crate::error::ResumeError;
use crate::fonts;

/// Page margin used on every side unless configured otherwise.
pub const DEFAULT_MARGIN_MM: f64 = 12.5;

/// Body text size of the table rows.
pub const DEFAULT_FONT_SIZE: u8 = 10;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Builder for `genpdf::Document` instances with the resume defaults: A4 paper, 12.5 mm margins
/// and the Roboto family.
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    paper_size: Size,
    margin_mm: f64,
    title: Option<String>,
    font_family: String,
    fonts_dir: Option<PathBuf>,
    font_size: u8,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4.into(),
            margin_mm: DEFAULT_MARGIN_MM,
            title: None,
            font_family: fonts::DEFAULT_FONT_FAMILY_NAME.to_owned(),
            fonts_dir: None,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the margin applied on all four sides, in millimetres.
    pub fn with_margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm.max(0.0);
        self
    }

    /// Sets the PDF document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Selects the font family by file name prefix, e.g. `Roboto` for `Roboto-Regular.ttf`.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Searches this directory for fonts before the default locations.
    pub fn with_fonts_dir(mut self, directory: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = directory.into();
        self
    }

    /// Sets the default font size of the document.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    /// Loads the fonts and builds a fully configured `genpdf::Document`.
    pub fn build(self) -> Result<genpdf::Document, ResumeError> {
        let font_family = fonts::load_font_family(self.fonts_dir.as_deref(), &self.font_family)
            .map_err(ResumeError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);

        document.set_paper_size(self.paper_size);
        document.set_font_size(self.font_size);
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let margin = mm_from_f64(self.margin_mm);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::trbl(margin, margin, margin, margin));
        document.set_page_decorator(decorator);

        Ok(document)
    }
}
