//! Drawing a [`ResumeLayout`] through a PDF backend.
//!
//! [`DocumentSink`] is the narrow contract between the row model and a layout library: begin a
//! document, draw headings, stream table rows, finalize. [`GenpdfSink`] implements it on top of
//! `genpdf`; tests use a recording sink to check the call sequence without fonts.

use genpdf::elements::{Break, LinearLayout, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, PaperSize};

use crate::builder::{mm_from_f64, DocumentBuilder, DEFAULT_MARGIN_MM};
use crate::error::ResumeError;
use crate::richtext::parse_markup;
use crate::rows::{CellSpec, HeadingSpec, HorizontalAlignment, Ink, ResumeLayout, RowRecord};

/// Each tab in cell text becomes this many non-breaking spaces, which keeps a bullet glued to the
/// first word of its line.
const TAB_WIDTH: usize = 2;

const NO_BREAK_SPACE: char = '\u{a0}';

/// Supported paper formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
    Legal,
}

impl From<PaperFormat> for PaperSize {
    fn from(format: PaperFormat) -> Self {
        match format {
            PaperFormat::A4 => PaperSize::A4,
            PaperFormat::Letter => PaperSize::Letter,
            PaperFormat::Legal => PaperSize::Legal,
        }
    }
}

/// Paper and margins of the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub paper: PaperFormat,
    /// Margin on all four sides, in millimetres.
    pub margin_mm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            paper: PaperFormat::A4,
            margin_mm: DEFAULT_MARGIN_MM,
        }
    }
}

/// Column layout of the resume table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    /// Relative widths of the two columns.
    pub column_weights: Vec<usize>,
    /// Line spacing factor applied to row text.
    pub line_spacing: f64,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            column_weights: vec![1, 1],
            line_spacing: 1.0,
        }
    }
}

/// A finished PDF held in memory.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
}

/// Receives drawing calls for one document, in order.
pub trait DocumentSink {
    /// What [`DocumentSink::finalize`] produces.
    type Output;

    fn begin_document(&mut self, page: &PageSetup) -> Result<(), ResumeError>;

    fn draw_heading(&mut self, heading: &HeadingSpec) -> Result<(), ResumeError>;

    fn begin_table(&mut self, table: &TableSpec) -> Result<(), ResumeError>;

    fn add_row(&mut self, row: &RowRecord) -> Result<(), ResumeError>;

    fn end_table(&mut self) -> Result<(), ResumeError>;

    fn finalize(self) -> Result<Self::Output, ResumeError>
    where
        Self: Sized;
}

/// Draws `layout` into `sink`: headings first, then every row inside one table.
pub fn render_layout<S: DocumentSink>(
    mut sink: S,
    page: &PageSetup,
    table: &TableSpec,
    layout: &ResumeLayout,
) -> Result<S::Output, ResumeError> {
    sink.begin_document(page)?;
    for heading in layout.headings.iter() {
        sink.draw_heading(heading)?;
    }
    sink.begin_table(table)?;
    for row in &layout.rows {
        sink.add_row(row)?;
    }
    sink.end_table()?;
    sink.finalize()
}

/// [`DocumentSink`] backed by a `genpdf` document.
pub struct GenpdfSink {
    builder: DocumentBuilder,
    document: Option<genpdf::Document>,
    table: Option<OpenTable>,
}

struct OpenTable {
    spec: TableSpec,
    layout: LinearLayout,
}

impl GenpdfSink {
    /// Creates a sink that configures its document (fonts, title) with `builder`.
    pub fn new(builder: DocumentBuilder) -> Self {
        Self {
            builder,
            document: None,
            table: None,
        }
    }

    fn document(&mut self) -> Result<&mut genpdf::Document, ResumeError> {
        self.document
            .as_mut()
            .ok_or_else(|| sequence_error("document has not been started"))
    }
}

impl DocumentSink for GenpdfSink {
    type Output = RenderedPdf;

    fn begin_document(&mut self, page: &PageSetup) -> Result<(), ResumeError> {
        if self.document.is_some() {
            return Err(sequence_error("document already started"));
        }
        let document = self
            .builder
            .clone()
            .with_paper_size(PaperSize::from(page.paper))
            .with_margin_mm(page.margin_mm)
            .build()?;
        self.document = Some(document);
        Ok(())
    }

    fn draw_heading(&mut self, heading: &HeadingSpec) -> Result<(), ResumeError> {
        let mut style = Style::new().with_font_size(heading.font_size());
        if let Some(ink) = heading.color() {
            style.set_color(color(ink));
        }
        let paragraph = Paragraph::new(heading.text()).aligned(alignment(heading.alignment()));
        self.document()?.push(paragraph.styled(style));
        Ok(())
    }

    fn begin_table(&mut self, table: &TableSpec) -> Result<(), ResumeError> {
        if self.table.is_some() {
            return Err(sequence_error("table already started"));
        }
        if table.column_weights.len() != 2 || table.column_weights.contains(&0) {
            return Err(sequence_error("the resume table needs two non-zero column weights"));
        }
        self.document()?;
        self.table = Some(OpenTable {
            spec: table.clone(),
            layout: LinearLayout::vertical(),
        });
        Ok(())
    }

    fn add_row(&mut self, row: &RowRecord) -> Result<(), ResumeError> {
        let table = self
            .table
            .as_mut()
            .ok_or_else(|| sequence_error("row added outside of a table"))?;
        let line_spacing = table.spec.line_spacing;

        let columns: usize = row.cells().iter().map(|cell| cell.column_span().columns()).sum();
        if columns != table.spec.column_weights.len() {
            return Err(sequence_error("row cells do not cover the table columns"));
        }

        match row.cells() {
            [cell] => table.layout.push(cell_element(cell, line_spacing)?),
            cells => {
                let mut grid = TableLayout::new(table.spec.column_weights.clone());
                let mut grid_row = grid.row();
                for cell in cells {
                    grid_row.push_element(cell_element(cell, line_spacing)?);
                }
                grid_row.push()?;
                table.layout.push(grid);
            }
        }
        Ok(())
    }

    fn end_table(&mut self) -> Result<(), ResumeError> {
        let table = self
            .table
            .take()
            .ok_or_else(|| sequence_error("no table to end"))?;
        self.document()?.push(table.layout);
        Ok(())
    }

    fn finalize(self) -> Result<RenderedPdf, ResumeError> {
        if self.table.is_some() {
            return Err(sequence_error("table was not ended"));
        }
        let document = self
            .document
            .ok_or_else(|| sequence_error("document has not been started"))?;

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(RenderedPdf { bytes })
    }
}

fn sequence_error(message: &str) -> ResumeError {
    ResumeError::Render(Error::new(
        format!("Invalid drawing sequence: {message}"),
        ErrorKind::InvalidData,
    ))
}

fn alignment(alignment: HorizontalAlignment) -> Alignment {
    match alignment {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

fn color(ink: Ink) -> Color {
    match ink {
        Ink::Rgb(r, g, b) => Color::Rgb(r, g, b),
        Ink::Gray(level) => Color::Greyscale(level),
    }
}

/// Replaces tabs with non-breaking spaces.
fn expand_tabs(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    for ch in line.chars() {
        if ch == '\t' {
            expanded.extend(std::iter::repeat(NO_BREAK_SPACE).take(TAB_WIDTH));
        } else {
            expanded.push(ch);
        }
    }
    expanded
}

fn markup_paragraph(line: &str, cell_alignment: HorizontalAlignment) -> Result<Paragraph, Error> {
    let spans = parse_markup(line).map_err(|err| {
        Error::new(
            format!("Invalid markup in cell text {:?}: {}", line, err),
            ErrorKind::InvalidData,
        )
    })?;

    let mut paragraph = Paragraph::default();
    for span in &spans {
        paragraph.push(span.to_styled_string(Style::new()));
    }
    paragraph.set_alignment(alignment(cell_alignment));
    Ok(paragraph)
}

/// One paragraph per line of the cell, styled and padded as a unit.
fn cell_element(cell: &CellSpec, line_spacing: f64) -> Result<impl Element, Error> {
    let mut lines = LinearLayout::vertical();
    if !cell.text().is_empty() {
        for line in cell.text().split('\n') {
            if line.is_empty() {
                lines.push(Break::new(1));
            } else {
                lines.push(markup_paragraph(&expand_tabs(line), cell.alignment())?);
            }
        }
    }

    let mut style = Style::new().with_line_spacing(line_spacing);
    if cell.is_bold() {
        style.set_bold();
    }
    if let Some(ink) = cell.color() {
        style.set_color(color(ink));
    }

    let zero = Mm::default();
    let padding = Margins::trbl(zero, zero, mm_from_f64(cell.bottom_padding()), zero);
    Ok(lines.styled(style).padded(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResumeDocument;
    use crate::rows::RowModelBuilder;

    #[derive(Debug, PartialEq)]
    enum Call {
        Begin,
        Heading(String),
        BeginTable,
        Row(usize),
        EndTable,
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
    }

    impl DocumentSink for RecordingSink {
        type Output = Vec<Call>;

        fn begin_document(&mut self, _page: &PageSetup) -> Result<(), ResumeError> {
            self.calls.push(Call::Begin);
            Ok(())
        }

        fn draw_heading(&mut self, heading: &HeadingSpec) -> Result<(), ResumeError> {
            self.calls.push(Call::Heading(heading.text().to_owned()));
            Ok(())
        }

        fn begin_table(&mut self, _table: &TableSpec) -> Result<(), ResumeError> {
            self.calls.push(Call::BeginTable);
            Ok(())
        }

        fn add_row(&mut self, row: &RowRecord) -> Result<(), ResumeError> {
            self.calls.push(Call::Row(row.cells().len()));
            Ok(())
        }

        fn end_table(&mut self) -> Result<(), ResumeError> {
            self.calls.push(Call::EndTable);
            Ok(())
        }

        fn finalize(self) -> Result<Vec<Call>, ResumeError> {
            Ok(self.calls)
        }
    }

    #[test]
    fn render_layout_draws_headings_then_one_table() {
        let document = ResumeDocument::from_yaml_str(
            r#"
name: Jane Doe
heading: Engineer
sections:
  experiences:
    - {company: Acme, title: SWE, start_date: 2020, end_date: 2022, highlights: [Built X]}
  skills:
    - {title: Languages, content: Rust}
"#,
        )
        .expect("parse succeeds");
        let layout = RowModelBuilder::new().build(&document).expect("rows build");

        let calls = render_layout(
            RecordingSink::default(),
            &PageSetup::default(),
            &TableSpec::default(),
            &layout,
        )
        .expect("render succeeds");

        assert_eq!(
            calls,
            vec![
                Call::Begin,
                Call::Heading("Jane Doe".to_owned()),
                Call::Heading("Engineer".to_owned()),
                Call::BeginTable,
                Call::Row(1),
                Call::Row(2),
                Call::Row(1),
                Call::Row(1),
                Call::Row(1),
                Call::EndTable,
            ]
        );
    }

    #[test]
    fn block_scalar_fields_render_as_single_lines() {
        let document = ResumeDocument::from_yaml_str(
            r#"
name: |
  Jane Doe
heading: Engineer
sections:
  experiences:
    - company: >
        Acme
        Robotics
      title: SWE
      start_date: 2020
      end_date: |
        2022
      highlights:
        - |
          Built X
          across two lines
        - Shipped Y
  education:
    - institution: >
        MIT
      degree: BSc
  skills:
    - title: >-
        Lang
      content: |
        Rust
"#,
        )
        .expect("parse succeeds");
        let layout = RowModelBuilder::new().build(&document).expect("rows build");

        assert_eq!(layout.headings.name.text(), "Jane Doe");
        assert_eq!(layout.rows[1].cells()[0].text(), "**Acme Robotics** – SWE");
        assert_eq!(layout.rows[1].cells()[1].text(), "2020 – 2022");
        assert_eq!(
            layout.rows[2].cells()[0].text(),
            "•\t\tBuilt X across two lines\n•\t\tShipped Y"
        );
        for row in &layout.rows {
            for cell in row.cells() {
                if let Err(err) = cell_element(cell, 1.0) {
                    panic!("{:?} failed to render: {}", cell.text(), err);
                }
            }
        }

        let calls = render_layout(
            RecordingSink::default(),
            &PageSetup::default(),
            &TableSpec::default(),
            &layout,
        )
        .expect("render succeeds");
        assert_eq!(calls.len(), layout.rows.len() + 5);
        assert_eq!(calls.last(), Some(&Call::EndTable));
    }

    #[test]
    fn multi_line_cells_keep_every_line() {
        let document = ResumeDocument::from_yaml_str(
            "name: A\nheading: B\nsections:\n  experiences:\n    - {company: C, title: D, \
             start_date: 1, end_date: 2, highlights: [one, two, three]}\n",
        )
        .expect("parse succeeds");
        let layout = RowModelBuilder::new().build(&document).expect("rows build");
        let highlights = &layout.rows[2].cells()[0];

        assert_eq!(highlights.text().lines().count(), 3);
        assert!(cell_element(highlights, 1.0).is_ok());
    }

    #[test]
    fn tabs_become_non_breaking_spaces() {
        assert_eq!(expand_tabs("•\t\tBuilt X"), "•\u{a0}\u{a0}\u{a0}\u{a0}Built X");
    }

    #[test]
    fn invalid_markup_is_a_render_error() {
        let err = markup_paragraph("**open", HorizontalAlignment::Left).unwrap_err();
        assert!(err.to_string().contains("unterminated bold"));
    }

    #[test]
    fn rows_require_an_open_table() {
        let mut sink = GenpdfSink::new(DocumentBuilder::new());
        let document = ResumeDocument::from_yaml_str("name: A\nheading: B\nsections: [Skills]\n")
            .expect("parse succeeds");
        let layout = RowModelBuilder::new().build(&document).expect("rows build");

        let err = sink.add_row(&layout.rows[0]).unwrap_err();
        let ResumeError::Render(cause) = err else {
            panic!("expected a render error, got {err:?}");
        };
        assert!(cause.to_string().contains("outside of a table"));
    }
}
