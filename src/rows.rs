//! Turns a [`ResumeDocument`] into the ordered table rows the renderer draws.
//!
//! Everything here is a pure function of the document and the [`RowOptions`]; no fonts, files or
//! PDF state are touched. A row has either one cell spanning both table columns or two cells of one
//! column each, and the constructors on [`RowRecord`] are the only way to build one.

use crate::error::ResumeError;
use crate::model::{Education, Experience, ResumeDocument, Section, Sections, Skill};
use crate::richtext::escape_markup;

/// Separator placed between two adjacent fields.
pub const FIELD_SEPARATOR: &str = " – ";

/// Prefix of every highlight line.
pub const BULLET_PREFIX: &str = "•\t\t";

/// Navy accent used for the name and section headers.
pub const ACCENT_NAVY: Ink = Ink::Rgb(0, 0, 128);

/// Horizontal placement of text inside a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Text color of a cell or heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ink {
    Rgb(u8, u8, u8),
    Gray(u8),
}

/// Number of table columns a cell covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnSpan {
    One,
    Both,
}

impl ColumnSpan {
    /// The span as a column count.
    pub fn columns(self) -> usize {
        match self {
            ColumnSpan::One => 1,
            ColumnSpan::Both => 2,
        }
    }
}

/// A single table cell ready for rendering.
///
/// The text may contain [`crate::richtext`] markup. `bold` emphasizes the whole cell, independent
/// of any inline markup.
#[derive(Clone, Debug, PartialEq)]
pub struct CellSpec {
    text: String,
    alignment: HorizontalAlignment,
    span: ColumnSpan,
    bottom_padding: f64,
    color: Option<Ink>,
    bold: bool,
}

impl CellSpec {
    fn new(text: impl Into<String>, span: ColumnSpan) -> Self {
        Self {
            text: text.into(),
            alignment: HorizontalAlignment::Left,
            span,
            bottom_padding: 0.0,
            color: None,
            bold: false,
        }
    }

    /// Returns the cell text, including any inline markup.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the horizontal placement of the text.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns how many table columns the cell covers.
    pub fn column_span(&self) -> ColumnSpan {
        self.span
    }

    /// Space left below the cell, in millimetres.
    pub fn bottom_padding(&self) -> f64 {
        self.bottom_padding
    }

    /// Text color; `None` means the default ink.
    pub fn color(&self) -> Option<Ink> {
        self.color
    }

    /// Returns whether the whole cell should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn with_bottom_padding(mut self, padding: f64) -> Self {
        self.bottom_padding = padding.max(0.0);
        self
    }

    fn with_color(mut self, color: Option<Ink>) -> Self {
        self.color = color;
        self
    }

    fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// One table row: a single full-width cell or a pair of single-column cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RowRecord {
    cells: Vec<CellSpec>,
}

impl RowRecord {
    fn full_width(cell: CellSpec) -> Self {
        debug_assert_eq!(cell.span, ColumnSpan::Both);
        Self { cells: vec![cell] }
    }

    fn split(left: CellSpec, right: CellSpec) -> Self {
        debug_assert_eq!(left.span, ColumnSpan::One);
        debug_assert_eq!(right.span, ColumnSpan::One);
        Self {
            cells: vec![left, right],
        }
    }

    /// Returns the cells from left to right.
    pub fn cells(&self) -> &[CellSpec] {
        &self.cells
    }

    /// Whether the row consists of one cell covering both columns.
    pub fn is_full_width(&self) -> bool {
        self.cells.len() == 1
    }

    /// Largest bottom padding of the row's cells.
    pub fn bottom_padding(&self) -> f64 {
        self.cells
            .iter()
            .map(CellSpec::bottom_padding)
            .fold(0.0, f64::max)
    }
}

/// A heading line drawn above the table.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingSpec {
    text: String,
    font_size: u8,
    alignment: HorizontalAlignment,
    color: Option<Ink>,
}

impl HeadingSpec {
    /// Returns the heading text. Headings carry no markup.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Returns the horizontal placement of the heading.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the heading color; `None` means the default ink.
    pub fn color(&self) -> Option<Ink> {
        self.color
    }
}

/// The two heading entries, name first.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingRows {
    pub name: HeadingSpec,
    pub title: HeadingSpec,
}

impl HeadingRows {
    /// The headings in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &HeadingSpec> {
        [&self.name, &self.title].into_iter()
    }
}

/// Everything the renderer needs for one resume.
#[derive(Clone, Debug, PartialEq)]
pub struct ResumeLayout {
    pub headings: HeadingRows,
    pub rows: Vec<RowRecord>,
}

/// Formatting switches for [`RowModelBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct RowOptions {
    /// Color of the name heading and section headers; `None` keeps them in the default ink.
    pub accent: Option<Ink>,
    /// Wrap labels (company, institution, skill title) in `**bold**` markup.
    pub bold_labels: bool,
    /// Bottom padding that separates entries, in millimetres.
    pub entry_padding: f64,
    pub name_font_size: u8,
    pub heading_font_size: u8,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            accent: Some(ACCENT_NAVY),
            bold_labels: true,
            entry_padding: 3.0,
            name_font_size: 24,
            heading_font_size: 12,
        }
    }
}

/// Builds the row model of a resume.
#[derive(Clone, Debug, Default)]
pub struct RowModelBuilder {
    options: RowOptions,
}

impl RowModelBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RowOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RowOptions {
        &self.options
    }

    /// Builds the headings and every section row of `document`.
    pub fn build(&self, document: &ResumeDocument) -> Result<ResumeLayout, ResumeError> {
        let headings = self.build_heading_rows(document)?;
        let rows = match &document.sections {
            Some(sections) => self.build_section_rows(sections)?,
            None => Vec::new(),
        };
        log::debug!("built {} rows for '{}'", rows.len(), headings.name.text);
        Ok(ResumeLayout { headings, rows })
    }

    /// Name and title headings, both centered.
    pub fn build_heading_rows(
        &self,
        document: &ResumeDocument,
    ) -> Result<HeadingRows, ResumeError> {
        let name = required(&document.name, "name")?;
        let title = required(&document.heading, "heading")?;

        Ok(HeadingRows {
            name: HeadingSpec {
                text: single_line(name),
                font_size: self.options.name_font_size,
                alignment: HorizontalAlignment::Center,
                color: self.options.accent,
            },
            title: HeadingSpec {
                text: single_line(title),
                font_size: self.options.heading_font_size,
                alignment: HorizontalAlignment::Center,
                color: None,
            },
        })
    }

    /// Header rows and content rows for every section, in document order.
    pub fn build_section_rows(&self, sections: &Sections) -> Result<Vec<RowRecord>, ResumeError> {
        let sections = match sections {
            Sections::Names(names) => return Ok(self.build_simple_section_rows(names)),
            Sections::Structured(sections) => sections,
        };

        let mut rows = Vec::new();
        for section in sections {
            match section {
                Section::Experiences(experiences) => {
                    rows.push(self.build_section_header_row("Professional Experiences"));
                    for (index, experience) in experiences.iter().enumerate() {
                        let path = format!("sections.experiences[{index}]");
                        rows.extend(self.build_experience_rows(experience, &path)?);
                    }
                }
                Section::Education(education) => {
                    rows.push(self.build_section_header_row("Education"));
                    rows.extend(self.build_education_rows(education)?);
                }
                Section::Skills(skills) => {
                    rows.push(self.build_section_header_row("Skills"));
                    rows.extend(self.build_skill_rows(skills)?);
                }
            }
        }
        Ok(rows)
    }

    /// A bold, uppercased, full-width label in the accent color.
    pub fn build_section_header_row(&self, section_name: &str) -> RowRecord {
        RowRecord::full_width(
            CellSpec::new(self.plain(&section_name.to_uppercase()), ColumnSpan::Both)
                .with_bold(true)
                .with_color(self.options.accent),
        )
    }

    /// A summary row (company and title, date range) followed by a highlights row.
    ///
    /// `path` locates the entry in the document for error messages, e.g.
    /// `sections.experiences[0]`.
    pub fn build_experience_rows(
        &self,
        experience: &Experience,
        path: &str,
    ) -> Result<[RowRecord; 2], ResumeError> {
        let company = required(&experience.company, &format!("{path}.company"))?;
        let title = required(&experience.title, &format!("{path}.title"))?;
        let start = required(&experience.start_date, &format!("{path}.start_date"))?;
        let end = required(&experience.end_date, &format!("{path}.end_date"))?;

        let summary = RowRecord::split(
            CellSpec::new(self.labelled(company, title), ColumnSpan::One),
            CellSpec::new(
                format!("{}{FIELD_SEPARATOR}{}", self.plain(start), self.plain(end)),
                ColumnSpan::One,
            )
            .with_alignment(HorizontalAlignment::Right),
        );

        let highlights = experience
            .highlights
            .iter()
            .map(|highlight| format!("{BULLET_PREFIX}{}", self.plain(highlight)))
            .collect::<Vec<_>>()
            .join("\n");
        let highlights = RowRecord::full_width(
            CellSpec::new(highlights, ColumnSpan::Both)
                .with_bottom_padding(self.options.entry_padding),
        );

        Ok([summary, highlights])
    }

    /// One row per entry; only the last entry is padded, separating it from the next section.
    pub fn build_education_rows(
        &self,
        education_list: &[Education],
    ) -> Result<Vec<RowRecord>, ResumeError> {
        let last = education_list.len().saturating_sub(1);
        education_list
            .iter()
            .enumerate()
            .map(|(index, education)| {
                let path = format!("sections.education[{index}]");
                let institution = required(&education.institution, &format!("{path}.institution"))?;
                let degree = required(&education.degree, &format!("{path}.degree"))?;
                let padding = if index == last {
                    self.options.entry_padding
                } else {
                    0.0
                };
                Ok(RowRecord::full_width(
                    CellSpec::new(self.labelled(institution, degree), ColumnSpan::Both)
                        .with_bottom_padding(padding),
                ))
            })
            .collect()
    }

    /// One `**title**: content` row per skill.
    pub fn build_skill_rows(&self, skills_list: &[Skill]) -> Result<Vec<RowRecord>, ResumeError> {
        skills_list
            .iter()
            .enumerate()
            .map(|(index, skill)| {
                let path = format!("sections.skills[{index}]");
                let title = required(&skill.title, &format!("{path}.title"))?;
                let content = required(&skill.content, &format!("{path}.content"))?;
                let text = format!("{}: {}", self.emphasized(title), self.plain(content));
                Ok(RowRecord::full_width(CellSpec::new(text, ColumnSpan::Both)))
            })
            .collect()
    }

    /// Header rows for a document that lists section names without content.
    pub fn build_simple_section_rows(&self, section_names: &[String]) -> Vec<RowRecord> {
        section_names
            .iter()
            .map(|name| self.build_section_header_row(name))
            .collect()
    }

    /// `**{label}** – {detail}`
    fn labelled(&self, label: &str, detail: &str) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{}",
            self.emphasized(label),
            self.plain(detail)
        )
    }

    fn emphasized(&self, text: &str) -> String {
        if self.options.bold_labels {
            format!("**{}**", self.plain(text))
        } else {
            self.plain(text)
        }
    }

    fn plain(&self, text: &str) -> String {
        escape_markup(&single_line(text))
    }
}

/// Folds line breaks into single spaces and drops surrounding whitespace, so YAML block scalars
/// (`company: >`) stay on one line. Cell newlines are reserved for highlight bullets.
fn single_line(text: &str) -> String {
    text.split(&['\r', '\n'][..])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ResumeError> {
    value.as_deref().ok_or_else(|| ResumeError::missing(field))
}
