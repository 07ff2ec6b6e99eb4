use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use resume_pdf::config::DEFAULT_INPUT;
use resume_pdf::fonts::{DEFAULT_FONT_FAMILY_NAME, FONTS_DIR_ENV};
use resume_pdf::render::PaperFormat;
use resume_pdf::Config;

/// Renders a YAML resume to PDF.
///
/// With no arguments, reads `resume.yaml` from the working directory and writes `resume.pdf`
/// next to it.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Resume file to read.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output PDF path. Defaults to the input path with a `.pdf` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory containing `<FAMILY>-Regular.ttf` and `<FAMILY>-Bold.ttf`.
    #[arg(long, env = FONTS_DIR_ENV)]
    fonts_dir: Option<PathBuf>,

    /// Font family file prefix.
    #[arg(long, default_value = DEFAULT_FONT_FAMILY_NAME)]
    font_family: String,

    /// Paper format.
    #[arg(long, value_enum, default_value_t = Paper::A4)]
    paper: Paper,

    /// Render the name and section headers in the default ink.
    #[arg(long)]
    no_color: bool,

    /// Do not bold company, institution and skill labels.
    #[arg(long)]
    plain: bool,

    /// Space below each entry, in millimetres.
    #[arg(long, value_name = "MM")]
    padding: Option<f64>,

    /// Log each step.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Paper {
    A4,
    Letter,
    Legal,
}

impl From<Paper> for PaperFormat {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::A4 => PaperFormat::A4,
            Paper::Letter => PaperFormat::Letter,
            Paper::Legal => PaperFormat::Legal,
        }
    }
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.input);
        config.output = self.output;
        config.fonts_dir = self.fonts_dir;
        config.font_family = self.font_family;
        config.page.paper = self.paper.into();
        if self.no_color {
            config.rows.accent = None;
        }
        config.rows.bold_labels = !self.plain;
        if let Some(padding) = self.padding {
            config.rows.entry_padding = padding;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "resume_pdf=debug"
    } else {
        "resume_pdf=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match resume_pdf::generate(&cli.into_config()) {
        Ok(path) => println!("Generated {}", path.display()),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
