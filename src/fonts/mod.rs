//! Font discovery and loading.
//!
//! `genpdf` needs font files for text metrics, so a family is always loaded from disk. The lookup
//! order is: an explicitly configured directory, `RESUME_PDF_FONTS_DIR`, `assets/fonts` next to the
//! executable, `assets/fonts` in the crate manifest directory. When none of those holds the
//! requested family, system fonts are tried (Arial on Windows, Liberation Sans on Linux).

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Family loaded when none is configured.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable naming a directory with font files.
pub const FONTS_DIR_ENV: &str = "RESUME_PDF_FONTS_DIR";

/// Environment variable overriding the Windows fonts directory used for the Arial fallback.
pub const WINDOWS_FONTS_DIR_ENV: &str = "RESUME_PDF_WINDOWS_FONTS_DIR";

const LIBERATION_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
];

/// File names of the two faces a family needs. Resume text is never italic, so the italic slots
/// of the loaded family reuse the upright faces.
struct FontFiles {
    regular: String,
    bold: String,
}

impl FontFiles {
    /// `{family}-Regular.ttf` and `{family}-Bold.ttf`.
    fn for_family(family: &str) -> Self {
        Self {
            regular: format!("{family}-Regular.ttf"),
            bold: format!("{family}-Bold.ttf"),
        }
    }

    fn arial() -> Self {
        Self {
            regular: "arial.ttf".to_owned(),
            bold: "arialbd.ttf".to_owned(),
        }
    }

    fn required(&self) -> [&str; 2] {
        [&self.regular, &self.bold]
    }
}

/// Returns the `assets/fonts` directory of the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(path) = configured {
        push(path.to_path_buf());
    }
    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push(path);
    }
    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }
    push(bundled_fonts_source_dir());

    candidates
}

fn missing_font_files(directory: &Path, files: &FontFiles) -> Vec<PathBuf> {
    files
        .required()
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory(configured: Option<&Path>, family: &str) -> Result<PathBuf, Error> {
    let files = FontFiles::for_family(family);
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(configured) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate, &files);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the '{}' font family. Checked: {}. Pass --fonts-dir or set {}; \
             see assets/fonts/README.md.",
            family,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_font(directory: &Path, file: &str, face: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!("Failed to load {} font at {}: {}", face, path.display(), err),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_family_from(directory: &Path, files: &FontFiles) -> Result<FontFamily<FontData>, Error> {
    let regular = load_font(directory, &files.regular, "regular")?;
    let bold = load_font(directory, &files.bold, "bold")?;

    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn liberation_font_directory() -> Option<PathBuf> {
    LIBERATION_DIRECTORIES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_dir())
}

/// System families tried when the requested family is unavailable, in order.
fn system_fallbacks() -> Vec<(&'static str, PathBuf, FontFiles)> {
    let mut fallbacks = Vec::new();
    if let Some(directory) = windows_font_directory() {
        fallbacks.push(("Arial", directory, FontFiles::arial()));
    }
    if let Some(directory) = liberation_font_directory() {
        fallbacks.push((
            "LiberationSans",
            directory,
            FontFiles::for_family("LiberationSans"),
        ));
    }
    fallbacks
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Loads `family` from the first directory that holds it, falling back to system fonts when the
/// family cannot be found anywhere.
pub fn load_font_family(
    configured: Option<&Path>,
    family: &str,
) -> Result<FontFamily<FontData>, Error> {
    let requested = resolve_font_directory(configured, family).and_then(|directory| {
        debug!("loading font family '{}' from {}", family, directory.display());
        load_family_from(&directory, &FontFiles::for_family(family))
    });
    let err = match requested {
        Ok(loaded) => return Ok(loaded),
        Err(err) if fonts_missing(&err) => err,
        Err(err) => return Err(err),
    };

    for (name, directory, files) in system_fallbacks() {
        match load_family_from(&directory, &files) {
            Ok(loaded) => {
                warn!(
                    "Font family '{}' unavailable ({}); falling back to system '{}' family.",
                    family, err, name
                );
                return Ok(loaded);
            }
            Err(fallback_err) => {
                warn!("System '{}' font fallback failed: {}", name, fallback_err);
            }
        }
    }

    Err(Error::new(
        format!("Font family '{}' unavailable and no system fallback loaded: {}", family, err),
        io::Error::new(io::ErrorKind::NotFound, "no usable fonts"),
    ))
}

/// Indicates whether [`load_font_family`] can find font files for `family`.
pub fn fonts_available(configured: Option<&Path>, family: &str) -> bool {
    resolve_font_directory(configured, family).is_ok()
        || system_fallbacks()
            .iter()
            .any(|(_, directory, files)| missing_font_files(directory, files).is_empty())
}
