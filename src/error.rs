//! Error type shared by every stage of resume generation.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while loading, building, or rendering a resume.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The input document does not exist.
    #[error("Input file not found: {}", path.display())]
    InputNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading the input or writing the output failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid YAML or does not match the resume schema.
    #[error("Failed to parse {}", path.display())]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A field required to build the resume is absent.
    #[error("Missing required field `{field}`")]
    MissingField {
        /// Dotted path of the missing field, e.g. `sections.education[1].degree`.
        field: String,
    },

    /// No usable font family could be loaded.
    #[error("Failed to load fonts")]
    FontLoad(#[source] genpdf::error::Error),

    /// The PDF layout library rejected the document.
    #[error("Rendering failed")]
    Render(#[from] genpdf::error::Error),
}

impl ResumeError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
