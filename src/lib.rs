//! Render a YAML-described resume to PDF.
//!
//! The flow is [`model`] (load the YAML) -> [`rows`] (build the styled table rows) ->
//! [`render`] (draw them with `genpdf`) -> [`pipeline`] (write the file).

pub mod builder;
pub mod config;
pub mod error;
pub mod fonts;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod richtext;
pub mod rows;

pub use config::Config;
pub use error::ResumeError;
pub use model::ResumeDocument;
pub use pipeline::{generate, render_resume};
pub use rows::{ResumeLayout, RowModelBuilder, RowOptions};
