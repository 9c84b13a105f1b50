//! Invoice generation: payload model, validation, template layout, rendering
//! and the HTTP endpoint that ties them together.
//!
//! - `models` - request payload and item rows
//! - `validation` - parallel item list checks
//! - `layout` - fixed coordinate table of the template
//! - `render` - glyph rasterization onto the template canvas
//! - `pdf` - single page PDF export
//! - `engine` - `Generator` implementation used by the server
//! - `counter` - sequential filename counter persisted in a text file
//! - `handlers` - actix-web endpoint

pub mod counter;
pub mod engine;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod render;
pub mod traits;
pub mod validation;

pub use counter::{CounterError, InvoiceCounter};
pub use engine::InvoiceRenderEngine;
pub use models::{InvoiceData, InvoiceItem};
pub use traits::{Generator, Validator};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to load invoice template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a usable TrueType font")]
    FontParse(PathBuf),
    #[error("no usable font found, tried: {0}")]
    NoFont(String),
    #[error("failed to encode page image: {0}")]
    Jpeg(#[source] image::ImageError),
    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

/// Result of a successful document generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub pdf: Vec<u8>,
    /// Page size in points, equal to the template size in pixels.
    pub width: u32,
    pub height: u32,
}
