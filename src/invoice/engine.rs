//! Invoice rendering engine.
//!
//! Holds the decoded template and font for the lifetime of the server, and
//! turns a validated payload into a PDF.

use std::path::Path;

use image::RgbImage;
use rusttype::{Font, Scale};

use super::layout::layout;
use super::models::InvoiceData;
use super::pdf::encode_pdf;
use super::render::{draw_grid, draw_placements, load_font_with_fallback};
use super::traits::Generator;
use super::{GeneratedDocument, GeneratorError};
use crate::config::AppConfig;

pub struct InvoiceRenderEngine {
    template: RgbImage,
    font: Font<'static>,
    scale: Scale,
    debug_grid: bool,
}

impl InvoiceRenderEngine {
    pub fn new(template: RgbImage, font: Font<'static>, font_size: f32) -> Self {
        Self {
            template,
            font,
            scale: Scale::uniform(font_size),
            debug_grid: false,
        }
    }

    /// Overlay the calibration grid under the invoice text.
    pub fn with_debug_grid(mut self, enabled: bool) -> Self {
        self.debug_grid = enabled;
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GeneratorError> {
        let template = load_template(&config.template_path)?;
        let font = load_font_with_fallback(&config.font_path)?;
        log::info!(
            "Loaded invoice template {} ({}x{})",
            config.template_path.display(),
            template.width(),
            template.height()
        );
        Ok(Self::new(template, font, config.font_size).with_debug_grid(config.debug_grid))
    }

    /// Draw every field of `data` on a copy of the template.
    pub fn render(&self, data: &InvoiceData) -> RgbImage {
        let mut canvas = self.template.clone();
        if self.debug_grid {
            draw_grid(&mut canvas, &self.font, self.scale);
        }
        draw_placements(&mut canvas, &self.font, self.scale, &layout(data));
        canvas
    }
}

pub fn load_template(path: &Path) -> Result<RgbImage, GeneratorError> {
    let image = image::open(path).map_err(|source| GeneratorError::Template {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

impl Generator<InvoiceData> for InvoiceRenderEngine {
    fn generate(&self, request: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        let canvas = self.render(request);
        let pdf = encode_pdf(&canvas)?;
        Ok(GeneratedDocument {
            pdf,
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}
