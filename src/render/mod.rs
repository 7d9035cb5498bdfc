// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram rendering.
//!
//! Wraps `mermaid-rs-renderer`: [`initialize`] performs the process-wide setup once, and
//! [`DiagramRenderer::render_all`] turns the current diagram source into SVG plus a raster used
//! by the terminal preview.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use resvg::usvg::fontdb;

pub mod preview;
pub mod raster;

pub use raster::{rasterize_svg, Raster, RasterError};

const WHITE: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Background painted under the diagram for preview and export.
    pub background: [u8; 3],
    /// Load system fonts so `<text>` nodes rasterize. Without fonts labels are skipped.
    pub load_system_fonts: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { background: WHITE, load_system_fonts: true }
    }
}

struct RenderContext {
    settings: RenderSettings,
    fontdb: Arc<fontdb::Database>,
}

impl RenderContext {
    fn new(settings: RenderSettings) -> Self {
        let mut db = fontdb::Database::new();
        if settings.load_system_fonts {
            db.load_system_fonts();
        }
        tracing::debug!(faces = db.len(), "diagram renderer initialized");
        Self { settings, fontdb: Arc::new(db) }
    }
}

static RENDER_CONTEXT: OnceLock<RenderContext> = OnceLock::new();

/// Performs the one-time renderer setup.
///
/// Returns `true` when this call did the setup; later calls are no-ops returning `false` and
/// their settings are ignored.
pub fn initialize(settings: RenderSettings) -> bool {
    let mut performed = false;
    RENDER_CONTEXT.get_or_init(|| {
        performed = true;
        RenderContext::new(settings)
    });
    performed
}

pub fn is_initialized() -> bool {
    RENDER_CONTEXT.get().is_some()
}

fn context() -> Result<&'static RenderContext, RenderError> {
    RENDER_CONTEXT.get().ok_or(RenderError::NotInitialized)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("diagram renderer is not initialized")]
    NotInitialized,
    #[error("diagram source could not be rendered: {0}")]
    Diagram(String),
    #[error(transparent)]
    Raster(#[from] RasterError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// New source was rendered.
    Rendered,
    /// Source matches the last call; nothing was redone.
    Unchanged,
    /// Source is empty; the previous output was dropped.
    Cleared,
}

/// A diagram that rendered successfully.
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    source: String,
    svg: String,
    raster: Raster,
}

impl RenderedDiagram {
    /// Builds a rendered diagram from SVG produced elsewhere.
    pub fn from_svg(source: impl Into<String>, svg: impl Into<String>) -> Result<Self, RenderError> {
        Self::rasterized(context()?, source.into(), svg.into())
    }

    fn rasterized(context: &RenderContext, source: String, svg: String) -> Result<Self, RenderError> {
        let raster = rasterize_svg(&svg, context.settings.background, context.fontdb.clone())?;
        Ok(Self { source, svg, raster })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Intrinsic pixel size (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Rasterizes the SVG again with the renderer's background and fonts.
    pub fn rasterize(&self) -> Result<Raster, RenderError> {
        let context = context()?;
        Ok(rasterize_svg(&self.svg, context.settings.background, context.fontdb.clone())?)
    }
}

/// Turns fence-stripped diagram source into SVG.
pub type SvgBackend = fn(&str) -> Result<String, RenderError>;

/// Holds the output for the current diagram source.
#[derive(Debug)]
pub struct DiagramRenderer {
    backend: SvgBackend,
    last_source: Option<String>,
    rendered: Option<RenderedDiagram>,
    last_error: Option<RenderError>,
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::with_backend(mermaid_svg)
    }
}

impl DiagramRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer that produces SVG with `backend` instead of `mermaid-rs-renderer`.
    pub fn with_backend(backend: SvgBackend) -> Self {
        Self { backend, last_source: None, rendered: None, last_error: None }
    }

    /// Re-renders when `source` differs from the previous call.
    ///
    /// Must be called after the diagram source has been updated. A failed render drops the
    /// previous output and is not retried until the source changes.
    pub fn render_all(&mut self, source: &str) -> Result<RenderOutcome, RenderError> {
        self.render_in(context(), source)
    }

    fn render_in(
        &mut self,
        context: Result<&RenderContext, RenderError>,
        source: &str,
    ) -> Result<RenderOutcome, RenderError> {
        if self.last_source.as_deref() == Some(source) {
            return Ok(RenderOutcome::Unchanged);
        }
        let context = match context {
            Ok(context) => context,
            Err(err) => {
                tracing::warn!(error = %err, "diagram render skipped");
                self.rendered = None;
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        self.last_source = Some(source.to_owned());
        self.rendered = None;
        self.last_error = None;

        if source.trim().is_empty() {
            return Ok(RenderOutcome::Cleared);
        }

        match render_source(self.backend, context, source) {
            Ok(rendered) => {
                let (width, height) = rendered.size();
                tracing::debug!(width, height, svg_bytes = rendered.svg.len(), "diagram rendered");
                self.rendered = Some(rendered);
                Ok(RenderOutcome::Rendered)
            }
            Err(err) => {
                tracing::warn!(error = %err, "diagram render failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Forgets the last source so the next `render_all` starts from scratch.
    pub fn reset(&mut self) {
        self.last_source = None;
        self.rendered = None;
        self.last_error = None;
    }

    pub fn rendered(&self) -> Option<&RenderedDiagram> {
        self.rendered.as_ref()
    }

    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }
}

fn render_source(
    backend: SvgBackend,
    context: &RenderContext,
    source: &str,
) -> Result<RenderedDiagram, RenderError> {
    let svg = backend(&strip_code_fences(source))?;
    RenderedDiagram::rasterized(context, source.to_owned(), svg)
}

fn mermaid_svg(source: &str) -> Result<String, RenderError> {
    let options = mermaid_rs_renderer::RenderOptions {
        theme: mermaid_rs_renderer::Theme::modern(),
        layout: mermaid_rs_renderer::LayoutConfig::default(),
    };
    mermaid_rs_renderer::render_with_options(source, options)
        .map_err(|err| RenderError::Diagram(err.to_string()))
}

/// Removes Markdown code fence markers that models tend to wrap around Mermaid output.
pub fn strip_code_fences(source: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new("```(?:mermaid)?").expect("valid fence pattern"));
    fence.replace_all(source, "").trim().to_owned()
}

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
mod tests;
