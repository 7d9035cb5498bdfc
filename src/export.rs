// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! PNG export of the rendered diagram.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::render::{RenderError, RenderedDiagram};

/// File name every export is saved under.
pub const EXPORT_FILE_NAME: &str = "flowchart.png";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to rasterize diagram: {0}")]
    Raster(#[from] RenderError),
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("failed to save {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing has been rendered yet; no file was written.
    Unavailable,
    Saved(PathBuf),
}

/// Destination for exported files.
pub trait DownloadSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, replacing an existing file of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| ExportError::Io { path: self.dir.clone(), source })?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|source| ExportError::Io { path: path.clone(), source })?;
        Ok(path)
    }
}

/// Rasterizes the rendered diagram at its intrinsic size and saves it as `flowchart.png`.
///
/// With nothing rendered this is a no-op returning [`ExportOutcome::Unavailable`].
pub fn export_png(
    rendered: Option<&RenderedDiagram>,
    sink: &mut dyn DownloadSink,
) -> Result<ExportOutcome, ExportError> {
    let Some(rendered) = rendered else {
        tracing::debug!("export skipped: nothing rendered");
        return Ok(ExportOutcome::Unavailable);
    };

    let png = encode_png(rendered)?;
    let path = sink.save(EXPORT_FILE_NAME, &png)?;
    tracing::info!(path = %path.display(), bytes = png.len(), "diagram exported");
    Ok(ExportOutcome::Saved(path))
}

fn encode_png(rendered: &RenderedDiagram) -> Result<Vec<u8>, ExportError> {
    let raster = rendered.rasterize()?;
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(raster.pixels(), raster.width(), raster.height(), ExtendedColorType::Rgba8)
        .map_err(|err| ExportError::Encode(err.to_string()))?;
    Ok(png)
}
