// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! SVG rasterization shared by the preview and PNG export.

use std::borrow::Cow;
use std::sync::Arc;

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};

/// Upper bound for the pixel area of a rasterized diagram (128 MiB of RGBA).
pub const MAX_RASTER_PIXELS: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("invalid SVG: {0}")]
    Svg(String),
    #[error("SVG dimensions out of range: {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

/// Opaque RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wraps RGBA8 pixels. Returns `None` when the buffer does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
        (pixels.len() == expected).then_some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Rasterizes `svg` at its intrinsic size (rounded up) over an opaque `background`.
///
/// The background is filled before drawing, so every pixel has alpha 255 and the premultiplied
/// pixmap data equals straight RGBA.
pub fn rasterize_svg(
    svg: &str,
    background: [u8; 3],
    fontdb: Arc<fontdb::Database>,
) -> Result<Raster, RasterError> {
    let svg = normalize_font_family_quotes(svg);
    let options = usvg::Options { fontdb, ..Default::default() };
    let tree =
        usvg::Tree::from_str(&svg, &options).map_err(|err| RasterError::Svg(err.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    if width == 0 || height == 0 || u64::from(width) * u64::from(height) > MAX_RASTER_PIXELS {
        return Err(RasterError::Dimensions { width, height });
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Dimensions { width, height })?;
    let [r, g, b] = background;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    Ok(Raster { width, height, pixels: pixmap.take() })
}

/// Rewrites `font-family="Inter, "Segoe UI", sans-serif"` (invalid XML emitted by some
/// renderers) to use single quotes inside the attribute value.
fn normalize_font_family_quotes(svg: &str) -> Cow<'_, str> {
    const ATTR: &str = "font-family=\"";
    if !svg.contains(ATTR) {
        return Cow::Borrowed(svg);
    }

    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(start) = rest.find(ATTR) {
        let value_start = start + ATTR.len();
        out.push_str(&rest[..value_start]);
        let value = &rest[value_start..];
        let end = attribute_value_end(value).unwrap_or(value.len());
        out.push_str(&value[..end].replace('"', "'"));
        rest = &value[end..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Index of the quote that closes an attribute value: one followed by whitespace, `/`, `>` or
/// the end of input.
fn attribute_value_end(value: &str) -> Option<usize> {
    value.char_indices().find_map(|(idx, ch)| {
        if ch != '"' {
            return None;
        }
        match value[idx + 1..].chars().next() {
            None | Some('/' | '>') => Some(idx),
            Some(next) if next.is_whitespace() => Some(idx),
            Some(_) => None,
        }
    })
}
