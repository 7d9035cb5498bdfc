// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal preview of a rasterized diagram.
//!
//! Each cell shows two vertically stacked pixels using `▀` (foreground = upper pixel,
//! background = lower pixel), so the preview keeps roughly square pixels.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::raster::Raster;

const UPPER_HALF_BLOCK: &str = "▀";

/// Downsamples `raster` to fit `cols` x `rows` cells, preserving aspect ratio.
pub fn preview_lines(raster: &Raster, cols: u16, rows: u16) -> Vec<Line<'static>> {
    if cols == 0 || rows == 0 || raster.width() == 0 || raster.height() == 0 {
        return Vec::new();
    }

    let px_cols = f64::from(cols);
    let px_rows = f64::from(rows) * 2.0;
    let scale = (f64::from(raster.width()) / px_cols).max(f64::from(raster.height()) / px_rows);

    let out_w = ((f64::from(raster.width()) / scale).ceil() as u32).clamp(1, u32::from(cols));
    let out_h = ((f64::from(raster.height()) / scale).ceil() as u32).clamp(1, u32::from(rows) * 2);

    let mut lines = Vec::with_capacity(out_h.div_ceil(2) as usize);
    for cell_y in 0..out_h.div_ceil(2) {
        let mut spans = Vec::with_capacity(out_w as usize);
        for x in 0..out_w {
            let top = average_block(raster, x, cell_y * 2, scale);
            let bottom = if cell_y * 2 + 1 < out_h {
                average_block(raster, x, cell_y * 2 + 1, scale)
            } else {
                Color::Reset
            };
            spans.push(Span::styled(UPPER_HALF_BLOCK, Style::default().fg(top).bg(bottom)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn average_block(raster: &Raster, out_x: u32, out_y: u32, scale: f64) -> Color {
    let x0 = ((f64::from(out_x) * scale).floor() as u32).min(raster.width() - 1);
    let y0 = ((f64::from(out_y) * scale).floor() as u32).min(raster.height() - 1);
    let x1 = ((f64::from(out_x + 1) * scale).ceil() as u32).clamp(x0 + 1, raster.width());
    let y1 = ((f64::from(out_y + 1) * scale).ceil() as u32).clamp(y0 + 1, raster.height());

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some([r, g, b, _]) = raster.pixel(x, y) {
                sum[0] += u64::from(r);
                sum[1] += u64::from(g);
                sum[2] += u64::from(b);
                count += 1;
            }
        }
    }
    if count == 0 {
        return Color::Reset;
    }
    Color::Rgb((sum[0] / count) as u8, (sum[1] / count) as u8, (sum[2] / count) as u8)
}
