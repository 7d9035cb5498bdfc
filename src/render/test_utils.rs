// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{initialize, mermaid_svg, RenderError, RenderSettings};

/// Two-node flowchart the renderer is known to accept.
pub(crate) const SIMPLE_FLOWCHART: &str = "flowchart TD\n    A[Start] --> B[End]\n";

/// Initializes the process-wide renderer without scanning system fonts.
///
/// Every test that renders goes through here so the first caller's settings are the same for all.
pub(crate) fn init_renderer() {
    initialize(RenderSettings { load_system_fonts: false, ..RenderSettings::default() });
}

pub(crate) fn square_svg(width: u32, height: u32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect x="1" y="1" width="2" height="2" fill="#336699"/></svg>"##
    )
}

/// SVG backend whose output cannot be rasterized.
pub(crate) fn unrasterizable_svg(_source: &str) -> Result<String, RenderError> {
    Ok("<svg".to_owned())
}

/// SVG backend that rejects every diagram.
pub(crate) fn rejecting_backend(source: &str) -> Result<String, RenderError> {
    Err(RenderError::Diagram(format!("unsupported diagram: {source}")))
}

/// Source containing this marker renders to unrasterizable SVG under [`marker_fails_backend`].
pub(crate) const BROKEN_MARKER: &str = "%% broken";

/// Renders through Mermaid unless the source carries [`BROKEN_MARKER`].
pub(crate) fn marker_fails_backend(source: &str) -> Result<String, RenderError> {
    if source.contains(BROKEN_MARKER) {
        return unrasterizable_svg(source);
    }
    mermaid_svg(source)
}
