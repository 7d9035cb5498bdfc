// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::test_utils::{
    init_renderer, rejecting_backend, square_svg, unrasterizable_svg, SIMPLE_FLOWCHART,
};
use super::{
    initialize, is_initialized, strip_code_fences, DiagramRenderer, RenderError, RenderOutcome,
    RenderSettings, RenderedDiagram,
};
use rstest::rstest;

#[test]
fn repeated_initialize_is_a_noop() {
    init_renderer();
    assert!(is_initialized());
    assert!(!initialize(RenderSettings::default()));
    assert!(!initialize(RenderSettings { background: [0, 0, 0], load_system_fonts: false }));
}

#[test]
fn renders_flowchart_source() {
    init_renderer();
    let mut renderer = DiagramRenderer::new();

    let outcome = renderer.render_all(SIMPLE_FLOWCHART).expect("render");
    assert_eq!(outcome, RenderOutcome::Rendered);

    let rendered = renderer.rendered().expect("rendered diagram");
    assert_eq!(rendered.source(), SIMPLE_FLOWCHART);
    assert!(rendered.svg().contains("<svg"));
    let (width, height) = rendered.size();
    assert!(width > 0 && height > 0);
    assert!(renderer.last_error().is_none());
}

#[test]
fn second_render_of_same_source_is_unchanged() {
    init_renderer();
    let mut renderer = DiagramRenderer::new();

    renderer.render_all(SIMPLE_FLOWCHART).expect("first render");
    let first_svg = renderer.rendered().expect("rendered").svg().to_owned();

    let outcome = renderer.render_all(SIMPLE_FLOWCHART).expect("second render");
    assert_eq!(outcome, RenderOutcome::Unchanged);
    assert_eq!(renderer.rendered().expect("still rendered").svg(), first_svg);
}

#[test]
fn empty_source_clears_output() {
    init_renderer();
    let mut renderer = DiagramRenderer::new();
    renderer.render_all(SIMPLE_FLOWCHART).expect("render");

    assert_eq!(renderer.render_all("").expect("clear"), RenderOutcome::Cleared);
    assert!(renderer.rendered().is_none());
    assert_eq!(renderer.render_all("").expect("clear again"), RenderOutcome::Unchanged);
}

#[test]
fn reset_forces_a_fresh_render() {
    init_renderer();
    let mut renderer = DiagramRenderer::new();
    renderer.render_all(SIMPLE_FLOWCHART).expect("render");

    renderer.reset();
    assert!(renderer.rendered().is_none());
    assert_eq!(renderer.render_all(SIMPLE_FLOWCHART).expect("render"), RenderOutcome::Rendered);
}

#[test]
fn fenced_source_renders_and_keeps_original_text() {
    init_renderer();
    let mut renderer = DiagramRenderer::new();
    let fenced = format!("```mermaid\n{SIMPLE_FLOWCHART}```");

    renderer.render_all(&fenced).expect("render fenced");
    assert_eq!(renderer.rendered().expect("rendered").source(), fenced);
}

#[rstest]
#[case::mermaid_fence("```mermaid\ngraph TD;\nA-->B\n```", "graph TD;\nA-->B")]
#[case::bare_fence("```\ngraph LR;\n```\n", "graph LR;")]
#[case::no_fence("  graph TD; A-->B;  ", "graph TD; A-->B;")]
fn code_fences_are_stripped(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(strip_code_fences(input), expected);
}

#[test]
fn rendered_diagram_from_svg_uses_intrinsic_size() {
    init_renderer();
    let rendered = RenderedDiagram::from_svg("graph TD;", square_svg(12, 7)).expect("from svg");
    assert_eq!(rendered.size(), (12, 7));
    assert_eq!(rendered.rasterize().expect("rasterize").width(), 12);
}

#[test]
fn rendered_diagram_rejects_broken_svg() {
    init_renderer();
    assert!(RenderedDiagram::from_svg("graph TD;", "<svg").is_err());
}

#[test]
fn uninitialized_renderer_records_the_error() {
    let mut renderer = DiagramRenderer::new();

    let err = renderer.render_in(Err(RenderError::NotInitialized), SIMPLE_FLOWCHART).unwrap_err();

    assert_eq!(err, RenderError::NotInitialized);
    assert_eq!(renderer.last_error(), Some(&RenderError::NotInitialized));
    assert!(renderer.rendered().is_none());
}

#[test]
fn failed_render_records_error_and_keeps_no_output() {
    init_renderer();

    let mut rejecting = DiagramRenderer::with_backend(rejecting_backend);
    rejecting.render_all(SIMPLE_FLOWCHART).unwrap_err();
    assert!(matches!(rejecting.last_error(), Some(RenderError::Diagram(_))));

    let mut broken = DiagramRenderer::with_backend(unrasterizable_svg);
    broken.render_all(SIMPLE_FLOWCHART).unwrap_err();
    assert!(matches!(broken.last_error(), Some(RenderError::Raster(_))));
    assert!(broken.rendered().is_none());
    assert_eq!(
        broken.render_all(SIMPLE_FLOWCHART).expect("same source"),
        RenderOutcome::Unchanged
    );
}
