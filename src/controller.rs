// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction state and the actions that change it.
//!
//! The controller never performs I/O on its own schedule: the UI asks it for a request
//! ([`ViewController::begin_submit`]), runs the request wherever it likes, and hands the outcome
//! back through [`ViewController::finish`].

use crate::api::{GenerateRequest, GenerationClient, GenerationError};
use crate::export::{export_png, DownloadSink, ExportError, ExportOutcome};
use crate::render::{DiagramRenderer, RenderError, RenderOutcome, RenderedDiagram};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Generating,
    /// Last request succeeded.
    Ready,
    /// Last request failed; the previous diagram source is still shown.
    Failed(GenerationError),
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewController {
    input: String,
    context: String,
    diagram_source: String,
    state: ViewState,
    renderer: DiagramRenderer,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(renderer: DiagramRenderer) -> Self {
        Self { renderer, ..Self::default() }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn diagram_source(&self) -> &str {
        &self.diagram_source
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state == ViewState::Generating
    }

    /// Submit is enabled when nothing is in flight and the prompt is not blank.
    pub fn can_submit(&self) -> bool {
        !self.is_generating() && !self.input.trim().is_empty()
    }

    pub fn last_error(&self) -> Option<&GenerationError> {
        match &self.state {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn render_error(&self) -> Option<&RenderError> {
        self.renderer.last_error()
    }

    pub fn rendered(&self) -> Option<&RenderedDiagram> {
        self.renderer.rendered()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn context_mut(&mut self) -> &mut String {
        &mut self.context
    }

    /// Moves to `Generating` and returns the request to send, or `None` when submit is disabled.
    pub fn begin_submit(&mut self) -> Option<GenerateRequest> {
        if !self.can_submit() {
            return None;
        }
        self.state = ViewState::Generating;
        let request = GenerateRequest::new(self.input.clone(), self.context.clone());
        tracing::info!(
            input_chars = request.input.chars().count(),
            has_context = request.context.is_some(),
            "generation requested"
        );
        Some(request)
    }

    /// Resolves the in-flight request.
    ///
    /// On success the diagram source is replaced and the renderer is run against it; on failure
    /// the previous source stays. Outcomes arriving while nothing is in flight are ignored.
    pub fn finish(&mut self, outcome: Result<String, GenerationError>) {
        if !self.is_generating() {
            tracing::warn!("dropping generation outcome with no request in flight");
            return;
        }

        match outcome {
            Ok(source) => {
                self.diagram_source = source;
                self.state = ViewState::Ready;
                tracing::info!(bytes = self.diagram_source.len(), "diagram source updated");
                self.render();
            }
            Err(err) => {
                tracing::error!(error = %err, "error generating flowchart");
                self.state = ViewState::Failed(err);
            }
        }
    }

    /// Runs one full submit against `client`. Returns `false` when submit was disabled.
    pub async fn submit<C: GenerationClient>(&mut self, client: &C) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let outcome = client.generate(&request).await;
        self.finish(outcome);
        true
    }

    /// Re-renders the current diagram source; a no-op when it has not changed.
    pub fn render(&mut self) -> Option<RenderOutcome> {
        self.renderer.render_all(&self.diagram_source).ok()
    }

    /// Resets prompt, context and diagram. Ignored while a request is in flight.
    pub fn clear(&mut self) -> bool {
        if self.is_generating() {
            return false;
        }
        self.input.clear();
        self.context.clear();
        self.diagram_source.clear();
        self.state = ViewState::Idle;
        self.renderer.reset();
        true
    }

    /// Exports the rendered diagram as `flowchart.png`.
    pub fn export(&self, sink: &mut dyn DownloadSink) -> Result<ExportOutcome, ExportError> {
        export_png(self.renderer.rendered(), sink)
    }
}
