// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Stand-in generation service.
//!
//! Answers `POST /generate_flowchart` with a fixed four-node template built around the prompt.
//! Used by `--demo`, `--serve` and the integration tests; it does not interpret the prompt.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{GenerateRequest, GenerateResponse, GENERATE_PATH};

pub const WELCOME_MESSAGE: &str = "Welcome to the Flowchart Generator API!";

pub fn router() -> Router {
    Router::new()
        .route("/", get(welcome))
        .route(GENERATE_PATH, post(generate))
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

async fn generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    tracing::info!(input_chars = request.input.chars().count(), "stub generating flowchart");
    Json(GenerateResponse { mermaid_code: template_flowchart(&request.input) })
}

/// The fixed diagram the stub answers with.
pub fn template_flowchart(input: &str) -> String {
    let label = sanitize_label(input);
    format!("graph TD;\n    A[Start] --> B{{{label}}}\n    B --> C[Action]\n    C --> D[End]\n")
}

/// Keeps the prompt on one line and away from Mermaid's shape delimiters.
fn sanitize_label(input: &str) -> String {
    let label: String = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|ch| match ch {
            '{' | '}' | '[' | ']' | '(' | ')' | '"' | '|' | ';' => ' ',
            other => other,
        })
        .collect();
    let label = label.trim();
    if label.is_empty() {
        "Decision".to_owned()
    } else {
        label.to_owned()
    }
}

/// A stub service bound to a local port.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Binds `127.0.0.1:<port>` (0 = ephemeral) and serves in the background.
    pub async fn spawn(port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router()).await {
                tracing::error!(error = %err, "stub generation service stopped");
            }
        });
        tracing::info!(%addr, "stub generation service listening");
        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}{GENERATE_PATH}", self.addr)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves the stub in the foreground until the process is stopped.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "stub generation service listening");
    axum::serve(listener, router()).await
}
