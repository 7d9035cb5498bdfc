// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowgen: describe a process in plain language, get a Mermaid flowchart back.
//!
//! The generation service turns a prompt (plus optional context) into Mermaid source; this crate
//! drives that request, renders the result into the terminal, and exports it as `flowchart.png`.

pub mod api;
pub mod config;
pub mod controller;
pub mod export;
pub mod logging;
pub mod render;
pub mod stub;
pub mod tui;
