// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};

pub(crate) const PALETTE_ENV: &str = "FLOWGEN_TUI_PALETTE";

/// Colors for panels, footer and messages.
///
/// `FLOWGEN_TUI_PALETTE="fg,bg,accent,error"` overrides the defaults; each entry is `#RRGGBB`
/// or `rgb:RR/GG/BB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    fg: Color,
    bg: Color,
    accent: Color,
    error: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self { fg: Color::Reset, bg: Color::Reset, accent: Color::LightGreen, error: Color::LightRed }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: &'static str, value: String },
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) if value.trim().is_empty() => Ok(Self::default()),
            Ok(value) => Self::parse_csv(value.trim()).map_err(|reason| ThemeError::InvalidEnv {
                name: PALETTE_ENV,
                value: format!("{} ({reason})", value.trim()),
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV,
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    pub(crate) fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        let [fg, bg, accent, error] = parts.as_slice() else {
            return Err(format!(
                "expected 4 comma-separated colors (fg,bg,accent,error), got {}",
                parts.len()
            ));
        };
        Ok(Self {
            fg: parse_palette_color(fg)?,
            bg: parse_palette_color(bg)?,
            accent: parse_palette_color(accent)?,
            error: parse_palette_color(error)?,
        })
    }

    pub(crate) fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.accent)
        } else {
            self.base_style()
        }
    }

    pub(crate) fn accent_style(&self) -> Style {
        self.base_style().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.error)
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().fg(Color::DarkGray)
    }
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    if value.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = value.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let channels = rest
            .split('/')
            .map(|channel| {
                u8::from_str_radix(channel.trim(), 16)
                    .ok()
                    .filter(|_| channel.trim().len() == 2)
                    .ok_or_else(|| format!("invalid rgb: component {channel}"))
            })
            .collect::<Result<Vec<u8>, String>>()?;
        let [r, g, b] = channels.as_slice() else {
            return Err(format!("invalid rgb: value: {value}"));
        };
        return Ok(Color::Rgb(*r, *g, *b));
    }

    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {value} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {value}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}
