// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, footer, and help helpers used by TUI rendering.
fn stack_panes_vertically(area: Rect) -> bool {
    area.width < 90
}

fn footer_line(app: &App, toast_message: &str, compact: bool) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let generating = app.controller.is_generating();
    let nothing_rendered = app.controller.rendered().is_none();
    let no_source = app.controller.diagram_source().is_empty();

    push_footer_entry(&mut spans, "STATE", &app.status_label());
    if compact {
        push_footer_entry_maybe_disabled(&mut spans, "GENERATE", "⏎", generating);
        push_footer_entry(&mut spans, "HELP", "F1");
        push_footer_entry(&mut spans, "QUIT", "Esc");
    } else {
        push_footer_entry_maybe_disabled(&mut spans, "GENERATE", "⏎", generating);
        push_footer_entry(&mut spans, "FIELD", "Tab");
        push_footer_entry_maybe_disabled(&mut spans, "CLEAR", "^L", generating);
        push_footer_entry_maybe_disabled(&mut spans, "EXPORT", "^E", nothing_rendered);
        push_footer_entry_maybe_disabled(&mut spans, "YANK", "^Y", no_source);
        push_footer_entry(&mut spans, "HELP", "F1");
        push_footer_entry(&mut spans, "QUIT", "Esc");
    }

    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::styled("Toast:".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::raw(toast_message.to_owned()));
    } else if !compact {
        spans.push(Span::raw("  ".to_owned()));
        spans.extend(footer_brand_line().spans);
    }

    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = ["Tab/Shift-Tab", "PgUp/PgDn", "Esc/Ctrl-C"]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Prompt ---", header_style)));
    lines.push(help_kv("Enter", "Generate flowchart", key_col_width, key_style));
    lines.push(help_kv("Tab/Shift-Tab", "Switch Prompt/Context", key_col_width, key_style));
    lines.push(help_kv("Backspace", "Delete last character", key_col_width, key_style));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("--- Result ---", header_style)));
    lines.push(help_kv("Ctrl-E", "Export flowchart.png", key_col_width, key_style));
    lines.push(help_kv("Ctrl-Y", "Yank Mermaid source (OSC52)", key_col_width, key_style));
    lines.push(help_kv("PgUp/PgDn", "Scroll Mermaid source", key_col_width, key_style));
    lines.push(help_kv("Ctrl-L", "Clear everything", key_col_width, key_style));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv("F1", "Help (toggle)", key_col_width, key_style));
    lines.push(help_kv("Esc/Ctrl-C", "Quit", key_col_width, key_style));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Export to: ", app.theme.dim_style()),
        Span::raw(app.settings.export_dir.display().to_string()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(app.theme.panel_border_style(true))
        .title_style(app.theme.accent_style());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.extend(footer_value_spans(value, disabled));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_spans(value: &str, disabled: bool) -> Vec<Span<'static>> {
    let color = if disabled {
        Color::DarkGray
    } else {
        FOOTER_KEY_COLOR
    };
    vec![Span::styled(
        value.to_owned(),
        Style::default()
            .fg(color)
            .add_modifier(Modifier::BOLD),
    )]
}
