//! TUI widget rendering: transcript, concept map canvas, input area, status bar.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::message::UiMessage;
use crate::render::RenderAdapter;

use super::{ConnectionStatus, Tab, WeftTui};

/// Render a single transcript message as a styled line.
pub fn message_to_line(msg: &UiMessage) -> Line<'static> {
    match msg {
        UiMessage::User { text } => Line::from(vec![
            Span::styled("you> ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(text.clone()),
        ]),
        UiMessage::Agent {
            text,
            processing_time,
        } => {
            let mut spans = vec![
                Span::styled("agent> ", Style::default().fg(Color::Cyan)),
                Span::raw(text.clone()),
            ];
            if let Some(secs) = processing_time {
                spans.push(Span::styled(
                    format!(" ({secs:.2}s)"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        UiMessage::Log { line } => Line::from(vec![Span::styled(
            format!("  | {line}"),
            Style::default().fg(Color::DarkGray),
        )]),
        UiMessage::System { text } => Line::from(vec![Span::styled(
            text.clone(),
            Style::default().fg(Color::DarkGray),
        )]),
        UiMessage::Error {
            code,
            message,
            help,
        } => {
            let mut spans = vec![
                Span::styled(
                    format!("[error:{code}] "),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.clone()),
            ];
            if let Some(h) = help {
                spans.push(Span::styled(
                    format!(" (help: {h})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    }
}

/// Main TUI layout rendering.
pub fn render(frame: &mut Frame, app: &WeftTui) {
    let [header_area, main_area, input_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);

    match app.tab {
        Tab::Chat => render_transcript(frame, app, main_area),
        Tab::Memory => render_memory(frame, app, main_area),
    }

    let input_widget = Paragraph::new(app.input_buffer.as_str())
        .block(Block::default().borders(Borders::ALL).title(" > "))
        .style(Style::default().fg(Color::White));
    frame.render_widget(input_widget, input_area);

    render_status(frame, app, status_area);
}

fn render_header(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let tab_label = match app.tab {
        Tab::Chat => "[chat] memory",
        Tab::Memory => "chat [memory]",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " weft ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" :: {} :: {tab_label} (Tab switches) ", app.base_url)),
    ]));
    frame.render_widget(header, area);
}

fn render_transcript(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let lines: Vec<Line> = app.messages.iter().map(message_to_line).collect();
    let visible_height = area.height.saturating_sub(2) as usize;

    let start = if app.follow_tail {
        lines.len().saturating_sub(visible_height)
    } else {
        app.scroll_offset.min(lines.len().saturating_sub(1))
    };

    let widget = Paragraph::new(lines[start..].to_vec())
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_memory(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let [canvas_area, side_area] =
        Layout::horizontal([Constraint::Fill(3), Constraint::Length(32)]).areas(area);

    render_canvas(frame, app, canvas_area);
    render_sidebar(frame, app, side_area);
}

fn edge_color(weight: u32) -> Color {
    match weight {
        0..=1 => Color::DarkGray,
        2..=3 => Color::Gray,
        _ => Color::White,
    }
}

fn node_color(size: u64) -> Color {
    match size {
        0..=1 => Color::Blue,
        2..=4 => Color::Cyan,
        _ => Color::LightCyan,
    }
}

fn render_canvas(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let title = if app.refresh_in_flight() {
        " concept map (refreshing...) "
    } else {
        " concept map "
    };

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .paint(|ctx| {
            let Some(graph) = app.layout.graph() else {
                ctx.print(
                    -0.6,
                    0.0,
                    Line::from(Span::styled(
                        "no snapshot yet :: /refresh to load",
                        Style::default().fg(Color::DarkGray),
                    )),
                );
                return;
            };

            for edge in &graph.edges {
                let (Some(a), Some(b)) = (
                    app.layout.position_of(&edge.from),
                    app.layout.position_of(&edge.to),
                ) else {
                    continue;
                };
                ctx.draw(&CanvasLine {
                    x1: a.0,
                    y1: a.1,
                    x2: b.0,
                    y2: b.1,
                    color: edge_color(edge.weight),
                });
            }

            for node in &graph.nodes {
                let Some((x, y)) = app.layout.position_of(&node.id) else {
                    continue;
                };
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color: node_color(node.size),
                });
                ctx.print(
                    x,
                    y,
                    Line::from(Span::styled(
                        node.label.clone(),
                        Style::default().fg(node_color(node.size)),
                    )),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn render_sidebar(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(graph) = app.layout.graph() {
        let mut degree: HashMap<&str, u32> = HashMap::new();
        for edge in &graph.edges {
            *degree.entry(edge.from.as_str()).or_default() += 1;
            *degree.entry(edge.to.as_str()).or_default() += 1;
        }

        let mut by_size: Vec<_> = graph.nodes.iter().collect();
        by_size.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));

        for node in by_size.iter().take(area.height.saturating_sub(4) as usize) {
            let deg = degree.get(node.id.as_str()).copied().unwrap_or(0);
            lines.push(Line::from(vec![
                Span::styled(node.label.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {}x, {} links", node.size, deg),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        if !app.diagnostics.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("{} edge(s) dropped as inconsistent", app.diagnostics.len()),
                Style::default().fg(Color::Yellow),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "concepts appear here",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" concepts "))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, app: &WeftTui, area: Rect) {
    let (conn_label, conn_color) = match &app.connection {
        ConnectionStatus::Unknown => ("checking".to_string(), Color::Yellow),
        ConnectionStatus::Healthy { modules_active } => (
            format!("connected ({} modules active)", modules_active.len()),
            Color::Green,
        ),
        ConnectionStatus::Unreachable { .. } => ("offline".to_string(), Color::Red),
    };

    let (nodes, edges) = app
        .layout
        .graph()
        .map(|g| (g.nodes.len(), g.edges.len()))
        .unwrap_or((0, 0));

    let mut spans = vec![
        Span::styled(format!(" {conn_label} "), Style::default().fg(conn_color)),
        Span::raw("| "),
        Span::styled(
            format!(
                "modules: {} ",
                app.config.modules.enabled_names().join(",")
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("| "),
        Span::styled(
            format!("concepts: {nodes} links: {edges} "),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.awaiting_reply {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            "agent is thinking... ",
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
