// File: src/tui/view.rs
use crate::color_utils;
use crate::flash::{FlashKind, FlashMessage};
use crate::overlay::{LOOKUP_FIELD, OverlaySession};
use crate::tui::action::Focus;
use crate::tui::state::AppState;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

const FLASH_HEIGHT: u16 = 3;

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let full_help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Tab:Switch Focus  j/k:Up/Down  ?:Toggle Help  q:Quit"),
        ]),
        Line::from(vec![
            Span::styled(
                " EDIT ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" a:Add (word or list)  A:New List  e/Enter:Edit selected  g:List page"),
        ]),
        Line::from(vec![
            Span::styled(
                " FORM ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Tab:Next field  Enter/Ctrl+S:Save  Ctrl+D:Remove  Ctrl+R:Retry  Esc:Close"),
        ]),
        Line::from(vec![
            Span::styled(
                " MESSAGES ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" x:Dismiss newest  R:Retry failed request"),
        ]),
    ];

    let footer_height = if state.show_full_help {
        Constraint::Length(full_help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), footer_height])
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(v_chunks[0]);

    // --- Sidebar: lists ---
    let focus_style = |focus: Focus| {
        if state.active_focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let list_items: Vec<ListItem> = state
        .tags
        .lists
        .iter()
        .map(|l| {
            let count = state.tags.words_of(&l.id).len();
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {}", l.label)),
                Span::styled(format!(" ({})", count), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let lists_widget = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Lists ")
                .border_style(focus_style(Focus::Lists)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(lists_widget, h_chunks[0], &mut state.list_state);

    // --- Main: words of the selected list ---
    let words_block = Block::default()
        .borders(Borders::ALL)
        .title(match state.selected_list() {
            Some(list) => format!(" {} ", list.label),
            None => " Words ".to_string(),
        })
        .border_style(focus_style(Focus::Words));

    let empty_text = match state.selected_list() {
        None => Some("No lists yet. Press A to create one."),
        Some(list) => state.tags.no_tags_message(&list.id),
    };

    if let Some(text) = empty_text {
        let p = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(words_block);
        f.render_widget(p, h_chunks[1]);
    } else {
        let word_items: Vec<ListItem> = state
            .visible_words()
            .iter()
            .map(|w| {
                let mut spans = vec![Span::styled(
                    format!(" {}", w.word),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                if !w.meaning.is_empty() {
                    spans.push(Span::raw(format!("  {}", first_line(&w.meaning))));
                }
                if !w.origin.is_empty() {
                    spans.push(Span::styled(
                        format!(" ({})", w.origin),
                        Style::default().fg(Color::Magenta),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let words_widget = List::new(word_items)
            .block(words_block)
            .highlight_style(Style::default().bg(Color::Blue));
        f.render_stateful_widget(words_widget, h_chunks[1], &mut state.word_state);
    }

    // --- Footer ---
    let footer_area = v_chunks[1];
    f.render_widget(Clear, footer_area);
    if state.show_full_help {
        let help = Paragraph::new(full_help_text)
            .block(Block::default().borders(Borders::ALL).title(" Help "));
        f.render_widget(help, footer_area);
    } else {
        let mut spans = vec![Span::raw(format!(" {}", state.message))];
        if state.pending > 0 {
            spans.push(Span::styled(
                format!("  [{} pending]", state.pending),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            "  ?:Help",
            Style::default().fg(Color::DarkGray),
        ));
        let status = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, footer_area);
    }

    // --- Overlay ---
    if let Some(session) = &state.overlay {
        // Backdrop: dims whatever is behind the form.
        f.render_widget(
            Block::default().style(Style::default().fg(Color::DarkGray)),
            f.area(),
        );
        draw_overlay(f, session);
    }

    // --- Flash messages, stacked top-right, oldest first ---
    draw_flashes(f, &state.flashes);
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

fn draw_overlay(f: &mut Frame, session: &OverlaySession) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in session.fields.iter().enumerate() {
        let focused = i == session.focus;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(Span::styled(
            format!("{}:", field.spec.label),
            label_style,
        )));

        let mut value_lines: Vec<String> = field.value.split('\n').map(str::to_string).collect();
        if focused && let Some(last) = value_lines.last_mut() {
            last.push('▏');
        }
        for v in value_lines {
            lines.push(Line::from(format!("  {}", v)));
        }

        if field.spec.name == LOOKUP_FIELD
            && let Some(hint) = &session.hint
        {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", hint.text()), Style::default().fg(Color::Green)),
                Span::styled(
                    hint.link.clone(),
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }

    let mut keys = "Enter/Ctrl+S:Save  Esc:Close".to_string();
    if session.kind.is_edit() {
        keys.push_str("  Ctrl+D:Remove");
    }
    lines.push(Line::from(Span::styled(
        keys,
        Style::default().fg(Color::DarkGray),
    )));

    let area = f.area();
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = (area.width * 60 / 100).max(30).min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup);
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", session.title))
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(p, popup);
}

fn flash_style(message: &FlashMessage) -> Style {
    let base = match message.kind {
        FlashKind::Info => Style::default().fg(Color::Black).bg(Color::Green),
        FlashKind::Error | FlashKind::Transport => {
            Style::default().fg(Color::White).bg(Color::Red)
        }
    };
    match message
        .style
        .background()
        .and_then(color_utils::parse_hex_to_u8)
    {
        Some((r, g, b)) => {
            let fg = if color_utils::is_dark(r, g, b) {
                Color::White
            } else {
                Color::Black
            };
            base.bg(Color::Rgb(r, g, b)).fg(fg)
        }
        None => base,
    }
}

fn draw_flashes(f: &mut Frame, flashes: &[FlashMessage]) {
    let area = f.area();
    let width = (area.width * 40 / 100).max(20).min(area.width);
    let x = area.x + area.width - width;

    for (i, message) in flashes.iter().enumerate() {
        let y = area.y + i as u16 * FLASH_HEIGHT;
        if y + FLASH_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect {
            x,
            y,
            width,
            height: FLASH_HEIGHT,
        };
        let mut text = message.text.clone();
        if message.retry.is_some() {
            text.push_str("  [R: retry]");
        }
        f.render_widget(Clear, rect);
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .style(flash_style(message))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, rect);
    }
}
