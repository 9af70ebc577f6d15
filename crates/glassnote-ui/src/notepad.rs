use crate::app::{Mode, NotepadApp};
use crate::common::centered_rect;
use crate::keymap::{map_key, NotepadAction};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use glassnote_core::{GlassnoteError, Result, ShortcutPersistence, Suggestions};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Terminal,
};
use std::io::{self, stdout};
use std::time::Duration;

const POPUP_MAX_WIDTH: u16 = 50;
const PREVIEW_CHARS: usize = 30;

/// Run the notepad until the user quits.
pub fn run_notepad<P: ShortcutPersistence>(mut app: NotepadApp<P>) -> Result<()> {
    enable_raw_mode().map_err(terminal_error)?;
    if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(terminal_error(e));
    }

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(terminal_error)
        .and_then(|mut terminal| run_loop(&mut terminal, &mut app));

    // Clean up terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

fn terminal_error(e: io::Error) -> GlassnoteError {
    GlassnoteError::Terminal(e.to_string())
}

fn run_loop<P: ShortcutPersistence>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut NotepadApp<P>,
) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| tracing::warn!(error = %e, "clipboard unavailable"))
        .ok();

    while !app.should_quit() {
        draw(terminal, app)?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match map_key(key) {
            NotepadAction::Paste => match clipboard.as_mut().map(|c| c.get_text()) {
                Some(Ok(text)) => app.paste(&text),
                Some(Err(e)) => app.set_status(
                    GlassnoteError::Clipboard(e.to_string()).to_string(),
                ),
                None => app.set_status("Clipboard is not available"),
            },
            action => {
                if let Err(e) = app.handle(action) {
                    tracing::error!(error = %e, "notepad action failed");
                    app.set_status(format!("Error: {}", e));
                }
            }
        }
    }
    Ok(())
}

fn draw<P: ShortcutPersistence>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &NotepadApp<P>,
) -> Result<()> {
    terminal.draw(|f| {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(3),    // Editor
                Constraint::Length(1), // Status / help
            ])
            .split(size);

        f.render_widget(tabs_widget(app), chunks[0]);

        let editor_area = chunks[1];
        let (row, col) = app.caret_position();
        let row_scroll = scroll_offset(row, editor_area.height.saturating_sub(2));
        let col_scroll = scroll_offset(col, editor_area.width.saturating_sub(2));

        let title = format!(" {} ", app.notebook().active().title);
        let editor = Paragraph::new(editor_lines(app))
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((clamp_u16(row_scroll), clamp_u16(col_scroll)));
        f.render_widget(editor, editor_area);

        f.render_widget(status_widget(app), chunks[2]);

        if *app.mode() == Mode::Editing {
            let cursor_x = screen_cell(editor_area.x + 1, col - col_scroll);
            let cursor_y = screen_cell(editor_area.y + 1, row - row_scroll);
            f.set_cursor(cursor_x, cursor_y);

            if let Some(suggestions) = app.controller().suggestions() {
                let area = popup_area(suggestions, editor_area, cursor_x, cursor_y, size);
                f.render_widget(Clear, area);
                f.render_widget(suggestion_list(suggestions), area);
            }
        } else {
            let area = centered_rect(60, 30, size);
            f.render_widget(Clear, area);
            f.render_widget(dialog_widget(app), area);
        }
    })?;
    Ok(())
}

/// First visible line or column that keeps `position` inside `visible` cells
fn scroll_offset(position: usize, visible: u16) -> usize {
    position.saturating_sub(usize::from(visible).saturating_sub(1))
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn screen_cell(origin: u16, offset: usize) -> u16 {
    origin.saturating_add(clamp_u16(offset))
}

fn tabs_widget<P: ShortcutPersistence>(app: &NotepadApp<P>) -> Tabs<'static> {
    let titles: Vec<Line> = app
        .notebook()
        .notes()
        .iter()
        .map(|note| Line::from(note.title.clone()))
        .collect();

    Tabs::new(titles)
        .select(app.notebook().active_index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
}

fn editor_lines<P: ShortcutPersistence>(app: &NotepadApp<P>) -> Vec<Line<'static>> {
    let document = app.document();
    let selection = document
        .selection()
        .map(|(start, end)| (document.global_offset(start), document.global_offset(end)));
    styled_lines(&document.text(), selection)
}

/// Split `text` into lines, reversing the colours of the selected chars.
pub(crate) fn styled_lines(text: &str, selection: Option<(usize, usize)>) -> Vec<Line<'static>> {
    let selected_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines = Vec::new();
    let mut offset = 0;

    for raw in text.split('\n') {
        let mut spans = Vec::new();
        let mut plain = String::new();
        let mut marked = String::new();

        for c in raw.chars() {
            let is_selected = selection.is_some_and(|(start, end)| offset >= start && offset < end);
            if is_selected {
                if !plain.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut plain)));
                }
                marked.push(c);
            } else {
                if !marked.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut marked), selected_style));
                }
                plain.push(c);
            }
            offset += 1;
        }
        if !plain.is_empty() {
            spans.push(Span::raw(plain));
        }
        if !marked.is_empty() {
            spans.push(Span::styled(marked, selected_style));
        }

        lines.push(Line::from(spans));
        // The newline itself
        offset += 1;
    }
    lines
}

fn suggestion_list(suggestions: &Suggestions) -> List<'static> {
    let items: Vec<ListItem> = suggestions
        .matches
        .iter()
        .enumerate()
        .map(|(index, shortcut)| {
            let style = if index == suggestions.active_index {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("/{}", shortcut.trigger),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", shortcut.preview(PREVIEW_CHARS)), style),
            ]))
        })
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
}

/// Place the popup on the line below the caret, inside the frame.
fn popup_area(
    suggestions: &Suggestions,
    editor: Rect,
    cursor_x: u16,
    cursor_y: u16,
    frame: Rect,
) -> Rect {
    let widest = suggestions
        .matches
        .iter()
        .map(|s| s.trigger.chars().count() + 3 + s.preview(PREVIEW_CHARS).chars().count())
        .max()
        .unwrap_or(0) as u16;
    let width = (widest + 2).min(POPUP_MAX_WIDTH).min(frame.width);
    let height = (suggestions.matches.len() as u16 + 2).min(frame.height);

    // Start under the slash, not under the caret
    let partial = suggestions.partial.chars().count() as u16 + 1;
    let x = cursor_x
        .saturating_sub(partial)
        .max(editor.x)
        .min(frame.right().saturating_sub(width));
    let below = cursor_y + 1;
    let y = if below + height <= frame.bottom() {
        below
    } else {
        cursor_y.saturating_sub(height)
    };

    Rect::new(x, y, width, height)
}

fn status_widget<P: ShortcutPersistence>(app: &NotepadApp<P>) -> Paragraph<'static> {
    let line = match app.status() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(vec![
            Span::styled("Ctrl+K", Style::default().fg(Color::Cyan)),
            Span::raw(" shortcut  "),
            Span::styled("Ctrl+N/W", Style::default().fg(Color::Cyan)),
            Span::raw(" tabs  "),
            Span::styled("Alt+←/→", Style::default().fg(Color::Cyan)),
            Span::raw(" switch  "),
            Span::styled("Ctrl+E", Style::default().fg(Color::Cyan)),
            Span::raw(" send  "),
            Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
            Span::raw(" save  "),
            Span::styled("Ctrl+Q", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" quit  ({} shortcuts)", app.registry().len())),
        ]),
    };
    Paragraph::new(line)
}

fn dialog_widget<P: ShortcutPersistence>(app: &NotepadApp<P>) -> Paragraph<'static> {
    let (title, text) = match app.mode() {
        Mode::NamingShortcut { input, content } => (
            " New shortcut ",
            format!(
                "Shortcut name: /{}\n\nContent: {}\n\nEnter to save, Esc to cancel",
                input,
                glassnote_core::Shortcut::new(input.as_str(), content.as_str()).preview(40)
            ),
        ),
        Mode::ConfirmOverwrite { trigger, .. } => (
            " Overwrite? ",
            format!("Shortcut '/{}' already exists. Overwrite? (y/n)", trigger),
        ),
        Mode::ConfirmClose { id } => {
            let title = app
                .notebook()
                .get(id)
                .map(|note| note.title.clone())
                .unwrap_or_default();
            (
                " Close tab ",
                format!(
                    "Are you sure you want to close \"{}\"? Unsaved changes will be lost. (y/n)",
                    title
                ),
            )
        }
        Mode::ChoosingTarget { selected, .. } => {
            let menu: Vec<String> = app
                .send_targets()
                .into_iter()
                .enumerate()
                .map(|(index, (label, _))| {
                    let marker = if index == *selected { ">" } else { " " };
                    format!("{} {}", marker, label)
                })
                .collect();
            (
                " Send selection ",
                format!("{}\n\nEnter to send, Esc to cancel", menu.join("\n")),
            )
        }
        Mode::Editing => (" glassnote ", String::new()),
    };

    let mut text = text;
    if let Some(status) = app.status() {
        text.push_str("\n\n");
        text.push_str(status);
    }

    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn lines_follow_newlines() {
        let lines = styled_lines("one\n\nthree", None);
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0]), "one");
        assert_eq!(plain(&lines[1]), "");
        assert_eq!(plain(&lines[2]), "three");
    }

    #[test]
    fn selection_is_split_into_its_own_span() {
        let lines = styled_lines("ab\ncdef", Some((1, 5)));
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[1].content, "b");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));

        let second: Vec<_> = lines[1].spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(second, vec!["cd", "ef"]);
        assert!(lines[1].spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn long_lines_scroll_horizontally() {
        assert_eq!(scroll_offset(5, 20), 0);
        assert_eq!(scroll_offset(30, 20), 11);
        assert_eq!(scroll_offset(3, 0), 3);

        let col = 70_000usize;
        let visible = col - scroll_offset(col, 78);
        assert_eq!(visible, 77);
        assert_eq!(screen_cell(1, visible), 78);
        assert_eq!(screen_cell(u16::MAX - 1, col), u16::MAX);
        assert_eq!(clamp_u16(col), u16::MAX);
    }

    #[test]
    fn popup_stays_inside_the_frame() {
        let suggestions = Suggestions {
            matches: vec![glassnote_core::Shortcut::new("sig", "Regards")],
            active_index: 0,
            anchor: glassnote_core::Caret::new(glassnote_core::NodeId(0), 0),
            partial: "si".into(),
        };
        let frame = Rect::new(0, 0, 40, 10);
        let editor = Rect::new(0, 1, 40, 8);

        let area = popup_area(&suggestions, editor, 38, 8, frame);
        assert!(area.right() <= frame.right());
        assert!(area.bottom() <= frame.bottom());
        assert!(area.y < 8);
    }
}
