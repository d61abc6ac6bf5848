use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthChar;

use crate::config::ColorConfig;
use crate::domain::{Item, Metrics, MAX_ATTACHMENTS};
use crate::tui::controller::{NavigationController, Screen};

pub fn render(frame: &mut Frame, ctl: &mut NavigationController, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Main pane
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match ctl.screen() {
        Screen::List => render_list(frame, ctl, chunks[0], colors),
        Screen::Detail => render_detail(frame, ctl, chunks[0], colors),
        Screen::Compose => render_compose(frame, ctl, chunks[0], colors),
        Screen::Menu | Screen::Exiting => {}
    }
    render_status_bar(frame, ctl, chunks[1], colors);
}

fn bordered(title: String, colors: &ColorConfig) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
}

fn render_list(frame: &mut Frame, ctl: &mut NavigationController, area: Rect, colors: &ColorConfig) {
    let Some(cursor) = ctl.cursor() else {
        return;
    };

    let items: Vec<ListItem> = cursor
        .items()
        .iter()
        .map(|item| {
            let unread = ctl.is_unread(item);
            let marker = if unread { "●" } else { " " };
            let date = item
                .created_at
                .map(|d| d.format("%m/%d").to_string())
                .unwrap_or_else(|| "     ".to_string());

            let text_style = if unread {
                Style::default()
                    .fg(colors.unread_item)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.read_item)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), text_style),
                Span::styled(format!("{} ", date), Style::default().fg(colors.timestamp)),
                Span::styled(
                    format!("{:<16} ", item.display_author()),
                    Style::default().fg(colors.author),
                ),
                Span::styled(item.summary(), text_style),
            ]))
        })
        .collect();

    let unread = ctl.unread_count();
    let title = if unread > 0 {
        format!(
            " {} ({}, {} unread) [{}/{}] ",
            ctl.kind().title(),
            cursor.len(),
            unread,
            cursor.selected_index().map_or(0, |i| i + 1),
            cursor.len()
        )
    } else {
        format!(
            " {} ({}) [{}/{}] ",
            ctl.kind().title(),
            cursor.len(),
            cursor.selected_index().map_or(0, |i| i + 1),
            cursor.len()
        )
    };

    let highlight_style = Style::default()
        .bg(colors.selection_bg)
        .fg(colors.selection_fg)
        .add_modifier(Modifier::BOLD);

    let list = List::new(items)
        .block(bordered(title, colors))
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut ctl.list_state);
}

fn item_lines(item: &Item, width: u16, colors: &ColorConfig) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(
        item.display_author(),
        Style::default().fg(colors.author).add_modifier(Modifier::BOLD),
    )];
    if let Some(name) = item.author.as_ref().and_then(|a| a.name.clone()) {
        header.push(Span::raw(format!(" ({})", name)));
    }
    lines.push(Line::from(header));

    let time = item.display_time();
    if !time.is_empty() {
        lines.push(Line::from(Span::styled(
            time,
            Style::default().fg(colors.timestamp),
        )));
    }
    lines.push(Line::from(""));

    for line in item.text.lines() {
        lines.push(Line::from(line.to_string()));
    }

    if !item.media.is_empty() {
        lines.push(Line::from(""));
        for media in &item.media {
            let kind = media.kind.as_deref().unwrap_or("media");
            let location = media.url.as_deref().unwrap_or(&media.key);
            lines.push(Line::from(format!("[{}] {}", kind, location)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from("─".repeat(width.saturating_sub(2) as usize)));

    if let Some(metrics) = item.metrics.as_ref().filter(|m| !m.is_empty()) {
        lines.push(Line::from(Span::styled(
            metrics_line(metrics),
            Style::default().fg(colors.metrics),
        )));
    }
    lines.push(Line::from(Span::styled(
        item.web_url(),
        Style::default().fg(colors.timestamp),
    )));

    lines
}

fn metrics_line(metrics: &Metrics) -> String {
    [
        ("Likes", metrics.like_count),
        ("Reposts", metrics.retweet_count),
        ("Replies", metrics.reply_count),
        ("Quotes", metrics.quote_count),
        ("Impressions", metrics.impression_count),
        ("Bookmarks", metrics.bookmark_count),
    ]
    .iter()
    .filter_map(|(label, count)| count.map(|c| format!("{} {}", label, c)))
    .collect::<Vec<_>>()
    .join("  ")
}

fn render_detail(frame: &mut Frame, ctl: &NavigationController, area: Rect, colors: &ColorConfig) {
    let Some(cursor) = ctl.cursor() else {
        return;
    };
    let Some(item) = cursor.current() else {
        return;
    };

    let title = format!(
        " {} [{}/{}] ",
        ctl.kind().title(),
        cursor.selected_index().map_or(0, |i| i + 1),
        cursor.len()
    );

    let paragraph = Paragraph::new(Text::from(item_lines(item, area.width, colors)))
        .block(bordered(title, colors))
        .wrap(Wrap { trim: false })
        .scroll((ctl.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_compose(frame: &mut Frame, ctl: &NavigationController, area: Rect, colors: &ColorConfig) {
    let Some(session) = ctl.compose() else {
        return;
    };
    let draft = session.draft();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(3)])
        .split(area);

    if let Some(parent) = ctl.cursor().and_then(|c| c.current()) {
        let title = format!(" {} {} ", ctl.kind().compose_label(), parent.display_author());
        let paragraph = Paragraph::new(Text::from(item_lines(parent, chunks[0].width, colors)))
            .block(bordered(title, colors))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, chunks[0]);
    }

    let title = format!(
        " Draft ({} chars, {}/{} images) ",
        draft.text().chars().count(),
        draft.attachments().len(),
        MAX_ATTACHMENTS
    );
    let inner_width = chunks[1].width.saturating_sub(2).max(1) as usize;
    let (rows, (row, col)) = wrap_draft(draft.text(), draft.cursor(), inner_width);
    let editor = Paragraph::new(rows.into_iter().map(Line::from).collect::<Vec<_>>())
        .block(bordered(title, colors));
    frame.render_widget(editor, chunks[1]);

    frame.set_cursor_position((chunks[1].x + 1 + col, chunks[1].y + 1 + row));
}

/// Hard-wraps the draft at `width` display columns and locates the char
/// cursor in the result as `(row, col)`.
fn wrap_draft(text: &str, cursor: usize, width: usize) -> (Vec<String>, (u16, u16)) {
    let mut rows = vec![String::new()];
    let mut col = 0;
    let mut at = None;

    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            if i == cursor {
                at = Some((rows.len() - 1, col));
            }
            rows.push(String::new());
            col = 0;
            continue;
        }

        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(String::new());
            col = 0;
        }
        if i == cursor {
            at = Some((rows.len() - 1, col));
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += w;
    }

    let (row, col) = at.unwrap_or_else(|| {
        if col >= width {
            rows.push(String::new());
            (rows.len() - 1, 0)
        } else {
            (rows.len() - 1, col)
        }
    });
    (rows, (row as u16, col as u16))
}

fn render_status_bar(frame: &mut Frame, ctl: &NavigationController, area: Rect, colors: &ColorConfig) {
    let fetching = ctl.cursor().is_some_and(|c| c.is_fetching());

    let (text, style) = match ctl.status() {
        Some(status) if status.is_error => (
            status.text.clone(),
            Style::default().fg(colors.error_fg).bg(colors.status_bg),
        ),
        Some(status) => (
            status.text.clone(),
            Style::default().fg(colors.status_fg).bg(colors.status_bg),
        ),
        None => (
            help_text(ctl).to_string(),
            Style::default().fg(colors.status_fg).bg(colors.status_bg),
        ),
    };

    let text = if fetching {
        format!("{}  [loading more...]", text)
    } else {
        text
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn help_text(ctl: &NavigationController) -> &'static str {
    match ctl.screen() {
        Screen::List if ctl.kind().tracks_unread() => {
            "j/k:Nav  n/p:Page  Enter:Open  m:Mark read  o:Browser  Esc:Back  q:Quit"
        }
        Screen::List => "j/k:Nav  n/p:Page  Enter:Open  o:Browser  Esc:Back  q:Quit",
        Screen::Detail if ctl.kind().can_reply() => {
            "j/k:Prev/Next  n/p:Scroll  Enter:Reply  o:Browser  Esc:Back"
        }
        Screen::Detail => "j/k:Prev/Next  n/p:Scroll  o:Browser  Esc:Back",
        Screen::Compose => "Enter:Send  Ctrl+V:Attach image  Esc:Cancel  Ctrl+C:Quit",
        Screen::Menu | Screen::Exiting => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    #[test]
    fn test_metrics_line_skips_absent_counts() {
        let metrics = Metrics {
            like_count: Some(3),
            reply_count: Some(0),
            impression_count: Some(120),
            ..Metrics::default()
        };
        assert_eq!(metrics_line(&metrics), "Likes 3  Replies 0  Impressions 120");
    }

    #[test]
    fn test_item_lines_include_body_and_link() {
        let mut item = Item::new("5", "first\nsecond");
        item.metrics = Some(Metrics::default());
        let lines = item_lines(&item, 20, &ColorConfig::default());
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();

        assert_eq!(text[0], "@unknown");
        assert!(text.contains(&"first".to_string()));
        assert!(text.contains(&"second".to_string()));
        assert_eq!(text.last().unwrap(), "https://x.com/i/web/status/5");
        // Empty metrics are not rendered.
        assert!(!text.iter().any(|l| l.starts_with("Likes")));
    }

    #[test]
    fn test_wrap_draft_breaks_at_width() {
        let (rows, at) = wrap_draft("abcdefg", 7, 3);
        assert_eq!(rows, vec!["abc", "def", "g"]);
        assert_eq!(at, (2, 1));

        let (_, at) = wrap_draft("abcdefg", 3, 3);
        assert_eq!(at, (1, 0));
    }

    #[test]
    fn test_wrap_draft_counts_wide_chars_as_two_columns() {
        let (rows, at) = wrap_draft("你好世界", 2, 5);
        assert_eq!(rows, vec!["你好", "世界"]);
        assert_eq!(at, (1, 0));

        let (_, at) = wrap_draft("a你好", 2, 5);
        assert_eq!(at, (0, 3));
    }

    #[test]
    fn test_wrap_draft_cursor_after_full_row_moves_down() {
        let (rows, at) = wrap_draft("abc", 3, 3);
        assert_eq!(rows, vec!["abc", ""]);
        assert_eq!(at, (1, 0));

        let (rows, at) = wrap_draft("", 0, 10);
        assert_eq!(rows, vec![""]);
        assert_eq!(at, (0, 0));
    }

    #[test]
    fn test_wrap_draft_keeps_newlines() {
        let (rows, at) = wrap_draft("ab\ncd", 4, 10);
        assert_eq!(rows, vec!["ab", "cd"]);
        assert_eq!(at, (1, 1));
    }
}
