use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Screen};

use super::screens::{detail, form, login, projects, register};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete(id) => render_delete_overlay(frame, app, id),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  ProjectDesk";
    let session = if app.session.is_authenticated() {
        match app.session.minutes_until_expiry() {
            Some(minutes) if minutes > 0 => format!("Signed in ({} min left)", minutes),
            Some(_) => "Signed in (token expired)".to_string(),
            None => "Signed in".to_string(),
        }
    } else {
        "Signed out".to_string()
    };
    let right = format!("{}  [?] Help", session);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match &app.screen {
        Screen::Login(s) => login::render(frame, s, area),
        Screen::Register(s) => register::render(frame, s, area),
        Screen::Projects(s) => projects::render(frame, s, app.state, area),
        Screen::Detail(s) => detail::render(frame, s, area),
        Screen::Editor(s) => form::render(frame, s, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = shortcuts_for(&app.screen);

    let left = match app.shell.active_notification() {
        Some(n) => Span::styled(format!(" {} ", n.message), styles::notification_style(n.level)),
        None => Span::styled(format!(" {} ", app.route().path()), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left.content.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn shortcuts_for(screen: &Screen) -> &'static str {
    match screen {
        Screen::Login(_) => "[Tab] next | [Enter] sign in | [Ctrl+C] quit",
        Screen::Register(_) => "[Tab] next | [Enter] submit | [Esc] back",
        Screen::Projects(_) => "[n]ew | [e]dit | [d]elete | [L]ogout | [q]uit",
        Screen::Detail(_) => "[e]dit | [d]elete | [Esc] back",
        Screen::Editor(_) => "[Tab] next | [Ctrl+S] save | [Esc] cancel",
    }
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  ProjectDesk", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Move selection or field"),
        help_line("←/→", "Previous/next page"),
        help_line("Enter", "Open / submit"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Projects", styles::highlight_style())),
        help_line("/", "Search by name"),
        help_line("a", "Cycle active filter"),
        help_line("s / S", "Sort field / direction"),
        help_line("z", "Cycle page size"),
        help_line("n", "New project"),
        help_line("e / d", "Edit / delete selected"),
        help_line("r", "Reload"),
        Line::from(""),
        Line::from(Span::styled(" Session", styles::highlight_style())),
        help_line("L", "Sign out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App, id: i64) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let name = match &app.screen {
        Screen::Projects(s) => s
            .projects()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone()),
        Screen::Detail(s) => s.project.as_ref().map(|p| p.name.clone()),
        _ => None,
    }
    .unwrap_or_else(|| format!("#{}", id));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Delete this project?",
            styles::highlight_style(),
        )),
        Line::from(Span::styled(format!("   {}", name), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let outer = Rect::new(2, 1, 30, 5);
        let r = centered_rect_fixed(46, 10, outer);
        assert_eq!((r.width, r.height), (30, 5));
        assert_eq!((r.x, r.y), (2, 1));
    }
}
