use projectdesk_core::validation::FormField;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{button_line, field_error, input_line};
use crate::app::{LoginFocus, LoginScreen};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

pub fn render(frame: &mut Frame, screen: &LoginScreen, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Sign in to ProjectDesk", styles::title_style())),
        Line::from(""),
        input_line(
            "Email:",
            &screen.email,
            screen.focus == LoginFocus::Email,
            false,
        ),
    ];
    lines.extend(field_error(&screen.errors, FormField::Email));
    lines.push(input_line(
        "Password:",
        &screen.password,
        screen.focus == LoginFocus::Password,
        true,
    ));
    lines.extend(field_error(&screen.errors, FormField::Password));

    lines.push(Line::from(""));
    if screen.submitting {
        lines.push(Line::from(Span::styled(
            "                Signing in...",
            styles::muted_style(),
        )));
    } else {
        lines.push(button_line("Sign in", screen.focus == LoginFocus::Button, 16));
    }
    lines.push(button_line(
        "Create account",
        screen.focus == LoginFocus::Register,
        13,
    ));

    if let Some(ref error) = screen.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let height = lines.len() as u16 + 3;
    let rect = centered_rect_fixed(52, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
