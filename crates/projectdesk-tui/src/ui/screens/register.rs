use projectdesk_core::validation::{password_violations, FormField, PasswordRule};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{button_line, field_error, input_line};
use crate::app::{RegisterFocus, RegisterScreen};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

pub fn render(frame: &mut Frame, screen: &RegisterScreen, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Create an account", styles::title_style())),
        Line::from(""),
        input_line(
            "Email:",
            &screen.email,
            screen.focus == RegisterFocus::Email,
            false,
        ),
    ];
    lines.extend(field_error(&screen.errors, FormField::Email));
    lines.push(input_line(
        "Password:",
        &screen.password,
        screen.focus == RegisterFocus::Password,
        true,
    ));
    if screen.password.is_empty() {
        lines.extend(field_error(&screen.errors, FormField::Password));
    }
    lines.push(input_line(
        "Confirm:",
        &screen.confirmation,
        screen.focus == RegisterFocus::Confirm,
        true,
    ));
    lines.extend(field_error(&screen.errors, FormField::ConfirmPassword));

    // Live password checklist
    lines.push(Line::from(""));
    let violations = password_violations(&screen.password);
    for rule in PasswordRule::ALL {
        let ok = !screen.password.is_empty() && !violations.contains(&rule);
        let (mark, style) = if ok {
            ("✓", styles::success_style())
        } else {
            ("·", styles::muted_style())
        };
        lines.push(Line::from(Span::styled(
            format!("    {} {}", mark, rule.description()),
            style,
        )));
    }

    lines.push(Line::from(""));
    if screen.submitting {
        lines.push(Line::from(Span::styled(
            "                Creating account...",
            styles::muted_style(),
        )));
    } else {
        lines.push(button_line(
            "Register",
            screen.focus == RegisterFocus::Button,
            16,
        ));
    }
    lines.push(button_line(
        "Back to sign in",
        screen.focus == RegisterFocus::Back,
        12,
    ));

    if let Some(ref error) = screen.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let height = lines.len() as u16 + 3;
    let rect = centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
