//! Per-screen rendering, one module per route.

pub mod detail;
pub mod form;
pub mod login;
pub mod projects;
pub mod register;

use projectdesk_core::validation::{error_for, FormField, ValidationError};
use ratatui::text::{Line, Span};

use super::styles;

/// Width of the visible part of a text field.
const FIELD_WIDTH: usize = 28;

/// One labelled text field, `[value▌]`, showing the tail of long values.
fn input_line(label: &str, value: &str, focused: bool, masked: bool) -> Line<'static> {
    let shown: String = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let count = shown.chars().count();
    let visible: String = shown.chars().skip(count.saturating_sub(FIELD_WIDTH)).collect();
    let cursor = if focused { "▌" } else { " " };

    Line::from(vec![
        Span::styled(format!("  {:<14}[", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", visible, cursor, width = FIELD_WIDTH),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Inline error under a field, or nothing.
fn field_error(errors: &[ValidationError], field: FormField) -> Option<Line<'static>> {
    error_for(errors, field).map(|e| {
        Line::from(Span::styled(
            format!("  {:<15}{}", "", e),
            styles::error_style(),
        ))
    })
}

fn button_line(label: &str, focused: bool, indent: usize) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw(format!("{}[", " ".repeat(indent))),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}
