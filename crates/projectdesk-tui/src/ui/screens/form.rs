use projectdesk_core::validation::FormField;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{button_line, field_error, input_line};
use crate::app::{EditorFocus, EditorScreen};
use crate::ui::styles;

/// Create/edit form for a project.
pub fn render(frame: &mut Frame, screen: &EditorScreen, area: Rect) {
    let title = match screen.id {
        Some(id) => format!(" Edit project #{} ", id),
        None => " New project ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if screen.loading {
        frame.render_widget(
            Paragraph::new(Span::styled(" Loading...", styles::muted_style())).block(block),
            area,
        );
        return;
    }

    let form = &screen.form;
    let focus = screen.focus;
    let errors = &screen.errors;

    let mut lines = vec![
        Line::from(""),
        input_line("Name:", &form.name, focus == EditorFocus::Name, false),
    ];
    lines.extend(field_error(errors, FormField::Name));
    lines.push(input_line(
        "Description:",
        &form.description,
        focus == EditorFocus::Description,
        false,
    ));
    lines.push(input_line(
        "Value (R$):",
        &form.value,
        focus == EditorFocus::Value,
        false,
    ));
    lines.extend(field_error(errors, FormField::Value));

    let checkbox = if form.active { "[x] Active" } else { "[ ] Active" };
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<14} ", "Status:"), styles::muted_style()),
        Span::styled(checkbox, styles::field_style(focus == EditorFocus::Active)),
        Span::styled("  (space toggles)", styles::muted_style()),
    ]));

    lines.push(input_line(
        "Start date:",
        &form.start_date,
        focus == EditorFocus::StartDate,
        false,
    ));
    lines.extend(field_error(errors, FormField::StartDate));
    lines.push(input_line(
        "End date:",
        &form.end_date,
        focus == EditorFocus::EndDate,
        false,
    ));
    lines.extend(field_error(errors, FormField::EndDate));

    lines.push(Line::from(Span::styled(
        format!("  {:<15}dd/mm/yyyy, end date optional", ""),
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    if screen.saving {
        lines.push(Line::from(Span::styled(
            "                 Saving...",
            styles::muted_style(),
        )));
    } else {
        lines.push(button_line("Save", focus == EditorFocus::Save, 17));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
