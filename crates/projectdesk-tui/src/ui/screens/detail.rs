use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::DetailScreen;
use crate::ui::styles;

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), styles::muted_style()),
        Span::raw(value),
    ])
}

pub fn render(frame: &mut Frame, screen: &DetailScreen, area: Rect) {
    let block = Block::default()
        .title(format!(" Project #{} ", screen.id))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let Some(project) = &screen.project else {
        let text = if screen.loading { " Loading..." } else { " Project not available." };
        frame.render_widget(
            Paragraph::new(Span::styled(text, styles::muted_style())).block(block),
            area,
        );
        return;
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", project.name), styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Status:"), styles::muted_style()),
            Span::styled(project.status_display(), styles::active_style(project.active)),
        ]),
        field("Value:", project.value_display()),
        field("Start date:", project.start_date_display()),
        field("End date:", project.end_date_display()),
        Line::from(""),
        Line::from(Span::styled("  Description", styles::highlight_style())),
        Line::from(format!("  {}", project.description_display())),
        Line::from(""),
        field("Created:", project.created_at_display()),
        field("Updated:", project.updated_at_display()),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
