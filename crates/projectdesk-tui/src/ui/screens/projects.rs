use projectdesk_core::projects::SortField;
use projectdesk_core::utils::truncate_string;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{AppState, ProjectListScreen};
use crate::ui::styles;

/// Render the project list: filter bar, table and pager.
pub fn render(frame: &mut Frame, screen: &ProjectListScreen, state: AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filters
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pager
        ])
        .split(area);

    render_filters(frame, screen, state, chunks[0]);
    render_table(frame, screen, chunks[1]);
    render_pager(frame, screen, chunks[2]);
}

fn render_filters(frame: &mut Frame, screen: &ProjectListScreen, state: AppState, area: Rect) {
    let params = &screen.params;
    let searching = state == AppState::Searching;

    let search = if searching {
        Span::styled(format!("/{}▌", screen.search), styles::search_style())
    } else if params.q.is_empty() {
        Span::styled("[/] search", styles::muted_style())
    } else {
        Span::styled(format!("\"{}\"", params.q), styles::search_style())
    };

    let line = Line::from(vec![
        Span::raw(" "),
        search,
        Span::styled("  Status: ", styles::muted_style()),
        Span::styled(params.active_filter_label(), styles::highlight_style()),
        Span::styled("  Sort: ", styles::muted_style()),
        Span::styled(
            format!(
                "{} {}",
                params.sort.field.label(),
                params.sort.direction.arrow()
            ),
            styles::highlight_style(),
        ),
        Span::styled("  Per page: ", styles::muted_style()),
        Span::styled(params.size.to_string(), styles::highlight_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame, screen: &ProjectListScreen, area: Rect) {
    let sort = screen.params.sort;
    let sort_indicator = |field: SortField| {
        if sort.field == field {
            sort.direction.arrow()
        } else {
            ""
        }
    };

    let header_cells = [
        Cell::from(format!("ID{}", sort_indicator(SortField::Id))),
        Cell::from(format!("Name{}", sort_indicator(SortField::Name))),
        Cell::from(format!("Value{}", sort_indicator(SortField::Value))),
        Cell::from("Status"),
        Cell::from(format!("Start{}", sort_indicator(SortField::StartDate))),
        Cell::from(format!("End{}", sort_indicator(SortField::EndDate))),
    ];
    let header = Row::new(header_cells).style(styles::header_style()).height(1);

    let rows: Vec<Row> = screen
        .projects()
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let style = if i == screen.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(format!("{:>5}", project.id)),
                Cell::from(truncate_string(&project.name, 40)),
                Cell::from(format!("{:>16}", project.value_display())),
                Cell::from(Span::styled(
                    project.status_display(),
                    styles::active_style(project.active),
                )),
                Cell::from(project.start_date_display()),
                Cell::from(project.end_date_display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(3),
        Constraint::Length(17),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let title = if screen.loading {
        " Projects (loading...) ".to_string()
    } else {
        format!(
            " Projects ({}) ",
            screen.page.as_ref().map(|p| p.total_elements).unwrap_or(0)
        )
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rows.is_empty() && !screen.loading {
        let message = match &screen.error {
            Some(error) => Span::styled(format!(" {}", error), styles::error_style()),
            None => Span::styled(" No projects found. Press [n] to create one.", styles::muted_style()),
        };
        frame.render_widget(Paragraph::new(Line::from(message)).block(block), area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(screen.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pager(frame: &mut Frame, screen: &ProjectListScreen, area: Rect) {
    let Some(page) = &screen.page else {
        return;
    };
    let prev = if page.has_previous() { "← prev" } else { "      " };
    let next = if page.has_next() { "next →" } else { "" };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", prev), styles::muted_style()),
        Span::styled(
            format!(
                " Page {} of {}  ({}) ",
                page.number.saturating_add(1),
                page.total_pages.max(1),
                page.range_display()
            ),
            styles::list_item_style(),
        ),
        Span::styled(format!(" {}", next), styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
