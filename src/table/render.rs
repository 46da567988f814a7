//! 表格渲染：搜索框 + 表头/表体 + 分页器

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::column::TableRecord;
use super::engine::TableView;

pub const NO_DATA: &str = "No data found";
pub const LOADING: &str = "Loading...";

/// 渲染选项
pub struct TableProps<'a> {
    pub title: &'a str,
    pub is_loading: bool,
    pub searching: bool, // 搜索框是否处于输入状态
}

/// 在 area 中渲染完整的表格组件
pub fn render_table<R: TableRecord>(
    frame: &mut Frame,
    area: Rect,
    view: &TableView<R>,
    records: &[R],
    props: &TableProps<'_>,
) {
    let slice = view.view(records);
    let show_pager = !props.is_loading && slice.show_pager();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // 搜索框
            Constraint::Min(3),                             // 表格
            Constraint::Length(if show_pager { 1 } else { 0 }), // 分页器
        ])
        .split(area);

    render_search_box(frame, chunks[0], &view.state.search_term, props.searching);

    let mut header_cells: Vec<Cell> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let marker = match view.state.sort_column {
                Some(accessor) if accessor == column.accessor => {
                    format!(" {}", view.state.sort_direction.marker())
                }
                _ => String::new(),
            };
            let label = if column.sortable && i < 9 {
                format!("{} {}{}", i + 1, column.header, marker)
            } else {
                format!("{}{}", column.header, marker)
            };
            Cell::from(label)
        })
        .collect();

    let mut widths: Vec<Constraint> = view.columns.iter().map(|c| c.width).collect();
    if view.has_row_actions() {
        header_cells.push(Cell::from("Actions"));
        widths.push(Constraint::Length(20));
    }

    let header = Row::new(header_cells)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let placeholder = if props.is_loading {
        Some(Span::styled(LOADING, Style::default().fg(Color::Yellow)))
    } else if slice.is_empty() {
        Some(Span::styled(NO_DATA, Style::default().fg(Color::DarkGray)))
    } else {
        None
    };

    let rows: Vec<Row> = if placeholder.is_some() {
        Vec::new()
    } else {
        slice
            .rows
            .iter()
            .map(|record| {
                let mut cells: Vec<Cell> = view
                    .columns
                    .iter()
                    .map(|column| Cell::from(column.cell_text(record)))
                    .collect();
                if view.has_row_actions() {
                    cells.push(
                        Cell::from(view.row_actions_text(record))
                            .style(Style::default().fg(Color::DarkGray)),
                    );
                }
                Row::new(cells)
            })
            .collect()
    };

    let title = format!(" {} ({}) ", props.title, slice.filtered_count);
    let block = Block::default().title(title).borders(Borders::ALL);
    let body = block.inner(chunks[1]);
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = TableState::default();
    if placeholder.is_none() && !slice.is_empty() {
        state.select(Some(view.selected.min(slice.rows.len() - 1)));
    }
    frame.render_stateful_widget(table, chunks[1], &mut state);

    // 占位文字横跨整行，画在表头下方
    if let Some(span) = placeholder {
        let line_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
            .split(body)[1];
        frame.render_widget(Paragraph::new(Line::from(span)), line_area);
    }

    if show_pager {
        let prev = if slice.page > 1 { "[p] prev" } else { "        " };
        let next = if slice.page < slice.total_pages {
            "[n] next"
        } else {
            "        "
        };
        let pager = Paragraph::new(format!(
            "{}  {}  page {}/{}  {}",
            prev,
            slice.range_label(),
            slice.page,
            slice.total_pages,
            next
        ))
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(pager, chunks[2]);
    }
}

fn render_search_box(frame: &mut Frame, area: Rect, term: &str, searching: bool) {
    let style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if searching {
        format!("/{}", term)
    } else if term.is_empty() {
        "press / to search".to_string()
    } else {
        term.to_string()
    };
    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().title(" Search ").borders(Borders::ALL));
    frame.render_widget(search, area);
}
