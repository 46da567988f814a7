//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

use super::state::{App, AppMode, ConfirmAction, Form, Screen};
use crate::table::{TableProps, render_table};
use components::{render_dialog_framework, render_input_widget, render_status_bar};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 主体
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    match app.mode {
        AppMode::Login => render_login(frame, app, chunks[1]),
        _ => render_dashboard(frame, app, chunks[1]),
    }
    render_status_bar(frame, chunks[2], help_text(app), app.message.as_deref());

    // 渲染弹窗
    match &app.mode {
        AppMode::Form(form) => render_form_dialog(frame, form),
        AppMode::Confirm(action) => render_confirm_dialog(frame, action),
        _ => {}
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let who = match &app.identity {
        Some(identity) => format!("  ·  {} ({})", identity.name(), identity.role()),
        None => String::new(),
    };
    let title = Paragraph::new(format!("contractdesk{}", who))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    if app.loading {
        let loading = Paragraph::new(crate::table::render::LOADING)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title(" Sign in ").borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = app
        .login_choices
        .iter()
        .map(|identity| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", identity.role()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(identity.name().to_string()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Sign in as ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = ListState::default();
    state.select(Some(app.login_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let Some(identity) = &app.identity else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let screens = identity.screens();
    let selected = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    let tabs = Tabs::new(screens.iter().map(|s| s.title()))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let props = TableProps {
        title: app.screen.title(),
        is_loading: app.loading,
        searching: app.mode == AppMode::Searching,
    };
    let (tables, rows) = (&app.tables, &app.rows);
    match app.screen {
        Screen::Agents => render_table(frame, chunks[1], &tables.agents, &rows.agents, &props),
        Screen::Vendors => render_table(frame, chunks[1], &tables.vendors, &rows.vendors, &props),
        Screen::Services => {
            render_table(frame, chunks[1], &tables.services, &rows.services, &props)
        }
        Screen::Contracts => {
            render_table(frame, chunks[1], &tables.contracts, &rows.contracts, &props)
        }
        Screen::Messages => {
            render_table(frame, chunks[1], &tables.messages, &rows.messages, &props)
        }
        Screen::Reports => render_table(frame, chunks[1], &tables.reports, &rows.reports, &props),
    }
}

fn help_text(app: &App) -> &'static str {
    match &app.mode {
        AppMode::Login => "[j/k] choose  [Enter] sign in  [q] quit",
        AppMode::Normal => {
            "[Tab] screen  [/] search  [1-9] sort  [n/p] page  [a] add  [e] edit  [d] delete  [r] reload  [x] export  [L] logout  [q] quit"
        }
        AppMode::Searching => "type to filter  [Enter] keep  [Esc] clear",
        AppMode::Form(_) => "[Tab/↑↓] field  [Enter] save  [Esc] cancel",
        AppMode::Confirm(_) => "[y] confirm  [n] cancel",
    }
}

fn render_form_dialog(frame: &mut Frame, form: &Form) {
    let area = centered_rect(60, 90, frame.area());
    let inner = render_dialog_framework(frame, area, &form.title());

    let mut constraints: Vec<Constraint> =
        form.labels.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, (label, value)) in form.labels.iter().zip(&form.values).enumerate() {
        render_input_widget(frame, chunks[i], label, value, i == form.focus);
    }
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Delete { screen, .. } => format!("Delete this {}?", screen.noun()),
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] confirm  [n] cancel", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title(" Confirm ").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}
