//! 通用 UI 组件
//!
//! 对话框、输入框、状态栏等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 单行输入框，聚焦时末尾显示光标
pub fn render_input_widget(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let (style, text) = if focused {
        (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            format!("{}_", value),
        )
    } else {
        (Style::default().fg(Color::Gray), value.to_string())
    };

    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().title(label).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// [组件] 底部帮助/状态栏
pub fn render_status_bar(frame: &mut Frame, area: Rect, help: &str, message: Option<&str>) {
    let text = match message {
        Some(message) if !message.is_empty() => format!("{}  |  {}", help, message),
        _ => help.to_string(),
    };

    let bar = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}
