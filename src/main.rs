mod config;
mod desk;
mod error;
mod models;
mod sample;
mod storage;
mod store;
mod table;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config as LogConfig, WriteLogger};

use crate::config::Config;
use crate::desk::Desk;
use crate::error::{AppError, Result};
use crate::storage::load_dataset;
use crate::ui::{App, render};

/// 获取应用目录路径，如 (~/.local/share/contractdesk/)
fn app_dir(base: Option<PathBuf>, kind: &'static str) -> Result<PathBuf> {
    let dir = base.ok_or(AppError::NoDir(kind))?.join("contractdesk");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn main() -> Result<()> {
    let data_dir = app_dir(dirs::data_dir(), "data")?;
    let config = Config::load(&app_dir(dirs::config_dir(), "config")?.join("config.toml"))?;

    // 终端被 TUI 占用，日志写入文件
    let log_file = File::create(data_dir.join("contractdesk.log"))?;
    WriteLogger::init(config.level_filter(), LogConfig::default(), log_file)?;
    info!("starting with page size {}", config.page_size);

    // 创建应用状态，数据在首帧后加载
    let mut app = App::new(Desk::default(), config.page_size);
    app.export_path = Some(data_dir.join("export.toml"));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app, &config);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("shutting down");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &Config,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // 加载状态已绘制，执行加载
        if app.pending_reload {
            app.finish_reload(load_dataset(config.dataset.as_deref()));
            continue;
        }

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press
                && ui::handle_key_event(app, key.code)
            {
                break;
            }
        }
    }
    Ok(())
}
