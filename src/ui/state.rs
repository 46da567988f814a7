//! App 状态定义 (Model)
//!
//! 包含应用状态结构体、身份/页面枚举以及按页面绑定的表格

use std::path::PathBuf;

use crate::desk::Desk;
use crate::models::{Agent, Contract, Message, ReportRow, Service, Vendor, vendor_report};
use crate::table::{TableRecord, TableView, row_key};

use super::columns::{
    agent_columns, contract_columns, message_columns, report_columns, service_columns,
    vendor_columns,
};

pub const ADMIN_NAME: &str = "Administrator";

/// 页面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Agents,
    Vendors,
    Services,
    Contracts,
    Messages,
    Reports,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Agents => "Agents",
            Screen::Vendors => "Vendors",
            Screen::Services => "Services",
            Screen::Contracts => "Contracts",
            Screen::Messages => "Messages",
            Screen::Reports => "Reports",
        }
    }

    /// 单数形式，用于提示信息
    pub fn noun(self) -> &'static str {
        match self {
            Screen::Agents => "agent",
            Screen::Vendors => "vendor",
            Screen::Services => "service",
            Screen::Contracts => "contract",
            Screen::Messages => "message",
            Screen::Reports => "report",
        }
    }
}

/// 登录身份
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Admin,
    Agent(String),
    Vendor(String),
}

impl Identity {
    pub fn name(&self) -> &str {
        match self {
            Identity::Admin => ADMIN_NAME,
            Identity::Agent(name) | Identity::Vendor(name) => name,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Identity::Admin => "admin",
            Identity::Agent(_) => "agent",
            Identity::Vendor(_) => "vendor",
        }
    }

    /// 该角色可见的页面
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Identity::Admin => &[
                Screen::Agents,
                Screen::Vendors,
                Screen::Services,
                Screen::Contracts,
                Screen::Messages,
                Screen::Reports,
            ],
            Identity::Agent(_) => &[
                Screen::Contracts,
                Screen::Vendors,
                Screen::Services,
                Screen::Messages,
            ],
            Identity::Vendor(_) => &[Screen::Services, Screen::Contracts, Screen::Messages],
        }
    }

    pub fn can_create(&self, screen: Screen) -> bool {
        screen == Screen::Messages || self.can_edit(screen)
    }

    /// 编辑/删除权限（可见行已按身份过滤）
    pub fn can_edit(&self, screen: Screen) -> bool {
        match self {
            Identity::Admin => matches!(
                screen,
                Screen::Agents | Screen::Vendors | Screen::Services | Screen::Contracts
            ),
            Identity::Agent(_) => screen == Screen::Contracts,
            Identity::Vendor(_) => screen == Screen::Services,
        }
    }
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Login,
    Normal,
    Searching,
    Form(Form),
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete { screen: Screen, id: String },
}

/// 添加/编辑表单
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub screen: Screen,
    pub editing: Option<String>, // 正在编辑的记录 id，None 表示新建
    pub labels: &'static [&'static str],
    pub values: Vec<String>,
    pub focus: usize,
}

impl Form {
    pub fn new(screen: Screen, labels: &'static [&'static str]) -> Self {
        Self {
            screen,
            editing: None,
            labels,
            values: vec![String::new(); labels.len()],
            focus: 0,
        }
    }

    pub fn editing(
        screen: Screen,
        labels: &'static [&'static str],
        id: String,
        values: Vec<String>,
    ) -> Self {
        Self {
            screen,
            editing: Some(id),
            labels,
            values,
            focus: 0,
        }
    }

    pub fn title(&self) -> String {
        match self.editing {
            Some(_) => format!("Edit {}", self.screen.noun()),
            None => format!("New {}", self.screen.noun()),
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.values.len().max(1);
    }

    pub fn prev_field(&mut self) {
        let len = self.values.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn input(&mut self, c: char) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }
}

/// 每个页面一张表格，登录时重建（交互状态随之丢弃）
pub struct Tables {
    pub agents: TableView<Agent>,
    pub vendors: TableView<Vendor>,
    pub services: TableView<Service>,
    pub contracts: TableView<Contract>,
    pub messages: TableView<Message>,
    pub reports: TableView<ReportRow>,
}

impl Tables {
    pub fn new(page_size: usize) -> Self {
        Self {
            agents: TableView::new(agent_columns()).with_page_size(page_size),
            vendors: TableView::new(vendor_columns()).with_page_size(page_size),
            services: TableView::new(service_columns()).with_page_size(page_size),
            contracts: TableView::new(contract_columns()).with_page_size(page_size),
            messages: TableView::new(message_columns()).with_page_size(page_size),
            reports: TableView::new(report_columns()).with_page_size(page_size),
        }
    }
}

/// 按当前身份过滤后的显示数据
#[derive(Default)]
pub struct Rows {
    pub agents: Vec<Agent>,
    pub vendors: Vec<Vendor>,
    pub services: Vec<Service>,
    pub contracts: Vec<Contract>,
    pub messages: Vec<Message>,
    pub reports: Vec<ReportRow>,
}

/// 与具体记录类型无关的表格操作
pub trait TableControl {
    fn push_search_char(&mut self, c: char);
    fn pop_search_char(&mut self);
    fn clear_search(&mut self);
    fn click_header(&mut self, index: usize) -> bool;
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn select_next(&mut self);
    fn select_prev(&mut self);
    fn selected_key(&self) -> Option<String>;
}

struct Bound<'a, R> {
    view: &'a mut TableView<R>,
    rows: &'a [R],
}

impl<R: TableRecord> TableControl for Bound<'_, R> {
    fn push_search_char(&mut self, c: char) {
        self.view.push_search_char(c);
    }

    fn pop_search_char(&mut self) {
        self.view.pop_search_char();
    }

    fn clear_search(&mut self) {
        self.view.state.set_search("");
        self.view.selected = 0;
    }

    fn click_header(&mut self, index: usize) -> bool {
        self.view.click_header(index)
    }

    fn next_page(&mut self) {
        self.view.next_page(self.rows);
    }

    fn prev_page(&mut self) {
        self.view.prev_page();
    }

    fn select_next(&mut self) {
        self.view.select_next(self.rows);
    }

    fn select_prev(&mut self) {
        self.view.select_prev();
    }

    fn selected_key(&self) -> Option<String> {
        let slice = self.view.view(self.rows);
        slice
            .rows
            .get(self.view.selected)
            .map(|record| row_key(*record, slice.range.start + self.view.selected))
    }
}

/// 应用状态
pub struct App {
    pub desk: Desk,
    pub identity: Option<Identity>,
    pub screen: Screen,
    pub tables: Tables,
    pub rows: Rows,
    pub mode: AppMode,
    pub message: Option<String>,
    pub loading: bool,
    pub pending_reload: bool, // 下一帧绘制后加载数据集
    pub login_choices: Vec<Identity>,
    pub login_index: usize,
    pub page_size: usize,
    pub export_path: Option<PathBuf>,
}

impl App {
    /// 创建新的应用实例；数据在首帧（加载状态）绘制后加载
    pub fn new(desk: Desk, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut app = Self {
            desk,
            identity: None,
            screen: Screen::Contracts,
            tables: Tables::new(page_size),
            rows: Rows::default(),
            mode: AppMode::Login,
            message: None,
            loading: true,
            pending_reload: true,
            login_choices: Vec::new(),
            login_index: 0,
            page_size,
            export_path: None,
        };
        app.refresh();
        app
    }

    /// 以默认分页大小创建并立即视为已加载
    #[cfg(test)]
    pub fn loaded(desk: Desk) -> Self {
        let mut app = Self::new(desk, crate::table::engine::DEFAULT_PAGE_SIZE);
        app.loading = false;
        app.pending_reload = false;
        app
    }

    /// 刷新显示数据：按身份过滤并修正各表格的页码
    pub fn refresh(&mut self) {
        self.login_choices = std::iter::once(Identity::Admin)
            .chain(
                self.desk
                    .agents
                    .list()
                    .iter()
                    .map(|a| Identity::Agent(a.name.clone())),
            )
            .chain(
                self.desk
                    .vendors
                    .list()
                    .iter()
                    .map(|v| Identity::Vendor(v.name.clone())),
            )
            .collect();
        if self.login_index >= self.login_choices.len() {
            self.login_index = self.login_choices.len().saturating_sub(1);
        }

        let identity = self.identity.clone().unwrap_or(Identity::Admin);
        let rows = &mut self.rows;

        rows.agents = match identity {
            Identity::Admin => self.desk.agents.list().to_vec(),
            _ => Vec::new(),
        };
        rows.vendors = self.desk.vendors.list().to_vec();
        rows.services = self
            .desk
            .services
            .list()
            .iter()
            .filter(|s| match &identity {
                Identity::Vendor(name) => &s.vendor == name,
                _ => true,
            })
            .cloned()
            .collect();
        rows.contracts = self
            .desk
            .contracts
            .list()
            .iter()
            .filter(|c| match &identity {
                Identity::Admin => true,
                Identity::Agent(name) => &c.agent == name,
                Identity::Vendor(name) => &c.vendor == name,
            })
            .cloned()
            .collect();
        rows.messages = self
            .desk
            .messages
            .list()
            .iter()
            .filter(|m| match &identity {
                Identity::Admin => true,
                other => m.from == other.name() || m.to == other.name(),
            })
            .cloned()
            .collect();
        rows.reports = vendor_report(self.desk.contracts.list());

        self.tables.agents.sync(&rows.agents);
        self.tables.vendors.sync(&rows.vendors);
        self.tables.services.sync(&rows.services);
        self.tables.contracts.sync(&rows.contracts);
        self.tables.messages.sync(&rows.messages);
        self.tables.reports.sync(&rows.reports);
    }

    /// 当前页面的表格
    pub fn active_table(&mut self) -> Box<dyn TableControl + '_> {
        match self.screen {
            Screen::Agents => Box::new(Bound {
                view: &mut self.tables.agents,
                rows: &self.rows.agents,
            }),
            Screen::Vendors => Box::new(Bound {
                view: &mut self.tables.vendors,
                rows: &self.rows.vendors,
            }),
            Screen::Services => Box::new(Bound {
                view: &mut self.tables.services,
                rows: &self.rows.services,
            }),
            Screen::Contracts => Box::new(Bound {
                view: &mut self.tables.contracts,
                rows: &self.rows.contracts,
            }),
            Screen::Messages => Box::new(Bound {
                view: &mut self.tables.messages,
                rows: &self.rows.messages,
            }),
            Screen::Reports => Box::new(Bound {
                view: &mut self.tables.reports,
                rows: &self.rows.reports,
            }),
        }
    }

    /// 当前页面高亮行的 id
    pub fn selected_id(&mut self) -> Option<String> {
        self.active_table().selected_key()
    }

    pub fn can_create(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.can_create(self.screen))
    }

    pub fn can_edit(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.can_edit(self.screen))
    }
}
