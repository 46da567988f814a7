//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use log::{error, info, warn};

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, Form, Identity, Screen, Tables};
use crate::error::{AppError, Result};
use crate::models::{
    Agent, Contract, Dataset, FormError, FormRecord, Message, Service, Vendor, new_id,
};
use crate::storage::save_dataset;
use crate::store::{Entity, Store};
use crate::table::{TableRecord, TableView};

const MESSAGE_FIELDS: &[&str] = &["To", "Subject", "Body"];

/// 新建或整体替换
fn save_record<T: Entity>(store: &mut dyn Store<T>, item: T, editing: bool) -> Result<()> {
    if editing {
        store.update(item)?;
    } else {
        store.create(item)?;
    }
    Ok(())
}

fn row_hint<R: 'static>(text: Option<&'static str>) -> Option<Box<dyn Fn(&R) -> String>> {
    text.map(|text| Box::new(move |_: &R| text.to_string()) as Box<dyn Fn(&R) -> String>)
}

fn selected_fields<R: FormRecord + TableRecord>(
    view: &TableView<R>,
    rows: &[R],
) -> Option<Vec<String>> {
    view.selected_record(rows).map(FormRecord::to_fields)
}

impl App {
    /// 核心逻辑分发，返回是否退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::NextScreen => self.switch_screen(1),
            Action::PrevScreen => self.switch_screen(-1),
            Action::StartSearch => self.mode = AppMode::Searching,
            Action::NextPage => self.active_table().next_page(),
            Action::PrevPage => self.active_table().prev_page(),
            Action::SortColumn(index) => {
                if !self.active_table().click_header(index) {
                    self.message = Some(format!("column {} is not sortable", index + 1));
                }
            }

            Action::StartAdd => self.start_add(),
            Action::StartEdit => self.start_edit(),
            Action::StartDelete => self.start_delete(),
            Action::Reload => self.request_reload(),
            Action::Export => self.export(),
            Action::Logout => self.logout(),

            Action::NextField => {
                if let AppMode::Form(form) = &mut self.mode {
                    form.next_field();
                }
            }
            Action::PrevField => {
                if let AppMode::Form(form) = &mut self.mode {
                    form.prev_field();
                }
            }

            Action::Cancel => self.cancel(),

            Action::Submit => match self.mode {
                AppMode::Login => self.confirm_login(),
                AppMode::Searching => self.mode = AppMode::Normal,
                AppMode::Form(_) => self.submit_form(),
                AppMode::Confirm(_) => self.execute_confirm(),
                AppMode::Normal => {}
            },

            Action::Input(c) => {
                if self.mode == AppMode::Searching {
                    self.active_table().push_search_char(c);
                } else if let AppMode::Form(form) = &mut self.mode {
                    form.input(c);
                }
            }

            Action::DeleteChar => {
                if self.mode == AppMode::Searching {
                    self.active_table().pop_search_char();
                } else if let AppMode::Form(form) = &mut self.mode {
                    form.delete_char();
                }
            }
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        match self.mode {
            AppMode::Login => self.login_index = self.login_index.saturating_sub(1),
            _ => self.active_table().select_prev(),
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        match self.mode {
            AppMode::Login => {
                if self.login_index + 1 < self.login_choices.len() {
                    self.login_index += 1;
                }
            }
            _ => self.active_table().select_next(),
        }
    }

    /// 在当前身份可见的页面间循环切换
    pub fn switch_screen(&mut self, step: isize) {
        let Some(identity) = &self.identity else {
            return;
        };
        let screens = identity.screens();
        let current = screens.iter().position(|s| *s == self.screen).unwrap_or(0) as isize;
        let len = screens.len() as isize;
        self.screen = screens[(current + step).rem_euclid(len) as usize];
        self.message = None;
    }

    // ============ 登录相关 ============

    pub fn confirm_login(&mut self) {
        if self.loading {
            return;
        }
        if let Some(identity) = self.login_choices.get(self.login_index).cloned() {
            self.login(identity);
        }
    }

    /// 以指定身份进入对应的面板
    pub fn login(&mut self, identity: Identity) {
        info!("login as {} ({})", identity.name(), identity.role());
        self.screen = identity.screens()[0];
        self.tables = Tables::new(self.page_size);
        self.identity = Some(identity);
        self.configure_row_actions();
        self.refresh();
        self.mode = AppMode::Normal;
        self.message = None;
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            info!("logout {}", identity.name());
        }
        self.mode = AppMode::Login;
        self.message = None;
        self.refresh();
    }

    /// 为可编辑的页面挂载行操作提示
    fn configure_row_actions(&mut self) {
        let Some(identity) = &self.identity else {
            return;
        };
        let hint = |screen: Screen| identity.can_edit(screen).then_some("[e] edit  [d] delete");

        let tables = &mut self.tables;
        tables.agents.set_row_actions(row_hint(hint(Screen::Agents)));
        tables.vendors.set_row_actions(row_hint(hint(Screen::Vendors)));
        tables.services.set_row_actions(row_hint(hint(Screen::Services)));
        tables.contracts.set_row_actions(row_hint(hint(Screen::Contracts)));
    }

    // ============ 加载/导出 ============

    /// 请求重新加载数据集：先绘制加载状态，主循环随后执行加载
    pub fn request_reload(&mut self) {
        self.loading = true;
        self.pending_reload = true;
        self.message = Some("reloading dataset...".to_string());
    }

    /// 加载完成后回填数据
    pub fn finish_reload(&mut self, result: Result<Dataset>) {
        self.loading = false;
        self.pending_reload = false;
        match result {
            Ok(data) => {
                let count = data.contracts.len();
                self.desk.reload(data);
                self.refresh();
                self.message = Some(format!("loaded {} contracts", count));
            }
            Err(e) => {
                error!("dataset load failed: {}", e);
                self.message = Some(format!("load failed: {}", e));
            }
        }
    }

    pub fn export(&mut self) {
        let Some(path) = self.export_path.clone() else {
            self.message = Some("export is not configured".to_string());
            return;
        };
        self.message = Some(match save_dataset(&self.desk.to_dataset(), &path) {
            Ok(()) => format!("exported to {}", path.display()),
            Err(e) => {
                error!("export failed: {}", e);
                format!("export failed: {}", e)
            }
        });
    }

    // ============ 添加/编辑相关 ============

    /// 开始新建记录
    pub fn start_add(&mut self) {
        if !self.can_create() {
            self.message = Some(format!("you cannot add {}s", self.screen.noun()));
            return;
        }
        let mut form = match self.screen {
            Screen::Agents => Form::new(self.screen, Agent::FIELDS),
            Screen::Vendors => Form::new(self.screen, Vendor::FIELDS),
            Screen::Services => Form::new(self.screen, Service::FIELDS),
            Screen::Contracts => Form::new(self.screen, Contract::FIELDS),
            Screen::Messages => Form::new(self.screen, MESSAGE_FIELDS),
            Screen::Reports => return,
        };

        // 非管理员只能以自己的名义创建
        match (&self.identity, self.screen) {
            (Some(Identity::Agent(name)), Screen::Contracts) => form.values[1] = name.clone(),
            (Some(Identity::Vendor(name)), Screen::Services) => form.values[1] = name.clone(),
            _ => {}
        }
        self.mode = AppMode::Form(form);
    }

    /// 开始编辑高亮行
    pub fn start_edit(&mut self) {
        if !self.can_edit() {
            self.message = Some(format!("you cannot edit {}s", self.screen.noun()));
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let (tables, rows) = (&self.tables, &self.rows);
        let (labels, values) = match self.screen {
            Screen::Agents => (Agent::FIELDS, selected_fields(&tables.agents, &rows.agents)),
            Screen::Vendors => (Vendor::FIELDS, selected_fields(&tables.vendors, &rows.vendors)),
            Screen::Services => {
                (Service::FIELDS, selected_fields(&tables.services, &rows.services))
            }
            Screen::Contracts => {
                (Contract::FIELDS, selected_fields(&tables.contracts, &rows.contracts))
            }
            Screen::Messages | Screen::Reports => return,
        };
        if let Some(values) = values {
            self.mode = AppMode::Form(Form::editing(self.screen, labels, id, values));
        }
    }

    /// 提交表单；失败时保留表单并显示错误
    pub fn submit_form(&mut self) {
        let AppMode::Form(form) = &self.mode else {
            return;
        };
        let form = form.clone();
        match self.save_form(&form) {
            Ok(()) => {
                let verb = if form.editing.is_some() { "updated" } else { "created" };
                info!("{} {}", form.screen.noun(), verb);
                self.mode = AppMode::Normal;
                self.message = Some(format!("{} {}", form.screen.noun(), verb));
                self.refresh();
            }
            Err(e) => {
                warn!("{} rejected: {}", form.screen.noun(), e);
                self.message = Some(e.to_string());
            }
        }
    }

    fn save_form(&mut self, form: &Form) -> Result<()> {
        let editing = form.editing.is_some();
        let id = form.editing.clone().unwrap_or_else(new_id);
        let values = &form.values;

        match form.screen {
            Screen::Agents => {
                let agent = Agent::from_fields(id, values)?;
                let previous = self.desk.agents.get(agent.id()).map(|a| a.name.clone());
                let name = agent.name.clone();
                save_record(self.desk.agents.as_mut(), agent, editing)?;
                if let Some(previous) = previous {
                    self.desk.rename_agent(&previous, &name)?;
                }
                Ok(())
            }
            Screen::Vendors => {
                let vendor = Vendor::from_fields(id, values)?;
                let previous = self.desk.vendors.get(vendor.id()).map(|v| v.name.clone());
                let name = vendor.name.clone();
                save_record(self.desk.vendors.as_mut(), vendor, editing)?;
                if let Some(previous) = previous {
                    self.desk.rename_vendor(&previous, &name)?;
                }
                Ok(())
            }
            Screen::Services => {
                let service = Service::from_fields(id, values)?;
                self.check_service(&service)?;
                save_record(self.desk.services.as_mut(), service, editing)
            }
            Screen::Contracts => {
                let contract = Contract::from_fields(id, values)?;
                self.check_contract(&contract)?;
                save_record(self.desk.contracts.as_mut(), contract, editing)
            }
            Screen::Messages => {
                let message = self.compose_message(values)?;
                save_record(self.desk.messages.as_mut(), message, false)
            }
            Screen::Reports => Ok(()),
        }
    }

    fn check_service(&self, service: &Service) -> std::result::Result<(), FormError> {
        let own = match &self.identity {
            Some(Identity::Vendor(name)) => &service.vendor == name,
            _ => true,
        };
        if !own || self.desk.vendor_named(&service.vendor).is_none() {
            return Err(FormError::UnknownReference {
                field: "Vendor",
                value: service.vendor.clone(),
            });
        }
        Ok(())
    }

    fn check_contract(&self, contract: &Contract) -> std::result::Result<(), FormError> {
        let own_agent = match &self.identity {
            Some(Identity::Agent(name)) => &contract.agent == name,
            _ => true,
        };
        if !own_agent || self.desk.agent_named(&contract.agent).is_none() {
            return Err(FormError::UnknownReference {
                field: "Agent",
                value: contract.agent.clone(),
            });
        }
        if self.desk.vendor_named(&contract.vendor).is_none() {
            return Err(FormError::UnknownReference {
                field: "Vendor",
                value: contract.vendor.clone(),
            });
        }
        Ok(())
    }

    fn compose_message(&self, values: &[String]) -> Result<Message> {
        let field = |i: usize| values.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        let (to, subject, body) = (field(0), field(1), field(2));
        if to.is_empty() {
            return Err(FormError::Required("To").into());
        }
        if subject.is_empty() {
            return Err(FormError::Required("Subject").into());
        }
        if !self.desk.is_known_identity(&to) {
            return Err(AppError::Form(FormError::UnknownReference {
                field: "To",
                value: to,
            }));
        }
        let from = self
            .identity
            .as_ref()
            .map(|i| i.name().to_string())
            .unwrap_or_default();
        Ok(Message::new(from, to, subject, body))
    }

    // ============ 删除相关 ============

    /// 开始删除高亮行
    pub fn start_delete(&mut self) {
        if !self.can_edit() {
            self.message = Some(format!("you cannot delete {}s", self.screen.noun()));
            return;
        }
        if let Some(id) = self.selected_id() {
            self.mode = AppMode::Confirm(ConfirmAction::Delete {
                screen: self.screen,
                id,
            });
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        let AppMode::Confirm(ConfirmAction::Delete { screen, id }) = &self.mode else {
            return;
        };
        let (screen, id) = (*screen, id.clone());

        let result = match screen {
            Screen::Agents => self.desk.delete_agent(&id),
            Screen::Vendors => self.desk.delete_vendor(&id),
            Screen::Services => self.desk.services.delete(&id).map(drop),
            Screen::Contracts => self.desk.contracts.delete(&id).map(drop),
            Screen::Messages => self.desk.messages.delete(&id).map(drop),
            Screen::Reports => Ok(()),
        };
        self.message = Some(match result {
            Ok(()) => {
                info!("deleted {} {}", screen.noun(), id);
                format!("{} deleted", screen.noun())
            }
            Err(e) => {
                warn!("delete failed: {}", e);
                e.to_string()
            }
        });
        self.refresh();
        self.mode = AppMode::Normal;
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        match self.mode {
            AppMode::Login => return,
            AppMode::Searching => self.active_table().clear_search(),
            _ => {}
        }
        self.mode = AppMode::Normal;
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::Desk;
    use crate::sample::sample_dataset;

    fn logged_in(identity: Identity) -> App {
        let mut app = App::loaded(Desk::in_memory(sample_dataset()));
        app.login(identity);
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    #[test]
    fn test_login_picks_first_screen() {
        let mut app = App::loaded(Desk::in_memory(sample_dataset()));
        assert_eq!(app.mode, AppMode::Login);
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::Submit);
        assert_eq!(app.identity, Some(Identity::Agent("Alice Carter".to_string())));
        assert_eq!(app.screen, Screen::Contracts);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_login_blocked_while_loading() {
        let mut app = App::new(Desk::default(), 10);
        app.dispatch(Action::Submit);
        assert_eq!(app.identity, None);
    }

    #[test]
    fn test_search_then_escape_clears() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Vendors;
        app.dispatch(Action::StartSearch);
        type_text(&mut app, "ACME");
        assert_eq!(app.tables.vendors.view(&app.rows.vendors).filtered_count, 1);

        app.dispatch(Action::Cancel);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.tables.vendors.view(&app.rows.vendors).filtered_count, 5);
    }

    #[test]
    fn test_switch_screen_wraps() {
        let mut app = logged_in(Identity::Vendor("Acme Logistics".to_string()));
        assert_eq!(app.screen, Screen::Services);
        app.dispatch(Action::PrevScreen);
        assert_eq!(app.screen, Screen::Messages);
        app.dispatch(Action::NextScreen);
        assert_eq!(app.screen, Screen::Services);
    }

    #[test]
    fn test_sort_and_page_through_contracts() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Contracts;
        app.dispatch(Action::SortColumn(3));
        app.dispatch(Action::NextPage);
        app.dispatch(Action::NextPage);
        app.dispatch(Action::NextPage);
        let slice = app.tables.contracts.view(&app.rows.contracts);
        assert_eq!(slice.page, 3);
        assert_eq!(slice.rows.len(), 5);
        let values: Vec<f64> = slice.rows.iter().map(|c| c.value).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_add_vendor() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Vendors;
        app.dispatch(Action::StartAdd);
        type_text(&mut app, "Fresh Paint");
        app.dispatch(Action::NextField);
        type_text(&mut app, "hi@paint.example");
        app.dispatch(Action::Submit);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.desk.vendors.list().len(), 6);
        assert!(app.desk.vendor_named("Fresh Paint").is_some());
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Agents;
        app.dispatch(Action::StartAdd);
        app.dispatch(Action::Submit);
        assert!(matches!(app.mode, AppMode::Form(_)));
        assert_eq!(app.message.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_agent_contract_prefilled_and_checked() {
        let mut app = logged_in(Identity::Agent("Ben Okafor".to_string()));
        app.dispatch(Action::StartAdd);
        let AppMode::Form(form) = &mut app.mode else {
            panic!("expected form");
        };
        assert_eq!(form.values[1], "Ben Okafor");
        form.values = [
            "Pilot", "Ben Okafor", "Nobody Inc", "", "10", "2024-01-01", "2024-02-01", "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        app.dispatch(Action::Submit);
        assert!(matches!(app.mode, AppMode::Form(_)));
        assert_eq!(
            app.message.as_deref(),
            Some("Vendor: 'Nobody Inc' is not a known value")
        );

        if let AppMode::Form(form) = &mut app.mode {
            form.values[2] = "Bolt Electric".to_string();
        }
        let before = app.rows.contracts.len();
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.rows.contracts.len(), before + 1);
    }

    #[test]
    fn test_agent_cannot_edit_vendors() {
        let mut app = logged_in(Identity::Agent("Ben Okafor".to_string()));
        app.screen = Screen::Vendors;
        app.dispatch(Action::StartEdit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.message.as_deref(), Some("you cannot edit vendors"));
    }

    #[test]
    fn test_edit_selected_agent() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Agents;
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::StartEdit);
        let AppMode::Form(form) = &app.mode else {
            panic!("expected form");
        };
        assert_eq!(form.editing.as_deref(), Some("agent-2"));
        assert_eq!(form.values[0], "Ben Okafor");

        app.dispatch(Action::NextField);
        app.dispatch(Action::NextField);
        type_text(&mut app, "9");
        app.dispatch(Action::Submit);
        assert_eq!(
            app.desk.agents.get("agent-2").map(|a| a.phone.as_str()),
            Some("555-01029")
        );
    }

    #[test]
    fn test_rename_agent_keeps_contracts() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Agents;
        app.dispatch(Action::StartEdit);
        if let AppMode::Form(form) = &mut app.mode {
            form.values[0] = "Alice Renamed".to_string();
        }
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);

        app.login(Identity::Agent("Alice Renamed".to_string()));
        assert_eq!(app.rows.contracts.len(), 7);

        app.login(Identity::Admin);
        app.screen = Screen::Contracts;
        app.dispatch(Action::StartEdit);
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.message.as_deref(), Some("contract updated"));
    }

    #[test]
    fn test_delete_agent_with_contracts_is_refused() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Agents;
        app.dispatch(Action::StartDelete);
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.desk.agents.list().len(), 4);
        assert_eq!(
            app.message.as_deref(),
            Some("'Alice Carter' is still referenced by 7 record(s)")
        );
    }

    #[test]
    fn test_unchanged_edit_keeps_price() {
        let mut app = logged_in(Identity::Admin);
        let mut service = app.desk.services.list()[0].clone();
        service.price = 0.125;
        app.desk.services.update(service).unwrap();
        app.refresh();

        app.screen = Screen::Services;
        app.dispatch(Action::StartEdit);
        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.desk.services.get("service-1").map(|s| s.price), Some(0.125));
    }

    #[test]
    fn test_delete_last_row_clamps_page() {
        let mut app = logged_in(Identity::Admin);
        app.screen = Screen::Contracts;
        app.page_size = 12;
        app.tables = Tables::new(12);
        app.refresh();
        app.dispatch(Action::NextPage);
        app.dispatch(Action::NextPage);
        assert_eq!(app.tables.contracts.state.current_page, 3);

        app.dispatch(Action::StartDelete);
        assert!(matches!(app.mode, AppMode::Confirm(_)));
        app.dispatch(Action::Submit);

        assert_eq!(app.desk.contracts.list().len(), 24);
        assert_eq!(app.tables.contracts.state.current_page, 2);
        assert_eq!(app.message.as_deref(), Some("contract deleted"));
    }

    #[test]
    fn test_compose_message() {
        let mut app = logged_in(Identity::Vendor("Bolt Electric".to_string()));
        app.screen = Screen::Messages;
        assert!(app.rows.messages.is_empty());
        app.dispatch(Action::StartAdd);
        type_text(&mut app, "Ben Okafor");
        app.dispatch(Action::NextField);
        type_text(&mut app, "Quote");
        app.dispatch(Action::Submit);

        assert_eq!(app.rows.messages.len(), 1);
        assert_eq!(app.rows.messages[0].from, "Bolt Electric");
    }

    #[test]
    fn test_reload_cycle() {
        let mut app = logged_in(Identity::Admin);
        app.dispatch(Action::Reload);
        assert!(app.loading && app.pending_reload);
        app.finish_reload(Ok(Dataset::default()));
        assert!(!app.loading);
        assert!(app.rows.contracts.is_empty());
        assert_eq!(app.message.as_deref(), Some("loaded 0 contracts"));
    }

    #[test]
    fn test_row_actions_only_on_editable_tables() {
        let app = logged_in(Identity::Vendor("Acme Logistics".to_string()));
        assert!(app.tables.services.has_row_actions());
        assert!(!app.tables.contracts.has_row_actions());
    }
}
