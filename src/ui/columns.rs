//! 各页面的列定义

use ratatui::layout::Constraint;

use crate::models::{Agent, Contract, Message, ReportRow, Service, Vendor};
use crate::table::{Column, Value};

fn money<R>(value: &Value, _: &R) -> String {
    match value {
        Value::Number(n) => format!("$ {:.2}", n),
        other => other.to_string(),
    }
}

pub fn agent_columns() -> Vec<Column<Agent>> {
    vec![
        Column::new("name", "Name", |a: &Agent| Value::from(a.name.as_str())).sortable(),
        Column::new("email", "Email", |a: &Agent| Value::from(a.email.as_str())).sortable(),
        Column::new("phone", "Phone", |a: &Agent| Value::from(a.phone.as_str()))
            .width(Constraint::Length(10)),
        Column::new("region", "Region", |a: &Agent| Value::from(a.region.as_str()))
            .sortable()
            .width(Constraint::Length(10)),
    ]
}

pub fn vendor_columns() -> Vec<Column<Vendor>> {
    vec![
        Column::new("name", "Name", |v: &Vendor| Value::from(v.name.as_str())).sortable(),
        Column::new("email", "Email", |v: &Vendor| Value::from(v.email.as_str())),
        Column::new("category", "Category", |v: &Vendor| {
            Value::from(v.category.as_str())
        })
        .sortable(),
    ]
}

pub fn service_columns() -> Vec<Column<Service>> {
    vec![
        Column::new("name", "Service", |s: &Service| Value::from(s.name.as_str())).sortable(),
        Column::new("vendor", "Vendor", |s: &Service| Value::from(s.vendor.as_str())).sortable(),
        Column::new("price", "Price", |s: &Service| Value::Number(s.price))
            .sortable()
            .width(Constraint::Length(14))
            .render_with(money),
    ]
}

pub fn contract_columns() -> Vec<Column<Contract>> {
    vec![
        Column::new("title", "Title", |c: &Contract| Value::from(c.title.as_str())).sortable(),
        Column::new("agent", "Agent", |c: &Contract| Value::from(c.agent.as_str())).sortable(),
        Column::new("vendor", "Vendor", |c: &Contract| Value::from(c.vendor.as_str())).sortable(),
        Column::new("value", "Value", |c: &Contract| Value::Number(c.value))
            .sortable()
            .width(Constraint::Length(14))
            .render_with(money),
        Column::new("start", "Start", |c: &Contract| Value::Date(c.start_date))
            .sortable()
            .width(Constraint::Length(12)),
        Column::new("end", "End", |c: &Contract| Value::Date(c.end_date))
            .sortable()
            .width(Constraint::Length(12)),
        Column::new("status", "Status", |c: &Contract| Value::from(c.status.as_str()))
            .sortable()
            .width(Constraint::Length(12)),
    ]
}

pub fn message_columns() -> Vec<Column<Message>> {
    vec![
        Column::new("sent", "Sent", |m: &Message| {
            Value::Text(m.sent_at.format("%Y-%m-%d %H:%M").to_string())
        })
        .sortable()
        .width(Constraint::Length(18)),
        Column::new("from", "From", |m: &Message| Value::from(m.from.as_str())).sortable(),
        Column::new("to", "To", |m: &Message| Value::from(m.to.as_str())).sortable(),
        Column::new("subject", "Subject", |m: &Message| Value::from(m.subject.as_str())),
    ]
}

pub fn report_columns() -> Vec<Column<ReportRow>> {
    vec![
        Column::new("vendor", "Vendor", |r: &ReportRow| Value::from(r.vendor.as_str())).sortable(),
        Column::new("contracts", "Contracts", |r: &ReportRow| Value::from(r.contracts))
            .sortable()
            .width(Constraint::Length(14)),
        Column::new("active", "Active", |r: &ReportRow| Value::from(r.active))
            .sortable()
            .width(Constraint::Length(12)),
        Column::new("total", "Total value", |r: &ReportRow| Value::Number(r.total_value))
            .sortable()
            .width(Constraint::Length(16))
            .render_with(money),
    ]
}
