use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::Entity;
use crate::table::{TableRecord, Value};

/// 表单校验错误
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: '{value}' is not a date (YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field}: '{value}' is not a known value")]
    UnknownReference { field: &'static str, value: String },
    #[error("end date must not be before start date")]
    DateOrder,
}

/// 可通过表单创建/编辑的记录
pub trait FormRecord: Sized {
    /// 字段标签，顺序与 to_fields / from_fields 一致
    const FIELDS: &'static [&'static str];

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(id: String, fields: &[String]) -> Result<Self, FormError>;
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn field<'a>(fields: &'a [String], index: usize) -> &'a str {
    fields.get(index).map(|s| s.trim()).unwrap_or("")
}

fn required(fields: &[String], index: usize, label: &'static str) -> Result<String, FormError> {
    let value = field(fields, index);
    if value.is_empty() {
        return Err(FormError::Required(label));
    }
    Ok(value.to_string())
}

fn number(fields: &[String], index: usize, label: &'static str) -> Result<f64, FormError> {
    let value = required(fields, index, label)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(FormError::InvalidNumber {
            field: label,
            value,
        })
}

fn date(fields: &[String], index: usize, label: &'static str) -> Result<NaiveDate, FormError> {
    let value = required(fields, index, label)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate { field: label, value })
}

// ============ 代理人 ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub region: String,
}

impl Entity for Agent {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TableRecord for Agent {
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.as_str()),
            Value::from(self.name.as_str()),
            Value::from(self.email.as_str()),
            Value::from(self.phone.as_str()),
            Value::from(self.region.as_str()),
        ]
    }
}

impl FormRecord for Agent {
    const FIELDS: &'static [&'static str] = &["Name", "Email", "Phone", "Region"];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.region.clone(),
        ]
    }

    fn from_fields(id: String, fields: &[String]) -> Result<Self, FormError> {
        Ok(Self {
            id,
            name: required(fields, 0, "Name")?,
            email: required(fields, 1, "Email")?,
            phone: field(fields, 2).to_string(),
            region: field(fields, 3).to_string(),
        })
    }
}

// ============ 供应商 ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub category: String,
}

impl Entity for Vendor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TableRecord for Vendor {
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.as_str()),
            Value::from(self.name.as_str()),
            Value::from(self.email.as_str()),
            Value::from(self.category.as_str()),
        ]
    }
}

impl FormRecord for Vendor {
    const FIELDS: &'static [&'static str] = &["Name", "Email", "Category"];

    fn to_fields(&self) -> Vec<String> {
        vec![self.name.clone(), self.email.clone(), self.category.clone()]
    }

    fn from_fields(id: String, fields: &[String]) -> Result<Self, FormError> {
        Ok(Self {
            id,
            name: required(fields, 0, "Name")?,
            email: required(fields, 1, "Email")?,
            category: field(fields, 2).to_string(),
        })
    }
}

// ============ 服务 ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub vendor: String, // 供应商名称
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

impl Entity for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TableRecord for Service {
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.as_str()),
            Value::from(self.name.as_str()),
            Value::from(self.vendor.as_str()),
            Value::Number(self.price),
            Value::from(self.description.as_str()),
        ]
    }
}

impl FormRecord for Service {
    const FIELDS: &'static [&'static str] = &["Name", "Vendor", "Price", "Description"];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.vendor.clone(),
            self.price.to_string(),
            self.description.clone(),
        ]
    }

    fn from_fields(id: String, fields: &[String]) -> Result<Self, FormError> {
        Ok(Self {
            id,
            name: required(fields, 0, "Name")?,
            vendor: required(fields, 1, "Vendor")?,
            price: number(fields, 2, "Price")?,
            description: field(fields, 3).to_string(),
        })
    }
}

// ============ 合同 ============

/// 合同状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    #[default]
    Draft,
    Active,
    Completed,
    Terminated,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Completed,
        ContractStatus::Terminated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub agent: String,  // 代理人名称
    pub vendor: String, // 供应商名称
    #[serde(default)]
    pub service: String,
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: ContractStatus,
}

impl Entity for Contract {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TableRecord for Contract {
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.as_str()),
            Value::from(self.title.as_str()),
            Value::from(self.agent.as_str()),
            Value::from(self.vendor.as_str()),
            Value::from(self.service.as_str()),
            Value::Number(self.value),
            Value::Date(self.start_date),
            Value::Date(self.end_date),
            Value::from(self.status.as_str()),
        ]
    }
}

impl FormRecord for Contract {
    const FIELDS: &'static [&'static str] = &[
        "Title", "Agent", "Vendor", "Service", "Value", "Start", "End", "Status",
    ];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.agent.clone(),
            self.vendor.clone(),
            self.service.clone(),
            self.value.to_string(),
            self.start_date.format("%Y-%m-%d").to_string(),
            self.end_date.format("%Y-%m-%d").to_string(),
            self.status.as_str().to_string(),
        ]
    }

    fn from_fields(id: String, fields: &[String]) -> Result<Self, FormError> {
        let start_date = date(fields, 5, "Start")?;
        let end_date = date(fields, 6, "End")?;
        if end_date < start_date {
            return Err(FormError::DateOrder);
        }
        let status = match field(fields, 7) {
            "" => ContractStatus::Draft,
            s => ContractStatus::parse(s).ok_or(FormError::UnknownReference {
                field: "Status",
                value: s.to_string(),
            })?,
        };
        Ok(Self {
            id,
            title: required(fields, 0, "Title")?,
            agent: required(fields, 1, "Agent")?,
            vendor: required(fields, 2, "Vendor")?,
            service: field(fields, 3).to_string(),
            value: number(fields, 4, "Value")?,
            start_date,
            end_date,
            status,
        })
    }
}

// ============ 消息 ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub sent_at: DateTime<Local>,
}

impl Message {
    pub fn new(from: String, to: String, subject: String, body: String) -> Self {
        Self {
            id: new_id(),
            from,
            to,
            subject,
            body,
            sent_at: Local::now(),
        }
    }
}

impl Entity for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TableRecord for Message {
    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.as_str()),
            Value::from(self.from.as_str()),
            Value::from(self.to.as_str()),
            Value::from(self.subject.as_str()),
            Value::from(self.body.as_str()),
            Value::Text(self.sent_at.format("%Y-%m-%d %H:%M").to_string()),
        ]
    }
}

// ============ 报表 ============

/// 按供应商汇总的合同报表行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub vendor: String,
    pub contracts: usize,
    pub active: usize,
    pub total_value: f64,
}

impl TableRecord for ReportRow {
    fn key(&self) -> Option<String> {
        Some(self.vendor.clone())
    }

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.vendor.as_str()),
            Value::from(self.contracts),
            Value::from(self.active),
            Value::Number(self.total_value),
        ]
    }
}

/// 汇总合同，按供应商首次出现的顺序输出
pub fn vendor_report(contracts: &[Contract]) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = Vec::new();
    for contract in contracts {
        let index = match rows.iter().position(|r| r.vendor == contract.vendor) {
            Some(index) => index,
            None => {
                rows.push(ReportRow {
                    vendor: contract.vendor.clone(),
                    contracts: 0,
                    active: 0,
                    total_value: 0.0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];
        row.contracts += 1;
        if contract.status == ContractStatus::Active {
            row.active += 1;
        }
        row.total_value += contract.value;
    }
    rows
}

// ============ 数据集文件 ============

/// TOML 数据集文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub meta: DatasetMeta,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub version: String,
    pub generated_at: DateTime<Local>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            meta: DatasetMeta {
                version: "1.0".to_string(),
                generated_at: Local::now(),
            },
            agents: Vec::new(),
            vendors: Vec::new(),
            services: Vec::new(),
            contracts: Vec::new(),
            messages: Vec::new(),
        }
    }
}
