//! 表格视图引擎
//!
//! 对任意记录集合做搜索、排序与分页，并渲染为 ratatui 表格：
//! - value.rs: 单元格取值与比较
//! - column.rs: 列描述与记录接口
//! - state.rs: 交互状态 (搜索词/排序/页码)
//! - engine.rs: 过滤 → 排序 → 分页
//! - render.rs: 渲染

pub mod column;
pub mod engine;
pub mod render;
pub mod state;
pub mod value;

pub use column::{Column, TableRecord, row_key};
pub use engine::TableView;
pub use render::{TableProps, render_table};
pub use value::Value;
