//! 列描述与记录接口

use ratatui::layout::Constraint;

use super::value::Value;

/// 可被表格展示的记录
pub trait TableRecord {
    /// 稳定的唯一标识；没有时由表格退回到位置序号
    fn key(&self) -> Option<String> {
        None
    }

    /// 记录自身的全部字段值（搜索范围）
    fn field_values(&self) -> Vec<Value>;
}

/// 渲染 key：优先记录 id，否则使用位置序号
pub fn row_key<R: TableRecord>(record: &R, index: usize) -> String {
    record.key().unwrap_or_else(|| index.to_string())
}

type Accessor<R> = Box<dyn Fn(&R) -> Value>;
type Renderer<R> = Box<dyn Fn(&Value, &R) -> String>;

/// 列描述
pub struct Column<R> {
    pub accessor: &'static str,
    pub header: String,
    pub sortable: bool,
    pub width: Constraint,
    value: Accessor<R>,
    renderer: Option<Renderer<R>>,
}

impl<R> Column<R> {
    pub fn new(
        accessor: &'static str,
        header: impl Into<String>,
        value: impl Fn(&R) -> Value + 'static,
    ) -> Self {
        Self {
            accessor,
            header: header.into(),
            sortable: false,
            width: Constraint::Fill(1),
            value: Box::new(value),
            renderer: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: Constraint) -> Self {
        self.width = width;
        self
    }

    pub fn render_with(mut self, renderer: impl Fn(&Value, &R) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// 读取该列的值
    pub fn value(&self, record: &R) -> Value {
        (self.value)(record)
    }

    /// 单元格文本：有自定义渲染器时使用之
    pub fn cell_text(&self, record: &R) -> String {
        let value = self.value(record);
        match &self.renderer {
            Some(render) => render(&value, record),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(i64);

    impl TableRecord for Plain {
        fn field_values(&self) -> Vec<Value> {
            vec![Value::Int(self.0)]
        }
    }

    #[test]
    fn test_row_key_falls_back_to_index() {
        assert_eq!(row_key(&Plain(7), 3), "3");
    }

    #[test]
    fn test_renderer_overrides_display() {
        let col = Column::new("n", "N", |p: &Plain| Value::Int(p.0))
            .render_with(|v, _| format!("#{}", v));
        assert_eq!(col.cell_text(&Plain(5)), "#5");
        assert_eq!(col.value(&Plain(5)), Value::Int(5));
    }
}
