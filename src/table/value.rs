//! 单元格取值
//!
//! 表格对记录字段的统一视图，用于搜索、排序和默认渲染

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// 单元格的值
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty, // 缺失字段，渲染为空
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// 类型序号，不同类型之间按此排序
    fn rank(&self) -> u8 {
        match self {
            Value::Empty => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Number(_) => 2,
            Value::Text(_) => 3,
            Value::Date(_) => 4,
        }
    }

    /// 全序比较；相等时返回 Equal，保证稳定排序不打乱并列项
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Number(b)) => (*a as f64).total_cmp(b),
            (Value::Number(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// 搜索时使用的小写字符串形式，数字不做舍入
    pub fn search_text(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            _ => self.to_string().to_lowercase(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{:.2}", n),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_compare_across_int_and_number() {
        assert_eq!(Value::Int(2).compare(&Value::Number(2.5)), Ordering::Less);
        assert_eq!(Value::Number(3.0).compare(&Value::Int(3)), Ordering::Equal);
    }

    #[test]
    fn test_dates_order_chronologically() {
        let a = Value::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let b = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_search_text_keeps_full_precision() {
        let value = Value::Number(1234.5678);
        assert_eq!(value.to_string(), "1234.57");
        assert!(value.search_text().contains("1234.567"));
        assert_eq!(Value::Bool(true).search_text(), "true");
        assert_eq!(Value::Text("Acme".into()).search_text(), "acme");
    }

    #[test]
    fn test_empty_renders_blank() {
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::from(None::<String>), Value::Empty);
    }
}
