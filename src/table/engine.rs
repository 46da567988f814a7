//! 过滤 → 排序 → 分页
//!
//! 每次渲染都从 View State 重新计算可见切片，不缓存结果

use std::ops::Range;

use super::column::{Column, TableRecord};
use super::state::{SortDirection, ViewState};

pub const DEFAULT_PAGE_SIZE: usize = 10;

type RowActions<R> = Box<dyn Fn(&R) -> String>;

/// 记录是否匹配搜索词（大小写不敏感的子串匹配，空词匹配全部）
pub fn matches<R: TableRecord>(record: &R, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .field_values()
        .iter()
        .any(|value| value.search_text().contains(&needle))
}

pub fn filter<'a, R: TableRecord>(records: &'a [R], term: &str) -> Vec<&'a R> {
    records.iter().filter(|r| matches(*r, term)).collect()
}

/// 稳定排序，并列项保持过滤后的相对顺序
pub fn sort_rows<R>(rows: &mut [&R], column: &Column<R>, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = column.value(a).compare(&column.value(b));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// 第 page 页（从 1 开始）在结果集中的下标范围
pub fn page_range(count: usize, page_size: usize, page: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(size).min(count);
    let end = (start + size).min(count);
    start..end
}

/// 一次计算得到的可见切片
#[derive(Debug)]
pub struct TableSlice<'a, R> {
    pub rows: Vec<&'a R>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub range: Range<usize>,
}

impl<R> TableSlice<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 页数不超过 1 时隐藏分页器
    pub fn show_pager(&self) -> bool {
        self.total_pages > 1
    }

    /// 形如 "1-10 of 25"
    pub fn range_label(&self) -> String {
        if self.filtered_count == 0 {
            return "0 of 0".to_string();
        }
        format!(
            "{}-{} of {}",
            self.range.start + 1,
            self.range.end,
            self.filtered_count
        )
    }
}

/// 表格视图引擎：列描述 + 交互状态
pub struct TableView<R> {
    pub columns: Vec<Column<R>>,
    pub page_size: usize,
    pub state: ViewState,
    pub selected: usize, // 当前页内高亮行
    row_actions: Option<RowActions<R>>,
}

impl<R: TableRecord> TableView<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            page_size: DEFAULT_PAGE_SIZE,
            state: ViewState::default(),
            selected: 0,
            row_actions: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn set_row_actions(&mut self, actions: Option<RowActions<R>>) {
        self.row_actions = actions;
    }

    pub fn has_row_actions(&self) -> bool {
        self.row_actions.is_some()
    }

    pub fn row_actions_text(&self, record: &R) -> String {
        self.row_actions
            .as_ref()
            .map(|actions| actions(record))
            .unwrap_or_default()
    }

    fn sort_column(&self) -> Option<&Column<R>> {
        self.state
            .sort_column
            .and_then(|accessor| self.columns.iter().find(|c| c.accessor == accessor))
    }

    /// 计算当前可见切片；不修改状态，相同输入得到相同结果
    pub fn view<'a>(&self, records: &'a [R]) -> TableSlice<'a, R> {
        let mut rows = filter(records, &self.state.search_term);
        if let Some(column) = self.sort_column() {
            sort_rows(&mut rows, column, self.state.sort_direction);
        }

        let filtered_count = rows.len();
        let total_pages = total_pages(filtered_count, self.page_size);
        let page = self.state.current_page.clamp(1, total_pages.max(1));
        let range = page_range(filtered_count, self.page_size, page);
        let rows = rows[range.clone()].to_vec();

        TableSlice {
            rows,
            filtered_count,
            total_pages,
            page,
            range,
        }
    }

    // ============ 交互 ============

    /// 激活第 index 个表头；不可排序的列忽略
    pub fn click_header(&mut self, index: usize) -> bool {
        match self.columns.get(index) {
            Some(column) if column.sortable => {
                self.state.toggle_sort(column.accessor);
                true
            }
            _ => false,
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.state.push_search_char(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.state.pop_search_char();
        self.selected = 0;
    }

    pub fn next_page(&mut self, records: &[R]) {
        let total = self.view(records).total_pages;
        let before = self.state.current_page;
        self.state.next_page(total);
        if self.state.current_page != before {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        let before = self.state.current_page;
        self.state.prev_page();
        if self.state.current_page != before {
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self, records: &[R]) {
        let visible = self.view(records).rows.len();
        if self.selected + 1 < visible {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// 数据刷新后修正越界的页码与高亮行
    pub fn sync(&mut self, records: &[R]) {
        let total = self.view(records).total_pages;
        self.state.clamp_page(total);
        let visible = self.view(records).rows.len();
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    /// 当前高亮的记录
    pub fn selected_record<'a>(&self, records: &'a [R]) -> Option<&'a R> {
        self.view(records).rows.get(self.selected).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        name: String,
        value: i64,
    }

    impl TableRecord for Item {
        fn key(&self) -> Option<String> {
            Some(self.id.to_string())
        }

        fn field_values(&self) -> Vec<Value> {
            vec![
                Value::Int(self.id),
                Value::Text(self.name.clone()),
                Value::Int(self.value),
            ]
        }
    }

    fn item(id: i64, name: &str, value: i64) -> Item {
        Item {
            id,
            name: name.to_string(),
            value,
        }
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column::new("id", "ID", |i: &Item| Value::Int(i.id)),
            Column::new("name", "Name", |i: &Item| Value::from(i.name.as_str())).sortable(),
            Column::new("value", "Value", |i: &Item| Value::Int(i.value)).sortable(),
        ]
    }

    fn ids(slice: &TableSlice<'_, Item>) -> Vec<i64> {
        slice.rows.iter().map(|i| i.id).collect()
    }

    fn numbered(n: i64) -> Vec<Item> {
        (0..n).map(|i| item(i, &format!("item{}", i), i)).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let records = vec![item(1, "Acme", 0), item(2, "Bolt", 0), item(3, "acme2", 0)];
        let mut view = TableView::new(columns());
        for c in "acme".chars() {
            view.push_search_char(c);
        }
        assert_eq!(ids(&view.view(&records)), vec![1, 3]);
    }

    #[test]
    fn test_search_matches_any_own_field() {
        let records = vec![item(1, "Acme", 300), item(2, "Bolt", 100)];
        assert_eq!(filter(&records, "30").len(), 1);
        assert_eq!(filter(&records, "").len(), 2);
        assert!(filter(&records, "zzz").is_empty());
    }

    #[test]
    fn test_first_page_of_twenty_five() {
        let records = numbered(25);
        let view = TableView::new(columns());
        let slice = view.view(&records);
        assert_eq!(ids(&slice), (0..10).collect::<Vec<_>>());
        assert_eq!(slice.total_pages, 3);
        assert_eq!(slice.range_label(), "1-10 of 25");
        assert!(slice.show_pager());
    }

    #[test]
    fn test_last_page_is_partial() {
        let records = numbered(25);
        let mut view = TableView::new(columns());
        view.next_page(&records);
        view.next_page(&records);
        view.next_page(&records);
        let slice = view.view(&records);
        assert_eq!(slice.page, 3);
        assert_eq!(ids(&slice), (20..25).collect::<Vec<_>>());
        assert_eq!(slice.range_label(), "21-25 of 25");
    }

    #[test]
    fn test_sort_toggle_reverses() {
        let records = vec![item(1, "a", 300), item(2, "b", 100), item(3, "c", 200)];
        let mut view = TableView::new(columns());
        assert!(view.click_header(2));
        let values: Vec<i64> = view.view(&records).rows.iter().map(|i| i.value).collect();
        assert_eq!(values, vec![100, 200, 300]);

        view.click_header(2);
        let values: Vec<i64> = view.view(&records).rows.iter().map(|i| i.value).collect();
        assert_eq!(values, vec![300, 200, 100]);
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let records = vec![item(3, "c", 0), item(1, "a", 0), item(2, "b", 0)];
        let view = TableView::new(columns());
        assert_eq!(ids(&view.view(&records)), vec![3, 1, 2]);
    }

    #[test]
    fn test_non_sortable_header_is_ignored() {
        let mut view = TableView::new(columns());
        assert!(!view.click_header(0));
        assert!(!view.click_header(9));
        assert_eq!(view.state.sort_column, None);
    }

    #[test]
    fn test_ties_keep_filtered_order_both_ways() {
        let records = vec![item(1, "x", 5), item(2, "y", 5), item(3, "z", 1)];
        let mut view = TableView::new(columns());
        view.click_header(2);
        assert_eq!(ids(&view.view(&records)), vec![3, 1, 2]);
        view.click_header(2);
        assert_eq!(ids(&view.view(&records)), vec![1, 2, 3]);
    }

    #[test]
    fn test_view_is_idempotent() {
        let records = numbered(13);
        let mut view = TableView::new(columns());
        view.click_header(1);
        let first = ids(&view.view(&records));
        let second = ids(&view.view(&records));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pagination_boundaries() {
        let view = TableView::new(columns());

        let empty: Vec<Item> = Vec::new();
        let slice = view.view(&empty);
        assert_eq!(slice.total_pages, 0);
        assert!(slice.is_empty());
        assert!(!slice.show_pager());

        let exact = numbered(10);
        let slice = view.view(&exact);
        assert_eq!(slice.total_pages, 1);
        assert!(!slice.show_pager());

        let over = numbered(11);
        let slice = view.view(&over);
        assert_eq!(slice.total_pages, 2);
        assert!(slice.show_pager());
    }

    #[test]
    fn test_next_page_disabled_on_last_page() {
        let records = numbered(11);
        let mut view = TableView::new(columns());
        view.next_page(&records);
        view.next_page(&records);
        assert_eq!(view.state.current_page, 2);
        view.prev_page();
        view.prev_page();
        assert_eq!(view.state.current_page, 1);
    }

    #[test]
    fn test_sync_clamps_after_shrink() {
        let mut records = numbered(21);
        let mut view = TableView::new(columns());
        view.next_page(&records);
        view.next_page(&records);
        assert_eq!(view.state.current_page, 3);

        records.truncate(15);
        assert_eq!(view.view(&records).page, 2);
        view.sync(&records);
        assert_eq!(view.state.current_page, 2);
    }

    #[test]
    fn test_selection_follows_visible_rows() {
        let records = numbered(3);
        let mut view = TableView::new(columns());
        view.select_next(&records);
        view.select_next(&records);
        view.select_next(&records);
        assert_eq!(view.selected, 2);
        assert_eq!(view.selected_record(&records).map(|i| i.id), Some(2));
        view.select_prev();
        assert_eq!(view.selected, 1);
    }

    #[test]
    fn test_page_range_math() {
        assert_eq!(page_range(25, 10, 1), 0..10);
        assert_eq!(page_range(25, 10, 3), 20..25);
        assert_eq!(page_range(0, 10, 1), 0..0);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
