//! 表格交互状态 (View State)

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// 搜索、排序与分页状态，只由所属表格持有
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_column: Option<&'static str>,
    pub sort_direction: SortDirection,
    pub current_page: usize, // 从 1 开始
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
            current_page: 1,
        }
    }
}

impl ViewState {
    /// 整体替换搜索词，回到第一页
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = self.search_term.clone();
        term.push(c);
        self.set_search(term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = self.search_term.clone();
        if term.pop().is_some() {
            self.set_search(term);
        }
    }

    /// 点击表头：同一列切换方向，新列从升序开始
    pub fn toggle_sort(&mut self, accessor: &'static str) {
        if self.sort_column == Some(accessor) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = Some(accessor);
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn next_page(&mut self, total_pages: usize) {
        if self.current_page < total_pages {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// 将当前页限制在 [1, max(total_pages, 1)]
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }
}
