//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // 页面与表格
    NextScreen,
    PrevScreen,
    StartSearch,
    NextPage,
    PrevPage,
    SortColumn(usize), // 第 n 个表头（从 0 开始）

    // 触发特定功能
    StartAdd,
    StartEdit,
    StartDelete,
    Reload,
    Export,
    Logout,

    // 表单/通用交互
    NextField,
    PrevField,
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    DeleteChar,  // Backspace
}
