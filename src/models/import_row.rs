use serde::{Deserialize, Serialize};

/// 表格中的一行原始数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 表格中的实际行号（从1开始，表头为第1行）
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<String>) -> Self {
        Self { row_number, cells }
    }

    /// 取第 `col` 列，缺失时返回空字符串
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// 待导入的一道题
///
/// 只在一次导入会话内存在，提交或重新开始后即丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// 表格行号
    pub index: usize,
    pub content: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub explanation: String,
    pub level: String,
}

impl ImportRow {
    /// 按选项字母取选项内容
    pub fn option(&self, letter: char) -> Option<&str> {
        match letter {
            'A' => Some(&self.option_a),
            'B' => Some(&self.option_b),
            'C' => Some(&self.option_c),
            'D' => Some(&self.option_d),
            _ => None,
        }
    }

    /// 规范化后的正确答案（去空格、大写）
    pub fn normalized_answer(&self) -> String {
        self.correct_answer.trim().to_uppercase()
    }
}

impl std::fmt::Display for ImportRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = crate::utils::logging::truncate_text(self.content.trim(), 60);
        write!(f, "[行 {}] {} (答案: {})", self.index, preview, self.normalized_answer())
    }
}
