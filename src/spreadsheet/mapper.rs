//! 按固定列顺序把原始行映射成题目

use crate::models::{ImportRow, RawRow};
use regex::Regex;
use std::sync::OnceLock;

/// 模板列标题，顺序固定
pub const COLUMNS: [&str; 8] = [
    "Nội dung",
    "Đáp án A",
    "Đáp án B",
    "Đáp án C",
    "Đáp án D",
    "Đáp án đúng",
    "Giải thích",
    "Mức độ",
];

const COL_CONTENT: usize = 0;
const COL_OPTION_A: usize = 1;
const COL_OPTION_B: usize = 2;
const COL_OPTION_C: usize = 3;
const COL_OPTION_D: usize = 4;
const COL_CORRECT: usize = 5;
const COL_EXPLANATION: usize = 6;
const COL_LEVEL: usize = 7;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn normalize_title(title: &str) -> String {
    whitespace()
        .replace_all(title.trim(), " ")
        .to_lowercase()
}

/// 检查表头，不一致的列只给出警告
pub fn check_header(header: &[String]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (col, expected) in COLUMNS.iter().enumerate() {
        let actual = header.get(col).map(String::as_str).unwrap_or("");
        if normalize_title(actual) != normalize_title(expected) {
            warnings.push(format!(
                "Cột {} của tiêu đề là '{}', mong đợi '{}'",
                col + 1,
                actual,
                expected
            ));
        }
    }
    warnings
}

pub fn map_row(raw: &RawRow) -> ImportRow {
    ImportRow {
        index: raw.row_number,
        content: raw.cell(COL_CONTENT).to_string(),
        option_a: raw.cell(COL_OPTION_A).to_string(),
        option_b: raw.cell(COL_OPTION_B).to_string(),
        option_c: raw.cell(COL_OPTION_C).to_string(),
        option_d: raw.cell(COL_OPTION_D).to_string(),
        correct_answer: raw.cell(COL_CORRECT).to_string(),
        explanation: raw.cell(COL_EXPLANATION).to_string(),
        level: raw.cell(COL_LEVEL).to_string(),
    }
}

pub fn map_rows(rows: &[RawRow]) -> Vec<ImportRow> {
    rows.iter().map(map_row).collect()
}

/// 题目转回按列排列的文本，用于导出
pub fn to_cells(row: &ImportRow) -> [&str; 8] {
    [
        row.content.as_str(),
        row.option_a.as_str(),
        row.option_b.as_str(),
        row.option_c.as_str(),
        row.option_d.as_str(),
        row.correct_answer.as_str(),
        row.explanation.as_str(),
        row.level.as_str(),
    ]
}
