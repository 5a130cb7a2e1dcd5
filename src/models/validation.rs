use serde::{Deserialize, Serialize};

/// 某一行的全部错误信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// 一批题目的校验报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<RowError>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn total(&self) -> usize {
        self.valid_count + self.invalid_count
    }

    /// 供日志显示的一行摘要
    pub fn summary(&self) -> String {
        format!(
            "共 {} 行: 有效 {}, 无效 {}, 警告 {}",
            self.total(),
            self.valid_count,
            self.invalid_count,
            self.warnings.len()
        )
    }

    /// 无效行的行号
    pub fn invalid_rows(&self) -> Vec<usize> {
        self.errors.iter().map(|e| e.row).collect()
    }
}
