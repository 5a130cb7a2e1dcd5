//! 校验报告写入服务 - 业务能力层
//!
//! 只负责把校验结果和导入结果追加到报告文件，不关心流程

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ImportSummary, ValidationResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 报告文件取自配置中的 `report_file`
    pub fn from_config(config: &Config) -> Self {
        Self::with_path(config.report_file.clone())
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    fn append(&self, text: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .map_err(|e| AppError::file_write_failed(&self.report_file_path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.report_file_path, e))?;
        Ok(())
    }

    /// 写入校验报告
    pub fn write_validation(&self, source: &Path, result: &ValidationResult) -> AppResult<()> {
        debug!(
            "写入校验报告: {} | 无效 {} | 警告 {}",
            source.display(),
            result.invalid_count,
            result.warnings.len()
        );
        self.append(&format_validation(source, result))
    }

    /// 写入导入结果
    pub fn write_summary(&self, source: &Path, summary: &ImportSummary) -> AppResult<()> {
        self.append(&format_summary(source, summary))
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_validation(source: &Path, result: &ValidationResult) -> String {
    let mut out = format!(
        "[{}] 校验 {} | {}\n",
        timestamp(),
        source.display(),
        result.summary()
    );
    for row_error in &result.errors {
        out.push_str(&format!(
            "  行 {}: {}\n",
            row_error.row,
            row_error.errors.join("; ")
        ));
    }
    for warning in &result.warnings {
        out.push_str(&format!("  警告: {}\n", warning));
    }
    out
}

pub fn format_summary(source: &Path, summary: &ImportSummary) -> String {
    let mut out = format!(
        "[{}] 导入 {} | 处理 {} 成功 {} 失败 {} 新增 {} 更新 {}\n",
        timestamp(),
        source.display(),
        summary.total_processed,
        summary.success_count,
        summary.failed_count,
        summary.new_questions,
        summary.updated_questions
    );
    for row_error in &summary.errors {
        out.push_str(&format!(
            "  行 {}: {}\n",
            row_error.row,
            row_error.errors.join("; ")
        ));
    }
    for warning in &summary.warnings {
        out.push_str(&format!("  警告: {}\n", warning));
    }
    out
}
