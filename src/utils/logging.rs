//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use crate::models::{ImportSummary, ValidationResult};
use std::fs;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目导入日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(command: &str, api_base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!("🌐 API 地址: {}", api_base_url);
    info!("{}", "=".repeat(60));
}

/// 打印校验结果
pub fn print_validation(result: &ValidationResult) {
    info!("\n{}", "─".repeat(60));
    info!("📋 校验结果");
    info!("{}", "─".repeat(60));
    info!("✅ 有效: {}/{}", result.valid_count, result.total());
    if result.invalid_count > 0 {
        error!("❌ 无效: {}", result.invalid_count);
        for row_error in &result.errors {
            error!("  Dòng {}: {}", row_error.row, row_error.errors.join("; "));
        }
    }
    for warning in &result.warnings {
        warn!("  ⚠️ {}", warning);
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终导入统计
pub fn print_final_stats(summary: &ImportSummary, report_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 处理: {}", summary.total_processed);
    info!("✅ 成功: {}/{}", summary.success_count, summary.total_processed);
    info!("🆕 新增: {} | 🔄 更新: {}", summary.new_questions, summary.updated_questions);
    info!("❌ 失败: {}", summary.failed_count);
    for row_error in &summary.errors {
        error!("  Dòng {}: {}", row_error.row, row_error.errors.join("; "));
    }
    for warning in &summary.warnings {
        warn!("  ⚠️ {}", warning);
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
