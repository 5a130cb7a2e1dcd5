use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库 REST API 根地址
    pub api_base_url: String,
    /// 访问令牌（可选，作为 Bearer 发送）
    pub api_token: Option<String>,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 默认批次大小
    pub default_batch_size: usize,
    /// 进度模拟的刷新间隔（毫秒）
    pub progress_tick_ms: u64,
    /// 每次刷新增加的百分比
    pub progress_step: u8,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 校验报告文件
    pub report_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            api_token: None,
            request_timeout_secs: 120,
            default_batch_size: 100,
            progress_tick_ms: 300,
            progress_step: 10,
            verbose_logging: false,
            output_log_file: "import_log.txt".to_string(),
            report_file: "import_report.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件，环境变量仍然优先
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::Config(ConfigError::FileParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()).or(self.api_token),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            default_batch_size: std::env::var("DEFAULT_BATCH_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.default_batch_size),
            progress_tick_ms: std::env::var("PROGRESS_TICK_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.progress_tick_ms),
            progress_step: std::env::var("PROGRESS_STEP").ok().and_then(|v| v.parse().ok()).unwrap_or(self.progress_step),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            report_file: std::env::var("REPORT_FILE").unwrap_or(self.report_file),
        }
    }
}
