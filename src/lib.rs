//! # Question Import
//!
//! 题库批量导入工具：读取 Excel 题目表，逐行校验，再上传到题库 REST API。
//!
//! ## 架构设计
//!
//! ### ① 数据与基础能力
//! - `models/` - 题目行、校验报告、导入配置、导入结果、参考数据
//! - `spreadsheet/` - Excel 解析、按列映射、模板生成
//! - `validation/` - 逐行校验（纯函数）
//! - `clients/` - 题库 API 客户端
//!
//! ### ② 业务能力层（Services）
//! - `BatchSubmitter` - 上传导入文件并汇总结果
//! - `ProgressSimulator` - 请求进行中的进度模拟
//! - `ReportWriter` - 写校验/导入报告
//!
//! ### ③ 流程层（Workflow）
//! - `ImportSession` - 上传 → 预览/配置 → 结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 命令行动作入口

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod spreadsheet;
pub mod utils;
pub mod validation;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ExamApiClient, QuestionImporter};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ImportOptions, ImportRow, ImportSummary, RowError, ValidationResult};
pub use orchestrator::App;
pub use services::{BatchSubmitter, SubmitOutcome};
pub use validation::validate;
pub use workflow::{ImportSession, ImportStep};
