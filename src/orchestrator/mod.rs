//! 编排层（Orchestration Layer）
//!
//! ```text
//! orchestrator::App (命令行动作)
//!     ↓
//! workflow::ImportSession (上传 → 配置 → 结果)
//!     ↓
//! services (BatchSubmitter / ProgressSimulator / ReportWriter)
//!     ↓
//! clients::ExamApiClient + spreadsheet + validation
//! ```

pub mod app;

pub use app::{App, ReferenceData};
