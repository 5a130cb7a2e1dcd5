//! 应用入口 - 编排层
//!
//! 持有配置、API 客户端和报告写入器，把命令行的每个动作
//! 委托给导入会话、批量提交器或 API 客户端，并输出统计信息。

use crate::clients::ExamApiClient;
use crate::config::Config;
use crate::models::{Chapter, ImportOptions, ImportSummary, Level, Subject, ValidationResult};
use crate::services::{BatchSubmitter, ReportWriter};
use crate::spreadsheet;
use crate::utils::logging;
use crate::workflow::ImportSession;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// 参考数据（科目、难度、章节）
#[derive(Debug, Default)]
pub struct ReferenceData {
    pub subjects: Vec<Subject>,
    pub levels: Vec<Level>,
    pub chapters: Vec<Chapter>,
}

/// 应用主结构
pub struct App {
    config: Config,
    client: ExamApiClient,
    reports: ReportWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;

        let client = ExamApiClient::new(&config).context("无法创建 API 客户端")?;
        let reports = ReportWriter::from_config(&config);

        Ok(Self {
            config,
            client,
            reports,
        })
    }

    /// 只解析和校验，不提交
    pub async fn validate(
        &self,
        file: &Path,
        invalid_out: Option<&Path>,
    ) -> Result<ValidationResult> {
        logging::log_startup("校验", self.client.base_url());

        let mut session = ImportSession::new(ImportOptions::default());
        let result = session.select_file(file).await?.clone();

        logging::print_validation(&result);
        self.reports.write_validation(file, &result)?;

        if let Some(out) = invalid_out {
            self.export_invalid_rows(&session, out)?;
        }

        Ok(result)
    }

    /// 解析、校验并提交导入
    pub async fn import(
        &self,
        file: &Path,
        options: ImportOptions,
        invalid_out: Option<&Path>,
    ) -> Result<ImportSummary> {
        logging::log_startup("导入", self.client.base_url());

        let mut session = ImportSession::new(options);
        let validation = session.select_file(file).await?.clone();
        logging::print_validation(&validation);
        self.reports.write_validation(file, &validation)?;

        if let Some(out) = invalid_out {
            self.export_invalid_rows(&session, out)?;
        }

        let submitter = BatchSubmitter::new(self.client.clone(), &self.config);
        let mut last_logged = 0u8;
        let summary = session
            .submit(&submitter, |percent| {
                if percent == 100 || percent >= last_logged.saturating_add(10) {
                    info!("⏳ 上传进度: {}%", percent);
                    last_logged = percent;
                }
            })
            .await?
            .clone();

        self.reports.write_summary(file, &summary)?;
        logging::print_final_stats(&summary, self.reports.path());

        if let Some(message) = session.last_error() {
            anyhow::bail!("{}", message);
        }

        Ok(summary)
    }

    /// 生成导入模板
    pub fn template(&self, output: &Path) -> Result<()> {
        spreadsheet::write_template(output)
            .with_context(|| format!("无法生成模板: {}", output.display()))?;
        Ok(())
    }

    /// 从服务端导出题目
    pub async fn export(&self, output: &Path, subject_id: &str, chapter_id: Option<&str>) -> Result<u64> {
        logging::log_startup("导出", self.client.base_url());
        let size = self
            .client
            .export_questions(subject_id, chapter_id, output)
            .await?;
        Ok(size)
    }

    /// 并发获取参考数据，各个列表互不影响
    pub async fn reference(&self, subject_id: Option<&str>) -> ReferenceData {
        let (subjects, levels, chapters) = futures::future::join3(
            self.client.fetch_subjects(),
            self.client.fetch_levels(),
            self.client.fetch_chapters(subject_id),
        )
        .await;

        ReferenceData {
            subjects: subjects.unwrap_or_else(|e| {
                warn!("获取科目列表失败: {}", e.user_message());
                Vec::new()
            }),
            levels: levels.unwrap_or_else(|e| {
                warn!("获取难度列表失败: {}", e.user_message());
                Vec::new()
            }),
            chapters: chapters.unwrap_or_else(|e| {
                warn!("获取章节列表失败: {}", e.user_message());
                Vec::new()
            }),
        }
    }

    fn export_invalid_rows(&self, session: &ImportSession, out: &Path) -> Result<()> {
        let invalid = session.invalid_rows();
        if invalid.is_empty() {
            return Ok(());
        }
        spreadsheet::write_rows(out, &invalid)
            .with_context(|| format!("无法写出无效行: {}", out.display()))?;
        info!("📝 {} 行无效数据已写入 {}", invalid.len(), out.display());
        Ok(())
    }
}
