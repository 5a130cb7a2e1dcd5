//! 导入会话 - 流程层
//!
//! 步骤：上传文件 → 预览/配置 → 提交/结果。
//! 步骤只由用户操作推动（选择文件、点击导入、重新开始）。

use crate::clients::QuestionImporter;
use crate::error::{AppError, AppResult, ImportError};
use crate::models::{ImportOptions, ImportRow, ImportSummary, ValidationResult};
use crate::services::{BatchSubmitter, SubmitOutcome};
use crate::spreadsheet;
use crate::validation;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    Upload,
    Configure,
    Result,
}

impl ImportStep {
    pub fn name(self) -> &'static str {
        match self {
            ImportStep::Upload => "Upload",
            ImportStep::Configure => "Configure",
            ImportStep::Result => "Result",
        }
    }
}

impl Display for ImportStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一次导入会话的全部状态
#[derive(Debug)]
pub struct ImportSession {
    step: ImportStep,
    file: Option<PathBuf>,
    rows: Vec<ImportRow>,
    validation: Option<ValidationResult>,
    options: ImportOptions,
    summary: Option<ImportSummary>,
    last_error: Option<String>,
}

impl ImportSession {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            step: ImportStep::Upload,
            file: None,
            rows: Vec::new(),
            validation: None,
            options,
            summary: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> ImportStep {
        self.step
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn rows(&self) -> &[ImportRow] {
        &self.rows
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ImportOptions {
        &mut self.options
    }

    pub fn summary(&self) -> Option<&ImportSummary> {
        self.summary.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 未通过校验的行，导出给用户修改
    pub fn invalid_rows(&self) -> Vec<ImportRow> {
        let invalid = self
            .validation
            .as_ref()
            .map(|v| v.invalid_rows())
            .unwrap_or_default();
        self.rows
            .iter()
            .filter(|r| invalid.contains(&r.index))
            .cloned()
            .collect()
    }

    fn transition_error(&self, action: &'static str) -> AppError {
        ImportError::InvalidTransition {
            step: self.step.name(),
            action,
        }
        .into()
    }

    /// 选择文件：解析、映射、校验，进入配置步骤
    pub async fn select_file(&mut self, path: impl Into<PathBuf>) -> AppResult<&ValidationResult> {
        if self.step == ImportStep::Result {
            return Err(self.transition_error("select_file"));
        }

        let path = path.into();
        match spreadsheet::load_file(path.clone()).await {
            Ok(sheet) => {
                let header_warnings = spreadsheet::check_header(&sheet.header);
                Ok(self.accept_rows(path, spreadsheet::map_rows(&sheet.rows), header_warnings))
            }
            Err(e) => {
                warn!("文件解析失败 {}: {}", path.display(), e);
                self.clear();
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// 直接载入已映射好的行（例如来自其它来源的数据）
    pub fn load_rows(&mut self, file: PathBuf, rows: Vec<ImportRow>) -> AppResult<&ValidationResult> {
        if self.step == ImportStep::Result {
            return Err(self.transition_error("load_rows"));
        }
        Ok(self.accept_rows(file, rows, Vec::new()))
    }

    fn accept_rows(
        &mut self,
        file: PathBuf,
        rows: Vec<ImportRow>,
        header_warnings: Vec<String>,
    ) -> &ValidationResult {
        let mut result = validation::validate(&rows);
        if !header_warnings.is_empty() {
            let mut warnings = header_warnings;
            warnings.append(&mut result.warnings);
            result.warnings = warnings;
        }

        info!("✓ {} | {}", file.display(), result.summary());

        self.file = Some(file);
        self.rows = rows;
        self.summary = None;
        self.last_error = None;
        self.step = ImportStep::Configure;
        self.validation.insert(result)
    }

    /// 检查当前状态是否可以提交
    pub fn ready_to_submit(&self) -> AppResult<&Path> {
        if self.step != ImportStep::Configure {
            return Err(self.transition_error("submit"));
        }
        let file = self.file.as_deref().ok_or(ImportError::NoRows)?;
        let validation = self.validation.as_ref().ok_or(ImportError::NoRows)?;
        if validation.valid_count == 0 {
            return Err(ImportError::NoRows.into());
        }
        if !validation.is_valid && !self.options.continue_on_error {
            return Err(ImportError::ValidationFailed {
                invalid_count: validation.invalid_count,
            }
            .into());
        }
        self.options.check()?;
        Ok(file)
    }

    /// 提交导入，进入结果步骤
    ///
    /// 请求失败也会进入结果步骤，结果里只有一条合成的错误。
    pub async fn submit<I, F>(
        &mut self,
        submitter: &BatchSubmitter<I>,
        on_progress: F,
    ) -> AppResult<&ImportSummary>
    where
        I: QuestionImporter,
        F: FnMut(u8),
    {
        let file = self.ready_to_submit()?.to_path_buf();
        let outcome: SubmitOutcome = submitter
            .submit_observed(&file, &self.options, on_progress)
            .await;

        self.last_error = outcome.error;
        self.step = ImportStep::Result;
        let summary: &ImportSummary = self.summary.insert(outcome.summary);
        Ok(summary)
    }

    /// 重新开始：回到上传步骤，保留导入配置
    pub fn restart(&mut self) {
        self.clear();
        self.last_error = None;
        self.step = ImportStep::Upload;
    }

    fn clear(&mut self) {
        self.file = None;
        self.rows.clear();
        self.validation = None;
        self.summary = None;
        self.step = ImportStep::Upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use std::time::Duration;

    struct StaticImporter;

    impl QuestionImporter for StaticImporter {
        async fn import_file(&self, _file: &Path, _options: &ImportOptions) -> AppResult<ImportSummary> {
            Ok(ImportSummary {
                total_processed: 1,
                success_count: 1,
                new_questions: 1,
                ..Default::default()
            })
        }
    }

    fn valid_row(index: usize) -> ImportRow {
        ImportRow {
            index,
            content: format!("Câu {}", index),
            option_a: "a".into(),
            option_b: "b".into(),
            correct_answer: "a".into(),
            ..Default::default()
        }
    }

    fn submitter() -> BatchSubmitter<StaticImporter> {
        BatchSubmitter::with_progress(StaticImporter, Duration::from_millis(50), 10)
    }

    #[tokio::test]
    async fn test_full_cycle() {
        let mut session = ImportSession::new(ImportOptions::for_subject("1"));
        assert_eq!(session.step(), ImportStep::Upload);

        let result = session
            .load_rows(PathBuf::from("q.xlsx"), vec![valid_row(2)])
            .unwrap();
        assert!(result.is_valid);
        assert_eq!(session.step(), ImportStep::Configure);

        let summary = session.submit(&submitter(), |_| {}).await.unwrap();
        assert_eq!(summary.success_count, 1);
        assert_eq!(session.step(), ImportStep::Result);
        assert!(session.last_error().is_none());

        session.restart();
        assert_eq!(session.step(), ImportStep::Upload);
        assert!(session.rows().is_empty());
        assert!(session.summary().is_none());
        assert_eq!(session.options().subject_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_submit_from_upload_is_rejected() {
        let mut session = ImportSession::new(ImportOptions::for_subject("1"));
        let err = session.submit(&submitter(), |_| {}).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Import(ImportError::InvalidTransition { step: "Upload", .. })
        ));
    }

    #[test]
    fn test_invalid_rows_block_submit_unless_continue_on_error() {
        let mut options = ImportOptions::for_subject("1");
        options.continue_on_error = false;
        let mut session = ImportSession::new(options);

        let mut bad = valid_row(3);
        bad.correct_answer = "E".into();
        session
            .load_rows(PathBuf::from("q.xlsx"), vec![valid_row(2), bad])
            .unwrap();

        assert!(matches!(
            session.ready_to_submit(),
            Err(AppError::Import(ImportError::ValidationFailed { invalid_count: 1 }))
        ));
        assert_eq!(session.invalid_rows().len(), 1);
        assert_eq!(session.invalid_rows()[0].index, 3);

        session.options_mut().continue_on_error = true;
        assert!(session.ready_to_submit().is_ok());
    }

    #[test]
    fn test_all_rows_invalid_is_no_rows() {
        let mut session = ImportSession::new(ImportOptions::for_subject("1"));
        session
            .load_rows(PathBuf::from("q.xlsx"), vec![ImportRow::default()])
            .unwrap();
        assert!(matches!(
            session.ready_to_submit(),
            Err(AppError::Import(ImportError::NoRows))
        ));
    }

    #[test]
    fn test_missing_subject_blocks_submit() {
        let mut session = ImportSession::new(ImportOptions::default());
        session
            .load_rows(PathBuf::from("q.xlsx"), vec![valid_row(2)])
            .unwrap();
        assert!(matches!(
            session.ready_to_submit(),
            Err(AppError::Import(ImportError::MissingSubject))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_stays_in_upload() {
        let mut session = ImportSession::new(ImportOptions::for_subject("1"));
        session
            .load_rows(PathBuf::from("q.xlsx"), vec![valid_row(2)])
            .unwrap();

        let err = session.select_file("khong_co.xlsx").await.unwrap_err();
        assert!(matches!(err, AppError::File(_)));
        assert_eq!(session.step(), ImportStep::Upload);
        assert!(session.rows().is_empty());
        assert!(session.last_error().is_some());
    }

    #[tokio::test]
    async fn test_select_file_after_result_is_rejected() {
        let mut session = ImportSession::new(ImportOptions::for_subject("1"));
        session
            .load_rows(PathBuf::from("q.xlsx"), vec![valid_row(2)])
            .unwrap();
        session.submit(&submitter(), |_| {}).await.unwrap();

        assert!(session.select_file("q.xlsx").await.is_err());
        assert!(session.load_rows(PathBuf::from("q.xlsx"), Vec::new()).is_err());
        assert_eq!(session.step(), ImportStep::Result);
    }
}
