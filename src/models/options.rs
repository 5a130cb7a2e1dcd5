use crate::error::ImportError;
use serde::{Deserialize, Serialize};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// 导入配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// 科目（必填）
    pub subject_id: Option<String>,
    pub chapter_id: Option<String>,
    pub level_id: Option<String>,
    /// 覆盖已存在的题目
    pub override_existing: bool,
    /// 遇到错误时继续处理后续行
    pub continue_on_error: bool,
    pub batch_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            subject_id: None,
            chapter_id: None,
            level_id: None,
            override_existing: false,
            continue_on_error: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportOptions {
    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            ..Default::default()
        }
    }

    /// 提交前检查配置，返回科目 ID
    pub fn check(&self) -> Result<&str, ImportError> {
        let subject_id = self
            .subject_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ImportError::MissingSubject)?;

        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ImportError::InvalidBatchSize {
                value: self.batch_size,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        Ok(subject_id)
    }

    /// 非空的可选字段
    pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
