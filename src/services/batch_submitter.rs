//! 批量提交器 - 业务能力层
//!
//! 把导入文件和配置一次性提交到导入接口。批次大小由服务端处理，
//! 客户端只负责进度显示和结果汇总；失败时不做重试，也不做部分恢复。

use crate::clients::QuestionImporter;
use crate::config::Config;
use crate::models::{ImportOptions, ImportSummary};
use crate::services::progress::ProgressSimulator;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

/// 一次提交的结果
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub summary: ImportSummary,
    /// 最终进度（成功为 100）
    pub progress: u8,
    /// 失败时给用户看的提示
    pub error: Option<String>,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failed(message: String, progress: u8) -> Self {
        Self {
            summary: ImportSummary::from_failure(message.clone()),
            progress,
            error: Some(message),
        }
    }
}

pub struct BatchSubmitter<I> {
    importer: I,
    tick: Duration,
    step: u8,
}

impl<I: QuestionImporter> BatchSubmitter<I> {
    pub fn new(importer: I, config: &Config) -> Self {
        Self::with_progress(
            importer,
            Duration::from_millis(config.progress_tick_ms),
            config.progress_step,
        )
    }

    pub fn with_progress(importer: I, tick: Duration, step: u8) -> Self {
        Self {
            importer,
            tick,
            step,
        }
    }

    pub async fn submit(&self, file: &Path, options: &ImportOptions) -> SubmitOutcome {
        self.submit_observed(file, options, |_| {}).await
    }

    /// 提交文件，进度变化时回调 `on_progress`
    pub async fn submit_observed<F>(
        &self,
        file: &Path,
        options: &ImportOptions,
        mut on_progress: F,
    ) -> SubmitOutcome
    where
        F: FnMut(u8),
    {
        if let Err(e) = options.check() {
            let err = crate::error::AppError::from(e);
            warn!("导入配置无效: {}", err);
            return SubmitOutcome::failed(err.user_message(), 0);
        }

        info!(
            "📦 开始导入 {} (批次大小 {}, 覆盖已有: {}, 出错继续: {})",
            file.display(),
            options.batch_size,
            options.override_existing,
            options.continue_on_error
        );

        let progress = ProgressSimulator::start(self.tick, self.step);
        let mut rx = progress.subscribe();
        on_progress(0);

        let request = self.importer.import_file(file, options);
        tokio::pin!(request);

        let result = loop {
            tokio::select! {
                res = &mut request => break res,
                changed = rx.changed() => match changed {
                    Ok(()) => on_progress(*rx.borrow_and_update()),
                    Err(_) => break (&mut request).await,
                },
            }
        };

        match result {
            Ok(summary) => {
                let done = progress.finish();
                on_progress(done);
                info!(
                    "✓ 导入完成: 处理 {}, 成功 {}, 失败 {}",
                    summary.total_processed, summary.success_count, summary.failed_count
                );
                SubmitOutcome {
                    summary,
                    progress: done,
                    error: None,
                }
            }
            Err(e) => {
                let stopped = progress.cancel();
                error!("❌ 导入失败: {}", e);
                SubmitOutcome::failed(e.user_message(), stopped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 本地导入实现：等待一段时间后返回固定结果
    struct FakeImporter {
        delay: Duration,
        status: Option<u16>,
        calls: AtomicUsize,
    }

    impl FakeImporter {
        fn ok(delay: Duration) -> Self {
            Self {
                delay,
                status: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                delay: Duration::from_millis(250),
                status: Some(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl QuestionImporter for FakeImporter {
        async fn import_file(&self, _file: &Path, _options: &ImportOptions) -> AppResult<ImportSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.status {
                Some(status) => Err(AppError::api_status("/api/Question/import", status, None)),
                None => Ok(ImportSummary {
                    total_processed: 3,
                    success_count: 3,
                    new_questions: 2,
                    updated_questions: 1,
                    ..Default::default()
                }),
            }
        }
    }

    fn submitter(importer: FakeImporter) -> BatchSubmitter<FakeImporter> {
        BatchSubmitter::with_progress(importer, Duration::from_millis(100), 10)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_snaps_to_complete() {
        let submitter = submitter(FakeImporter::ok(Duration::from_millis(450)));
        let mut seen = Vec::new();

        let outcome = submitter
            .submit_observed(Path::new("q.xlsx"), &ImportOptions::for_subject("1"), |p| seen.push(p))
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.progress, 100);
        assert_eq!(outcome.summary.success_count, 3);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().filter(|p| **p != 100).all(|p| *p <= 90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_synthesizes_single_error() {
        let submitter = submitter(FakeImporter::failing(500));

        let outcome = submitter
            .submit(Path::new("q.xlsx"), &ImportOptions::for_subject("1"))
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.progress < 100);
        assert_eq!(outcome.summary.errors.len(), 1);
        assert_eq!(outcome.summary.success_count, 0);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Lỗi máy chủ, vui lòng thử lại sau")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_subject_never_calls_importer() {
        let submitter = submitter(FakeImporter::ok(Duration::from_millis(10)));

        let outcome = submitter
            .submit(Path::new("q.xlsx"), &ImportOptions::default())
            .await;

        assert_eq!(outcome.error.as_deref(), Some("Vui lòng chọn môn học."));
        assert_eq!(outcome.progress, 0);
        assert_eq!(submitter.importer.calls.load(Ordering::SeqCst), 0);
    }
}
