//! 上传进度模拟
//!
//! 导入接口不提供上传进度，请求进行中时用定时器把进度推进到 90%，
//! 完成后直接置为 100%，出错时停在当前值。

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 模拟进度的上限
pub const SIMULATED_CEILING: u8 = 90;
pub const COMPLETE: u8 = 100;
const MIN_TICK: Duration = Duration::from_millis(1);

pub struct ProgressSimulator {
    sender: Arc<watch::Sender<u8>>,
    ticker: Option<JoinHandle<()>>,
}

impl ProgressSimulator {
    /// 启动定时器，每个 `tick` 增加 `step` 个百分点
    pub fn start(tick: Duration, step: u8) -> Self {
        let (sender, _) = watch::channel(0u8);
        let sender = Arc::new(sender);
        let step = step.max(1);
        // interval 不接受零周期
        let tick = tick.max(MIN_TICK);

        let ticker_sender = Arc::clone(&sender);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // 第一次 tick 立即返回
            interval.tick().await;
            loop {
                interval.tick().await;
                let current = *ticker_sender.borrow();
                if current >= SIMULATED_CEILING {
                    break;
                }
                ticker_sender.send_replace(current.saturating_add(step).min(SIMULATED_CEILING));
            }
        });

        Self {
            sender,
            ticker: Some(ticker),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> u8 {
        *self.sender.borrow()
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// 请求成功：停止定时器并置为 100
    pub fn finish(mut self) -> u8 {
        self.stop();
        self.sender.send_replace(COMPLETE);
        COMPLETE
    }

    /// 请求失败：停止定时器，保留当前值
    pub fn cancel(mut self) -> u8 {
        self.stop();
        self.current()
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}
