//! 剪贴板变化监听线程
//!
//! # 设计思路
//!
//! `clipboard-master` 在独立线程上泵送系统级剪贴板变化消息，
//! 分类、去重、回调、写回全部在该线程内同步完成：通知严格按到达
//! 顺序逐个处理，前一条的回调链走完才取下一条。主控制路径只负责
//! 保活与响应中断，进程退出时不等待监听线程收尾（守护线程语义）。
//!
//! # 实现思路
//!
//! - `Master::run()` 意外退出或创建失败时按指数退避重启，上限封顶。
//! - 监控器经 `Arc<Mutex>` 在重启轮次间复用；锁中毒时沿用恢复数据
//!   继续运行，监听器不因单次 panic 而死。

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clipboard_master::{CallbackResult, ClipboardHandler, Master};

use crate::monitor::Monitor;

const RESTART_BASE_DELAY_MS: u64 = 100;
const RESTART_MAX_DELAY_MS: u64 = 5_000;

fn compute_restart_backoff_ms(restart_attempt: u32) -> u64 {
    let exp = 1_u64 << restart_attempt.saturating_sub(1).min(6);
    RESTART_BASE_DELAY_MS
        .saturating_mul(exp)
        .min(RESTART_MAX_DELAY_MS)
}

/// `clipboard-master` 回调到监控器流水线的桥
struct Handler {
    monitor: Arc<Mutex<Monitor>>,
}

impl ClipboardHandler for Handler {
    fn on_clipboard_change(&mut self) -> CallbackResult {
        let mut monitor = match self.monitor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("监控器状态锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        };
        monitor.handle_change();
        CallbackResult::Next
    }

    fn on_clipboard_error(&mut self, error: std::io::Error) -> CallbackResult {
        log::error!("剪贴板错误：{}", error);
        CallbackResult::Next
    }
}

/// 在后台线程启动剪贴板监听，立即返回
///
/// 返回的句柄仅供调用方判断线程是否存活；按守护线程语义使用，
/// 退出时不必 join。
pub fn spawn(monitor: Monitor) -> thread::JoinHandle<()> {
    let monitor = Arc::new(Mutex::new(monitor));

    thread::spawn(move || {
        let mut restart_attempt: u32 = 0;
        loop {
            let handler = Handler {
                monitor: Arc::clone(&monitor),
            };
            match Master::new(handler) {
                Ok(mut master) => {
                    restart_attempt = 0;
                    log::info!("📋 剪贴板监听已启动");
                    let _ = master.run();
                    log::warn!("📋 剪贴板监听已退出，将尝试重启");
                }
                Err(err) => {
                    log::error!("📋 创建剪贴板监听失败: {}", err);
                }
            }

            restart_attempt = restart_attempt.saturating_add(1);
            let backoff_ms = compute_restart_backoff_ms(restart_attempt);
            log::warn!(
                "📋 剪贴板监听 {}ms 后重试（attempt={}）",
                backoff_ms,
                restart_attempt
            );
            thread::sleep(Duration::from_millis(backoff_ms));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::compute_restart_backoff_ms;

    #[test]
    fn test_restart_backoff_grows_then_caps() {
        assert_eq!(compute_restart_backoff_ms(1), 100);
        assert_eq!(compute_restart_backoff_ms(2), 200);
        assert_eq!(compute_restart_backoff_ms(3), 400);
        assert_eq!(compute_restart_backoff_ms(7), 5_000);
        assert_eq!(compute_restart_backoff_ms(20), 5_000);
    }
}
