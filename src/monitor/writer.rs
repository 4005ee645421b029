//! 回环安全的剪贴板写入路径
//!
//! # 设计思路
//!
//! 程序化写入剪贴板会触发监控器正在监听的同一种系统通知。
//! 不加防护时，写入会被当成新的外部变化重新进入处理流水线：
//! 若回调本身是非幂等变换（如大小写切换），就会无限回环。
//! 写入路径因此由四道闸组成，缺一不可：
//!
//! 1. 与当前剪贴板内容结构相等 → 不写（省去一次冗余系统写入及其回显通知）
//! 2. 监控器已被外部暂停 → 不写（尊重外部施加的暂停）
//! 3. 写入期间暂停监控器，写完恢复——**失败路径也必须恢复**，
//!    否则监听器永久卡死在 Disabled
//! 4. 成功后把写入内容记为 `last_clip`：回显通知到达时（此时监控器
//!    早已恢复）与 `last_clip` 结构相等而被去重丢弃，回环就此切断
//!
//! # 实现思路
//!
//! - 恢复 enable 写在所有返回路径之前且不依赖写入结果，成功失败一视同仁。
//! - `last_clip` 仅在系统写入成功后更新，失败时保持旧值。

use crate::clip::Clip;
use crate::error::AppError;
use crate::monitor::MonitorState;

/// 把候选 Clip 写入系统剪贴板（幂等、回环安全）
pub fn write_clipboard(candidate: &Clip, state: &mut MonitorState) -> Result<(), AppError> {
    let live = state.read_clip()?;
    if live.as_ref() == Some(candidate) {
        log::debug!("⏭️  剪贴板内容与候选相同，跳过写入");
        return Ok(());
    }

    if !state.is_enabled() {
        log::debug!("⏭️  监控处于暂停状态，放弃写入");
        return Ok(());
    }

    state.disable();
    let result = match candidate {
        Clip::Text(text) | Clip::Unicode(text) => state.backend_mut().set_text(text),
        Clip::File(paths) => state.backend_mut().set_files(paths),
        Clip::Image => Err(AppError::Clipboard("不支持写入图片内容".to_string())),
    };
    if result.is_ok() {
        log::info!("✏️  已写入剪贴板: {}", candidate.summary());
        state.record_written(candidate.clone());
    }
    // 成功与失败都恢复监控，监听器绝不能停留在 Disabled
    state.enable();

    result
}
