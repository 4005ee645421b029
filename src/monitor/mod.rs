//! 剪贴板监控模块
//!
//! # 设计思路
//!
//! 监控器是整个服务的事件源与防回环闸门：
//! - **两态状态机**：Enabled（处理通知）/ Disabled（程序化写入期间暂时忽略），
//!   `enable()` / `disable()` 均幂等
//! - **分类**：按固定优先级检查可用格式（Unicode 文本 > 传统文本 >
//!   位图/DIB 图片 > 文件列表），首个命中者胜出
//! - **去重**：与上一次写入记录的 Clip 结构相等的通知直接丢弃，
//!   这是切断写入回环的关键（自写触发的回显通知内容必然相等）
//! - **分发表**：按 Clip 类型查回调，查不到用默认回调，每个真实外部
//!   变化恰好分发一次
//!
//! 状态不做成全局：`MonitorState` 是显式对象，由监听线程独占持有并
//! 借用传入回调。`last_clip` 只由写入路径更新（见 [`writer`]），
//! 读路径从不更新——否则自写回显到达时比较对象已被覆盖，回环不可断。
//!
//! # 实现思路
//!
//! - 回调签名 `FnMut(&Clip, &mut MonitorState)`，回调内可经写入路径改写剪贴板。
//! - 分类 miss（无法识别 / 图片）只记 debug 日志，不分发、不更新状态。
//! - 所有处理都在监听线程内同步完成，无内部并发，无需额外同步原语。

pub mod callbacks;
pub mod listener;
pub mod writer;

use std::collections::HashMap;

use crate::backend::{ClipboardBackend, Snapshot};
use crate::clip::{Clip, ClipKind};
use crate::error::AppError;

pub use writer::write_clipboard;

/// 分发表回调：收到已分类的 Clip 与监控器状态的可变借用
pub type Callback = Box<dyn FnMut(&Clip, &mut MonitorState) + Send>;

// ============================================================================
// 监控器状态
// ============================================================================

/// 监控器的可变状态：开关、去重基准与剪贴板后端
pub struct MonitorState {
    enabled: bool,
    last_clip: Option<Clip>,
    backend: Box<dyn ClipboardBackend>,
}

impl MonitorState {
    pub fn new(backend: Box<dyn ClipboardBackend>) -> Self {
        Self {
            enabled: true,
            last_clip: None,
            backend,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled → Enabled；已启用时为空操作
    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            log::debug!("▶️ 监控已恢复");
        }
    }

    /// Enabled → Disabled；已禁用时为空操作
    pub fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
            log::debug!("⏸️ 监控已暂停");
        }
    }

    pub fn last_clip(&self) -> Option<&Clip> {
        self.last_clip.as_ref()
    }

    pub(crate) fn record_written(&mut self, clip: Clip) {
        self.last_clip = Some(clip);
    }

    /// 读取剪贴板并分类成 Clip
    pub(crate) fn read_clip(&mut self) -> Result<Option<Clip>, AppError> {
        Ok(classify(self.backend.snapshot()?))
    }

    pub(crate) fn backend_mut(&mut self) -> &mut dyn ClipboardBackend {
        self.backend.as_mut()
    }
}

/// 按固定优先级把格式快照裁决成单个 Clip
///
/// 即使多种格式同时存在，排在前面的也直接胜出。
/// 图片被识别为存在但不受支持，裁决结果是"没有 Clip"。
fn classify(snapshot: Snapshot) -> Option<Clip> {
    if let Some(text) = snapshot.unicode {
        return Some(Clip::Unicode(text));
    }
    if let Some(text) = snapshot.text {
        return Some(Clip::Text(text));
    }
    if snapshot.image {
        log::debug!("🖼️ 剪贴板为图片内容，暂不支持，忽略");
        return None;
    }
    if let Some(files) = snapshot.files {
        return Some(Clip::File(files));
    }
    None
}

// ============================================================================
// 监控器
// ============================================================================

/// 剪贴板监控器：状态 + 分发表
///
/// 通过 Builder 风格组装：
///
/// ```rust,no_run
/// use clipboard_actor::backend::SystemClipboard;
/// use clipboard_actor::clip::ClipKind;
/// use clipboard_actor::monitor::{callbacks, Monitor};
///
/// let monitor = Monitor::new(Box::new(SystemClipboard::new()))
///     .on_kind(ClipKind::Unicode, callbacks::print())
///     .with_default(callbacks::nop());
/// ```
pub struct Monitor {
    state: MonitorState,
    table: HashMap<ClipKind, Callback>,
    default_callback: Callback,
}

impl Monitor {
    pub fn new(backend: Box<dyn ClipboardBackend>) -> Self {
        Self {
            state: MonitorState::new(backend),
            table: HashMap::new(),
            default_callback: callbacks::nop(),
        }
    }

    /// 为某个 Clip 类型注册回调
    pub fn on_kind(mut self, kind: ClipKind, callback: Callback) -> Self {
        self.table.insert(kind, callback);
        self
    }

    /// 替换默认回调（未注册类型的兜底）
    pub fn with_default(mut self, callback: Callback) -> Self {
        self.default_callback = callback;
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MonitorState {
        &mut self.state
    }

    /// 处理一次系统剪贴板变化通知
    ///
    /// 流水线：禁用即丢弃 → 读取分类 → 去重 → 查表分发（恰好一次）。
    /// 注意这里不更新 `last_clip`——那是写入路径的职责。
    pub fn handle_change(&mut self) {
        if !self.state.enabled {
            log::debug!("⏭️  监控处于暂停状态，忽略本次变化");
            return;
        }

        let clip = match self.state.read_clip() {
            Ok(Some(clip)) => clip,
            Ok(None) => return,
            Err(e) => {
                log::warn!("读取剪贴板失败: {}", e);
                return;
            }
        };

        if self.state.last_clip.as_ref() == Some(&clip) {
            log::debug!("⏭️  剪贴板内容未变化，忽略");
            return;
        }

        log::info!("📋 剪贴板变化: {}", clip.summary());
        let callback = self
            .table
            .get_mut(&clip.kind())
            .unwrap_or(&mut self.default_callback);
        callback(&clip, &mut self.state);
    }
}
