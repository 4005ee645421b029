//! 分发表回调的组合原语
//!
//! 面向装配层（不面向操作系统）的积木：空操作、日志打印、
//! 编辑并写回、独立多路分发、串联短路。与源头一致，
//! 组合后的回调仍然在监听线程内同步执行。

use crate::clip::Clip;
use crate::monitor::{writer, Callback};

/// 纯 Clip 变换步骤：`None` 表示本步放弃产出
pub type EditFn = Box<dyn Fn(&Clip) -> Option<Clip> + Send>;

/// 什么都不做
pub fn nop() -> Callback {
    Box::new(|_clip, _state| {})
}

/// 把收到的 Clip 摘要打进日志
pub fn print() -> Callback {
    Box::new(|clip, _state| {
        log::info!("📋 {}", clip.summary());
    })
}

/// 包装一个纯变换：产出非空时送入写入路径
///
/// 写入失败只记日志，监听继续——没有监督者会重启监听线程，
/// 它绝不能因为一次写入失败而死亡。
pub fn edit(f: impl Fn(&Clip) -> Option<Clip> + Send + 'static) -> Callback {
    Box::new(move |clip, state| {
        if let Some(new_clip) = f(clip) {
            if let Err(e) = writer::write_clipboard(&new_clip, state) {
                log::error!("❌ 写入剪贴板失败: {}", e);
            }
        }
    })
}

/// 用同一个 Clip 独立调用多个回调，结果互不影响
pub fn multi(mut callbacks: Vec<Callback>) -> Callback {
    Box::new(move |clip, state| {
        for callback in callbacks.iter_mut() {
            callback(clip, state);
        }
    })
}

/// 把 Clip 依次穿过多个变换步骤，任一步产出 `None` 即短路停止
pub fn chain(steps: Vec<EditFn>) -> Callback {
    Box::new(move |clip, _state| {
        let mut current = clip.clone();
        for step in &steps {
            match step(&current) {
                Some(next) => current = next,
                None => break,
            }
        }
    })
}
