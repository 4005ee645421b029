//! # clipboard-actor — 应用入口
//!
//! 本文件仅负责日志初始化、规则链加载与监控器装配，
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::sync::Arc;

use clipboard_actor::backend::SystemClipboard;
use clipboard_actor::clip::ClipKind;
use clipboard_actor::monitor::{callbacks, listener, Monitor};
use clipboard_actor::rules::chain::default_rules_path;
use clipboard_actor::rules::RuleChain;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 规则文件路径：首个命令行参数，缺省 ~/.clipboard-actor/rules.yaml
    let rules_path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match default_rules_path() {
            Ok(path) => path,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    // 任何配置错误都在监听启动前致命退出
    let chain = match RuleChain::load(&rules_path) {
        Ok(chain) => Arc::new(chain),
        Err(e) => {
            log::error!("加载规则失败: {}", e);
            std::process::exit(1);
        }
    };

    // 分发表：文本类内容走规则链编辑写回，其余类型空操作
    let edit_text = {
        let chain = Arc::clone(&chain);
        callbacks::edit(move |clip| chain.apply_clip(clip))
    };
    let edit_unicode = {
        let chain = Arc::clone(&chain);
        callbacks::edit(move |clip| chain.apply_clip(clip))
    };
    let monitor = Monitor::new(Box::new(SystemClipboard::new()))
        .on_kind(ClipKind::Text, edit_text)
        .on_kind(ClipKind::Unicode, edit_unicode)
        .with_default(callbacks::nop());

    listener::spawn(monitor);
    log::info!("📋 剪贴板替换服务已启动（Ctrl+C 退出）");

    // 守护线程语义：中断只停主等待，不 join 监听线程
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("等待中断信号失败: {}", e);
        std::process::exit(1);
    }
    log::info!("👋 收到中断，程序退出");
}
