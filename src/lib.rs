//! # clipboard-actor — 库入口
//!
//! 监听系统剪贴板变化，对文本内容应用可配置的规则链，
//! 并把结果安全地写回剪贴板（不触发反馈回环）。
//!
//! ## 架构总览
//!
//! ```text
//! 系统剪贴板变化通知
//!        │
//!        ▼
//! ┌─ monitor::listener ── clipboard-master 消息泵（独立线程）
//! │        │
//! │        ▼
//! ├─ monitor ─────────── 两态状态机 + 分类 + 去重 + 分发表
//! │        │
//! │        ▼
//! ├─ rules ───────────── 规则链（regex / replace / str_method / 注册表插件）
//! │        │
//! │        ▼
//! └─ monitor::writer ─── 幂等、回环安全的写回路径
//!          │
//!          ▼
//!      backend ────────── arboard + Win32 CF_HDROP 系统剪贴板访问
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`clip`] | 剪贴板内容快照 `Clip` 与结构相等性 |
//! | [`backend`] | 系统剪贴板访问 trait 与真实实现 |
//! | [`rules`] | 规则变体、插件注册表、规则链加载与应用 |
//! | [`monitor`] | 状态机、分类、去重、分发、监听线程、写回路径 |

pub mod backend;
pub mod clip;
pub mod error;
pub mod monitor;
pub mod rules;
