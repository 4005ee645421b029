//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 错误分为两大类：
//! - **配置错误**（规则文件缺失、未知规则类型、非法正则、无法解析的符号）：
//!   启动期致命，监听器启动前即退出。
//! - **运行期错误**（剪贴板读写失败、规则应用失败）：记录日志后继续监听，
//!   绝不让监听线程死亡。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` / `serde_yaml::Error` 提供 `From` 转换，无需手动 map。

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读写操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 规则配置错误（启动期致命）
    #[error("规则配置错误: {0}")]
    Config(String),

    /// 单条规则在应用阶段失败
    #[error("规则 '{0}' 应用失败: {1}")]
    Rule(String, String),

    /// 规则文件解析失败（未知 type 等一律整体拒绝）
    #[error("解析规则文件失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}
