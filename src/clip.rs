//! 剪贴板内容快照（Clip）
//!
//! # 设计思路
//!
//! `Clip` 是对剪贴板内容的一次分类快照：文本（Unicode / 传统编码）携带字符串，
//! 文件列表携带有序路径序列，图片仅作为"存在"被识别，不携带可用内容。
//! 每次读取和每次规则变换都构造全新的 `Clip`，从不原地修改。
//!
//! # 实现思路
//!
//! - 封闭枚举代替 kind + payload 两个字段，非法组合（如携带文本的图片）
//!   在类型层面不可表达。
//! - 相等性手写实现：文本按字符串比较，文件按有序列表比较，
//!   图片永远不相等（没有可比较的内容），跨类型永远不相等。
//!   因此 `Clip` 只实现 `PartialEq`，不实现 `Eq`（图片不满足自反性）。

use std::path::PathBuf;

/// 剪贴板内容类型标签，用于分发表查找
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKind {
    /// 传统编码文本（CF_TEXT 一类）
    Text,
    /// Unicode 文本
    Unicode,
    /// 图片（仅识别存在，内容不支持）
    Image,
    /// 文件拖放列表
    File,
}

/// 剪贴板内容的一次不可变快照
#[derive(Debug, Clone)]
pub enum Clip {
    Text(String),
    Unicode(String),
    Image,
    File(Vec<PathBuf>),
}

impl Clip {
    /// 返回内容类型标签
    pub fn kind(&self) -> ClipKind {
        match self {
            Clip::Text(_) => ClipKind::Text,
            Clip::Unicode(_) => ClipKind::Unicode,
            Clip::Image => ClipKind::Image,
            Clip::File(_) => ClipKind::File,
        }
    }

    /// 文本载荷（仅 Text / Unicode）
    pub fn text(&self) -> Option<&str> {
        match self {
            Clip::Text(s) | Clip::Unicode(s) => Some(s),
            _ => None,
        }
    }

    /// 文件列表载荷（仅 File）
    pub fn files(&self) -> Option<&[PathBuf]> {
        match self {
            Clip::File(paths) => Some(paths),
            _ => None,
        }
    }

    /// 用新文本重新包装，保持原有类型；非文本类型返回 `None`
    pub fn with_text(&self, text: String) -> Option<Clip> {
        match self {
            Clip::Text(_) => Some(Clip::Text(text)),
            Clip::Unicode(_) => Some(Clip::Unicode(text)),
            _ => None,
        }
    }

    /// 日志展示用摘要，避免把整段剪贴板内容刷进日志
    pub fn summary(&self) -> String {
        match self {
            Clip::Text(s) => format!("Text({} 字符)", s.chars().count()),
            Clip::Unicode(s) => format!("Unicode({} 字符)", s.chars().count()),
            Clip::Image => "Image".to_string(),
            Clip::File(paths) => format!("File({} 个)", paths.len()),
        }
    }
}

impl PartialEq for Clip {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Clip::Text(a), Clip::Text(b)) => a == b,
            (Clip::Unicode(a), Clip::Unicode(b)) => a == b,
            // 有序比较：相同路径不同顺序视为不同内容
            (Clip::File(a), Clip::File(b)) => a == b,
            // 图片没有可比较的载荷，永远不相等；跨类型同样不相等
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_equality_compares_payload() {
        assert_eq!(Clip::Unicode("hello".into()), Clip::Unicode("hello".into()));
        assert_ne!(Clip::Unicode("hello".into()), Clip::Unicode("world".into()));
    }

    #[test]
    fn test_cross_kind_never_equal() {
        assert_ne!(Clip::Text("x".into()), Clip::Unicode("x".into()));
    }

    #[test]
    fn test_image_never_equal_even_to_itself() {
        assert_ne!(Clip::Image, Clip::Image);
    }

    #[test]
    fn test_payload_accessors_by_kind() {
        let clip = Clip::File(vec![PathBuf::from("a.txt")]);
        assert_eq!(clip.files(), Some(&[PathBuf::from("a.txt")][..]));
        assert!(clip.text().is_none());
        assert!(Clip::Unicode("x".into()).files().is_none());
    }

    #[test]
    fn test_file_equality_is_order_sensitive() {
        let a = Clip::File(vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        let b = Clip::File(vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        let reversed = Clip::File(vec![PathBuf::from("b.txt"), PathBuf::from("a.txt")]);
        assert_eq!(a, b);
        assert_ne!(a, reversed);
    }

    #[test]
    fn test_with_text_keeps_kind() {
        let clip = Clip::Unicode("old".into());
        let rewrapped = clip.with_text("new".into()).unwrap();
        assert_eq!(rewrapped.kind(), ClipKind::Unicode);
        assert_eq!(rewrapped.text(), Some("new"));
        assert!(Clip::Image.with_text("x".into()).is_none());
    }
}
