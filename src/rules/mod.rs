//! 文本变换规则模块
//!
//! # 设计思路
//!
//! 规则集合小且固定，因此用封闭枚举 `RuleAction` 表达五种规则变体，
//! 加载时穷尽匹配，不留开放继承层次：
//! - **正则替换**：模式在构造时编译一次，之后从不重编译
//! - **字面替换**：普通子串查找替换
//! - **内置字符串操作**：upper / lower / strip 等，按名字解析
//! - **动态绑定**（class_method / function）：通过启动期注册表把字符串键
//!   解析成编译期已知的可调用对象，构造时解析一次并缓存
//!
//! 所有构造期失败（非法正则、未知操作名、无法解析的符号）都是致命错误，
//! 在加载阶段立刻暴露，绝不推迟到 apply 时。
//!
//! # 实现思路
//!
//! - `Rule::apply` 对内置变体是全函数；插件变体可能失败，错误统一折算为
//!   `AppError::Rule`，由规则链层决定放弃本次事件。
//! - 禁用规则在加载时被整体剔除，不进入活动链（见 [`chain`]）。

pub mod chain;
pub mod descriptor;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::AppError;
use descriptor::{RuleDescriptor, RuleSpec};
use registry::TransformRegistry;

pub use chain::RuleChain;

/// 注册表解析出的可调用对象，构造后缓存复用
pub type TransformFn = Arc<dyn Fn(&str) -> Result<String, AppError> + Send + Sync>;

/// 一条已构造完成的规则：命名、可描述、不可变
pub struct Rule {
    pub name: String,
    pub description: String,
    action: RuleAction,
}

/// 规则变体（封闭枚举）
enum RuleAction {
    Regex { pattern: Regex, replacement: String },
    Replace { find: String, replace: String },
    StrMethod(StrOp),
    Dynamic(TransformFn),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match &self.action {
            RuleAction::Regex { .. } => "regex",
            RuleAction::Replace { .. } => "replace",
            RuleAction::StrMethod(_) => "str_method",
            RuleAction::Dynamic(_) => "dynamic",
        };
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("variant", &variant)
            .finish()
    }
}

impl Rule {
    /// 从描述符构造规则
    ///
    /// 返回 `Ok(None)` 表示该描述符被 `enabled: false` 主动禁用，
    /// 调用方应记录跳过日志并丢弃。
    pub(crate) fn from_descriptor(
        desc: RuleDescriptor,
        registry: &TransformRegistry,
    ) -> Result<Option<Rule>, AppError> {
        if !desc.enabled {
            return Ok(None);
        }

        let action = match desc.spec {
            RuleSpec::Regex {
                pattern,
                replacement,
            } => {
                let pattern = Regex::new(&pattern).map_err(|e| {
                    AppError::Config(format!("规则 '{}' 的正则非法: {}", desc.name, e))
                })?;
                RuleAction::Regex {
                    pattern,
                    replacement,
                }
            }
            RuleSpec::Replace { find, replace } => RuleAction::Replace { find, replace },
            RuleSpec::StrMethod { method_name } => {
                let op = StrOp::parse(&method_name).ok_or_else(|| {
                    AppError::Config(format!(
                        "规则 '{}' 引用了未知的字符串操作: {}",
                        desc.name, method_name
                    ))
                })?;
                RuleAction::StrMethod(op)
            }
            RuleSpec::ClassMethod {
                module,
                class_name,
                init,
                method_name,
            } => RuleAction::Dynamic(registry.resolve_class_method(
                &module,
                &class_name,
                init.as_ref(),
                &method_name,
            )?),
            RuleSpec::Function {
                module,
                function_name,
            } => RuleAction::Dynamic(registry.resolve_function(&module, &function_name)?),
        };

        Ok(Some(Rule {
            name: desc.name,
            description: desc.description,
            action,
        }))
    }

    /// 对输入文本应用本条规则，纯函数
    pub fn apply(&self, text: &str) -> Result<String, AppError> {
        match &self.action {
            RuleAction::Regex {
                pattern,
                replacement,
            } => Ok(pattern.replace_all(text, replacement.as_str()).into_owned()),
            RuleAction::Replace { find, replace } => Ok(text.replace(find, replace)),
            RuleAction::StrMethod(op) => Ok(op.apply(text)),
            RuleAction::Dynamic(f) => {
                f(text).map_err(|e| AppError::Rule(self.name.clone(), e.to_string()))
            }
        }
    }
}

// ============================================================================
// 内置字符串操作
// ============================================================================

/// 内置字符串操作，对应配置中的 `method_name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrOp {
    Upper,
    Lower,
    Strip,
    Lstrip,
    Rstrip,
    Title,
    Capitalize,
    Swapcase,
    Casefold,
}

impl StrOp {
    /// 按名字解析；未知名字返回 `None`，由调用方转成致命配置错误
    pub fn parse(name: &str) -> Option<StrOp> {
        match name {
            "upper" => Some(StrOp::Upper),
            "lower" => Some(StrOp::Lower),
            "strip" => Some(StrOp::Strip),
            "lstrip" => Some(StrOp::Lstrip),
            "rstrip" => Some(StrOp::Rstrip),
            "title" => Some(StrOp::Title),
            "capitalize" => Some(StrOp::Capitalize),
            "swapcase" => Some(StrOp::Swapcase),
            "casefold" => Some(StrOp::Casefold),
            _ => None,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            StrOp::Upper => text.to_uppercase(),
            StrOp::Lower | StrOp::Casefold => text.to_lowercase(),
            StrOp::Strip => text.trim().to_string(),
            StrOp::Lstrip => text.trim_start().to_string(),
            StrOp::Rstrip => text.trim_end().to_string(),
            StrOp::Title => title_case(text),
            StrOp::Capitalize => capitalize(text),
            StrOp::Swapcase => text
                .chars()
                .flat_map(|c| {
                    if c.is_uppercase() {
                        c.to_lowercase().collect::<Vec<_>>()
                    } else if c.is_lowercase() {
                        c.to_uppercase().collect::<Vec<_>>()
                    } else {
                        vec![c]
                    }
                })
                .collect(),
        }
    }
}

/// 每个单词首字母大写，其余小写；单词边界为任意非字母字符
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// 首字符大写，其余全部小写
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
