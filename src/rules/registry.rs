//! 动态绑定规则的注册表
//!
//! # 设计思路
//!
//! 配置中的 `class_method` / `function` 规则按"模块 + 符号名"引用一段
//! 文本变换实现。任意运行期符号加载在 Rust 里没有安全等价物，这里改为
//! 注册表模式：启动期把字符串键映射到编译期已知的实现，查不到即为
//! 致命配置错误。相比源头的任意符号加载，这是刻意收窄的灵活性。
//!
//! # 实现思路
//!
//! - 自由函数注册为现成的 `TransformFn`。
//! - 类注册为工厂：拿到 `init`（可缺省）与 `method_name`，校验后返回
//!   绑定好状态的 `TransformFn`。解析只发生一次，结果被规则缓存。
//! - 内置条目移植自源项目的演示脚本：`demo::CrazyString`（按温度随机
//!   切换大小写）与 `demo::reverse_string`，外加一个类级方法示例
//!   `textkit::Whitespace::collapse`。

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::Rng;

use crate::error::AppError;
use crate::rules::descriptor::InitSpec;
use crate::rules::TransformFn;

/// 类条目的工厂：由 init 参数与方法名产出绑定好的可调用对象
pub type ClassFactory = fn(Option<&InitSpec>, &str) -> Result<TransformFn, AppError>;

/// 字符串键到静态已知实现的映射
pub struct TransformRegistry {
    functions: HashMap<String, TransformFn>,
    classes: HashMap<String, ClassFactory>,
}

static BUILTIN: Lazy<TransformRegistry> = Lazy::new(|| {
    let mut registry = TransformRegistry::new();
    registry.register_function(
        "demo",
        "reverse_string",
        Arc::new(|text: &str| Ok(text.chars().rev().collect::<String>())),
    );
    registry.register_class("demo", "CrazyString", crazy_string_factory);
    registry.register_class("textkit", "Whitespace", whitespace_factory);
    registry
});

impl TransformRegistry {
    /// 空注册表（测试或上层扩展用）
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// 内置注册表：进程级共享，首次访问时构建
    pub fn builtin() -> &'static TransformRegistry {
        &BUILTIN
    }

    pub fn register_function(&mut self, module: &str, name: &str, f: TransformFn) {
        self.functions.insert(format!("{}::{}", module, name), f);
    }

    pub fn register_class(&mut self, module: &str, class_name: &str, factory: ClassFactory) {
        self.classes
            .insert(format!("{}::{}", module, class_name), factory);
    }

    /// 解析自由函数；查不到是致命配置错误
    pub fn resolve_function(
        &self,
        module: &str,
        function_name: &str,
    ) -> Result<TransformFn, AppError> {
        self.functions
            .get(&format!("{}::{}", module, function_name))
            .cloned()
            .ok_or_else(|| {
                AppError::Config(format!(
                    "未注册的函数: {} 中的 {}",
                    module, function_name
                ))
            })
    }

    /// 解析类方法：`init` 给出则构造实例绑定，否则绑定类级方法
    pub fn resolve_class_method(
        &self,
        module: &str,
        class_name: &str,
        init: Option<&InitSpec>,
        method_name: &str,
    ) -> Result<TransformFn, AppError> {
        let factory = self
            .classes
            .get(&format!("{}::{}", module, class_name))
            .ok_or_else(|| {
                AppError::Config(format!("未注册的类: {} 中的 {}", module, class_name))
            })?;
        factory(init, method_name)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 内置条目
// ============================================================================

/// `demo::CrazyString`：实例方法 `crazify`，按温度随机切换大小写
///
/// 构造参数 `temperature`（位置参数 0 或命名参数），缺省 0.7。
fn crazy_string_factory(
    init: Option<&InitSpec>,
    method_name: &str,
) -> Result<TransformFn, AppError> {
    if method_name != "crazify" {
        return Err(AppError::Config(format!(
            "CrazyString 没有方法: {}",
            method_name
        )));
    }
    // crazify 是实例方法，没有 init 无从构造实例
    let init = init.ok_or_else(|| {
        AppError::Config("CrazyString.crazify 需要实例，请提供 init".to_string())
    })?;
    let temperature = init.number_arg(0, "temperature").unwrap_or(0.7);

    Ok(Arc::new(move |text: &str| {
        let mut rng = rand::thread_rng();
        let mut lower = true;
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if !c.is_alphabetic() {
                out.push(c);
                continue;
            }
            if lower {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            if rng.r#gen::<f64>() <= temperature {
                lower = !lower;
            }
        }
        Ok(out)
    }))
}

/// `textkit::Whitespace`：类级方法 `collapse`，把连续空白压成单个空格
fn whitespace_factory(
    _init: Option<&InitSpec>,
    method_name: &str,
) -> Result<TransformFn, AppError> {
    match method_name {
        "collapse" => Ok(Arc::new(|text: &str| {
            Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
        })),
        other => Err(AppError::Config(format!(
            "Whitespace 没有方法: {}",
            other
        ))),
    }
}
