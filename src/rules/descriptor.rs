//! 规则描述符（配置文件反序列化层）
//!
//! 配置文件是一个规则描述符序列，每条带判别字段 `type` 与公共字段
//! `name` / `description` / `enabled`，其余字段随变体而异。
//! 未知 `type` 会让 serde 直接报错，整个配置被整体拒绝，没有部分加载。

use std::collections::BTreeMap;

use serde::Deserialize;

/// 单条规则描述符
#[derive(Debug, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub spec: RuleSpec,
}

/// 变体专有字段，按 `type` 判别
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    Regex {
        pattern: String,
        replacement: String,
    },
    Replace {
        find: String,
        replace: String,
    },
    StrMethod {
        method_name: String,
    },
    ClassMethod {
        module: String,
        class_name: String,
        /// 缺省表示绑定类级方法；给出则按 args / kwargs 构造实例
        #[serde(default)]
        init: Option<InitSpec>,
        method_name: String,
    },
    Function {
        module: String,
        function_name: String,
    },
}

/// `class_method` 规则的实例构造参数
#[derive(Debug, Default, Deserialize)]
pub struct InitSpec {
    #[serde(default)]
    pub args: Vec<serde_yaml::Value>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, serde_yaml::Value>,
}

impl InitSpec {
    /// 取第 `index` 个位置参数或名为 `key` 的命名参数，解析成 f64
    pub fn number_arg(&self, index: usize, key: &str) -> Option<f64> {
        self.args
            .get(index)
            .or_else(|| self.kwargs.get(key))
            .and_then(serde_yaml::Value::as_f64)
    }
}
