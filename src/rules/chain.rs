//! 规则链：有序、仅含启用规则的变换序列
//!
//! # 设计思路
//!
//! 规则链在启动期从 YAML 规则文件一次性构造：
//! - 文件缺失、未知 `type`、任何一条规则构造失败 → 整体拒绝，零规则加载
//! - `enabled: false` 的描述符在加载时剔除（记日志），从不进入活动链
//!
//! 构造完成后规则链不可变，应用时按声明顺序从左到右折叠，
//! 是输入文本到输出文本的纯函数，不持有任何剪贴板状态。
//!
//! # 实现思路
//!
//! - 单条规则应用失败（只可能来自插件变体）时放弃本次事件：
//!   记错误日志、返回 `None`、剪贴板保持原样、监听继续。

use std::fs;
use std::path::{Path, PathBuf};

use crate::clip::Clip;
use crate::error::AppError;
use crate::rules::descriptor::RuleDescriptor;
use crate::rules::registry::TransformRegistry;
use crate::rules::Rule;

/// 缺省规则文件：`~/.clipboard-actor/rules.yaml`
pub fn default_rules_path() -> Result<PathBuf, AppError> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("无法确定用户主目录".to_string()))?;
    Ok(home.join(".clipboard-actor").join("rules.yaml"))
}

/// 有序的启用规则序列
#[derive(Debug)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    /// 从规则文件加载；文件缺失是启动期致命错误
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "规则文件不存在: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let chain = Self::from_yaml(&content)?;
        log::info!("✅ 已从 {} 加载 {} 条规则", path.display(), chain.len());
        Ok(chain)
    }

    /// 用内置注册表解析动态绑定规则
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        Self::from_yaml_with_registry(yaml, TransformRegistry::builtin())
    }

    /// 指定注册表解析，供测试与上层扩展注入自定义条目
    pub fn from_yaml_with_registry(
        yaml: &str,
        registry: &TransformRegistry,
    ) -> Result<Self, AppError> {
        let descriptors: Vec<RuleDescriptor> = serde_yaml::from_str(yaml)?;

        let mut rules = Vec::with_capacity(descriptors.len());
        for desc in descriptors {
            let name = desc.name.clone();
            match Rule::from_descriptor(desc, registry)? {
                Some(rule) => rules.push(rule),
                // from_descriptor 返回 None 仅在 enabled: false 时
                None => log::info!("⏭️  规则 '{}' 已禁用，跳过", name),
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 按声明顺序折叠全部规则
    pub fn apply(&self, text: &str) -> Result<String, AppError> {
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule.apply(&current)?;
        }
        Ok(current)
    }

    /// 对文本类 Clip 应用规则链，按原类型重新包装
    ///
    /// 非文本类型返回 `None`（上层分发表不会把它们接到这里）；
    /// 规则失败同样返回 `None`，本次事件放弃、剪贴板不被改写。
    pub fn apply_clip(&self, clip: &Clip) -> Option<Clip> {
        let text = clip.text()?;
        match self.apply(text) {
            Ok(new_text) => clip.with_text(new_text),
            Err(e) => {
                log::error!("❌ 规则链应用失败，本次剪贴板事件跳过: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_loads_empty_chain() {
        let chain = RuleChain::from_yaml("[]").unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.apply("text").unwrap(), "text");
    }

    #[test]
    fn test_disabled_rule_is_dropped_at_load() {
        let yaml = r#"
- name: shout
  description: 全部大写
  enabled: false
  type: str_method
  method_name: upper
"#;
        let chain = RuleChain::from_yaml(yaml).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_apply_clip_rewraps_same_kind() {
        let yaml = r#"
- name: shout
  enabled: true
  type: str_method
  method_name: upper
"#;
        let chain = RuleChain::from_yaml(yaml).unwrap();
        let out = chain.apply_clip(&Clip::Unicode("hi".into())).unwrap();
        assert_eq!(out, Clip::Unicode("HI".into()));
    }

    #[test]
    fn test_apply_clip_ignores_non_text_kinds() {
        let chain = RuleChain::from_yaml("[]").unwrap();
        assert!(chain.apply_clip(&Clip::Image).is_none());
        assert!(chain.apply_clip(&Clip::File(vec![])).is_none());
    }
}
