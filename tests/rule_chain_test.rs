//! 规则链加载与应用的集成测试

use std::io::Write;
use std::sync::Arc;

use clipboard_actor::clip::Clip;
use clipboard_actor::error::AppError;
use clipboard_actor::rules::registry::TransformRegistry;
use clipboard_actor::rules::RuleChain;

#[test]
fn test_rules_apply_in_declared_order() {
    // 顺序替换而非同时替换："a" 先变 "b"，再被第二条变 "c"
    let yaml = r#"
- name: a-to-b
  enabled: true
  type: replace
  find: "a"
  replace: "b"
- name: b-to-c
  enabled: true
  type: replace
  find: "b"
  replace: "c"
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    // 活动链按声明顺序持有规则
    let names: Vec<&str> = chain.rules().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a-to-b", "b-to-c"]);
    assert_eq!(chain.apply("a").unwrap(), "c");
}

#[test]
fn test_disabled_rule_never_affects_output() {
    let with_disabled = r#"
- name: shout
  enabled: true
  type: str_method
  method_name: upper
- name: sabotage
  enabled: false
  type: replace
  find: "HELLO"
  replace: "GOODBYE"
"#;
    let without = r#"
- name: shout
  enabled: true
  type: str_method
  method_name: upper
"#;
    let a = RuleChain::from_yaml(with_disabled).unwrap();
    let b = RuleChain::from_yaml(without).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a.apply("hello").unwrap(), b.apply("hello").unwrap());
}

#[test]
fn test_unknown_rule_type_rejects_whole_chain() {
    // 第一条完全合法，但未知 type 必须整体拒绝、零规则加载
    let yaml = r#"
- name: fine
  enabled: true
  type: str_method
  method_name: lower
- name: bogus
  enabled: true
  type: telepathy
"#;
    assert!(matches!(
        RuleChain::from_yaml(yaml),
        Err(AppError::Yaml(_))
    ));
}

#[test]
fn test_invalid_regex_is_fatal_at_load() {
    let yaml = r#"
- name: broken
  enabled: true
  type: regex
  pattern: "("
  replacement: "x"
"#;
    assert!(matches!(
        RuleChain::from_yaml(yaml),
        Err(AppError::Config(_))
    ));
}

#[test]
fn test_unknown_str_method_is_fatal_at_load() {
    let yaml = r#"
- name: broken
  enabled: true
  type: str_method
  method_name: explode
"#;
    assert!(matches!(
        RuleChain::from_yaml(yaml),
        Err(AppError::Config(_))
    ));
}

#[test]
fn test_unresolvable_plugin_symbols_are_fatal_at_load() {
    let function = r#"
- name: ghost-fn
  enabled: true
  type: function
  module: nowhere
  function_name: vanish
"#;
    let class = r#"
- name: ghost-class
  enabled: true
  type: class_method
  module: nowhere
  class_name: Ghost
  method_name: haunt
"#;
    assert!(matches!(
        RuleChain::from_yaml(function),
        Err(AppError::Config(_))
    ));
    assert!(matches!(
        RuleChain::from_yaml(class),
        Err(AppError::Config(_))
    ));
}

#[test]
fn test_regex_rule_supports_capture_groups() {
    let yaml = r#"
- name: swap-pair
  enabled: true
  type: regex
  pattern: "(\\w+)=(\\w+)"
  replacement: "$2=$1"
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    assert_eq!(chain.apply("key=value").unwrap(), "value=key");
}

#[test]
fn test_function_rule_resolves_from_registry() {
    let yaml = r#"
- name: mirror
  enabled: true
  type: function
  module: demo
  function_name: reverse_string
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    assert_eq!(chain.apply("abc").unwrap(), "cba");
}

#[test]
fn test_class_method_rule_with_init_args() {
    // 温度 0 时 CrazyString 永不切换大小写，输出全小写，结果可断言
    let yaml = r#"
- name: crazy
  enabled: true
  type: class_method
  module: demo
  class_name: CrazyString
  init:
    args: [0.0]
  method_name: crazify
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    assert_eq!(chain.apply("MiXeD 42").unwrap(), "mixed 42");
}

#[test]
fn test_class_method_rule_without_init_binds_class_level() {
    let yaml = r#"
- name: tidy
  enabled: true
  type: class_method
  module: textkit
  class_name: Whitespace
  method_name: collapse
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    assert_eq!(chain.apply("a   b\t c").unwrap(), "a b c");
}

#[test]
fn test_load_from_file_and_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("rules.yaml");
    assert!(matches!(
        RuleChain::load(&missing),
        Err(AppError::Config(_))
    ));

    let mut file = std::fs::File::create(&missing).unwrap();
    writeln!(
        file,
        "- name: shout\n  enabled: true\n  type: str_method\n  method_name: upper"
    )
    .unwrap();
    let chain = RuleChain::load(&missing).unwrap();
    assert_eq!(chain.apply("hi").unwrap(), "HI");
}

#[test]
fn test_failing_rule_aborts_event_and_leaves_clip_unwritten() {
    // 注入一个总是失败的插件，验证 apply_clip 放弃本次事件
    let mut registry = TransformRegistry::new();
    registry.register_function(
        "testkit",
        "always_fail",
        Arc::new(|_text: &str| -> Result<String, AppError> {
            Err(AppError::Clipboard("boom".to_string()))
        }),
    );
    let yaml = r#"
- name: doomed
  enabled: true
  type: function
  module: testkit
  function_name: always_fail
"#;
    let chain = RuleChain::from_yaml_with_registry(yaml, &registry).unwrap();
    assert!(chain.apply("x").is_err());
    assert!(chain.apply_clip(&Clip::Unicode("x".into())).is_none());
}

#[test]
fn test_idempotent_chain_is_stable_under_reapplication() {
    let yaml = r#"
- name: fold
  enabled: true
  type: str_method
  method_name: lower
- name: trim
  enabled: true
  type: str_method
  method_name: strip
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    let once = chain.apply("  HeLLo  ").unwrap();
    let twice = chain.apply(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_swapcase_chain_is_not_idempotent() {
    // 非幂等规则集：二次应用必须得到不同结果，不能被误当作幂等
    let yaml = r#"
- name: flip
  enabled: true
  type: str_method
  method_name: swapcase
"#;
    let chain = RuleChain::from_yaml(yaml).unwrap();
    let once = chain.apply("ab").unwrap();
    let twice = chain.apply(&once).unwrap();
    assert_ne!(once, twice);
    assert_eq!(twice, "ab");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn replace_rule_removes_every_occurrence(input in "[abc]{0,32}") {
            let yaml = r#"
- name: a-to-b
  enabled: true
  type: replace
  find: "a"
  replace: "b"
"#;
            let chain = RuleChain::from_yaml(yaml).unwrap();
            let out = chain.apply(&input).unwrap();
            prop_assert!(!out.contains('a'));
        }

        #[test]
        fn lowercase_chain_is_idempotent_for_any_input(input in ".{0,64}") {
            let yaml = r#"
- name: fold
  enabled: true
  type: str_method
  method_name: lower
"#;
            let chain = RuleChain::from_yaml(yaml).unwrap();
            let once = chain.apply(&input).unwrap();
            let twice = chain.apply(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
