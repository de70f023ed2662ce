// ==========================================
// 运维工单报表系统 - 规则集快照
// ==========================================
// 职责: 单规则族启用规则的有序只读视图, 提供 classify()
// 排序: (priority 升序, id 升序), 保证求值确定性
// ==========================================

use crate::domain::rule::PatternRule;
use crate::domain::types::{PatternKind, RuleFamily};
use regex::{Regex, RegexBuilder};

/// 业务单元识别无命中时的哨兵值
pub const UNCLASSIFIED_BUSINESS_UNIT: &str = "Sin clasificar";

/// 预编译规则(快照构建时一次性编译正则)
#[derive(Debug)]
struct CompiledRule {
    rule: PatternRule,
    /// REGEX 种类且编译成功时为 Some; 编译失败降级为永不匹配
    regex: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: PatternRule) -> Self {
        let regex = match rule.pattern_kind {
            PatternKind::Regex => {
                match RegexBuilder::new(&rule.source_pattern)
                    .case_insensitive(true)
                    .build()
                {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(
                            rule_id = rule.id,
                            pattern = %rule.source_pattern,
                            error = %e,
                            "正则模式编译失败, 规则降级为永不匹配"
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        Self { rule, regex }
    }

    fn matches(&self, text: &str) -> bool {
        if !self.rule.active {
            return false;
        }
        match self.rule.pattern_kind {
            PatternKind::Exact => {
                self.rule.source_pattern.trim().to_lowercase() == text.trim().to_lowercase()
            }
            PatternKind::Contains => text
                .to_lowercase()
                .contains(&self.rule.source_pattern.trim().to_lowercase()),
            PatternKind::Regex => match &self.regex {
                Some(re) => re.is_match(text),
                None => false,
            },
        }
    }
}

/// 规则集快照
///
/// 不可变结构: 构建后只读, 由缓存整体换引用, 并发读者要么看到旧快照
/// 要么看到新快照, 不会看到半构建状态。
#[derive(Debug)]
pub struct RuleSet {
    family: RuleFamily,
    rules: Vec<CompiledRule>,
    version: u64,
}

impl RuleSet {
    /// 从仓储查询结果构建快照
    ///
    /// 入参允许乱序, 构建时按 (priority, id) 重排。
    pub fn from_rules(family: RuleFamily, mut rules: Vec<PatternRule>, version: u64) -> Self {
        rules.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.id.cmp(&b.id)));
        Self {
            family,
            rules: rules.into_iter().map(CompiledRule::compile).collect(),
            version,
        }
    }

    pub fn family(&self) -> RuleFamily {
        self.family
    }

    /// 快照版本号(缓存失效计数)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 分类: 按序求值, 首条命中规则的 target_value 胜出
    ///
    /// 无命中时的规则族默认值:
    /// - STATUS_MAPPING / LEVEL_MAPPING: 原文透传
    /// - BUSINESS_UNIT: 哨兵值 "Sin clasificar"
    pub fn classify(&self, text: &str) -> String {
        for compiled in &self.rules {
            if compiled.matches(text) {
                return compiled.rule.target_value.clone();
            }
        }

        match self.family {
            RuleFamily::BusinessUnit => UNCLASSIFIED_BUSINESS_UNIT.to_string(),
            RuleFamily::StatusMapping | RuleFamily::LevelMapping => text.to_string(),
        }
    }
}
