// ==========================================
// 运维工单报表系统 - 模式匹配引擎
// ==========================================
// 规则: 停用规则无条件不命中; 三种模式均忽略大小写
// 红线: 非法正则降级为永不匹配, 匹配器永不抛错
// ==========================================

use crate::domain::rule::PatternRule;
use crate::domain::types::PatternKind;
use regex::RegexBuilder;

/// 单条规则匹配
///
/// # 规则
/// - 停用规则: 任何文本比较之前直接返回 false
/// - EXACT: 两侧去空白后, 忽略大小写的全串相等
/// - CONTAINS: 模式去空白, 忽略大小写的子串包含
/// - REGEX: 原始模式对原始文本的忽略大小写匹配; 编译失败记 warn 并返回 false
pub fn rule_matches(rule: &PatternRule, text: &str) -> bool {
    if !rule.active {
        return false;
    }
    pattern_matches(rule.pattern_kind, &rule.source_pattern, text)
}

/// 纯函数形式的模式匹配(规则预览入口复用)
pub fn pattern_matches(kind: PatternKind, pattern: &str, text: &str) -> bool {
    match kind {
        PatternKind::Exact => pattern.trim().to_lowercase() == text.trim().to_lowercase(),
        PatternKind::Contains => text
            .to_lowercase()
            .contains(&pattern.trim().to_lowercase()),
        PatternKind::Regex => match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => re.is_match(text),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "正则模式编译失败, 规则降级为永不匹配");
                false
            }
        },
    }
}
