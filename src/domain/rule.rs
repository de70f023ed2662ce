// ==========================================
// 运维工单报表系统 - 模式规则实体
// ==========================================
// 职责: 单条可匹配规则(模式 + 种类 + 优先级 + 目标值)
// 不变量: id 由存储层分配后不可变; 更新产生新值并刷新 updated_at
// ==========================================

use crate::domain::types::{PatternKind, RuleFamily};
use serde::{Deserialize, Serialize};

/// 模式规则
///
/// 同一规则族内按 (priority 升序, id 升序) 求值, 首条命中者胜出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    /// 规则ID(由存储层分配, 分配后不可变)
    pub id: i64,
    /// 所属规则族
    pub family: RuleFamily,
    /// 源模式(待匹配文本)
    pub source_pattern: String,
    /// 目标值(业务单元名或归一化状态)
    pub target_value: String,
    /// 模式种类
    pub pattern_kind: PatternKind,
    /// 优先级(越小越先求值)
    pub priority: i32,
    /// 是否启用(停用规则无条件不命中)
    pub active: bool,
    /// 创建时间(本地时间, %Y-%m-%d %H:%M:%S)
    pub created_at: String,
    /// 更新时间
    pub updated_at: String,
}

/// 新建规则参数(id 与时间戳由存储层填充)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatternRule {
    pub family: RuleFamily,
    pub source_pattern: String,
    pub target_value: String,
    pub pattern_kind: PatternKind,
    pub priority: i32,
    pub active: bool,
}

/// 规则更新参数(按 id 定位, 全字段覆写)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRuleUpdate {
    pub id: i64,
    pub source_pattern: String,
    pub target_value: String,
    pub pattern_kind: PatternKind,
    pub priority: i32,
    pub active: bool,
}
