// ==========================================
// 运维工单报表系统 - 领域类型定义
// ==========================================
// 红线: 规则种类/窗口类型为封闭枚举, 禁止继承式扩展
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 规则族 (Rule Family)
// ==========================================
// 每个规则族是一组独立排序的模式规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleFamily {
    BusinessUnit,  // 业务单元识别
    StatusMapping, // 状态归一化
    LevelMapping,  // 级别归一化
}

impl RuleFamily {
    /// 数据库存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleFamily::BusinessUnit => "BUSINESS_UNIT",
            RuleFamily::StatusMapping => "STATUS_MAPPING",
            RuleFamily::LevelMapping => "LEVEL_MAPPING",
        }
    }

    /// 从数据库存储值解析
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BUSINESS_UNIT" => Some(RuleFamily::BusinessUnit),
            "STATUS_MAPPING" => Some(RuleFamily::StatusMapping),
            "LEVEL_MAPPING" => Some(RuleFamily::LevelMapping),
            _ => None,
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 模式种类 (Pattern Kind)
// ==========================================
// 红线: 封闭标签变体, 匹配为 (kind, pattern, text) 的纯函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    Exact,    // 完全匹配(忽略大小写, 两侧去空白)
    Contains, // 包含匹配(忽略大小写)
    Regex,    // 正则匹配(忽略大小写, 编译失败降级为永不匹配)
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Exact => "EXACT",
            PatternKind::Contains => "CONTAINS",
            PatternKind::Regex => "REGEX",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "EXACT" => Some(PatternKind::Exact),
            "CONTAINS" => Some(PatternKind::Contains),
            "REGEX" => Some(PatternKind::Regex),
            _ => None,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 窗口作用域 (Window Scope)
// ==========================================
// 报表族维度: 月报 / 纠正性维护 / 全局覆盖
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowScope {
    Monthly,    // 月度报表
    Corrective, // 纠正性维护
    Global,     // 全局覆盖(全局模式开启时生效)
}

impl WindowScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowScope::Monthly => "MONTHLY",
            WindowScope::Corrective => "CORRECTIVE",
            WindowScope::Global => "GLOBAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MONTHLY" => Some(WindowScope::Monthly),
            "CORRECTIVE" => Some(WindowScope::Corrective),
            "GLOBAL" => Some(WindowScope::Global),
            _ => None,
        }
    }
}

impl fmt::Display for WindowScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 区间种类 (Range Kind)
// ==========================================
// DISABLED 表示回退到默认行为(当前 ISO 周)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeKind {
    Weekly,   // 周窗口(显式区间)
    Custom,   // 自定义窗口(显式区间)
    Disabled, // 禁用(回退: 时间戳落在"今天"所在 ISO 周)
}

impl RangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKind::Weekly => "WEEKLY",
            RangeKind::Custom => "CUSTOM",
            RangeKind::Disabled => "DISABLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WEEKLY" => Some(RangeKind::Weekly),
            "CUSTOM" => Some(RangeKind::Custom),
            "DISABLED" => Some(RangeKind::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 批次结果 (Batch Outcome)
// ==========================================
// 派生批次的整体结论: 全部成功 / 部分成功 / 失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchOutcome {
    Success,        // 全部行派生成功
    PartialSuccess, // 部分行失败(失败行被排除, 其余已落库)
    Failed,         // 无任何行成功, 不执行替换
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Success => write!(f, "SUCCESS"),
            BatchOutcome::PartialSuccess => write!(f, "PARTIAL_SUCCESS"),
            BatchOutcome::Failed => write!(f, "FAILED"),
        }
    }
}
