// ==========================================
// 运维工单报表系统 - 日期窗口实体
// ==========================================
// 职责: 日期区间 + 作用域 + 区间种类
// 不变量: 每个作用域同一时刻至多一个 is_active 窗口
// ==========================================

use crate::domain::types::{RangeKind, WindowScope};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 日期窗口
///
/// `from_date` / `to_date` 为含端点的日历日期区间。
/// `range_kind = DISABLED` 时区间字段无意义, 成员判定回退为"当前 ISO 周"。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    /// 窗口ID(隐式回退窗口为 0, 未持久化)
    pub id: i64,
    /// 起始日期(含)
    pub from_date: NaiveDate,
    /// 结束日期(含)
    pub to_date: NaiveDate,
    /// 描述
    pub description: String,
    /// 是否为该作用域的当前活动窗口
    pub is_active: bool,
    /// 区间种类
    pub range_kind: RangeKind,
    /// 作用域
    pub scope: WindowScope,
}

impl DateWindow {
    /// 构造隐式回退窗口(未配置任何活动窗口时使用)
    ///
    /// 区间字段以 `today` 占位, 实际判定由 DISABLED 回退逻辑完成。
    pub fn implicit_disabled(scope: WindowScope, today: NaiveDate) -> Self {
        Self {
            id: 0,
            from_date: today,
            to_date: today,
            description: String::new(),
            is_active: false,
            range_kind: RangeKind::Disabled,
            scope,
        }
    }
}

/// 新建/保存窗口参数(id 由存储层分配)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDateWindow {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub description: String,
    pub range_kind: RangeKind,
}

// ==========================================
// 窗口全局设置 (单例)
// ==========================================

/// 窗口设置单例(id 固定为 1)
///
/// `global_mode_enabled = true` 时, GLOBAL 作用域窗口覆盖所有作用域。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub global_mode_enabled: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            global_mode_enabled: false,
        }
    }
}
