// ==========================================
// 运维工单报表系统 - 工单实体
// ==========================================
// 职责: 原始导入行 + 派生后工单记录
// 不变量: request_id 为自然键; 重处理整体替换, status_locked 行状态保持不变
// ==========================================

use crate::domain::types::WindowScope;
use serde::{Deserialize, Serialize};

/// 带超链接的字段(显示文本与超链接已由上游分离)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedField {
    /// 显示文本(可能为空)
    pub text: Option<String>,
    /// 超链接(可能为空)
    pub hyperlink: Option<String>,
}

impl LinkedField {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            hyperlink: None,
        }
    }
}

/// 原始导入行(上游已完成列映射与类型化, 本层不做文件解析)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTicketRow {
    /// 工单号字段(文本缺失时从超链接回退提取)
    pub request_id: LinkedField,
    /// 创建时间(线格式: 日/月/年 时:分, 24小时制)
    pub created_time: Option<String>,
    /// 主题
    pub subject: Option<String>,
    /// 技术员
    pub technician: Option<String>,
    /// 应用/模块(业务单元识别的输入)
    pub application: Option<String>,
    /// 原始状态(状态归一化的输入)
    pub raw_status: Option<String>,
    /// 原始级别(级别归一化的输入)
    pub level: Option<String>,
}

/// 派生后工单记录
///
/// 原始字段 + 派生字段, 以 (request_id, report_scope) 为键整体替换。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// 工单号(自然键)
    pub request_id: String,
    /// 报表作用域
    pub report_scope: WindowScope,
    /// 主题
    pub subject: Option<String>,
    /// 技术员(占位值已归一化为空)
    pub technician: Option<String>,
    /// 应用/模块
    pub application: Option<String>,
    /// 原始状态(导入原文)
    pub raw_status: String,
    /// 归一化状态(状态规则族输出; status_locked 时保持人工值)
    pub canonical_status: String,
    /// 归一化级别(级别规则族输出)
    pub level: Option<String>,
    /// 业务单元(业务单元规则族输出)
    pub business_unit: String,
    /// 创建时间(线格式原文, 已通过严格解析校验)
    pub created_time: String,
    /// 是否落在当前报表日期窗口内
    pub in_date_range: bool,
    /// 被其他工单引用(enlaces)的次数
    pub linked_count: i64,
    /// 状态锁: 人工覆写后置位, 重处理不得改写归一化状态
    pub status_locked: bool,
    /// 导入批次ID
    pub import_batch_id: String,
    /// 创建时间(本地时间, %Y-%m-%d %H:%M:%S)
    pub created_at: String,
    /// 更新时间
    pub updated_at: String,
}
