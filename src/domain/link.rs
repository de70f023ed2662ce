// ==========================================
// 运维工单报表系统 - 工单关联实体
// ==========================================
// 职责: 父子工单关联(多对多), 仅批量替换, 无独立生命周期
// ==========================================

use serde::{Deserialize, Serialize};

/// 父子工单关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketLink {
    /// 父工单号(被依赖方)
    pub parent_request_id: String,
    /// 子工单号(依赖方)
    pub child_request_id: String,
    /// 父侧超链接
    pub parent_hyperlink: Option<String>,
    /// 子侧超链接
    pub child_hyperlink: Option<String>,
}

/// 按父工单号聚合的关联组(用于跨工单分组视图)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGroup {
    /// 被关联的父工单号
    pub linked_id: String,
    /// 该组内的关联(保持输入顺序)
    pub relationships: Vec<TicketLink>,
}
