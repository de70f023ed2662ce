// ==========================================
// 运维工单报表系统 - 工单查询与人工操作API
// ==========================================
// 职责: 工单记录查询 / 关联分组视图 / 人工状态覆写
// 红线: 人工覆写校验顺序固定: 存在性 → 状态锁 → 资格状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::link::LinkGroup;
use crate::domain::ticket::TicketRecord;
use crate::domain::types::WindowScope;
use crate::engine::link_aggregator::group_by_linked_id;
use crate::i18n::{t, t_with_args};
use crate::repository::link_repo::TicketLinkRepository;
use crate::repository::ticket_repo::TicketRecordRepository;
use std::sync::Arc;

/// 唯一允许人工覆写的当前状态
pub const MANUAL_UPDATE_ELIGIBLE_STATUS: &str = "En espera de respuesta del cliente";

pub struct TicketApi {
    ticket_repo: Arc<TicketRecordRepository>,
    link_repo: Arc<TicketLinkRepository>,
}

impl TicketApi {
    pub fn new(ticket_repo: Arc<TicketRecordRepository>, link_repo: Arc<TicketLinkRepository>) -> Self {
        Self {
            ticket_repo,
            link_repo,
        }
    }

    /// 按工单号查询单条记录
    pub fn get_record(&self, request_id: &str) -> ApiResult<TicketRecord> {
        self.ticket_repo
            .find_by_request_id(request_id)?
            .ok_or_else(|| {
                ApiError::NotFound(t_with_args("ticket.not_found", &[("id", request_id)]))
            })
    }

    /// 列出某作用域的全部记录
    pub fn list_records(&self, scope: WindowScope) -> ApiResult<Vec<TicketRecord>> {
        Ok(self.ticket_repo.list_by_scope(scope)?)
    }

    /// 关联分组视图: 按父工单号聚合全部关联关系
    pub fn list_link_groups(&self) -> ApiResult<Vec<LinkGroup>> {
        let links = self.link_repo.get_all()?;
        Ok(group_by_linked_id(&links))
    }

    /// 人工状态覆写
    ///
    /// # 校验顺序(固定, 不可调整)
    /// 1. 新状态非空
    /// 2. 记录存在
    /// 3. 状态锁未置位 —— 已锁定记录的二次覆写必须报"已锁定", 而非资格错误
    /// 4. 当前归一化状态为唯一资格状态
    ///
    /// 通过后持久化新状态并置位状态锁, 下一次批次派生必须原样保留。
    pub fn update_status_manual(&self, request_id: &str, new_status: &str) -> ApiResult<TicketRecord> {
        let new_status = new_status.trim();
        if new_status.is_empty() {
            return Err(ApiError::InvalidInput(t("ticket.status_empty")));
        }

        let record = self.get_record(request_id)?;

        if record.status_locked {
            return Err(ApiError::ManualOperationRejected {
                reason: t_with_args("ticket.status_already_locked", &[("id", request_id)]),
            });
        }

        if record.canonical_status != MANUAL_UPDATE_ELIGIBLE_STATUS {
            return Err(ApiError::ManualOperationRejected {
                reason: t_with_args(
                    "ticket.status_not_eligible",
                    &[
                        ("id", request_id),
                        ("status", &record.canonical_status),
                        ("eligible", MANUAL_UPDATE_ELIGIBLE_STATUS),
                    ],
                ),
            });
        }

        self.ticket_repo.update_status_locked(request_id, new_status)?;
        tracing::info!(
            request_id = %request_id,
            new_status = %new_status,
            "人工状态覆写已生效, 状态锁置位"
        );

        self.get_record(request_id)
    }
}
