// ==========================================
// 运维工单报表系统 - 批次派生API
// ==========================================
// 职责: 批次派生入口(清洗 → 分类 → 窗口 → 聚合 → 整体替换)
// 约定: 行级错误不致命; 零成功行 → FAILED, 不执行替换, 旧集合保持完好
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::ticket::RawTicketRow;
use crate::domain::types::{BatchOutcome, RuleFamily, WindowScope};
use crate::engine::link_aggregator::LinkAggregator;
use crate::engine::rule_cache::RuleSetCache;
use crate::engine::window_registry::WindowRegistry;
use crate::importer::derivation::{DerivationContext, DerivationPipeline};
use crate::importer::error::RowError;
use crate::repository::{TicketLinkRepository, TicketRecordRepository};
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 固定报表时区(UTC 偏移小时数)
pub const REPORTING_TZ_OFFSET_HOURS: i32 = 1;

/// 响应中最多携带的行级错误明细条数
pub const MAX_ROW_ERROR_DETAILS: usize = 20;

/// 固定报表时区下的"今天"(每批次计算一次后传入引擎)
pub fn reporting_today() -> NaiveDate {
    match FixedOffset::east_opt(REPORTING_TZ_OFFSET_HOURS * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// 批次派生API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveApiResponse {
    /// 批次结论
    pub outcome: BatchOutcome,
    /// 成功落库的记录数
    pub imported: i64,
    /// 失败(被剔除)的行数
    pub failed: i64,
    /// 导入批次ID(uuid, 用于追溯)
    pub batch_id: String,
    /// 行级错误明细(最多前 MAX_ROW_ERROR_DETAILS 条)
    pub row_errors: Vec<RowError>,
    /// 派生耗时(毫秒)
    pub elapsed_ms: i64,
}

/// 批次派生服务接口
#[async_trait]
pub trait DeriveService: Send + Sync {
    /// 派生一个批次并整体替换该作用域的记录集合
    async fn derive_and_replace(
        &self,
        rows: Vec<RawTicketRow>,
        scope: WindowScope,
    ) -> ApiResult<DeriveApiResponse>;
}

/// 批次派生API
pub struct DeriveApi {
    ticket_repo: Arc<TicketRecordRepository>,
    link_repo: Arc<TicketLinkRepository>,
    rule_cache: Arc<RuleSetCache>,
    window_registry: Arc<WindowRegistry>,
    pipeline: DerivationPipeline,
}

impl DeriveApi {
    pub fn new(
        ticket_repo: Arc<TicketRecordRepository>,
        link_repo: Arc<TicketLinkRepository>,
        rule_cache: Arc<RuleSetCache>,
        window_registry: Arc<WindowRegistry>,
    ) -> Self {
        Self {
            ticket_repo,
            link_repo,
            rule_cache,
            window_registry,
            pipeline: DerivationPipeline::new(),
        }
    }
}

#[async_trait]
impl DeriveService for DeriveApi {
    async fn derive_and_replace(
        &self,
        rows: Vec<RawTicketRow>,
        scope: WindowScope,
    ) -> ApiResult<DeriveApiResponse> {
        let start = std::time::Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let today = reporting_today();

        tracing::info!(
            scope = %scope,
            batch_id = %batch_id,
            rows = rows.len(),
            "开始批次派生"
        );

        // 规则集快照(惰性重建, 批次内固定)
        let business_unit_rules = self.rule_cache.get(RuleFamily::BusinessUnit)?;
        let status_rules = self.rule_cache.get(RuleFamily::StatusMapping)?;
        let level_rules = self.rule_cache.get(RuleFamily::LevelMapping)?;

        // 本作用域生效窗口(全局模式在注册表内处理)
        let window = self.window_registry.resolve(scope, today)?;

        // 关联聚合: 单遍预计算, 禁止逐行查询
        let links = self.link_repo.get_all()?;
        let aggregator = LinkAggregator::from_links(&links);

        // 上次导入的状态锁映射(人工覆写跨重处理存活)
        let locked_status = self.ticket_repo.locked_status_map(scope)?;

        let ctx = DerivationContext {
            scope,
            business_unit_rules: &business_unit_rules,
            status_rules: &status_rules,
            level_rules: &level_rules,
            window: &window,
            aggregator: &aggregator,
            locked_status: &locked_status,
            today,
            import_batch_id: batch_id.clone(),
        };

        let result = self.pipeline.derive_batch(&rows, &ctx);

        // 零成功行: 不执行替换, 旧集合保持完好
        if result.outcome != BatchOutcome::Failed {
            self.ticket_repo.replace_all(scope, &result.records)?;
        } else {
            tracing::warn!(
                scope = %scope,
                batch_id = %batch_id,
                errors = result.row_errors.len(),
                "批次无任何行成功, 跳过替换"
            );
        }

        let elapsed_ms = start.elapsed().as_millis() as i64;
        tracing::info!(
            scope = %scope,
            batch_id = %batch_id,
            outcome = %result.outcome,
            imported = result.records.len(),
            failed = result.row_errors.len(),
            elapsed_ms,
            "批次派生完成"
        );

        let mut row_errors = result.row_errors;
        let failed = row_errors.len() as i64;
        row_errors.truncate(MAX_ROW_ERROR_DETAILS);

        Ok(DeriveApiResponse {
            outcome: result.outcome,
            imported: result.records.len() as i64,
            failed,
            batch_id,
            row_errors,
            elapsed_ms,
        })
    }
}

// 非 trait 形式的便捷入口(AppState 直接持有具体类型时使用)
impl DeriveApi {
    pub async fn derive(
        &self,
        rows: Vec<RawTicketRow>,
        scope: WindowScope,
    ) -> ApiResult<DeriveApiResponse> {
        DeriveService::derive_and_replace(self, rows, scope).await
    }
}

impl std::fmt::Debug for DeriveApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeriveApi").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_with_screaming_outcome() {
        let response = DeriveApiResponse {
            outcome: BatchOutcome::PartialSuccess,
            imported: 2,
            failed: 1,
            batch_id: "batch-x".to_string(),
            row_errors: vec![],
            elapsed_ms: 5,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["outcome"], "PARTIAL_SUCCESS");
        assert_eq!(json["imported"], 2);
    }

    #[test]
    fn test_reporting_today_is_stable_within_call() {
        // 同一毫秒内两次调用必须一致(固定时区, 无随机性)
        assert_eq!(reporting_today(), reporting_today());
    }
}
