// ==========================================
// 运维工单报表系统 - 记录派生流水线
// ==========================================
// 职责: 清洗行 + 规则集 + 日期窗口 + 关联聚合 → 派生工单记录
// 约定: 行级失败逐行收集并剔除, 批次继续; 零成功行 → 批次 FAILED
// ==========================================

use crate::domain::ticket::{RawTicketRow, TicketRecord};
use crate::domain::types::{BatchOutcome, WindowScope};
use crate::domain::window::DateWindow;
use crate::engine::date_window::window_contains;
use crate::engine::link_aggregator::LinkAggregator;
use crate::engine::rule_set::RuleSet;
use crate::importer::data_cleaner::TicketCleaner;
use crate::importer::error::{DeriveError, RowError};
use chrono::NaiveDate;
use std::collections::HashMap;

/// 派生上下文: 一个批次内共享的规则集快照、窗口与聚合结果
///
/// 全部为只读引用, 流水线本身无内部并发与共享可变状态。
pub struct DerivationContext<'a> {
    /// 本批次的报表作用域
    pub scope: WindowScope,
    /// 业务单元规则集
    pub business_unit_rules: &'a RuleSet,
    /// 状态归一化规则集
    pub status_rules: &'a RuleSet,
    /// 级别归一化规则集
    pub level_rules: &'a RuleSet,
    /// 本作用域解析出的生效窗口
    pub window: &'a DateWindow,
    /// 关联聚合结果(enlaces 计数)
    pub aggregator: &'a LinkAggregator,
    /// 上次导入的已锁定状态映射 (request_id → canonical_status)
    pub locked_status: &'a HashMap<String, String>,
    /// "今天"(固定报表时区下计算一次后传入)
    pub today: NaiveDate,
    /// 导入批次ID
    pub import_batch_id: String,
}

/// 批次派生结果
#[derive(Debug)]
pub struct BatchDeriveResult {
    /// 成功派生的记录
    pub records: Vec<TicketRecord>,
    /// 行级错误明细
    pub row_errors: Vec<RowError>,
    /// 批次结论
    pub outcome: BatchOutcome,
}

pub struct DerivationPipeline {
    cleaner: TicketCleaner,
}

impl DerivationPipeline {
    pub fn new() -> Self {
        Self {
            cleaner: TicketCleaner,
        }
    }

    /// 派生单行
    ///
    /// # 步骤(顺序有依赖, 不可调换)
    /// 1. 字段去空白, 占位值归一化为缺失
    /// 2. 工单号文本缺失时从超链接回退提取
    /// 3. 业务单元规则族分类(输入: 应用/模块字段)
    /// 4. 状态规则族分类; 上次导入已锁定的工单跳过分类, 保持人工值
    ///    (级别字段同步走级别规则族, 级别不受锁约束)
    /// 5. 创建时间严格解析后做窗口成员判定
    /// 6. 挂接关联计数
    pub fn derive_row(
        &self,
        row_no: usize,
        row: &RawTicketRow,
        ctx: &DerivationContext<'_>,
    ) -> Result<TicketRecord, DeriveError> {
        // 1-2. 工单号: 文本优先, 超链接回退
        let request_id = self
            .cleaner
            .resolve_request_id(&row.request_id)
            .ok_or(DeriveError::MissingRequestId { row: row_no })?;

        // 1. 其余字段清洗
        let subject = self.cleaner.normalize_optional(row.subject.clone());
        let technician = self.cleaner.normalize_optional(row.technician.clone());
        let application = self.cleaner.normalize_optional(row.application.clone());
        let raw_status = self
            .cleaner
            .normalize_optional(row.raw_status.clone())
            .unwrap_or_default();

        // 5(前半). 创建时间严格解析(失败为该行硬错误, 不做静默默认)
        let created_time_raw = self
            .cleaner
            .normalize_optional(row.created_time.clone())
            .ok_or_else(|| DeriveError::MissingField {
                row: row_no,
                field: "created_time".to_string(),
            })?;
        let created_ts = self
            .cleaner
            .parse_wire_timestamp(&created_time_raw)
            .map_err(|_| DeriveError::TimestampFormatError {
                row: row_no,
                field: "created_time".to_string(),
                value: created_time_raw.clone(),
            })?;

        // 3. 业务单元分类
        let business_unit = ctx
            .business_unit_rules
            .classify(application.as_deref().unwrap_or(""));

        // 4. 状态归一化(状态锁优先于规则分类)
        let (canonical_status, status_locked) = match ctx.locked_status.get(&request_id) {
            Some(locked) => (locked.clone(), true),
            None => (ctx.status_rules.classify(&raw_status), false),
        };

        // 4. 级别归一化
        let level = self
            .cleaner
            .normalize_optional(row.level.clone())
            .map(|l| ctx.level_rules.classify(&l));

        // 5(后半). 窗口成员判定
        let in_date_range = window_contains(ctx.window, created_ts, ctx.today);

        // 6. 关联计数
        let linked_count = ctx.aggregator.linked_count(&request_id);

        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(TicketRecord {
            request_id,
            report_scope: ctx.scope,
            subject,
            technician,
            application,
            raw_status,
            canonical_status,
            level,
            business_unit,
            created_time: created_time_raw,
            in_date_range,
            linked_count,
            status_locked,
            import_batch_id: ctx.import_batch_id.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// 派生整个批次
    ///
    /// 行级失败不致命: 收集错误并剔除该行。
    /// 结论: 零成功 → FAILED; 有失败有成功 → PARTIAL_SUCCESS; 否则 SUCCESS。
    pub fn derive_batch(
        &self,
        rows: &[RawTicketRow],
        ctx: &DerivationContext<'_>,
    ) -> BatchDeriveResult {
        let mut records = Vec::with_capacity(rows.len());
        let mut row_errors = Vec::new();

        for (row_no, row) in rows.iter().enumerate() {
            match self.derive_row(row_no, row, ctx) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(row = row_no, error = %err, "行派生失败, 已剔除");
                    row_errors.push(RowError::from(err));
                }
            }
        }

        let outcome = if records.is_empty() {
            BatchOutcome::Failed
        } else if row_errors.is_empty() {
            BatchOutcome::Success
        } else {
            BatchOutcome::PartialSuccess
        };

        BatchDeriveResult {
            records,
            row_errors,
            outcome,
        }
    }
}

impl Default for DerivationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
