// ==========================================
// 运维工单报表系统 - 派生层
// ==========================================
// 职责: 已类型化行 → 派生工单记录
// 输入: 上游解析阶段产出的 RawTicketRow(本层不做文件解析)
// 输出: TicketRecord 批次 + 行级错误明细
// ==========================================

pub mod data_cleaner;
pub mod derivation;
pub mod error;

pub use data_cleaner::{TicketCleaner, PLACEHOLDER_UNASSIGNED, WIRE_TIMESTAMP_FORMAT};
pub use derivation::{BatchDeriveResult, DerivationContext, DerivationPipeline};
pub use error::{DeriveError, RowError};
