// ==========================================
// 运维工单报表系统 - API层
// ==========================================
// 职责: 对外业务接口(批次派生 / 规则管理 / 窗口管理 / 工单操作)
// 约定: 错误以 ApiError 类型化返回, 不向调用方泄漏 rusqlite 细节
// ==========================================

pub mod derive_api;
pub mod error;
pub mod rule_api;
pub mod ticket_api;
pub mod window_api;

pub use derive_api::{DeriveApi, DeriveApiResponse, DeriveService};
pub use error::{ApiError, ApiResult};
pub use rule_api::{ClassifyPreview, PatternPreview, RuleApi};
pub use ticket_api::{TicketApi, MANUAL_UPDATE_ELIGIBLE_STATUS};
pub use window_api::WindowApi;
