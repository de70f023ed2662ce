// ==========================================
// 运维工单报表系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod link_repo;
pub mod rule_repo;
pub mod ticket_repo;
pub mod window_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use link_repo::TicketLinkRepository;
pub use rule_repo::PatternRuleRepository;
pub use ticket_repo::TicketRecordRepository;
pub use window_repo::DateWindowRepository;
