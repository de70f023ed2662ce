// ==========================================
// 运维工单报表系统 - 领域层
// ==========================================
// 职责: 实体与封闭类型定义, 不含持久化与业务流程
// ==========================================

pub mod link;
pub mod rule;
pub mod ticket;
pub mod types;
pub mod window;

// 重导出核心实体
pub use link::{LinkGroup, TicketLink};
pub use rule::{NewPatternRule, PatternRule, PatternRuleUpdate};
pub use ticket::{LinkedField, RawTicketRow, TicketRecord};
pub use window::{DateWindow, NewDateWindow, WindowSettings};
