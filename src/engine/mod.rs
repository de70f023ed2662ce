// ==========================================
// 运维工单报表系统 - 引擎层
// ==========================================
// 职责: 实现业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 匹配/窗口判定为纯函数, 可独立测试
// ==========================================

pub mod date_window;
pub mod link_aggregator;
pub mod rule_cache;
pub mod rule_match;
pub mod rule_set;
pub mod window_registry;

// 重导出核心引擎
pub use date_window::window_contains;
pub use link_aggregator::{group_by_linked_id, LinkAggregator};
pub use rule_cache::RuleSetCache;
pub use rule_match::{pattern_matches, rule_matches};
pub use rule_set::{RuleSet, UNCLASSIFIED_BUSINESS_UNIT};
pub use window_registry::WindowRegistry;
